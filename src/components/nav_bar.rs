//! Navigation Bar Component
//!
//! Role-scoped section tabs plus the logout button.

use leptos::prelude::*;
use leptos::task::spawn_local;

use crm_listview::{logout, CurrentUser};

use crate::context::use_app_context;
use crate::store::{AppStateStoreFields, Section};

#[component]
pub fn NavBar(user: CurrentUser) -> impl IntoView {
    let ctx = use_app_context();
    let role = user.role;

    let on_logout = move |_| {
        spawn_local(async move {
            logout(&ctx.api()).await;
            *ctx.store.user().write() = None;
        });
    };

    view! {
        <nav class="nav-bar">
            <span class="nav-brand">"CRM"</span>
            {Section::for_role(role).iter().map(|section| {
                let section = *section;
                let is_active = move || ctx.store.section().get() == section;
                view! {
                    <button
                        class=move || if is_active() { "nav-tab active" } else { "nav-tab" }
                        on:click=move |_| ctx.navigate(section)
                    >
                        {section.label(role)}
                    </button>
                }
            }).collect_view()}
            <span class="nav-user">{format!("{} ({})", user.name, role)}</span>
            <button class="nav-logout" on:click=on_logout>"Log out"</button>
        </nav>
    }
}
