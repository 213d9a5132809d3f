//! CRM Frontend App
//!
//! Restores the session on startup, then shows either the login page or the
//! navigation bar with the section the user picked.

use leptos::prelude::*;
use leptos::task::spawn_local;
use reactive_stores::Store;

use crm_listview::current_user;

use crate::components::{LogPanel, NavBar};
use crate::config::AppConfig;
use crate::context::AppContext;
use crate::pages::{ClientsPage, EmployeesPage, LeadsPage, LoginPage, TasksPage};
use crate::store::{AppState, AppStateStoreFields, Section};

#[component]
pub fn App() -> impl IntoView {
    let store = Store::new(AppState::new());
    let ctx = AppContext::new(AppConfig::from_env(), store);
    provide_context(ctx);

    // Restore the session on mount
    Effect::new(move |_| {
        let api = ctx.api();
        if !api.session().is_authenticated() {
            *store.restoring().write() = false;
            return;
        }
        spawn_local(async move {
            match current_user(&api).await {
                Ok(user) => {
                    let sections = Section::for_role(user.role);
                    if !sections.contains(&store.section().get_untracked()) {
                        *store.section().write() = sections[0];
                    }
                    *store.user().write() = Some(user);
                }
                Err(e) => {
                    log::warn!("could not restore session: {}", e);
                    ctx.report(&e);
                }
            }
            *store.restoring().write() = false;
        });
    });

    view! {
        <div class="app-layout">
            {move || {
                if store.restoring().get() {
                    return view! { <p class="loading">"Loading..."</p> }.into_any();
                }
                match store.user().get() {
                    None => view! { <LoginPage /> }.into_any(),
                    Some(user) => {
                        let role = user.role;
                        view! {
                            <NavBar user=user />
                            <main class="main-content">
                                {move || match store.section().get() {
                                    Section::Employees => view! { <EmployeesPage role=role /> }.into_any(),
                                    Section::Leads => view! { <LeadsPage role=role /> }.into_any(),
                                    Section::Tasks => view! { <TasksPage role=role /> }.into_any(),
                                    Section::Clients => view! { <ClientsPage role=role /> }.into_any(),
                                }}
                            </main>
                        }.into_any()
                    }
                }
            }}
            <LogPanel />
        </div>
    }
}
