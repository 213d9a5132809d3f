//! Error Banner Component
//!
//! The single visible error slot of a page.

use leptos::prelude::*;

#[component]
pub fn ErrorBanner(
    #[prop(into)] message: Signal<Option<String>>,
    #[prop(into)] on_dismiss: Callback<()>,
) -> impl IntoView {
    view! {
        {move || message.get().map(|msg| view! {
            <div class="error-banner" role="alert">
                <span>{msg}</span>
                <button class="dismiss-btn" on:click=move |_| on_dismiss.run(())>"×"</button>
            </div>
        })}
    }
}
