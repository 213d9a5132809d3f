//! Modal Frame Component
//!
//! Overlay + dialog chrome; the page decides when it is rendered.

use leptos::prelude::*;

#[component]
pub fn ModalFrame(
    #[prop(into)] title: String,
    #[prop(into)] on_close: Callback<()>,
    children: Children,
) -> impl IntoView {
    view! {
        <div class="modal-overlay" on:click=move |_| on_close.run(())>
            <div class="modal" on:click=|ev| ev.stop_propagation()>
                <div class="modal-header">
                    <h2>{title}</h2>
                    <button class="modal-close" on:click=move |_| on_close.run(())>"×"</button>
                </div>
                <div class="modal-body">{children()}</div>
            </div>
        </div>
    }
}
