//! Delete Confirm Button Component
//!
//! Inline delete with an explicit confirm/cancel step. Only a confirmed
//! delete ever reaches the callback.

use leptos::prelude::*;

use crm_listview::{ConfirmedDelete, PendingDelete};

/// Inline delete confirmation button
///
/// Shows "Delete" initially. When clicked, shows "Delete?" with ✓/✗ buttons.
///
/// # Arguments
/// * `id` - Record to delete
/// * `on_confirm` - Receives the confirmed delete
#[component]
pub fn DeleteConfirmButton(
    id: i64,
    #[prop(into)] on_confirm: Callback<ConfirmedDelete>,
) -> impl IntoView {
    let pending = RwSignal::new(None::<PendingDelete>);

    view! {
        <Show
            when=move || pending.with(|p| p.is_some())
            fallback=move || view! {
                <button
                    class="delete-btn"
                    on:click=move |ev| {
                        ev.stop_propagation();
                        pending.set(Some(PendingDelete::request(id)));
                    }
                >
                    "Delete"
                </button>
            }
        >
            <span class="delete-confirm">
                <span class="delete-confirm-text">"Delete?"</span>
                <button
                    class="confirm-btn"
                    on:click=move |ev| {
                        ev.stop_propagation();
                        if let Some(request) = pending.get() {
                            pending.set(None);
                            on_confirm.run(request.confirm());
                        }
                    }
                >
                    "✓"
                </button>
                <button
                    class="cancel-btn"
                    on:click=move |ev| {
                        ev.stop_propagation();
                        pending.set(None);
                    }
                >
                    "✗"
                </button>
            </span>
        </Show>
    }
}
