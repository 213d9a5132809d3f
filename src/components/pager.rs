//! Pager Component
//!
//! Prev / "Page x of y" / Next controls for one sub-list.

use leptos::prelude::*;

#[component]
pub fn Pager(
    #[prop(into)] label: Signal<String>,
    #[prop(into)] has_prev: Signal<bool>,
    #[prop(into)] has_next: Signal<bool>,
    #[prop(into)] on_prev: Callback<()>,
    #[prop(into)] on_next: Callback<()>,
) -> impl IntoView {
    view! {
        <div class="pager">
            <button
                class="pager-btn"
                disabled=move || !has_prev.get()
                on:click=move |_| on_prev.run(())
            >
                "‹ Prev"
            </button>
            <span class="pager-label">{move || label.get()}</span>
            <button
                class="pager-btn"
                disabled=move || !has_next.get()
                on:click=move |_| on_next.run(())
            >
                "Next ›"
            </button>
        </div>
    }
}
