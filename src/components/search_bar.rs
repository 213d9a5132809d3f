//! Search Bar Component
//!
//! One search input for every list page. Keystrokes go through a
//! `Debouncer`; the page only hears about the committed term.

use gloo_timers::future::TimeoutFuture;
use leptos::prelude::*;
use leptos::task::spawn_local;

use crm_listview::Debouncer;

use crate::context::use_app_context;

fn now_ms() -> u64 {
    js_sys::Date::now() as u64
}

/// Debounced search input
///
/// # Arguments
/// * `placeholder` - Input placeholder text
/// * `on_committed_change` - Called once per pause in typing with the current term
#[component]
pub fn SearchBar(
    #[prop(into)] placeholder: String,
    #[prop(into)] on_committed_change: Callback<String>,
) -> impl IntoView {
    let ctx = use_app_context();
    let (raw, set_raw) = signal(String::new());
    let debouncer = StoredValue::new(Debouncer::new(ctx.config().debounce_ms));

    // Nothing may be emitted once the page is gone
    on_cleanup(move || {
        debouncer.try_update_value(|d| d.cancel());
    });

    let on_input = move |ev: web_sys::Event| {
        let term = event_target_value(&ev);
        set_raw.set(term.clone());
        let Some(deadline) = debouncer.try_update_value(|d| {
            d.input(&term, now_ms());
            d.deadline()
        }).flatten() else {
            return;
        };
        let delay = debouncer.with_value(|d| d.delay_ms());

        spawn_local(async move {
            TimeoutFuture::new(delay as u32).await;
            loop {
                // A later keystroke moved the deadline: that one owns the emission
                if debouncer.try_with_value(|d| d.deadline()).flatten() != Some(deadline) {
                    return;
                }
                let now = now_ms();
                if let Some(term) = debouncer.try_update_value(|d| d.poll(now)).flatten() {
                    on_committed_change.run(term);
                    return;
                }
                // Timer fired a hair early relative to the wall clock
                let left = debouncer
                    .try_with_value(|d| d.remaining(now))
                    .flatten()
                    .unwrap_or(0);
                TimeoutFuture::new(left.max(1) as u32).await;
            }
        });
    };

    view! {
        <div class="search-bar">
            <input
                type="search"
                placeholder=placeholder
                prop:value=move || raw.get()
                on:input=on_input
            />
        </div>
    }
}
