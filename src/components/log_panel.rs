//! Log Panel Component
//!
//! Footer toggle showing the most recent log lines.

use leptos::prelude::*;

use crate::logging::recent_lines;

#[component]
pub fn LogPanel() -> impl IntoView {
    let (open, set_open) = signal(false);
    let (lines, set_lines) = signal(Vec::<String>::new());

    let toggle = move |_| {
        if !open.get() {
            set_lines.set(recent_lines());
        }
        set_open.update(|v| *v = !*v);
    };

    view! {
        <footer class="log-panel">
            <button class="log-toggle" on:click=toggle>
                {move || if open.get() { "Hide log" } else { "Show log" }}
            </button>
            <Show when=move || open.get()>
                <pre class="log-lines">
                    {move || lines.get().join("\n")}
                </pre>
            </Show>
        </footer>
    }
}
