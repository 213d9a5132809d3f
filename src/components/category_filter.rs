//! Category Filter Component
//!
//! Single-select dropdown over a fixed set of enum values.

use leptos::prelude::*;

/// Dropdown with an "all" entry mapped to the empty string
#[component]
pub fn CategoryFilter(
    options: &'static [&'static str],
    #[prop(into)] all_label: String,
    #[prop(into)] selected: Signal<String>,
    #[prop(into)] on_change: Callback<String>,
) -> impl IntoView {
    view! {
        <select
            class="category-filter"
            on:change=move |ev| on_change.run(event_target_value(&ev))
        >
            <option value="" selected=move || selected.get().is_empty()>{all_label}</option>
            {options.iter().map(|opt| {
                let value = *opt;
                view! {
                    <option value=value selected=move || selected.get() == value>
                        {humanize(value)}
                    </option>
                }
            }).collect_view()}
        </select>
    }
}

/// `IN_PROGRESS` -> `In progress`
pub fn humanize(value: &str) -> String {
    let lower = value.replace('_', " ").to_lowercase();
    let mut chars = lower.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
