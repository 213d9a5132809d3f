//! Form Field Components
//!
//! Labelled inputs bound to a value signal and an input callback.

use leptos::prelude::*;

/// Labelled text input
#[component]
pub fn TextField(
    #[prop(into)] label: String,
    #[prop(into)] value: Signal<String>,
    #[prop(into)] on_input: Callback<String>,
    #[prop(optional, into)] input_type: Option<String>,
) -> impl IntoView {
    let input_type = input_type.unwrap_or_else(|| "text".to_string());
    view! {
        <label class="form-field">
            <span class="form-label">{label}</span>
            <input
                type=input_type
                prop:value=move || value.get()
                on:input=move |ev| on_input.run(event_target_value(&ev))
            />
        </label>
    }
}

/// Labelled multi-line input
#[component]
pub fn TextAreaField(
    #[prop(into)] label: String,
    #[prop(into)] value: Signal<String>,
    #[prop(into)] on_input: Callback<String>,
) -> impl IntoView {
    view! {
        <label class="form-field">
            <span class="form-label">{label}</span>
            <textarea
                prop:value=move || value.get()
                on:input=move |ev| on_input.run(event_target_value(&ev))
            ></textarea>
        </label>
    }
}

/// Labelled select over `(value, label)` pairs
#[component]
pub fn SelectField(
    #[prop(into)] label: String,
    #[prop(into)] options: Signal<Vec<(String, String)>>,
    #[prop(into)] selected: Signal<String>,
    #[prop(into)] on_change: Callback<String>,
    #[prop(optional, into)] empty_label: Option<String>,
) -> impl IntoView {
    view! {
        <label class="form-field">
            <span class="form-label">{label}</span>
            <select on:change=move |ev| on_change.run(event_target_value(&ev))>
                {empty_label.map(|text| view! {
                    <option value="" selected=move || selected.get().is_empty()>{text}</option>
                })}
                {move || options.get().into_iter().map(|(value, text)| {
                    let is_selected = selected.get() == value;
                    view! { <option value=value selected=is_selected>{text}</option> }
                }).collect_view()}
            </select>
        </label>
    }
}

/// `(value, label)` pairs for a fixed enum list
pub fn enum_options(values: &[&str]) -> Vec<(String, String)> {
    values
        .iter()
        .map(|v| (v.to_string(), super::humanize(v)))
        .collect()
}
