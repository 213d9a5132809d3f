//! Login Page
//!
//! Posts credentials and hands the resolved user to the app store.

use leptos::prelude::*;
use leptos::task::spawn_local;

use crm_listview::{login, Credentials};

use crate::components::{ErrorBanner, TextField};
use crate::context::use_app_context;
use crate::store::{AppStateStoreFields, Section};

#[component]
pub fn LoginPage() -> impl IntoView {
    let ctx = use_app_context();
    let credentials = RwSignal::new(Credentials::default());
    let error = RwSignal::new(None::<String>);
    let (submitting, set_submitting) = signal(false);

    let on_submit = move |ev: web_sys::SubmitEvent| {
        ev.prevent_default();
        if submitting.get() {
            return;
        }
        let creds = credentials.get();
        set_submitting.set(true);
        error.set(None);

        spawn_local(async move {
            let api = ctx.api();
            match login(&api, &creds).await {
                Ok(user) => {
                    let first = Section::for_role(user.role)[0];
                    *ctx.store.section().write() = first;
                    *ctx.store.user().write() = Some(user);
                }
                Err(e) => {
                    error.try_set(Some(e.user_message()));
                }
            }
            set_submitting.try_set(false);
        });
    };

    view! {
        <div class="login-page">
            <form class="login-form" on:submit=on_submit>
                <h1>"Sign in"</h1>
                <ErrorBanner
                    message=error
                    on_dismiss=move |_| error.set(None)
                />
                <TextField
                    label="Email"
                    input_type="email"
                    value=Signal::derive(move || credentials.with(|c| c.email.clone()))
                    on_input=move |v: String| credentials.update(|c| c.email = v)
                />
                <TextField
                    label="Password"
                    input_type="password"
                    value=Signal::derive(move || credentials.with(|c| c.password.clone()))
                    on_input=move |v: String| credentials.update(|c| c.password = v)
                />
                <button type="submit" disabled=move || submitting.get()>
                    {move || if submitting.get() { "Signing in..." } else { "Sign in" }}
                </button>
            </form>
        </div>
    }
}
