//! Login form component

use leptos::prelude::*;
use leptos::task::spawn_local;

use super::context::use_auth_context;
use crate::ui::common::{ErrorMessage, Spinner, SpinnerSize};

/// Username and password form
#[component]
pub fn LoginForm(
    /// Callback when login is successful
    #[prop(optional, into)]
    on_success: Option<Callback<()>>,
) -> impl IntoView {
    let auth = use_auth_context();

    let username = RwSignal::new(String::new());
    let password = RwSignal::new(String::new());
    let submitting = RwSignal::new(false);
    let error = RwSignal::new(None::<String>);

    let on_submit = move |ev: leptos::ev::SubmitEvent| {
        ev.prevent_default();
        if submitting.get_untracked() {
            return;
        }

        let username_val = username.get_untracked().trim().to_string();
        let password_val = password.get_untracked();
        if username_val.is_empty() || password_val.is_empty() {
            error.set(Some("Username and password are required".to_string()));
            return;
        }

        error.set(None);
        submitting.set(true);

        spawn_local(async move {
            let result = auth.login(&username_val, &password_val).await;
            submitting.set(false);
            match result {
                Ok(()) => {
                    password.set(String::new());
                    if let Some(callback) = on_success {
                        callback.run(());
                    }
                }
                Err(e) => error.set(Some(e.to_string())),
            }
        });
    };

    view! {
        <form on:submit=on_submit class="login-form">
            <h1 class="login-title">"Login"</h1>

            <ErrorMessage error=error />

            <label for="username" class="form-label">"Username"</label>
            <input
                type="text"
                id="username"
                name="username"
                autocomplete="username"
                class="form-input"
                prop:value=move || username.get()
                on:input=move |ev| username.set(event_target_value(&ev))
            />

            <label for="password" class="form-label">"Password"</label>
            <input
                type="password"
                id="password"
                name="password"
                autocomplete="current-password"
                class="form-input"
                prop:value=move || password.get()
                on:input=move |ev| password.set(event_target_value(&ev))
            />

            <button type="submit" class="btn btn-primary" disabled=move || submitting.get()>
                <Show when=move || submitting.get()>
                    <Spinner size=SpinnerSize::Small />
                </Show>
                "Login"
            </button>
        </form>
    }
}
