//! Inline error message

use leptos::prelude::*;

/// Error message, hidden while `error` is `None`
#[component]
pub fn ErrorMessage(
    #[prop(into)]
    error: Signal<Option<String>>,
) -> impl IntoView {
    view! {
        <Show when=move || error.get().is_some()>
            <div class="error-message" role="alert">
                <span>{move || error.get().unwrap_or_default()}</span>
            </div>
        </Show>
    }
}
