//! Login page component
//!
//! On success the page returns to the path in the `redirect` query parameter.

use leptos::prelude::*;
use leptos_router::NavigateOptions;
use leptos_router::hooks::{use_navigate, use_query_map};

use crate::core::session::guard::REDIRECT_PARAM;
use crate::core::session::redirect_target;
use crate::ui::auth::{LoginForm, use_auth_context};
use crate::ui::header::Header;

/// Login page component
#[component]
pub fn LoginPage() -> impl IntoView {
    let auth = use_auth_context();
    let query = use_query_map();

    let target = move || redirect_target(query.get_untracked().get(REDIRECT_PARAM).as_deref());
    let go_to_target = move || {
        let navigate = use_navigate();
        navigate(
            &target(),
            NavigateOptions {
                replace: true,
                ..Default::default()
            },
        );
    };

    // Redirect if already authenticated
    Effect::new(move |_| {
        if auth.authorized() {
            go_to_target();
        }
    });

    view! {
        <div class="page">
            <Header />
            <main class="page-content page-centered">
                <LoginForm on_success=Callback::new(move |_| go_to_target()) />
            </main>
        </div>
    }
}
