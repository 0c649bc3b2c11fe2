//! Protected route wrapper

use leptos::logging::log;
use leptos::prelude::*;
use leptos_router::NavigateOptions;
use leptos_router::hooks::{use_location, use_navigate};

use super::context::use_auth_context;
use crate::core::session::guard::full_path;
use crate::core::session::{GuardDecision, RouteAccess, evaluate};
use crate::ui::common::LoadingSpinner;

/// Render `children` only for an authorized session.
///
/// While the session is loading a spinner is shown. Once it settles
/// unauthorized, the browser is sent to the login page with the current path
/// as the `redirect` parameter.
#[component]
pub fn RequireAuth(children: ChildrenFn) -> impl IntoView {
    let auth = use_auth_context();
    let location = use_location();

    let decision = Memo::new(move |_| {
        let path = full_path(&location.pathname.get(), &location.search.get());
        evaluate(RouteAccess::AuthRequired, auth.authorization(), &path)
    });

    Effect::new(move |_| {
        if let GuardDecision::Redirect(url) = decision.get() {
            log!("Session not authorized, redirecting to {}", url);
            let navigate = use_navigate();
            navigate(
                &url,
                NavigateOptions {
                    replace: true,
                    ..Default::default()
                },
            );
        }
    });

    // Redirect renders the spinner too, so server and browser markup agree
    // until the effect navigates away.
    view! {
        <Show
            when=move || decision.get() == GuardDecision::Allow
            fallback=|| view! { <LoadingSpinner /> }
        >
            {children()}
        </Show>
    }
}
