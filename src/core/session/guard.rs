//! Route guard
//!
//! Decides whether navigation to a route may proceed given the current
//! authorization state. A route that requires authentication waits while the
//! session is loading and redirects to the login page, carrying the requested
//! path in the `redirect` query parameter, once it is known to be unauthorized.

use crate::core::session::state::AuthorizationState;

/// Path of the login page
pub const LOGIN_PATH: &str = "/login";

/// Query parameter carrying the path to return to after login
pub const REDIRECT_PARAM: &str = "redirect";

/// Access requirement of a route
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteAccess {
    Public,
    AuthRequired,
}

/// Outcome of a guard evaluation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuardDecision {
    Allow,
    /// Session still loading; evaluate again once it settles
    Wait,
    /// Navigate to this URL instead
    Redirect(String),
}

/// Evaluate the guard for a navigation to `full_path` (path plus query)
pub fn evaluate(access: RouteAccess, state: AuthorizationState, full_path: &str) -> GuardDecision {
    match access {
        RouteAccess::Public => GuardDecision::Allow,
        RouteAccess::AuthRequired if state.authorized => GuardDecision::Allow,
        RouteAccess::AuthRequired if state.loading => GuardDecision::Wait,
        RouteAccess::AuthRequired => GuardDecision::Redirect(login_redirect_url(full_path)),
    }
}

/// Login URL that returns to `full_path` after a successful login
pub fn login_redirect_url(full_path: &str) -> String {
    format!(
        "{}?{}={}",
        LOGIN_PATH,
        REDIRECT_PARAM,
        urlencoding::encode(full_path)
    )
}

/// Join a location's path and query string (with or without a leading `?`)
pub fn full_path(pathname: &str, search: &str) -> String {
    let search = search.trim_start_matches('?');
    if search.is_empty() {
        pathname.to_string()
    } else {
        format!("{}?{}", pathname, search)
    }
}

/// Where to go after login, given the decoded `redirect` query value.
///
/// Only local absolute paths are followed; anything else goes home.
pub fn redirect_target(redirect: Option<&str>) -> String {
    match redirect {
        Some(path)
            if path.starts_with('/')
                && !path.starts_with("//")
                && !path.contains('\\')
                && !is_login_path(path) =>
        {
            path.to_string()
        }
        _ => "/".to_string(),
    }
}

fn is_login_path(path: &str) -> bool {
    let route = path.split(['?', '#']).next().unwrap_or_default();
    route.trim_end_matches('/') == LOGIN_PATH
}
