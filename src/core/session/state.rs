//! Derived authorization state
//!
//! Authorization is never stored. It is recomputed from a [`SessionSnapshot`]
//! of the underlying inputs every time a consumer asks for it.

use crate::core::api::User;

/// The inputs authorization is derived from
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SessionSnapshot {
    pub token_present: bool,
    pub forced_logout: bool,
    /// Token requests currently in flight (overlapping logins are counted)
    pub token_requests: u32,
    pub session_loading: bool,
    /// Last successfully fetched session user, possibly stale
    pub session_user: Option<User>,
    /// The last session fetch was rejected with 401/403
    pub session_rejected: bool,
}

/// Authorization as seen by guards and views
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AuthorizationState {
    pub authorized: bool,
    pub loading: bool,
}

/// Lifecycle phase of the session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthPhase {
    /// No token
    Anonymous,
    /// Token request or session fetch in flight
    Authenticating,
    /// Token present and the session user is known
    Authenticated,
    /// Token present but the session could not be confirmed
    SessionInvalid,
    /// Explicit logout; cached session data is masked
    LoggedOut,
}

impl SessionSnapshot {
    /// Session user unless masked by a forced logout or a missing token
    pub fn me(&self) -> Option<&User> {
        if self.forced_logout || !self.token_present {
            None
        } else {
            self.session_user.as_ref()
        }
    }

    pub fn authorization(&self) -> AuthorizationState {
        AuthorizationState {
            authorized: self.me().is_some(),
            loading: self.token_requests > 0 || (self.session_loading && !self.forced_logout),
        }
    }

    pub fn phase(&self) -> AuthPhase {
        if self.token_requests > 0 {
            AuthPhase::Authenticating
        } else if self.forced_logout {
            AuthPhase::LoggedOut
        } else if self.me().is_some() {
            AuthPhase::Authenticated
        } else if !self.token_present {
            AuthPhase::Anonymous
        } else if self.session_loading {
            AuthPhase::Authenticating
        } else {
            AuthPhase::SessionInvalid
        }
    }
}
