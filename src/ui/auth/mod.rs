//! Authentication UI module
//!
//! This module provides the auth context, the login form and the wrapper for
//! protected routes.

mod context;
mod guard;
mod login_form;

pub use context::{provide_auth_context, use_auth_context};
pub use guard::RequireAuth;
pub use login_form::LoginForm;
