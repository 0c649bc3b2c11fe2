pub mod auth;
pub mod common;
pub mod header;
pub mod pages;
pub mod reviews;

pub use auth::{RequireAuth, provide_auth_context, use_auth_context};
pub use header::Header;
