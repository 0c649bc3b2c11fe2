//! Client-side session management
//!
//! This module provides:
//! - Access token persistence (`TokenStore`)
//! - The "who am I" session fetch (`SessionFetcher`)
//! - Login/logout orchestration and derived authorization (`AuthStore`)
//! - The route guard deciding access to protected routes

pub mod controller;
pub mod fetcher;
pub mod guard;
pub mod state;
pub mod token_store;

pub use controller::{AuthError, AuthStore, Spawner, spawn_with_leptos};
pub use fetcher::SessionFetcher;
pub use guard::{GuardDecision, RouteAccess, evaluate, login_redirect_url, redirect_target};
pub use state::{AuthPhase, AuthorizationState, SessionSnapshot};
#[cfg(not(feature = "ssr"))]
pub use token_store::LocalTokenStorage;
pub use token_store::{MemoryTokenStorage, StorageError, TokenStorage, TokenStore};
