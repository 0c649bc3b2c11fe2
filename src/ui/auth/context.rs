//! Auth context
//!
//! Builds the application's single [`AuthStore`] and exposes it to the
//! component tree. The browser build persists the token in `localStorage` and
//! talks to the API with `gloo-net`; the server build renders anonymously with
//! an in-memory token and `reqwest`.

use leptos::prelude::*;

use crate::core::config::ApiConfig;
use crate::core::session::{AuthStore, spawn_with_leptos};

/// Create the auth store and provide it to the component tree
pub fn provide_auth_context() -> AuthStore {
    let store = build_store();
    provide_context(store);
    store
}

/// Get the auth store from the component tree
pub fn use_auth_context() -> AuthStore {
    expect_context::<AuthStore>()
}

#[cfg(not(feature = "ssr"))]
fn build_store() -> AuthStore {
    use crate::core::api::GlooTransport;
    use crate::core::session::LocalTokenStorage;

    let config = ApiConfig::from_build_env();
    AuthStore::new(
        GlooTransport::new(config.base_url.clone()),
        LocalTokenStorage::new(config.token_storage_key.clone()),
        config.retry_policy(),
        spawn_with_leptos,
    )
}

#[cfg(feature = "ssr")]
fn build_store() -> AuthStore {
    use crate::core::api::ReqwestTransport;
    use crate::core::session::MemoryTokenStorage;

    let config = ApiConfig::from_env();
    AuthStore::new(
        ReqwestTransport::new(config.base_url.clone()),
        MemoryTokenStorage::new(),
        config.retry_policy(),
        spawn_with_leptos,
    )
}
