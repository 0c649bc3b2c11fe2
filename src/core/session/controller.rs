//! Auth controller
//!
//! `AuthStore` drives login and logout and exposes the derived, reactive
//! authorization state. It is created once when the application starts and
//! lives for the lifetime of the application.
//!
//! The session refresh after a successful login is spawned and not awaited:
//! `login()` resolving does not mean `me()` is already populated. Observers
//! should watch `loading()` and `authorized()` instead.

use futures::future::LocalBoxFuture;
use leptos::logging::{log, warn};
use leptos::prelude::*;

use crate::core::api::{ApiClient, ApiError, RetryPolicy, TokenRequest, Transport, User};
use crate::core::session::fetcher::SessionFetcher;
use crate::core::session::state::{AuthPhase, AuthorizationState, SessionSnapshot};
use crate::core::session::token_store::{TokenStorage, TokenStore};

/// Runs a background task to completion without the caller awaiting it
pub type Spawner = fn(LocalBoxFuture<'static, ()>);

/// Spawner backed by the Leptos executor
pub fn spawn_with_leptos(task: LocalBoxFuture<'static, ()>) {
    leptos::task::spawn_local(task);
}

/// Login error types
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AuthError {
    #[error("Invalid username or password")]
    InvalidCredentials,

    #[error(transparent)]
    Api(#[from] ApiError),
}

/// Application-wide authentication state and actions
#[derive(Clone, Copy)]
pub struct AuthStore {
    tokens: TokenStore,
    session: SessionFetcher,
    client: StoredValue<ApiClient>,
    retry: RetryPolicy,
    spawner: Spawner,
    forced_logout: RwSignal<bool>,
    token_requests: RwSignal<u32>,
}

impl AuthStore {
    /// Build the store.
    ///
    /// When `storage` already holds a token the session fetch starts right away.
    pub fn new(
        transport: impl Transport + 'static,
        storage: impl TokenStorage + 'static,
        retry: RetryPolicy,
        spawner: Spawner,
    ) -> Self {
        let tokens = TokenStore::new(storage);
        let client = ApiClient::new(transport, tokens);
        let forced_logout = RwSignal::new(false);
        let session = SessionFetcher::new(client.clone(), retry, forced_logout);

        let store = Self {
            tokens,
            session,
            client: StoredValue::new(client),
            retry,
            spawner,
            forced_logout,
            token_requests: RwSignal::new(0),
        };

        if session.is_enabled() {
            log!("Persisted access token found, restoring session");
            store.spawn_session_refresh();
        }

        store
    }

    /// API client signed with this store's token
    pub fn client(&self) -> ApiClient {
        self.client.get_value()
    }

    /// Request a token and start the session refresh.
    ///
    /// Returns once the token is stored; the refresh runs in the background.
    pub async fn login(&self, username: &str, password: &str) -> Result<(), AuthError> {
        log!("Requesting access token for {}", username);
        self.forced_logout.set(false);
        self.token_requests.update(|count| *count += 1);

        let client = self.client.get_value();
        let request = TokenRequest::password(username, password);
        let result = self
            .retry
            .run("Token request", || client.issue_token(&request))
            .await;

        self.token_requests.update(|count| *count = count.saturating_sub(1));

        match result {
            Ok(token) => {
                if !token.token_type.eq_ignore_ascii_case("bearer") {
                    warn!("Unexpected token type: {}", token.token_type);
                }
                self.session.invalidate();
                self.tokens.set(token.access_token);
                log!("Access token issued for {}", username);
                self.spawn_session_refresh();
                Ok(())
            }
            Err(error) if error.is_auth_error() => {
                log!("Login rejected for {}", username);
                Err(AuthError::InvalidCredentials)
            }
            Err(error) => {
                warn!("Login failed: {}", error);
                Err(AuthError::Api(error))
            }
        }
    }

    /// Forget the session locally. No network call.
    pub fn logout(&self) {
        self.forced_logout.set(true);
        self.session.invalidate();
        self.tokens.clear();
        log!("Logged out");
    }

    /// Refetch the session user now
    pub async fn refresh_session(&self) {
        self.session.refetch().await;
    }

    /// Inputs of the derived state (reactive)
    pub fn snapshot(&self) -> SessionSnapshot {
        let error = self.session.error();
        SessionSnapshot {
            token_present: self.tokens.is_present(),
            forced_logout: self.forced_logout.get(),
            token_requests: self.token_requests.get(),
            session_loading: self.session.is_loading(),
            session_user: self.session.data(),
            session_rejected: error.is_some_and(|e| e.is_auth_error()),
        }
    }

    /// Current user, masked after logout (reactive)
    pub fn me(&self) -> Option<User> {
        self.snapshot().me().cloned()
    }

    pub fn authorized(&self) -> bool {
        self.authorization().authorized
    }

    pub fn loading(&self) -> bool {
        self.authorization().loading
    }

    pub fn authorization(&self) -> AuthorizationState {
        self.snapshot().authorization()
    }

    pub fn phase(&self) -> AuthPhase {
        self.snapshot().phase()
    }

    /// Error of the last settled session fetch (reactive)
    pub fn session_error(&self) -> Option<ApiError> {
        self.session.error()
    }

    fn spawn_session_refresh(&self) {
        self.session.prime();
        let session = self.session;
        (self.spawner)(Box::pin(async move {
            session.refetch().await;
        }));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::session::MemoryTokenStorage;
    use crate::core::testing::{
        MockTransport, queue_task, reactive_owner, run_queued_tasks, user_json,
    };
    use serde_json::json;

    fn token_json(token: &str) -> serde_json::Value {
        json!({"access_token": token, "token_type": "bearer"})
    }

    fn store_with(transport: &MockTransport, storage: &MemoryTokenStorage) -> AuthStore {
        AuthStore::new(
            transport.clone(),
            storage.clone(),
            RetryPolicy::immediate(3),
            queue_task,
        )
    }

    #[tokio::test]
    async fn test_starts_anonymous_without_token() {
        let _owner = reactive_owner();
        let transport = MockTransport::new();
        let store = store_with(&transport, &MemoryTokenStorage::new());

        assert_eq!(store.phase(), AuthPhase::Anonymous);
        assert!(!store.loading());
        assert!(!store.authorized());

        run_queued_tasks().await;
        assert_eq!(transport.request_count(), 0);
    }

    #[tokio::test]
    async fn test_login_then_settle_is_authorized() {
        let _owner = reactive_owner();
        let transport = MockTransport::new();
        transport.push_json(200, token_json("t1"));
        transport.push_json(200, user_json(1, "reader"));
        let storage = MemoryTokenStorage::new();
        let store = store_with(&transport, &storage);

        store.login("reader", "secret").await.unwrap();

        // The refresh is spawned, not awaited.
        assert!(store.me().is_none());
        assert!(store.loading());
        assert_eq!(store.phase(), AuthPhase::Authenticating);
        assert_eq!(storage.peek().as_deref(), Some("t1"));

        run_queued_tasks().await;

        assert!(store.authorized());
        assert!(!store.loading());
        assert_eq!(store.me().map(|u| u.login), Some("reader".to_string()));
        assert_eq!(store.phase(), AuthPhase::Authenticated);

        let requests = transport.requests();
        assert_eq!(requests[0].path, "/token");
        assert_eq!(requests[1].path, "/users/me");
        assert_eq!(requests[1].bearer.as_deref(), Some("t1"));
    }

    #[tokio::test]
    async fn test_login_with_bad_credentials() {
        let _owner = reactive_owner();
        for status in [401, 403] {
            let transport = MockTransport::new();
            transport.push_status(status, r#"{"detail": "incorrect username or password"}"#);
            let store = store_with(&transport, &MemoryTokenStorage::new());

            let error = store.login("reader", "wrong").await.unwrap_err();

            assert_eq!(error, AuthError::InvalidCredentials);
            assert_eq!(error.to_string(), "Invalid username or password");
            assert_eq!(transport.request_count(), 1);
            run_queued_tasks().await;
            assert!(!store.authorized());
            assert!(!store.loading());
        }
    }

    #[tokio::test]
    async fn test_login_propagates_other_errors() {
        let _owner = reactive_owner();
        let transport = MockTransport::new();
        transport.push_status(
            422,
            r#"{"detail": [{"loc": ["body", "username"], "msg": "field required", "type": "missing"}]}"#,
        );
        let store = store_with(&transport, &MemoryTokenStorage::new());

        let error = store.login("", "").await.unwrap_err();

        assert!(matches!(error, AuthError::Api(ApiError::Validation(_))));
        assert_eq!(transport.request_count(), 1);
    }

    #[tokio::test]
    async fn test_login_retries_transient_token_failures() {
        let _owner = reactive_owner();
        let transport = MockTransport::new();
        transport.push_status(500, "");
        transport.push_network_error("connection reset");
        transport.push_json(200, token_json("t2"));
        let store = store_with(&transport, &MemoryTokenStorage::new());

        store.login("reader", "secret").await.unwrap();

        assert_eq!(transport.request_count(), 3);
        assert_eq!(store.tokens.get().as_deref(), Some("t2"));
    }

    #[tokio::test]
    async fn test_login_gives_up_after_retries() {
        let _owner = reactive_owner();
        let transport = MockTransport::new();
        for _ in 0..4 {
            transport.push_status(503, "unavailable");
        }
        let store = store_with(&transport, &MemoryTokenStorage::new());

        let error = store.login("reader", "secret").await.unwrap_err();

        assert_eq!(error.to_string(), "Request failed with status 503: unavailable");
        assert_eq!(transport.request_count(), 4);
        assert!(!store.loading());
    }

    #[tokio::test]
    async fn test_logout_masks_cached_session_immediately() {
        let _owner = reactive_owner();
        let transport = MockTransport::new();
        transport.push_json(200, user_json(1, "reader"));
        let storage = MemoryTokenStorage::new();
        storage.put("persisted");
        let store = store_with(&transport, &storage);
        run_queued_tasks().await;
        assert!(store.authorized());

        store.logout();

        assert!(!store.authorized());
        assert!(store.me().is_none());
        assert!(!store.loading());
        assert_eq!(store.phase(), AuthPhase::LoggedOut);
        assert_eq!(storage.peek(), None);
        // The cached user is dropped, not just masked.
        assert!(store.session.data().is_none());
    }

    #[tokio::test]
    async fn test_logout_during_startup_fetch() {
        let _owner = reactive_owner();
        let transport = MockTransport::new();
        transport.push_json(200, user_json(1, "reader"));
        let storage = MemoryTokenStorage::new();
        storage.put("persisted");
        let store = store_with(&transport, &storage);
        assert!(store.loading());

        store.logout();
        assert!(!store.loading());
        run_queued_tasks().await;

        assert!(!store.authorized());
        assert_eq!(transport.request_count(), 0);
    }

    #[tokio::test]
    async fn test_login_after_logout_clears_forced_flag() {
        let _owner = reactive_owner();
        let transport = MockTransport::new();
        transport.push_json(200, token_json("t3"));
        transport.push_json(200, user_json(2, "second"));
        let store = store_with(&transport, &MemoryTokenStorage::new());
        store.logout();

        store.login("second", "secret").await.unwrap();
        run_queued_tasks().await;

        assert!(store.authorized());
        assert_eq!(store.me().map(|u| u.id), Some(2));
    }

    #[tokio::test]
    async fn test_failed_login_after_logout_stays_unauthorized() {
        let _owner = reactive_owner();
        let transport = MockTransport::new();
        transport.push_json(200, user_json(1, "alice"));
        let storage = MemoryTokenStorage::new();
        storage.put("alice-token");
        let store = store_with(&transport, &storage);
        run_queued_tasks().await;
        assert!(store.authorized());

        store.logout();
        transport.push_status(401, r#"{"detail": "incorrect username or password"}"#);
        let error = store.login("bob", "wrong").await.unwrap_err();
        run_queued_tasks().await;

        assert_eq!(error, AuthError::InvalidCredentials);
        assert!(!store.authorized());
        assert!(store.me().is_none());
        assert_eq!(store.tokens.get(), None);
        assert_eq!(store.phase(), AuthPhase::Anonymous);
    }

    #[tokio::test]
    async fn test_second_user_login_never_reports_previous_user() {
        let _owner = reactive_owner();
        let transport = MockTransport::new();
        transport.push_json(200, user_json(1, "alice"));
        let storage = MemoryTokenStorage::new();
        storage.put("alice-token");
        let store = store_with(&transport, &storage);
        run_queued_tasks().await;
        assert_eq!(store.me().map(|u| u.login), Some("alice".to_string()));

        store.logout();
        transport.push_json_after(3, 200, token_json("bob-token"));
        transport.push_json(200, user_json(2, "bob"));

        let (result, ()) = futures::join!(store.login("bob", "secret"), async {
            tokio::task::yield_now().await;
            assert!(store.loading());
            assert!(store.me().is_none());
            assert!(!store.authorized());
        });
        result.unwrap();

        assert!(store.loading());
        assert!(store.me().is_none());

        run_queued_tasks().await;

        assert!(!store.loading());
        assert_eq!(store.me().map(|u| u.login), Some("bob".to_string()));
        assert_eq!(transport.requests()[2].bearer.as_deref(), Some("bob-token"));
    }

    #[tokio::test]
    async fn test_logout_discards_in_flight_session_fetch() {
        let _owner = reactive_owner();
        let transport = MockTransport::new();
        transport.push_json_after(3, 200, user_json(1, "alice"));
        let storage = MemoryTokenStorage::new();
        storage.put("alice-token");
        let store = store_with(&transport, &storage);

        futures::join!(run_queued_tasks(), async {
            tokio::task::yield_now().await;
            store.logout();
        });

        assert_eq!(transport.request_count(), 1);
        assert!(store.session.data().is_none());
        assert!(!store.authorized());
        assert!(!store.loading());
    }

    #[tokio::test]
    async fn test_persisted_token_starts_session_fetch() {
        let _owner = reactive_owner();
        let transport = MockTransport::new();
        transport.push_json(200, user_json(9, "returning"));
        let storage = MemoryTokenStorage::new();
        storage.put("persisted");

        let store = store_with(&transport, &storage);
        assert_eq!(store.phase(), AuthPhase::Authenticating);
        assert!(store.loading());

        run_queued_tasks().await;

        assert!(store.authorized());
        assert_eq!(transport.requests()[0].bearer.as_deref(), Some("persisted"));
    }

    #[tokio::test]
    async fn test_persisted_token_rejected_once() {
        let _owner = reactive_owner();
        let transport = MockTransport::new();
        transport.push_status(401, r#"{"detail": "Could not validate credentials"}"#);
        transport.push_json(200, user_json(9, "returning"));
        let storage = MemoryTokenStorage::new();
        storage.put("expired");

        let store = store_with(&transport, &storage);
        run_queued_tasks().await;

        assert_eq!(transport.request_count(), 1);
        assert!(!store.authorized());
        assert!(!store.loading());
        assert_eq!(store.phase(), AuthPhase::SessionInvalid);
        assert!(store.session_error().is_some_and(|e| e.is_auth_error()));
    }

    #[tokio::test]
    async fn test_transient_session_failures_resolve_once() {
        let _owner = reactive_owner();
        let transport = MockTransport::new();
        transport.push_status(500, "");
        transport.push_status(500, "");
        transport.push_json(200, user_json(9, "returning"));
        let storage = MemoryTokenStorage::new();
        storage.put("persisted");

        let store = store_with(&transport, &storage);
        let before = store.authorization();
        run_queued_tasks().await;

        assert_eq!(
            before,
            AuthorizationState {
                authorized: false,
                loading: true
            }
        );
        assert_eq!(transport.request_count(), 3);
        assert_eq!(
            store.authorization(),
            AuthorizationState {
                authorized: true,
                loading: false
            }
        );
    }

    #[tokio::test]
    async fn test_overlapping_logins_last_write_wins() {
        let _owner = reactive_owner();
        let transport = MockTransport::new();
        transport.push_json_after(2, 200, token_json("slow"));
        transport.push_json(200, token_json("fast"));
        let store = store_with(&transport, &MemoryTokenStorage::new());

        let (first, second) = futures::join!(
            store.login("reader", "secret"),
            store.login("reader", "secret")
        );

        assert!(first.is_ok() && second.is_ok());
        assert_eq!(store.tokens.get().as_deref(), Some("slow"));
        assert_eq!(store.token_requests.get_untracked(), 0);

        transport.push_json(200, user_json(1, "reader"));
        transport.push_json(200, user_json(1, "reader"));
        run_queued_tasks().await;
        assert!(store.authorized());
    }
}
