//! "Who am I" session fetch
//!
//! Issues `GET /users/me` with the current token and keeps the result in
//! signals. Only the most recently started fetch may publish its result.

use leptos::logging::{log, warn};
use leptos::prelude::*;

use crate::core::api::{ApiClient, ApiError, RetryPolicy, User};

/// Session fetch state
#[derive(Clone, Copy)]
pub struct SessionFetcher {
    client: StoredValue<ApiClient>,
    retry: RetryPolicy,
    forced_logout: RwSignal<bool>,
    data: RwSignal<Option<User>>,
    error: RwSignal<Option<ApiError>>,
    loading: RwSignal<bool>,
    generation: StoredValue<u64>,
}

impl SessionFetcher {
    /// `forced_logout` is owned by the auth controller; a forced logout disables the fetch
    pub fn new(client: ApiClient, retry: RetryPolicy, forced_logout: RwSignal<bool>) -> Self {
        Self {
            client: StoredValue::new(client),
            retry,
            forced_logout,
            data: RwSignal::new(None),
            error: RwSignal::new(None),
            loading: RwSignal::new(false),
            generation: StoredValue::new(0),
        }
    }

    /// Last fetched user (reactive, not masked by logout)
    pub fn data(&self) -> Option<User> {
        self.data.get()
    }

    /// Error of the last settled fetch (reactive)
    pub fn error(&self) -> Option<ApiError> {
        self.error.get()
    }

    pub fn is_loading(&self) -> bool {
        self.loading.get()
    }

    /// Fetching makes sense only with a token and without a forced logout
    pub fn is_enabled(&self) -> bool {
        self.client.with_value(|client| client.tokens().get().is_some())
            && !self.forced_logout.get_untracked()
    }

    /// Mark a fetch as pending ahead of a spawned [`refetch`](Self::refetch)
    pub fn prime(&self) {
        if self.is_enabled() {
            self.loading.set(true);
        }
    }

    /// Drop the cached result and discard any fetch still in flight.
    ///
    /// Called whenever the token changes, so a user fetched with an old token
    /// is never reported for a new one.
    pub fn invalidate(&self) {
        self.generation.update_value(|generation| *generation += 1);
        self.data.set(None);
        self.error.set(None);
        self.loading.set(false);
    }

    /// Fetch the current user, retrying transient failures.
    ///
    /// A 401/403 is final: the cached user is dropped and the error recorded.
    /// Other failures keep the previously fetched user.
    pub async fn refetch(&self) {
        if !self.is_enabled() {
            self.loading.set(false);
            return;
        }

        let generation = self.next_generation();
        self.loading.set(true);

        let client = self.client.get_value();
        let result = self
            .retry
            .run("Session fetch", || client.current_user())
            .await;

        if self.generation.get_value() != generation {
            log!("Session fetch superseded by a newer fetch");
            return;
        }

        match result {
            Ok(user) => {
                log!("Session confirmed for user {}", user.login);
                self.error.set(None);
                self.data.set(Some(user));
            }
            Err(error) if error.is_auth_error() => {
                log!("Session rejected: {}", error);
                self.data.set(None);
                self.error.set(Some(error));
            }
            Err(error) => {
                warn!("Session fetch failed: {}", error);
                self.error.set(Some(error));
            }
        }
        self.loading.set(false);
    }

    fn next_generation(&self) -> u64 {
        self.generation.update_value(|generation| *generation += 1);
        self.generation.get_value()
    }
}
