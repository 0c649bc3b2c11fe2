//! Access token persistence
//!
//! The [`TokenStore`] keeps the current access token in a reactive signal and
//! mirrors every change to a [`TokenStorage`] backend so the token survives
//! reloads. Storage failures are logged and never reach the caller.

use std::sync::{Arc, Mutex};

use leptos::logging::warn;
use leptos::prelude::*;

/// Token storage error types
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StorageError {
    #[error("Storage is not available")]
    Unavailable,

    #[error("Storage operation failed: {0}")]
    Operation(String),
}

/// Durable location of the raw access token
pub trait TokenStorage: Send + Sync {
    fn load(&self) -> Result<Option<String>, StorageError>;
    fn save(&self, token: &str) -> Result<(), StorageError>;
    fn remove(&self) -> Result<(), StorageError>;
}

/// In-process storage, used on the server and in tests.
///
/// Clones share the same slot, so a clone handed to a new store behaves like
/// storage that survived a reload.
#[derive(Debug, Clone, Default)]
pub struct MemoryTokenStorage {
    slot: Arc<Mutex<Option<String>>>,
}

impl MemoryTokenStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed the slot directly
    pub fn put(&self, token: &str) {
        if let Ok(mut slot) = self.slot.lock() {
            *slot = Some(token.to_string());
        }
    }

    /// Current slot content
    pub fn peek(&self) -> Option<String> {
        self.slot.lock().ok().and_then(|slot| slot.clone())
    }
}

impl TokenStorage for MemoryTokenStorage {
    fn load(&self) -> Result<Option<String>, StorageError> {
        self.slot
            .lock()
            .map(|slot| slot.clone())
            .map_err(|e| StorageError::Operation(e.to_string()))
    }

    fn save(&self, token: &str) -> Result<(), StorageError> {
        let mut slot = self
            .slot
            .lock()
            .map_err(|e| StorageError::Operation(e.to_string()))?;
        *slot = Some(token.to_string());
        Ok(())
    }

    fn remove(&self) -> Result<(), StorageError> {
        let mut slot = self
            .slot
            .lock()
            .map_err(|e| StorageError::Operation(e.to_string()))?;
        *slot = None;
        Ok(())
    }
}

/// Browser `localStorage` backend
#[cfg(not(feature = "ssr"))]
#[derive(Debug, Clone)]
pub struct LocalTokenStorage {
    key: String,
}

#[cfg(not(feature = "ssr"))]
impl LocalTokenStorage {
    pub fn new(key: impl Into<String>) -> Self {
        Self { key: key.into() }
    }

    fn storage() -> Result<leptos::web_sys::Storage, StorageError> {
        let window = leptos::web_sys::window().ok_or(StorageError::Unavailable)?;
        window
            .local_storage()
            .map_err(|e| StorageError::Operation(format!("{:?}", e)))?
            .ok_or(StorageError::Unavailable)
    }
}

#[cfg(not(feature = "ssr"))]
impl TokenStorage for LocalTokenStorage {
    fn load(&self) -> Result<Option<String>, StorageError> {
        Self::storage()?
            .get_item(&self.key)
            .map_err(|e| StorageError::Operation(format!("{:?}", e)))
    }

    fn save(&self, token: &str) -> Result<(), StorageError> {
        Self::storage()?
            .set_item(&self.key, token)
            .map_err(|e| StorageError::Operation(format!("{:?}", e)))
    }

    fn remove(&self) -> Result<(), StorageError> {
        Self::storage()?
            .remove_item(&self.key)
            .map_err(|e| StorageError::Operation(format!("{:?}", e)))
    }
}

/// Reactive access token holder
#[derive(Clone, Copy)]
pub struct TokenStore {
    token: RwSignal<Option<String>>,
    backend: StoredValue<Box<dyn TokenStorage>>,
}

impl TokenStore {
    /// Create the store and load the persisted token, if any
    pub fn new(backend: impl TokenStorage + 'static) -> Self {
        let initial = backend.load().unwrap_or_else(|e| {
            warn!("Failed to read persisted access token: {}", e);
            None
        });

        Self {
            token: RwSignal::new(initial),
            backend: StoredValue::new(Box::new(backend) as Box<dyn TokenStorage>),
        }
    }

    /// Current token, without subscribing
    pub fn get(&self) -> Option<String> {
        self.token.get_untracked()
    }

    /// Whether a token is present (reactive)
    pub fn is_present(&self) -> bool {
        self.token.with(Option::is_some)
    }

    /// Replace the token
    pub fn set(&self, token: impl Into<String>) {
        let token = token.into();
        if let Err(e) = self.backend.with_value(|backend| backend.save(&token)) {
            warn!("Failed to persist access token: {}", e);
        }
        self.token.set(Some(token));
    }

    /// Drop the token
    pub fn clear(&self) {
        if let Err(e) = self.backend.with_value(|backend| backend.remove()) {
            warn!("Failed to remove persisted access token: {}", e);
        }
        self.token.set(None);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::testing::reactive_owner;

    struct BrokenStorage;

    impl TokenStorage for BrokenStorage {
        fn load(&self) -> Result<Option<String>, StorageError> {
            Err(StorageError::Unavailable)
        }

        fn save(&self, _token: &str) -> Result<(), StorageError> {
            Err(StorageError::Operation("quota exceeded".to_string()))
        }

        fn remove(&self) -> Result<(), StorageError> {
            Err(StorageError::Unavailable)
        }
    }

    #[test]
    fn test_store_starts_empty() {
        let _owner = reactive_owner();
        let store = TokenStore::new(MemoryTokenStorage::new());
        assert_eq!(store.get(), None);
    }

    #[test]
    fn test_store_loads_persisted_token() {
        let _owner = reactive_owner();
        let storage = MemoryTokenStorage::new();
        storage.put("persisted");

        let store = TokenStore::new(storage);
        assert_eq!(store.get().as_deref(), Some("persisted"));
    }

    #[test]
    fn test_set_and_clear_write_through() {
        let _owner = reactive_owner();
        let storage = MemoryTokenStorage::new();
        let store = TokenStore::new(storage.clone());

        store.set("first");
        store.set("second");
        assert_eq!(store.get().as_deref(), Some("second"));
        assert_eq!(storage.peek().as_deref(), Some("second"));

        store.clear();
        assert_eq!(store.get(), None);
        assert_eq!(storage.peek(), None);
    }

    #[test]
    fn test_token_survives_reload() {
        let _owner = reactive_owner();
        let storage = MemoryTokenStorage::new();
        TokenStore::new(storage.clone()).set("kept");

        let reloaded = TokenStore::new(storage);
        assert_eq!(reloaded.get().as_deref(), Some("kept"));
    }

    #[test]
    fn test_storage_failures_do_not_propagate() {
        let _owner = reactive_owner();
        let store = TokenStore::new(BrokenStorage);
        assert_eq!(store.get(), None);

        store.set("in-memory");
        assert_eq!(store.get().as_deref(), Some("in-memory"));

        store.clear();
        assert_eq!(store.get(), None);
    }
}
