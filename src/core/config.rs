//! API client configuration.
//!
//! The server reads it from process environment variables using
//! `ApiConfig::from_env()` after calling `dotenvy::dotenv()`. The hydrated client
//! has no process environment, so it uses `ApiConfig::from_build_env()`, which
//! captures the same variables at compile time.

use std::time::Duration;

use crate::core::api::RetryPolicy;

/// Default REST API base URL
pub const DEFAULT_API_BASE_URL: &str = "http://localhost:9000";

/// Default storage key holding the raw access token
pub const DEFAULT_TOKEN_STORAGE_KEY: &str = "book_review_access_token";

/// Default number of retries after the first failed attempt
pub const DEFAULT_MAX_RETRIES: u32 = 3;

/// Default delay before the first retry (doubles on every retry)
pub const DEFAULT_RETRY_BASE_DELAY_MS: u64 = 1_000;

/// Default upper bound for a single retry delay
pub const DEFAULT_RETRY_MAX_DELAY_MS: u64 = 30_000;

/// Configuration for talking to the Book Review REST API.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiConfig {
    /// REST API base URL without a trailing slash
    /// Example: https://api.example.com
    pub base_url: String,

    /// Key under which the access token is persisted
    pub token_storage_key: String,

    /// How many times a failed request is retried
    pub max_retries: u32,

    /// Delay before the first retry, in milliseconds
    pub retry_base_delay_ms: u64,

    /// Maximum delay between retries, in milliseconds
    pub retry_max_delay_ms: u64,
}

impl ApiConfig {
    /// Load configuration from environment variables.
    ///
    /// Call `dotenvy::dotenv()` before this to load from `.env` file.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration captured at compile time.
    pub fn from_build_env() -> Self {
        Self::from_lookup(|key| {
            let value = match key {
                "API_BASE_URL" => option_env!("API_BASE_URL"),
                "ACCESS_TOKEN_STORAGE_KEY" => option_env!("ACCESS_TOKEN_STORAGE_KEY"),
                "API_MAX_RETRIES" => option_env!("API_MAX_RETRIES"),
                "API_RETRY_BASE_DELAY_MS" => option_env!("API_RETRY_BASE_DELAY_MS"),
                "API_RETRY_MAX_DELAY_MS" => option_env!("API_RETRY_MAX_DELAY_MS"),
                _ => None,
            };
            value.map(str::to_string)
        })
    }

    /// Build configuration from an arbitrary variable lookup.
    ///
    /// Missing, empty or unparseable values fall back to the defaults.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let text = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        Self {
            base_url: text("API_BASE_URL")
                .map(|url| url.trim().trim_end_matches('/').to_string())
                .unwrap_or_else(|| DEFAULT_API_BASE_URL.to_string()),
            token_storage_key: text("ACCESS_TOKEN_STORAGE_KEY")
                .unwrap_or_else(|| DEFAULT_TOKEN_STORAGE_KEY.to_string()),
            max_retries: text("API_MAX_RETRIES")
                .and_then(|value| value.trim().parse().ok())
                .unwrap_or(DEFAULT_MAX_RETRIES),
            retry_base_delay_ms: text("API_RETRY_BASE_DELAY_MS")
                .and_then(|value| value.trim().parse().ok())
                .unwrap_or(DEFAULT_RETRY_BASE_DELAY_MS),
            retry_max_delay_ms: text("API_RETRY_MAX_DELAY_MS")
                .and_then(|value| value.trim().parse().ok())
                .unwrap_or(DEFAULT_RETRY_MAX_DELAY_MS),
        }
    }

    /// Retry policy shared by token issuance and the session fetch
    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy::new(
            self.max_retries,
            Duration::from_millis(self.retry_base_delay_ms),
            Duration::from_millis(self.retry_max_delay_ms),
        )
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self::from_lookup(|_| None)
    }
}
