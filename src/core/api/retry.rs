//! Retry policy for API calls
//!
//! Failed requests are retried with exponential backoff unless the failure is
//! final: an authorization failure means the token or the credentials are
//! wrong, and repeating the request cannot change that.

use std::future::Future;
use std::time::Duration;

use leptos::logging::warn;

use crate::core::api::ApiError;

/// Retry policy for a single logical API call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Retries allowed after the first failed attempt
    pub max_retries: u32,
    /// Delay before the first retry
    pub base_delay: Duration,
    /// Upper bound for any delay
    pub max_delay: Duration,
}

impl RetryPolicy {
    pub fn new(max_retries: u32, base_delay: Duration, max_delay: Duration) -> Self {
        Self {
            max_retries,
            base_delay,
            max_delay,
        }
    }

    /// Policy that retries without waiting
    pub fn immediate(max_retries: u32) -> Self {
        Self::new(max_retries, Duration::ZERO, Duration::ZERO)
    }

    /// Policy that never retries
    pub fn never() -> Self {
        Self::immediate(0)
    }

    /// `retries` is the number of retries already performed
    pub fn should_retry(&self, retries: u32, error: &ApiError) -> bool {
        retries < self.max_retries && error.is_retryable()
    }

    /// Delay before retry number `retries + 1`: `base * 2^retries`, capped at `max_delay`
    pub fn delay_for(&self, retries: u32) -> Duration {
        2u32.checked_pow(retries)
            .and_then(|factor| self.base_delay.checked_mul(factor))
            .map_or(self.max_delay, |delay| delay.min(self.max_delay))
    }

    /// Run `operation` until it succeeds, fails finally, or retries run out.
    pub async fn run<T, F, Fut>(&self, label: &str, mut operation: F) -> Result<T, ApiError>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, ApiError>>,
    {
        let mut retries = 0;
        loop {
            match operation().await {
                Ok(value) => return Ok(value),
                Err(error) if self.should_retry(retries, &error) => {
                    let delay = self.delay_for(retries);
                    retries += 1;
                    warn!(
                        "{} failed: {}; retry {}/{} in {:?}",
                        label, error, retries, self.max_retries, delay
                    );
                    sleep(delay).await;
                }
                Err(error) => return Err(error),
            }
        }
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new(3, Duration::from_secs(1), Duration::from_secs(30))
    }
}

#[cfg(not(any(feature = "ssr", feature = "hydrate")))]
compile_error!("retry backoff needs a timer: enable the `ssr` or the `hydrate` feature");

async fn sleep(duration: Duration) {
    if duration.is_zero() {
        return;
    }

    #[cfg(feature = "hydrate")]
    gloo_timers::future::sleep(duration).await;

    #[cfg(all(feature = "ssr", not(feature = "hydrate")))]
    tokio::time::sleep(duration).await;
}
