//! Retry logic with exponential backoff
//!
//! [`RetryPolicy::execute`] wraps any fallible async operation. Whether a
//! failure is worth another attempt is decided by the error type through
//! the [`Retryable`] trait, so callers never encode retry rules inline.

use std::fmt::Debug;
use std::future::Future;
use std::time::Duration;
use tokio::time::sleep;
use tracing::{debug, warn};

/// Classifies an error as transient (worth retrying) or terminal
pub trait Retryable {
    /// Returns true if the failed operation may succeed when re-issued
    fn is_retryable(&self) -> bool;
}

/// Retry policy configuration
#[derive(Debug, Clone, PartialEq)]
pub struct RetryPolicy {
    /// Maximum number of attempts, including the first one
    pub max_attempts: u32,

    /// Backoff before the first retry
    pub initial_backoff: Duration,

    /// Maximum backoff duration
    pub max_backoff: Duration,

    /// Backoff multiplier (typically 2.0 for exponential backoff)
    pub backoff_multiplier: f64,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            initial_backoff: Duration::from_millis(500),
            max_backoff: Duration::from_secs(5),
            backoff_multiplier: 2.0,
        }
    }
}

impl RetryPolicy {
    /// Create a new retry policy
    pub fn new(
        max_attempts: u32,
        initial_backoff: Duration,
        max_backoff: Duration,
        backoff_multiplier: f64,
    ) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            initial_backoff,
            max_backoff,
            backoff_multiplier,
        }
    }

    /// Create a policy with no retries
    pub fn no_retry() -> Self {
        Self {
            max_attempts: 1,
            initial_backoff: Duration::ZERO,
            max_backoff: Duration::ZERO,
            backoff_multiplier: 1.0,
        }
    }

    /// Create a policy with fast retries (for testing)
    pub fn fast() -> Self {
        Self {
            max_attempts: 3,
            initial_backoff: Duration::from_millis(10),
            max_backoff: Duration::from_millis(100),
            backoff_multiplier: 2.0,
        }
    }

    /// Backoff to wait before retry number `retry` (1-based)
    pub fn backoff_duration(&self, retry: u32) -> Duration {
        if retry == 0 {
            return Duration::ZERO;
        }

        let backoff_ms = self.initial_backoff.as_millis() as f64
            * self.backoff_multiplier.powi((retry - 1) as i32);

        let backoff = Duration::from_millis(backoff_ms as u64);

        backoff.min(self.max_backoff)
    }

    /// Execute an async operation with retry logic
    ///
    /// Non-retryable errors are returned immediately. When every attempt
    /// fails the last error is returned.
    pub async fn execute<F, Fut, T, E>(&self, operation_name: &str, mut operation: F) -> Result<T, E>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, E>>,
        E: Retryable + Debug,
    {
        let max_attempts = self.max_attempts.max(1);
        let mut attempt = 0;

        loop {
            attempt += 1;
            debug!(
                operation = operation_name,
                attempt, max_attempts, "executing operation"
            );

            match operation().await {
                Ok(result) => {
                    if attempt > 1 {
                        debug!(
                            operation = operation_name,
                            retries = attempt - 1,
                            "operation succeeded after retry"
                        );
                    }
                    return Ok(result);
                }
                Err(e) if !e.is_retryable() => {
                    debug!(operation = operation_name, error = ?e, "non-retryable error");
                    return Err(e);
                }
                Err(e) if attempt >= max_attempts => {
                    warn!(
                        operation = operation_name,
                        attempts = attempt,
                        error = ?e,
                        "operation failed after all attempts"
                    );
                    return Err(e);
                }
                Err(e) => {
                    let backoff = self.backoff_duration(attempt);
                    warn!(
                        operation = operation_name,
                        attempt,
                        max_attempts,
                        error = ?e,
                        ?backoff,
                        "operation failed, retrying"
                    );
                    sleep(backoff).await;
                }
            }
        }
    }
}
