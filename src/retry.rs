//! Retry with exponential backoff for transient failures.

use std::future::Future;
use std::time::Duration;

use crate::error::Result;

/// Backoff schedule: how long to wait before retry attempt `n` (1-based).
pub type Backoff = fn(u32) -> Duration;

/// Default schedule: `2^attempt` seconds (2s, 4s, 8s, ...).
pub fn exponential(attempt: u32) -> Duration {
    Duration::from_secs(2u64.saturating_pow(attempt))
}

/// Zero-wait schedule. Keeps retry tests deterministic.
pub fn instant(_attempt: u32) -> Duration {
    Duration::ZERO
}

/// Retry policy configuration.
#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    /// Additional attempts after the first; 0 disables retry entirely.
    pub max_attempts: u32,
    pub backoff: Backoff,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            backoff: exponential,
        }
    }
}

impl RetryPolicy {
    pub fn new(max_attempts: u32) -> Self {
        Self {
            max_attempts,
            ..Self::default()
        }
    }

    /// Policy with no wait between attempts.
    pub fn instant(max_attempts: u32) -> Self {
        Self {
            max_attempts,
            backoff: instant,
        }
    }

    /// Execute an async operation, retrying transient and no-response
    /// failures. The operation is opaque to the policy; the last
    /// classified failure propagates unchanged once attempts are
    /// exhausted.
    pub async fn execute<F, Fut, T>(&self, mut operation: F) -> Result<T>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        let mut attempt = 0;
        loop {
            match operation().await {
                Ok(value) => return Ok(value),
                Err(error) if error.is_transient() && attempt < self.max_attempts => {
                    attempt += 1;
                    let wait = (self.backoff)(attempt);
                    tracing::warn!(
                        attempt,
                        max_attempts = self.max_attempts,
                        wait_secs = wait.as_secs(),
                        error = %error,
                        "retrying after transient failure"
                    );
                    if !wait.is_zero() {
                        tokio::time::sleep(wait).await;
                    }
                }
                Err(error) => return Err(error),
            }
        }
    }
}
