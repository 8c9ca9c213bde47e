//! Bounded retry for individual sub-fetches.

use std::future::Future;
use std::time::Duration;

use tracing::debug;

use crate::error::Result;

/// How often a sub-fetch is attempted before the failure is final.
///
/// Only transient failures are retried; a not-found or malformed answer is
/// final on the first attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts, including the first. Never zero.
    pub attempts: u32,
    /// Delay before the second attempt; doubles for each later one.
    pub backoff: Duration,
}

impl RetryPolicy {
    /// Default backoff before the second attempt.
    pub const DEFAULT_BACKOFF: Duration = Duration::from_millis(250);

    /// A single attempt.
    #[must_use]
    pub const fn none() -> Self {
        Self {
            attempts: 1,
            backoff: Self::DEFAULT_BACKOFF,
        }
    }

    /// Up to `attempts` attempts with exponential backoff starting at `backoff`.
    ///
    /// `attempts` of zero is treated as one.
    #[must_use]
    pub fn new(attempts: u32, backoff: Duration) -> Self {
        Self {
            attempts: attempts.max(1),
            backoff,
        }
    }

    /// Runs `op` until it succeeds, fails permanently, or attempts run out.
    ///
    /// # Errors
    ///
    /// Returns the last error produced by `op`.
    pub async fn run<T, F, Fut>(&self, mut op: F) -> Result<T>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        let mut delay = self.backoff;
        let mut attempt = 1;

        loop {
            match op().await {
                Ok(value) => return Ok(value),
                Err(e) if attempt < self.attempts && e.kind().is_retryable() => {
                    debug!(attempt, error = %e, "sub-fetch failed, retrying in {delay:?}");
                    tokio::time::sleep(delay).await;
                    delay = delay.saturating_mul(2);
                    attempt += 1;
                }
                Err(e) => return Err(e),
            }
        }
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::none()
    }
}
