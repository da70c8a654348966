//! Retry policies for transient database failures
//!
//! A policy retries an operation with exponential backoff while the error
//! it returns is transient (`DatabaseError::is_transient`). Policies are
//! resolved per dialect: one for acquiring connections, one for re-running
//! whole units of work.

use std::future::Future;
use std::time::Duration;

use tracing::warn;

use crate::error::DatabaseError;

/// Exponential backoff retry policy
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    max_attempts: u32,
    base_delay: Duration,
    max_delay: Duration,
}

impl RetryPolicy {
    /// A policy that runs the operation exactly once
    pub fn none() -> Self {
        Self {
            max_attempts: 1,
            base_delay: Duration::ZERO,
            max_delay: Duration::ZERO,
        }
    }

    /// Creates an exponential backoff policy
    ///
    /// # Arguments
    ///
    /// * `max_attempts` - Total attempts including the first (at least 1)
    /// * `base_delay` - Delay before the second attempt
    /// * `max_delay` - Upper bound for any single delay
    pub fn exponential(max_attempts: u32, base_delay: Duration, max_delay: Duration) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            base_delay,
            max_delay,
        }
    }

    /// Total number of attempts this policy allows
    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    /// Delay to wait after the given failed attempt (1-based)
    pub fn delay_for(&self, attempt: u32) -> Duration {
        let exponent = attempt.saturating_sub(1).min(16);
        self.base_delay
            .saturating_mul(1u32 << exponent)
            .min(self.max_delay)
    }

    /// Returns true if another attempt should follow the given failure
    pub fn should_retry(&self, attempt: u32, error: &DatabaseError) -> bool {
        attempt < self.max_attempts && error.is_transient()
    }

    /// Runs `operation` until it succeeds, fails permanently, or the
    /// attempts are exhausted
    pub async fn execute<T, F, Fut>(&self, operation: &str, mut op: F) -> Result<T, DatabaseError>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, DatabaseError>>,
    {
        let mut attempt = 1;
        loop {
            match op().await {
                Ok(value) => return Ok(value),
                Err(error) if self.should_retry(attempt, &error) => {
                    let delay = self.delay_for(attempt);
                    warn!(
                        operation,
                        attempt,
                        delay_ms = delay.as_millis() as u64,
                        error = %error,
                        "Transient database failure, retrying"
                    );
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
                Err(error) => return Err(error),
            }
        }
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::none()
    }
}
