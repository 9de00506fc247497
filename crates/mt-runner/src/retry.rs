//! Bounded retry with exponential backoff around storage operations

use mt_core::RetryConfig;
use mt_db::{DbError, DbResult};
use std::future::Future;
use std::time::Duration;

/// How often and how patiently a failing storage operation is repeated.
#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    /// Total attempts, including the first one
    pub max_attempts: u32,
    /// Delay before the second attempt
    pub initial_delay: Duration,
    /// Factor applied to the delay after every retry
    pub backoff_multiplier: u32,
    /// Errors for which another attempt is made
    pub is_retryable: fn(&DbError) -> bool,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            initial_delay: Duration::from_secs(10),
            backoff_multiplier: 2,
            is_retryable: DbError::is_retryable,
        }
    }
}

impl From<&RetryConfig> for RetryPolicy {
    fn from(config: &RetryConfig) -> Self {
        Self {
            max_attempts: config.max_attempts,
            initial_delay: Duration::from_secs(config.initial_delay_secs),
            backoff_multiplier: config.backoff_multiplier,
            ..Self::default()
        }
    }
}

impl RetryPolicy {
    /// Policy that tries exactly once
    pub fn no_retry() -> Self {
        Self {
            max_attempts: 1,
            ..Self::default()
        }
    }

    /// Replace the retryability predicate
    pub fn with_predicate(mut self, is_retryable: fn(&DbError) -> bool) -> Self {
        self.is_retryable = is_retryable;
        self
    }

    /// Delay to wait after failed attempt number `attempt` (1-based)
    pub fn delay_after(&self, attempt: u32) -> Duration {
        let factor = self
            .backoff_multiplier
            .saturating_pow(attempt.saturating_sub(1));
        self.initial_delay.saturating_mul(factor)
    }

    /// Run `op` until it succeeds, fails with a non-retryable error, or the
    /// attempts are used up. The last error is returned.
    pub async fn run<T, F, Fut>(&self, what: &str, mut op: F) -> DbResult<T>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = DbResult<T>>,
    {
        let max_attempts = self.max_attempts.max(1);
        let mut attempt = 1;
        loop {
            match op().await {
                Ok(value) => return Ok(value),
                Err(e) if attempt < max_attempts && (self.is_retryable)(&e) => {
                    let delay = self.delay_after(attempt);
                    log::warn!(
                        "{what} failed (attempt {attempt}/{max_attempts}), retrying in {}s: {e}",
                        delay.as_secs_f64()
                    );
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
                Err(e) => return Err(e),
            }
        }
    }
}

#[cfg(test)]
#[path = "retry_test.rs"]
mod tests;
