//! Retry loop with exponential backoff and error-kind aware short-circuiting.

use log::{debug, warn};
use std::future::Future;
use std::time::Duration;

use super::error::ApiError;

/// Default number of attempts per operation, including the first one.
pub const DEFAULT_MAX_ATTEMPTS: u32 = 3;

/// Delay before the second attempt; doubles for each attempt after that.
pub const BASE_DELAY: Duration = Duration::from_secs(1);

/// How many times an operation may run and how long to wait in between.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    max_attempts: u32,
    base_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_ATTEMPTS)
    }
}

impl RetryPolicy {
    /// A `max_attempts` of 0 is treated as 1: every call is tried at least once.
    pub fn new(max_attempts: u32) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            base_delay: BASE_DELAY,
        }
    }

    pub fn with_base_delay(mut self, base_delay: Duration) -> Self {
        self.base_delay = base_delay;
        self
    }

    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    /// Sleep taken after `attempt` failed: `base_delay * 2^(attempt-1)`.
    pub fn delay_after(&self, attempt: u32) -> Duration {
        let exponent = attempt.saturating_sub(1).min(31);
        self.base_delay.saturating_mul(1u32 << exponent)
    }

    /// Runs `operation` until it succeeds, fails with a non-retryable error,
    /// or the attempt budget is spent.
    ///
    /// On exhaustion the returned error keeps the last status seen and
    /// mentions the number of attempts made.
    pub async fn run<F, Fut, T>(&self, operation_name: &str, operation: F) -> Result<T, ApiError>
    where
        F: Fn() -> Fut,
        Fut: Future<Output = Result<T, ApiError>>,
    {
        let mut attempt = 1;

        loop {
            let error = match operation().await {
                Ok(result) => return Ok(result),
                Err(e) => e,
            };

            if !error.is_retryable() {
                debug!("{}: non-retryable error: {}", operation_name, error);
                return Err(error);
            }

            if attempt >= self.max_attempts {
                return Err(exhausted(operation_name, self.max_attempts, error));
            }

            let delay = self.delay_after(attempt);
            warn!(
                "{}: attempt {}/{} failed ({}), retrying in {}ms...",
                operation_name,
                attempt,
                self.max_attempts,
                error,
                delay.as_millis()
            );
            tokio::time::sleep(delay).await;
            attempt += 1;
        }
    }
}

fn exhausted(operation_name: &str, attempts: u32, last: ApiError) -> ApiError {
    ApiError::transient(
        last.status,
        format!(
            "{} failed after {} {}: {}",
            operation_name,
            attempts,
            if attempts == 1 { "attempt" } else { "attempts" },
            last.message
        ),
    )
}
