use std::future::Future;
use std::time::Duration;

use crate::error::{classify, AppResult};

/// Bounded exponential backoff for remote calls
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts including the first one; 0 is treated as 1
    pub max_attempts: u32,
    pub base_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_delay: Duration::from_millis(1000),
        }
    }
}

impl RetryPolicy {
    pub fn new(max_attempts: u32, base_delay: Duration) -> Self {
        Self {
            max_attempts,
            base_delay,
        }
    }

    /// Single attempt, no backoff
    pub fn none() -> Self {
        Self::new(1, Duration::ZERO)
    }

    /// Delay before the attempt following `attempt_index` (zero-based)
    pub fn delay_for(&self, attempt_index: u32) -> Duration {
        let factor = 2u32.checked_pow(attempt_index).unwrap_or(u32::MAX);
        self.base_delay.saturating_mul(factor)
    }

    fn attempts(&self) -> u32 {
        self.max_attempts.max(1)
    }
}

/// Runs `operation` until it succeeds, fails permanently, or attempts run out
///
/// Only network failures and 5xx backend errors are retried. Everything else
/// is returned on the spot.
pub async fn execute_with_retry<T, F, Fut>(policy: &RetryPolicy, operation: F) -> AppResult<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = AppResult<T>>,
{
    execute_with_retry_using(policy, operation, tokio::time::sleep).await
}

/// Same as [`execute_with_retry`] with a caller-supplied sleep
pub async fn execute_with_retry_using<T, F, Fut, S, SFut>(
    policy: &RetryPolicy,
    mut operation: F,
    mut sleep: S,
) -> AppResult<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = AppResult<T>>,
    S: FnMut(Duration) -> SFut,
    SFut: Future<Output = ()>,
{
    let max_attempts = policy.attempts();
    let mut attempt = 0;

    loop {
        let error = match operation().await {
            Ok(value) => return Ok(value),
            Err(e) => e,
        };

        if !error.is_retryable() || attempt + 1 >= max_attempts {
            return Err(error);
        }

        let delay = policy.delay_for(attempt);
        let classified = classify(&error);
        tracing::warn!(
            attempt = attempt + 1,
            max_attempts,
            delay_ms = delay.as_millis() as u64,
            code = classified.code,
            category = %classified.category,
            "Operation failed, retrying"
        );

        sleep(delay).await;
        attempt += 1;
    }
}
