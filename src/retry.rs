//! Retry with backoff around rate-limited upstream calls

use crate::{
    constants::{
        FAILURE_BACKOFF_STEP_MS, MAX_RATE_LIMIT_BACKOFF_MS, MAX_RETRY_ATTEMPTS,
        RATE_LIMIT_BACKOFF_BASE_MS,
    },
    error::ProviderError,
    rate_limiter::RateLimiter,
};
use std::future::Future;
use std::time::Duration;
use tokio::time::sleep;

/// Attempt budget and backoff schedule
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts, including the first
    pub max_attempts: u32,
    /// Base of the exponential backoff after a 429
    pub rate_limit_base: Duration,
    /// Cap of the exponential backoff after a 429
    pub rate_limit_cap: Duration,
    /// Linear step of the backoff after other failures
    pub failure_step: Duration,
}

impl RetryPolicy {
    /// Delay after a 429 on `attempt` (1-based): `min(base * 2^attempt, cap)`
    pub fn rate_limit_backoff(&self, attempt: u32) -> Duration {
        let factor = 2u32.saturating_pow(attempt);
        self.rate_limit_base
            .saturating_mul(factor)
            .min(self.rate_limit_cap)
    }

    /// Delay after any other failure on `attempt` (1-based): `step * attempt`
    pub fn failure_backoff(&self, attempt: u32) -> Duration {
        self.failure_step.saturating_mul(attempt)
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: MAX_RETRY_ATTEMPTS,
            rate_limit_base: Duration::from_millis(RATE_LIMIT_BACKOFF_BASE_MS),
            rate_limit_cap: Duration::from_millis(MAX_RATE_LIMIT_BACKOFF_MS),
            failure_step: Duration::from_millis(FAILURE_BACKOFF_STEP_MS),
        }
    }
}

/// Runs `operation` until it succeeds or the attempt budget is spent
///
/// Every attempt first passes through `limiter`. A 429 always backs off,
/// including after the final attempt; if every attempt was throttled the
/// result is [`ProviderError::RateLimitRetriesExhausted`]. Other retryable
/// failures back off linearly, and the last one is returned as is.
/// Non-retryable failures are returned immediately.
pub async fn retry<T, F, Fut>(
    limiter: &RateLimiter,
    policy: &RetryPolicy,
    mut operation: F,
) -> Result<T, ProviderError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, ProviderError>>,
{
    let max_attempts = policy.max_attempts.max(1);

    for attempt in 1..=max_attempts {
        limiter.acquire().await;

        let err = match operation().await {
            Ok(value) => return Ok(value),
            Err(e) => e,
        };

        if err.is_rate_limited() {
            let wait = policy.rate_limit_backoff(attempt);
            tracing::warn!(
                attempt = attempt,
                max_attempts = max_attempts,
                wait_ms = wait.as_millis() as u64,
                "Rate limited, backing off before retry"
            );
            sleep(wait).await;
            continue;
        }

        if !err.is_retryable() || attempt == max_attempts {
            return Err(err);
        }

        let wait = policy.failure_backoff(attempt);
        tracing::warn!(
            attempt = attempt,
            max_attempts = max_attempts,
            wait_ms = wait.as_millis() as u64,
            error = %err,
            "Request failed, retrying"
        );
        sleep(wait).await;
    }

    Err(ProviderError::RateLimitRetriesExhausted {
        attempts: max_attempts,
    })
}
