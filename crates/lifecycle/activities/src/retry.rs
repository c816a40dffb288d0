//! Bounded exponential backoff for transient activity failures

use lifecycle_types::ActivityError;
use std::future::Future;
use std::time::Duration;

/// Retry parameters applied to one activity call.
///
/// Only transient failures are retried; a permanent failure returns
/// immediately regardless of remaining attempts.
#[derive(Clone, Copy, Debug)]
pub struct RetryPolicy {
    pub initial_interval: Duration,
    pub backoff_coefficient: f64,
    pub max_interval: Duration,
    /// Total attempts, including the first call
    pub max_attempts: u32,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            initial_interval: Duration::from_secs(10),
            backoff_coefficient: 2.0,
            max_interval: Duration::from_secs(300),
            max_attempts: 3,
        }
    }
}

impl RetryPolicy {
    /// A policy that never retries, for steps where staleness beats delay
    pub fn no_retry() -> Self {
        Self {
            max_attempts: 1,
            ..Self::default()
        }
    }

    /// Backoff interval before the given retry (1-based retry index)
    fn interval_for(&self, retry: u32) -> Duration {
        let factor = self.backoff_coefficient.powi(retry.saturating_sub(1) as i32);
        let backed_off = self.initial_interval.mul_f64(factor);
        backed_off.min(self.max_interval)
    }
}

/// Run an activity call under a retry policy.
///
/// The closure is re-invoked for each attempt; it must capture everything it
/// needs to rebuild the request.
pub async fn call_with_retry<T, F, Fut>(
    policy: &RetryPolicy,
    name: &'static str,
    mut call: F,
) -> Result<T, ActivityError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, ActivityError>>,
{
    let mut attempt = 1u32;
    loop {
        match call().await {
            Ok(value) => return Ok(value),
            Err(err) if err.is_transient() && attempt < policy.max_attempts => {
                let backoff = policy.interval_for(attempt);
                tracing::warn!(
                    activity = name,
                    attempt,
                    backoff_secs = backoff.as_secs(),
                    error = %err,
                    "transient activity failure, retrying"
                );
                tokio::time::sleep(backoff).await;
                attempt += 1;
            }
            Err(err) => return Err(err),
        }
    }
}
