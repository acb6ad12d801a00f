//! Retry with exponential backoff and jitter.

use std::future::Future;
use std::time::Duration;

use crate::error::WayfinderError;

/// Retry policy for model calls.
#[derive(Debug, Clone, PartialEq)]
pub struct RetryPolicy {
    /// Maximum number of attempts (including the first).
    pub max_attempts: u32,
    /// Initial backoff duration.
    pub initial_backoff: Duration,
    /// Maximum backoff duration.
    pub max_backoff: Duration,
    /// Backoff multiplier.
    pub multiplier: f64,
}

impl Default for RetryPolicy {
    /// One attempt plus two automatic retries.
    fn default() -> Self {
        Self::with_max_retries(2)
    }
}

impl RetryPolicy {
    /// Policy allowing `retries` automatic retries after the first attempt.
    pub fn with_max_retries(retries: u32) -> Self {
        Self {
            max_attempts: retries.saturating_add(1),
            initial_backoff: Duration::from_millis(500),
            max_backoff: Duration::from_secs(30),
            multiplier: 2.0,
        }
    }

    /// Number of retries after the first attempt.
    pub fn max_retries(&self) -> u32 {
        self.max_attempts.saturating_sub(1)
    }

    /// Execute an async operation, retrying transient failures.
    ///
    /// Non-retryable errors return immediately. Once attempts are exhausted the
    /// last error is returned unchanged.
    pub async fn execute<F, Fut, T>(&self, mut operation: F) -> Result<T, WayfinderError>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, WayfinderError>>,
    {
        let max_attempts = self.max_attempts.max(1);
        let mut backoff = self.initial_backoff;
        let mut attempt = 1;

        loop {
            let err = match operation().await {
                Ok(value) => return Ok(value),
                Err(e) => e,
            };

            if !err.is_retryable() || attempt >= max_attempts {
                return Err(err);
            }

            tracing::warn!(
                attempt,
                max_attempts,
                error = %err,
                "Retrying model call after transient error"
            );

            // Jitter: 75%–125% of backoff, never shorter than a server-provided delay.
            let jitter_factor = 0.75 + (rand_factor() * 0.5);
            let mut sleep_duration = Duration::from_secs_f64(backoff.as_secs_f64() * jitter_factor);
            if let WayfinderError::RateLimited {
                retry_after_ms: Some(ms),
            } = err
            {
                sleep_duration = sleep_duration.max(Duration::from_millis(ms));
            }
            tokio::time::sleep(sleep_duration).await;

            backoff = Duration::from_secs_f64(
                (backoff.as_secs_f64() * self.multiplier).min(self.max_backoff.as_secs_f64()),
            );
            attempt += 1;
        }
    }
}

/// Simple pseudo-random factor [0, 1) without pulling in rand crate.
fn rand_factor() -> f64 {
    use std::collections::hash_map::DefaultHasher;
    use std::hash::{Hash, Hasher};

    let mut hasher = DefaultHasher::new();
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap_or_default()
        .as_nanos()
        .hash(&mut hasher);
    std::thread::current().id().hash(&mut hasher);

    (hasher.finish() % 10_000) as f64 / 10_000.0
}
