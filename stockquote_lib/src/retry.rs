//! Caller-side retry with exponential backoff.
//!
//! Lookups themselves never retry. Callers that want to ride out a flaky
//! connection wrap the call in a [`RetryPolicy`].

use std::future::Future;
use std::time::Duration;

use rand::Rng;

use crate::market_data::LookupError;

#[derive(Debug, Clone)]
pub struct RetryPolicy {
    pub max_retries: usize,
    pub base_delay: Duration,
    pub max_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 3,
            base_delay: Duration::from_secs(2),
            max_delay: Duration::from_secs(30),
        }
    }
}

impl RetryPolicy {
    /// A policy that runs the operation exactly once.
    pub fn none() -> Self {
        Self {
            max_retries: 0,
            ..Self::default()
        }
    }

    pub fn with_max_retries(mut self, max_retries: usize) -> Self {
        self.max_retries = max_retries;
        self
    }

    fn delay_for_attempt(&self, attempt: usize) -> Duration {
        let shift = (attempt.saturating_sub(1)).min(30) as u32;
        let exp = 1u32 << shift;
        let base = self.base_delay.saturating_mul(exp).min(self.max_delay);
        let jitter = rand::thread_rng().gen_range(0.8..1.2);
        base.mul_f64(jitter)
    }

    /// Runs `f`, retrying transient (network) failures up to
    /// `max_retries` times. `Parse` and `NotFound` come back immediately.
    pub async fn run<T, F, Fut>(&self, label: &str, mut f: F) -> Result<T, LookupError>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, LookupError>>,
    {
        let mut attempt = 0usize;
        loop {
            match f().await {
                Ok(value) => return Ok(value),
                Err(err) => {
                    attempt += 1;
                    if attempt > self.max_retries || !err.is_transient() {
                        return Err(err);
                    }
                    let delay = self.delay_for_attempt(attempt);
                    tracing::warn!(
                        "{} lookup failed (attempt {}/{}), retrying in {:.1}s: {}",
                        label,
                        attempt,
                        self.max_retries,
                        delay.as_secs_f64(),
                        err
                    );
                    tokio::time::sleep(delay).await;
                }
            }
        }
    }
}
