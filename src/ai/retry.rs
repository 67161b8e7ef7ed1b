//! Retry with exponential backoff
//!
//! Only transient failures are retried. Delays double on every attempt
//! (2s, 4s, 8s with the defaults), so an endpoint that keeps failing is given
//! up on after roughly fourteen seconds.

use std::future::Future;
use std::time::Duration;

use tokio_util::sync::CancellationToken;

use super::provider::AiError;

pub const DEFAULT_MAX_RETRIES: u32 = 3;
pub const DEFAULT_BACKOFF_BASE_MS: u64 = 2000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Retries after the first attempt
    pub max_retries: u32,
    /// Delay before the first retry
    pub base_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: DEFAULT_MAX_RETRIES,
            base_delay: Duration::from_millis(DEFAULT_BACKOFF_BASE_MS),
        }
    }
}

impl RetryPolicy {
    pub fn new(max_retries: u32, base_delay: Duration) -> Self {
        Self {
            max_retries,
            base_delay,
        }
    }

    /// Delay before retry number `retry` (0-based)
    pub fn delay_for(&self, retry: u32) -> Duration {
        self.base_delay.saturating_mul(2u32.saturating_pow(retry))
    }

    pub fn max_attempts(&self) -> u32 {
        self.max_retries + 1
    }

    /// Run `operation` until it succeeds, fails permanently, or retries run out
    ///
    /// `operation` receives the 0-based attempt number. Cancellation is
    /// honoured while waiting between attempts.
    pub async fn run<T, F, Fut>(
        &self,
        cancel: &CancellationToken,
        mut operation: F,
    ) -> Result<T, AiError>
    where
        F: FnMut(u32) -> Fut,
        Fut: Future<Output = Result<T, AiError>>,
    {
        let mut attempt = 0;
        loop {
            if cancel.is_cancelled() {
                return Err(AiError::Cancelled);
            }

            let error = match operation(attempt).await {
                Ok(value) => return Ok(value),
                Err(e) => e,
            };

            if !error.is_transient() {
                log::debug!("Attempt {} failed permanently: {}", attempt + 1, error);
                return Err(error);
            }

            if attempt >= self.max_retries {
                log::error!(
                    "Giving up after {} attempts: {}",
                    self.max_attempts(),
                    error
                );
                return Err(AiError::RetriesExhausted {
                    attempts: self.max_attempts(),
                    last: Box::new(error),
                });
            }

            let delay = self.delay_for(attempt);
            log::warn!(
                "Attempt {} failed ({}), retrying in {:?}",
                attempt + 1,
                error,
                delay
            );

            tokio::select! {
                biased;
                _ = cancel.cancelled() => return Err(AiError::Cancelled),
                _ = tokio::time::sleep(delay) => {}
            }
            attempt += 1;
        }
    }
}

#[cfg(test)]
#[path = "retry_tests.rs"]
mod retry_tests;
