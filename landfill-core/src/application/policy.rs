//! Timeout and retry policy applied at every external call site.

use std::future::Future;
use std::time::Duration;
use tracing::warn;

use super::errors::{ClassifyError, UpstreamError};
use crate::constants::{
    DEFAULT_MODEL_TIMEOUT_SECS, DEFAULT_RETRY_ATTEMPTS, DEFAULT_RETRY_BACKOFF_MS,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts including the first one
    pub max_attempts: u32,
    /// Delay before the second attempt; grows linearly with each retry
    pub backoff: Duration,
}

impl RetryPolicy {
    pub fn none() -> Self {
        Self {
            max_attempts: 1,
            backoff: Duration::ZERO,
        }
    }

    /// Pause before the retry that follows failed attempt number `attempt`.
    pub fn delay_after(&self, attempt: u32) -> Duration {
        self.backoff.saturating_mul(attempt)
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_RETRY_ATTEMPTS,
            backoff: Duration::from_millis(DEFAULT_RETRY_BACKOFF_MS),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CallPolicy {
    pub timeout: Duration,
    pub retry: RetryPolicy,
}

impl Default for CallPolicy {
    fn default() -> Self {
        Self::new(
            Duration::from_secs(DEFAULT_MODEL_TIMEOUT_SECS),
            RetryPolicy::default(),
        )
    }
}

impl CallPolicy {
    pub fn new(timeout: Duration, retry: RetryPolicy) -> Self {
        Self { timeout, retry }
    }

    /// Runs `call` under the timeout, retrying transient upstream failures.
    ///
    /// A timeout surfaces as [`UpstreamError::Timeout`]; anything that is not
    /// a transient upstream failure is returned immediately.
    pub async fn run<T, E, F, Fut>(&self, service: &str, mut call: F) -> Result<T, ClassifyError>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, E>>,
        E: Into<ClassifyError>,
    {
        let max_attempts = self.retry.max_attempts.max(1);
        let mut attempt = 1;

        loop {
            let err = match tokio::time::timeout(self.timeout, call()).await {
                Ok(Ok(value)) => return Ok(value),
                Ok(Err(err)) => err.into(),
                Err(_) => ClassifyError::UpstreamUnavailable(UpstreamError::Timeout {
                    service: service.to_string(),
                    after: self.timeout,
                }),
            };

            if attempt >= max_attempts || !err.is_retryable() {
                return Err(err);
            }

            let delay = self.retry.delay_after(attempt);
            warn!(
                service,
                attempt,
                max_attempts,
                delay_ms = delay.as_millis() as u64,
                error = %err,
                "External call failed, retrying"
            );
            tokio::time::sleep(delay).await;
            attempt += 1;
        }
    }
}
