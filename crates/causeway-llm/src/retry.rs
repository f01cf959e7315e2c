//! Retry with exponential backoff for HTTP backends

use crate::LlmError;
use std::time::Duration;

/// Retry policy shared by the HTTP providers
///
/// `max_attempts` counts the first try. Delays double from `base_delay`:
/// 1s, 2s, 4s, ... with the default one-second base.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total number of attempts (at least one is always made)
    pub max_attempts: u32,

    /// Delay before the first retry
    pub base_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 4,
            base_delay: Duration::from_secs(1),
        }
    }
}

impl RetryPolicy {
    /// Create a policy
    pub fn new(max_attempts: u32, base_delay: Duration) -> Self {
        Self {
            max_attempts,
            base_delay,
        }
    }

    /// Delay before retry number `retry` (1-based)
    pub fn delay_for(&self, retry: u32) -> Duration {
        let factor = 2u32.saturating_pow(retry.saturating_sub(1));
        self.base_delay.saturating_mul(factor)
    }

    /// Run `op` until it succeeds, fails with a non-retryable error, or attempts run out
    pub fn run<T, F>(&self, label: &str, mut op: F) -> Result<T, LlmError>
    where
        F: FnMut() -> Result<T, LlmError>,
    {
        let attempts = self.max_attempts.max(1);
        let mut attempt = 1;

        loop {
            match op() {
                Ok(value) => return Ok(value),
                Err(e) if e.is_retryable() && attempt < attempts => {
                    let delay = self.delay_for(attempt);
                    tracing::warn!(
                        "{} attempt {}/{} failed: {}; retrying in {:?}",
                        label,
                        attempt,
                        attempts,
                        e,
                        delay
                    );
                    std::thread::sleep(delay);
                    attempt += 1;
                }
                Err(e) => return Err(e),
            }
        }
    }
}

/// Map a non-success HTTP status to an error
pub(crate) fn status_error(status: reqwest::StatusCode, body: String, model: &str) -> LlmError {
    if status == reqwest::StatusCode::NOT_FOUND {
        LlmError::ModelNotAvailable(model.to_string())
    } else if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
        LlmError::RateLimitExceeded
    } else if status.is_server_error() {
        LlmError::Communication(format!("HTTP {}: {}", status, body))
    } else {
        LlmError::Rejected(format!("HTTP {}: {}", status, body))
    }
}
