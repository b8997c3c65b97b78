//! Retry utilities for transient service failures.
//!
//! Retries are opt-in: the default policy makes a single attempt, so a failed
//! generation call fails the run immediately.

use crate::config::PipelineConfig;
use crate::error::ServiceError;
use std::time::Duration;

/// Upper bound for a single backoff sleep.
const MAX_BACKOFF_MS: u64 = 30_000;

/// Bounded retry policy for one pipeline stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Extra attempts after the first one
    pub max_retries: u32,
    /// Base delay for exponential backoff
    pub base_delay_ms: u64,
}

impl RetryPolicy {
    /// A policy that never retries.
    pub const fn none() -> Self {
        Self {
            max_retries: 0,
            base_delay_ms: 0,
        }
    }

    /// Whether `attempt` (0-based) may be followed by another attempt after `error`.
    pub fn should_retry(&self, attempt: u32, error: &ServiceError) -> bool {
        attempt < self.max_retries && is_retryable(error)
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::none()
    }
}

impl From<&PipelineConfig> for RetryPolicy {
    fn from(config: &PipelineConfig) -> Self {
        Self {
            max_retries: config.retry_attempts,
            base_delay_ms: config.retry_delay_ms,
        }
    }
}

/// Determine whether a service error is worth retrying.
///
/// Retryable errors: timeouts, rate limits (429), server errors (5xx), and
/// transport failures without a status. Non-retryable: client setup, auth
/// failures, bad requests, malformed payloads, cancellation.
pub fn is_retryable(error: &ServiceError) -> bool {
    match error {
        ServiceError::Timeout { .. } => true,
        ServiceError::Request {
            status_code,
            message,
            ..
        } => {
            if let Some(code) = status_code {
                return *code == 429 || (500..=599).contains(code);
            }
            message.contains("timed out") || message.contains("connect")
        }
        ServiceError::ClientInit { .. }
        | ServiceError::Decode { .. }
        | ServiceError::Cancelled { .. } => false,
    }
}

/// Calculate exponential backoff duration for a given attempt.
///
/// Uses `base_delay * 2^attempt` with a cap at 30 seconds.
pub fn backoff_duration(attempt: u32, base_delay_ms: u64) -> Duration {
    let delay = base_delay_ms.saturating_mul(2u64.saturating_pow(attempt));
    Duration::from_millis(delay.min(MAX_BACKOFF_MS))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request_error(status_code: Option<u16>, message: &str) -> ServiceError {
        ServiceError::Request {
            service: "gemini",
            message: message.to_string(),
            status_code,
        }
    }

    #[test]
    fn test_timeout_is_retryable() {
        let err = ServiceError::Timeout {
            service: "imagen",
            timeout_ms: 120_000,
        };
        assert!(is_retryable(&err));
    }

    #[test]
    fn test_rate_limit_and_server_errors_are_retryable() {
        assert!(is_retryable(&request_error(Some(429), "quota")));
        assert!(is_retryable(&request_error(Some(503), "unavailable")));
    }

    #[test]
    fn test_auth_error_not_retryable() {
        assert!(!is_retryable(&request_error(Some(401), "unauthorized")));
        assert!(!is_retryable(&request_error(Some(400), "bad request")));
    }

    #[test]
    fn test_cancelled_and_client_init_not_retryable() {
        assert!(!is_retryable(&ServiceError::Cancelled { service: "gemini" }));
        assert!(!is_retryable(&ServiceError::ClientInit {
            service: "gemini",
            message: "API key not set".to_string(),
        }));
    }

    #[test]
    fn test_connection_error_retryable_without_status() {
        assert!(is_retryable(&request_error(None, "error trying to connect")));
        assert!(!is_retryable(&request_error(None, "Processed 500 tokens")));
    }

    #[test]
    fn test_backoff_exponential() {
        assert_eq!(backoff_duration(0, 1000), Duration::from_millis(1000));
        assert_eq!(backoff_duration(1, 1000), Duration::from_millis(2000));
        assert_eq!(backoff_duration(3, 1000), Duration::from_millis(8000));
    }

    #[test]
    fn test_backoff_capped_at_30s() {
        assert_eq!(backoff_duration(10, 1000), Duration::from_millis(30_000));
    }

    #[test]
    fn test_default_policy_never_retries() {
        let policy = RetryPolicy::default();
        assert!(!policy.should_retry(0, &request_error(Some(503), "down")));
    }

    #[test]
    fn test_policy_from_config_is_bounded() {
        let policy = RetryPolicy::from(&PipelineConfig {
            retry_attempts: 2,
            retry_delay_ms: 10,
            request_timeout_ms: 1000,
        });
        let err = request_error(Some(503), "down");
        assert!(policy.should_retry(0, &err));
        assert!(policy.should_retry(1, &err));
        assert!(!policy.should_retry(2, &err));
    }
}
