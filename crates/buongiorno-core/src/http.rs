//! Shared reqwest plumbing for the service adapters.

use crate::error::ServiceError;
use std::time::Duration;

/// Build an HTTP client with a per-request timeout.
pub(crate) fn build_client(
    service: &'static str,
    timeout: Duration,
) -> Result<reqwest::Client, ServiceError> {
    reqwest::Client::builder()
        .timeout(timeout)
        .user_agent(concat!("buongiorno/", env!("CARGO_PKG_VERSION")))
        .build()
        .map_err(|e| ServiceError::ClientInit {
            service,
            message: e.to_string(),
        })
}

/// Map a transport-level reqwest error to a service error.
pub(crate) fn transport_error(
    service: &'static str,
    timeout: Duration,
    error: reqwest::Error,
) -> ServiceError {
    if error.is_timeout() {
        ServiceError::Timeout {
            service,
            timeout_ms: timeout.as_millis() as u64,
        }
    } else {
        ServiceError::Request {
            service,
            message: error.to_string(),
            status_code: error.status().map(|s| s.as_u16()),
        }
    }
}

/// Turn a non-success HTTP response into a service error, keeping the body
/// for diagnostics.
pub(crate) async fn status_error(service: &'static str, resp: reqwest::Response) -> ServiceError {
    let status = resp.status();
    let text = resp.text().await.unwrap_or_default();
    ServiceError::Request {
        service,
        message: format!("HTTP {status}: {}", text.trim()),
        status_code: Some(status.as_u16()),
    }
}
