//! Execution-context helpers: cancellation and bounded retry around port calls.

use crate::error::ServiceError;
use crate::retry::{self, RetryPolicy};
use std::future::Future;
use tokio_util::sync::CancellationToken;

/// Race `call` against the cancellation token.
///
/// An already-cancelled token never starts the call.
pub(crate) async fn cancellable<T, F>(
    cancel: &CancellationToken,
    service: &'static str,
    call: F,
) -> Result<T, ServiceError>
where
    F: Future<Output = Result<T, ServiceError>>,
{
    if cancel.is_cancelled() {
        return Err(ServiceError::Cancelled { service });
    }
    tokio::select! {
        biased;
        _ = cancel.cancelled() => Err(ServiceError::Cancelled { service }),
        result = call => result,
    }
}

/// Run `call` under `policy`, retrying retryable failures with exponential
/// backoff. Backoff sleeps are cut short by cancellation.
pub(crate) async fn with_retry<T, F, Fut>(
    cancel: &CancellationToken,
    service: &'static str,
    policy: RetryPolicy,
    mut call: F,
) -> Result<T, ServiceError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, ServiceError>>,
{
    let mut attempt = 0u32;
    loop {
        match cancellable(cancel, service, call()).await {
            Ok(value) => return Ok(value),
            Err(e) if policy.should_retry(attempt, &e) => {
                let delay = retry::backoff_duration(attempt, policy.base_delay_ms);
                attempt += 1;
                tracing::warn!(
                    "{service} call failed ({e}); retry {attempt}/{} after {delay:?}",
                    policy.max_retries
                );
                tokio::select! {
                    biased;
                    _ = cancel.cancelled() => return Err(ServiceError::Cancelled { service }),
                    _ = tokio::time::sleep(delay) => {}
                }
            }
            Err(e) => return Err(e),
        }
    }
}
