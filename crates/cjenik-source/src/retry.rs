//! Retry with exponential back-off and jitter for snapshot fetches.
//!
//! [`retry_with_backoff`] wraps a fallible async fetch and retries on
//! transient errors (network failures, 429, 5xx). `NotFound`, `AuthDenied`
//! and every other error are returned immediately.

use std::future::Future;
use std::time::Duration;

use crate::error::SourceError;

/// Upper bound on any single back-off sleep.
const MAX_DELAY_MS: u64 = 60_000;

/// Returns `true` for errors that are worth retrying after a back-off delay.
///
/// **Retriable:**
/// - [`SourceError::RateLimited`] and [`SourceError::Transient`].
/// - [`SourceError::Http`] for timeouts, connection failures, interrupted
///   bodies and 5xx statuses.
///
/// **Not retriable:** not-found, auth, unexpected status, local I/O and
/// locator errors.
pub(crate) fn is_retriable(err: &SourceError) -> bool {
    match err {
        SourceError::RateLimited { .. } | SourceError::Transient { .. } => true,
        SourceError::Http(e) => {
            e.is_timeout()
                || e.is_connect()
                || e.is_body()
                || e.is_request()
                || e.status().is_some_and(|s| s.is_server_error())
        }
        SourceError::NotFound { .. }
        | SourceError::AuthDenied { .. }
        | SourceError::UnexpectedStatus { .. }
        | SourceError::Io { .. }
        | SourceError::InvalidLocator { .. }
        | SourceError::InvalidBaseUrl { .. } => false,
    }
}

/// Computes the sleep before retry number `attempt` (1-based).
///
/// `backoff_base_ms * 2^(attempt-1)` with ±25 % jitter, never shorter than a
/// server-provided `Retry-After`, capped at [`MAX_DELAY_MS`].
fn backoff_delay_ms(backoff_base_ms: u64, attempt: u32, retry_after_secs: Option<u64>) -> u64 {
    let computed = backoff_base_ms.saturating_mul(1u64 << (attempt - 1).min(10));
    #[allow(
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss,
        clippy::cast_precision_loss
    )]
    let jittered = (computed as f64 * (rand::random::<f64>() * 0.5 + 0.75)) as u64;
    let floor = retry_after_secs.map_or(0, |s| s.saturating_mul(1_000));
    jittered.max(floor).min(MAX_DELAY_MS)
}

/// Runs `operation` with up to `max_retries` additional attempts on transient errors.
///
/// Back-off schedule with `backoff_base_ms = 500`:
///
/// | Retry | Sleep before it             |
/// |-------|-----------------------------|
/// | 1     | 500 ms × 2⁰ ± 25 % jitter   |
/// | 2     | 500 ms × 2¹ ± 25 % jitter   |
/// | 3     | 500 ms × 2² ± 25 % jitter   |
///
/// A 429 with `Retry-After` waits at least that long. Delay is capped at 60 s.
pub(crate) async fn retry_with_backoff<T, F, Fut>(
    max_retries: u32,
    backoff_base_ms: u64,
    mut operation: F,
) -> Result<T, SourceError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, SourceError>>,
{
    let mut attempt = 0u32;
    loop {
        match operation().await {
            Ok(value) => return Ok(value),
            Err(err) => {
                if !is_retriable(&err) || attempt >= max_retries {
                    return Err(err);
                }
                attempt += 1;
                let retry_after_secs = match &err {
                    SourceError::RateLimited {
                        retry_after_secs, ..
                    } => Some(*retry_after_secs),
                    _ => None,
                };
                let delay_ms = backoff_delay_ms(backoff_base_ms, attempt, retry_after_secs);
                tracing::warn!(
                    attempt,
                    max_retries,
                    delay_ms,
                    error = %err,
                    "transient snapshot fetch error, retrying after back-off"
                );
                tokio::time::sleep(Duration::from_millis(delay_ms)).await;
            }
        }
    }
}
