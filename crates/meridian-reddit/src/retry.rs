//! Retry with exponential back-off and jitter for Reddit requests.

use std::future::Future;
use std::time::Duration;

use crate::error::CollectorError;

const MAX_DELAY_MS: u64 = 60_000;

/// Returns `true` for errors that are worth retrying after a back-off delay.
///
/// Network timeouts and connection failures, 429 responses, and 5xx statuses
/// are transient. Everything else (4xx, bad credentials, malformed bodies) is
/// returned immediately.
pub(crate) fn is_retriable(err: &CollectorError) -> bool {
    match err {
        CollectorError::Http(e) => e.is_timeout() || e.is_connect(),
        CollectorError::RateLimited { .. } => true,
        CollectorError::UnexpectedStatus { status, .. } => *status >= 500,
        CollectorError::Auth(_)
        | CollectorError::Deserialize { .. }
        | CollectorError::AllSourcesFailed { .. }
        | CollectorError::NoPosts { .. } => false,
    }
}

/// Delay before retry `attempt` (1-based).
///
/// `backoff_base_ms * 2^(attempt-1)` with ±25 % jitter. A 429 waits at least
/// as long as its `Retry-After`. Always capped at 60 s.
fn retry_delay_ms(err: &CollectorError, attempt: u32, backoff_base_ms: u64) -> u64 {
    let computed = backoff_base_ms.saturating_mul(1u64 << (attempt - 1).min(10));
    let capped = computed.min(MAX_DELAY_MS);
    #[allow(
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss,
        clippy::cast_precision_loss
    )]
    let jittered = (capped as f64 * (rand::random::<f64>() * 0.5 + 0.75)) as u64;

    let floor = match err {
        CollectorError::RateLimited {
            retry_after_secs, ..
        } => retry_after_secs.saturating_mul(1000),
        _ => 0,
    };
    jittered.max(floor).min(MAX_DELAY_MS)
}

/// Runs `operation` with up to `max_retries` additional attempts on transient errors.
///
/// See [`retry_delay_ms`] for the wait between attempts.
pub(crate) async fn retry_with_backoff<T, F, Fut>(
    max_retries: u32,
    backoff_base_ms: u64,
    mut operation: F,
) -> Result<T, CollectorError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, CollectorError>>,
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
                let delay_ms = retry_delay_ms(&err, attempt, backoff_base_ms);
                tracing::warn!(
                    attempt,
                    max_retries,
                    delay_ms,
                    error = %err,
                    "transient Reddit error, retrying after back-off"
                );
                tokio::time::sleep(Duration::from_millis(delay_ms)).await;
            }
        }
    }
}
