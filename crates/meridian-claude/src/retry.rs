use std::future::Future;
use std::time::Duration;

use crate::error::SummarizerError;

const MAX_DELAY_MS: u64 = 60_000;

/// HTTP 529 is Anthropic's "overloaded" status.
const OVERLOADED: u16 = 529;

/// Transient failures: timeouts, connect errors, 429, 5xx and 529.
pub(crate) fn is_retriable(err: &SummarizerError) -> bool {
    match err {
        SummarizerError::Http(e) => e.is_timeout() || e.is_connect(),
        SummarizerError::Api { status, .. } => {
            *status == 429 || *status == OVERLOADED || *status >= 500
        }
        SummarizerError::Deserialize { .. }
        | SummarizerError::EmptyResponse
        | SummarizerError::Parse(_) => false,
    }
}

/// Runs `operation` with up to `max_retries` additional attempts on transient
/// errors, backing off `backoff_base_ms * 2^(n-1)` with ±25 % jitter.
pub(crate) async fn retry_with_backoff<T, F, Fut>(
    max_retries: u32,
    backoff_base_ms: u64,
    mut operation: F,
) -> Result<T, SummarizerError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, SummarizerError>>,
{
    let mut attempt = 0u32;
    loop {
        match operation().await {
            Ok(value) => return Ok(value),
            Err(err) if is_retriable(&err) && attempt < max_retries => {
                attempt += 1;
                let capped = backoff_base_ms
                    .saturating_mul(1u64 << (attempt - 1).min(10))
                    .min(MAX_DELAY_MS);
                #[allow(
                    clippy::cast_possible_truncation,
                    clippy::cast_sign_loss,
                    clippy::cast_precision_loss
                )]
                let delay_ms = (capped as f64 * (rand::random::<f64>() * 0.5 + 0.75)) as u64;
                tracing::warn!(
                    attempt,
                    max_retries,
                    delay_ms,
                    error = %err,
                    "Claude request failed, retrying"
                );
                tokio::time::sleep(Duration::from_millis(delay_ms)).await;
            }
            Err(err) => return Err(err),
        }
    }
}
