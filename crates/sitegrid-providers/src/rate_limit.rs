//! Retry with exponential backoff and jitter for provider HTTP calls.
//!
//! Transient conditions (429, network failures, 5xx) are retried. Quota,
//! API-level and parse errors are returned immediately.

use std::future::Future;
use std::time::Duration;

use crate::error::ClientError;

/// Upper bound on a single backoff sleep.
const MAX_DELAY_SECS: u64 = 60;

/// Returns `true` if `err` is worth retrying after a delay.
///
/// Retriable:
/// - [`ClientError::RateLimited`]: HTTP 429.
/// - [`ClientError::Http`]: timeout, connect failure, or 5xx.
/// - [`ClientError::UnexpectedStatus`] with a 5xx status.
///
/// Everything else fails fast.
pub(crate) fn is_retriable(err: &ClientError) -> bool {
    match err {
        ClientError::RateLimited { .. } => true,
        ClientError::Http(e) => {
            e.is_timeout() || e.is_connect() || e.status().is_some_and(|s| s.is_server_error())
        }
        ClientError::UnexpectedStatus { status, .. } => *status >= 500,
        ClientError::Deserialize { .. }
        | ClientError::QuotaExceeded(_)
        | ClientError::Api { .. }
        | ClientError::MissingCredentials(_) => false,
    }
}

/// Executes `operation` with up to `max_retries` additional attempts on
/// transient errors.
///
/// The wait before retry `n` is `backoff_base_secs * 2^(n-1)` seconds, capped
/// at 60 s and scaled by a random factor in `[0.75, 1.25)`. A rate-limit
/// response with a longer `Retry-After` wins over the computed delay.
pub(crate) async fn retry_with_backoff<T, F, Fut>(
    max_retries: u32,
    backoff_base_secs: u64,
    mut operation: F,
) -> Result<T, ClientError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, ClientError>>,
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

                let computed = backoff_base_secs.saturating_mul(1u64 << (attempt - 1).min(10));
                let floor = match &err {
                    ClientError::RateLimited { retry_after_secs } if backoff_base_secs > 0 => {
                        *retry_after_secs
                    }
                    _ => 0,
                };
                let capped = computed.max(floor).min(MAX_DELAY_SECS);
                #[allow(
                    clippy::cast_possible_truncation,
                    clippy::cast_sign_loss,
                    clippy::cast_precision_loss
                )]
                let delay_ms = (capped as f64 * 1000.0 * (rand::random::<f64>() * 0.5 + 0.75)) as u64;

                tracing::warn!(
                    attempt,
                    max_retries,
                    delay_ms,
                    error = %err,
                    "transient provider error, retrying after backoff"
                );
                tokio::time::sleep(Duration::from_millis(delay_ms)).await;
            }
        }
    }
}
