//! Bounded transport-level retry for read operations.
//!
//! Failed reads are retried with exponential backoff, up to a fixed cap.
//! Responses in the 4xx range are never retried; retrying a rejected
//! request cannot succeed and only burns the rate limit.

use std::future::Future;
use std::time::Duration;

/// Maximum number of retries after the initial attempt.
const MAX_RETRIES: u32 = 3;

/// Delay before the first retry; doubles on each subsequent retry.
const INITIAL_DELAY: Duration = Duration::from_secs(1);

/// Classifies errors as worth retrying or terminal.
pub(crate) trait Retryable {
    fn is_retryable(&self) -> bool;
}

impl Retryable for reqwest::Error {
    fn is_retryable(&self) -> bool {
        // Transport errors carry no status and are retryable.
        self.status().map_or(true, |status| !status.is_client_error())
    }
}

/// Run `op`, retrying retryable failures with exponential backoff.
///
/// Returns the first success, or the last error once the retry budget is
/// exhausted or a non-retryable error is seen.
pub(crate) async fn with_retry<T, E, F, Fut>(mut op: F) -> Result<T, E>
where
    E: Retryable,
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
{
    let mut delay = INITIAL_DELAY;
    let mut retries_left = MAX_RETRIES;

    loop {
        match op().await {
            Ok(value) => return Ok(value),
            Err(e) if retries_left > 0 && e.is_retryable() => {
                retries_left -= 1;
                tokio::time::sleep(delay).await;
                delay *= 2;
            }
            Err(e) => return Err(e),
        }
    }
}
