//! Retry loop with per-attempt deadline and exponential backoff.

use super::FetchConfig;
use crate::error::{DataError, Result};
use std::future::Future;
use tokio::time::{sleep, timeout};
use tracing::{debug, warn};

/// Run `attempt` until it succeeds or the retry budget is spent.
///
/// Each attempt is cancelled once it exceeds `config.timeout` and counts as a
/// failure. Between attempts the loop sleeps `config.backoff_delay(n)`. The
/// error of the last attempt is returned when all of them fail.
pub async fn retry_with_backoff<T, F, Fut>(
    config: &FetchConfig,
    label: &str,
    mut attempt: F,
) -> Result<T>
where
    F: FnMut(u32) -> Fut,
    Fut: Future<Output = Result<T>>,
{
    let mut n = 0;
    loop {
        debug!(target: "karachi::fetch", url = label, attempt = n, "attempt");
        let outcome = match timeout(config.timeout, attempt(n)).await {
            Ok(result) => result,
            Err(_) => Err(DataError::Timeout {
                url: label.to_string(),
                after: config.timeout,
            }),
        };

        match outcome {
            Ok(value) => return Ok(value),
            Err(err) if n < config.max_retries => {
                let delay = config.backoff_delay(n);
                warn!(
                    target: "karachi::fetch",
                    url = label,
                    attempt = n,
                    delay = ?delay,
                    error = %err,
                    "attempt failed, backing off"
                );
                sleep(delay).await;
                n += 1;
            }
            Err(err) => {
                warn!(
                    target: "karachi::fetch",
                    url = label,
                    attempts = n + 1,
                    error = %err,
                    "giving up"
                );
                return Err(err);
            }
        }
    }
}
