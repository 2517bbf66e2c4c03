//! Opt-in retry of transient service errors.

use std::future::Future;
use std::time::Duration;

use storyweaver_core::RetrySettings;
use storyweaver_error::{GenerationError, RetryableError};
use tokio_retry2::{Retry, RetryError, strategy::ExponentialBackoff, strategy::jitter};
use tracing::{debug, warn};

/// Run `operation`, retrying transient failures as `settings` allow.
///
/// With `max_retries == 0` the operation runs exactly once. Otherwise
/// transient errors (408, 429, 5xx, transport failures) are retried with
/// jittered exponential backoff; permanent errors are returned immediately.
///
/// # Arguments
///
/// * `settings` - Retry limits
/// * `operation` - Produces one attempt each time it is called
///
/// # Errors
///
/// Returns the last error once retries are exhausted, or the first
/// permanent error.
pub async fn with_retry<F, Fut, R>(
    settings: &RetrySettings,
    mut operation: F,
) -> Result<R, GenerationError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<R, GenerationError>>,
{
    if *settings.max_retries() == 0 {
        return operation().await;
    }

    debug!(
        max_retries = settings.max_retries(),
        initial_backoff_ms = settings.initial_backoff_ms(),
        max_delay_secs = settings.max_delay_secs(),
        "Retrying transient errors"
    );

    let retry_strategy = ExponentialBackoff::from_millis(*settings.initial_backoff_ms())
        .factor(2)
        .max_delay(Duration::from_secs(*settings.max_delay_secs()))
        .map(jitter)
        .take(*settings.max_retries());

    Retry::spawn(retry_strategy, || {
        let attempt = operation();
        async move {
            match attempt.await {
                Ok(value) => Ok(value),
                Err(e) => {
                    if e.is_retryable() {
                        warn!(error = %e, "Transient error, will retry");
                        Err(RetryError::Transient {
                            err: e,
                            retry_after: None,
                        })
                    } else {
                        warn!(error = %e, "Permanent error, failing immediately");
                        Err(RetryError::Permanent(e))
                    }
                }
            }
        }
    })
    .await
}
