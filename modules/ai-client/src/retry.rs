use std::future::Future;
use std::time::Duration;

use tracing::warn;

use crate::error::AiError;

/// Delay before the first retry. Doubles on each subsequent attempt.
const BACKOFF_BASE: Duration = Duration::from_secs(1);

/// Run `op` up to `1 + retries` times, sleeping with exponential backoff
/// between attempts (1s, 2s, 4s, ...). Non-retryable errors surface
/// immediately; otherwise the last error is returned once attempts are
/// exhausted.
pub async fn with_retry<T, F, Fut>(retries: u32, mut op: F) -> Result<T, AiError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, AiError>>,
{
    let mut attempt = 0u32;
    loop {
        match op().await {
            Ok(value) => return Ok(value),
            Err(err) if !err.is_retryable() || attempt >= retries => return Err(err),
            Err(err) => {
                let backoff = BACKOFF_BASE * 2u32.pow(attempt);
                warn!(
                    attempt = attempt + 1,
                    backoff_secs = backoff.as_secs(),
                    error = %err,
                    "Generation attempt failed, retrying after backoff"
                );
                tokio::time::sleep(backoff).await;
                attempt += 1;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    #[tokio::test(start_paused = true)]
    async fn test_succeeds_after_transient_failures() {
        let attempts = AtomicU32::new(0);
        let result = with_retry(2, || {
            let n = attempts.fetch_add(1, Ordering::SeqCst);
            async move {
                if n < 2 {
                    Err(AiError::Api {
                        status: 500,
                        message: "overloaded".into(),
                    })
                } else {
                    Ok("third time")
                }
            }
        })
        .await;

        assert_eq!(result.unwrap(), "third time");
        assert_eq!(attempts.load(Ordering::SeqCst), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_auth_failure_is_not_retried() {
        let attempts = AtomicU32::new(0);
        let result: Result<(), _> = with_retry(2, || {
            attempts.fetch_add(1, Ordering::SeqCst);
            async {
                Err(AiError::Auth {
                    status: 401,
                    message: "bad key".into(),
                })
            }
        })
        .await;

        assert!(matches!(result, Err(AiError::Auth { .. })));
        assert_eq!(attempts.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_exhausted_retries_surface_last_error() {
        let attempts = AtomicU32::new(0);
        let result: Result<(), _> = with_retry(2, || {
            let n = attempts.fetch_add(1, Ordering::SeqCst);
            async move {
                Err(AiError::Api {
                    status: 500,
                    message: format!("attempt {n}"),
                })
            }
        })
        .await;

        assert_eq!(attempts.load(Ordering::SeqCst), 3);
        match result {
            Err(AiError::Api { message, .. }) => assert_eq!(message, "attempt 2"),
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_zero_retries_means_single_attempt() {
        let attempts = AtomicU32::new(0);
        let result: Result<(), _> = with_retry(0, || {
            attempts.fetch_add(1, Ordering::SeqCst);
            async { Err(AiError::EmptyResponse) }
        })
        .await;

        assert!(matches!(result, Err(AiError::EmptyResponse)));
        assert_eq!(attempts.load(Ordering::SeqCst), 1);
    }
}
