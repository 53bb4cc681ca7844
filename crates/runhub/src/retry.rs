//! Bounded retry for reads whose errors reach the caller.

use std::future::Future;

use runhub_core::api::ApiResult;
use runhub_core::retry::RetryPolicy;

/// Runs `op` until it succeeds or `policy` gives up, sleeping between attempts.
pub async fn with_retry<T, F, Fut>(policy: RetryPolicy, operation: &str, mut op: F) -> ApiResult<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = ApiResult<T>>,
{
    let mut failures = 0;
    loop {
        match op().await {
            Ok(value) => return Ok(value),
            Err(err) => {
                failures += 1;
                if !policy.should_retry(failures, &err) {
                    return Err(err);
                }
                tracing::warn!(
                    operation,
                    attempt = failures,
                    error = %err,
                    "Request failed, retrying"
                );
                tokio::time::sleep(policy.delay).await;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use runhub_core::api::ApiError;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::time::Duration;

    fn fast(max_retries: u32) -> RetryPolicy {
        RetryPolicy {
            max_retries,
            delay: Duration::from_millis(1),
        }
    }

    #[tokio::test]
    async fn test_succeeds_after_transient_failures() {
        let attempts = AtomicU32::new(0);
        let counter = &attempts;
        let result = with_retry(fast(2), "list", move || async move {
            if counter.fetch_add(1, Ordering::SeqCst) < 2 {
                Err(ApiError::Network("reset".to_string()))
            } else {
                Ok(7)
            }
        })
        .await;

        assert_eq!(result, Ok(7));
        assert_eq!(attempts.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_gives_up_after_max_retries() {
        let attempts = AtomicU32::new(0);
        let counter = &attempts;
        let result: ApiResult<()> = with_retry(fast(2), "list", move || async move {
            counter.fetch_add(1, Ordering::SeqCst);
            Err(ApiError::Timeout)
        })
        .await;

        assert_eq!(result, Err(ApiError::Timeout));
        assert_eq!(attempts.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_rate_limit_is_not_retried() {
        let attempts = AtomicU32::new(0);
        let counter = &attempts;
        let result: ApiResult<()> = with_retry(fast(2), "list", move || async move {
            counter.fetch_add(1, Ordering::SeqCst);
            Err(ApiError::RateLimited)
        })
        .await;

        assert_eq!(result, Err(ApiError::RateLimited));
        assert_eq!(attempts.load(Ordering::SeqCst), 1);
    }
}
