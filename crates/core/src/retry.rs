//! Bounded retry policy for read requests that propagate errors.

use std::time::Duration;

use crate::api::ApiError;

/// How often and how patiently a failed read is retried.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Retries after the first attempt.
    pub max_retries: u32,
    /// Fixed delay between attempts.
    pub delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 2,
            delay: Duration::from_secs(5),
        }
    }
}

impl RetryPolicy {
    /// A policy that never retries.
    pub fn none() -> Self {
        Self {
            max_retries: 0,
            delay: Duration::ZERO,
        }
    }

    /// Decides whether to retry after `failures` failed attempts ending in `error`.
    ///
    /// Rate limiting is never retried.
    pub fn should_retry(&self, failures: u32, error: &ApiError) -> bool {
        failures <= self.max_retries && error.is_retryable()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_policy() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.max_retries, 2);
        assert_eq!(policy.delay, Duration::from_secs(5));
    }

    #[test]
    fn test_retries_are_bounded() {
        let policy = RetryPolicy::default();
        let err = ApiError::Network("connection reset".to_string());
        assert!(policy.should_retry(1, &err));
        assert!(policy.should_retry(2, &err));
        assert!(!policy.should_retry(3, &err));
    }

    #[test]
    fn test_rate_limited_is_never_retried() {
        let policy = RetryPolicy::default();
        assert!(!policy.should_retry(1, &ApiError::RateLimited));
    }

    #[test]
    fn test_none_policy() {
        let err = ApiError::Timeout;
        assert!(!RetryPolicy::none().should_retry(1, &err));
    }
}
