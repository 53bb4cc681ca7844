use thiserror::Error;

/// Errors returned by the external services behind the port traits.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ApiError {
    #[error("{resource} not found")]
    NotFound { resource: String },
    #[error("Too many requests - please wait a moment and try again")]
    RateLimited,
    #[error("Unauthorized: session token cleared")]
    Unauthorized,
    #[error("Request timed out")]
    Timeout,
    #[error("Network error: {0}")]
    Network(String),
    #[error("Server returned {status}: {message}")]
    Server { status: u16, message: String },
    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

impl ApiError {
    /// Creates a `NotFound` error for the given resource description.
    pub fn not_found(resource: impl Into<String>) -> Self {
        ApiError::NotFound {
            resource: resource.into(),
        }
    }

    /// Maps a non-success HTTP status to an error.
    pub fn from_status(status: u16, message: impl Into<String>) -> Self {
        match status {
            401 => ApiError::Unauthorized,
            404 => ApiError::not_found(message),
            408 | 504 => ApiError::Timeout,
            429 => ApiError::RateLimited,
            _ => ApiError::Server {
                status,
                message: message.into(),
            },
        }
    }

    /// Returns true when an automatic retry is allowed.
    ///
    /// Rate limiting is never retried.
    pub fn is_retryable(&self) -> bool {
        match self {
            ApiError::Timeout | ApiError::Network(_) => true,
            ApiError::Server { status, .. } => *status >= 500,
            ApiError::NotFound { .. }
            | ApiError::RateLimited
            | ApiError::Unauthorized
            | ApiError::InvalidResponse(_) => false,
        }
    }
}

/// Result type for port operations.
pub type ApiResult<T> = std::result::Result<T, ApiError>;
