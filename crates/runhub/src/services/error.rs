use runhub_core::api::ApiError;
use runhub_core::event::EventError;
use runhub_core::post::PostError;
use thiserror::Error;

/// Errors returned by the write-path services.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ServiceError {
    /// The request was rejected before reaching the backend.
    #[error("Invalid request: {0}")]
    Validation(#[from] EventError),

    #[error("Invalid post: {0}")]
    InvalidPost(#[from] PostError),

    #[error(transparent)]
    Api(#[from] ApiError),
}

/// Result type for service operations.
pub type Result<T> = std::result::Result<T, ServiceError>;
