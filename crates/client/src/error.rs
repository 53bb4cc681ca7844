//! Client error types.

use runhub_core::api::ApiError;
use thiserror::Error;

/// Result type alias for client module.
pub type Result<T> = std::result::Result<T, ClientError>;

/// Errors that can occur while talking to an external service.
#[derive(Error, Debug)]
pub enum ClientError {
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Server returned {status}: {message}")]
    ServerError { status: u16, message: String },

    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl From<ClientError> for ApiError {
    fn from(err: ClientError) -> Self {
        match err {
            ClientError::Request(e) if e.is_timeout() => ApiError::Timeout,
            ClientError::Request(e) if e.is_decode() => ApiError::InvalidResponse(e.to_string()),
            ClientError::Request(e) => match e.status() {
                Some(status) => ApiError::from_status(status.as_u16(), e.to_string()),
                None => ApiError::Network(e.to_string()),
            },
            ClientError::ServerError { status, message } => ApiError::from_status(status, message),
            ClientError::InvalidUrl(e) => ApiError::Network(e.to_string()),
            ClientError::Json(e) => ApiError::InvalidResponse(e.to_string()),
        }
    }
}
