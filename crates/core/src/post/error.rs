use thiserror::Error;

/// Errors raised when validating business post write requests.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum PostError {
    #[error("Post title cannot be empty")]
    EmptyTitle,
    #[error("Post content cannot be empty")]
    EmptyContent,
    #[error("Update contains no changes")]
    EmptyUpdate,
}
