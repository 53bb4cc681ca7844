use thiserror::Error;

/// Errors surfaced by an address lookup.
///
/// Both variants are recoverable: the caller shows a hint and lets the user
/// edit the address or try again.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum GeocodeError {
    #[error("Address not found. Please check the address and try again.")]
    NotFound,
    #[error("Address lookup timed out. Please try again.")]
    Timeout,
}

impl GeocodeError {
    /// Returns true when repeating the same lookup may succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(self, GeocodeError::Timeout)
    }
}
