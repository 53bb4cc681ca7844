use thiserror::Error;

/// Errors raised when validating event write requests.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum EventError {
    #[error("Title must be at least 3 characters")]
    TitleTooShort,
    #[error("Address must be at least 5 characters")]
    AddressTooShort,
    #[error("Description must be at least 10 characters")]
    DescriptionTooShort,
    #[error("Distance must be between 1 and 50 km, got {0}")]
    DistanceOutOfRange(f64),
    #[error("Pace must be between 3 and 12 min/km, got {0}")]
    PaceOutOfRange(f64),
    #[error("Max participants must be between 1 and 1000, got {0}")]
    MaxParticipantsOutOfRange(u32),
    #[error("Update contains no changes")]
    EmptyPatch,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_error_display() {
        assert_eq!(
            EventError::TitleTooShort.to_string(),
            "Title must be at least 3 characters"
        );
        assert_eq!(
            EventError::DistanceOutOfRange(60.0).to_string(),
            "Distance must be between 1 and 50 km, got 60"
        );
        assert_eq!(
            EventError::MaxParticipantsOutOfRange(0).to_string(),
            "Max participants must be between 1 and 1000, got 0"
        );
    }
}
