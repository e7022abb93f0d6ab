//! Unified error handling
//!
//! One typed error enum for the whole booking core. Conflict and expired
//! holds are expected, recoverable conditions; store failures on write
//! paths always propagate (read paths may fail open at the call site).

use thiserror::Error;

/// Application-level error type for the booking core
#[derive(Debug, Error)]
pub enum BookingError {
    // ========== Lookup Errors ==========
    #[error("Room not found: {0}")]
    RoomNotFound(i64),

    #[error("Room is not available for booking: {0}")]
    RoomInactive(i64),

    // ========== Validation Errors ==========
    #[error("Minimum booking duration is {required} minutes (requested {requested})")]
    BelowMinimumDuration { required: i64, requested: i64 },

    #[error("Validation failed: {0}")]
    Validation(String),

    // ========== Business Conditions ==========
    /// Commit re-validation lost the race; caller should re-select.
    #[error("Time window no longer available: {0}")]
    Conflict(String),

    /// Renew/commit on a hold that is gone or past its expiry.
    #[error("Hold expired or released: {0}")]
    HoldExpired(i64),

    // ========== System Errors ==========
    #[error("Store error: {0}")]
    Store(String),
}

impl BookingError {
    /// Create a Validation error
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Create a Conflict error
    pub fn conflict(message: impl Into<String>) -> Self {
        Self::Conflict(message.into())
    }

    /// Create a Store error
    pub fn store(message: impl Into<String>) -> Self {
        Self::Store(message.into())
    }

    /// True for conditions the caller is expected to recover from by
    /// re-running availability and prompting re-selection.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Self::Conflict(_) | Self::HoldExpired(_))
    }
}

/// Result type for booking operations
pub type BookingResult<T> = Result<T, BookingError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn conflict_and_expiry_are_recoverable() {
        assert!(BookingError::conflict("window taken").is_recoverable());
        assert!(BookingError::HoldExpired(7).is_recoverable());
        assert!(!BookingError::RoomNotFound(1).is_recoverable());
        assert!(!BookingError::store("down").is_recoverable());
    }

    #[test]
    fn messages_carry_context() {
        let err = BookingError::BelowMinimumDuration {
            required: 60,
            requested: 30,
        };
        let msg = err.to_string();
        assert!(msg.contains("60"));
        assert!(msg.contains("30"));
    }
}
