use thiserror::Error;

/// Errors produced while validating or placing a booking.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum BookingError {
    #[error("{0} is required")]
    MissingField(&'static str),
    #[error("Invalid month format: {0}. Use YYYY-MM")]
    InvalidMonth(String),
    #[error("Invalid start_time format: {0}")]
    InvalidStartTime(String),
    #[error("Invalid email address: {0}")]
    InvalidEmail(String),
    #[error("Name too long (max 200 characters)")]
    NameTooLong,
    #[error("Invalid slot: {0}")]
    InvalidSlot(String),
    #[error("Invalid settings: {0}")]
    InvalidSettings(String),
    #[error("Month mismatch: query says {query}, body says {body}")]
    MonthMismatch { query: String, body: String },
    #[error("This slot is not available: {0}")]
    SlotUnavailable(String),
    #[error("This slot is already booked: {0}")]
    SlotTaken(String),
}
