//! Pure mapping of [`BookingError`] variants to HTTP status codes.

use super::BookingError;

/// Maps a [`BookingError`] to an HTTP status code.
///
/// - Slot conflicts (`SlotUnavailable`, `SlotTaken`) -> 409 (Conflict)
/// - Everything else is a malformed request -> 400 (Bad Request)
///
/// # Examples
///
/// ```
/// use demobook_core::booking::{booking_error_to_status_code, BookingError};
///
/// let error = BookingError::SlotTaken("2025-12-10#14:00".to_string());
/// assert_eq!(booking_error_to_status_code(&error), 409);
/// ```
pub fn booking_error_to_status_code(error: &BookingError) -> u16 {
    match error {
        BookingError::SlotUnavailable(_) | BookingError::SlotTaken(_) => 409,
        BookingError::MissingField(_)
        | BookingError::InvalidMonth(_)
        | BookingError::InvalidStartTime(_)
        | BookingError::InvalidEmail(_)
        | BookingError::NameTooLong
        | BookingError::InvalidSlot(_)
        | BookingError::InvalidSettings(_)
        | BookingError::MonthMismatch { .. } => 400,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slot_conflicts_map_to_409() {
        let unavailable = BookingError::SlotUnavailable("2025-12-06#10:00".to_string());
        let taken = BookingError::SlotTaken("2025-12-10#14:00".to_string());
        assert_eq!(booking_error_to_status_code(&unavailable), 409);
        assert_eq!(booking_error_to_status_code(&taken), 409);
    }

    #[test]
    fn test_validation_errors_map_to_400() {
        assert_eq!(
            booking_error_to_status_code(&BookingError::MissingField("email")),
            400
        );
        assert_eq!(
            booking_error_to_status_code(&BookingError::InvalidMonth("x".to_string())),
            400
        );
        assert_eq!(
            booking_error_to_status_code(&BookingError::MonthMismatch {
                query: "2025-12".to_string(),
                body: "2026-01".to_string(),
            }),
            400
        );
    }
}
