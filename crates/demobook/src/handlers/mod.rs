pub mod admin;
pub mod availability;
pub mod bookings;
pub mod error;
pub mod health;

use axum::http::{Method, Uri};
use chrono::NaiveDate;
use serde::Deserialize;

use demobook_core::booking::{BookingError, YearMonth};

pub use error::ApiError;

/// `?month=YYYY-MM` query parameter shared by month-scoped routes.
#[derive(Debug, Default, Deserialize)]
pub struct MonthQuery {
    pub month: Option<String>,
}

impl MonthQuery {
    /// The month, which must be present and well-formed.
    pub fn required(&self) -> Result<YearMonth, BookingError> {
        match self.month.as_deref().map(str::trim) {
            None | Some("") => Err(BookingError::MissingField("month")),
            Some(month) => month.parse(),
        }
    }
}

/// Fallback for unknown routes.
pub async fn not_found(method: Method, uri: Uri) -> ApiError {
    ApiError::NotFound(format!("{method} {}", uri.path()))
}

/// The server's local date; slots before it are never offered.
pub fn today() -> NaiveDate {
    chrono::Local::now().date_naive()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_month_query_required() {
        let query = MonthQuery {
            month: Some("2025-12".to_string()),
        };
        assert_eq!(query.required().unwrap().to_string(), "2025-12");
    }

    #[test]
    fn test_month_query_missing_or_blank() {
        assert_eq!(
            MonthQuery::default().required(),
            Err(BookingError::MissingField("month"))
        );
        let blank = MonthQuery {
            month: Some("  ".to_string()),
        };
        assert_eq!(blank.required(), Err(BookingError::MissingField("month")));
    }

    #[test]
    fn test_month_query_malformed() {
        let query = MonthQuery {
            month: Some("December".to_string()),
        };
        assert!(matches!(
            query.required(),
            Err(BookingError::InvalidMonth(_))
        ));
    }
}
