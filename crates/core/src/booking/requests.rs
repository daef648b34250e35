//! API request types for booking operations.
//!
//! Following the Functional Core pattern, these are pure data types plus the
//! validation that turns them into domain values. No I/O.

use std::collections::{BTreeMap, BTreeSet};

use chrono::{DateTime, NaiveDate, NaiveDateTime, Timelike, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::error::BookingError;
use super::settings::{default_working_days, AvailabilitySettings, CustomSlots, WorkingHours};
use super::types::{Reservation, YearMonth};
use crate::serde::{deserialize_object_or_null, deserialize_optional_string};

const MAX_NAME_LEN: usize = 200;

/// Request payload for `POST /api/book-demo`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BookDemoRequest {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    /// ISO-8601 local time, e.g. `2025-12-10T14:00:00`.
    #[serde(default)]
    pub start_time: String,
    #[serde(default, deserialize_with = "deserialize_optional_string")]
    pub profile_type: Option<String>,
    #[serde(default, deserialize_with = "deserialize_optional_string")]
    pub offer: Option<String>,
    #[serde(default, deserialize_with = "deserialize_object_or_null")]
    pub answers: Map<String, Value>,
}

impl BookDemoRequest {
    pub fn new(
        name: impl Into<String>,
        email: impl Into<String>,
        start_time: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
            start_time: start_time.into(),
            ..Self::default()
        }
    }

    /// Validate the payload and build the reservation it asks for.
    ///
    /// Does not check availability; that needs the store.
    pub fn into_reservation(self) -> Result<Reservation, BookingError> {
        let name = self.name.trim();
        let email = self.email.trim();
        let start_time = self.start_time.trim();

        if name.is_empty() {
            return Err(BookingError::MissingField("name"));
        }
        if email.is_empty() {
            return Err(BookingError::MissingField("email"));
        }
        if start_time.is_empty() {
            return Err(BookingError::MissingField("start_time"));
        }
        if name.chars().count() > MAX_NAME_LEN {
            return Err(BookingError::NameTooLong);
        }
        validate_email(email)?;

        let start = parse_start_time(start_time)?;
        if start.second() != 0 || start.nanosecond() != 0 {
            return Err(BookingError::InvalidStartTime(format!(
                "{start_time} does not start on a whole minute"
            )));
        }

        Ok(Reservation::new(name, email, start)
            .with_profile_type(self.profile_type)
            .with_offer(self.offer)
            .with_answers(self.answers))
    }
}

/// Parse a booking start time.
///
/// Accepts `YYYY-MM-DDTHH:MM[:SS]` as local wall-clock time. A trailing `Z`
/// or a UTC offset is tolerated and dropped: the wall-clock part is the slot.
pub fn parse_start_time(s: &str) -> Result<NaiveDateTime, BookingError> {
    let s = s.trim();
    let plain = s.strip_suffix('Z').unwrap_or(s);

    ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M"]
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(plain, format).ok())
        .or_else(|| {
            DateTime::parse_from_rfc3339(s)
                .ok()
                .map(|dt| dt.naive_local())
        })
        .ok_or_else(|| BookingError::InvalidStartTime(s.to_string()))
}

/// Minimal structural email check: one `@`, non-empty local part, a dotted domain.
pub fn validate_email(email: &str) -> Result<(), BookingError> {
    let invalid = || BookingError::InvalidEmail(email.to_string());

    let (local, domain) = email.split_once('@').ok_or_else(invalid)?;
    if local.is_empty()
        || domain.contains('@')
        || email.chars().any(char::is_whitespace)
        || !domain.contains('.')
        || domain.starts_with('.')
        || domain.ends_with('.')
    {
        return Err(invalid());
    }
    Ok(())
}

/// Request payload for `PUT /api/admin/settings`.
///
/// A full replace: absent fields take their defaults rather than keeping
/// the previously stored values.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateSettingsRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub month: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub working_hours: Option<WorkingHours>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub working_days: Option<Vec<u8>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub blocked_days: Option<BTreeSet<NaiveDate>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_slots: Option<BTreeMap<NaiveDate, CustomSlots>>,
}

impl UpdateSettingsRequest {
    pub fn new(month: impl Into<String>) -> Self {
        Self {
            month: Some(month.into()),
            ..Self::default()
        }
    }

    pub fn with_working_hours(mut self, working_hours: WorkingHours) -> Self {
        self.working_hours = Some(working_hours);
        self
    }

    pub fn with_working_days(mut self, working_days: Vec<u8>) -> Self {
        self.working_days = Some(working_days);
        self
    }

    /// Resolve the target month from the query string and/or the body.
    pub fn resolve_month(&self, query_month: Option<&str>) -> Result<YearMonth, BookingError> {
        let body = self.month.as_deref().map(str::trim).filter(|m| !m.is_empty());
        let query = query_month.map(str::trim).filter(|m| !m.is_empty());

        match (query, body) {
            (None, None) => Err(BookingError::MissingField("month")),
            (Some(month), None) | (None, Some(month)) => month.parse(),
            (Some(query), Some(body)) => {
                let from_query: YearMonth = query.parse()?;
                let from_body: YearMonth = body.parse()?;
                if from_query != from_body {
                    return Err(BookingError::MonthMismatch {
                        query: from_query.to_string(),
                        body: from_body.to_string(),
                    });
                }
                Ok(from_query)
            }
        }
    }

    /// Build the validated settings record that replaces the stored one.
    pub fn into_settings(
        self,
        query_month: Option<&str>,
        now: DateTime<Utc>,
    ) -> Result<AvailabilitySettings, BookingError> {
        let month = self.resolve_month(query_month)?;

        let mut working_days = self.working_days.unwrap_or_else(default_working_days);
        working_days.sort_unstable();
        working_days.dedup();

        let settings = AvailabilitySettings {
            month,
            working_hours: self.working_hours.unwrap_or_default(),
            working_days,
            blocked_days: self.blocked_days.unwrap_or_default(),
            custom_slots: self.custom_slots.unwrap_or_default(),
            updated_at: now,
        };
        settings.validate()?;

        Ok(settings)
    }
}
