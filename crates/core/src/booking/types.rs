use std::{fmt, str::FromStr};

use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime, NaiveTime, Timelike, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use uuid::Uuid;

use super::error::BookingError;
use crate::serde::{deserialize_time, format_time, parse_time, serialize_time};

pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// A calendar month, the partition unit for both reservations and settings.
///
/// Always rendered as `YYYY-MM` so store keys stay canonical even when the
/// caller sent `2025-1`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct YearMonth {
    year: i32,
    month: u32,
}

impl YearMonth {
    pub fn new(year: i32, month: u32) -> Result<Self, BookingError> {
        if !(1..=9999).contains(&year) || !(1..=12).contains(&month) {
            return Err(BookingError::InvalidMonth(format!("{year}-{month}")));
        }
        Ok(Self { year, month })
    }

    /// The month a date falls in.
    pub fn of(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn month(&self) -> u32 {
        self.month
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        date.year() == self.year && date.month() == self.month
    }

    /// Every day of the month, in order.
    pub fn days(&self) -> impl Iterator<Item = NaiveDate> {
        let month = self.month;
        NaiveDate::from_ymd_opt(self.year, self.month, 1)
            .into_iter()
            .flat_map(|first| first.iter_days())
            .take_while(move |day| day.month() == month)
    }
}

impl fmt::Display for YearMonth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

impl FromStr for YearMonth {
    type Err = BookingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || BookingError::InvalidMonth(s.to_string());
        let (year, month) = s.trim().split_once('-').ok_or_else(invalid)?;
        let year: i32 = year.parse().map_err(|_| invalid())?;
        let month: u32 = month.parse().map_err(|_| invalid())?;
        Self::new(year, month).map_err(|_| invalid())
    }
}

impl TryFrom<String> for YearMonth {
    type Error = BookingError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<YearMonth> for String {
    fn from(value: YearMonth) -> Self {
        value.to_string()
    }
}

/// A bookable (date, time) pair. Its sort key `YYYY-MM-DD#HH:MM` is the
/// uniqueness unit for reservations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SlotKey {
    pub date: NaiveDate,
    pub time: NaiveTime,
}

impl SlotKey {
    pub fn new(date: NaiveDate, time: NaiveTime) -> Self {
        Self { date, time }
    }

    /// Build a slot from the `{date}/{time}` path segments used by the admin API.
    pub fn from_parts(date: &str, time: &str) -> Result<Self, BookingError> {
        let date = NaiveDate::parse_from_str(date.trim(), DATE_FORMAT)
            .map_err(|_| BookingError::InvalidSlot(format!("bad date {date}")))?;
        let time =
            parse_time(time).map_err(|_| BookingError::InvalidSlot(format!("bad time {time}")))?;
        Ok(Self::new(date, time))
    }

    /// Parse a `YYYY-MM-DD#HH:MM` sort key.
    pub fn parse_sort_key(key: &str) -> Result<Self, BookingError> {
        let (date, time) = key
            .split_once('#')
            .ok_or_else(|| BookingError::InvalidSlot(key.to_string()))?;
        Self::from_parts(date, time)
    }

    pub fn month(&self) -> YearMonth {
        YearMonth::of(self.date)
    }

    pub fn sort_key(&self) -> String {
        format!("{}#{}", self.date.format(DATE_FORMAT), format_time(self.time))
    }

    /// Local datetime label used by the availability API, e.g. `2025-12-10T14:00:00`.
    pub fn datetime_label(&self) -> String {
        format!(
            "{}T{}:00",
            self.date.format(DATE_FORMAT),
            format_time(self.time)
        )
    }
}

impl fmt::Display for SlotKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.sort_key())
    }
}

impl From<NaiveDateTime> for SlotKey {
    /// Truncates seconds; callers that care validate them first.
    fn from(value: NaiveDateTime) -> Self {
        let time = NaiveTime::from_hms_opt(value.hour(), value.minute(), 0).unwrap_or(value.time());
        Self::new(value.date(), time)
    }
}

/// Reservation lifecycle state. Reservations are only ever created confirmed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReservationStatus {
    #[default]
    Confirmed,
}

impl ReservationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReservationStatus::Confirmed => "confirmed",
        }
    }
}

impl FromStr for ReservationStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "confirmed" => Ok(ReservationStatus::Confirmed),
            other => Err(format!("unknown reservation status: {other}")),
        }
    }
}

/// A booked demo slot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reservation {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub date: NaiveDate,
    #[serde(serialize_with = "serialize_time", deserialize_with = "deserialize_time")]
    pub time: NaiveTime,
    pub month: YearMonth,
    /// Start timestamp as validated from the request (local wall-clock time).
    pub start_time: NaiveDateTime,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profile_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub offer: Option<String>,
    #[serde(default)]
    pub answers: Map<String, Value>,
    #[serde(default)]
    pub status: ReservationStatus,
    pub created_at: DateTime<Utc>,
}

impl Reservation {
    /// Creates a confirmed reservation for the slot starting at `start_time`.
    pub fn new(
        name: impl Into<String>,
        email: impl Into<String>,
        start_time: NaiveDateTime,
    ) -> Self {
        let slot = SlotKey::from(start_time);
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            email: email.into(),
            date: slot.date,
            time: slot.time,
            month: slot.month(),
            start_time,
            profile_type: None,
            offer: None,
            answers: Map::new(),
            status: ReservationStatus::Confirmed,
            created_at: Utc::now(),
        }
    }

    pub fn with_profile_type(mut self, profile_type: Option<String>) -> Self {
        self.profile_type = profile_type;
        self
    }

    pub fn with_offer(mut self, offer: Option<String>) -> Self {
        self.offer = offer;
        self
    }

    pub fn with_answers(mut self, answers: Map<String, Value>) -> Self {
        self.answers = answers;
        self
    }

    /// Sets a specific ID (useful for testing).
    pub fn with_id(mut self, id: Uuid) -> Self {
        self.id = id;
        self
    }

    pub fn slot(&self) -> SlotKey {
        SlotKey::new(self.date, self.time)
    }
}
