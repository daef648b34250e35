use std::collections::{BTreeMap, BTreeSet};

use chrono::{DateTime, Datelike, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};

use super::error::BookingError;
use super::types::YearMonth;
use crate::serde::{deserialize_times, serialize_times};

/// Daily opening hours used to generate the slot grid.
///
/// Hours are whole hours on a 0..=24 clock; `slot_duration` is in minutes.
/// The grid starts at `start:00` and steps by `slot_duration` while the
/// hour is before `end`, skipping `[break_start, break_end)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkingHours {
    pub start: u32,
    pub end: u32,
    pub break_start: u32,
    pub break_end: u32,
    pub slot_duration: u32,
}

impl Default for WorkingHours {
    fn default() -> Self {
        Self {
            start: 10,
            end: 18,
            break_start: 12,
            break_end: 14,
            slot_duration: 30,
        }
    }
}

impl WorkingHours {
    pub fn validate(&self) -> Result<(), BookingError> {
        let invalid = |msg: &str| Err(BookingError::InvalidSettings(msg.to_string()));

        if [self.start, self.end, self.break_start, self.break_end]
            .iter()
            .any(|h| *h > 24)
        {
            return invalid("working hours must be between 0 and 24");
        }
        if self.start >= self.end {
            return invalid("working_hours.start must be before working_hours.end");
        }
        if self.break_start > self.break_end {
            return invalid("working_hours.break_start must not be after break_end");
        }
        if !(5..=240).contains(&self.slot_duration) {
            return invalid("working_hours.slot_duration must be between 5 and 240 minutes");
        }
        Ok(())
    }

    /// The generated slot times for one working day.
    ///
    /// A zero `slot_duration` yields no slots.
    pub fn slot_times(&self) -> Vec<NaiveTime> {
        let mut times = Vec::new();
        if self.slot_duration == 0 {
            return times;
        }

        let mut hour = self.start;
        let mut minute = 0;

        while hour < self.end {
            if hour >= self.break_start && hour < self.break_end {
                hour = self.break_end;
                minute = 0;
                continue;
            }

            if let Some(time) = NaiveTime::from_hms_opt(hour, minute, 0) {
                times.push(time);
            }

            minute += self.slot_duration;
            hour += minute / 60;
            minute %= 60;
        }

        times
    }
}

/// Per-date overrides on top of the generated grid.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomSlots {
    /// Generated times that are not offered on this date.
    #[serde(
        default,
        serialize_with = "serialize_times",
        deserialize_with = "deserialize_times"
    )]
    pub blocked: Vec<NaiveTime>,
    /// Extra times offered on this date, even outside the grid.
    #[serde(
        default,
        serialize_with = "serialize_times",
        deserialize_with = "deserialize_times"
    )]
    pub added: Vec<NaiveTime>,
}

/// Weekday numbering used by settings: 0 = Sunday … 6 = Saturday.
pub fn weekday_number(date: NaiveDate) -> u8 {
    date.weekday().num_days_from_sunday() as u8
}

pub fn default_working_days() -> Vec<u8> {
    vec![1, 2, 3, 4, 5]
}

/// The availability configuration of one month.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AvailabilitySettings {
    pub month: YearMonth,
    #[serde(default)]
    pub working_hours: WorkingHours,
    #[serde(default = "default_working_days")]
    pub working_days: Vec<u8>,
    #[serde(default)]
    pub blocked_days: BTreeSet<NaiveDate>,
    #[serde(default)]
    pub custom_slots: BTreeMap<NaiveDate, CustomSlots>,
    pub updated_at: DateTime<Utc>,
}

impl AvailabilitySettings {
    /// Default opening hours for a month (Mon-Fri, 10-18 with a 12-14 break).
    pub fn new(month: YearMonth) -> Self {
        Self {
            month,
            working_hours: WorkingHours::default(),
            working_days: default_working_days(),
            blocked_days: BTreeSet::new(),
            custom_slots: BTreeMap::new(),
            updated_at: Utc::now(),
        }
    }

    pub fn with_working_hours(mut self, working_hours: WorkingHours) -> Self {
        self.working_hours = working_hours;
        self
    }

    pub fn with_working_days(mut self, working_days: Vec<u8>) -> Self {
        self.working_days = working_days;
        self
    }

    pub fn with_blocked_day(mut self, date: NaiveDate) -> Self {
        self.blocked_days.insert(date);
        self
    }

    pub fn with_custom_slots(mut self, date: NaiveDate, custom: CustomSlots) -> Self {
        self.custom_slots.insert(date, custom);
        self
    }

    pub fn is_working_day(&self, date: NaiveDate) -> bool {
        self.working_days.contains(&weekday_number(date)) && !self.blocked_days.contains(&date)
    }

    pub fn validate(&self) -> Result<(), BookingError> {
        self.working_hours.validate()?;

        if let Some(day) = self.working_days.iter().find(|d| **d > 6) {
            return Err(BookingError::InvalidSettings(format!(
                "working_days must be 0 (Sunday) to 6 (Saturday), got {day}"
            )));
        }

        let foreign = self
            .blocked_days
            .iter()
            .chain(self.custom_slots.keys())
            .find(|date| !self.month.contains(**date));
        if let Some(date) = foreign {
            return Err(BookingError::InvalidSettings(format!(
                "{date} is outside {}",
                self.month
            )));
        }

        Ok(())
    }
}
