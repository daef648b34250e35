//! Availability computation.
//!
//! Pure functions: the configured slots of a month come from its settings,
//! the available ones are those minus the booked slots. "Today" is passed in
//! so callers (and tests) control the clock.

use std::collections::BTreeSet;

use chrono::{NaiveDate, NaiveTime};
use serde::Serialize;

use super::settings::{weekday_number, AvailabilitySettings};
use super::types::{Reservation, SlotKey, YearMonth};
use crate::serde::serialize_time;

/// One slot of the public availability view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SlotAvailability {
    #[serde(serialize_with = "serialize_time")]
    pub time: NaiveTime,
    pub available: bool,
    pub datetime: String,
}

/// One day of the public availability view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DayAvailability {
    pub date: NaiveDate,
    /// 0 = Sunday … 6 = Saturday.
    pub day_of_week: u8,
    pub slots: Vec<SlotAvailability>,
}

/// Availability of a whole month.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MonthAvailability {
    pub month: YearMonth,
    /// False when no settings exist for the month; `days` is then empty.
    pub configured: bool,
    pub days: Vec<DayAvailability>,
}

impl MonthAvailability {
    /// The unconfigured result: no settings means nothing is bookable.
    pub fn unconfigured(month: YearMonth) -> Self {
        Self {
            month,
            configured: false,
            days: Vec::new(),
        }
    }

    /// Number of slots that can still be booked.
    pub fn open_slot_count(&self) -> usize {
        self.days
            .iter()
            .flat_map(|day| &day.slots)
            .filter(|slot| slot.available)
            .count()
    }
}

/// Times offered on `date` by `settings`, before subtracting bookings.
///
/// Blocked days offer nothing. Non-working days offer only their `added`
/// custom times. Working days offer the generated grid minus `blocked`
/// custom times plus `added` ones.
pub fn offered_times(settings: &AvailabilitySettings, date: NaiveDate) -> BTreeSet<NaiveTime> {
    if !settings.month.contains(date) || settings.blocked_days.contains(&date) {
        return BTreeSet::new();
    }

    let mut times: BTreeSet<NaiveTime> = if settings.is_working_day(date) {
        settings.working_hours.slot_times().into_iter().collect()
    } else {
        BTreeSet::new()
    };

    if let Some(custom) = settings.custom_slots.get(&date) {
        for blocked in &custom.blocked {
            times.remove(blocked);
        }
        times.extend(custom.added.iter().copied());
    }

    times
}

/// Whether a slot is offered and not in the past. Unconfigured months offer nothing.
pub fn is_slot_offered(
    settings: Option<&AvailabilitySettings>,
    slot: &SlotKey,
    today: NaiveDate,
) -> bool {
    match settings {
        Some(settings) if slot.date >= today => {
            offered_times(settings, slot.date).contains(&slot.time)
        }
        _ => false,
    }
}

/// The set of slots occupied by reservations.
pub fn booked_slots(reservations: &[Reservation]) -> BTreeSet<SlotKey> {
    reservations.iter().map(Reservation::slot).collect()
}

/// Builds the public availability view of a month.
pub fn build_month_availability(
    month: YearMonth,
    settings: Option<&AvailabilitySettings>,
    booked: &BTreeSet<SlotKey>,
    today: NaiveDate,
) -> MonthAvailability {
    let Some(settings) = settings else {
        return MonthAvailability::unconfigured(month);
    };

    let days = month
        .days()
        .map(|date| {
            let slots = if date >= today {
                offered_times(settings, date)
                    .into_iter()
                    .map(|time| {
                        let slot = SlotKey::new(date, time);
                        SlotAvailability {
                            time,
                            available: !booked.contains(&slot),
                            datetime: slot.datetime_label(),
                        }
                    })
                    .collect()
            } else {
                Vec::new()
            };

            DayAvailability {
                date,
                day_of_week: weekday_number(date),
                slots,
            }
        })
        .collect();

    MonthAvailability {
        month,
        configured: true,
        days,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::booking::settings::CustomSlots;
    use chrono::NaiveDateTime;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn t(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    fn december() -> YearMonth {
        "2025-12".parse().unwrap()
    }

    fn reservation_at(s: &str) -> Reservation {
        let start = NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S").unwrap();
        Reservation::new("Test", "test@test.com", start)
    }

    #[test]
    fn test_unconfigured_month_is_empty_not_error() {
        let result = build_month_availability(december(), None, &BTreeSet::new(), date("2025-11-01"));
        assert!(!result.configured);
        assert!(result.days.is_empty());
        assert_eq!(result.open_slot_count(), 0);
    }

    #[test]
    fn test_weekends_have_no_slots() {
        let settings = AvailabilitySettings::new(december());
        // 2025-12-06 is a Saturday.
        assert!(offered_times(&settings, date("2025-12-06")).is_empty());
        assert_eq!(offered_times(&settings, date("2025-12-10")).len(), 12);
    }

    #[test]
    fn test_blocked_day_offers_nothing_even_with_added_slots() {
        let settings = AvailabilitySettings::new(december())
            .with_blocked_day(date("2025-12-10"))
            .with_custom_slots(
                date("2025-12-10"),
                CustomSlots {
                    blocked: vec![],
                    added: vec![t(19, 0)],
                },
            );
        assert!(offered_times(&settings, date("2025-12-10")).is_empty());
    }

    #[test]
    fn test_custom_slots_block_and_add() {
        let settings = AvailabilitySettings::new(december()).with_custom_slots(
            date("2025-12-10"),
            CustomSlots {
                blocked: vec![t(14, 0)],
                added: vec![t(19, 0)],
            },
        );
        let times = offered_times(&settings, date("2025-12-10"));
        assert!(!times.contains(&t(14, 0)));
        assert!(times.contains(&t(19, 0)));
        assert!(times.contains(&t(14, 30)));
    }

    #[test]
    fn test_added_slot_on_non_working_day() {
        let settings = AvailabilitySettings::new(december()).with_custom_slots(
            date("2025-12-06"),
            CustomSlots {
                blocked: vec![],
                added: vec![t(11, 0)],
            },
        );
        let times = offered_times(&settings, date("2025-12-06"));
        assert_eq!(times.into_iter().collect::<Vec<_>>(), vec![t(11, 0)]);
    }

    #[test]
    fn test_only_weekdays_offer_slots_by_default() {
        let settings = AvailabilitySettings::new(december());
        let result = build_month_availability(
            december(),
            Some(&settings),
            &BTreeSet::new(),
            date("2025-12-01"),
        );
        let open_days: Vec<NaiveDate> = result
            .days
            .iter()
            .filter(|d| !d.slots.is_empty())
            .map(|d| d.date)
            .collect();
        // December 2025 has 23 weekdays.
        assert_eq!(open_days.len(), 23);
        assert!(!open_days.contains(&date("2025-12-06")));
    }

    #[test]
    fn test_booked_slots_are_not_available() {
        let settings = AvailabilitySettings::new(december());
        let booked = booked_slots(&[reservation_at("2025-12-10T14:00:00")]);
        let result = build_month_availability(
            december(),
            Some(&settings),
            &booked,
            date("2025-12-01"),
        );

        assert!(result.configured);
        assert_eq!(result.days.len(), 31);

        let day = result
            .days
            .iter()
            .find(|d| d.date == date("2025-12-10"))
            .unwrap();
        assert_eq!(day.day_of_week, 3);
        let slot = day.slots.iter().find(|s| s.time == t(14, 0)).unwrap();
        assert!(!slot.available);
        assert_eq!(slot.datetime, "2025-12-10T14:00:00");
        assert!(day.slots.iter().filter(|s| s.time != t(14, 0)).all(|s| s.available));
        assert_eq!(result.open_slot_count(), 23 * 12 - 1);
    }

    #[test]
    fn test_past_days_have_no_slots() {
        let settings = AvailabilitySettings::new(december());
        let result = build_month_availability(
            december(),
            Some(&settings),
            &BTreeSet::new(),
            date("2025-12-15"),
        );
        let past = result.days.iter().find(|d| d.date == date("2025-12-10")).unwrap();
        assert!(past.slots.is_empty());
        let today = result.days.iter().find(|d| d.date == date("2025-12-15")).unwrap();
        assert_eq!(today.slots.len(), 12);
    }

    #[test]
    fn test_is_slot_offered() {
        let settings = AvailabilitySettings::new(december());
        let slot = SlotKey::new(date("2025-12-10"), t(14, 0));
        let today = date("2025-12-01");

        assert!(is_slot_offered(Some(&settings), &slot, today));
        assert!(!is_slot_offered(None, &slot, today));
        assert!(!is_slot_offered(Some(&settings), &SlotKey::new(date("2025-12-10"), t(12, 0)), today));
        assert!(!is_slot_offered(Some(&settings), &SlotKey::new(date("2025-12-10"), t(14, 15)), today));
        assert!(!is_slot_offered(Some(&settings), &slot, date("2025-12-11")));
    }

    #[test]
    fn test_availability_json_shape() {
        let settings = AvailabilitySettings::new(december());
        let result = build_month_availability(
            december(),
            Some(&settings),
            &BTreeSet::new(),
            date("2025-12-01"),
        );
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["month"], "2025-12");
        assert_eq!(json["configured"], true);
        assert_eq!(json["days"][9]["date"], "2025-12-10");
        assert_eq!(json["days"][9]["slots"][0]["time"], "10:00");
        assert_eq!(json["days"][9]["slots"][0]["available"], true);
    }
}
