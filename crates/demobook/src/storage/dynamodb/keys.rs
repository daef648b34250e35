//! DynamoDB key generation functions.
//!
//! Pure functions for generating partition and sort keys following the single-table design.

use demobook_core::booking::{SlotKey, YearMonth};

pub const BOOKINGS_PREFIX: &str = "BOOKINGS#";
pub const SETTINGS_PREFIX: &str = "SETTINGS#";

/// Sort key of the one settings item in a month partition.
pub const SETTINGS_SK: &str = "AVAILABILITY";

/// Pattern: `BOOKINGS#<YYYY-MM>`
pub fn bookings_pk(month: YearMonth) -> String {
    format!("{BOOKINGS_PREFIX}{month}")
}

/// Pattern: `<YYYY-MM-DD>#<HH:MM>`
pub fn reservation_sk(slot: &SlotKey) -> String {
    slot.sort_key()
}

/// Pattern: `SETTINGS#<YYYY-MM>`
pub fn settings_pk(month: YearMonth) -> String {
    format!("{SETTINGS_PREFIX}{month}")
}

/// Human-readable `PK/SK` pair for error messages.
pub fn display_key(pk: &str, sk: &str) -> String {
    format!("{pk}/{sk}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bookings_pk() {
        let month: YearMonth = "2025-12".parse().unwrap();
        assert_eq!(bookings_pk(month), "BOOKINGS#2025-12");
    }

    #[test]
    fn test_bookings_pk_is_zero_padded() {
        let month = YearMonth::new(2026, 1).unwrap();
        assert_eq!(bookings_pk(month), "BOOKINGS#2026-01");
    }

    #[test]
    fn test_reservation_sk() {
        let slot = SlotKey::from_parts("2025-12-10", "14:00").unwrap();
        assert_eq!(reservation_sk(&slot), "2025-12-10#14:00");
    }

    #[test]
    fn test_settings_keys() {
        let month: YearMonth = "2025-12".parse().unwrap();
        assert_eq!(settings_pk(month), "SETTINGS#2025-12");
        assert_eq!(
            display_key(&settings_pk(month), SETTINGS_SK),
            "SETTINGS#2025-12/AVAILABILITY"
        );
    }

    #[test]
    fn test_sort_keys_order_chronologically() {
        let a = reservation_sk(&SlotKey::from_parts("2025-12-09", "17:30").unwrap());
        let b = reservation_sk(&SlotKey::from_parts("2025-12-10", "09:00").unwrap());
        let c = reservation_sk(&SlotKey::from_parts("2025-12-10", "14:00").unwrap());
        assert!(a < b && b < c);
    }
}
