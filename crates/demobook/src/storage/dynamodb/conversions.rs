//! DynamoDB attribute conversion functions.
//!
//! Pure functions for converting between DynamoDB AttributeValue maps and domain types.
//! These are testable in isolation without DynamoDB access.

use std::collections::HashMap;

use aws_sdk_dynamodb::types::AttributeValue;
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{de::DeserializeOwned, Serialize};
use uuid::Uuid;

use demobook_core::booking::{
    AvailabilitySettings, BookingError, Reservation, ReservationStatus, YearMonth, DATE_FORMAT,
};
use demobook_core::serde::{format_time, parse_time};
use demobook_core::storage::RepositoryError;

use super::keys;

pub const ENTITY_TYPE_RESERVATION: &str = "RESERVATION";
pub const ENTITY_TYPE_SETTINGS: &str = "SETTINGS";

const START_TIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

// ============================================================================
// Reservation conversions
// ============================================================================

/// Convert a Reservation to DynamoDB item.
pub fn reservation_to_item(
    reservation: &Reservation,
) -> Result<HashMap<String, AttributeValue>, RepositoryError> {
    let mut item = HashMap::new();
    let slot = reservation.slot();

    item.insert(
        "PK".to_string(),
        AttributeValue::S(keys::bookings_pk(reservation.month)),
    );
    item.insert(
        "SK".to_string(),
        AttributeValue::S(keys::reservation_sk(&slot)),
    );
    item.insert(
        "entityType".to_string(),
        AttributeValue::S(ENTITY_TYPE_RESERVATION.to_string()),
    );

    item.insert("id".to_string(), AttributeValue::S(reservation.id.to_string()));
    item.insert("name".to_string(), AttributeValue::S(reservation.name.clone()));
    item.insert("email".to_string(), AttributeValue::S(reservation.email.clone()));
    item.insert(
        "date".to_string(),
        AttributeValue::S(reservation.date.format(DATE_FORMAT).to_string()),
    );
    item.insert(
        "time".to_string(),
        AttributeValue::S(format_time(reservation.time)),
    );
    item.insert(
        "startTime".to_string(),
        AttributeValue::S(reservation.start_time.format(START_TIME_FORMAT).to_string()),
    );
    if let Some(profile_type) = &reservation.profile_type {
        item.insert(
            "profileType".to_string(),
            AttributeValue::S(profile_type.clone()),
        );
    }
    if let Some(offer) = &reservation.offer {
        item.insert("offer".to_string(), AttributeValue::S(offer.clone()));
    }
    item.insert(
        "answers".to_string(),
        AttributeValue::S(to_json(&reservation.answers)?),
    );
    item.insert(
        "status".to_string(),
        AttributeValue::S(reservation.status.as_str().to_string()),
    );
    item.insert(
        "createdAt".to_string(),
        AttributeValue::S(reservation.created_at.to_rfc3339()),
    );

    Ok(item)
}

/// Convert a DynamoDB item to Reservation.
pub fn item_to_reservation(
    item: &HashMap<String, AttributeValue>,
) -> Result<Reservation, RepositoryError> {
    let date = get_date(item, "date")?;
    let time_str = get_string(item, "time")?;
    let time = parse_time(&time_str)
        .map_err(|e| RepositoryError::InvalidData(format!("Invalid time: {}", e)))?;
    let start_time = get_naive_datetime(item, "startTime")?;

    let status = match get_optional_string(item, "status") {
        Some(s) => s.parse().map_err(RepositoryError::InvalidData)?,
        None => ReservationStatus::Confirmed,
    };
    let answers = match get_optional_string(item, "answers") {
        Some(json) => from_json(&json, "answers")?,
        None => serde_json::Map::new(),
    };

    Ok(Reservation {
        id: get_uuid(item, "id")?,
        name: get_string(item, "name")?,
        email: get_string(item, "email")?,
        date,
        time,
        month: YearMonth::of(date),
        start_time,
        profile_type: get_optional_string(item, "profileType"),
        offer: get_optional_string(item, "offer"),
        answers,
        status,
        created_at: get_datetime(item, "createdAt")?,
    })
}

// ============================================================================
// Settings conversions
// ============================================================================

/// Convert AvailabilitySettings to DynamoDB item.
///
/// Structured fields are stored as JSON strings.
pub fn settings_to_item(
    settings: &AvailabilitySettings,
) -> Result<HashMap<String, AttributeValue>, RepositoryError> {
    let mut item = HashMap::new();

    item.insert(
        "PK".to_string(),
        AttributeValue::S(keys::settings_pk(settings.month)),
    );
    item.insert(
        "SK".to_string(),
        AttributeValue::S(keys::SETTINGS_SK.to_string()),
    );
    item.insert(
        "entityType".to_string(),
        AttributeValue::S(ENTITY_TYPE_SETTINGS.to_string()),
    );

    item.insert(
        "month".to_string(),
        AttributeValue::S(settings.month.to_string()),
    );
    item.insert(
        "workingHours".to_string(),
        AttributeValue::S(to_json(&settings.working_hours)?),
    );
    item.insert(
        "workingDays".to_string(),
        AttributeValue::S(to_json(&settings.working_days)?),
    );
    item.insert(
        "blockedDays".to_string(),
        AttributeValue::S(to_json(&settings.blocked_days)?),
    );
    item.insert(
        "customSlots".to_string(),
        AttributeValue::S(to_json(&settings.custom_slots)?),
    );
    item.insert(
        "updatedAt".to_string(),
        AttributeValue::S(settings.updated_at.to_rfc3339()),
    );

    Ok(item)
}

/// Convert a DynamoDB item to AvailabilitySettings.
pub fn item_to_settings(
    item: &HashMap<String, AttributeValue>,
) -> Result<AvailabilitySettings, RepositoryError> {
    let month: YearMonth = get_string(item, "month")?
        .parse()
        .map_err(|e: BookingError| RepositoryError::InvalidData(e.to_string()))?;

    let settings = AvailabilitySettings {
        month,
        working_hours: from_json(&get_string(item, "workingHours")?, "workingHours")?,
        working_days: from_json(&get_string(item, "workingDays")?, "workingDays")?,
        blocked_days: match get_optional_string(item, "blockedDays") {
            Some(json) => from_json(&json, "blockedDays")?,
            None => Default::default(),
        },
        custom_slots: match get_optional_string(item, "customSlots") {
            Some(json) => from_json(&json, "customSlots")?,
            None => Default::default(),
        },
        updated_at: get_datetime(item, "updatedAt")?,
    };

    // Items can be edited outside the API; hold them to the same rules.
    settings
        .validate()
        .map_err(|e| RepositoryError::InvalidData(e.to_string()))?;

    Ok(settings)
}

// ============================================================================
// Helper functions
// ============================================================================

fn to_json<T: Serialize>(value: &T) -> Result<String, RepositoryError> {
    serde_json::to_string(value).map_err(|e| RepositoryError::Serialization(e.to_string()))
}

fn from_json<T: DeserializeOwned>(json: &str, key: &str) -> Result<T, RepositoryError> {
    serde_json::from_str(json)
        .map_err(|e| RepositoryError::Serialization(format!("Invalid {}: {}", key, e)))
}

/// Get a required string attribute.
fn get_string(
    item: &HashMap<String, AttributeValue>,
    key: &str,
) -> Result<String, RepositoryError> {
    item.get(key)
        .and_then(|v| v.as_s().ok())
        .map(|s| s.to_string())
        .ok_or_else(|| RepositoryError::InvalidData(format!("Missing or invalid field: {}", key)))
}

/// Get an optional string attribute.
fn get_optional_string(item: &HashMap<String, AttributeValue>, key: &str) -> Option<String> {
    item.get(key)
        .and_then(|v| v.as_s().ok())
        .map(|s| s.to_string())
}

/// Get a required UUID attribute.
fn get_uuid(item: &HashMap<String, AttributeValue>, key: &str) -> Result<Uuid, RepositoryError> {
    let s = get_string(item, key)?;
    Uuid::parse_str(&s)
        .map_err(|e| RepositoryError::InvalidData(format!("Invalid UUID {}: {}", key, e)))
}

/// Get a required date attribute (YYYY-MM-DD format).
fn get_date(
    item: &HashMap<String, AttributeValue>,
    key: &str,
) -> Result<NaiveDate, RepositoryError> {
    let s = get_string(item, key)?;
    NaiveDate::parse_from_str(&s, DATE_FORMAT)
        .map_err(|e| RepositoryError::InvalidData(format!("Invalid date {}: {}", key, e)))
}

/// Get a required local datetime attribute (YYYY-MM-DDTHH:MM:SS format).
fn get_naive_datetime(
    item: &HashMap<String, AttributeValue>,
    key: &str,
) -> Result<NaiveDateTime, RepositoryError> {
    let s = get_string(item, key)?;
    NaiveDateTime::parse_from_str(&s, START_TIME_FORMAT)
        .map_err(|e| RepositoryError::InvalidData(format!("Invalid datetime {}: {}", key, e)))
}

/// Get a required datetime attribute (RFC 3339 format).
fn get_datetime(
    item: &HashMap<String, AttributeValue>,
    key: &str,
) -> Result<DateTime<Utc>, RepositoryError> {
    let s = get_string(item, key)?;
    DateTime::parse_from_rfc3339(&s)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| RepositoryError::InvalidData(format!("Invalid datetime {}: {}", key, e)))
}
