//! Serde helper functions for booking payloads.
//!
//! Slot times travel as `HH:MM` strings everywhere (API bodies, sort keys,
//! settings overrides), so these helpers pin that format instead of chrono's
//! default `HH:MM:SS`.

use chrono::{NaiveTime, Timelike};
use serde::{Deserialize, Deserializer, Serializer};
use serde_json::{Map, Value};

pub const TIME_FORMAT: &str = "%H:%M";

/// Format a slot time as `HH:MM`.
pub fn format_time(time: NaiveTime) -> String {
    time.format(TIME_FORMAT).to_string()
}

/// Parse a slot time. Accepts `HH:MM`, or `HH:MM:00` since slots never
/// carry seconds.
pub fn parse_time(s: &str) -> Result<NaiveTime, String> {
    let s = s.trim();
    let time = NaiveTime::parse_from_str(s, TIME_FORMAT)
        .or_else(|_| NaiveTime::parse_from_str(s, "%H:%M:%S"))
        .map_err(|e| format!("invalid time {s:?}: {e}"))?;

    if time.second() != 0 || time.nanosecond() != 0 {
        return Err(format!("invalid time {s:?}: slots start on a whole minute"));
    }
    Ok(time)
}

/// Serialize a NaiveTime as `HH:MM`.
pub fn serialize_time<S>(time: &NaiveTime, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_str(&format_time(*time))
}

/// Deserialize a NaiveTime from `HH:MM` or `HH:MM:SS`.
pub fn deserialize_time<'de, D>(deserializer: D) -> Result<NaiveTime, D::Error>
where
    D: Deserializer<'de>,
{
    let s = String::deserialize(deserializer)?;
    parse_time(&s).map_err(serde::de::Error::custom)
}

/// Serialize a list of times as `HH:MM` strings.
pub fn serialize_times<S>(times: &[NaiveTime], serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.collect_seq(times.iter().map(|t| format_time(*t)))
}

/// Deserialize a list of `HH:MM` strings.
pub fn deserialize_times<'de, D>(deserializer: D) -> Result<Vec<NaiveTime>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Vec<String> = Vec::deserialize(deserializer)?;
    raw.iter()
        .map(|s| parse_time(s).map_err(serde::de::Error::custom))
        .collect()
}

/// Deserialize a JSON object, treating `null` as an empty object.
pub fn deserialize_object_or_null<'de, D>(deserializer: D) -> Result<Map<String, Value>, D::Error>
where
    D: Deserializer<'de>,
{
    let map: Option<Map<String, Value>> = Option::deserialize(deserializer)?;
    Ok(map.unwrap_or_default())
}

/// Deserialize an optional string, treating empty strings as None.
pub fn deserialize_optional_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let s: Option<String> = Option::deserialize(deserializer)?;
    Ok(s.map(|s| s.trim().to_string()).filter(|s| !s.is_empty()))
}
