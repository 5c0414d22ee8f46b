//! Time and timestamp helpers.

use chrono::{DateTime, NaiveDate, NaiveDateTime, SubsecRound, Utc};

/// UTC timestamp used for creation times, schedules and snapshot times.
pub type Timestamp = DateTime<Utc>;

/// Return the current UTC time, truncated to microseconds so that a value
/// survives a round-trip through storage unchanged.
#[must_use]
pub fn now() -> Timestamp {
    Utc::now().trunc_subsecs(6)
}

/// Parse a calendar timestamp as supplied by clients and devices.
///
/// Accepts RFC 3339 (`2024-01-01T08:00:00Z`), a naive date-time read as UTC
/// (`2024-01-01T08:00:00`), or a bare date read as UTC midnight.
#[must_use]
pub fn parse(value: &str) -> Option<Timestamp> {
    let value = value.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.to_utc());
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(naive.and_utc());
    }
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

/// Interpret milliseconds since the Unix epoch.
#[must_use]
pub fn from_millis(millis: i64) -> Option<Timestamp> {
    DateTime::from_timestamp_millis(millis)
}
