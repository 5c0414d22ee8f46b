//! Two-slot actuation schedule.
//!
//! A schedule always holds exactly two timestamps: the next water time and
//! the next food time. The type cannot represent any other shape, so once a
//! value has been validated it stays valid through every layer, storage
//! included. Order between the two slots is not constrained.

use chrono::Datelike;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::ValidationError;
use crate::time::{self, Timestamp};

/// Scheduled actuation times, serialized as a two-element array
/// `[next_water, next_food]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "[Timestamp; 2]", into = "[Timestamp; 2]")]
pub struct Schedule {
    pub next_water: Timestamp,
    pub next_food: Timestamp,
}

impl Schedule {
    #[must_use]
    pub fn new(next_water: Timestamp, next_food: Timestamp) -> Self {
        Self {
            next_water,
            next_food,
        }
    }

    /// Validate a raw schedule value as received at the boundary.
    ///
    /// Succeeds only for an array of exactly two entries where each entry is
    /// either a timestamp string (see [`time::parse`]) or epoch milliseconds.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::InvalidSchedule`] for any other shape,
    /// including `null`, a wrong element count, or an unparsable entry.
    pub fn parse(value: &Value) -> Result<Self, ValidationError> {
        let Value::Array(items) = value else {
            return Err(ValidationError::InvalidSchedule);
        };
        let [water, food] = items.as_slice() else {
            return Err(ValidationError::InvalidSchedule);
        };
        Ok(Self::new(parse_slot(water)?, parse_slot(food)?))
    }

    /// Both slots in wire order.
    #[must_use]
    pub fn as_array(&self) -> [Timestamp; 2] {
        [self.next_water, self.next_food]
    }
}

/// Calendar years a stored timestamp can represent as four-digit RFC 3339.
const YEARS: std::ops::RangeInclusive<i32> = 0..=9999;

fn parse_slot(value: &Value) -> Result<Timestamp, ValidationError> {
    let parsed = match value {
        Value::String(text) => time::parse(text),
        Value::Number(number) => number.as_i64().and_then(time::from_millis),
        _ => None,
    };
    parsed
        .filter(|ts| YEARS.contains(&ts.year()))
        .ok_or(ValidationError::InvalidSchedule)
}

impl From<[Timestamp; 2]> for Schedule {
    fn from([next_water, next_food]: [Timestamp; 2]) -> Self {
        Self::new(next_water, next_food)
    }
}

impl From<Schedule> for [Timestamp; 2] {
    fn from(schedule: Schedule) -> Self {
        schedule.as_array()
    }
}
