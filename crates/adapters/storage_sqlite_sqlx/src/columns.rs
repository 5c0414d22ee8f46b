//! Column encodings shared by the repositories.
//!
//! Timestamps are stored as RFC 3339 UTC text with a fixed number of
//! fractional digits, so that lexical order in SQL is chronological order.

use std::str::FromStr;

use chrono::SecondsFormat;
use sqlx::Row;
use sqlx::sqlite::SqliteRow;

use feederhub_domain::device::{DeviceState, Level, Mac, Switch};
use feederhub_domain::schedule::Schedule;
use feederhub_domain::time::Timestamp;

pub(crate) fn encode_timestamp(value: Timestamp) -> String {
    value.to_rfc3339_opts(SecondsFormat::Micros, true)
}

fn decode_error<E>(err: E) -> sqlx::Error
where
    E: std::error::Error + Send + Sync + 'static,
{
    sqlx::Error::Decode(Box::new(err))
}

pub(crate) fn timestamp(row: &SqliteRow, column: &str) -> Result<Timestamp, sqlx::Error> {
    let raw: String = row.try_get(column)?;
    chrono::DateTime::parse_from_rfc3339(&raw)
        .map(|value| value.to_utc())
        .map_err(decode_error)
}

pub(crate) fn parsed<T>(row: &SqliteRow, column: &str) -> Result<T, sqlx::Error>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    let raw: String = row.try_get(column)?;
    raw.parse().map_err(decode_error)
}

pub(crate) fn mac(row: &SqliteRow) -> Result<Mac, sqlx::Error> {
    let raw: String = row.try_get("mac")?;
    Mac::parse(&raw).map_err(decode_error)
}

pub(crate) fn state(row: &SqliteRow) -> Result<DeviceState, sqlx::Error> {
    Ok(DeviceState {
        water_container: parsed::<Level>(row, "water_container")?,
        food_container: parsed::<Level>(row, "food_container")?,
        water_dish: parsed::<Level>(row, "water_dish")?,
        food_dish: parsed::<Level>(row, "food_dish")?,
        pump: parsed::<Switch>(row, "pump")?,
        servo: parsed::<Switch>(row, "servo")?,
    })
}

pub(crate) fn schedule(row: &SqliteRow) -> Result<Schedule, sqlx::Error> {
    Ok(Schedule::new(
        timestamp(row, "next_water")?,
        timestamp(row, "next_food")?,
    ))
}
