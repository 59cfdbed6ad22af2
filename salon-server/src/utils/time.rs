//! Time helpers: calendar days, HH:MM parsing and ISO output
//!
//! Scheduling is UTC-only: weekdays, day boundaries and working-hours clock
//! times are all interpreted in UTC. Repositories only see `i64` Unix millis.

use chrono::{DateTime, Datelike, NaiveDate, NaiveTime, SecondsFormat, Utc};

use super::{AppError, AppResult};
use shared::error::ErrorCode;

pub const MINUTE_MS: i64 = 60_000;
pub const DAY_MS: i64 = 86_400_000;

/// Parse a `YYYY-MM-DD` date
pub fn parse_date(date: &str) -> AppResult<NaiveDate> {
    NaiveDate::parse_from_str(date, "%Y-%m-%d").map_err(|_| {
        AppError::with_message(ErrorCode::InvalidFormat, format!("Invalid date format: {date}"))
    })
}

/// Parse a strict 24-hour `HH:MM` clock time
pub fn parse_hhmm(value: &str) -> Option<NaiveTime> {
    let bytes = value.as_bytes();
    if bytes.len() != 5 || bytes[2] != b':' {
        return None;
    }
    NaiveTime::parse_from_str(value, "%H:%M").ok()
}

/// Weekday index, 0 = Sunday .. 6 = Saturday
pub fn weekday_index(date: NaiveDate) -> i32 {
    date.weekday().num_days_from_sunday() as i32
}

/// 00:00:00.000 of the UTC day in Unix millis
pub fn day_start_millis(date: NaiveDate) -> i64 {
    date.and_time(NaiveTime::MIN).and_utc().timestamp_millis()
}

/// 23:59:59.999 of the UTC day in Unix millis (inclusive bound)
pub fn day_end_inclusive_millis(date: NaiveDate) -> i64 {
    day_start_millis(date) + DAY_MS - 1
}

/// The UTC calendar day containing `millis`
pub fn utc_date(millis: i64) -> NaiveDate {
    DateTime::<Utc>::from_timestamp_millis(millis)
        .map(|dt| dt.date_naive())
        .unwrap_or_default()
}

/// Date + clock time → Unix millis (UTC)
pub fn at_time_millis(date: NaiveDate, time: NaiveTime) -> i64 {
    date.and_time(time).and_utc().timestamp_millis()
}

/// Unix millis → `2024-01-14T09:00:00.000Z`
pub fn to_iso_millis(millis: i64) -> String {
    DateTime::<Utc>::from_timestamp_millis(millis)
        .map(|dt| dt.to_rfc3339_opts(SecondsFormat::Millis, true))
        .unwrap_or_default()
}
