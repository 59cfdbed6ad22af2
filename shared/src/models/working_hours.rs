//! Working Hours Model

use serde::{Deserialize, Serialize};

/// Recurring weekly availability window of a staff member
///
/// `weekday` follows 0=Sunday..6=Saturday. Times are "HH:MM" (24h, UTC).
/// Several rows may exist for the same staff/weekday (split shifts).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct WorkingHours {
    pub id: i64,
    pub staff_id: i64,
    pub weekday: i32,
    pub start_time: String,
    pub end_time: String,
}

/// Working hours entry input (one row of a weekly schedule)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WorkingHoursInput {
    pub weekday: i32,
    pub start_time: String,
    pub end_time: String,
}

impl WorkingHoursInput {
    pub fn new(weekday: i32, start_time: impl Into<String>, end_time: impl Into<String>) -> Self {
        Self {
            weekday,
            start_time: start_time.into(),
            end_time: end_time.into(),
        }
    }
}
