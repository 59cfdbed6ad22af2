//! Time Off Model

use serde::{Deserialize, Serialize};

/// Time off type
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
#[cfg_attr(feature = "db", sqlx(rename_all = "SCREAMING_SNAKE_CASE"))]
pub enum TimeOffType {
    SickLeave,
    Vacation,
    #[default]
    Other,
}

/// Time off entity
///
/// `[starts_at, ends_at]` is an inclusive interval of Unix millis (UTC) during
/// which the staff member cannot be booked.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct TimeOff {
    pub id: i64,
    pub staff_id: i64,
    #[serde(rename = "type")]
    pub time_off_type: TimeOffType,
    pub starts_at: i64,
    pub ends_at: i64,
    pub reason: Option<String>,
    pub created_at: i64,
}

/// Register time off payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimeOffCreate {
    #[serde(rename = "type", default)]
    pub time_off_type: TimeOffType,
    pub starts_at: i64,
    pub ends_at: i64,
    pub reason: Option<String>,
}

/// Outcome of registering time off
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimeOffRegistration {
    pub time_off: TimeOff,
    /// Number of appointments moved to RESCHEDULE_PENDING
    pub affected_appointments: u64,
    pub appointment_ids: Vec<i64>,
}
