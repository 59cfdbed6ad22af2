//! Input validation helpers
//!
//! Centralized text length constants and validation functions.
//! SQLite TEXT has no built-in length enforcement.

use shared::error::ErrorCode;
use shared::models::WorkingHoursInput;

use super::time::parse_hhmm;
use crate::utils::AppError;

// ── Text length limits ──────────────────────────────────────────────

/// Entity names: staff, services
pub const MAX_NAME_LEN: usize = 200;

/// Notes, descriptions, reasons, bios
pub const MAX_NOTE_LEN: usize = 500;

/// Longest bookable service
pub const MAX_SERVICE_DURATION_MIN: i32 = 24 * 60;

// ── Text ────────────────────────────────────────────────────────────

/// Validate that a required string is non-empty and within the length limit.
pub fn validate_required_text(value: &str, field: &str, max_len: usize) -> Result<(), AppError> {
    if value.trim().is_empty() {
        return Err(
            AppError::with_message(ErrorCode::RequiredField, format!("{field} must not be empty"))
                .with_detail("field", field),
        );
    }
    if value.chars().count() > max_len {
        return Err(AppError::validation(format!(
            "{field} is too long ({} chars, max {max_len})",
            value.chars().count()
        )));
    }
    Ok(())
}

/// Validate that an optional string, if present, is within the length limit.
pub fn validate_optional_text(
    value: &Option<String>,
    field: &str,
    max_len: usize,
) -> Result<(), AppError> {
    if let Some(v) = value
        && v.chars().count() > max_len
    {
        return Err(AppError::validation(format!(
            "{field} is too long ({} chars, max {max_len})",
            v.chars().count()
        )));
    }
    Ok(())
}

// ── Catalog ─────────────────────────────────────────────────────────

pub fn validate_duration(duration_min: i32) -> Result<(), AppError> {
    if duration_min <= 0 || duration_min > MAX_SERVICE_DURATION_MIN {
        return Err(AppError::with_message(
            ErrorCode::ServiceInvalidDuration,
            format!("Duration must be between 1 and {MAX_SERVICE_DURATION_MIN} minutes, got {duration_min}"),
        ));
    }
    Ok(())
}

pub fn validate_price(price_ils: f64) -> Result<(), AppError> {
    if !price_ils.is_finite() || price_ils < 0.0 {
        return Err(AppError::with_message(
            ErrorCode::ServiceInvalidPrice,
            format!("Price must be a non-negative amount, got {price_ils}"),
        ));
    }
    Ok(())
}

// ── Schedules ───────────────────────────────────────────────────────

/// Weekday in `[0, 6]`, well-formed `HH:MM` bounds and `start < end`
pub fn validate_working_hours(entry: &WorkingHoursInput) -> Result<(), AppError> {
    let invalid = |msg: String| {
        AppError::with_message(ErrorCode::InvalidWorkingHours, msg)
            .with_detail("weekday", entry.weekday)
    };
    if !(0..=6).contains(&entry.weekday) {
        return Err(invalid(format!(
            "Weekday must be between 0 (Sunday) and 6 (Saturday), got {}",
            entry.weekday
        )));
    }
    let start = parse_hhmm(&entry.start_time)
        .ok_or_else(|| invalid(format!("Invalid start time: {}", entry.start_time)))?;
    let end = parse_hhmm(&entry.end_time)
        .ok_or_else(|| invalid(format!("Invalid end time: {}", entry.end_time)))?;
    if start >= end {
        return Err(invalid(format!(
            "Start time {} must be before end time {}",
            entry.start_time, entry.end_time
        )));
    }
    Ok(())
}
