//! Unified error codes for the salon platform
//!
//! Error codes are organized by category:
//! - 0xxx: General errors
//! - 1xxx: Authentication errors
//! - 2xxx: Permission errors
//! - 4xxx: Appointment errors
//! - 5xxx: Staff errors
//! - 6xxx: Service catalog errors
//! - 9xxx: System errors

use serde::{Deserialize, Serialize};
use std::fmt;

/// Unified error code enum
///
/// Represented as u16 values on the wire so every consumer (server, admin UI,
/// mobile client) can switch on the same numbers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "u16", try_from = "u16")]
#[repr(u16)]
pub enum ErrorCode {
    // ==================== 0xxx: General ====================
    /// Operation completed successfully
    Success = 0,
    /// Unknown error
    Unknown = 1,
    /// Validation failed
    ValidationFailed = 2,
    /// Resource not found
    NotFound = 3,
    /// Resource already exists
    AlreadyExists = 4,
    /// Invalid request
    InvalidRequest = 5,
    /// Invalid format (dates, times)
    InvalidFormat = 6,
    /// Required field missing
    RequiredField = 7,
    /// Value out of range
    ValueOutOfRange = 8,

    // ==================== 1xxx: Auth ====================
    /// User is not authenticated
    NotAuthenticated = 1001,

    // ==================== 2xxx: Permission ====================
    /// Permission denied
    PermissionDenied = 2001,
    /// Admin role required
    AdminRequired = 2003,
    /// Actor does not own the resource
    NotResourceOwner = 2006,

    // ==================== 4xxx: Appointment ====================
    /// Appointment not found
    AppointmentNotFound = 4001,
    /// Requested interval overlaps another booking of the same staff member
    AppointmentConflict = 4002,
    /// Appointment has no assigned staff member
    AppointmentNotAssigned = 4003,
    /// Status transition is not allowed
    AppointmentInvalidTransition = 4004,

    // ==================== 5xxx: Staff ====================
    /// Staff member not found
    StaffNotFound = 5001,
    /// Staff member is inactive
    StaffInactive = 5002,
    /// Staff member does not provide the requested service
    StaffServiceMismatch = 5003,
    /// Working hours entry is malformed
    InvalidWorkingHours = 5101,
    /// Time off entry not found
    TimeOffNotFound = 5201,

    // ==================== 6xxx: Service catalog ====================
    /// Service not found
    ServiceNotFound = 6001,
    /// Service is inactive
    ServiceInactive = 6002,
    /// Service has an invalid duration
    ServiceInvalidDuration = 6003,
    /// Service has an invalid price
    ServiceInvalidPrice = 6004,

    // ==================== 9xxx: System ====================
    /// Internal server error
    InternalError = 9001,
    /// Database error
    DatabaseError = 9002,
    /// Operation timed out
    TimeoutError = 9004,
    /// Configuration error
    ConfigError = 9005,
}

impl ErrorCode {
    /// Get the numeric code value
    #[inline]
    pub const fn code(&self) -> u16 {
        *self as u16
    }

    /// Check if this code represents success
    #[inline]
    pub const fn is_success(&self) -> bool {
        matches!(self, ErrorCode::Success)
    }

    /// Get the default message for this error code
    pub const fn message(&self) -> &'static str {
        match self {
            // General
            ErrorCode::Success => "Operation completed successfully",
            ErrorCode::Unknown => "An unknown error occurred",
            ErrorCode::ValidationFailed => "Validation failed",
            ErrorCode::NotFound => "Resource not found",
            ErrorCode::AlreadyExists => "Resource already exists",
            ErrorCode::InvalidRequest => "Invalid request",
            ErrorCode::InvalidFormat => "Invalid format",
            ErrorCode::RequiredField => "Required field is missing",
            ErrorCode::ValueOutOfRange => "Value is out of range",

            // Auth
            ErrorCode::NotAuthenticated => "User is not authenticated",

            // Permission
            ErrorCode::PermissionDenied => "Permission denied",
            ErrorCode::AdminRequired => "Administrator role is required",
            ErrorCode::NotResourceOwner => "Resource belongs to another user",

            // Appointment
            ErrorCode::AppointmentNotFound => "Appointment not found",
            ErrorCode::AppointmentConflict => "Time slot is already booked",
            ErrorCode::AppointmentNotAssigned => "Appointment has no assigned staff member",
            ErrorCode::AppointmentInvalidTransition => "Appointment status change is not allowed",

            // Staff
            ErrorCode::StaffNotFound => "Staff member not found",
            ErrorCode::StaffInactive => "Staff member is not active",
            ErrorCode::StaffServiceMismatch => "Staff member does not provide this service",
            ErrorCode::InvalidWorkingHours => "Invalid working hours",
            ErrorCode::TimeOffNotFound => "Time off not found",

            // Service catalog
            ErrorCode::ServiceNotFound => "Service not found",
            ErrorCode::ServiceInactive => "Service is not active",
            ErrorCode::ServiceInvalidDuration => "Service duration must be positive",
            ErrorCode::ServiceInvalidPrice => "Service price cannot be negative",

            // System
            ErrorCode::InternalError => "Internal server error",
            ErrorCode::DatabaseError => "Database error",
            ErrorCode::TimeoutError => "Operation timed out",
            ErrorCode::ConfigError => "Configuration error",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "E{:04}", self.code())
    }
}

impl From<ErrorCode> for u16 {
    #[inline]
    fn from(code: ErrorCode) -> Self {
        code.code()
    }
}

/// Error returned when converting an unknown u16 into [`ErrorCode`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidErrorCode(pub u16);

impl fmt::Display for InvalidErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid error code: {}", self.0)
    }
}

impl std::error::Error for InvalidErrorCode {}

impl TryFrom<u16> for ErrorCode {
    type Error = InvalidErrorCode;

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        match value {
            // General
            0 => Ok(ErrorCode::Success),
            1 => Ok(ErrorCode::Unknown),
            2 => Ok(ErrorCode::ValidationFailed),
            3 => Ok(ErrorCode::NotFound),
            4 => Ok(ErrorCode::AlreadyExists),
            5 => Ok(ErrorCode::InvalidRequest),
            6 => Ok(ErrorCode::InvalidFormat),
            7 => Ok(ErrorCode::RequiredField),
            8 => Ok(ErrorCode::ValueOutOfRange),

            // Auth
            1001 => Ok(ErrorCode::NotAuthenticated),

            // Permission
            2001 => Ok(ErrorCode::PermissionDenied),
            2003 => Ok(ErrorCode::AdminRequired),
            2006 => Ok(ErrorCode::NotResourceOwner),

            // Appointment
            4001 => Ok(ErrorCode::AppointmentNotFound),
            4002 => Ok(ErrorCode::AppointmentConflict),
            4003 => Ok(ErrorCode::AppointmentNotAssigned),
            4004 => Ok(ErrorCode::AppointmentInvalidTransition),

            // Staff
            5001 => Ok(ErrorCode::StaffNotFound),
            5002 => Ok(ErrorCode::StaffInactive),
            5003 => Ok(ErrorCode::StaffServiceMismatch),
            5101 => Ok(ErrorCode::InvalidWorkingHours),
            5201 => Ok(ErrorCode::TimeOffNotFound),

            // Service catalog
            6001 => Ok(ErrorCode::ServiceNotFound),
            6002 => Ok(ErrorCode::ServiceInactive),
            6003 => Ok(ErrorCode::ServiceInvalidDuration),
            6004 => Ok(ErrorCode::ServiceInvalidPrice),

            // System
            9001 => Ok(ErrorCode::InternalError),
            9002 => Ok(ErrorCode::DatabaseError),
            9004 => Ok(ErrorCode::TimeoutError),
            9005 => Ok(ErrorCode::ConfigError),

            _ => Err(InvalidErrorCode(value)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_code_values() {
        assert_eq!(ErrorCode::Success.code(), 0);
        assert_eq!(ErrorCode::AppointmentConflict.code(), 4002);
        assert_eq!(ErrorCode::StaffServiceMismatch.code(), 5003);
        assert_eq!(ErrorCode::ServiceInactive.code(), 6002);
    }

    #[test]
    fn test_try_from_round_trip() {
        for code in [
            ErrorCode::NotFound,
            ErrorCode::NotResourceOwner,
            ErrorCode::AppointmentInvalidTransition,
            ErrorCode::TimeOffNotFound,
            ErrorCode::DatabaseError,
        ] {
            assert_eq!(ErrorCode::try_from(code.code()), Ok(code));
        }
        assert_eq!(ErrorCode::try_from(4999), Err(InvalidErrorCode(4999)));
    }

    #[test]
    fn test_serde_as_number() {
        let json = serde_json::to_string(&ErrorCode::AppointmentConflict).unwrap();
        assert_eq!(json, "4002");
        let code: ErrorCode = serde_json::from_str("5002").unwrap();
        assert_eq!(code, ErrorCode::StaffInactive);
        assert!(serde_json::from_str::<ErrorCode>("12345").is_err());
    }

    #[test]
    fn test_display() {
        assert_eq!(ErrorCode::AppointmentNotFound.to_string(), "E4001");
        assert_eq!(ErrorCode::ValidationFailed.to_string(), "E0002");
    }
}
