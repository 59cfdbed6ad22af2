//! Appointment Model

use serde::{Deserialize, Serialize};

use super::service::ServiceSummary;
use super::staff::StaffSummary;

/// Appointment status
///
/// ```text
/// PENDING ──► CONFIRMED ──► COMPLETED | NO_SHOW
///    │            │
///    │            └──► RESCHEDULE_PENDING (staff time off / removal)
///    └──────────────► CANCELLED (from any non-terminal state)
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
#[cfg_attr(feature = "db", sqlx(rename_all = "SCREAMING_SNAKE_CASE"))]
pub enum AppointmentStatus {
    #[default]
    Pending,
    Confirmed,
    ReschedulePending,
    Cancelled,
    Completed,
    NoShow,
}

impl AppointmentStatus {
    /// Statuses that occupy the staff member's calendar
    pub const BLOCKING: [AppointmentStatus; 2] = [Self::Pending, Self::Confirmed];

    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "PENDING",
            Self::Confirmed => "CONFIRMED",
            Self::ReschedulePending => "RESCHEDULE_PENDING",
            Self::Cancelled => "CANCELLED",
            Self::Completed => "COMPLETED",
            Self::NoShow => "NO_SHOW",
        }
    }

    /// Terminal states never change again
    pub const fn is_terminal(&self) -> bool {
        matches!(self, Self::Cancelled | Self::Completed | Self::NoShow)
    }

    /// Whether an appointment in this status takes part in overlap checks
    pub const fn is_blocking(&self) -> bool {
        matches!(self, Self::Pending | Self::Confirmed)
    }

    /// Whether `self → next` is an allowed status change
    ///
    /// RESCHEDULE_PENDING may go back to PENDING/CONFIRMED once the
    /// appointment has been moved to a free slot.
    pub const fn can_transition_to(&self, next: AppointmentStatus) -> bool {
        use AppointmentStatus::*;
        match (self, next) {
            (Pending, Confirmed | ReschedulePending | Cancelled) => true,
            (Confirmed, Completed | NoShow | ReschedulePending | Cancelled) => true,
            (ReschedulePending, Pending | Confirmed | Cancelled) => true,
            _ => false,
        }
    }
}

impl std::fmt::Display for AppointmentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Where the booking came from
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
#[cfg_attr(feature = "db", sqlx(rename_all = "lowercase"))]
pub enum AppointmentSource {
    #[default]
    Web,
    Admin,
}

/// Appointment entity
///
/// `[starts_at, ends_at)` is half-open, Unix millis (UTC). `ends_at` is fixed
/// at booking time from the service duration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Appointment {
    pub id: i64,
    pub client_id: i64,
    pub service_id: i64,
    /// `None` for floating (unassigned) appointments
    pub staff_id: Option<i64>,
    pub starts_at: i64,
    pub ends_at: i64,
    pub status: AppointmentStatus,
    pub price_ils: Option<f64>,
    pub notes: Option<String>,
    pub source: AppointmentSource,
    #[serde(default)]
    pub reminder_sent: bool,
    pub created_at: i64,
    pub updated_at: i64,
}

impl Appointment {
    /// Duration in minutes as booked (not the current service duration)
    pub fn duration_min(&self) -> i64 {
        (self.ends_at - self.starts_at) / 60_000
    }
}

/// Appointment with joined service and staff data
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AppointmentDetail {
    #[serde(flatten)]
    pub appointment: Appointment,
    pub service: ServiceSummary,
    pub staff: Option<StaffSummary>,
}

/// Client booking payload (the client id comes from the authenticated actor)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppointmentCreate {
    pub service_id: i64,
    pub staff_id: Option<i64>,
    pub starts_at: i64,
    pub notes: Option<String>,
}

/// Appointment list filter
///
/// Every field narrows the result; `None` means "any".
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppointmentFilter {
    pub client_id: Option<i64>,
    pub staff_id: Option<i64>,
    pub status: Option<AppointmentStatus>,
    /// Inclusive lower bound on `starts_at`
    pub from: Option<i64>,
    /// Exclusive upper bound on `starts_at`
    pub to: Option<i64>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn terminal_states_have_no_exit() {
        use AppointmentStatus::*;
        for from in [Cancelled, Completed, NoShow] {
            for to in [
                Pending,
                Confirmed,
                ReschedulePending,
                Cancelled,
                Completed,
                NoShow,
            ] {
                assert!(!from.can_transition_to(to), "{from} -> {to}");
            }
        }
    }

    #[test]
    fn regular_flow_is_allowed() {
        use AppointmentStatus::*;
        assert!(Pending.can_transition_to(Confirmed));
        assert!(Confirmed.can_transition_to(Completed));
        assert!(Confirmed.can_transition_to(NoShow));
        assert!(Confirmed.can_transition_to(ReschedulePending));
        assert!(ReschedulePending.can_transition_to(Confirmed));
        assert!(Pending.can_transition_to(Cancelled));
        assert!(!Pending.can_transition_to(Completed));
        assert!(!Pending.can_transition_to(Pending));
    }

    #[test]
    fn blocking_statuses() {
        assert!(AppointmentStatus::Pending.is_blocking());
        assert!(AppointmentStatus::Confirmed.is_blocking());
        assert!(!AppointmentStatus::ReschedulePending.is_blocking());
        assert!(!AppointmentStatus::Cancelled.is_blocking());
    }

    #[test]
    fn status_serializes_screaming_snake_case() {
        let json = serde_json::to_string(&AppointmentStatus::ReschedulePending).unwrap();
        assert_eq!(json, "\"RESCHEDULE_PENDING\"");
        let status: AppointmentStatus = serde_json::from_str("\"NO_SHOW\"").unwrap();
        assert_eq!(status, AppointmentStatus::NoShow);
    }
}
