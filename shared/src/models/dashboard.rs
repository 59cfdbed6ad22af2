//! Admin dashboard rollups

use serde::{Deserialize, Serialize};

use super::appointment::AppointmentStatus;

/// Headline numbers for the admin dashboard
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct DashboardStats {
    pub total_appointments: i64,
    /// Appointments starting on the current UTC day
    pub today_appointments: i64,
    /// PENDING/CONFIRMED appointments starting from now on
    pub upcoming_appointments: i64,
    pub pending: i64,
    pub confirmed: i64,
    pub reschedule_pending: i64,
    pub cancelled: i64,
    pub completed: i64,
    pub no_show: i64,
    /// Sum of `price_ils` over COMPLETED appointments
    pub completed_revenue_ils: f64,
    pub active_staff: i64,
    pub active_services: i64,
}

/// Row of a "count by status" query
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct StatusCount {
    pub status: AppointmentStatus,
    pub count: i64,
}

/// Row of a "group by day with count" query (`day` is `YYYY-MM-DD`, UTC)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct DailyCount {
    pub day: String,
    pub count: i64,
}

/// Completed revenue per UTC day
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct DailyRevenue {
    pub day: String,
    pub appointments: i64,
    pub revenue_ils: f64,
}

/// Booked time per staff member over a period
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct StaffUtilisation {
    pub staff_id: i64,
    pub staff_name: String,
    pub appointments: i64,
    pub booked_minutes: i64,
}
