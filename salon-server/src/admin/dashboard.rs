//! Dashboard rollups (read-only)

use shared::error::{AppError, AppResult};
use shared::models::{
    AppointmentStatus, DailyCount, DailyRevenue, DashboardStats, StaffUtilisation,
};

use crate::auth::{CurrentUser, permissions};
use crate::db::DbService;
use crate::db::repository::{service, staff, stats};
use crate::utils::time::{DAY_MS, day_start_millis, utc_date};

/// Widest range a trend query may span
pub const MAX_TREND_DAYS: i64 = 366;

#[derive(Clone)]
pub struct DashboardService {
    db: DbService,
}

impl DashboardService {
    pub fn new(db: DbService) -> Self {
        Self { db }
    }

    /// Headline numbers as of `now`
    pub async fn stats(&self, actor: &CurrentUser, now: i64) -> AppResult<DashboardStats> {
        actor.require(permissions::DASHBOARD_VIEW)?;
        let pool = &self.db.pool;
        let today = day_start_millis(utc_date(now));

        let mut out = DashboardStats {
            total_appointments: stats::count_all(pool).await?,
            today_appointments: stats::count_starting_between(pool, today, today + DAY_MS).await?,
            upcoming_appointments: stats::count_upcoming(pool, now).await?,
            completed_revenue_ils: stats::completed_revenue(pool).await?,
            active_staff: staff::count_active(pool).await?,
            active_services: service::count_active(pool).await?,
            ..Default::default()
        };
        for row in stats::count_by_status(pool).await? {
            let slot = match row.status {
                AppointmentStatus::Pending => &mut out.pending,
                AppointmentStatus::Confirmed => &mut out.confirmed,
                AppointmentStatus::ReschedulePending => &mut out.reschedule_pending,
                AppointmentStatus::Cancelled => &mut out.cancelled,
                AppointmentStatus::Completed => &mut out.completed,
                AppointmentStatus::NoShow => &mut out.no_show,
            };
            *slot = row.count;
        }
        Ok(out)
    }

    /// Appointments per UTC day in `[from, to)`
    pub async fn appointment_trend(
        &self,
        actor: &CurrentUser,
        from: i64,
        to: i64,
    ) -> AppResult<Vec<DailyCount>> {
        actor.require(permissions::DASHBOARD_VIEW)?;
        check_range(from, to)?;
        Ok(stats::appointments_per_day(&self.db.pool, from, to).await?)
    }

    /// Completed revenue per UTC day in `[from, to)`
    pub async fn revenue_trend(
        &self,
        actor: &CurrentUser,
        from: i64,
        to: i64,
    ) -> AppResult<Vec<DailyRevenue>> {
        actor.require(permissions::DASHBOARD_VIEW)?;
        check_range(from, to)?;
        Ok(stats::revenue_per_day(&self.db.pool, from, to).await?)
    }

    pub async fn staff_utilisation(
        &self,
        actor: &CurrentUser,
        from: i64,
        to: i64,
    ) -> AppResult<Vec<StaffUtilisation>> {
        actor.require(permissions::DASHBOARD_VIEW)?;
        check_range(from, to)?;
        Ok(stats::staff_utilisation(&self.db.pool, from, to).await?)
    }
}

fn check_range(from: i64, to: i64) -> AppResult<()> {
    if from >= to {
        return Err(AppError::validation(format!(
            "Range start {from} must be before end {to}"
        )));
    }
    if to
        .checked_sub(from)
        .is_none_or(|span| span > MAX_TREND_DAYS * DAY_MS)
    {
        return Err(AppError::validation(format!(
            "Range may span at most {MAX_TREND_DAYS} days"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn range_checks() {
        assert!(check_range(0, DAY_MS).is_ok());
        assert!(check_range(DAY_MS, DAY_MS).is_err());
        assert!(check_range(0, (MAX_TREND_DAYS + 1) * DAY_MS).is_err());
        assert!(check_range(i64::MIN, i64::MAX).is_err());
        assert!(check_range(-DAY_MS, i64::MAX).is_err());
    }
}
