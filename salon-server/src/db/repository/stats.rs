//! Aggregate queries for the admin dashboard
//!
//! Days are UTC calendar days (`YYYY-MM-DD`) derived from `starts_at`.

use super::RepoResult;
use shared::models::{DailyCount, DailyRevenue, StaffUtilisation, StatusCount};
use sqlx::SqliteExecutor;

const DAY_EXPR: &str = "strftime('%Y-%m-%d', a.starts_at / 1000, 'unixepoch')";

pub async fn count_all(db: impl SqliteExecutor<'_>) -> RepoResult<i64> {
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM appointment")
        .fetch_one(db)
        .await?;
    Ok(count)
}

pub async fn count_by_status(db: impl SqliteExecutor<'_>) -> RepoResult<Vec<StatusCount>> {
    let rows = sqlx::query_as::<_, StatusCount>(
        "SELECT status, COUNT(*) AS count FROM appointment GROUP BY status",
    )
    .fetch_all(db)
    .await?;
    Ok(rows)
}

/// Appointments of any status starting in `[from, to)`
pub async fn count_starting_between(
    db: impl SqliteExecutor<'_>,
    from: i64,
    to: i64,
) -> RepoResult<i64> {
    let count: i64 = sqlx::query_scalar(
        "SELECT COUNT(*) FROM appointment WHERE starts_at >= ?1 AND starts_at < ?2",
    )
    .bind(from)
    .bind(to)
    .fetch_one(db)
    .await?;
    Ok(count)
}

pub async fn count_upcoming(db: impl SqliteExecutor<'_>, now: i64) -> RepoResult<i64> {
    let count: i64 = sqlx::query_scalar(
        "SELECT COUNT(*) FROM appointment WHERE status IN ('PENDING', 'CONFIRMED') AND starts_at >= ?",
    )
    .bind(now)
    .fetch_one(db)
    .await?;
    Ok(count)
}

pub async fn completed_revenue(db: impl SqliteExecutor<'_>) -> RepoResult<f64> {
    let total: f64 = sqlx::query_scalar(
        "SELECT CAST(COALESCE(SUM(price_ils), 0) AS REAL) FROM appointment WHERE status = 'COMPLETED'",
    )
    .fetch_one(db)
    .await?;
    Ok(total)
}

/// Group by day with count, days without appointments omitted
pub async fn appointments_per_day(
    db: impl SqliteExecutor<'_>,
    from: i64,
    to: i64,
) -> RepoResult<Vec<DailyCount>> {
    let sql = format!(
        "SELECT {DAY_EXPR} AS day, COUNT(*) AS count FROM appointment a \
         WHERE a.starts_at >= ?1 AND a.starts_at < ?2 GROUP BY day ORDER BY day"
    );
    let rows = sqlx::query_as::<_, DailyCount>(&sql)
        .bind(from)
        .bind(to)
        .fetch_all(db)
        .await?;
    Ok(rows)
}

pub async fn revenue_per_day(
    db: impl SqliteExecutor<'_>,
    from: i64,
    to: i64,
) -> RepoResult<Vec<DailyRevenue>> {
    let sql = format!(
        "SELECT {DAY_EXPR} AS day, COUNT(*) AS appointments, \
                CAST(COALESCE(SUM(a.price_ils), 0) AS REAL) AS revenue_ils \
         FROM appointment a \
         WHERE a.status = 'COMPLETED' AND a.starts_at >= ?1 AND a.starts_at < ?2 \
         GROUP BY day ORDER BY day"
    );
    let rows = sqlx::query_as::<_, DailyRevenue>(&sql)
        .bind(from)
        .bind(to)
        .fetch_all(db)
        .await?;
    Ok(rows)
}

/// Booked minutes per active staff member (PENDING, CONFIRMED, COMPLETED)
pub async fn staff_utilisation(
    db: impl SqliteExecutor<'_>,
    from: i64,
    to: i64,
) -> RepoResult<Vec<StaffUtilisation>> {
    let rows = sqlx::query_as::<_, StaffUtilisation>(
        "SELECT s.id AS staff_id, s.name AS staff_name, COUNT(a.id) AS appointments, \
                COALESCE(SUM((a.ends_at - a.starts_at) / 60000), 0) AS booked_minutes \
         FROM staff s \
         LEFT JOIN appointment a ON a.staff_id = s.id \
              AND a.status IN ('PENDING', 'CONFIRMED', 'COMPLETED') \
              AND a.starts_at >= ?1 AND a.starts_at < ?2 \
         WHERE s.is_active = 1 \
         GROUP BY s.id, s.name \
         ORDER BY booked_minutes DESC, s.name",
    )
    .bind(from)
    .bind(to)
    .fetch_all(db)
    .await?;
    Ok(rows)
}
