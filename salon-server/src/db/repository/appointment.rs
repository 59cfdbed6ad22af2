//! Appointment Repository
//!
//! Only PENDING and CONFIRMED rows take part in overlap checks. Intervals are
//! half-open `[starts_at, ends_at)` in Unix millis.

use super::{RepoError, RepoResult};
use shared::models::{
    Appointment, AppointmentDetail, AppointmentFilter, AppointmentStatus, ServiceSummary,
    StaffSummary,
};
use sqlx::{SqliteConnection, SqliteExecutor};

const APPOINTMENT_COLUMNS: &str = "a.id, a.client_id, a.service_id, a.staff_id, a.starts_at, a.ends_at, \
     a.status, a.price_ils, a.notes, a.source, a.reminder_sent, a.created_at, a.updated_at";

const DETAIL_JOINS: &str = "FROM appointment a \
     JOIN service sv ON sv.id = a.service_id \
     LEFT JOIN staff st ON st.id = a.staff_id";

/// Appointment row joined with service and staff columns
#[derive(sqlx::FromRow)]
struct DetailRow {
    #[sqlx(flatten)]
    appointment: Appointment,
    service_name: String,
    service_duration_min: i32,
    service_price_ils: f64,
    staff_name: Option<String>,
}

impl From<DetailRow> for AppointmentDetail {
    fn from(row: DetailRow) -> Self {
        let service = ServiceSummary {
            id: row.appointment.service_id,
            name: row.service_name,
            duration_min: row.service_duration_min,
            price_ils: row.service_price_ils,
        };
        let staff = match (row.appointment.staff_id, row.staff_name) {
            (Some(id), Some(name)) => Some(StaffSummary { id, name }),
            _ => None,
        };
        Self {
            appointment: row.appointment,
            service,
            staff,
        }
    }
}

fn detail_select(where_clause: &str) -> String {
    format!(
        "SELECT {APPOINTMENT_COLUMNS}, sv.name AS service_name, sv.duration_min AS service_duration_min, \
         sv.price_ils AS service_price_ils, st.name AS staff_name {DETAIL_JOINS} {where_clause}"
    )
}

// ── Reads ───────────────────────────────────────────────────

pub async fn find_by_id(db: impl SqliteExecutor<'_>, id: i64) -> RepoResult<Option<Appointment>> {
    let sql = format!("SELECT {APPOINTMENT_COLUMNS} FROM appointment a WHERE a.id = ?");
    let row = sqlx::query_as::<_, Appointment>(&sql)
        .bind(id)
        .fetch_optional(db)
        .await?;
    Ok(row)
}

pub async fn find_detail(
    db: impl SqliteExecutor<'_>,
    id: i64,
) -> RepoResult<Option<AppointmentDetail>> {
    let sql = detail_select("WHERE a.id = ?");
    let row = sqlx::query_as::<_, DetailRow>(&sql)
        .bind(id)
        .fetch_optional(db)
        .await?;
    Ok(row.map(AppointmentDetail::from))
}

/// Filtered listing, newest first within the window
pub async fn list(
    db: impl SqliteExecutor<'_>,
    filter: &AppointmentFilter,
) -> RepoResult<Vec<AppointmentDetail>> {
    let sql = detail_select(
        "WHERE (?1 IS NULL OR a.client_id = ?1) \
           AND (?2 IS NULL OR a.staff_id = ?2) \
           AND (?3 IS NULL OR a.status = ?3) \
           AND (?4 IS NULL OR a.starts_at >= ?4) \
           AND (?5 IS NULL OR a.starts_at < ?5) \
         ORDER BY a.starts_at DESC, a.id DESC LIMIT ?6 OFFSET ?7",
    );
    let rows = sqlx::query_as::<_, DetailRow>(&sql)
        .bind(filter.client_id)
        .bind(filter.staff_id)
        .bind(filter.status)
        .bind(filter.from)
        .bind(filter.to)
        // SQLite treats a negative LIMIT as unbounded
        .bind(filter.limit.unwrap_or(-1))
        .bind(filter.offset.unwrap_or(0))
        .fetch_all(db)
        .await?;
    Ok(rows.into_iter().map(AppointmentDetail::from).collect())
}

/// Blocking appointments of a staff member starting inside `[from, to]`
pub async fn find_blocking_starting_between(
    db: impl SqliteExecutor<'_>,
    staff_id: i64,
    from: i64,
    to: i64,
) -> RepoResult<Vec<Appointment>> {
    let sql = format!(
        "SELECT {APPOINTMENT_COLUMNS} FROM appointment a \
         WHERE a.staff_id = ?1 AND a.status IN ('PENDING', 'CONFIRMED') \
           AND a.starts_at >= ?2 AND a.starts_at <= ?3 \
         ORDER BY a.starts_at, a.id"
    );
    let rows = sqlx::query_as::<_, Appointment>(&sql)
        .bind(staff_id)
        .bind(from)
        .bind(to)
        .fetch_all(db)
        .await?;
    Ok(rows)
}

/// Whether a blocking appointment of `staff_id` intersects `[starts_at, ends_at)`
pub async fn has_overlap(
    db: impl SqliteExecutor<'_>,
    staff_id: i64,
    starts_at: i64,
    ends_at: i64,
    exclude_id: Option<i64>,
) -> RepoResult<bool> {
    let found: Option<i64> = sqlx::query_scalar(
        "SELECT a.id FROM appointment a \
         WHERE a.staff_id = ?1 AND a.status IN ('PENDING', 'CONFIRMED') \
           AND a.starts_at < ?3 AND a.ends_at > ?2 \
           AND (?4 IS NULL OR a.id != ?4) \
         LIMIT 1",
    )
    .bind(staff_id)
    .bind(starts_at)
    .bind(ends_at)
    .bind(exclude_id)
    .fetch_optional(db)
    .await?;
    Ok(found.is_some())
}

/// Blocking appointments starting in `[from, to)` that have not been reminded
pub async fn find_due_reminders(
    db: impl SqliteExecutor<'_>,
    from: i64,
    to: i64,
) -> RepoResult<Vec<AppointmentDetail>> {
    let sql = detail_select(
        "WHERE a.status IN ('PENDING', 'CONFIRMED') AND a.reminder_sent = 0 \
           AND a.starts_at >= ?1 AND a.starts_at < ?2 \
         ORDER BY a.starts_at, a.id",
    );
    let rows = sqlx::query_as::<_, DetailRow>(&sql)
        .bind(from)
        .bind(to)
        .fetch_all(db)
        .await?;
    Ok(rows.into_iter().map(AppointmentDetail::from).collect())
}

// ── Writes ──────────────────────────────────────────────────

pub async fn insert(db: impl SqliteExecutor<'_>, apt: &Appointment) -> RepoResult<()> {
    sqlx::query(
        "INSERT INTO appointment (id, client_id, service_id, staff_id, starts_at, ends_at, status, \
         price_ils, notes, source, reminder_sent, created_at, updated_at) \
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13)",
    )
    .bind(apt.id)
    .bind(apt.client_id)
    .bind(apt.service_id)
    .bind(apt.staff_id)
    .bind(apt.starts_at)
    .bind(apt.ends_at)
    .bind(apt.status)
    .bind(apt.price_ils)
    .bind(&apt.notes)
    .bind(apt.source)
    .bind(apt.reminder_sent)
    .bind(apt.created_at)
    .bind(apt.updated_at)
    .execute(db)
    .await?;
    Ok(())
}

/// Move an appointment (and optionally reassign it); clears the reminder flag
pub async fn update_schedule(
    db: impl SqliteExecutor<'_>,
    id: i64,
    staff_id: Option<i64>,
    starts_at: i64,
    ends_at: i64,
    now: i64,
) -> RepoResult<()> {
    let rows = sqlx::query(
        "UPDATE appointment SET staff_id = ?1, starts_at = ?2, ends_at = ?3, reminder_sent = 0, updated_at = ?4 \
         WHERE id = ?5",
    )
    .bind(staff_id)
    .bind(starts_at)
    .bind(ends_at)
    .bind(now)
    .bind(id)
    .execute(db)
    .await?;
    if rows.rows_affected() == 0 {
        return Err(RepoError::NotFound(format!("Appointment {id} not found")));
    }
    Ok(())
}

pub async fn update_status(
    db: impl SqliteExecutor<'_>,
    id: i64,
    status: AppointmentStatus,
    now: i64,
) -> RepoResult<()> {
    let rows = sqlx::query("UPDATE appointment SET status = ?1, updated_at = ?2 WHERE id = ?3")
        .bind(status)
        .bind(now)
        .bind(id)
        .execute(db)
        .await?;
    if rows.rows_affected() == 0 {
        return Err(RepoError::NotFound(format!("Appointment {id} not found")));
    }
    Ok(())
}

pub async fn update_price(
    db: impl SqliteExecutor<'_>,
    id: i64,
    price_ils: Option<f64>,
    now: i64,
) -> RepoResult<()> {
    let rows = sqlx::query("UPDATE appointment SET price_ils = ?1, updated_at = ?2 WHERE id = ?3")
        .bind(price_ils)
        .bind(now)
        .bind(id)
        .execute(db)
        .await?;
    if rows.rows_affected() == 0 {
        return Err(RepoError::NotFound(format!("Appointment {id} not found")));
    }
    Ok(())
}

pub async fn mark_reminded(db: impl SqliteExecutor<'_>, id: i64, now: i64) -> RepoResult<()> {
    sqlx::query("UPDATE appointment SET reminder_sent = 1, updated_at = ?1 WHERE id = ?2")
        .bind(now)
        .bind(id)
        .execute(db)
        .await?;
    Ok(())
}

// ── Staff cascades ──────────────────────────────────────────

/// Flag blocking appointments intersecting a time-off span as RESCHEDULE_PENDING
///
/// Time off is a closed interval, so an appointment ending exactly at
/// `from` is untouched while one starting exactly at `to` is caught.
pub async fn mark_reschedule_pending(
    conn: &mut SqliteConnection,
    staff_id: i64,
    from: i64,
    to: i64,
    now: i64,
) -> RepoResult<Vec<i64>> {
    let ids: Vec<i64> = sqlx::query_scalar(
        "UPDATE appointment SET status = 'RESCHEDULE_PENDING', updated_at = ?4 \
         WHERE staff_id = ?1 AND status IN ('PENDING', 'CONFIRMED') \
           AND starts_at <= ?3 AND ends_at > ?2 \
         RETURNING id",
    )
    .bind(staff_id)
    .bind(from)
    .bind(to)
    .bind(now)
    .fetch_all(&mut *conn)
    .await?;
    Ok(ids)
}

/// Cancel every open appointment of a staff member starting at or after `now`
pub async fn cancel_future_for_staff(
    conn: &mut SqliteConnection,
    staff_id: i64,
    now: i64,
) -> RepoResult<Vec<i64>> {
    let ids: Vec<i64> = sqlx::query_scalar(
        "UPDATE appointment SET status = 'CANCELLED', updated_at = ?2 \
         WHERE staff_id = ?1 AND status IN ('PENDING', 'CONFIRMED', 'RESCHEDULE_PENDING') \
           AND starts_at >= ?2 \
         RETURNING id",
    )
    .bind(staff_id)
    .bind(now)
    .fetch_all(&mut *conn)
    .await?;
    Ok(ids)
}

/// Detach all appointments from a staff member; history is kept unassigned
pub async fn unassign_staff(conn: &mut SqliteConnection, staff_id: i64, now: i64) -> RepoResult<u64> {
    let rows = sqlx::query("UPDATE appointment SET staff_id = NULL, updated_at = ?2 WHERE staff_id = ?1")
        .bind(staff_id)
        .bind(now)
        .execute(&mut *conn)
        .await?;
    Ok(rows.rows_affected())
}
