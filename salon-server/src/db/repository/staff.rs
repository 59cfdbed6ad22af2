//! Staff Repository

use super::{RepoError, RepoResult};
use shared::models::{Service, Staff, StaffCreate, StaffUpdate};
use sqlx::{SqliteConnection, SqliteExecutor};

const STAFF_COLUMNS: &str = "id, name, bio, is_active, created_at, updated_at";

pub async fn find_by_id(db: impl SqliteExecutor<'_>, id: i64) -> RepoResult<Option<Staff>> {
    let sql = format!("SELECT {STAFF_COLUMNS} FROM staff WHERE id = ?");
    let staff = sqlx::query_as::<_, Staff>(&sql)
        .bind(id)
        .fetch_optional(db)
        .await?;
    Ok(staff)
}

pub async fn find_all(db: impl SqliteExecutor<'_>, include_inactive: bool) -> RepoResult<Vec<Staff>> {
    let sql = format!(
        "SELECT {STAFF_COLUMNS} FROM staff WHERE (?1 OR is_active = 1) ORDER BY name, id"
    );
    let staff = sqlx::query_as::<_, Staff>(&sql)
        .bind(include_inactive)
        .fetch_all(db)
        .await?;
    Ok(staff)
}

/// Insert a staff member together with its service assignments
pub async fn create(conn: &mut SqliteConnection, data: &StaffCreate) -> RepoResult<Staff> {
    let id = shared::util::snowflake_id();
    let now = shared::util::now_millis();
    sqlx::query(
        "INSERT INTO staff (id, name, bio, is_active, created_at, updated_at) VALUES (?1, ?2, ?3, 1, ?4, ?4)",
    )
    .bind(id)
    .bind(data.name.trim())
    .bind(&data.bio)
    .bind(now)
    .execute(&mut *conn)
    .await?;

    replace_services(&mut *conn, id, &data.service_ids).await?;

    find_by_id(&mut *conn, id)
        .await?
        .ok_or_else(|| RepoError::Database("Failed to create staff".into()))
}

pub async fn update(conn: &mut SqliteConnection, id: i64, data: &StaffUpdate) -> RepoResult<Staff> {
    let now = shared::util::now_millis();
    let rows = sqlx::query(
        "UPDATE staff SET name = COALESCE(?1, name), bio = COALESCE(?2, bio), updated_at = ?3 WHERE id = ?4",
    )
    .bind(data.name.as_deref().map(str::trim))
    .bind(&data.bio)
    .bind(now)
    .bind(id)
    .execute(&mut *conn)
    .await?;
    if rows.rows_affected() == 0 {
        return Err(RepoError::NotFound(format!("Staff {id} not found")));
    }
    find_by_id(&mut *conn, id)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("Staff {id} not found")))
}

pub async fn set_active(
    db: impl SqliteExecutor<'_>,
    id: i64,
    is_active: bool,
    now: i64,
) -> RepoResult<bool> {
    let rows = sqlx::query("UPDATE staff SET is_active = ?1, updated_at = ?2 WHERE id = ?3")
        .bind(is_active)
        .bind(now)
        .bind(id)
        .execute(db)
        .await?;
    Ok(rows.rows_affected() > 0)
}

/// Remove a staff row with its schedule, time off and service links
///
/// Appointments must already be detached; see
/// [`super::appointment::unassign_staff`].
pub async fn delete(conn: &mut SqliteConnection, id: i64) -> RepoResult<bool> {
    for sql in [
        "DELETE FROM working_hours WHERE staff_id = ?",
        "DELETE FROM time_off WHERE staff_id = ?",
        "DELETE FROM staff_service WHERE staff_id = ?",
    ] {
        sqlx::query(sql).bind(id).execute(&mut *conn).await?;
    }
    let rows = sqlx::query("DELETE FROM staff WHERE id = ?")
        .bind(id)
        .execute(&mut *conn)
        .await?;
    Ok(rows.rows_affected() > 0)
}

// ── Service assignments ─────────────────────────────────────

/// Replace the full set of services a staff member performs
pub async fn replace_services(
    conn: &mut SqliteConnection,
    staff_id: i64,
    service_ids: &[i64],
) -> RepoResult<()> {
    sqlx::query("DELETE FROM staff_service WHERE staff_id = ?")
        .bind(staff_id)
        .execute(&mut *conn)
        .await?;
    for service_id in service_ids {
        sqlx::query(
            "INSERT OR IGNORE INTO staff_service (staff_id, service_id) VALUES (?1, ?2)",
        )
        .bind(staff_id)
        .bind(service_id)
        .execute(&mut *conn)
        .await?;
    }
    Ok(())
}

pub async fn find_services(db: impl SqliteExecutor<'_>, staff_id: i64) -> RepoResult<Vec<Service>> {
    let services = sqlx::query_as::<_, Service>(
        "SELECT s.id, s.name, s.description, s.duration_min, s.price_ils, s.is_active, s.created_at, s.updated_at \
         FROM service s JOIN staff_service ss ON ss.service_id = s.id \
         WHERE ss.staff_id = ? ORDER BY s.name, s.id",
    )
    .bind(staff_id)
    .fetch_all(db)
    .await?;
    Ok(services)
}

/// Whether the staff member is assigned to perform the service
pub async fn offers_service(
    db: impl SqliteExecutor<'_>,
    staff_id: i64,
    service_id: i64,
) -> RepoResult<bool> {
    let found: Option<i64> = sqlx::query_scalar(
        "SELECT 1 FROM staff_service WHERE staff_id = ?1 AND service_id = ?2",
    )
    .bind(staff_id)
    .bind(service_id)
    .fetch_optional(db)
    .await?;
    Ok(found.is_some())
}

pub async fn count_active(db: impl SqliteExecutor<'_>) -> RepoResult<i64> {
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM staff WHERE is_active = 1")
        .fetch_one(db)
        .await?;
    Ok(count)
}
