//! Time Off Repository

use super::{RepoError, RepoResult};
use shared::models::{TimeOff, TimeOffCreate};
use sqlx::{SqliteConnection, SqliteExecutor};

const TIME_OFF_COLUMNS: &str = "id, staff_id, time_off_type, starts_at, ends_at, reason, created_at";

pub async fn find_by_id(db: impl SqliteExecutor<'_>, id: i64) -> RepoResult<Option<TimeOff>> {
    let sql = format!("SELECT {TIME_OFF_COLUMNS} FROM time_off WHERE id = ?");
    let row = sqlx::query_as::<_, TimeOff>(&sql)
        .bind(id)
        .fetch_optional(db)
        .await?;
    Ok(row)
}

pub async fn find_by_staff(db: impl SqliteExecutor<'_>, staff_id: i64) -> RepoResult<Vec<TimeOff>> {
    let sql =
        format!("SELECT {TIME_OFF_COLUMNS} FROM time_off WHERE staff_id = ? ORDER BY starts_at, id");
    let rows = sqlx::query_as::<_, TimeOff>(&sql)
        .bind(staff_id)
        .fetch_all(db)
        .await?;
    Ok(rows)
}

/// Time off touching the closed range `[from, to]`
pub async fn find_intersecting(
    db: impl SqliteExecutor<'_>,
    staff_id: i64,
    from: i64,
    to: i64,
) -> RepoResult<Vec<TimeOff>> {
    let sql = format!(
        "SELECT {TIME_OFF_COLUMNS} FROM time_off \
         WHERE staff_id = ?1 AND starts_at <= ?3 AND ends_at >= ?2 ORDER BY starts_at, id"
    );
    let rows = sqlx::query_as::<_, TimeOff>(&sql)
        .bind(staff_id)
        .bind(from)
        .bind(to)
        .fetch_all(db)
        .await?;
    Ok(rows)
}

pub async fn insert(
    conn: &mut SqliteConnection,
    staff_id: i64,
    data: &TimeOffCreate,
) -> RepoResult<TimeOff> {
    let id = shared::util::snowflake_id();
    let now = shared::util::now_millis();
    sqlx::query(
        "INSERT INTO time_off (id, staff_id, time_off_type, starts_at, ends_at, reason, created_at) \
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
    )
    .bind(id)
    .bind(staff_id)
    .bind(data.time_off_type)
    .bind(data.starts_at)
    .bind(data.ends_at)
    .bind(&data.reason)
    .bind(now)
    .execute(&mut *conn)
    .await?;
    find_by_id(&mut *conn, id)
        .await?
        .ok_or_else(|| RepoError::Database("Failed to create time off".into()))
}

pub async fn delete(db: impl SqliteExecutor<'_>, id: i64) -> RepoResult<bool> {
    let rows = sqlx::query("DELETE FROM time_off WHERE id = ?")
        .bind(id)
        .execute(db)
        .await?;
    Ok(rows.rows_affected() > 0)
}
