//! Working Hours Repository

use super::RepoResult;
use shared::models::{WorkingHours, WorkingHoursInput};
use sqlx::{SqliteConnection, SqliteExecutor};

pub async fn find_by_staff(
    db: impl SqliteExecutor<'_>,
    staff_id: i64,
) -> RepoResult<Vec<WorkingHours>> {
    let rows = sqlx::query_as::<_, WorkingHours>(
        "SELECT id, staff_id, weekday, start_time, end_time FROM working_hours \
         WHERE staff_id = ? ORDER BY weekday, start_time, id",
    )
    .bind(staff_id)
    .fetch_all(db)
    .await?;
    Ok(rows)
}

/// All rows for one weekday (0 = Sunday); several rows may match
pub async fn find_by_staff_weekday(
    db: impl SqliteExecutor<'_>,
    staff_id: i64,
    weekday: i32,
) -> RepoResult<Vec<WorkingHours>> {
    let rows = sqlx::query_as::<_, WorkingHours>(
        "SELECT id, staff_id, weekday, start_time, end_time FROM working_hours \
         WHERE staff_id = ?1 AND weekday = ?2 ORDER BY start_time, id",
    )
    .bind(staff_id)
    .bind(weekday)
    .fetch_all(db)
    .await?;
    Ok(rows)
}

/// Replace the weekly schedule of a staff member
pub async fn replace_for_staff(
    conn: &mut SqliteConnection,
    staff_id: i64,
    hours: &[WorkingHoursInput],
) -> RepoResult<Vec<WorkingHours>> {
    sqlx::query("DELETE FROM working_hours WHERE staff_id = ?")
        .bind(staff_id)
        .execute(&mut *conn)
        .await?;
    for entry in hours {
        sqlx::query(
            "INSERT INTO working_hours (id, staff_id, weekday, start_time, end_time) VALUES (?1, ?2, ?3, ?4, ?5)",
        )
        .bind(shared::util::snowflake_id())
        .bind(staff_id)
        .bind(entry.weekday)
        .bind(&entry.start_time)
        .bind(&entry.end_time)
        .execute(&mut *conn)
        .await?;
    }
    find_by_staff(&mut *conn, staff_id).await
}
