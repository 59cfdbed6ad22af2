//! Service (catalog) Repository

use super::{RepoError, RepoResult};
use shared::models::{Service, ServiceCreate, ServiceUpdate};
use sqlx::{SqliteConnection, SqliteExecutor};

const SERVICE_COLUMNS: &str =
    "id, name, description, duration_min, price_ils, is_active, created_at, updated_at";

pub async fn find_by_id(db: impl SqliteExecutor<'_>, id: i64) -> RepoResult<Option<Service>> {
    let sql = format!("SELECT {SERVICE_COLUMNS} FROM service WHERE id = ?");
    let service = sqlx::query_as::<_, Service>(&sql)
        .bind(id)
        .fetch_optional(db)
        .await?;
    Ok(service)
}

pub async fn find_all(
    db: impl SqliteExecutor<'_>,
    include_inactive: bool,
) -> RepoResult<Vec<Service>> {
    let sql = format!(
        "SELECT {SERVICE_COLUMNS} FROM service WHERE (?1 OR is_active = 1) ORDER BY name, id"
    );
    let services = sqlx::query_as::<_, Service>(&sql)
        .bind(include_inactive)
        .fetch_all(db)
        .await?;
    Ok(services)
}

pub async fn create(conn: &mut SqliteConnection, data: &ServiceCreate) -> RepoResult<Service> {
    let id = shared::util::snowflake_id();
    let now = shared::util::now_millis();
    sqlx::query(
        "INSERT INTO service (id, name, description, duration_min, price_ils, is_active, created_at, updated_at) \
         VALUES (?1, ?2, ?3, ?4, ?5, 1, ?6, ?6)",
    )
    .bind(id)
    .bind(data.name.trim())
    .bind(&data.description)
    .bind(data.duration_min)
    .bind(data.price_ils)
    .bind(now)
    .execute(&mut *conn)
    .await?;
    find_by_id(&mut *conn, id)
        .await?
        .ok_or_else(|| RepoError::Database("Failed to create service".into()))
}

/// Partial update; existing appointments keep their booked `ends_at`
pub async fn update(
    conn: &mut SqliteConnection,
    id: i64,
    data: &ServiceUpdate,
) -> RepoResult<Service> {
    let now = shared::util::now_millis();
    let rows = sqlx::query(
        "UPDATE service SET name = COALESCE(?1, name), description = COALESCE(?2, description), \
         duration_min = COALESCE(?3, duration_min), price_ils = COALESCE(?4, price_ils), \
         is_active = COALESCE(?5, is_active), updated_at = ?6 WHERE id = ?7",
    )
    .bind(data.name.as_deref().map(str::trim))
    .bind(&data.description)
    .bind(data.duration_min)
    .bind(data.price_ils)
    .bind(data.is_active)
    .bind(now)
    .bind(id)
    .execute(&mut *conn)
    .await?;
    if rows.rows_affected() == 0 {
        return Err(RepoError::NotFound(format!("Service {id} not found")));
    }
    find_by_id(&mut *conn, id)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("Service {id} not found")))
}

pub async fn count_active(db: impl SqliteExecutor<'_>) -> RepoResult<i64> {
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM service WHERE is_active = 1")
        .fetch_one(db)
        .await?;
    Ok(count)
}
