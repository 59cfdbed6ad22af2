//! Service catalog administration
//!
//! Changing a service's duration does not touch existing appointments;
//! their `ends_at` was fixed at booking time.

use shared::error::{AppError, AppResult, ErrorCode};
use shared::models::{Service, ServiceCreate, ServiceUpdate};

use crate::auth::{CurrentUser, permissions};
use crate::db::DbService;
use crate::db::repository::{RepoError, service};
use crate::scheduling::appointments::db_err;
use crate::utils::validation::{
    MAX_NAME_LEN, MAX_NOTE_LEN, validate_duration, validate_optional_text, validate_price,
    validate_required_text,
};

fn service_not_found(service_id: i64) -> AppError {
    AppError::with_message(
        ErrorCode::ServiceNotFound,
        format!("Service {service_id} not found"),
    )
    .with_detail("service_id", service_id)
}

#[derive(Clone)]
pub struct CatalogService {
    db: DbService,
}

impl CatalogService {
    pub fn new(db: DbService) -> Self {
        Self { db }
    }

    pub async fn create(&self, actor: &CurrentUser, data: ServiceCreate) -> AppResult<Service> {
        actor.require(permissions::SERVICES_MANAGE)?;
        validate_required_text(&data.name, "name", MAX_NAME_LEN)?;
        validate_optional_text(&data.description, "description", MAX_NOTE_LEN)?;
        validate_duration(data.duration_min)?;
        validate_price(data.price_ils)?;

        let mut conn = self.db.pool.acquire().await.map_err(db_err)?;
        let created = service::create(&mut conn, &data).await?;
        tracing::info!(service_id = created.id, name = %created.name, "Service created");
        Ok(created)
    }

    pub async fn update(
        &self,
        actor: &CurrentUser,
        service_id: i64,
        data: ServiceUpdate,
    ) -> AppResult<Service> {
        actor.require(permissions::SERVICES_MANAGE)?;
        if let Some(name) = &data.name {
            validate_required_text(name, "name", MAX_NAME_LEN)?;
        }
        validate_optional_text(&data.description, "description", MAX_NOTE_LEN)?;
        if let Some(duration) = data.duration_min {
            validate_duration(duration)?;
        }
        if let Some(price) = data.price_ils {
            validate_price(price)?;
        }

        let mut conn = self.db.pool.acquire().await.map_err(db_err)?;
        let updated = service::update(&mut conn, service_id, &data)
            .await
            .map_err(|e| match e {
                RepoError::NotFound(_) => service_not_found(service_id),
                other => other.into(),
            })?;
        tracing::info!(service_id, is_active = updated.is_active, "Service updated");
        Ok(updated)
    }

    pub async fn find(&self, service_id: i64) -> AppResult<Service> {
        service::find_by_id(&self.db.pool, service_id)
            .await?
            .ok_or_else(|| service_not_found(service_id))
    }

    pub async fn list(&self, include_inactive: bool) -> AppResult<Vec<Service>> {
        Ok(service::find_all(&self.db.pool, include_inactive).await?)
    }
}
