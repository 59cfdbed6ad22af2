//! Staff lifecycle
//!
//! Reference-data administration of staff members (profile, services,
//! weekly schedule) plus the two operations that cascade into existing
//! appointments:
//!
//! - registering time off flags intersecting PENDING/CONFIRMED appointments
//!   as RESCHEDULE_PENDING
//! - deactivating or deleting a staff member cancels their future open
//!   appointments
//!
//! Each cascade commits atomically with the staff write and holds the staff
//! lock, so no booking for that staff member can interleave.

use std::sync::Arc;

use shared::error::{AppError, AppResult, ErrorCode};
use shared::models::{
    Service, Staff, StaffCreate, StaffRemoval, StaffUpdate, TimeOff, TimeOffCreate,
    TimeOffRegistration, WorkingHours, WorkingHoursInput,
};
use sqlx::SqliteConnection;

use crate::auth::{CurrentUser, permissions};
use crate::db::DbService;
use crate::db::repository::{RepoError, appointment, service, staff, time_off, working_hours};
use crate::notify::{AppointmentEvent, AppointmentNotifier, dispatch};
use crate::scheduling::StaffLocks;
use crate::scheduling::appointments::db_err;
use crate::utils::validation::{
    MAX_NAME_LEN, MAX_NOTE_LEN, validate_optional_text, validate_required_text,
    validate_working_hours,
};

fn staff_not_found(staff_id: i64) -> AppError {
    AppError::with_message(ErrorCode::StaffNotFound, format!("Staff {staff_id} not found"))
        .with_detail("staff_id", staff_id)
}

#[derive(Clone)]
pub struct StaffService {
    db: DbService,
    locks: StaffLocks,
    notifier: Arc<dyn AppointmentNotifier>,
}

impl StaffService {
    pub fn new(db: DbService, locks: StaffLocks, notifier: Arc<dyn AppointmentNotifier>) -> Self {
        Self {
            db,
            locks,
            notifier,
        }
    }

    // ── Profile ─────────────────────────────────────────────

    pub async fn create(&self, actor: &CurrentUser, data: StaffCreate) -> AppResult<Staff> {
        actor.require(permissions::STAFF_MANAGE)?;
        validate_required_text(&data.name, "name", MAX_NAME_LEN)?;
        validate_optional_text(&data.bio, "bio", MAX_NOTE_LEN)?;

        let mut tx = self.db.begin_write().await.map_err(db_err)?;
        ensure_services_exist(&mut tx, &data.service_ids).await?;
        let created = staff::create(&mut tx, &data).await?;
        tx.commit().await.map_err(db_err)?;

        tracing::info!(staff_id = created.id, name = %created.name, "Staff created");
        Ok(created)
    }

    pub async fn update(
        &self,
        actor: &CurrentUser,
        staff_id: i64,
        data: StaffUpdate,
    ) -> AppResult<Staff> {
        actor.require(permissions::STAFF_MANAGE)?;
        if let Some(name) = &data.name {
            validate_required_text(name, "name", MAX_NAME_LEN)?;
        }
        validate_optional_text(&data.bio, "bio", MAX_NOTE_LEN)?;

        let mut conn = self.db.pool.acquire().await.map_err(db_err)?;
        let updated = staff::update(&mut conn, staff_id, &data)
            .await
            .map_err(|e| match e {
                RepoError::NotFound(_) => staff_not_found(staff_id),
                other => other.into(),
            })?;
        tracing::info!(staff_id, "Staff updated");
        Ok(updated)
    }

    pub async fn find(&self, staff_id: i64) -> AppResult<Staff> {
        staff::find_by_id(&self.db.pool, staff_id)
            .await?
            .ok_or_else(|| staff_not_found(staff_id))
    }

    pub async fn list(&self, include_inactive: bool) -> AppResult<Vec<Staff>> {
        Ok(staff::find_all(&self.db.pool, include_inactive).await?)
    }

    /// Bring a deactivated staff member back; cancelled appointments stay cancelled
    pub async fn activate(&self, actor: &CurrentUser, staff_id: i64) -> AppResult<Staff> {
        actor.require(permissions::STAFF_MANAGE)?;
        let now = shared::util::now_millis();
        if !staff::set_active(&self.db.pool, staff_id, true, now).await? {
            return Err(staff_not_found(staff_id));
        }
        tracing::info!(staff_id, "Staff activated");
        self.find(staff_id).await
    }

    // ── Services ────────────────────────────────────────────

    pub async fn set_services(
        &self,
        actor: &CurrentUser,
        staff_id: i64,
        service_ids: Vec<i64>,
    ) -> AppResult<Vec<Service>> {
        actor.require(permissions::STAFF_MANAGE)?;
        let mut tx = self.db.begin_write().await.map_err(db_err)?;
        staff::find_by_id(&mut *tx, staff_id)
            .await?
            .ok_or_else(|| staff_not_found(staff_id))?;
        ensure_services_exist(&mut tx, &service_ids).await?;
        staff::replace_services(&mut tx, staff_id, &service_ids).await?;
        let services = staff::find_services(&mut *tx, staff_id).await?;
        tx.commit().await.map_err(db_err)?;

        tracing::info!(staff_id, services = services.len(), "Staff services replaced");
        Ok(services)
    }

    pub async fn services(&self, staff_id: i64) -> AppResult<Vec<Service>> {
        self.find(staff_id).await?;
        Ok(staff::find_services(&self.db.pool, staff_id).await?)
    }

    // ── Weekly schedule ─────────────────────────────────────

    /// Replace the weekly schedule; several windows per weekday are allowed
    pub async fn set_working_hours(
        &self,
        actor: &CurrentUser,
        staff_id: i64,
        hours: Vec<WorkingHoursInput>,
    ) -> AppResult<Vec<WorkingHours>> {
        actor.require(permissions::STAFF_MANAGE)?;
        for entry in &hours {
            validate_working_hours(entry)?;
        }

        let mut tx = self.db.begin_write().await.map_err(db_err)?;
        staff::find_by_id(&mut *tx, staff_id)
            .await?
            .ok_or_else(|| staff_not_found(staff_id))?;
        let saved = working_hours::replace_for_staff(&mut tx, staff_id, &hours).await?;
        tx.commit().await.map_err(db_err)?;

        tracing::info!(staff_id, windows = saved.len(), "Working hours replaced");
        Ok(saved)
    }

    pub async fn working_hours(&self, staff_id: i64) -> AppResult<Vec<WorkingHours>> {
        self.find(staff_id).await?;
        Ok(working_hours::find_by_staff(&self.db.pool, staff_id).await?)
    }

    // ── Time off ────────────────────────────────────────────

    /// Record time off and push intersecting open appointments to RESCHEDULE_PENDING
    ///
    /// The span is a closed interval. A span with `starts_at > ends_at` is
    /// stored as given and matches no appointment.
    pub async fn register_time_off(
        &self,
        actor: &CurrentUser,
        staff_id: i64,
        data: TimeOffCreate,
    ) -> AppResult<TimeOffRegistration> {
        actor.require(permissions::STAFF_MANAGE)?;
        validate_optional_text(&data.reason, "reason", MAX_NOTE_LEN)?;
        if data.starts_at > data.ends_at {
            tracing::warn!(
                staff_id,
                starts_at = data.starts_at,
                ends_at = data.ends_at,
                "Time off ends before it starts"
            );
        }

        let _guard = self.locks.acquire(staff_id).await;
        let mut tx = self.db.begin_write().await.map_err(db_err)?;
        staff::find_by_id(&mut *tx, staff_id)
            .await?
            .ok_or_else(|| staff_not_found(staff_id))?;

        let created = time_off::insert(&mut tx, staff_id, &data).await?;
        let now = shared::util::now_millis();
        let appointment_ids = appointment::mark_reschedule_pending(
            &mut tx,
            staff_id,
            created.starts_at,
            created.ends_at,
            now,
        )
        .await?;
        tx.commit().await.map_err(db_err)?;

        tracing::info!(
            staff_id,
            time_off_id = created.id,
            kind = ?created.time_off_type,
            affected = appointment_ids.len(),
            "Time off registered"
        );
        Ok(TimeOffRegistration {
            time_off: created,
            affected_appointments: appointment_ids.len() as u64,
            appointment_ids,
        })
    }

    pub async fn time_off(&self, staff_id: i64) -> AppResult<Vec<TimeOff>> {
        self.find(staff_id).await?;
        Ok(time_off::find_by_staff(&self.db.pool, staff_id).await?)
    }

    /// Remove a time-off entry; flagged appointments are not restored
    pub async fn delete_time_off(&self, actor: &CurrentUser, time_off_id: i64) -> AppResult<()> {
        actor.require(permissions::STAFF_MANAGE)?;
        if !time_off::delete(&self.db.pool, time_off_id).await? {
            return Err(AppError::with_message(
                ErrorCode::TimeOffNotFound,
                format!("Time off {time_off_id} not found"),
            ));
        }
        tracing::info!(time_off_id, "Time off deleted");
        Ok(())
    }

    // ── Deactivation / removal ──────────────────────────────

    /// Cancel future open appointments and mark the staff member inactive
    ///
    /// "Future" means `starts_at >= now`; past appointments and the staff
    /// history are kept.
    pub async fn deactivate(
        &self,
        actor: &CurrentUser,
        staff_id: i64,
        now: i64,
    ) -> AppResult<StaffRemoval> {
        actor.require(permissions::STAFF_MANAGE)?;
        let _guard = self.locks.acquire(staff_id).await;
        let mut tx = self.db.begin_write().await.map_err(db_err)?;
        staff::find_by_id(&mut *tx, staff_id)
            .await?
            .ok_or_else(|| staff_not_found(staff_id))?;

        let cancelled = appointment::cancel_future_for_staff(&mut tx, staff_id, now).await?;
        staff::set_active(&mut *tx, staff_id, false, now).await?;
        tx.commit().await.map_err(db_err)?;

        tracing::info!(staff_id, cancelled = cancelled.len(), "Staff deactivated");
        self.notify_cancelled(&cancelled).await;
        Ok(StaffRemoval {
            staff_id,
            deleted: false,
            affected_appointments: cancelled.len() as u64,
            appointment_ids: cancelled,
        })
    }

    /// Cancel future open appointments, unassign all history, then delete
    pub async fn delete(
        &self,
        actor: &CurrentUser,
        staff_id: i64,
        now: i64,
    ) -> AppResult<StaffRemoval> {
        actor.require(permissions::STAFF_MANAGE)?;
        let guard = self.locks.acquire(staff_id).await;
        let mut tx = self.db.begin_write().await.map_err(db_err)?;
        staff::find_by_id(&mut *tx, staff_id)
            .await?
            .ok_or_else(|| staff_not_found(staff_id))?;

        let cancelled = appointment::cancel_future_for_staff(&mut tx, staff_id, now).await?;
        let unassigned = appointment::unassign_staff(&mut tx, staff_id, now).await?;
        staff::delete(&mut tx, staff_id).await?;
        tx.commit().await.map_err(db_err)?;

        drop(guard);
        self.locks.forget(staff_id);

        tracing::info!(
            staff_id,
            cancelled = cancelled.len(),
            unassigned,
            "Staff deleted"
        );
        self.notify_cancelled(&cancelled).await;
        Ok(StaffRemoval {
            staff_id,
            deleted: true,
            affected_appointments: cancelled.len() as u64,
            appointment_ids: cancelled,
        })
    }

    async fn notify_cancelled(&self, appointment_ids: &[i64]) {
        for &id in appointment_ids {
            match appointment::find_detail(&self.db.pool, id).await {
                Ok(Some(detail)) => dispatch(&self.notifier, AppointmentEvent::Cancelled, detail),
                Ok(None) => {}
                Err(e) => {
                    tracing::warn!(appointment_id = id, error = %e, "Failed to load cancelled appointment")
                }
            }
        }
    }
}

async fn ensure_services_exist(conn: &mut SqliteConnection, service_ids: &[i64]) -> AppResult<()> {
    for &service_id in service_ids {
        if service::find_by_id(&mut *conn, service_id).await?.is_none() {
            return Err(AppError::with_message(
                ErrorCode::ServiceNotFound,
                format!("Service {service_id} not found"),
            ));
        }
    }
    Ok(())
}
