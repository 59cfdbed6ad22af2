//! Appointment lifecycle
//!
//! ```text
//! PENDING ──► CONFIRMED ──► COMPLETED | NO_SHOW
//!    │            │
//!    │            └──► RESCHEDULE_PENDING ──► PENDING | CONFIRMED
//!    └──────────────► CANCELLED (from any non-terminal state)
//! ```
//!
//! Writes that can create an overlap (create with staff, reschedule, moving
//! back into PENDING/CONFIRMED) hold the staff lock and run the overlap check
//! and the write in one transaction.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use shared::error::{AppError, AppResult, ErrorCode};
use shared::models::{
    Appointment, AppointmentCreate, AppointmentDetail, AppointmentFilter, AppointmentSource,
    AppointmentStatus, Service,
};
use sqlx::SqliteConnection;

use super::locks::StaffLocks;
use crate::auth::{CurrentUser, permissions};
use crate::db::DbService;
use crate::db::repository::{RepoError, appointment, service, staff};
use crate::notify::{AppointmentEvent, AppointmentNotifier, dispatch};
use crate::utils::time::MINUTE_MS;
use crate::utils::validation::{MAX_NOTE_LEN, validate_optional_text, validate_price};

fn appointment_not_found(id: i64) -> AppError {
    AppError::with_message(
        ErrorCode::AppointmentNotFound,
        format!("Appointment {id} not found"),
    )
    .with_detail("appointment_id", id)
}

fn conflict(staff_id: i64, starts_at: i64, ends_at: i64) -> AppError {
    AppError::with_message(
        ErrorCode::AppointmentConflict,
        "The staff member already has an appointment in this time range",
    )
    .with_detail("staff_id", staff_id)
    .with_detail("starts_at", starts_at)
    .with_detail("ends_at", ends_at)
}

fn invalid_transition(from: AppointmentStatus, to: AppointmentStatus) -> AppError {
    AppError::with_message(
        ErrorCode::AppointmentInvalidTransition,
        format!("Cannot change appointment status from {from} to {to}"),
    )
    .with_detail("from", from.as_str())
    .with_detail("to", to.as_str())
}

/// End of a booking starting at `starts_at`; both bounds must be representable instants
fn compute_ends_at(starts_at: i64, duration_min: i32) -> AppResult<i64> {
    i64::from(duration_min)
        .checked_mul(MINUTE_MS)
        .and_then(|span| starts_at.checked_add(span))
        .filter(|&end| {
            DateTime::<Utc>::from_timestamp_millis(starts_at).is_some()
                && DateTime::<Utc>::from_timestamp_millis(end).is_some()
        })
        .ok_or_else(|| {
            AppError::with_message(
                ErrorCode::ValueOutOfRange,
                format!("Start time {starts_at} is outside the supported range"),
            )
            .with_detail("starts_at", starts_at)
        })
}

#[derive(Clone)]
pub struct AppointmentService {
    db: DbService,
    locks: StaffLocks,
    notifier: Arc<dyn AppointmentNotifier>,
}

impl AppointmentService {
    pub fn new(db: DbService, locks: StaffLocks, notifier: Arc<dyn AppointmentNotifier>) -> Self {
        Self {
            db,
            locks,
            notifier,
        }
    }

    // ── Client operations ───────────────────────────────────

    /// Book an appointment for the acting client
    pub async fn create(
        &self,
        actor: &CurrentUser,
        data: AppointmentCreate,
    ) -> AppResult<AppointmentDetail> {
        self.book(actor.id, data, AppointmentSource::Web).await
    }

    /// Book on behalf of a client from the back office
    pub async fn admin_create(
        &self,
        actor: &CurrentUser,
        client_id: i64,
        data: AppointmentCreate,
    ) -> AppResult<AppointmentDetail> {
        actor.require(permissions::APPOINTMENTS_MANAGE)?;
        self.book(client_id, data, AppointmentSource::Admin).await
    }

    async fn book(
        &self,
        client_id: i64,
        data: AppointmentCreate,
        source: AppointmentSource,
    ) -> AppResult<AppointmentDetail> {
        validate_optional_text(&data.notes, "notes", MAX_NOTE_LEN)?;

        let service = self.active_service(data.service_id).await?;
        let ends_at = compute_ends_at(data.starts_at, service.duration_min)?;
        let now = shared::util::now_millis();
        let apt = Appointment {
            id: shared::util::snowflake_id(),
            client_id,
            service_id: service.id,
            staff_id: data.staff_id,
            starts_at: data.starts_at,
            ends_at,
            status: AppointmentStatus::Pending,
            price_ils: Some(service.price_ils),
            notes: data.notes,
            source,
            reminder_sent: false,
            created_at: now,
            updated_at: now,
        };

        match apt.staff_id {
            Some(staff_id) => {
                let _guard = self.locks.acquire(staff_id).await;
                let mut tx = self.db.begin_write().await.map_err(db_err)?;
                ensure_staff_can_serve(&mut tx, staff_id, service.id).await?;
                if appointment::has_overlap(&mut *tx, staff_id, apt.starts_at, apt.ends_at, None)
                    .await?
                {
                    return Err(conflict(staff_id, apt.starts_at, apt.ends_at));
                }
                appointment::insert(&mut *tx, &apt).await?;
                tx.commit().await.map_err(db_err)?;
            }
            // Floating bookings are not checked for overlap
            None => appointment::insert(&self.db.pool, &apt).await?,
        }

        tracing::info!(
            appointment_id = apt.id,
            client_id,
            staff_id = ?apt.staff_id,
            service_id = apt.service_id,
            starts_at = apt.starts_at,
            source = ?source,
            "Appointment created"
        );

        let detail = self.find_detail(apt.id).await?;
        dispatch(&self.notifier, AppointmentEvent::Created, detail.clone());
        Ok(detail)
    }

    /// Move the acting client's appointment to a new start time
    ///
    /// The end is recomputed from the service's current duration; the
    /// status is left unchanged.
    pub async fn reschedule(
        &self,
        actor: &CurrentUser,
        appointment_id: i64,
        new_starts_at: i64,
    ) -> AppResult<AppointmentDetail> {
        let current = self.load(appointment_id).await?;
        actor.require_owner(current.client_id)?;
        self.move_appointment(current, new_starts_at, None).await
    }

    /// Cancel the acting client's appointment (the record is kept)
    pub async fn cancel(
        &self,
        actor: &CurrentUser,
        appointment_id: i64,
    ) -> AppResult<AppointmentDetail> {
        let current = self.load(appointment_id).await?;
        actor.require_owner(current.client_id)?;
        self.transition(current, AppointmentStatus::Cancelled).await
    }

    /// Client-facing delete; a soft delete identical to [`Self::cancel`]
    pub async fn delete(
        &self,
        actor: &CurrentUser,
        appointment_id: i64,
    ) -> AppResult<AppointmentDetail> {
        self.cancel(actor, appointment_id).await
    }

    /// Appointments of the acting client, most recent first
    pub async fn list_for_client(&self, actor: &CurrentUser) -> AppResult<Vec<AppointmentDetail>> {
        let filter = AppointmentFilter {
            client_id: Some(actor.id),
            ..Default::default()
        };
        self.list(&filter).await
    }

    // ── Queries ─────────────────────────────────────────────

    pub async fn find_detail(&self, appointment_id: i64) -> AppResult<AppointmentDetail> {
        appointment::find_detail(&self.db.pool, appointment_id)
            .await?
            .ok_or_else(|| appointment_not_found(appointment_id))
    }

    pub async fn list(&self, filter: &AppointmentFilter) -> AppResult<Vec<AppointmentDetail>> {
        if filter.limit.is_some_and(|l| l < 0) || filter.offset.is_some_and(|o| o < 0) {
            return Err(AppError::with_message(
                ErrorCode::ValueOutOfRange,
                "limit and offset must not be negative",
            ));
        }
        Ok(appointment::list(&self.db.pool, filter).await?)
    }

    // ── Back office operations ──────────────────────────────

    /// Apply a status transition, enforcing the state machine
    pub async fn update_status(
        &self,
        actor: &CurrentUser,
        appointment_id: i64,
        status: AppointmentStatus,
    ) -> AppResult<AppointmentDetail> {
        actor.require(permissions::APPOINTMENTS_MANAGE)?;
        let current = self.load(appointment_id).await?;
        self.transition(current, status).await
    }

    pub async fn confirm(&self, actor: &CurrentUser, id: i64) -> AppResult<AppointmentDetail> {
        self.update_status(actor, id, AppointmentStatus::Confirmed).await
    }

    pub async fn complete(&self, actor: &CurrentUser, id: i64) -> AppResult<AppointmentDetail> {
        self.update_status(actor, id, AppointmentStatus::Completed).await
    }

    pub async fn mark_no_show(&self, actor: &CurrentUser, id: i64) -> AppResult<AppointmentDetail> {
        self.update_status(actor, id, AppointmentStatus::NoShow).await
    }

    /// Override the price snapshot (`None` clears it)
    pub async fn update_price(
        &self,
        actor: &CurrentUser,
        appointment_id: i64,
        price_ils: Option<f64>,
    ) -> AppResult<AppointmentDetail> {
        actor.require(permissions::APPOINTMENTS_PRICE)?;
        if let Some(price) = price_ils {
            validate_price(price)?;
        }
        let now = shared::util::now_millis();
        appointment::update_price(&self.db.pool, appointment_id, price_ils, now)
            .await
            .map_err(|e| match e {
                RepoError::NotFound(_) => appointment_not_found(appointment_id),
                other => other.into(),
            })?;
        tracing::info!(appointment_id, ?price_ils, "Appointment price updated");
        self.find_detail(appointment_id).await
    }

    /// Move any appointment, optionally to another staff member
    ///
    /// Same overlap discipline as [`Self::reschedule`], without the
    /// ownership check.
    pub async fn admin_reschedule(
        &self,
        actor: &CurrentUser,
        appointment_id: i64,
        new_starts_at: i64,
        staff_id: Option<i64>,
    ) -> AppResult<AppointmentDetail> {
        actor.require(permissions::APPOINTMENTS_MANAGE)?;
        let current = self.load(appointment_id).await?;
        self.move_appointment(current, new_starts_at, staff_id).await
    }

    // ── Internals ───────────────────────────────────────────

    async fn load(&self, appointment_id: i64) -> AppResult<Appointment> {
        appointment::find_by_id(&self.db.pool, appointment_id)
            .await?
            .ok_or_else(|| appointment_not_found(appointment_id))
    }

    async fn active_service(&self, service_id: i64) -> AppResult<Service> {
        let service = service::find_by_id(&self.db.pool, service_id)
            .await?
            .ok_or_else(|| {
                AppError::with_message(
                    ErrorCode::ServiceNotFound,
                    format!("Service {service_id} not found"),
                )
            })?;
        if !service.is_active {
            return Err(AppError::with_message(
                ErrorCode::ServiceInactive,
                format!("Service {} is not bookable", service.name),
            ));
        }
        Ok(service)
    }

    async fn move_appointment(
        &self,
        current: Appointment,
        new_starts_at: i64,
        reassign_to: Option<i64>,
    ) -> AppResult<AppointmentDetail> {
        if current.status.is_terminal() {
            return Err(AppError::with_message(
                ErrorCode::AppointmentInvalidTransition,
                format!("Cannot reschedule a {} appointment", current.status),
            ));
        }
        let staff_id = reassign_to.or(current.staff_id).ok_or_else(|| {
            AppError::with_message(
                ErrorCode::AppointmentNotAssigned,
                "Appointment has no staff member assigned",
            )
        })?;

        // The service's active flag is not re-checked when moving a booking
        let service = service::find_by_id(&self.db.pool, current.service_id)
            .await?
            .ok_or_else(|| {
                AppError::with_message(
                    ErrorCode::ServiceNotFound,
                    format!("Service {} not found", current.service_id),
                )
            })?;
        let new_ends_at = compute_ends_at(new_starts_at, service.duration_min)?;

        let _guard = self.locks.acquire(staff_id).await;
        let mut tx = self.db.begin_write().await.map_err(db_err)?;

        let fresh = appointment::find_by_id(&mut *tx, current.id)
            .await?
            .ok_or_else(|| appointment_not_found(current.id))?;
        if fresh.status.is_terminal() {
            return Err(AppError::with_message(
                ErrorCode::AppointmentInvalidTransition,
                format!("Cannot reschedule a {} appointment", fresh.status),
            ));
        }
        if reassign_to.is_some_and(|id| Some(id) != fresh.staff_id) {
            ensure_staff_can_serve(&mut tx, staff_id, fresh.service_id).await?;
        }
        if appointment::has_overlap(&mut *tx, staff_id, new_starts_at, new_ends_at, Some(fresh.id))
            .await?
        {
            return Err(conflict(staff_id, new_starts_at, new_ends_at));
        }

        let now = shared::util::now_millis();
        appointment::update_schedule(
            &mut *tx,
            fresh.id,
            Some(staff_id),
            new_starts_at,
            new_ends_at,
            now,
        )
        .await?;
        tx.commit().await.map_err(db_err)?;

        tracing::info!(
            appointment_id = fresh.id,
            staff_id,
            from = fresh.starts_at,
            to = new_starts_at,
            "Appointment rescheduled"
        );
        self.find_detail(fresh.id).await
    }

    async fn transition(
        &self,
        current: Appointment,
        next: AppointmentStatus,
    ) -> AppResult<AppointmentDetail> {
        if !current.status.can_transition_to(next) {
            return Err(invalid_transition(current.status, next));
        }

        // Re-entering the calendar needs the same guard as a new booking
        let needs_overlap_check = next.is_blocking() && !current.status.is_blocking();
        let _guard = match (needs_overlap_check, current.staff_id) {
            (true, Some(staff_id)) => Some(self.locks.acquire(staff_id).await),
            _ => None,
        };

        let mut tx = self.db.begin_write().await.map_err(db_err)?;
        let fresh = appointment::find_by_id(&mut *tx, current.id)
            .await?
            .ok_or_else(|| appointment_not_found(current.id))?;
        if !fresh.status.can_transition_to(next) {
            return Err(invalid_transition(fresh.status, next));
        }
        if needs_overlap_check
            && let Some(staff_id) = fresh.staff_id
            && appointment::has_overlap(
                &mut *tx,
                staff_id,
                fresh.starts_at,
                fresh.ends_at,
                Some(fresh.id),
            )
            .await?
        {
            return Err(conflict(staff_id, fresh.starts_at, fresh.ends_at));
        }

        let now = shared::util::now_millis();
        appointment::update_status(&mut *tx, fresh.id, next, now).await?;
        tx.commit().await.map_err(db_err)?;

        tracing::info!(
            appointment_id = fresh.id,
            from = %fresh.status,
            to = %next,
            "Appointment status changed"
        );

        let detail = self.find_detail(fresh.id).await?;
        if next == AppointmentStatus::Cancelled {
            dispatch(&self.notifier, AppointmentEvent::Cancelled, detail.clone());
        }
        Ok(detail)
    }
}

/// Staff exists, is active and is assigned to the service
pub(crate) async fn ensure_staff_can_serve(
    conn: &mut SqliteConnection,
    staff_id: i64,
    service_id: i64,
) -> AppResult<()> {
    let member = staff::find_by_id(&mut *conn, staff_id)
        .await?
        .ok_or_else(|| {
            AppError::with_message(ErrorCode::StaffNotFound, format!("Staff {staff_id} not found"))
        })?;
    if !member.is_active {
        return Err(AppError::with_message(
            ErrorCode::StaffInactive,
            format!("Staff {} is not active", member.name),
        ));
    }
    if !staff::offers_service(&mut *conn, staff_id, service_id).await? {
        return Err(AppError::with_message(
            ErrorCode::StaffServiceMismatch,
            format!("Staff {} does not perform service {service_id}", member.name),
        )
        .with_detail("staff_id", staff_id)
        .with_detail("service_id", service_id));
    }
    Ok(())
}

pub(crate) fn db_err(e: sqlx::Error) -> AppError {
    RepoError::from(e).into()
}
