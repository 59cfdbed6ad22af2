use std::sync::Arc;

use shared::error::AppResult;

use crate::admin::DashboardService;
use crate::catalog::CatalogService;
use crate::core::Config;
use crate::db::DbService;
use crate::notify::{AppointmentNotifier, LogNotifier};
use crate::scheduling::{AppointmentService, AvailabilityService, ReminderScheduler, StaffLocks};
use crate::staff::StaffService;

/// Server state holding every service
///
/// Cloning is cheap: services share the pool, the staff locks and the
/// notifier through `Arc`s.
///
/// | Field | Meaning |
/// |-------|---------|
/// | config | Immutable configuration |
/// | db | SQLite pool |
/// | locks | Per-staff write locks shared by all writers |
/// | notifier | Outbound notification sink |
#[derive(Clone)]
pub struct ServerState {
    pub config: Config,
    pub db: DbService,
    pub locks: StaffLocks,
    pub notifier: Arc<dyn AppointmentNotifier>,
    pub availability: AvailabilityService,
    pub appointments: AppointmentService,
    pub staff: StaffService,
    pub catalog: CatalogService,
    pub dashboard: DashboardService,
}

impl ServerState {
    /// Wire services over an existing database
    pub fn new(config: Config, db: DbService, notifier: Arc<dyn AppointmentNotifier>) -> Self {
        let locks = StaffLocks::new();
        Self {
            availability: AvailabilityService::new(db.clone()),
            appointments: AppointmentService::new(db.clone(), locks.clone(), notifier.clone()),
            staff: StaffService::new(db.clone(), locks.clone(), notifier.clone()),
            catalog: CatalogService::new(db.clone()),
            dashboard: DashboardService::new(db.clone()),
            config,
            db,
            locks,
            notifier,
        }
    }

    /// Open the configured database and wire services with the log notifier
    pub async fn initialize(config: &Config) -> AppResult<Self> {
        if let Some(parent) = std::path::Path::new(&config.database_path).parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent).map_err(|e| {
                shared::error::AppError::with_message(
                    shared::error::ErrorCode::ConfigError,
                    format!("Cannot create {}: {e}", parent.display()),
                )
            })?;
        }
        let db = DbService::new(&config.database_path, config.db_max_connections).await?;
        Ok(Self::new(config.clone(), db, Arc::new(LogNotifier)))
    }

    pub fn reminder_scheduler(&self) -> ReminderScheduler {
        ReminderScheduler::new(
            self.db.clone(),
            self.notifier.clone(),
            self.config.reminder_interval(),
            self.config.reminder_lead_minutes,
        )
    }
}
