//! Salon Server - appointment scheduling and availability engine
//!
//! # Architecture
//!
//! - **Data store** (`db`): SQLite via sqlx, typed repositories
//! - **Scheduling** (`scheduling`): slot grid, overlap checks, appointment lifecycle, reminders
//! - **Staff lifecycle** (`staff`): profiles, weekly schedules, time off, deactivation
//! - **Catalog** (`catalog`): bookable services
//! - **Admin** (`admin`): dashboard rollups
//! - **Notifications** (`notify`): best-effort outbound events
//!
//! # Module structure
//!
//! ```text
//! salon-server/src/
//! ├── core/          # config, state, background tasks
//! ├── auth/          # actor context and permissions
//! ├── db/            # pool, migrations, repositories
//! ├── scheduling/    # availability, appointments, locks, reminders
//! ├── staff/         # staff lifecycle
//! ├── catalog/       # service catalog
//! ├── admin/         # dashboard
//! ├── notify/        # notifier trait and log sink
//! └── utils/         # logging, time, validation
//! ```

pub mod admin;
pub mod auth;
pub mod catalog;
pub mod core;
pub mod db;
pub mod notify;
pub mod scheduling;
pub mod staff;
pub mod utils;

pub use auth::{CurrentUser, Role};
pub use crate::core::{BackgroundTasks, Config, ServerState, TaskKind};
pub use db::DbService;
pub use notify::{AppointmentNotifier, LogNotifier, NotifyError};
pub use scheduling::{AppointmentService, AvailabilityService, ReminderScheduler};
pub use utils::{AppError, AppResult, ErrorCategory, ErrorCode};

pub use utils::logger::{cleanup_old_logs, init_logger, init_logger_with_file};

/// Prepare the working directory and start logging
pub fn setup_environment(config: &Config) -> anyhow::Result<()> {
    std::fs::create_dir_all(&config.work_dir)?;
    init_logger_with_file(
        &config.log_level,
        config.is_production(),
        config.log_dir.as_deref(),
    )?;
    Ok(())
}
