use std::path::PathBuf;
use std::time::Duration;

/// Server configuration
///
/// # Environment variables
///
/// | Variable | Default | Meaning |
/// |----------|---------|---------|
/// | WORK_DIR | ./salon-data | Working directory (database, logs) |
/// | DATABASE_PATH | `<WORK_DIR>/salon.db` | SQLite database file |
/// | ENVIRONMENT | development | development / staging / production |
/// | LOG_LEVEL | info | Default tracing filter (`RUST_LOG` overrides) |
/// | LOG_DIR | `<WORK_DIR>/logs` in production, unset otherwise | Rolling log files |
/// | REMINDER_INTERVAL_SECS | 300 | Reminder sweep period |
/// | REMINDER_LEAD_MINUTES | 1440 | How far ahead reminders go out |
/// | DB_MAX_CONNECTIONS | 5 | SQLite pool size |
///
/// # Example
///
/// ```ignore
/// WORK_DIR=/data/salon REMINDER_LEAD_MINUTES=120 cargo run
/// ```
#[derive(Debug, Clone)]
pub struct Config {
    /// Working directory, holds the database and logs
    pub work_dir: String,
    pub database_path: String,
    /// development | staging | production
    pub environment: String,
    pub log_level: String,
    pub log_dir: Option<String>,
    pub reminder_interval_secs: u64,
    pub reminder_lead_minutes: i64,
    pub db_max_connections: u32,
}

impl Config {
    /// Load configuration from environment variables, falling back to defaults
    pub fn from_env() -> Self {
        let work_dir = std::env::var("WORK_DIR").unwrap_or_else(|_| "./salon-data".into());
        let environment = std::env::var("ENVIRONMENT").unwrap_or_else(|_| "development".into());

        let database_path = std::env::var("DATABASE_PATH").unwrap_or_else(|_| {
            PathBuf::from(&work_dir)
                .join("salon.db")
                .to_string_lossy()
                .into_owned()
        });
        let log_dir = std::env::var("LOG_DIR").ok().or_else(|| {
            (environment == "production").then(|| {
                PathBuf::from(&work_dir)
                    .join("logs")
                    .to_string_lossy()
                    .into_owned()
            })
        });

        Self {
            database_path,
            log_dir,
            log_level: std::env::var("LOG_LEVEL").unwrap_or_else(|_| "info".into()),
            reminder_interval_secs: std::env::var("REMINDER_INTERVAL_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(300),
            reminder_lead_minutes: std::env::var("REMINDER_LEAD_MINUTES")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(24 * 60),
            db_max_connections: std::env::var("DB_MAX_CONNECTIONS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(5),
            work_dir,
            environment,
        }
    }

    /// Use a custom working directory; the database moves with it
    ///
    /// Mostly used by tests.
    pub fn with_work_dir(work_dir: impl Into<String>) -> Self {
        let work_dir = work_dir.into();
        let mut config = Self::from_env();
        config.database_path = PathBuf::from(&work_dir)
            .join("salon.db")
            .to_string_lossy()
            .into_owned();
        config.work_dir = work_dir;
        config
    }

    pub fn reminder_interval(&self) -> Duration {
        Duration::from_secs(self.reminder_interval_secs.max(1))
    }

    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }

    pub fn is_development(&self) -> bool {
        self.environment == "development"
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_env()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn work_dir_override_moves_database() {
        let config = Config::with_work_dir("/tmp/salon-test");
        assert_eq!(config.work_dir, "/tmp/salon-test");
        assert!(config.database_path.ends_with("salon.db"));
        assert!(config.database_path.starts_with("/tmp/salon-test"));
    }

    #[test]
    fn reminder_interval_is_never_zero() {
        let mut config = Config::with_work_dir("/tmp/salon-test");
        config.reminder_interval_secs = 0;
        assert_eq!(config.reminder_interval(), Duration::from_secs(1));
    }
}
