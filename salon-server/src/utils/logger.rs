//! Logging Infrastructure
//!
//! Structured logging setup with support for both development and production environments.
//! - Console output, human readable or JSON
//! - Optional daily rotating application logs under `<log_dir>/app`

use std::fs;
use std::path::Path;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{EnvFilter, Layer, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Application log files older than this are removed by [`cleanup_old_logs`]
pub const LOG_RETENTION_DAYS: i64 = 14;

/// Initialize the logger (console only, `info`)
pub fn init_logger() -> anyhow::Result<()> {
    init_logger_with_file("info", false, None)
}

/// Initialize the logging system
///
/// `RUST_LOG` wins over `level` when set.
///
/// # Examples
/// ```no_run
/// # use salon_server::utils::logger::init_logger_with_file;
/// // Development setup (console only)
/// init_logger_with_file("debug", false, None)?;
/// # Ok::<(), anyhow::Error>(())
/// ```
pub fn init_logger_with_file(
    level: &str,
    json_format: bool,
    log_dir: Option<&str>,
) -> anyhow::Result<()> {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let console_layer = if json_format {
        fmt::layer()
            .json()
            .with_target(true)
            .with_current_span(true)
            .boxed()
    } else {
        fmt::layer().with_target(false).boxed()
    };

    let file_layer = match log_dir {
        Some(dir) => {
            let app_log_dir = Path::new(dir).join("app");
            fs::create_dir_all(&app_log_dir)?;
            let appender = RollingFileAppender::builder()
                .rotation(Rotation::DAILY)
                .filename_prefix("app")
                .filename_suffix("log")
                .build(app_log_dir)?;
            Some(
                fmt::layer()
                    .json()
                    .with_ansi(false)
                    .with_target(true)
                    .with_writer(appender)
                    .boxed(),
            )
        }
        None => None,
    };

    tracing_subscriber::registry()
        .with(env_filter)
        .with(console_layer)
        .with(file_layer)
        .try_init()?;

    Ok(())
}

/// Delete `app.YYYY-MM-DD.log` files older than [`LOG_RETENTION_DAYS`]
///
/// Returns the number of deleted files.
pub fn cleanup_old_logs(log_dir: &Path) -> anyhow::Result<usize> {
    let app_log_dir = log_dir.join("app");
    if !app_log_dir.exists() {
        return Ok(0);
    }

    let cutoff = chrono::Utc::now().date_naive() - chrono::Duration::days(LOG_RETENTION_DAYS);
    let mut deleted = 0;
    for entry in fs::read_dir(app_log_dir)? {
        let path = entry?.path();
        let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
            continue;
        };
        if let Some(date) = log_file_date(name)
            && date < cutoff
        {
            fs::remove_file(&path)?;
            tracing::info!(file = %name, "Deleted old log file");
            deleted += 1;
        }
    }
    Ok(deleted)
}

fn log_file_date(name: &str) -> Option<chrono::NaiveDate> {
    let date = name.strip_prefix("app.")?.strip_suffix(".log")?;
    chrono::NaiveDate::parse_from_str(date, "%Y-%m-%d").ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_rotated_file_names() {
        assert_eq!(
            log_file_date("app.2024-01-14.log"),
            chrono::NaiveDate::from_ymd_opt(2024, 1, 14)
        );
        assert_eq!(log_file_date("app.log"), None);
        assert_eq!(log_file_date("other.2024-01-14.log"), None);
    }

    #[test]
    fn cleanup_removes_only_expired_files() {
        let dir = tempfile::tempdir().unwrap();
        let app = dir.path().join("app");
        fs::create_dir_all(&app).unwrap();
        fs::write(app.join("app.2000-01-01.log"), b"old").unwrap();
        let today = chrono::Utc::now().date_naive().format("%Y-%m-%d");
        fs::write(app.join(format!("app.{today}.log")), b"new").unwrap();
        fs::write(app.join("notes.txt"), b"keep").unwrap();

        let deleted = cleanup_old_logs(dir.path()).unwrap();
        assert_eq!(deleted, 1);
        assert!(!app.join("app.2000-01-01.log").exists());
        assert!(app.join("notes.txt").exists());
    }
}
