//! Data models
//!
//! Shared between salon-server and its clients.
//! DB row types use `#[cfg_attr(feature = "db", derive(sqlx::FromRow))]`.
//! All IDs are snowflake `i64`; all instants are Unix millis (UTC).

pub mod appointment;
pub mod availability;
pub mod dashboard;
pub mod service;
pub mod staff;
pub mod time_off;
pub mod working_hours;

// Re-exports
pub use appointment::*;
pub use availability::*;
pub use dashboard::*;
pub use service::*;
pub use staff::*;
pub use time_off::*;
pub use working_hours::*;
