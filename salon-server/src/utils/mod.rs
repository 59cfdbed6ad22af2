//! Utilities: logging, time helpers and input validation
//!
//! Error types come from `shared::error` and are re-exported here.

pub mod logger;
pub mod time;
pub mod validation;

pub use shared::error::{AppError, AppResult, ErrorCategory, ErrorCode};
