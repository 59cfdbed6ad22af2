//! Shared types for the salon booking platform
//!
//! Domain models, the unified error system and small utilities used by
//! `salon-server` and by any client that speaks its data contracts.

pub mod error;
pub mod models;
pub mod util;

// Re-exports
pub use error::{AppError, AppResult, ErrorCategory, ErrorCode};
pub use serde::{Deserialize, Serialize};
