//! Core: configuration, server state and background tasks
//!
//! - [`Config`] - environment-driven configuration
//! - [`ServerState`] - wired services
//! - [`BackgroundTasks`] - background task lifecycle

pub mod config;
pub mod state;
pub mod tasks;

pub use config::Config;
pub use state::ServerState;
pub use tasks::{BackgroundTasks, TaskKind};
