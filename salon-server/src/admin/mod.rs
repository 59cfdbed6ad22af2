//! Admin aggregation layer

pub mod dashboard;

pub use dashboard::DashboardService;
