//! Configuration module for the dashboard.

pub mod dashboard;
pub mod database;

mod debug; // Private: files use crate::config::DEBUG_FLAGS, not crate::config::debug::DEBUG_FLAGS
pub use debug::DEBUG_FLAGS;

// Re-export commonly used items
pub use dashboard::{DASHBOARD, DashboardConfig, ForecastConfig};
pub use database::DbSettings;
