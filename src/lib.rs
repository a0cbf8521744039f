#![allow(clippy::collapsible_if)]

// Core modules
pub mod analysis;
pub mod config;
pub mod data;
pub mod domain;
pub mod engine;
pub mod error;
pub mod models;
pub mod ui;
pub mod utils;

// Re-export commonly used types
pub use analysis::{Correlation, ForecastOutput, Forecaster, LinearTrendForecaster, correlate, run_forecast};
pub use data::{PgConnector, SeriesCache};
pub use domain::{Indicator, Observation, PeriodGroup, group_periods};
pub use engine::{Dashboard, DashboardEvent, DashboardView, Selection};
pub use error::{DashboardError, DashboardResult};
pub use models::{Series, filter_by_years};
pub use ui::DashboardApp;
pub use utils::app_time;

/// Main application entry point - creates the GUI app around a loaded dashboard.
/// The runtime drives every later store call (refreshes).
pub fn run_app(
    cc: &eframe::CreationContext,
    dashboard: Dashboard,
    runtime: tokio::runtime::Runtime,
) -> Box<dyn eframe::App> {
    let app = ui::DashboardApp::new(cc, dashboard, runtime);
    Box::new(app)
}
