pub mod core;
pub mod state;
pub mod view;

// Re-export key components
pub use core::{Dashboard, ResolvedFilter, resolve_filter};
pub use state::{DashboardEvent, FilterKind, FilterMode, Selection};
pub use view::{ChartPanel, CorrelationPanel, DashboardView, ForecastPanel, MetricCard, Notice};
