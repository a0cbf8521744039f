//! Dashboard behaviour knobs (cache lifetime, filters, forecast bounds).

use std::time::Duration;

/// Bounds for the forecast horizon input
pub struct ForecastConfig {
    pub min_horizon_days: u32,
    pub max_horizon_days: u32,
    pub default_horizon_days: u32,
    /// Slider step in the UI
    pub horizon_step_days: u32,
    /// Minimum usable history rows for a fit
    pub min_points: usize,
    /// Width of the prediction interval (0.80 = 80%)
    pub interval_width: f64,
}

/// The Master Dashboard Configuration
pub struct DashboardConfig {
    /// How long a fetched series stays valid in the cache
    pub cache_ttl: Duration,
    /// Timeout for establishing the store connection
    pub connect_timeout: Duration,
    /// Connections kept by the pool (reads are serialized, so keep it small)
    pub max_connections: u32,
    /// Group size used for the biennium filter
    pub biennium_size: i32,
    /// How many of the most recent years are pre-selected in "specific years" mode
    pub default_selected_years: usize,
    /// Minimum aligned pairs for a correlation
    pub min_correlation_points: usize,

    pub forecast: ForecastConfig,
}

pub const DASHBOARD: DashboardConfig = DashboardConfig {
    cache_ttl: Duration::from_secs(3600),
    connect_timeout: Duration::from_secs(10),
    max_connections: 2,
    biennium_size: 2,
    default_selected_years: 3,
    min_correlation_points: 2,

    forecast: ForecastConfig {
        min_horizon_days: 30,
        max_horizon_days: 730,
        default_horizon_days: 365,
        horizon_step_days: 30,
        min_points: 2,
        interval_width: 0.80,
    },
};
