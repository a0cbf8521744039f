// Cross-series statistics and forecasting
pub mod correlation;
pub mod forecast;

// Re-export commonly used types
pub use correlation::{AlignedPair, Correlation, TrendLine, align, correlate};
pub use forecast::{
    ForecastOutput, ForecastPoint, Forecaster, HistoryPoint, LinearTrendForecaster, run_forecast,
};
