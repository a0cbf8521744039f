//! Forecast requests.
//!
//! Fitting and prediction belong to a `Forecaster` collaborator; this module
//! only prepares its input, guards its preconditions and turns its failures into
//! user-facing errors. `LinearTrendForecaster` is the collaborator bundled with
//! the app.

use anyhow::{Result, anyhow, ensure};
use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};
use statrs::distribution::{ContinuousCDF, StudentsT};
use statrs::statistics::Statistics;
use std::panic::{AssertUnwindSafe, catch_unwind};

#[cfg(debug_assertions)]
use crate::config::DEBUG_FLAGS;
use crate::config::DASHBOARD;
use crate::domain::Indicator;
use crate::error::{DashboardError, DashboardResult};
use crate::models::Series;
use crate::utils::app_time::now;

/// One training row in the collaborator's schema.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
pub struct HistoryPoint {
    pub ds: NaiveDate,
    pub y: f64,
}

/// One predicted row: point estimate plus interval bounds.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
pub struct ForecastPoint {
    pub ds: NaiveDate,
    pub yhat: f64,
    pub yhat_lower: f64,
    pub yhat_upper: f64,
}

pub trait Forecaster: Send + Sync {
    /// Fit on `history` (sorted by `ds`, at least two rows) and predict every
    /// history date followed by `horizon_days` daily future dates.
    fn fit_predict(&self, history: &[HistoryPoint], horizon_days: u32)
    -> Result<Vec<ForecastPoint>>;

    fn name(&self) -> &str;
}

/// Collaborator output, passed through unmodified.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct ForecastOutput {
    pub indicator: Indicator,
    pub horizon_days: u32,
    pub forecaster: String,
    pub history: Vec<HistoryPoint>,
    pub points: Vec<ForecastPoint>,
}

impl ForecastOutput {
    /// The last `horizon_days` rows: the table shown under the chart.
    pub fn future(&self) -> &[ForecastPoint] {
        let start = self.points.len().saturating_sub(self.horizon_days as usize);
        &self.points[start..]
    }
}

/// Bring a requested horizon into the allowed range.
pub fn clamp_horizon(requested_days: i64) -> u32 {
    let min = DASHBOARD.forecast.min_horizon_days as i64;
    let max = DASHBOARD.forecast.max_horizon_days as i64;
    requested_days.clamp(min, max) as u32
}

/// Rename to `(ds, y)`, drop rows missing either field, sort by `ds`.
pub fn prepare_history(series: &Series) -> Vec<HistoryPoint> {
    let mut history: Vec<HistoryPoint> = series
        .points()
        .map(|(ds, y)| HistoryPoint { ds, y })
        .collect();
    history.sort_by_key(|p| p.ds);
    history
}

/// Run one forecast request against `forecaster`.
///
/// Takes the unfiltered series. Errors (and panics) raised by the collaborator
/// are logged and returned as `ExternalLibrary`; they never escape as a crash.
pub fn run_forecast(
    series: &Series,
    requested_horizon_days: i64,
    forecaster: &dyn Forecaster,
) -> DashboardResult<ForecastOutput> {
    let horizon_days = clamp_horizon(requested_horizon_days);
    if horizon_days as i64 != requested_horizon_days {
        log::warn!(
            "Forecast horizon {} days out of range, using {}",
            requested_horizon_days,
            horizon_days
        );
    }

    let history = prepare_history(series);
    if history.len() < DASHBOARD.forecast.min_points {
        return Err(DashboardError::insufficient_data(format!(
            "not enough data to train the forecast model for {} (minimum {} points, found {})",
            series.indicator,
            DASHBOARD.forecast.min_points,
            history.len()
        )));
    }

    let started = now();
    let outcome = catch_unwind(AssertUnwindSafe(|| {
        forecaster.fit_predict(&history, horizon_days)
    }));

    let points = match outcome {
        Ok(Ok(points)) => points,
        Ok(Err(e)) => {
            log::error!("Error forecasting {}: {:#}", series.indicator, e);
            return Err(DashboardError::external(format!("{:#}", e)));
        }
        Err(panic) => {
            let message = panic
                .downcast_ref::<&str>()
                .map(|s| s.to_string())
                .or_else(|| panic.downcast_ref::<String>().cloned())
                .unwrap_or_else(|| "forecaster panicked".to_string());
            log::error!("Forecaster panicked on {}: {}", series.indicator, message);
            return Err(DashboardError::external(message));
        }
    };

    #[cfg(debug_assertions)]
    if DEBUG_FLAGS.print_forecast_events {
        log::info!(
            "Forecast for {} ({} rows) in {:.2}s",
            series.indicator,
            points.len(),
            started.elapsed().as_secs_f32()
        );
    }
    #[cfg(not(debug_assertions))]
    let _ = started;

    Ok(ForecastOutput {
        indicator: series.indicator,
        horizon_days,
        forecaster: forecaster.name().to_string(),
        history,
        points,
    })
}

// ============================================================================
// LinearTrendForecaster
// ============================================================================

/// Ordinary least squares on days since the first observation, with a Student-t
/// prediction interval.
#[derive(Debug, Clone, Copy)]
pub struct LinearTrendForecaster {
    /// Coverage of the interval, in (0, 1)
    pub interval_width: f64,
}

impl Default for LinearTrendForecaster {
    fn default() -> Self {
        Self {
            interval_width: DASHBOARD.forecast.interval_width,
        }
    }
}

impl Forecaster for LinearTrendForecaster {
    fn fit_predict(
        &self,
        history: &[HistoryPoint],
        horizon_days: u32,
    ) -> Result<Vec<ForecastPoint>> {
        ensure!(history.len() >= 2, "need at least two observations");
        ensure!(
            self.interval_width > 0.0 && self.interval_width < 1.0,
            "interval width must be in (0, 1), got {}",
            self.interval_width
        );

        let origin = history[0].ds;
        let offset = |ds: NaiveDate| (ds - origin).num_days() as f64;

        let xs: Vec<f64> = history.iter().map(|p| offset(p.ds)).collect();
        let ys: Vec<f64> = history.iter().map(|p| p.y).collect();
        let n = xs.len() as f64;
        let mean_x = xs.iter().mean();
        let mean_y = ys.iter().mean();

        let sxx: f64 = xs.iter().map(|x| (x - mean_x).powi(2)).sum();
        ensure!(sxx > 0.0, "all observations fall on a single date");
        let sxy: f64 = xs
            .iter()
            .zip(&ys)
            .map(|(x, y)| (x - mean_x) * (y - mean_y))
            .sum();

        let slope = sxy / sxx;
        let intercept = mean_y - slope * mean_x;
        let fit = |x: f64| intercept + slope * x;

        // Residual spread and the two-sided t quantile; with two points the line is
        // exact and the interval collapses onto it.
        let dof = xs.len() - 2;
        let (sigma, t) = if dof > 0 {
            let rss: f64 = xs.iter().zip(&ys).map(|(x, y)| (y - fit(*x)).powi(2)).sum();
            let dist = StudentsT::new(0.0, 1.0, dof as f64)
                .map_err(|e| anyhow!("invalid t distribution: {}", e))?;
            (
                (rss / dof as f64).sqrt(),
                dist.inverse_cdf(0.5 + self.interval_width / 2.0),
            )
        } else {
            (0.0, 0.0)
        };

        let last = history[history.len() - 1].ds;
        let future = (1..=horizon_days as i64).map(|d| last + Duration::days(d));
        let dates = history.iter().map(|p| p.ds).chain(future);

        Ok(dates
            .map(|ds| {
                let x = offset(ds);
                let yhat = fit(x);
                let se = sigma * (1.0 + 1.0 / n + (x - mean_x).powi(2) / sxx).sqrt();
                ForecastPoint {
                    ds,
                    yhat,
                    yhat_lower: yhat - t * se,
                    yhat_upper: yhat + t * se,
                }
            })
            .collect())
    }

    fn name(&self) -> &str {
        "Linear trend (OLS)"
    }
}
