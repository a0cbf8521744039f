use eframe::egui;
use poll_promise::Promise;
use std::sync::Arc;
use std::time::Duration;

use crate::analysis::{ForecastOutput, Forecaster, run_forecast};
#[cfg(debug_assertions)]
use crate::config::DEBUG_FLAGS;
use crate::error::{DashboardError, DashboardResult};
use crate::models::Series;
use crate::ui::app::DashboardApp;

/// At most one forecast fit in flight, plus the last outcome to draw.
#[derive(Default)]
pub struct ForecastJob {
    promise: Option<Promise<DashboardResult<ForecastOutput>>>,
    outcome: Option<DashboardResult<ForecastOutput>>,
}

impl ForecastJob {
    pub fn is_running(&self) -> bool {
        self.promise.is_some()
    }

    pub fn outcome(&self) -> Option<&DashboardResult<ForecastOutput>> {
        self.outcome.as_ref()
    }

    /// Record a failure that happened before a fit could start.
    pub fn fail(&mut self, error: DashboardError) {
        self.outcome = Some(Err(error));
    }

    /// Start fitting `series` on a helper thread. Ignored while a fit runs.
    pub fn spawn(
        &mut self,
        series: Arc<Series>,
        horizon_days: i64,
        forecaster: Arc<dyn Forecaster>,
    ) -> bool {
        if self.is_running() {
            return false;
        }
        self.outcome = None;
        self.promise = Some(Promise::spawn_thread("forecast", move || {
            run_forecast(&series, horizon_days, forecaster.as_ref())
        }));
        true
    }

    /// Move a finished fit into `outcome`. Returns whether a fit is still running.
    pub fn poll(&mut self) -> bool {
        let finished = self
            .promise
            .as_ref()
            .and_then(|promise| promise.ready().cloned());

        if let Some(outcome) = finished {
            self.promise = None;
            self.outcome = Some(outcome);
        }
        self.is_running()
    }

    /// Forget the outcome and any fit in flight. The thread of an abandoned fit
    /// runs to completion but its result is never shown.
    pub fn discard(&mut self) {
        self.promise = None;
        self.outcome = None;
    }
}

impl DashboardApp {
    pub(super) fn is_forecasting(&self) -> bool {
        self.forecast.is_running()
    }

    /// Fit the selected indicator's unfiltered series on a helper thread.
    pub(super) fn start_forecast(&mut self) {
        if self.forecast.is_running() {
            return;
        }

        let indicator = self.selection.forecast_indicator;
        let horizon_days = self.selection.forecast_horizon_days as i64;

        let series = match self.dashboard.series(indicator) {
            Ok(series) => series,
            Err(e) => {
                log::error!("Cannot forecast {}: {}", indicator, e);
                self.forecast.fail(e);
                return;
            }
        };
        let forecaster = self.forecaster.clone();

        #[cfg(debug_assertions)]
        if DEBUG_FLAGS.print_forecast_events {
            log::info!(
                "Forecast requested: {} for {} days with {}",
                indicator,
                horizon_days,
                forecaster.name()
            );
        }

        self.forecast.spawn(series, horizon_days, forecaster);
    }

    pub(super) fn poll_forecast(&mut self, ctx: &egui::Context) {
        if self.forecast.poll() {
            // Keep the spinner moving while the fit runs
            ctx.request_repaint_after(Duration::from_millis(100));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::{ForecastPoint, HistoryPoint, LinearTrendForecaster};
    use crate::domain::{Indicator, Observation};
    use chrono::NaiveDate;
    use std::sync::mpsc::{Receiver, channel};
    use std::sync::Mutex;

    fn series() -> Arc<Series> {
        let start = NaiveDate::from_ymd_opt(2023, 1, 1).unwrap();
        let rows = (0..10)
            .map(|i| Observation::raw(Some(start + chrono::Duration::days(i * 30)), Some(10.0 + i as f64)))
            .collect();
        Arc::new(Series::from_rows(Indicator::PolicyRate, rows))
    }

    fn wait(job: &mut ForecastJob) {
        while job.poll() {
            std::thread::sleep(Duration::from_millis(5));
        }
    }

    /// Blocks inside the fit until the test releases it.
    struct Gated(Mutex<Receiver<()>>);

    impl Forecaster for Gated {
        fn fit_predict(
            &self,
            history: &[HistoryPoint],
            horizon_days: u32,
        ) -> anyhow::Result<Vec<ForecastPoint>> {
            self.0.lock().unwrap().recv()?;
            LinearTrendForecaster::default().fit_predict(history, horizon_days)
        }

        fn name(&self) -> &str {
            "gated"
        }
    }

    #[test]
    fn test_finished_fit_becomes_the_outcome() {
        let mut job = ForecastJob::default();
        assert!(job.spawn(series(), 60, Arc::new(LinearTrendForecaster::default())));
        wait(&mut job);

        let output = job.outcome().unwrap().as_ref().unwrap();
        assert_eq!(output.horizon_days, 60);
        assert_eq!(output.future().len(), 60);
    }

    #[test]
    fn test_only_one_fit_at_a_time() {
        let (release, gate) = channel();
        let mut job = ForecastJob::default();
        assert!(job.spawn(series(), 30, Arc::new(Gated(Mutex::new(gate)))));
        assert!(!job.spawn(series(), 30, Arc::new(LinearTrendForecaster::default())));

        release.send(()).unwrap();
        wait(&mut job);
        assert_eq!(job.outcome().unwrap().as_ref().unwrap().forecaster, "gated");
    }

    #[test]
    fn test_discard_drops_finished_outcome() {
        let mut job = ForecastJob::default();
        job.spawn(series(), 30, Arc::new(LinearTrendForecaster::default()));
        wait(&mut job);
        assert!(job.outcome().is_some());

        job.discard();
        assert!(job.outcome().is_none());
        assert!(!job.is_running());
    }

    #[test]
    fn test_discarded_fit_in_flight_never_lands() {
        let (release, gate) = channel();
        let mut job = ForecastJob::default();
        job.spawn(series(), 30, Arc::new(Gated(Mutex::new(gate))));
        assert!(job.is_running());

        job.discard();
        release.send(()).unwrap();
        std::thread::sleep(Duration::from_millis(50));

        assert!(!job.poll());
        assert!(job.outcome().is_none());
    }

    #[test]
    fn test_failure_before_start_is_shown() {
        let mut job = ForecastJob::default();
        job.fail(DashboardError::query("relation does not exist"));
        assert!(matches!(job.outcome(), Some(Err(DashboardError::Query { .. }))));
    }
}
