use chrono::{DateTime, Utc};
use itertools::Itertools;
use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;
use strum::IntoEnumIterator;

use crate::analysis::forecast::{ForecastOutput, Forecaster, clamp_horizon, run_forecast};
use crate::analysis::correlate;
#[cfg(debug_assertions)]
use crate::config::DEBUG_FLAGS;
use crate::config::DASHBOARD;
use crate::data::SeriesCache;
use crate::domain::period::find_group;
use crate::domain::{Indicator, PeriodGroup, group_periods};
use crate::error::{DashboardError, DashboardResult};
use crate::models::{Series, filter_by_years};
use crate::utils::TimeUtils;

use super::state::{DashboardEvent, FilterMode, Selection};
use super::view::{ChartPanel, CorrelationPanel, DashboardView, ForecastPanel, MetricCard, Notice};

/// The years a filter selects, and how to describe them.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedFilter {
    /// Years to keep. Empty only when no year is available at all.
    pub years: BTreeSet<i32>,
    pub period: Option<String>,
    pub label: String,
}

/// Turn the user's filter into a concrete year set.
///
/// An empty (or entirely stale) year list selects every available year; an
/// absent or unknown biennium label falls back to the most recent biennium.
pub fn resolve_filter(
    filter: &FilterMode,
    available: &BTreeSet<i32>,
    periods: &[PeriodGroup],
) -> ResolvedFilter {
    let resolved = match filter {
        FilterMode::SpecificYears(chosen) => {
            let chosen: BTreeSet<i32> = chosen
                .iter()
                .filter(|y| available.contains(y))
                .copied()
                .collect();
            let years = if chosen.is_empty() {
                available.clone()
            } else {
                chosen
            };
            ResolvedFilter {
                label: years.iter().join(", "),
                years,
                period: None,
            }
        }
        FilterMode::Biennium(label) => {
            let group = label
                .as_deref()
                .and_then(|l| find_group(periods, l))
                .or_else(|| periods.first());
            match group {
                Some(group) => ResolvedFilter {
                    years: group.years.clone(),
                    period: Some(group.label.clone()),
                    label: format!("Biennium {}", group.label),
                },
                None => ResolvedFilter {
                    years: available.clone(),
                    period: None,
                    label: String::new(),
                },
            }
        }
    };

    if resolved.years.is_empty() {
        return ResolvedFilter {
            label: "All years".to_string(),
            ..resolved
        };
    }
    resolved
}

/// Owns the cache and the series loaded through it, and turns a `Selection`
/// into a `DashboardView`.
pub struct Dashboard {
    cache: SeriesCache,
    series: BTreeMap<Indicator, DashboardResult<Arc<Series>>>,
    loaded_at: DateTime<Utc>,
}

impl Dashboard {
    pub fn new(cache: SeriesCache) -> Self {
        Self {
            cache,
            series: BTreeMap::new(),
            loaded_at: Utc::now(),
        }
    }

    /// Fetch every indicator through the cache. A failure is kept for its own
    /// indicator and never stops the others.
    pub async fn load(&mut self) {
        for indicator in Indicator::iter() {
            let outcome = self.cache.fetch(indicator).await;
            self.series.insert(indicator, outcome);
        }
        self.loaded_at = Utc::now();

        let ready = self.series.values().filter(|s| s.is_ok()).count();
        log::info!(
            "📊 Loaded {}/{} indicators ({} store round trips so far)",
            ready,
            self.series.len(),
            self.cache.round_trips()
        );
    }

    /// Drop the cached connection and data, then load again.
    pub async fn refresh(&mut self) {
        self.cache.invalidate();
        self.load().await;
    }

    /// Apply the user's actions to `selection` and produce the next view.
    pub async fn update(
        &mut self,
        selection: &mut Selection,
        events: &[DashboardEvent],
    ) -> DashboardView {
        for event in events {
            #[cfg(debug_assertions)]
            if DEBUG_FLAGS.print_ui_interactions {
                log::info!("Event: {:?}", event);
            }
            match event {
                DashboardEvent::Refresh => self.refresh().await,
                other => selection.apply(other, &self.available_years()),
            }
        }
        self.view(selection)
    }

    /// The unfiltered series for `indicator`, as loaded.
    pub fn series(&self, indicator: Indicator) -> DashboardResult<Arc<Series>> {
        self.series.get(&indicator).cloned().unwrap_or_else(|| {
            Err(DashboardError::insufficient_data(format!(
                "{} has not been loaded",
                indicator
            )))
        })
    }

    /// Union of the years present in every successfully loaded series.
    pub fn available_years(&self) -> BTreeSet<i32> {
        self.series
            .values()
            .filter_map(|s| s.as_ref().ok())
            .flat_map(|s| s.years())
            .collect()
    }

    pub fn cache(&self) -> &SeriesCache {
        &self.cache
    }

    /// Forecast the unfiltered series on the calling thread.
    pub fn forecast(
        &self,
        indicator: Indicator,
        horizon_days: i64,
        forecaster: &dyn Forecaster,
    ) -> DashboardResult<ForecastOutput> {
        let series = self.series(indicator)?;
        run_forecast(&series, horizon_days, forecaster)
    }

    /// Build the render model for `selection`. Pure over the loaded data.
    pub fn view(&self, selection: &Selection) -> DashboardView {
        let available = self.available_years();
        let periods = group_periods(available.iter().copied(), DASHBOARD.biennium_size);
        let filter = resolve_filter(&selection.filter, &available, &periods);

        let filtered: BTreeMap<Indicator, Result<Series, Notice>> = Indicator::iter()
            .map(|indicator| (indicator, self.filtered(indicator, &filter.years)))
            .collect();

        DashboardView {
            generated_at: TimeUtils::format_brasilia(self.loaded_at),
            metrics: Indicator::iter().map(|i| self.metric_card(i)).collect(),
            filter_kind: selection.filter.kind(),
            year_options: available.iter().rev().copied().collect(),
            period_options: periods.clone(),
            selected_period: filter.period.clone(),
            selected_years: filter.years.clone(),
            filter_label: filter.label.clone(),
            charts: Indicator::iter()
                .map(|indicator| ChartPanel {
                    indicator,
                    title: indicator.meta().chart_title,
                    axis_label: indicator.meta().axis_label,
                    content: filtered[&indicator].clone(),
                })
                .collect(),
            correlation: correlation_panel(selection, &filtered),
            forecast: ForecastPanel {
                choices: Indicator::iter().collect(),
                indicator: selection.forecast_indicator,
                horizon_days: clamp_horizon(selection.forecast_horizon_days as i64),
            },
        }
    }

    fn filtered(&self, indicator: Indicator, years: &BTreeSet<i32>) -> Result<Series, Notice> {
        let series = self.series(indicator).map_err(|e| Notice::from(&e))?;
        let filtered = filter_by_years(&series, years);
        if filtered.points().next().is_none() {
            let name = indicator.meta().chart_title;
            let name = name.split('(').next().unwrap_or(name).trim();
            return Err(Notice::Warning(format!(
                "No {} data for the selected period.",
                name
            )));
        }
        Ok(filtered)
    }

    fn metric_card(&self, indicator: Indicator) -> MetricCard {
        let na = |error: Option<String>| MetricCard {
            indicator,
            label: indicator.display_name().to_string(),
            value: "N/A".to_string(),
            error,
        };

        match self.series(indicator) {
            Ok(series) => match series.latest() {
                Some((date, value)) => MetricCard {
                    indicator,
                    label: format!(
                        "{} - {}",
                        indicator.display_name(),
                        TimeUtils::format_date(date)
                    ),
                    value: indicator.format_value(value),
                    error: None,
                },
                None => na(None),
            },
            Err(e) => na(Some(e.to_string())),
        }
    }
}

fn correlation_panel(
    selection: &Selection,
    filtered: &BTreeMap<Indicator, Result<Series, Notice>>,
) -> CorrelationPanel {
    let choices: Vec<Indicator> = filtered
        .iter()
        .filter(|(_, s)| s.is_ok())
        .map(|(i, _)| *i)
        .collect();

    let first = selection
        .correlation_first
        .filter(|i| choices.contains(i))
        .or_else(|| choices.first().copied());
    let second = selection
        .correlation_second
        .filter(|i| choices.contains(i) && Some(*i) != first)
        .or_else(|| choices.iter().copied().find(|i| Some(*i) != first));

    let content = match (first, second) {
        (Some(a), Some(b)) => match (&filtered[&a], &filtered[&b]) {
            (Ok(sa), Ok(sb)) => correlate(sa, sb).map_err(|e| Notice::from(&e)),
            _ => Err(Notice::Warning("Select two indicators with data.".to_string())),
        },
        _ => Err(Notice::Warning(
            "Not enough data for correlation analysis. Check the filters or data availability."
                .to_string(),
        )),
    };

    CorrelationPanel {
        choices,
        first,
        second,
        content,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::LinearTrendForecaster;
    use crate::data::store::testing::{MemoryConnector, MemoryStore};
    use crate::domain::Observation;
    use crate::engine::state::FilterKind;
    use crate::utils::ManualClock;
    use chrono::NaiveDate;
    use std::time::Duration;

    fn obs(y: i32, m: u32, d: u32, v: f64) -> Observation {
        Observation::raw(NaiveDate::from_ymd_opt(y, m, d), Some(v))
    }

    /// Selic and IPCA on 2020..=2023, exchange rate on 2022..=2023, no GDP table.
    fn store() -> Arc<MemoryStore> {
        let store = MemoryStore::new();
        let mut selic = Vec::new();
        let mut ipca = Vec::new();
        for (i, year) in (2020..=2023).enumerate() {
            for month in [1, 7] {
                let t = i as f64 * 2.0 + (month as f64 / 12.0);
                selic.push(obs(year, month, 1, 2.0 + t));
                ipca.push(obs(year, month, 1, 100.0 + 3.0 * t));
            }
        }
        store.insert(Indicator::PolicyRate.query(), selic);
        store.insert(Indicator::PriceIndex.query(), ipca);
        store.insert(
            Indicator::ExchangeRate.query(),
            vec![obs(2022, 3, 1, 5.1), obs(2023, 3, 1, 4.9)],
        );
        store.insert(Indicator::UnemploymentRate.query(), Vec::new());
        store
    }

    async fn loaded(store: Arc<MemoryStore>) -> Dashboard {
        let connector = MemoryConnector::new(store);
        let cache = SeriesCache::with_clock(
            connector,
            Arc::new(ManualClock::new()),
            Duration::from_secs(3600),
        );
        let mut dashboard = Dashboard::new(cache);
        dashboard.load().await;
        dashboard
    }

    #[test]
    fn test_resolve_filter() {
        let available: BTreeSet<i32> = (2019..=2022).collect();
        let periods = group_periods(available.iter().copied(), 2);

        let specific = resolve_filter(
            &FilterMode::SpecificYears(vec![2022, 2020]),
            &available,
            &periods,
        );
        assert_eq!(specific.years, BTreeSet::from([2020, 2022]));
        assert_eq!(specific.label, "2020, 2022");

        let all = resolve_filter(&FilterMode::SpecificYears(vec![]), &available, &periods);
        assert_eq!(all.years, available);
        assert_eq!(all.label, "2019, 2020, 2021, 2022");

        let stale = resolve_filter(&FilterMode::Biennium(Some("1990-1991".into())), &available, &periods);
        assert_eq!(stale.period.as_deref(), Some("2021-2022"));
        assert_eq!(stale.label, "Biennium 2021-2022");

        let chosen = resolve_filter(&FilterMode::Biennium(Some("2019-2020".into())), &available, &periods);
        assert_eq!(chosen.years, BTreeSet::from([2019, 2020]));

        let nothing = resolve_filter(&FilterMode::Biennium(None), &BTreeSet::new(), &[]);
        assert!(nothing.years.is_empty());
        assert_eq!(nothing.label, "All years");
    }

    #[tokio::test]
    async fn test_each_section_degrades_independently() {
        let dashboard = loaded(store()).await;
        let selection = Selection::initial(&dashboard.available_years());
        let view = dashboard.view(&selection);

        assert_eq!(view.year_options, vec![2023, 2022, 2021, 2020]);
        assert_eq!(view.filter_label, "2021, 2022, 2023");

        let gdp = &view.metrics[4];
        assert_eq!(gdp.value, "N/A");
        assert!(gdp.error.is_some());

        let unemployment = &view.metrics[3];
        assert_eq!(unemployment.value, "N/A");
        assert!(unemployment.error.is_none());

        let selic = &view.metrics[0];
        assert_eq!(selic.label, "Selic (% p.a.) - 01/07/2023");
        assert_eq!(selic.value, "8.58%");

        assert!(view.charts[0].content.is_ok());
        assert!(matches!(view.charts[3].content, Err(Notice::Warning(_))));
        assert!(matches!(view.charts[4].content, Err(Notice::Error(_))));
    }

    #[tokio::test]
    async fn test_correlation_defaults_and_fallbacks() {
        let dashboard = loaded(store()).await;
        let mut selection = Selection::initial(&dashboard.available_years());

        let view = dashboard.view(&selection);
        let panel = &view.correlation;
        assert_eq!(
            panel.choices,
            vec![Indicator::PolicyRate, Indicator::PriceIndex, Indicator::ExchangeRate]
        );
        assert_eq!(panel.first, Some(Indicator::PolicyRate));
        assert_eq!(panel.second, Some(Indicator::PriceIndex));
        let correlation = panel.content.as_ref().unwrap();
        assert!((correlation.coefficient - 1.0).abs() < 1e-9);

        // No shared dates between Selic and PTAX
        selection.correlation_second = Some(Indicator::ExchangeRate);
        let view = dashboard.view(&selection);
        assert!(matches!(view.correlation.content, Err(Notice::Warning(_))));

        // A choice without data in the period falls back to the defaults
        selection.correlation_first = Some(Indicator::Gdp);
        let view = dashboard.view(&selection);
        assert_eq!(view.correlation.first, Some(Indicator::PolicyRate));
        assert_eq!(view.correlation.second, Some(Indicator::ExchangeRate));
    }

    #[tokio::test]
    async fn test_single_valid_indicator_warns() {
        let mut dashboard = loaded(store()).await;
        let mut selection = Selection::initial(&dashboard.available_years());
        let view = dashboard
            .update(
                &mut selection,
                &[DashboardEvent::SetFilterKind(FilterKind::Biennium)],
            )
            .await;
        assert_eq!(view.selected_period.as_deref(), Some("2022-2023"));

        let view = dashboard
            .update(
                &mut selection,
                &[DashboardEvent::SelectBiennium("2020-2021".into())],
            )
            .await;
        assert_eq!(view.filter_label, "Biennium 2020-2021");
        assert_eq!(view.correlation.choices.len(), 2);

        selection.filter = FilterMode::SpecificYears(vec![2020]);
        let store = store();
        store.insert(Indicator::PriceIndex.query(), Vec::new());
        let dashboard = loaded(store).await;
        let view = dashboard.view(&selection);
        assert_eq!(view.correlation.choices, vec![Indicator::PolicyRate]);
        assert_eq!(view.correlation.second, None);
        assert!(view.correlation.content.is_err());
    }

    #[tokio::test]
    async fn test_refresh_event_reloads_from_store() {
        let store = store();
        let mut dashboard = loaded(store.clone()).await;
        let mut selection = Selection::default();
        assert_eq!(store.round_trips(), 5);

        dashboard.update(&mut selection, &[]).await;
        assert_eq!(store.round_trips(), 5);

        store.insert(Indicator::Gdp.query(), vec![obs(2023, 1, 1, 2_500_000.0)]);
        let view = dashboard
            .update(&mut selection, &[DashboardEvent::Refresh])
            .await;
        assert_eq!(store.round_trips(), 10);
        assert_eq!(view.metrics[4].value, "R$ 2500.00 Bi");
    }

    #[tokio::test]
    async fn test_forecast_uses_unfiltered_series() {
        let dashboard = loaded(store()).await;
        let output = dashboard
            .forecast(Indicator::PolicyRate, 60, &LinearTrendForecaster::default())
            .unwrap();
        assert_eq!(output.history.len(), 8);
        assert_eq!(output.future().len(), 60);

        let err = dashboard
            .forecast(Indicator::UnemploymentRate, 60, &LinearTrendForecaster::default())
            .unwrap_err();
        assert!(err.is_insufficient_data());
        assert!(
            dashboard
                .forecast(Indicator::Gdp, 60, &LinearTrendForecaster::default())
                .is_err()
        );
    }

    #[tokio::test]
    async fn test_failed_query_only_affects_its_indicator() {
        let store = store();
        store.insert_error(
            Indicator::ExchangeRate.query(),
            DashboardError::query("permission denied for table stg_cambio_ptax_venda"),
        );
        let dashboard = loaded(store).await;
        let view = dashboard.view(&Selection::initial(&dashboard.available_years()));

        let ptax = &view.metrics[2];
        assert_eq!(ptax.value, "N/A");
        assert_eq!(
            ptax.error.as_deref(),
            Some("Query failed: permission denied for table stg_cambio_ptax_venda")
        );
        assert!(matches!(view.charts[2].content, Err(Notice::Error(_))));
        assert!(!view.correlation.choices.contains(&Indicator::ExchangeRate));

        assert_eq!(view.metrics[0].value, "8.58%");
        assert!(view.charts[1].content.is_ok());
    }
}
