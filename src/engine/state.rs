use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use crate::analysis::forecast::clamp_horizon;
use crate::config::DASHBOARD;
use crate::domain::Indicator;

/// How the historical views are restricted.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub enum FilterMode {
    /// Explicit years. An empty list means every year.
    SpecificYears(Vec<i32>),
    /// One biennium by label. `None` (or a label that no longer exists) means
    /// the most recent biennium.
    Biennium(Option<String>),
}

/// Which radio button is active.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterKind {
    SpecificYears,
    Biennium,
}

impl FilterMode {
    pub fn kind(&self) -> FilterKind {
        match self {
            FilterMode::SpecificYears(_) => FilterKind::SpecificYears,
            FilterMode::Biennium(_) => FilterKind::Biennium,
        }
    }

    /// Pre-selection for "specific years": the most recent few of `available`.
    pub fn default_years(available: &BTreeSet<i32>) -> Self {
        let mut years: Vec<i32> = available
            .iter()
            .rev()
            .take(DASHBOARD.default_selected_years)
            .copied()
            .collect();
        years.sort_unstable();
        FilterMode::SpecificYears(years)
    }
}

/// Everything the user can choose. Persisted between runs.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Selection {
    pub filter: FilterMode,
    pub correlation_first: Option<Indicator>,
    pub correlation_second: Option<Indicator>,
    pub forecast_indicator: Indicator,
    pub forecast_horizon_days: u32,
}

impl Default for Selection {
    fn default() -> Self {
        Self {
            filter: FilterMode::SpecificYears(Vec::new()),
            correlation_first: None,
            correlation_second: None,
            forecast_indicator: Indicator::PolicyRate,
            forecast_horizon_days: DASHBOARD.forecast.default_horizon_days,
        }
    }
}

impl Selection {
    /// A fresh selection with the default years pre-selected.
    pub fn initial(available_years: &BTreeSet<i32>) -> Self {
        Self {
            filter: FilterMode::default_years(available_years),
            ..Self::default()
        }
    }

    /// Apply one user action. `Refresh` is handled by the `Dashboard`, not here.
    pub fn apply(&mut self, event: &DashboardEvent, available_years: &BTreeSet<i32>) {
        match event {
            DashboardEvent::SetFilterKind(kind) => {
                if *kind == self.filter.kind() {
                    return;
                }
                self.filter = match kind {
                    FilterKind::SpecificYears => FilterMode::default_years(available_years),
                    FilterKind::Biennium => FilterMode::Biennium(None),
                };
            }
            DashboardEvent::ToggleYear(year) => {
                let mut years = match &self.filter {
                    FilterMode::SpecificYears(years) => years.clone(),
                    FilterMode::Biennium(_) => Vec::new(),
                };
                if let Some(pos) = years.iter().position(|y| y == year) {
                    years.remove(pos);
                } else {
                    years.push(*year);
                    years.sort_unstable();
                }
                self.filter = FilterMode::SpecificYears(years);
            }
            DashboardEvent::SelectBiennium(label) => {
                self.filter = FilterMode::Biennium(Some(label.clone()));
            }
            DashboardEvent::SetCorrelationFirst(indicator) => {
                self.correlation_first = Some(*indicator);
                if self.correlation_second == Some(*indicator) {
                    self.correlation_second = None;
                }
            }
            DashboardEvent::SetCorrelationSecond(indicator) => {
                self.correlation_second = Some(*indicator);
            }
            DashboardEvent::SetForecastIndicator(indicator) => {
                self.forecast_indicator = *indicator;
            }
            DashboardEvent::SetForecastHorizon(days) => {
                self.forecast_horizon_days = clamp_horizon(*days);
            }
            DashboardEvent::Refresh => {}
        }
    }
}

/// User actions emitted by the presentation layer.
#[derive(Debug, Clone, PartialEq)]
pub enum DashboardEvent {
    /// Drop every cached connection and series, then reload
    Refresh,
    SetFilterKind(FilterKind),
    ToggleYear(i32),
    SelectBiennium(String),
    SetCorrelationFirst(Indicator),
    SetCorrelationSecond(Indicator),
    SetForecastIndicator(Indicator),
    SetForecastHorizon(i64),
}

#[cfg(test)]
mod tests {
    use super::*;

    fn years() -> BTreeSet<i32> {
        (2018..=2024).collect()
    }

    #[test]
    fn test_initial_selection_takes_three_most_recent_years() {
        let selection = Selection::initial(&years());
        assert_eq!(
            selection.filter,
            FilterMode::SpecificYears(vec![2022, 2023, 2024])
        );

        let few: BTreeSet<i32> = [2024].into();
        assert_eq!(
            Selection::initial(&few).filter,
            FilterMode::SpecificYears(vec![2024])
        );
    }

    #[test]
    fn test_toggle_year() {
        let mut selection = Selection::initial(&years());
        selection.apply(&DashboardEvent::ToggleYear(2023), &years());
        assert_eq!(selection.filter, FilterMode::SpecificYears(vec![2022, 2024]));

        selection.apply(&DashboardEvent::ToggleYear(2019), &years());
        assert_eq!(
            selection.filter,
            FilterMode::SpecificYears(vec![2019, 2022, 2024])
        );
    }

    #[test]
    fn test_switching_filter_kind() {
        let mut selection = Selection::initial(&years());
        selection.apply(&DashboardEvent::SelectBiennium("2021-2022".into()), &years());
        assert_eq!(selection.filter.kind(), FilterKind::Biennium);

        // Re-selecting the active kind keeps the current choice
        selection.apply(&DashboardEvent::SetFilterKind(FilterKind::Biennium), &years());
        assert_eq!(
            selection.filter,
            FilterMode::Biennium(Some("2021-2022".into()))
        );

        selection.apply(
            &DashboardEvent::SetFilterKind(FilterKind::SpecificYears),
            &years(),
        );
        assert_eq!(
            selection.filter,
            FilterMode::SpecificYears(vec![2022, 2023, 2024])
        );
    }

    #[test]
    fn test_forecast_horizon_is_clamped() {
        let mut selection = Selection::default();
        selection.apply(&DashboardEvent::SetForecastHorizon(5), &years());
        assert_eq!(selection.forecast_horizon_days, 30);
        selection.apply(&DashboardEvent::SetForecastHorizon(9999), &years());
        assert_eq!(selection.forecast_horizon_days, 730);
    }

    #[test]
    fn test_first_correlation_choice_clears_matching_second() {
        let mut selection = Selection::default();
        selection.apply(
            &DashboardEvent::SetCorrelationSecond(Indicator::Gdp),
            &years(),
        );
        selection.apply(&DashboardEvent::SetCorrelationFirst(Indicator::Gdp), &years());
        assert_eq!(selection.correlation_first, Some(Indicator::Gdp));
        assert_eq!(selection.correlation_second, None);
    }
}
