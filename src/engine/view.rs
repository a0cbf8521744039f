//! The render model: everything the presentation layer draws, already resolved.

use std::collections::BTreeSet;

use crate::analysis::Correlation;
use crate::domain::{Indicator, PeriodGroup};
use crate::engine::state::FilterKind;
use crate::error::DashboardError;
use crate::models::Series;

/// Inline message shown in place of a section's content.
#[derive(Debug, Clone, PartialEq)]
pub enum Notice {
    Warning(String),
    Error(String),
}

impl Notice {
    pub fn text(&self) -> &str {
        match self {
            Notice::Warning(text) | Notice::Error(text) => text,
        }
    }
}

impl From<&DashboardError> for Notice {
    fn from(error: &DashboardError) -> Self {
        if error.is_insufficient_data() {
            Notice::Warning(error.to_string())
        } else {
            Notice::Error(error.to_string())
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct MetricCard {
    pub indicator: Indicator,
    /// Name plus the date of the value, e.g. `"Selic (% p.a.) - 02/01/2024"`
    pub label: String,
    /// Formatted value, or `"N/A"`
    pub value: String,
    pub error: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ChartPanel {
    pub indicator: Indicator,
    pub title: &'static str,
    pub axis_label: &'static str,
    /// The filtered series, never empty when `Ok`
    pub content: Result<Series, Notice>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CorrelationPanel {
    /// Indicators with data in the selected period
    pub choices: Vec<Indicator>,
    pub first: Option<Indicator>,
    pub second: Option<Indicator>,
    pub content: Result<Correlation, Notice>,
}

impl CorrelationPanel {
    /// Options for the second combo box: every choice except the first.
    pub fn second_choices(&self) -> Vec<Indicator> {
        self.choices
            .iter()
            .copied()
            .filter(|i| Some(*i) != self.first)
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ForecastPanel {
    pub choices: Vec<Indicator>,
    pub indicator: Indicator,
    pub horizon_days: u32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DashboardView {
    /// Load time in Brasília time
    pub generated_at: String,
    pub metrics: Vec<MetricCard>,

    pub filter_kind: FilterKind,
    /// Every year with data, most recent first
    pub year_options: Vec<i32>,
    pub period_options: Vec<PeriodGroup>,
    /// Biennium in effect, when filtering by biennium
    pub selected_period: Option<String>,
    /// Years in effect. Empty means no restriction.
    pub selected_years: BTreeSet<i32>,
    pub filter_label: String,

    pub charts: Vec<ChartPanel>,
    pub correlation: CorrelationPanel,
    pub forecast: ForecastPanel,
}
