use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use crate::domain::{Indicator, Observation};

// ============================================================================
// Series: one materialized indicator table
// ============================================================================

/// An indicator's observations, sorted ascending by date.
///
/// The cache owns the canonical copy behind an `Arc`; every derived view
/// (filtering, joins, forecasting input) is a new value, never a mutation.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Series {
    pub indicator: Indicator,
    pub observations: Vec<Observation>,
    /// Whether the per-row year has been derived. A series without it passes
    /// through `filter_by_years` untouched.
    pub has_year: bool,
}

impl Series {
    /// Build a series from store rows: sort by date (undated rows last), keep
    /// the last row of any repeated date and attach the derived year.
    pub fn from_rows(indicator: Indicator, rows: Vec<Observation>) -> Self {
        let mut observations: Vec<Observation> =
            rows.into_iter().map(Observation::with_derived_year).collect();
        sort_by_date(&mut observations);

        let before = observations.len();
        observations = dedup_dates(observations);
        if observations.len() < before {
            log::warn!(
                "{}: dropped {} row(s) with a repeated date",
                indicator,
                before - observations.len()
            );
        }

        Self {
            indicator,
            observations,
            has_year: true,
        }
    }

    /// A series exactly as given, without any year field.
    pub fn without_years(indicator: Indicator, observations: Vec<Observation>) -> Self {
        Self {
            indicator,
            observations,
            has_year: false,
        }
    }

    pub fn empty(indicator: Indicator) -> Self {
        Self::without_years(indicator, Vec::new())
    }

    pub fn len(&self) -> usize {
        self.observations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.observations.is_empty()
    }

    /// Distinct years present in the series.
    pub fn years(&self) -> BTreeSet<i32> {
        self.observations.iter().filter_map(|o| o.year).collect()
    }

    /// Most recent observation with both a date and a value.
    pub fn latest(&self) -> Option<(NaiveDate, f64)> {
        self.points().max_by_key(|(date, _)| *date)
    }

    /// `(date, value)` pairs with both fields present, in series order.
    pub fn points(&self) -> impl Iterator<Item = (NaiveDate, f64)> + '_ {
        self.observations.iter().filter_map(Observation::point)
    }

    pub fn filter_by_years(&self, years: &BTreeSet<i32>) -> Series {
        filter_by_years(self, years)
    }
}

fn sort_by_date(observations: &mut [Observation]) {
    // Stable: equal keys keep store order. `None` sorts after every date.
    observations.sort_by_key(|o| (o.date.is_none(), o.date));
}

/// Collapse runs of the same date to their last row. Expects sorted input;
/// undated rows are never merged.
fn dedup_dates(observations: Vec<Observation>) -> Vec<Observation> {
    let mut unique: Vec<Observation> = Vec::with_capacity(observations.len());
    for observation in observations {
        match unique.last_mut() {
            Some(last) if last.date.is_some() && last.date == observation.date => {
                *last = observation;
            }
            _ => unique.push(observation),
        }
    }
    unique
}

// ============================================================================
// Series filter
// ============================================================================

/// Keep only observations whose derived year is in `years`, sorted ascending by
/// date.
///
/// A series that is empty or has no year field is returned unchanged. Rows
/// whose year is missing are dropped silently rather than raising.
pub fn filter_by_years(series: &Series, years: &BTreeSet<i32>) -> Series {
    if series.is_empty() || !series.has_year {
        return series.clone();
    }

    let mut observations: Vec<Observation> = series
        .observations
        .iter()
        .filter(|o| o.year.is_some_and(|y| years.contains(&y)))
        .copied()
        .collect();
    sort_by_date(&mut observations);

    Series {
        indicator: series.indicator,
        observations,
        has_year: true,
    }
}
