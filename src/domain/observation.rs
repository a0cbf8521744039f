use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

/// One row of an indicator table.
///
/// Both columns are nullable in the store, so both are optional here. The year
/// is derived from the date when the series is materialized; a row without a
/// date has no year.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
pub struct Observation {
    pub date: Option<NaiveDate>,
    pub value: Option<f64>,
    pub year: Option<i32>,
}

impl Observation {
    /// A row straight from the store, before any year is attached.
    pub fn raw(date: Option<NaiveDate>, value: Option<f64>) -> Self {
        Self {
            date,
            value,
            year: None,
        }
    }

    /// A fully populated row (mainly for callers that build series by hand).
    pub fn new(date: NaiveDate, value: f64) -> Self {
        Self {
            date: Some(date),
            value: Some(value),
            year: Some(date.year()),
        }
    }

    pub fn with_derived_year(self) -> Self {
        Self {
            year: self.date.map(|d| d.year()),
            ..self
        }
    }

    /// `(date, value)` when both are present.
    pub fn point(&self) -> Option<(NaiveDate, f64)> {
        match (self.date, self.value) {
            (Some(date), Some(value)) if value.is_finite() => Some((date, value)),
            _ => None,
        }
    }
}
