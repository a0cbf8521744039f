use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use statrs::statistics::Statistics;
use std::collections::BTreeMap;

use crate::config::DASHBOARD;
use crate::domain::Indicator;
use crate::error::{DashboardError, DashboardResult};
use crate::models::Series;

/// Values of two series observed on the same date.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
pub struct AlignedPair {
    pub date: NaiveDate,
    pub first: f64,
    pub second: f64,
}

/// Least-squares line of `second` on `first`, drawn over the scatter plot.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
pub struct TrendLine {
    pub slope: f64,
    pub intercept: f64,
}

impl TrendLine {
    pub fn at(&self, x: f64) -> f64 {
        self.intercept + self.slope * x
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Correlation {
    pub first: Indicator,
    pub second: Indicator,
    /// Pearson coefficient, always finite and within [-1, 1]
    pub coefficient: f64,
    pub pairs: Vec<AlignedPair>,
    pub trend: TrendLine,
}

/// Inner join on date. Only exact date matches count and rows missing either
/// value are skipped. Each side contributes at most one value per date (the
/// last one), so swapping the arguments yields the same pairs. Output is
/// ascending by date.
pub fn align(first: &Series, second: &Series) -> Vec<AlignedPair> {
    let left: BTreeMap<NaiveDate, f64> = first.points().collect();
    let right: BTreeMap<NaiveDate, f64> = second.points().collect();

    left.into_iter()
        .filter_map(|(date, a)| {
            right.get(&date).map(|&b| AlignedPair {
                date,
                first: a,
                second: b,
            })
        })
        .collect()
}

/// Pearson correlation of two series over their common dates.
///
/// Fewer than two aligned points, or a side with no variance, is reported as
/// `InsufficientData` so the caller never shows a NaN.
pub fn correlate(first: &Series, second: &Series) -> DashboardResult<Correlation> {
    let pairs = align(first, second);

    if pairs.len() < DASHBOARD.min_correlation_points {
        return Err(DashboardError::insufficient_data(format!(
            "'{}' and '{}' share {} date(s) in the selected period; at least {} are needed",
            first.indicator,
            second.indicator,
            pairs.len(),
            DASHBOARD.min_correlation_points
        )));
    }

    let xs: Vec<f64> = pairs.iter().map(|p| p.first).collect();
    let ys: Vec<f64> = pairs.iter().map(|p| p.second).collect();

    let moments = Moments::of(&xs, &ys);
    let coefficient = moments.pearson().ok_or_else(|| {
        DashboardError::insufficient_data(format!(
            "'{}' or '{}' is constant over the selected period",
            first.indicator, second.indicator
        ))
    })?;

    Ok(Correlation {
        first: first.indicator,
        second: second.indicator,
        coefficient,
        trend: moments.trend(),
        pairs,
    })
}

/// Centered sums of squares and cross products.
struct Moments {
    mean_x: f64,
    mean_y: f64,
    sxx: f64,
    syy: f64,
    sxy: f64,
}

impl Moments {
    fn of(xs: &[f64], ys: &[f64]) -> Self {
        let mean_x = xs.iter().mean();
        let mean_y = ys.iter().mean();

        let (mut sxx, mut syy, mut sxy) = (0.0, 0.0, 0.0);
        for (x, y) in xs.iter().zip(ys) {
            let dx = x - mean_x;
            let dy = y - mean_y;
            sxx += dx * dx;
            syy += dy * dy;
            sxy += dx * dy;
        }
        Self {
            mean_x,
            mean_y,
            sxx,
            syy,
            sxy,
        }
    }

    fn pearson(&self) -> Option<f64> {
        let denom = (self.sxx * self.syy).sqrt();
        if denom == 0.0 || !denom.is_finite() {
            return None;
        }
        Some((self.sxy / denom).clamp(-1.0, 1.0))
    }

    fn trend(&self) -> TrendLine {
        let slope = if self.sxx > 0.0 { self.sxy / self.sxx } else { 0.0 };
        TrendLine {
            slope,
            intercept: self.mean_y - slope * self.mean_x,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Observation;

    fn day(n: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2022, 1, 1).unwrap() + chrono::Duration::days(n as i64)
    }

    fn series(indicator: Indicator, points: &[(u32, f64)]) -> Series {
        Series::from_rows(
            indicator,
            points
                .iter()
                .map(|&(d, v)| Observation::raw(Some(day(d)), Some(v)))
                .collect(),
        )
    }

    #[test]
    fn test_perfect_linear_relation() {
        let a = series(Indicator::PolicyRate, &[(0, 1.0), (1, 2.0), (2, 4.0), (3, 7.0)]);
        let b = series(
            Indicator::ExchangeRate,
            &[(0, 3.0), (1, 5.0), (2, 9.0), (3, 15.0)],
        );

        let result = correlate(&a, &b).unwrap();
        assert!((result.coefficient - 1.0).abs() < 1e-12);
        assert!((result.trend.slope - 2.0).abs() < 1e-12);
        assert!((result.trend.intercept - 1.0).abs() < 1e-12);
        assert_eq!(result.pairs.len(), 4);
    }

    #[test]
    fn test_symmetry() {
        let a = series(
            Indicator::PriceIndex,
            &[(0, 1.3), (1, 2.9), (2, 2.1), (3, 5.5), (5, 4.2)],
        );
        let b = series(
            Indicator::Gdp,
            &[(0, 10.0), (1, 8.5), (2, 9.1), (3, 3.3), (4, 1.0), (5, 6.0)],
        );

        let ab = correlate(&a, &b).unwrap();
        let ba = correlate(&b, &a).unwrap();
        assert_eq!(ab.coefficient, ba.coefficient);
        assert!(ab.coefficient < 0.0);
    }

    #[test]
    fn test_inner_join_only_uses_common_dates() {
        let a = series(Indicator::PolicyRate, &[(0, 1.0), (2, 2.0), (4, 3.0), (6, 5.0)]);
        let b = series(Indicator::PriceIndex, &[(1, 1.0), (2, 2.0), (4, 9.0), (5, 3.0)]);

        let pairs = align(&a, &b);
        assert_eq!(
            pairs.iter().map(|p| p.date).collect::<Vec<_>>(),
            vec![day(2), day(4)]
        );
        assert_eq!(pairs[1].first, 3.0);
        assert_eq!(pairs[1].second, 9.0);
    }

    #[test]
    fn test_fewer_than_two_common_dates() {
        let a = series(Indicator::PolicyRate, &[(0, 1.0), (1, 2.0)]);
        let b = series(Indicator::PriceIndex, &[(1, 5.0), (2, 6.0)]);

        let err = correlate(&a, &b).unwrap_err();
        assert!(err.is_insufficient_data());

        let none = series(Indicator::Gdp, &[(9, 1.0)]);
        assert!(correlate(&a, &none).unwrap_err().is_insufficient_data());
    }

    #[test]
    fn test_missing_values_do_not_align() {
        let a = Series::from_rows(
            Indicator::PolicyRate,
            vec![
                Observation::raw(Some(day(0)), Some(1.0)),
                Observation::raw(Some(day(1)), None),
                Observation::raw(Some(day(2)), Some(3.0)),
            ],
        );
        let b = series(Indicator::PriceIndex, &[(0, 1.0), (1, 2.0), (2, 3.0)]);
        assert_eq!(align(&a, &b).len(), 2);
    }

    #[test]
    fn test_constant_series_is_not_nan() {
        let a = series(Indicator::PolicyRate, &[(0, 2.0), (1, 2.0), (2, 2.0)]);
        let b = series(Indicator::PriceIndex, &[(0, 1.0), (1, 2.0), (2, 3.0)]);
        assert!(correlate(&a, &b).unwrap_err().is_insufficient_data());
    }

    #[test]
    fn test_repeated_dates_keep_symmetry() {
        // Built without `from_rows` so the repeated date reaches the join
        let a = Series::without_years(
            Indicator::PolicyRate,
            vec![
                Observation::new(day(0), 1.0),
                Observation::new(day(1), 2.0),
                Observation::new(day(1), 9.0),
                Observation::new(day(2), 3.0),
            ],
        );
        let b = series(Indicator::Gdp, &[(0, 4.0), (1, 5.0), (2, 7.0)]);

        let ab = correlate(&a, &b).unwrap();
        let ba = correlate(&b, &a).unwrap();
        assert_eq!(ab.pairs.len(), 3);
        assert_eq!(ba.pairs.len(), 3);
        assert_eq!(ab.coefficient, ba.coefficient);
        assert_eq!(ab.pairs[1].first, 9.0);
    }
}
