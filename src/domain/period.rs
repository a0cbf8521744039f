use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// A labelled run of consecutive years, e.g. `"2022-2023"`.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct PeriodGroup {
    pub label: String,
    pub years: BTreeSet<i32>,
}

impl PeriodGroup {
    fn spanning(start: i32, end: i32) -> Self {
        let label = if start == end {
            start.to_string()
        } else {
            format!("{}-{}", start, end)
        };
        Self {
            label,
            years: (start..=end).collect(),
        }
    }

    pub fn contains(&self, year: i32) -> bool {
        self.years.contains(&year)
    }
}

/// Split the span of `years` into consecutive windows of `group_size` years,
/// most recent first.
///
/// Windows are anchored at the maximum year and walk backwards; the oldest
/// window is clamped at the minimum year and may be shorter. Each window covers
/// the whole contiguous range, so gaps in `years` still fall inside a group.
/// Returns an empty list for no years or `group_size < 1`.
pub fn group_periods(years: impl IntoIterator<Item = i32>, group_size: i32) -> Vec<PeriodGroup> {
    let years: BTreeSet<i32> = years.into_iter().collect();
    let (Some(&min_year), Some(&max_year)) = (years.first(), years.last()) else {
        return Vec::new();
    };
    if group_size < 1 {
        return Vec::new();
    }

    let mut groups = Vec::new();
    let mut end = max_year;
    while end >= min_year {
        let start = min_year.max(end - (group_size - 1));
        groups.push(PeriodGroup::spanning(start, end));
        end = start - 1;
    }
    groups
}

/// Look up a group by label.
pub fn find_group<'a>(groups: &'a [PeriodGroup], label: &str) -> Option<&'a PeriodGroup> {
    groups.iter().find(|g| g.label == label)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set(years: &[i32]) -> BTreeSet<i32> {
        years.iter().copied().collect()
    }

    #[test]
    fn test_bienniums_most_recent_first() {
        let groups = group_periods([2019, 2020, 2021, 2022], 2);
        assert_eq!(
            groups,
            vec![
                PeriodGroup {
                    label: "2021-2022".to_string(),
                    years: set(&[2021, 2022]),
                },
                PeriodGroup {
                    label: "2019-2020".to_string(),
                    years: set(&[2019, 2020]),
                },
            ]
        );
    }

    #[test]
    fn test_oldest_group_is_clamped() {
        let groups = group_periods([2018, 2019, 2020], 2);
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].label, "2019-2020");
        // Single-year group uses the bare year as label
        assert_eq!(groups[1].label, "2018");
        assert_eq!(groups[1].years, set(&[2018]));
    }

    #[test]
    fn test_fails_closed() {
        assert!(group_periods(Vec::<i32>::new(), 2).is_empty());
        assert!(group_periods([2020, 2021], 0).is_empty());
        assert!(group_periods([2020, 2021], -3).is_empty());
    }

    #[test]
    fn test_every_year_in_exactly_one_group() {
        let years = [2003, 2004, 2007, 2010, 2011, 2012, 2013, 2020];
        for group_size in 1..6 {
            let groups = group_periods(years, group_size);

            for year in years {
                let hits = groups.iter().filter(|g| g.contains(year)).count();
                assert_eq!(hits, 1, "year {} with size {}", year, group_size);
            }

            // Contiguous, non-overlapping, descending
            for pair in groups.windows(2) {
                let newer_start = *pair[0].years.first().unwrap();
                let older_end = *pair[1].years.last().unwrap();
                assert_eq!(older_end, newer_start - 1);
            }
            for group in &groups {
                let first = *group.years.first().unwrap();
                let last = *group.years.last().unwrap();
                assert_eq!(group.years.len() as i32, last - first + 1);
                assert!(group.years.len() as i32 <= group_size);
            }
        }
    }

    #[test]
    fn test_find_group() {
        let groups = group_periods([2021, 2022, 2023], 2);
        assert_eq!(find_group(&groups, "2022-2023").map(|g| g.years.len()), Some(2));
        assert!(find_group(&groups, "1999-2000").is_none());
    }
}
