use chrono::{DateTime, FixedOffset, NaiveDate, Offset, Utc};

pub struct TimeUtils;

impl TimeUtils {
    /// Brasília has been UTC-3 all year since daylight saving ended in 2019.
    pub const BRASILIA_UTC_OFFSET_SECS: i32 = 3 * 3600;
    pub const DISPLAY_DATE_FORMAT: &str = "%d/%m/%Y";
    pub const DISPLAY_DATETIME_FORMAT: &str = "%d/%m/%Y %H:%M:%S";

    pub fn brasilia_offset() -> FixedOffset {
        FixedOffset::west_opt(Self::BRASILIA_UTC_OFFSET_SECS).unwrap_or(Utc.fix())
    }

    /// Format a UTC instant as Brasília wall-clock time (`dd/mm/YYYY HH:MM:SS`).
    pub fn format_brasilia(instant: DateTime<Utc>) -> String {
        instant
            .with_timezone(&Self::brasilia_offset())
            .format(Self::DISPLAY_DATETIME_FORMAT)
            .to_string()
    }

    pub fn format_date(date: NaiveDate) -> String {
        date.format(Self::DISPLAY_DATE_FORMAT).to_string()
    }

    /// Days since the Unix epoch; the x coordinate used by every chart.
    pub fn date_to_plot_x(date: NaiveDate) -> f64 {
        (date - NaiveDate::default()).num_days() as f64
    }

    /// Inverse of `date_to_plot_x`, rounding to the nearest day.
    pub fn plot_x_to_date(x: f64) -> Option<NaiveDate> {
        if !x.is_finite() {
            return None;
        }
        NaiveDate::default().checked_add_signed(chrono::Duration::days(x.round() as i64))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_brasilia_formatting() {
        let instant = Utc.with_ymd_and_hms(2024, 1, 15, 12, 30, 5).unwrap();
        assert_eq!(TimeUtils::format_brasilia(instant), "15/01/2024 09:30:05");
    }

    #[test]
    fn test_plot_x_round_trip() {
        let date = NaiveDate::from_ymd_opt(2023, 7, 31).unwrap();
        let x = TimeUtils::date_to_plot_x(date);
        assert_eq!(TimeUtils::plot_x_to_date(x), Some(date));
        assert_eq!(TimeUtils::plot_x_to_date(f64::NAN), None);
    }
}
