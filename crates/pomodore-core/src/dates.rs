//! Calendar helpers shared by the score, quest and task engines.
//!
//! Weeks run Monday 00:00:00 through Sunday 23:59:59. Dates are local
//! calendar dates, never timestamps, so timezone offsets cannot skew them.

use chrono::{Datelike, Duration, NaiveDate, NaiveDateTime, NaiveTime, Weekday};

use crate::error::ValidationError;

/// Parse a `YYYY-MM-DD` calendar date.
pub fn parse_date(s: &str) -> Result<NaiveDate, ValidationError> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")
        .map_err(|_| ValidationError::InvalidDate(s.to_string()))
}

pub fn format_date(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

/// Monday of the week containing `date`. Sunday belongs to the week that
/// started six days earlier.
pub fn week_start(date: NaiveDate) -> NaiveDate {
    let back = date.weekday().num_days_from_monday() as i64;
    date - Duration::days(back)
}

/// First and last instant of the Monday-Sunday week containing `date`.
pub fn week_range(date: NaiveDate) -> (NaiveDateTime, NaiveDateTime) {
    let start = week_start(date);
    let end = start + Duration::days(6);
    let last_instant = NaiveTime::from_hms_milli_opt(23, 59, 59, 999).unwrap_or(NaiveTime::MIN);
    (start.and_time(NaiveTime::MIN), end.and_time(last_instant))
}

/// The seven dates of the week containing `date`, Monday first.
pub fn week_days(date: NaiveDate) -> impl Iterator<Item = NaiveDate> {
    let start = week_start(date);
    (0..7).map(move |offset| start + Duration::days(offset))
}

pub fn is_weekend(date: NaiveDate) -> bool {
    matches!(date.weekday(), Weekday::Sat | Weekday::Sun)
}

/// Signed whole days from `from` to `to`.
pub fn days_between(from: NaiveDate, to: NaiveDate) -> i64 {
    to.signed_duration_since(from).num_days()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn sunday_belongs_to_previous_monday() {
        // 2024-03-10 is a Sunday.
        assert_eq!(week_start(date(2024, 3, 10)), date(2024, 3, 4));
        assert_eq!(week_start(date(2024, 3, 4)), date(2024, 3, 4));
        assert_eq!(week_start(date(2024, 3, 11)), date(2024, 3, 11));
    }

    #[test]
    fn week_range_spans_monday_to_sunday() {
        let (start, end) = week_range(date(2024, 3, 6));
        assert_eq!(start.to_string(), "2024-03-04 00:00:00");
        assert_eq!(end.date(), date(2024, 3, 10));
        assert_eq!(end.time().to_string(), "23:59:59.999");
    }

    #[test]
    fn parse_rejects_garbage() {
        assert_eq!(parse_date("2024-02-29").unwrap(), date(2024, 2, 29));
        assert!(parse_date("2023-02-29").is_err());
        assert!(parse_date("tomorrow").is_err());
    }

    #[test]
    fn weekend_and_days_between() {
        assert!(is_weekend(date(2024, 3, 9)));
        assert!(!is_weekend(date(2024, 3, 8)));
        assert_eq!(days_between(date(2024, 3, 1), date(2024, 3, 4)), 3);
        assert_eq!(days_between(date(2024, 3, 4), date(2024, 3, 1)), -3);
        assert_eq!(week_days(date(2024, 3, 7)).count(), 7);
    }
}
