//! Shared traits and calendar utilities for expense records.

use chrono::{DateTime, Datelike, NaiveDate};

/// Supplies a common contract for retrieving numeric amounts.
pub trait Amounted {
    fn amount(&self) -> f64;
}

/// Sums the amounts of every item in `items`.
pub fn sum_amounts<'a, T, I>(items: I) -> f64
where
    T: Amounted + 'a,
    I: IntoIterator<Item = &'a T>,
{
    items.into_iter().map(Amounted::amount).sum()
}

/// Lower bound used for open-ended date ranges.
pub fn epoch_date() -> NaiveDate {
    NaiveDate::default()
}

/// Parses a user supplied calendar date.
///
/// Accepts `YYYY-MM-DD` and full RFC 3339 timestamps (keeping the calendar
/// date as written). Anything else yields `None`.
pub fn parse_calendar_date(raw: &str) -> Option<NaiveDate> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
        .ok()
        .or_else(|| {
            DateTime::parse_from_rfc3339(trimmed)
                .ok()
                .map(|stamp| stamp.date_naive())
        })
}

/// First day of the month containing `date`.
pub fn month_start(date: NaiveDate) -> NaiveDate {
    date.with_day(1).unwrap_or(date)
}

/// Returns `true` when both dates fall in the same calendar month.
pub fn same_month(a: NaiveDate, b: NaiveDate) -> bool {
    a.year() == b.year() && a.month() == b.month()
}

/// Moves the first-of-month for `date` by `months` (negative goes back).
pub fn shift_month_start(date: NaiveDate, months: i32) -> Option<NaiveDate> {
    let index = date.year() * 12 + date.month0() as i32 + months;
    let year = index.div_euclid(12);
    let month = index.rem_euclid(12) as u32 + 1;
    NaiveDate::from_ymd_opt(year, month, 1)
}

/// Short month label such as `Jan 2024`.
pub fn month_label(date: NaiveDate) -> String {
    date.format("%b %Y").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn parses_plain_and_timestamp_dates() {
        assert_eq!(parse_calendar_date("2024-02-15"), Some(ymd(2024, 2, 15)));
        assert_eq!(
            parse_calendar_date("2024-02-15T23:10:00+02:00"),
            Some(ymd(2024, 2, 15))
        );
        assert_eq!(parse_calendar_date("15/02/2024"), None);
        assert_eq!(parse_calendar_date(""), None);
        assert_eq!(parse_calendar_date("2024-02-30"), None);
    }

    #[test]
    fn shifts_across_year_boundaries() {
        assert_eq!(shift_month_start(ymd(2024, 3, 17), -5), Some(ymd(2023, 10, 1)));
        assert_eq!(shift_month_start(ymd(2024, 11, 30), 2), Some(ymd(2025, 1, 1)));
        assert_eq!(shift_month_start(ymd(2024, 1, 1), 0), Some(ymd(2024, 1, 1)));
    }

    #[test]
    fn labels_months() {
        assert_eq!(month_label(ymd(2024, 1, 1)), "Jan 2024");
        assert_eq!(epoch_date(), ymd(1970, 1, 1));
    }
}
