//! Calendar helpers: date parsing and range expansion.

use chrono::{Datelike, NaiveDate};

/// Largest allowed distance between the first and last day of a period.
///
/// A period may therefore cover at most 371 dates.
pub const MAX_SPAN_DAYS: i64 = 370;

/// Parses a strict `YYYY-MM-DD` date.
///
/// ```
/// use shift_scheduling::calendar::parse_iso_date;
///
/// assert!(parse_iso_date("2025-02-28").is_some());
/// assert!(parse_iso_date("2025-02-30").is_none());
/// assert!(parse_iso_date("2025-2-3").is_none());
/// ```
pub fn parse_iso_date(s: &str) -> Option<NaiveDate> {
    let s = s.trim();
    if s.len() != 10 {
        return None;
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d").ok()
}

/// Expands an inclusive date range into ascending dates.
///
/// Returns an empty list when `end` precedes `start`.
///
/// ```
/// use chrono::NaiveDate;
/// use shift_scheduling::calendar::expand_date_range;
///
/// let start = NaiveDate::from_ymd_opt(2024, 12, 30).unwrap();
/// let end = NaiveDate::from_ymd_opt(2025, 1, 2).unwrap();
/// let days = expand_date_range(start, end);
/// assert_eq!(days.len(), 4);
/// assert_eq!(days[0], start);
/// assert_eq!(days[3], end);
/// ```
pub fn expand_date_range(start: NaiveDate, end: NaiveDate) -> Vec<NaiveDate> {
    if end < start {
        return Vec::new();
    }
    start.iter_days().take_while(|d| *d <= end).collect()
}

/// Returns every date of a calendar month, or nothing for an invalid month.
pub fn expand_month(year: i32, month: u32) -> Vec<NaiveDate> {
    match month_bounds(year, month) {
        Some((first, last)) => expand_date_range(first, last),
        None => Vec::new(),
    }
}

/// First and last day of a calendar month.
pub fn month_bounds(year: i32, month: u32) -> Option<(NaiveDate, NaiveDate)> {
    let first = NaiveDate::from_ymd_opt(year, month, 1)?;
    let next = if month == 12 {
        NaiveDate::from_ymd_opt(year.checked_add(1)?, 1, 1)?
    } else {
        NaiveDate::from_ymd_opt(year, month + 1, 1)?
    };
    Some((first, next.pred_opt()?))
}

/// Number of days between `start` and `end` (zero for the same day).
pub fn span_days(start: NaiveDate, end: NaiveDate) -> i64 {
    (end - start).num_days()
}

/// `(year, month)` of a date, as stored in the deprecated schedule fields.
pub fn year_month(date: NaiveDate) -> (i32, u32) {
    (date.year(), date.month())
}
