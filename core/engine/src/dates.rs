//! FILENAME: core/engine/src/dates.rs
//! PURPOSE: Lenient parsing of order-date text into calendar dates.
//! CONTEXT: Sales extracts come from different tools; ISO dates, US-style
//! month/day/year and full timestamps all appear in the wild. Time-of-day
//! and UTC offsets are discarded: the calendar date as written is kept.

use chrono::{DateTime, NaiveDate, NaiveDateTime};

/// Date-only layouts tried in order.
const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d", "%m/%d/%Y", "%m-%d-%Y"];

/// Date-time layouts (no offset) tried in order.
const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
    "%m/%d/%Y %H:%M:%S",
    "%m/%d/%Y %H:%M",
];

/// Parses a date value. Returns None when no supported layout matches.
///
/// Supported: `2023-01-15`, `2023/01/15`, `1/15/2023`, `2023-01`
/// (first of month), ISO date-times and RFC 3339 timestamps.
pub fn parse_date(text: &str) -> Option<NaiveDate> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }

    for fmt in DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(text, fmt) {
            return Some(date);
        }
    }

    for fmt in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(text, fmt) {
            return Some(dt.date());
        }
    }

    // Offset is dropped; the local date as written wins.
    if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
        return Some(dt.naive_local().date());
    }

    parse_year_month(text)
}

/// `YYYY-MM` (or `YYYY/MM`) resolves to the first day of that month.
fn parse_year_month(text: &str) -> Option<NaiveDate> {
    let (year, month) = text.split_once(['-', '/'])?;
    if year.len() != 4 || month.is_empty() || month.len() > 2 {
        return None;
    }
    let year: i32 = year.parse().ok()?;
    let month: u32 = month.parse().ok()?;
    NaiveDate::from_ymd_opt(year, month, 1)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_iso_and_slash_dates() {
        assert_eq!(parse_date("2016-11-08"), Some(ymd(2016, 11, 8)));
        assert_eq!(parse_date("2016/11/08"), Some(ymd(2016, 11, 8)));
    }

    #[test]
    fn test_us_dates() {
        assert_eq!(parse_date("11/8/2016"), Some(ymd(2016, 11, 8)));
        assert_eq!(parse_date("6/12/2016"), Some(ymd(2016, 6, 12)));
    }

    #[test]
    fn test_year_month() {
        assert_eq!(parse_date("2023-01"), Some(ymd(2023, 1, 1)));
        assert_eq!(parse_date("2023-13"), None);
    }

    #[test]
    fn test_datetimes_keep_written_date() {
        assert_eq!(parse_date("2023-02-28T23:30:00"), Some(ymd(2023, 2, 28)));
        assert_eq!(parse_date("2023-02-28 08:15"), Some(ymd(2023, 2, 28)));
        assert_eq!(parse_date("2023-02-28T23:30:00-05:00"), Some(ymd(2023, 2, 28)));
        assert_eq!(parse_date("2023-03-01T01:00:00+09:00"), Some(ymd(2023, 3, 1)));
    }

    #[test]
    fn test_rejects_garbage() {
        assert_eq!(parse_date(""), None);
        assert_eq!(parse_date("not a date"), None);
        assert_eq!(parse_date("2023-02-30"), None);
        assert_eq!(parse_date("12345"), None);
    }
}
