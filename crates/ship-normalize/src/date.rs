//! Date parsing across the layouts found in shipment exports.
//!
//! Order of attempts: ISO 8601 (optionally with a time or offset), named-month
//! layouts (`15 Jan 2024`, `Jan 15, 2024`, `15-Jan-2024`), then numeric
//! day/month layouts under both orderings.

use chrono::{DateTime, Days, NaiveDate, NaiveDateTime, NaiveTime};

use crate::options::DateOrder;

/// Spreadsheet serial day zero (the 1900 leap-year bug is absorbed by the offset).
const SERIAL_EPOCH: (i32, u32, u32) = (1899, 12, 30);
/// Serial for 9999-12-31.
const MAX_SERIAL: f64 = 2_958_465.0;

const ISO_DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d"];

const ISO_DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
];

// `%b` also accepts full month names when parsing.
const NAMED_MONTH_FORMATS: &[&str] = &[
    "%d %b %Y",
    "%d-%b-%Y",
    "%d %b, %Y",
    "%b %d, %Y",
    "%b %d %Y",
];

/// A parsed date and, for ambiguous numeric input, the reading that lost.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateReading {
    pub date: NaiveDate,
    pub alternative: Option<NaiveDate>,
}

impl DateReading {
    fn exact(date: NaiveDate) -> Self {
        Self {
            date,
            alternative: None,
        }
    }

    pub fn is_ambiguous(&self) -> bool {
        self.alternative.is_some()
    }
}

/// Parse a textual date. Returns `None` when no supported layout matches.
pub fn parse_date_text(value: &str, order: DateOrder) -> Option<DateReading> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }
    if looks_iso(trimmed)
        && let Some(date) = parse_iso(trimmed)
    {
        return Some(DateReading::exact(date));
    }
    if let Some(date) = parse_named_month(trimmed) {
        return Some(DateReading::exact(date));
    }
    parse_numeric(strip_time(trimmed), order)
}

/// Convert a spreadsheet serial day number to a date.
pub fn excel_serial_to_date(serial: f64) -> Option<NaiveDate> {
    if !serial.is_finite() || !(1.0..=MAX_SERIAL).contains(&serial) {
        return None;
    }
    let (year, month, day) = SERIAL_EPOCH;
    let epoch = NaiveDate::from_ymd_opt(year, month, day)?;
    epoch.checked_add_days(Days::new(serial.trunc() as u64))
}

fn looks_iso(value: &str) -> bool {
    let bytes = value.as_bytes();
    bytes.len() >= 10
        && bytes[..4].iter().all(u8::is_ascii_digit)
        && matches!(bytes[4], b'-' | b'/')
}

fn parse_iso(value: &str) -> Option<NaiveDate> {
    ISO_DATE_FORMATS
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(value, format).ok())
        .or_else(|| {
            ISO_DATETIME_FORMATS
                .iter()
                .find_map(|format| NaiveDateTime::parse_from_str(value, format).ok())
                .map(|datetime| datetime.date())
        })
        .or_else(|| {
            DateTime::parse_from_rfc3339(value)
                .ok()
                .map(|datetime| datetime.date_naive())
        })
}

fn parse_named_month(value: &str) -> Option<NaiveDate> {
    if !value.chars().any(char::is_alphabetic) {
        return None;
    }
    NAMED_MONTH_FORMATS
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(value, format).ok())
}

/// Drop a trailing `HH:MM[:SS]` so `03/04/2024 10:30` reads as a date.
fn strip_time(value: &str) -> &str {
    match value.split_once(char::is_whitespace) {
        Some((date, rest))
            if NaiveTime::parse_from_str(rest.trim(), "%H:%M:%S").is_ok()
                || NaiveTime::parse_from_str(rest.trim(), "%H:%M").is_ok() =>
        {
            date
        }
        _ => value,
    }
}

fn parse_numeric(value: &str, order: DateOrder) -> Option<DateReading> {
    let separator = value.chars().find(|ch| matches!(ch, '/' | '-' | '.'))?;
    let parts: Vec<&str> = value.split(separator).collect();
    let [first, second, year] = parts.as_slice() else {
        return None;
    };
    let all_digits = |part: &str| !part.is_empty() && part.chars().all(|ch| ch.is_ascii_digit());
    if !all_digits(first) || !all_digits(second) || !all_digits(year) {
        return None;
    }
    if first.len() > 2 || second.len() > 2 || year.len() != 4 {
        return None;
    }
    let first: u32 = first.parse().ok()?;
    let second: u32 = second.parse().ok()?;
    let year: i32 = year.parse().ok()?;

    let day_first = NaiveDate::from_ymd_opt(year, second, first);
    let month_first = NaiveDate::from_ymd_opt(year, first, second);
    match (day_first, month_first) {
        (Some(day_first), Some(month_first)) if day_first != month_first => {
            let (date, alternative) = match order {
                DateOrder::DayFirst => (day_first, month_first),
                DateOrder::MonthFirst => (month_first, day_first),
            };
            Some(DateReading {
                date,
                alternative: Some(alternative),
            })
        }
        (Some(date), _) | (None, Some(date)) => Some(DateReading::exact(date)),
        (None, None) => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
    }

    #[test]
    fn iso_with_time_and_offset() {
        for text in [
            "2024-01-15",
            "2024-01-15T08:30:00",
            "2024-01-15 08:30",
            "2024-01-15T08:30:00+02:00",
            "2024/01/15",
        ] {
            let reading = parse_date_text(text, DateOrder::DayFirst).expect(text);
            assert_eq!(reading, DateReading::exact(ymd(2024, 1, 15)), "{text}");
        }
    }

    #[test]
    fn named_months_in_either_position() {
        for text in ["15 Jan 2024", "15-Jan-2024", "Jan 15, 2024", "15 January 2024"] {
            let reading = parse_date_text(text, DateOrder::MonthFirst).expect(text);
            assert_eq!(reading.date, ymd(2024, 1, 15), "{text}");
            assert!(!reading.is_ambiguous());
        }
    }

    #[test]
    fn ambiguous_numeric_dates_follow_order() {
        let day_first = parse_date_text("03/04/2024", DateOrder::DayFirst).expect("parse");
        assert_eq!(day_first.date, ymd(2024, 4, 3));
        assert_eq!(day_first.alternative, Some(ymd(2024, 3, 4)));

        let month_first = parse_date_text("03.04.2024", DateOrder::MonthFirst).expect("parse");
        assert_eq!(month_first.date, ymd(2024, 3, 4));
    }

    #[test]
    fn only_valid_reading_is_not_ambiguous() {
        let reading = parse_date_text("25/12/2024", DateOrder::MonthFirst).expect("parse");
        assert_eq!(reading, DateReading::exact(ymd(2024, 12, 25)));
        let same = parse_date_text("05-05-2024 10:15", DateOrder::DayFirst).expect("parse");
        assert!(!same.is_ambiguous());
    }

    #[test]
    fn rejects_garbage_and_impossible_dates() {
        assert_eq!(parse_date_text("soon", DateOrder::DayFirst), None);
        assert_eq!(parse_date_text("31/02/2024", DateOrder::DayFirst), None);
        assert_eq!(parse_date_text("2024-13-01", DateOrder::DayFirst), None);
        assert_eq!(parse_date_text("1/2/24", DateOrder::DayFirst), None);
    }

    #[test]
    fn serial_dates() {
        assert_eq!(excel_serial_to_date(45292.0), Some(ymd(2024, 1, 1)));
        assert_eq!(excel_serial_to_date(45292.75), Some(ymd(2024, 1, 1)));
        assert_eq!(excel_serial_to_date(0.0), None);
        assert_eq!(excel_serial_to_date(f64::NAN), None);
    }
}
