//! Laycan (loading window) parsing for tanker fixture lines.
//!
//! Accepted shapes, case-insensitive, with an optional trailing four-digit year:
//!
//! | Input                 | Window                          |
//! |-----------------------|---------------------------------|
//! | `06-10 June`          | 6 to 10 June                    |
//! | `25 Jun - 5 Jul`      | 25 June to 5 July               |
//! | `end June - ely July` | 24 June to 10 July              |
//! | `1H July`             | 1 to 15 July                    |
//! | `2H June`             | 16 June to month end            |
//! | `ely Jun` / `early Jun` | 1 to 10 June                  |
//! | `mid Jul`             | 11 to 20 July                   |
//! | `end June`            | 24 June to month end            |
//! | `June dates`          | whole month                     |
//! | `2024-06-06/2024-06-10` | two full dates                |
//!
//! When the end month precedes the start month the end rolls into the next year.

use chrono::{Datelike, NaiveDate};

use crate::date::parse_date_text;
use crate::options::DateOrder;

const MONTHS: [&str; 12] = [
    "january",
    "february",
    "march",
    "april",
    "may",
    "june",
    "july",
    "august",
    "september",
    "october",
    "november",
    "december",
];

/// An inclusive laycan window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Laycan {
    pub start: NaiveDate,
    pub end: NaiveDate,
    /// The window under the other day/month order, when either numeric date
    /// could be read both ways.
    pub alternative: Option<(NaiveDate, NaiveDate)>,
}

impl Laycan {
    /// A one-day window.
    pub fn single(date: NaiveDate) -> Self {
        Self::new(date, date)
    }

    fn new(start: NaiveDate, end: NaiveDate) -> Self {
        Self {
            start,
            end,
            alternative: None,
        }
    }

    pub fn is_ambiguous(&self) -> bool {
        self.alternative.is_some()
    }
}

/// Resolve a laycan string to an inclusive window.
pub fn parse_laycan(value: &str, year: i32, order: DateOrder) -> Option<Laycan> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }
    if let Some(window) = parse_full_dates(trimmed, order) {
        return Some(window);
    }
    named_window(trimmed, year).map(|(start, end)| Laycan::new(start, end))
}

fn named_window(trimmed: &str, year: i32) -> Option<(NaiveDate, NaiveDate)> {

    let spaced = trimmed
        .to_lowercase()
        .replace(['–', '—'], "-")
        .replace('-', " - ");
    let mut tokens: Vec<String> = spaced.split_whitespace().map(str::to_string).collect();
    merge_half_marker(&mut tokens);

    let year = match tokens.last() {
        Some(last) if last.len() == 4 && last.chars().all(|ch| ch.is_ascii_digit()) => {
            let explicit = last.parse().ok()?;
            tokens.pop();
            explicit
        }
        _ => year,
    };
    let tokens: Vec<&str> = tokens.iter().map(String::as_str).collect();

    match tokens.as_slice() {
        [d1, "-", d2, m] => {
            let month = month_number(m)?;
            let start = ymd(year, month, day(d1)?)?;
            let end = ymd(year, month, day(d2)?)?;
            (start <= end).then_some((start, end))
        }
        ["end", m1, "-", "ely" | "early", m2] => {
            let (m1, m2) = (month_number(m1)?, month_number(m2)?);
            cross_month(ymd(year, m1, 24)?, year, m2, 10)
        }
        [d1, m1, "-", d2, m2] => {
            let (m1, m2) = (month_number(m1)?, month_number(m2)?);
            cross_month(ymd(year, m1, day(d1)?)?, year, m2, day(d2)?)
        }
        ["1h", m] => {
            let month = month_number(m)?;
            Some((ymd(year, month, 1)?, ymd(year, month, 15)?))
        }
        ["2h", m] => {
            let month = month_number(m)?;
            Some((ymd(year, month, 16)?, month_end(year, month)?))
        }
        ["ely" | "early", m] => {
            let month = month_number(m)?;
            Some((ymd(year, month, 1)?, ymd(year, month, 10)?))
        }
        ["mid", m] => {
            let month = month_number(m)?;
            Some((ymd(year, month, 11)?, ymd(year, month, 20)?))
        }
        ["end", m] => {
            let month = month_number(m)?;
            Some((ymd(year, month, 24)?, month_end(year, month)?))
        }
        [m, "dates"] => {
            let month = month_number(m)?;
            Some((ymd(year, month, 1)?, month_end(year, month)?))
        }
        _ => None,
    }
}

fn parse_full_dates(value: &str, order: DateOrder) -> Option<Laycan> {
    let (left, right) = value
        .split_once(" - ")
        .or_else(|| value.split_once(" to "))
        .or_else(|| value.split_once('/'))?;
    let start = parse_date_text(left, order)?;
    let end = parse_date_text(right, order)?;
    if start.date > end.date {
        return None;
    }
    let alternative = (start.is_ambiguous() || end.is_ambiguous()).then(|| {
        (
            start.alternative.unwrap_or(start.date),
            end.alternative.unwrap_or(end.date),
        )
    });
    Some(Laycan {
        start: start.date,
        end: end.date,
        alternative,
    })
}

/// `1 H July` is written with a space often enough to fold it back together.
fn merge_half_marker(tokens: &mut Vec<String>) {
    if tokens.len() >= 2 && matches!(tokens[0].as_str(), "1" | "2") && tokens[1] == "h" {
        let marker = format!("{}h", tokens[0]);
        tokens.splice(0..2, [marker]);
    }
}

fn cross_month(start: NaiveDate, year: i32, end_month: u32, end_day: u32) -> Option<(NaiveDate, NaiveDate)> {
    let end_year = if end_month < start.month() { year + 1 } else { year };
    let end = ymd(end_year, end_month, end_day)?;
    (start <= end).then_some((start, end))
}

fn month_number(token: &str) -> Option<u32> {
    if token.len() < 3 || !token.chars().all(|ch| ch.is_ascii_alphabetic()) {
        return None;
    }
    MONTHS
        .iter()
        .position(|month| month.starts_with(token) || (*month == "september" && token == "sept"))
        .and_then(|idx| u32::try_from(idx + 1).ok())
}

fn day(token: &str) -> Option<u32> {
    if token.is_empty() || token.len() > 2 || !token.chars().all(|ch| ch.is_ascii_digit()) {
        return None;
    }
    token.parse().ok()
}

fn ymd(year: i32, month: u32, day: u32) -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(year, month, day)
}

fn month_end(year: i32, month: u32) -> Option<NaiveDate> {
    let (next_year, next_month) = if month == 12 { (year + 1, 1) } else { (year, month + 1) };
    ymd(next_year, next_month, 1)?.pred_opt()
}
