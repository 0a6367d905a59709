//! Freight quotes as written in tanker fixture reports.
//!
//! | Quote                 | Reading                     |
//! |-----------------------|-----------------------------|
//! | `USD 12.5 pmt`        | 12.5 per tonne              |
//! | `USD 2.15M Lumpsum`   | 2,150,000 lump sum          |
//! | `USD 850K`            | 850,000 lump sum            |
//! | `USD 650,000 lumpsum` | 650,000 lump sum            |
//! | `mid 40ies`           | about 40 per tonne          |
//! | `lo 90ies`            | about 90,000 lump sum       |
//! | `RNR`                 | rate not reported           |
//!
//! Currency prefixes are ignored; amounts are taken as dollars.

/// Estimates at or below this base read as a per-tonne rate.
const ESTIMATE_RATE_CEILING: f64 = 200.0;
/// A `lo` estimate above this base reads as thousands.
const LOW_ESTIMATE_THOUSANDS: f64 = 50.0;

/// A parsed freight quote.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FreightQuote {
    PerTonne(f64),
    LumpSum(f64),
    /// `RNR`: rate not reported.
    NotReported,
}

impl FreightQuote {
    /// Total freight for a cargo of `quantity` tonnes. A per-tonne rate
    /// needs a quantity; an unreported rate has no total.
    pub fn total(&self, quantity: Option<f64>) -> Option<f64> {
        match *self {
            FreightQuote::PerTonne(rate) => quantity.map(|tonnes| rate * tonnes),
            FreightQuote::LumpSum(amount) => Some(amount),
            FreightQuote::NotReported => None,
        }
    }
}

/// Read a freight quote. `None` when no recognised shape matches.
pub fn parse_freight(value: &str) -> Option<FreightQuote> {
    let text = value.trim().to_lowercase().replace(',', "");
    if matches!(text.as_str(), "rnr" | "n/a" | "na") {
        return Some(FreightQuote::NotReported);
    }
    let start = text.find(|ch: char| ch.is_ascii_digit())?;
    let number_len = text[start..]
        .find(|ch: char| !(ch.is_ascii_digit() || ch == '.'))
        .unwrap_or(text.len() - start);
    let amount: f64 = text[start..start + number_len].trim_end_matches('.').parse().ok()?;
    let before = &text[..start];
    let after = &text[start + number_len..];
    let unit: String = after
        .trim_start()
        .chars()
        .take_while(char::is_ascii_alphabetic)
        .collect();

    if text.contains("pmt") || text.contains("/mt") {
        return Some(FreightQuote::PerTonne(amount));
    }
    if after.starts_with("ies") {
        return Some(estimate(before, amount));
    }
    match unit.as_str() {
        "m" | "mn" | "mil" | "million" => Some(FreightQuote::LumpSum(amount * 1_000_000.0)),
        "k" => Some(FreightQuote::LumpSum(amount * 1_000.0)),
        _ if text.contains("lumpsum") || text.contains("lump sum") || unit == "ls" => {
            Some(FreightQuote::LumpSum(amount))
        }
        _ => None,
    }
}

/// `hi 40ies`, `mid 60ies`, `lo 90ies`. Typos such as `hih` and `miod` turn
/// up in circulated reports and read the same.
fn estimate(before: &str, base: f64) -> FreightQuote {
    let low = before
        .split_whitespace()
        .last()
        .is_some_and(|word| word == "lo" || word == "low");
    if low && base > LOW_ESTIMATE_THOUSANDS {
        FreightQuote::LumpSum(base * 1_000.0)
    } else if base < ESTIMATE_RATE_CEILING {
        FreightQuote::PerTonne(base)
    } else {
        FreightQuote::LumpSum(base * 1_000.0)
    }
}
