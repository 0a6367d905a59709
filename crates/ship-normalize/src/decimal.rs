//! Numeric normalization for weights, quantities and amounts.

use crate::options::{DecimalSeparator, UnitSuffix};

const CURRENCY_PREFIXES: &[&str] = &["USD", "EUR", "GBP", "$", "€", "£"];

/// Characters accepted as thousands separators regardless of locale.
fn is_extra_group_char(ch: char) -> bool {
    ch.is_whitespace() || matches!(ch, '\'' | '\u{a0}' | '\u{202f}')
}

/// Parse a textual decimal. Unit suffixes are matched longest first and their
/// factor is applied to the parsed value.
pub fn parse_decimal_text(
    value: &str,
    separator: DecimalSeparator,
    units: &[UnitSuffix],
) -> Option<f64> {
    let (text, factor) = strip_unit(value.trim(), units);
    let (negative, text) = strip_sign(text.trim());
    let text = strip_currency(text).trim();
    let (negative, text) = if negative {
        (true, text)
    } else {
        strip_sign(text)
    };

    let group = separator.group_char();
    let normalized: String = text
        .chars()
        .map(|ch| if is_extra_group_char(ch) { group } else { ch })
        .collect();
    let magnitude = parse_unsigned(&normalized, separator)?;
    let signed = if negative { -magnitude } else { magnitude };
    let value = signed * factor;
    value.is_finite().then_some(value)
}

fn strip_unit<'a>(text: &'a str, units: &[UnitSuffix]) -> (&'a str, f64) {
    let mut ordered: Vec<&UnitSuffix> = units.iter().filter(|unit| !unit.suffix.is_empty()).collect();
    ordered.sort_by(|a, b| b.suffix.len().cmp(&a.suffix.len()));
    for unit in ordered {
        let Some(split) = text.len().checked_sub(unit.suffix.len()) else {
            continue;
        };
        if !text.is_char_boundary(split) {
            continue;
        }
        let (head, tail) = text.split_at(split);
        if tail.eq_ignore_ascii_case(&unit.suffix)
            && head.trim_end().ends_with(|ch: char| ch.is_ascii_digit())
        {
            return (head.trim_end(), unit.factor);
        }
    }
    (text, 1.0)
}

fn strip_sign(text: &str) -> (bool, &str) {
    if let Some(rest) = text.strip_prefix('-') {
        (true, rest.trim_start())
    } else if let Some(rest) = text.strip_prefix('+') {
        (false, rest.trim_start())
    } else {
        (false, text)
    }
}

fn strip_currency(text: &str) -> &str {
    for prefix in CURRENCY_PREFIXES {
        if text.len() >= prefix.len()
            && text.is_char_boundary(prefix.len())
            && text[..prefix.len()].eq_ignore_ascii_case(prefix)
        {
            return &text[prefix.len()..];
        }
    }
    text
}

fn parse_unsigned(text: &str, separator: DecimalSeparator) -> Option<f64> {
    let decimal = separator.decimal_char();
    let group = separator.group_char();
    let (integer, fraction) = match text.split_once(decimal) {
        Some((integer, fraction)) => (integer, Some(fraction)),
        None => (text, None),
    };

    let mut canonical = String::with_capacity(text.len());
    if integer.is_empty() {
        fraction?;
        canonical.push('0');
    } else if integer.contains(group) {
        let mut groups = integer.split(group);
        let head = groups.next()?;
        if head.is_empty() || head.len() > 3 || !all_digits(head) {
            return None;
        }
        canonical.push_str(head);
        for part in groups {
            if part.len() != 3 || !all_digits(part) {
                return None;
            }
            canonical.push_str(part);
        }
    } else if all_digits(integer) {
        canonical.push_str(integer);
    } else {
        return None;
    }

    if let Some(fraction) = fraction {
        if fraction.is_empty() || !all_digits(fraction) {
            return None;
        }
        canonical.push('.');
        canonical.push_str(fraction);
    }
    canonical.parse::<f64>().ok()
}

fn all_digits(text: &str) -> bool {
    !text.is_empty() && text.chars().all(|ch| ch.is_ascii_digit())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn point(text: &str) -> Option<f64> {
        parse_decimal_text(text, DecimalSeparator::Point, &[])
    }

    #[test]
    fn grouping_follows_locale() {
        assert_eq!(point("1,234.5"), Some(1234.5));
        assert_eq!(
            parse_decimal_text("1.234,5", DecimalSeparator::Comma, &[]),
            Some(1234.5)
        );
        assert_eq!(point("1.234,5"), None);
        assert_eq!(point("12,34"), None);
        assert_eq!(point("1 234 567"), Some(1_234_567.0));
        assert_eq!(point("1'234.25"), Some(1234.25));
    }

    #[test]
    fn currency_and_sign() {
        assert_eq!(point("$12.50"), Some(12.5));
        assert_eq!(point("USD 130"), Some(130.0));
        assert_eq!(point("-€3"), Some(-3.0));
        assert_eq!(point("£-3"), Some(-3.0));
        assert_eq!(point(".5"), Some(0.5));
    }

    #[test]
    fn unit_suffix_longest_match_wins() {
        let units = vec![UnitSuffix::new("k", 1000.0), UnitSuffix::new("ktons", 1000.0), UnitSuffix::new("t", 1.0)];
        assert_eq!(parse_decimal_text("17ktons", DecimalSeparator::Point, &units), Some(17000.0));
        assert_eq!(parse_decimal_text("12 K", DecimalSeparator::Point, &units), Some(12000.0));
        assert_eq!(parse_decimal_text("8500 t", DecimalSeparator::Point, &units), Some(8500.0));
        assert_eq!(parse_decimal_text("ktons", DecimalSeparator::Point, &units), None);
    }

    #[test]
    fn rejects_trailing_garbage() {
        assert_eq!(point("12.5 kg"), None);
        assert_eq!(point("1.2.3"), None);
        assert_eq!(point("abc"), None);
        assert_eq!(point("5."), None);
        assert_eq!(point(""), None);
    }
}
