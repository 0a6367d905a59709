//! Configuration options for field normalization.

use serde::{Deserialize, Serialize};

/// Ordering applied to numeric dates such as `03/04/2024` when both readings are valid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DateOrder {
    #[default]
    DayFirst,
    MonthFirst,
}

impl DateOrder {
    pub fn as_str(self) -> &'static str {
        match self {
            DateOrder::DayFirst => "day-first",
            DateOrder::MonthFirst => "month-first",
        }
    }
}

/// Decimal separator convention for textual numbers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DecimalSeparator {
    /// `1,234.5`
    #[default]
    Point,
    /// `1.234,5`
    Comma,
}

impl DecimalSeparator {
    pub fn decimal_char(self) -> char {
        match self {
            DecimalSeparator::Point => '.',
            DecimalSeparator::Comma => ',',
        }
    }

    pub fn group_char(self) -> char {
        match self {
            DecimalSeparator::Point => ',',
            DecimalSeparator::Comma => '.',
        }
    }
}

/// Mode for enum matching.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EnumMatching {
    /// Case and whitespace insensitive.
    Strict,
    /// Also ignores punctuation (`in-transit` matches `InTransit`).
    #[default]
    Lenient,
}

/// A unit suffix stripped from decimal values, with the factor applied afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnitSuffix {
    pub suffix: String,
    #[serde(default = "default_factor")]
    pub factor: f64,
}

fn default_factor() -> f64 {
    1.0
}

impl UnitSuffix {
    pub fn new(suffix: impl Into<String>, factor: f64) -> Self {
        Self {
            suffix: suffix.into(),
            factor,
        }
    }
}

/// Options for normalization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NormalizeOptions {
    pub date_order: DateOrder,
    pub min_year: i32,
    pub max_year: i32,
    pub decimal_separator: DecimalSeparator,
    pub units: Vec<UnitSuffix>,
    pub enum_matching: EnumMatching,
    /// Year used to resolve laycan windows that name only day and month.
    /// Falls back to the current year when unset.
    pub default_year: Option<i32>,
    /// Largest edit distance for which an allowed enum value is suggested.
    pub max_suggestion_distance: usize,
}

impl Default for NormalizeOptions {
    fn default() -> Self {
        Self {
            date_order: DateOrder::DayFirst,
            min_year: 1900,
            max_year: 2100,
            decimal_separator: DecimalSeparator::Point,
            units: Vec::new(),
            enum_matching: EnumMatching::Lenient,
            default_year: None,
            max_suggestion_distance: 4,
        }
    }
}

impl NormalizeOptions {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_date_order(mut self, order: DateOrder) -> Self {
        self.date_order = order;
        self
    }

    #[must_use]
    pub fn with_decimal_separator(mut self, separator: DecimalSeparator) -> Self {
        self.decimal_separator = separator;
        self
    }

    #[must_use]
    pub fn with_unit(mut self, suffix: impl Into<String>, factor: f64) -> Self {
        self.units.push(UnitSuffix::new(suffix, factor));
        self
    }

    #[must_use]
    pub fn with_enum_matching(mut self, matching: EnumMatching) -> Self {
        self.enum_matching = matching;
        self
    }

    #[must_use]
    pub fn with_default_year(mut self, year: i32) -> Self {
        self.default_year = Some(year);
        self
    }

    #[must_use]
    pub fn with_year_range(mut self, min_year: i32, max_year: i32) -> Self {
        self.min_year = min_year;
        self.max_year = max_year;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_toml_keeps_defaults() {
        let options: NormalizeOptions = toml::from_str(
            r#"
date_order = "month-first"
units = [{ suffix = "ktons", factor = 1000.0 }, { suffix = "kg" }]
"#,
        )
        .expect("parse options");
        assert_eq!(options.date_order, DateOrder::MonthFirst);
        assert_eq!(options.min_year, 1900);
        assert_eq!(options.units[1].factor, 1.0);
        assert_eq!(options.enum_matching, EnumMatching::Lenient);
    }
}
