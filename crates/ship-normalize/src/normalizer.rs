//! The field normalizer: raw cell + semantic type -> typed value and at most one issue.

use std::collections::HashMap;

use chrono::{Datelike, NaiveDate, Utc};
use regex::Regex;
use ship_model::{
    CanonicalSchema, CellValue, Diagnostic, DiagnosticCode, FieldDef, FieldValue, SemanticType,
};
use tracing::{debug, trace};

use crate::date::{excel_serial_to_date, parse_date_text};
use crate::decimal::parse_decimal_text;
use crate::enumeration::resolve_enum;
use crate::error::{NormalizeError, Result};
use crate::laycan::{Laycan, parse_laycan};
use crate::options::NormalizeOptions;
use crate::text::{canonical_identifier, collapse_whitespace};

/// Outcome of normalizing one value.
#[derive(Debug, Clone, PartialEq)]
pub struct Normalized {
    pub value: FieldValue,
    pub issue: Option<Diagnostic>,
}

impl Normalized {
    fn ok(value: FieldValue) -> Self {
        Self { value, issue: None }
    }

    fn with_issue(value: FieldValue, issue: Diagnostic) -> Self {
        Self {
            value,
            issue: Some(issue),
        }
    }

    fn fail(issue: Diagnostic) -> Self {
        Self {
            value: FieldValue::Missing,
            issue: Some(issue),
        }
    }

    /// A populated value without an error. Warnings still count as clean.
    pub fn is_clean(&self) -> bool {
        !self.value.is_missing() && !self.issue.as_ref().is_some_and(Diagnostic::is_error)
    }

    pub fn is_error(&self) -> bool {
        self.issue.as_ref().is_some_and(Diagnostic::is_error)
    }
}

/// Converts raw cells into canonical values. Pure apart from the laycan year,
/// which is fixed when the normalizer is built.
#[derive(Debug, Clone)]
pub struct FieldNormalizer {
    options: NormalizeOptions,
    patterns: HashMap<String, Regex>,
    year: i32,
}

impl Default for FieldNormalizer {
    fn default() -> Self {
        Self::new(NormalizeOptions::default())
    }
}

impl FieldNormalizer {
    pub fn new(options: NormalizeOptions) -> Self {
        let year = options.default_year.unwrap_or_else(|| Utc::now().year());
        Self {
            options,
            patterns: HashMap::new(),
            year,
        }
    }

    /// Build a normalizer with every identifier pattern of `schema` precompiled.
    pub fn for_schema(schema: &CanonicalSchema, options: NormalizeOptions) -> Result<Self> {
        let mut normalizer = Self::new(options);
        for field in &schema.fields {
            if let SemanticType::Identifier {
                pattern: Some(pattern),
            } = &field.semantic_type
            {
                let regex = Regex::new(pattern).map_err(|source| NormalizeError::InvalidPattern {
                    field: field.name.clone(),
                    pattern: pattern.clone(),
                    source,
                })?;
                normalizer.patterns.insert(pattern.clone(), regex);
            }
        }
        Ok(normalizer)
    }

    pub fn options(&self) -> &NormalizeOptions {
        &self.options
    }

    /// Year applied to laycan windows that omit it.
    pub fn reference_year(&self) -> i32 {
        self.year
    }

    /// Normalize a raw cell for a named field, applying required/optional blank handling.
    pub fn normalize_field(&self, raw: &CellValue, field: &FieldDef) -> Normalized {
        if raw.is_blank() {
            if field.required {
                return Normalized::fail(
                    Diagnostic::error(
                        DiagnosticCode::RequiredFieldMissing,
                        format!("required field '{}' is blank", field.name),
                    )
                    .for_field(&field.name),
                );
            }
            return Normalized::ok(FieldValue::Missing);
        }
        let mut normalized = self.normalize(raw, &field.semantic_type);
        if let Some(issue) = normalized.issue.take() {
            // Raw cell text stays out of the log; callers decide whether to show it.
            if issue.is_error() {
                debug!(field = %field.name, code = issue.code.as_str(), "value rejected");
            } else {
                trace!(field = %field.name, code = issue.code.as_str(), "value kept with warning");
            }
            normalized.issue = Some(issue.for_field(&field.name));
        }
        normalized
    }

    /// Normalize a raw cell as `semantic_type`. Blank input is missing without an issue.
    pub fn normalize(&self, raw: &CellValue, semantic_type: &SemanticType) -> Normalized {
        if raw.is_blank() {
            return Normalized::ok(FieldValue::Missing);
        }
        match semantic_type {
            SemanticType::Date => self.normalize_date(raw),
            SemanticType::Decimal => self.normalize_decimal(raw),
            SemanticType::String => Normalized::ok(FieldValue::Text(match raw {
                CellValue::Text(text) => collapse_whitespace(text),
                other => other.display_text(),
            })),
            SemanticType::Enum { allowed, synonyms } => {
                let text = raw.display_text();
                match resolve_enum(
                    &text,
                    allowed,
                    synonyms,
                    self.options.enum_matching,
                    self.options.max_suggestion_distance,
                ) {
                    Ok(value) => Normalized::ok(FieldValue::Enum(value)),
                    Err(suggestions) => {
                        trace!(kind = "enum", suggestions = suggestions.len(), "value rejected");
                        let message = if suggestions.is_empty() {
                            format!("'{}' is not an allowed value", text.trim())
                        } else {
                            format!(
                                "'{}' is not an allowed value; did you mean {}?",
                                text.trim(),
                                suggestions.join(", ")
                            )
                        };
                        Normalized::fail(
                            Diagnostic::error(DiagnosticCode::UnknownEnumValue, message)
                                .with_raw(text),
                        )
                    }
                }
            }
            SemanticType::Identifier { pattern } => self.normalize_identifier(raw, pattern.as_deref()),
            SemanticType::DateRange => self.normalize_date_range(raw),
        }
    }

    fn check_year(&self, date: NaiveDate, raw: &CellValue) -> std::result::Result<NaiveDate, Diagnostic> {
        let year = date.year();
        if year < self.options.min_year || year > self.options.max_year {
            return Err(Diagnostic::error(
                DiagnosticCode::DateOutOfRange,
                format!(
                    "date {date} is outside {}-{}",
                    self.options.min_year, self.options.max_year
                ),
            )
            .with_raw(raw.display_text()));
        }
        Ok(date)
    }

    fn normalize_date(&self, raw: &CellValue) -> Normalized {
        let invalid = || {
            Normalized::fail(
                Diagnostic::error(
                    DiagnosticCode::InvalidDate,
                    format!("'{}' is not a recognised date", raw.display_text()),
                )
                .with_raw(raw.display_text()),
            )
        };
        let reading = match raw {
            CellValue::Date(date) => Some((*date, None)),
            CellValue::Number(serial) => excel_serial_to_date(*serial).map(|date| (date, None)),
            CellValue::Text(text) => parse_date_text(text, self.options.date_order)
                .map(|reading| (reading.date, reading.alternative)),
            CellValue::Empty => return Normalized::ok(FieldValue::Missing),
        };
        let Some((date, alternative)) = reading else {
            trace!(kind = "date", "value rejected");
            return invalid();
        };
        let date = match self.check_year(date, raw) {
            Ok(date) => date,
            Err(issue) => return Normalized::fail(issue),
        };
        match alternative {
            Some(other) => Normalized::with_issue(
                FieldValue::Date(date),
                Diagnostic::warning(
                    DiagnosticCode::AmbiguousDate,
                    format!(
                        "'{}' is ambiguous; read as {date} ({}), could be {other}",
                        raw.display_text().trim(),
                        self.options.date_order.as_str()
                    ),
                )
                .with_raw(raw.display_text()),
            ),
            None => Normalized::ok(FieldValue::Date(date)),
        }
    }

    fn normalize_decimal(&self, raw: &CellValue) -> Normalized {
        let parsed = match raw {
            CellValue::Number(value) => value.is_finite().then_some(*value),
            CellValue::Text(text) => parse_decimal_text(
                text,
                self.options.decimal_separator,
                &self.options.units,
            ),
            CellValue::Date(_) => None,
            CellValue::Empty => return Normalized::ok(FieldValue::Missing),
        };
        match parsed {
            Some(value) => Normalized::ok(FieldValue::Decimal(value)),
            None => {
                trace!(kind = "decimal", "value rejected");
                Normalized::fail(
                    Diagnostic::error(
                        DiagnosticCode::InvalidDecimal,
                        format!("'{}' is not a valid decimal", raw.display_text().trim()),
                    )
                    .with_raw(raw.display_text()),
                )
            }
        }
    }

    fn normalize_identifier(&self, raw: &CellValue, pattern: Option<&str>) -> Normalized {
        let identifier = canonical_identifier(raw);
        let value = FieldValue::Identifier(identifier.clone());
        let Some(pattern) = pattern else {
            return Normalized::ok(value);
        };
        let compiled;
        let regex = match self.patterns.get(pattern) {
            Some(regex) => regex,
            None => match Regex::new(pattern) {
                Ok(regex) => {
                    compiled = regex;
                    &compiled
                }
                Err(err) => {
                    return Normalized::with_issue(
                        value,
                        Diagnostic::error(
                            DiagnosticCode::InvalidIdentifierPattern,
                            format!("identifier pattern '{pattern}' does not compile: {err}"),
                        )
                        .with_raw(raw.display_text()),
                    );
                }
            },
        };
        if regex.is_match(&identifier) {
            Normalized::ok(value)
        } else {
            Normalized::with_issue(
                value,
                Diagnostic::warning(
                    DiagnosticCode::IdentifierPatternMismatch,
                    format!("'{identifier}' does not match pattern '{pattern}'"),
                )
                .with_raw(raw.display_text()),
            )
        }
    }

    fn normalize_date_range(&self, raw: &CellValue) -> Normalized {
        let window = match raw {
            CellValue::Text(text) => parse_laycan(text, self.year, self.options.date_order),
            CellValue::Date(date) => Some(Laycan::single(*date)),
            CellValue::Number(serial) => excel_serial_to_date(*serial).map(Laycan::single),
            CellValue::Empty => return Normalized::ok(FieldValue::Missing),
        };
        let Some(Laycan {
            start,
            end,
            alternative,
        }) = window
        else {
            trace!(kind = "date_range", "value rejected");
            return Normalized::fail(
                Diagnostic::error(
                    DiagnosticCode::InvalidDateRange,
                    format!("'{}' is not a recognised date window", raw.display_text().trim()),
                )
                .with_raw(raw.display_text()),
            );
        };
        if let Err(issue) = self.check_year(start, raw).and_then(|_| self.check_year(end, raw)) {
            return Normalized::fail(issue);
        }
        let value = FieldValue::DateRange { start, end };
        match alternative {
            Some((other_start, other_end)) => Normalized::with_issue(
                value,
                Diagnostic::warning(
                    DiagnosticCode::AmbiguousDate,
                    format!(
                        "'{}' is ambiguous; read as {start} to {end} ({}), could be {other_start} to {other_end}",
                        raw.display_text().trim(),
                        self.options.date_order.as_str()
                    ),
                )
                .with_raw(raw.display_text()),
            ),
            None => Normalized::ok(value),
        }
    }
}
