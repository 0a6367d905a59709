//! Diagnostics and the run-wide diagnostic ledger.

use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Warning,
    Error,
}

impl Severity {
    pub fn as_str(self) -> &'static str {
        match self {
            Severity::Warning => "warning",
            Severity::Error => "error",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Stable machine-readable diagnostic codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DiagnosticCode {
    UnmappedColumn,
    AmbiguousDate,
    InvalidDate,
    DateOutOfRange,
    InvalidDecimal,
    UnknownEnumValue,
    IdentifierPatternMismatch,
    InvalidIdentifierPattern,
    InvalidDateRange,
    InvalidFreight,
    RequiredFieldMissing,
    TypeMismatch,
    RuleViolation,
    SourceRead,
}

impl DiagnosticCode {
    pub fn as_str(self) -> &'static str {
        match self {
            DiagnosticCode::UnmappedColumn => "unmapped_column",
            DiagnosticCode::AmbiguousDate => "ambiguous_date",
            DiagnosticCode::InvalidDate => "invalid_date",
            DiagnosticCode::DateOutOfRange => "date_out_of_range",
            DiagnosticCode::InvalidDecimal => "invalid_decimal",
            DiagnosticCode::UnknownEnumValue => "unknown_enum_value",
            DiagnosticCode::IdentifierPatternMismatch => "identifier_pattern_mismatch",
            DiagnosticCode::InvalidIdentifierPattern => "invalid_identifier_pattern",
            DiagnosticCode::InvalidDateRange => "invalid_date_range",
            DiagnosticCode::InvalidFreight => "invalid_freight",
            DiagnosticCode::RequiredFieldMissing => "required_field_missing",
            DiagnosticCode::TypeMismatch => "type_mismatch",
            DiagnosticCode::RuleViolation => "rule_violation",
            DiagnosticCode::SourceRead => "source_read",
        }
    }
}

impl fmt::Display for DiagnosticCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One warning or error attached to a row, a field, or the whole file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    pub severity: Severity,
    pub code: DiagnosticCode,
    /// `None` for file-level diagnostics such as dropped columns.
    pub row: Option<usize>,
    pub field: Option<String>,
    pub message: String,
    pub raw: Option<String>,
}

impl Diagnostic {
    pub fn new(severity: Severity, code: DiagnosticCode, message: impl Into<String>) -> Self {
        Self {
            severity,
            code,
            row: None,
            field: None,
            message: message.into(),
            raw: None,
        }
    }

    pub fn error(code: DiagnosticCode, message: impl Into<String>) -> Self {
        Self::new(Severity::Error, code, message)
    }

    pub fn warning(code: DiagnosticCode, message: impl Into<String>) -> Self {
        Self::new(Severity::Warning, code, message)
    }

    #[must_use]
    pub fn at_row(mut self, row: usize) -> Self {
        self.row = Some(row);
        self
    }

    #[must_use]
    pub fn for_field(mut self, field: impl Into<String>) -> Self {
        self.field = Some(field.into());
        self
    }

    /// Attach the offending raw value; blank text is dropped.
    #[must_use]
    pub fn with_raw(mut self, raw: impl Into<String>) -> Self {
        let raw = raw.into();
        self.raw = (!raw.is_empty()).then_some(raw);
        self
    }

    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.row {
            Some(row) => write!(f, "row {row}")?,
            None => f.write_str("file")?,
        }
        if let Some(field) = &self.field {
            write!(f, " [{field}]")?;
        }
        write!(f, " {} {}: {}", self.severity, self.code, self.message)
    }
}

/// Append-only, ordered log of every diagnostic produced by a run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DiagnosticLedger {
    entries: Vec<Diagnostic>,
}

impl DiagnosticLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, diagnostic: Diagnostic) {
        self.entries.push(diagnostic);
    }

    pub fn extend(&mut self, diagnostics: impl IntoIterator<Item = Diagnostic>) {
        self.entries.extend(diagnostics);
    }

    pub fn entries(&self) -> &[Diagnostic] {
        &self.entries
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Diagnostic> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn error_count(&self) -> usize {
        self.count(Severity::Error)
    }

    pub fn warning_count(&self) -> usize {
        self.count(Severity::Warning)
    }

    pub fn has_errors(&self) -> bool {
        self.error_count() > 0
    }

    pub fn count_code(&self, code: DiagnosticCode) -> usize {
        self.entries.iter().filter(|entry| entry.code == code).count()
    }

    /// Row indices that carry at least one diagnostic of `severity`.
    pub fn rows_with(&self, severity: Severity) -> BTreeSet<usize> {
        self.entries
            .iter()
            .filter(|entry| entry.severity == severity)
            .filter_map(|entry| entry.row)
            .collect()
    }

    fn count(&self, severity: Severity) -> usize {
        self.entries
            .iter()
            .filter(|entry| entry.severity == severity)
            .count()
    }
}

impl<'a> IntoIterator for &'a DiagnosticLedger {
    type Item = &'a Diagnostic;
    type IntoIter = std::slice::Iter<'a, Diagnostic>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ledger_counts_by_severity() {
        let mut ledger = DiagnosticLedger::new();
        ledger.push(Diagnostic::warning(DiagnosticCode::UnmappedColumn, "dropped Notes"));
        ledger.push(
            Diagnostic::error(DiagnosticCode::InvalidDate, "bad date")
                .at_row(2)
                .for_field("shipDate")
                .with_raw("31/02/2024"),
        );
        ledger.push(Diagnostic::warning(DiagnosticCode::AmbiguousDate, "ambiguous").at_row(2));
        assert_eq!(ledger.error_count(), 1);
        assert_eq!(ledger.warning_count(), 2);
        assert_eq!(ledger.rows_with(Severity::Error), BTreeSet::from([2]));
        assert_eq!(ledger.count_code(DiagnosticCode::UnmappedColumn), 1);
    }

    #[test]
    fn display_names_row_field_and_code() {
        let diagnostic = Diagnostic::error(DiagnosticCode::InvalidDecimal, "not a number")
            .at_row(4)
            .for_field("weight");
        assert_eq!(
            diagnostic.to_string(),
            "row 4 [weight] error invalid_decimal: not a number"
        );
    }

    #[test]
    fn blank_raw_is_dropped() {
        let diagnostic = Diagnostic::error(DiagnosticCode::RequiredFieldMissing, "missing")
            .with_raw("");
        assert_eq!(diagnostic.raw, None);
    }
}
