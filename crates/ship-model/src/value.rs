//! Normalized field values and canonical records.

use std::collections::{BTreeMap, BTreeSet};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::cell::format_number;
use crate::schema::SemanticType;

/// A typed, normalized value for one canonical field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum FieldValue {
    Date(NaiveDate),
    Decimal(f64),
    Text(String),
    Enum(String),
    Identifier(String),
    DateRange { start: NaiveDate, end: NaiveDate },
    Missing,
}

impl FieldValue {
    pub fn is_missing(&self) -> bool {
        matches!(self, FieldValue::Missing)
    }

    /// Canonical text form: ISO dates, trimmed decimals, `start/end` intervals.
    pub fn render(&self) -> String {
        match self {
            FieldValue::Date(date) => iso(*date),
            FieldValue::Decimal(value) => format_number(*value),
            FieldValue::Text(text) | FieldValue::Enum(text) | FieldValue::Identifier(text) => {
                text.clone()
            }
            FieldValue::DateRange { start, end } => format!("{}/{}", iso(*start), iso(*end)),
            FieldValue::Missing => String::new(),
        }
    }

    pub fn as_date(&self) -> Option<NaiveDate> {
        match self {
            FieldValue::Date(date) => Some(*date),
            FieldValue::DateRange { start, .. } => Some(*start),
            _ => None,
        }
    }

    pub fn as_decimal(&self) -> Option<f64> {
        match self {
            FieldValue::Decimal(value) => Some(*value),
            _ => None,
        }
    }

    /// True when the value is consistent with the declared type.
    ///
    /// `Missing` matches every type; presence is checked separately. Identifier
    /// patterns are not re-checked here since a mismatch is only a warning.
    pub fn matches(&self, semantic_type: &SemanticType) -> bool {
        match (self, semantic_type) {
            (FieldValue::Missing, _) => true,
            (FieldValue::Date(_), SemanticType::Date) => true,
            (FieldValue::Decimal(value), SemanticType::Decimal) => value.is_finite(),
            (FieldValue::Text(_), SemanticType::String) => true,
            (FieldValue::Enum(value), SemanticType::Enum { allowed, .. }) => {
                allowed.iter().any(|candidate| candidate == value)
            }
            (FieldValue::Identifier(value), SemanticType::Identifier { .. }) => !value.is_empty(),
            (FieldValue::DateRange { start, end }, SemanticType::DateRange) => start <= end,
            _ => false,
        }
    }
}

fn iso(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

/// One normalized row keyed by canonical field name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CanonicalRecord {
    pub row_index: usize,
    pub fields: BTreeMap<String, FieldValue>,
    /// Fields whose normalization already produced a diagnostic.
    #[serde(skip)]
    flagged: BTreeSet<String>,
}

impl CanonicalRecord {
    pub fn new(row_index: usize) -> Self {
        Self {
            row_index,
            fields: BTreeMap::new(),
            flagged: BTreeSet::new(),
        }
    }

    pub fn insert(&mut self, field: impl Into<String>, value: FieldValue) {
        self.fields.insert(field.into(), value);
    }

    /// Value for `field`, treating absent fields as missing.
    pub fn value(&self, field: &str) -> &FieldValue {
        self.fields.get(field).unwrap_or(&FieldValue::Missing)
    }

    pub fn is_missing(&self, field: &str) -> bool {
        self.value(field).is_missing()
    }

    pub fn flag(&mut self, field: impl Into<String>) {
        self.flagged.insert(field.into());
    }

    pub fn is_flagged(&self, field: &str) -> bool {
        self.flagged.contains(field)
    }
}
