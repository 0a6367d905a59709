//! Flat table views of records and diagnostics.

use serde::Serialize;
use serde::ser::{SerializeMap, Serializer};
use ship_model::{CanonicalRecord, CanonicalSchema, Diagnostic, FieldValue};

pub const ROW_INDEX: &str = "row_index";

pub const DIAGNOSTIC_COLUMNS: [&str; 6] =
    ["row_index", "severity", "code", "field", "message", "raw_value"];

/// `row_index` followed by the schema's field names in declaration order.
pub fn record_columns(schema: &CanonicalSchema) -> Vec<String> {
    std::iter::once(ROW_INDEX.to_string())
        .chain(schema.field_names().map(str::to_string))
        .collect()
}

/// One CSV line per record: the row index, then each field rendered as text.
pub fn record_cells(record: &CanonicalRecord, schema: &CanonicalSchema) -> Vec<String> {
    std::iter::once(record.row_index.to_string())
        .chain(
            schema
                .fields
                .iter()
                .map(|field| record.value(&field.name).render()),
        )
        .collect()
}

pub fn diagnostic_cells(diagnostic: &Diagnostic) -> [String; 6] {
    [
        diagnostic.row.map(|row| row.to_string()).unwrap_or_default(),
        diagnostic.severity.to_string(),
        diagnostic.code.to_string(),
        diagnostic.field.clone().unwrap_or_default(),
        diagnostic.message.clone(),
        diagnostic.raw.clone().unwrap_or_default(),
    ]
}

/// JSON object for a record with keys in schema order.
pub(crate) struct RecordObject<'a> {
    pub record: &'a CanonicalRecord,
    pub schema: &'a CanonicalSchema,
}

impl Serialize for RecordObject<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.schema.fields.len() + 1))?;
        map.serialize_entry(ROW_INDEX, &self.record.row_index)?;
        for field in &self.schema.fields {
            match self.record.value(&field.name) {
                FieldValue::Decimal(value) => map.serialize_entry(&field.name, value)?,
                FieldValue::Missing => map.serialize_entry(&field.name, &None::<String>)?,
                other => map.serialize_entry(&field.name, &other.render())?,
            }
        }
        map.end()
    }
}

#[derive(Serialize)]
pub(crate) struct DiagnosticObject<'a> {
    row_index: Option<usize>,
    severity: &'static str,
    code: &'static str,
    field: Option<&'a str>,
    message: &'a str,
    raw_value: Option<&'a str>,
}

impl<'a> From<&'a Diagnostic> for DiagnosticObject<'a> {
    fn from(diagnostic: &'a Diagnostic) -> Self {
        Self {
            row_index: diagnostic.row,
            severity: diagnostic.severity.as_str(),
            code: diagnostic.code.as_str(),
            field: diagnostic.field.as_deref(),
            message: &diagnostic.message,
            raw_value: diagnostic.raw.as_deref(),
        }
    }
}
