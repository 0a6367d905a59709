//! Required field presence.

use ship_model::{CanonicalRecord, CanonicalSchema, Diagnostic, DiagnosticCode};

/// Report required fields that are missing and were not already reported
/// while normalizing the row.
pub fn check(record: &CanonicalRecord, schema: &CanonicalSchema) -> Vec<Diagnostic> {
    schema
        .required_fields()
        .filter(|field| record.is_missing(&field.name) && !record.is_flagged(&field.name))
        .map(|field| {
            Diagnostic::error(
                DiagnosticCode::RequiredFieldMissing,
                format!("required field '{}' is missing", field.name),
            )
            .at_row(record.row_index)
            .for_field(&field.name)
        })
        .collect()
}
