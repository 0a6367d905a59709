//! Populated values must agree with their declared semantic type.

use ship_model::{CanonicalRecord, CanonicalSchema, Diagnostic, DiagnosticCode};

pub fn check(record: &CanonicalRecord, schema: &CanonicalSchema) -> Vec<Diagnostic> {
    let mut issues = Vec::new();
    for field in &schema.fields {
        let value = record.value(&field.name);
        if value.matches(&field.semantic_type) {
            continue;
        }
        issues.push(
            Diagnostic::error(
                DiagnosticCode::TypeMismatch,
                format!(
                    "value does not match declared type {}",
                    field.semantic_type
                ),
            )
            .at_row(record.row_index)
            .for_field(&field.name)
            .with_raw(value.render()),
        );
    }
    issues
}
