//! Fields computed from other normalized fields of the same record.
//!
//! Derivations run after every mapped field has been normalized and before
//! validation, so rules can read derived values. A derived field keeps a
//! value supplied by its own column.

use serde::{Deserialize, Serialize};
use ship_model::{
    CanonicalRecord, CanonicalSchema, Diagnostic, DiagnosticCode, FieldValue, SemanticType,
};
use tracing::trace;

use crate::error::{NormalizeError, Result};
use crate::freight::parse_freight;

/// A derived field in serializable form.
///
/// ```toml
/// [[derive]]
/// kind = "freight_total"
/// field = "freightTotal"
/// freight = "freight"
/// quantity = "quantity"
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Derivation {
    /// Total freight in dollars from a quote such as `USD 12.5 pmt` and the
    /// cargo quantity in tonnes.
    FreightTotal {
        field: String,
        freight: String,
        quantity: String,
    },
}

impl Derivation {
    pub fn freight_total(
        field: impl Into<String>,
        freight: impl Into<String>,
        quantity: impl Into<String>,
    ) -> Self {
        Derivation::FreightTotal {
            field: field.into(),
            freight: freight.into(),
            quantity: quantity.into(),
        }
    }

    /// The field this derivation fills.
    pub fn target(&self) -> &str {
        match self {
            Derivation::FreightTotal { field, .. } => field,
        }
    }

    /// Check field references and types against `schema`.
    pub fn check(&self, schema: &CanonicalSchema) -> Result<()> {
        let Derivation::FreightTotal {
            field,
            freight,
            quantity,
        } = self;
        let require = |name: &str, wanted: &SemanticType| -> Result<()> {
            let invalid = |reason: String| NormalizeError::InvalidDerivation {
                target: field.clone(),
                reason,
            };
            let def = schema
                .field(name)
                .ok_or_else(|| invalid(format!("unknown field '{name}'")))?;
            if &def.semantic_type != wanted {
                return Err(invalid(format!(
                    "field '{name}' must be {wanted}, not {}",
                    def.semantic_type
                )));
            }
            Ok(())
        };
        require(field, &SemanticType::Decimal)?;
        if schema.field(field).is_some_and(|def| def.required) {
            return Err(NormalizeError::InvalidDerivation {
                target: field.clone(),
                reason: "a derived field cannot be required".to_string(),
            });
        }
        require(freight, &SemanticType::String)?;
        require(quantity, &SemanticType::Decimal)
    }

    /// Fill the target field of `record`. Returns a warning when the source
    /// value cannot be read; a missing source leaves the target missing.
    pub fn apply(&self, record: &mut CanonicalRecord) -> Option<Diagnostic> {
        let Derivation::FreightTotal {
            field,
            freight,
            quantity,
        } = self;
        if !record.is_missing(field) {
            return None;
        }
        let FieldValue::Text(quote) = record.value(freight) else {
            return None;
        };
        let Some(parsed) = parse_freight(quote) else {
            trace!(row = record.row_index, field = %field, "freight quote not recognised");
            return Some(
                Diagnostic::warning(
                    DiagnosticCode::InvalidFreight,
                    format!("'{}' is not a recognised freight quote", quote.trim()),
                )
                .for_field(field)
                .with_raw(quote.clone()),
            );
        };
        let total = parsed.total(record.value(quantity).as_decimal());
        record.insert(
            field,
            total.map_or(FieldValue::Missing, FieldValue::Decimal),
        );
        None
    }
}
