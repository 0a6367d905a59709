use serde::{Deserialize, Serialize};

use crate::schema::CanonicalSchema;

/// A source column assigned to a canonical field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldAssignment {
    pub field: String,
    pub column: String,
    pub column_index: usize,
    pub confidence: f32,
    /// Share of sampled values that normalized cleanly, when samples were available.
    pub sniff_ratio: Option<f32>,
}

/// Best candidate column for a field that stayed unmapped.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RejectedCandidate {
    pub field: String,
    pub column: String,
    pub confidence: f32,
}

/// One-to-one correspondence between source headers and schema fields.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ColumnMapping {
    pub assignments: Vec<FieldAssignment>,
    pub unmapped_columns: Vec<String>,
    pub unmapped_fields: Vec<String>,
    #[serde(default)]
    pub rejected: Vec<RejectedCandidate>,
}

impl ColumnMapping {
    pub fn assignment_for(&self, field: &str) -> Option<&FieldAssignment> {
        self.assignments
            .iter()
            .find(|assignment| assignment.field == field)
    }

    pub fn column_index(&self, field: &str) -> Option<usize> {
        self.assignment_for(field)
            .map(|assignment| assignment.column_index)
    }

    /// Required schema fields with no assigned column, in schema order.
    pub fn missing_required(&self, schema: &CanonicalSchema) -> Vec<String> {
        schema
            .required_fields()
            .filter(|field| self.assignment_for(&field.name).is_none())
            .map(|field| field.name.clone())
            .collect()
    }

    pub fn rejected_for(&self, field: &str) -> Option<&RejectedCandidate> {
        self.rejected.iter().find(|candidate| candidate.field == field)
    }
}
