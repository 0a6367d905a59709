//! Record validator: presence gate, type gate, then the ordered rule list.

use ship_model::{CanonicalRecord, CanonicalSchema, Diagnostic, DiagnosticCode};
use tracing::trace;

use crate::checks;
use crate::rule::Rule;
use crate::spec::RuleSpec;

/// Validates canonical records against a schema and an ordered rule list.
#[derive(Debug, Clone, Default)]
pub struct RecordValidator {
    rules: Vec<Rule>,
}

impl RecordValidator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from declarative specs, preserving their order.
    pub fn from_specs<'a>(specs: impl IntoIterator<Item = &'a RuleSpec>) -> Self {
        Self {
            rules: specs.into_iter().map(RuleSpec::to_rule).collect(),
        }
    }

    pub fn add_rule(&mut self, rule: Rule) {
        self.rules.push(rule);
    }

    pub fn add_rules(&mut self, rules: impl IntoIterator<Item = Rule>) {
        self.rules.extend(rules);
    }

    #[must_use]
    pub fn with_rule(mut self, rule: Rule) -> Self {
        self.rules.push(rule);
        self
    }

    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    /// All diagnostics for one record. Any error-severity entry excludes it.
    pub fn validate(&self, record: &CanonicalRecord, schema: &CanonicalSchema) -> Vec<Diagnostic> {
        let mut diagnostics = checks::required::check(record, schema);
        diagnostics.extend(checks::types::check(record, schema));

        for rule in &self.rules {
            if rule.check(record) {
                continue;
            }
            trace!(row = record.row_index, rule = %rule.name, "rule failed");
            let mut diagnostic = Diagnostic::new(
                rule.severity,
                DiagnosticCode::RuleViolation,
                format!("{}: {}", rule.name, rule.message),
            )
            .at_row(record.row_index);
            if let Some(field) = &rule.field {
                diagnostic = diagnostic
                    .for_field(field)
                    .with_raw(record.value(field).render());
            }
            diagnostics.push(diagnostic);
        }
        diagnostics
    }
}
