//! Declarative rule definitions loadable from profile files.

use serde::{Deserialize, Serialize};
use ship_model::Severity;

use crate::rule::Rule;

/// A built-in rule in serializable form.
///
/// ```toml
/// [[rules]]
/// rule = "range"
/// field = "weight"
/// min = 0.1
/// max = 30000.0
/// severity = "warning"
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RuleSpec {
    #[serde(flatten)]
    pub kind: RuleKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub severity: Option<Severity>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "rule", rename_all = "snake_case")]
pub enum RuleKind {
    DateOrder {
        earlier: String,
        later: String,
    },
    Positive {
        field: String,
    },
    Range {
        field: String,
        #[serde(default)]
        min: Option<f64>,
        #[serde(default)]
        max: Option<f64>,
    },
    NotEqual {
        first: String,
        second: String,
    },
}

impl RuleSpec {
    pub fn new(kind: RuleKind) -> Self {
        Self {
            kind,
            severity: None,
            message: None,
        }
    }

    /// Field names the rule reads.
    pub fn fields(&self) -> Vec<&str> {
        match &self.kind {
            RuleKind::DateOrder { earlier, later } => vec![earlier, later],
            RuleKind::Positive { field } | RuleKind::Range { field, .. } => vec![field],
            RuleKind::NotEqual { first, second } => vec![first, second],
        }
    }

    pub fn to_rule(&self) -> Rule {
        let mut rule = match &self.kind {
            RuleKind::DateOrder { earlier, later } => Rule::date_order(earlier, later),
            RuleKind::Positive { field } => Rule::positive(field),
            RuleKind::Range { field, min, max } => Rule::range(field, *min, *max),
            RuleKind::NotEqual { first, second } => Rule::not_equal(first, second),
        };
        if let Some(severity) = self.severity {
            rule = rule.with_severity(severity);
        }
        if let Some(message) = &self.message {
            rule = rule.with_message(message.clone());
        }
        rule
    }
}

impl From<&RuleSpec> for Rule {
    fn from(spec: &RuleSpec) -> Self {
        spec.to_rule()
    }
}
