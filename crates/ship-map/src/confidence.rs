//! Confidence categories for reporting mapping quality.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use ship_model::ColumnMapping;

/// Confidence level categories for mapping quality assessment.
///
/// - `High`: near-certain matches that can be used without review
/// - `Medium`: good matches that should be verified
/// - `Low`: weak matches requiring manual confirmation
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConfidenceLevel {
    Low,
    Medium,
    High,
}

impl ConfidenceLevel {
    #[must_use]
    pub fn description(&self) -> &'static str {
        match self {
            Self::High => "high confidence - likely correct",
            Self::Medium => "medium confidence - should review",
            Self::Low => "low confidence - needs verification",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::High => "high",
            Self::Medium => "medium",
            Self::Low => "low",
        }
    }
}

/// Configurable thresholds for categorizing mapping confidence.
///
/// Below `low` a score is not categorized at all.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConfidenceThresholds {
    /// Minimum confidence for high-quality matches (default: 0.95).
    pub high: f32,
    /// Minimum confidence for medium-quality matches (default: 0.85).
    pub medium: f32,
    /// Minimum confidence to categorize at all (default: 0.75).
    pub low: f32,
}

impl Default for ConfidenceThresholds {
    fn default() -> Self {
        Self {
            high: 0.95,
            medium: 0.85,
            low: 0.75,
        }
    }
}

impl ConfidenceThresholds {
    /// Creates thresholds with strict boundaries for high-quality mapping.
    #[must_use]
    pub fn strict() -> Self {
        Self {
            high: 0.98,
            medium: 0.90,
            low: 0.80,
        }
    }

    /// Returns `None` if the score is below the low threshold.
    #[must_use]
    pub fn categorize(&self, confidence: f32) -> Option<ConfidenceLevel> {
        if confidence >= self.high {
            Some(ConfidenceLevel::High)
        } else if confidence >= self.medium {
            Some(ConfidenceLevel::Medium)
        } else if confidence >= self.low {
            Some(ConfidenceLevel::Low)
        } else {
            None
        }
    }

    /// Number of assignments at each confidence level.
    #[must_use]
    pub fn count_by_level(&self, mapping: &ColumnMapping) -> BTreeMap<ConfidenceLevel, usize> {
        let mut counts = BTreeMap::new();
        for assignment in &mapping.assignments {
            if let Some(level) = self.categorize(assignment.confidence) {
                *counts.entry(level).or_insert(0) += 1;
            }
        }
        counts
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ship_model::FieldAssignment;

    fn assignment(field: &str, confidence: f32) -> FieldAssignment {
        FieldAssignment {
            field: field.to_string(),
            column: field.to_string(),
            column_index: 0,
            confidence,
            sniff_ratio: None,
        }
    }

    #[test]
    fn categorizes_and_counts() {
        let thresholds = ConfidenceThresholds::default();
        assert_eq!(thresholds.categorize(1.0), Some(ConfidenceLevel::High));
        assert_eq!(thresholds.categorize(0.9), Some(ConfidenceLevel::Medium));
        assert_eq!(thresholds.categorize(0.8), Some(ConfidenceLevel::Low));
        assert_eq!(thresholds.categorize(0.5), None);

        let mapping = ColumnMapping {
            assignments: vec![assignment("a", 1.0), assignment("b", 0.95), assignment("c", 0.8)],
            ..ColumnMapping::default()
        };
        let counts = thresholds.count_by_level(&mapping);
        assert_eq!(counts.get(&ConfidenceLevel::High), Some(&2));
        assert_eq!(counts.get(&ConfidenceLevel::Low), Some(&1));
        assert_eq!(counts.get(&ConfidenceLevel::Medium), None);
    }
}
