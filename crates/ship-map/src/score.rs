//! Fuzzy matching and scoring for header-to-field mapping.
//!
//! Exact normalized matches score 1.0 and matches after dropping bracketed
//! annotations score 0.95. Everything else blends Jaro-Winkler similarity of
//! the compact forms with token overlap, capped below the exact tiers.

use rapidfuzz::distance::jaro_winkler;
use ship_model::FieldDef;

use crate::tokens::{dice, overlap_adjustment, token_set};
use crate::utils::{compact, strip_annotations};

const EXACT_SCORE: f32 = 1.0;
const ANNOTATED_SCORE: f32 = 0.95;
const FUZZY_CEILING: f64 = 0.94;

/// Score for a single header-field pair.
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnScore {
    pub score: f32,
    /// Spelling of the field (name, alias or label) that produced the score.
    pub matched_name: String,
    /// Breakdown of score components for explainability.
    pub explanation: Vec<ScoreComponent>,
}

impl ColumnScore {
    fn zero(matched_name: &str) -> Self {
        Self {
            score: 0.0,
            matched_name: matched_name.to_string(),
            explanation: Vec::new(),
        }
    }

    /// Human-readable explanation of the score.
    pub fn explain(&self) -> String {
        self.explanation
            .iter()
            .map(|c| format!("{}: {:.0}%", c.name, c.value * 100.0))
            .collect::<Vec<_>>()
            .join("; ")
    }
}

/// A component contributing to the final score.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoreComponent {
    pub name: &'static str,
    pub value: f32,
}

impl ScoreComponent {
    fn new(name: &'static str, value: f64) -> Self {
        Self {
            name,
            value: value as f32,
        }
    }
}

/// Best score of `header` over every spelling of `field`.
pub fn score_field(header: &str, field: &FieldDef) -> ColumnScore {
    field
        .match_names()
        .map(|name| score_name(header, name))
        .fold(ColumnScore::zero(&field.name), |best, next| {
            if next.score > best.score { next } else { best }
        })
}

/// Score one header against one field spelling.
pub fn score_name(header: &str, name: &str) -> ColumnScore {
    let header_compact = compact(header);
    let name_compact = compact(name);
    if header_compact.is_empty() || name_compact.is_empty() {
        return ColumnScore::zero(name);
    }
    if header_compact == name_compact {
        return ColumnScore {
            score: EXACT_SCORE,
            matched_name: name.to_string(),
            explanation: vec![ScoreComponent::new("Exact match", 1.0)],
        };
    }

    let stripped = strip_annotations(header);
    let stripped_compact = compact(&stripped);
    if stripped_compact.is_empty() {
        return ColumnScore::zero(name);
    }
    if stripped_compact == name_compact {
        return ColumnScore {
            score: ANNOTATED_SCORE,
            matched_name: name.to_string(),
            explanation: vec![ScoreComponent::new("Match without annotation", f64::from(ANNOTATED_SCORE))],
        };
    }

    let similarity = jaro_winkler::similarity(stripped_compact.chars(), name_compact.chars());
    let header_tokens = token_set(&stripped);
    let name_tokens = token_set(name);
    let overlap = dice(&header_tokens, &name_tokens);
    let blended = (similarity + overlap) / 2.0;
    let adjusted = overlap_adjustment(&header_tokens, &name_tokens, blended);
    let score = adjusted.min(FUZZY_CEILING);

    ColumnScore {
        score: score as f32,
        matched_name: name.to_string(),
        explanation: vec![
            ScoreComponent::new("Name similarity", similarity),
            ScoreComponent::new("Token overlap", overlap),
            ScoreComponent::new("Overlap adjustment", adjusted - blended),
        ],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ship_model::SemanticType;

    #[test]
    fn exact_and_annotated_tiers() {
        assert_eq!(score_name("Ship Date", "shipDate").score, 1.0);
        assert_eq!(score_name("Weight (kg)", "weight").score, 0.95);
    }

    #[test]
    fn abbreviation_maps_through_tokens() {
        let field = FieldDef::new("weight", SemanticType::Decimal);
        let score = score_field("Wt (kg)", &field);
        assert!(score.score >= 0.75, "got {} ({})", score.score, score.explain());
        assert!(score.score < 0.95);
    }

    #[test]
    fn generic_only_overlap_is_penalized() {
        let score = score_name("Ship Date", "deliveryDate");
        assert!(score.score < 0.5, "got {}", score.score);
    }

    #[test]
    fn aliases_and_labels_are_considered() {
        let field = FieldDef::new("trackingId", SemanticType::identifier(None))
            .with_aliases(["AWB"])
            .with_label("Air waybill number");
        let score = score_field("awb", &field);
        assert_eq!(score.score, 1.0);
        assert_eq!(score.matched_name, "AWB");
    }

    #[test]
    fn blank_header_scores_zero() {
        assert_eq!(score_name("   ", "weight").score, 0.0);
        assert_eq!(score_name("(kg)", "weight").score, 0.0);
    }
}
