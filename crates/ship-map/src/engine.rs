//! Mapping engine implementation.

use std::cmp::Ordering;

use ship_model::{
    CanonicalSchema, CellValue, ColumnMapping, FieldAssignment, FieldDef, RejectedCandidate,
};
use ship_normalize::FieldNormalizer;
use tracing::{debug, trace};

use crate::options::MappingOptions;
use crate::score::score_field;

/// Maps source headers onto the fields of a [`CanonicalSchema`].
///
/// Every (field, header) pair is scored by name and assigned greedily by
/// descending score. How well sampled values normalize as the field's type
/// breaks ties between equal scores; it never lowers a score. Each header and each field is used at most once, so
/// the result is always one-to-one.
///
/// # Example
///
/// ```ignore
/// let mapper = ColumnMapper::new(MappingOptions::default());
/// let mapping = mapper.map(&["Tracking #".into(), "Wt (kg)".into()], &schema);
/// ```
#[derive(Debug, Clone, Default)]
pub struct ColumnMapper {
    options: MappingOptions,
    normalizer: FieldNormalizer,
}

/// Positive name scores for every (field, header) pair of one header row.
///
/// Depends only on the header and the schema, so it can be shared between
/// files with the same header. Sniffing and assignment run per file on top.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NameScores {
    header: Vec<String>,
    pairs: Vec<ScoredPair>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct ScoredPair {
    field_idx: usize,
    header_idx: usize,
    score: f32,
}

impl NameScores {
    pub fn header(&self) -> &[String] {
        &self.header
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }
}

struct Candidate {
    field_idx: usize,
    header_idx: usize,
    confidence: f32,
    sniff_ratio: Option<f32>,
}

impl ColumnMapper {
    pub fn new(options: MappingOptions) -> Self {
        Self {
            options,
            normalizer: FieldNormalizer::default(),
        }
    }

    /// Use `normalizer` (and its locale settings) for content sniffing.
    #[must_use]
    pub fn with_normalizer(mut self, normalizer: FieldNormalizer) -> Self {
        self.normalizer = normalizer;
        self
    }

    pub fn options(&self) -> &MappingOptions {
        &self.options
    }

    /// Map by header names alone.
    pub fn map(&self, header: &[String], schema: &CanonicalSchema) -> ColumnMapping {
        self.map_with_samples(header, schema, &[])
    }

    /// Map using header names and the first rows of data for content sniffing.
    pub fn map_with_samples(
        &self,
        header: &[String],
        schema: &CanonicalSchema,
        samples: &[Vec<CellValue>],
    ) -> ColumnMapping {
        let scores = self.score_names(header, schema);
        self.map_scored(&scores, schema, samples)
    }

    /// Name-score every (field, header) pair.
    pub fn score_names(&self, header: &[String], schema: &CanonicalSchema) -> NameScores {
        let mut pairs = Vec::new();
        for (field_idx, field) in schema.fields.iter().enumerate() {
            for (header_idx, label) in header.iter().enumerate() {
                let name_score = score_field(label, field);
                if name_score.score <= 0.0 {
                    continue;
                }
                trace!(
                    field = %field.name,
                    column = %label,
                    score = name_score.score,
                    explanation = %name_score.explain(),
                    "scored column"
                );
                pairs.push(ScoredPair {
                    field_idx,
                    header_idx,
                    score: name_score.score,
                });
            }
        }
        NameScores {
            header: header.to_vec(),
            pairs,
        }
    }

    /// Assign columns from precomputed name scores, sniffing `samples` to
    /// order candidates whose scores are equal.
    pub fn map_scored(
        &self,
        scores: &NameScores,
        schema: &CanonicalSchema,
        samples: &[Vec<CellValue>],
    ) -> ColumnMapping {
        let header = &scores.header;
        let columns = self.sample_columns(header.len(), samples);
        let mut candidates = Vec::new();
        let mut best_rejected: Vec<Option<(f32, usize)>> = vec![None; schema.fields.len()];

        for pair in &scores.pairs {
            let Some(field) = schema.fields.get(pair.field_idx) else {
                continue;
            };
            let confidence = pair.score;
            let best = &mut best_rejected[pair.field_idx];
            if best.is_none_or(|(score, _)| confidence > score) {
                *best = Some((confidence, pair.header_idx));
            }
            if confidence >= self.options.acceptance_threshold {
                // Sniffing only orders candidates with equal scores.
                let sniff_ratio = self.sniff(&columns[pair.header_idx], field);
                candidates.push(Candidate {
                    field_idx: pair.field_idx,
                    header_idx: pair.header_idx,
                    confidence,
                    sniff_ratio,
                });
            }
        }

        candidates.sort_by(|a, b| {
            b.confidence
                .partial_cmp(&a.confidence)
                .unwrap_or(Ordering::Equal)
                .then_with(|| {
                    let a_sniff = a.sniff_ratio.unwrap_or(0.0);
                    let b_sniff = b.sniff_ratio.unwrap_or(0.0);
                    b_sniff.partial_cmp(&a_sniff).unwrap_or(Ordering::Equal)
                })
                .then_with(|| a.header_idx.cmp(&b.header_idx))
                .then_with(|| a.field_idx.cmp(&b.field_idx))
        });

        let mut header_taken = vec![false; header.len()];
        let mut field_taken: Vec<Option<Candidate>> = (0..schema.fields.len()).map(|_| None).collect();
        for candidate in candidates {
            if header_taken[candidate.header_idx] || field_taken[candidate.field_idx].is_some() {
                continue;
            }
            header_taken[candidate.header_idx] = true;
            let field_idx = candidate.field_idx;
            field_taken[field_idx] = Some(candidate);
        }

        let mut mapping = ColumnMapping::default();
        for (field_idx, (field, taken)) in schema.fields.iter().zip(field_taken).enumerate() {
            match taken {
                Some(candidate) => {
                    let column = header[candidate.header_idx].clone();
                    debug!(
                        field = %field.name,
                        column = %column,
                        confidence = candidate.confidence,
                        "assigned column"
                    );
                    mapping.assignments.push(FieldAssignment {
                        field: field.name.clone(),
                        column,
                        column_index: candidate.header_idx,
                        confidence: candidate.confidence,
                        sniff_ratio: candidate.sniff_ratio,
                    });
                }
                None => {
                    mapping.unmapped_fields.push(field.name.clone());
                    if let Some((confidence, header_idx)) = best_rejected[field_idx] {
                        debug!(
                            field = %field.name,
                            column = %header[header_idx],
                            confidence,
                            "best candidate rejected"
                        );
                        mapping.rejected.push(RejectedCandidate {
                            field: field.name.clone(),
                            column: header[header_idx].clone(),
                            confidence,
                        });
                    }
                }
            }
        }
        mapping.unmapped_columns = header
            .iter()
            .zip(&header_taken)
            .filter(|(_, taken)| !**taken)
            .map(|(label, _)| label.clone())
            .collect();
        mapping
    }

    /// Up to `sample_size` non-blank values per header position.
    fn sample_columns<'a>(&self, width: usize, samples: &'a [Vec<CellValue>]) -> Vec<Vec<&'a CellValue>> {
        let mut columns: Vec<Vec<&CellValue>> = vec![Vec::new(); width];
        for row in samples {
            for (column, value) in columns.iter_mut().zip(row) {
                if column.len() < self.options.sample_size && !value.is_blank() {
                    column.push(value);
                }
            }
        }
        columns
    }

    /// Share of sampled values that normalize cleanly as the field's type.
    fn sniff(&self, values: &[&CellValue], field: &FieldDef) -> Option<f32> {
        if values.is_empty() {
            return None;
        }
        let clean = values
            .iter()
            .filter(|value| {
                self.normalizer
                    .normalize(value, &field.semantic_type)
                    .is_clean()
            })
            .count();
        Some(clean as f32 / values.len() as f32)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ship_model::SemanticType;

    fn schema() -> CanonicalSchema {
        CanonicalSchema::new(
            "parcels",
            vec![
                FieldDef::new("trackingId", SemanticType::identifier(None)).required(),
                FieldDef::new("shipDate", SemanticType::Date).required(),
                FieldDef::new("weight", SemanticType::Decimal),
            ],
        )
    }

    fn header(labels: &[&str]) -> Vec<String> {
        labels.iter().map(|label| (*label).to_string()).collect()
    }

    #[test]
    fn maps_one_to_one_and_reports_leftovers() {
        let mapper = ColumnMapper::default();
        let mapping = mapper.map(&header(&["Tracking ID", "Ship Date", "Wt (kg)", "Notes"]), &schema());
        assert_eq!(mapping.column_index("trackingId"), Some(0));
        assert_eq!(mapping.column_index("shipDate"), Some(1));
        assert_eq!(mapping.column_index("weight"), Some(2));
        assert_eq!(mapping.unmapped_columns, vec!["Notes"]);
        assert!(mapping.unmapped_fields.is_empty());
    }

    #[test]
    fn duplicate_headers_keep_first() {
        let mapper = ColumnMapper::default();
        let mapping = mapper.map(&header(&["weight", "Weight"]), &schema());
        assert_eq!(mapping.column_index("weight"), Some(0));
        assert_eq!(mapping.unmapped_columns, vec!["Weight"]);
    }

    #[test]
    fn sniffing_breaks_name_ties() {
        let mapper = ColumnMapper::default();
        let samples = vec![
            vec![CellValue::text("n/a"), CellValue::text("2024-01-02")],
            vec![CellValue::text("tbc"), CellValue::text("2024-01-03")],
            vec![CellValue::text("later"), CellValue::text("2024-01-04")],
        ];
        let schema = CanonicalSchema::new("d", vec![FieldDef::new("date", SemanticType::Date)]);
        let mapping = mapper.map_with_samples(&header(&["Date", "date"]), &schema, &samples);
        let assignment = mapping.assignment_for("date").expect("date mapped");
        assert_eq!(assignment.column_index, 1);
        assert_eq!(assignment.sniff_ratio, Some(1.0));
    }

    #[test]
    fn unmapped_field_keeps_best_rejected_candidate() {
        let mapper = ColumnMapper::default();
        let mapping = mapper.map(&header(&["Tracking ID", "Delivery Date"]), &schema());
        assert!(mapping.unmapped_fields.contains(&"shipDate".to_string()));
        let rejected = mapping.rejected_for("shipDate").expect("rejected candidate");
        assert_eq!(rejected.column, "Delivery Date");
        assert!(rejected.confidence < 0.75);
        assert_eq!(mapping.missing_required(&schema()), vec!["shipDate"]);
    }
}
