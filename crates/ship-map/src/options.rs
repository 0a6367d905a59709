use serde::{Deserialize, Serialize};

use crate::confidence::ConfidenceThresholds;

/// Tuning for the column mapper.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MappingOptions {
    /// Minimum score for a header-field pair to be assigned.
    pub acceptance_threshold: f32,
    /// Non-blank values sampled per header for content sniffing.
    pub sample_size: usize,
    pub thresholds: ConfidenceThresholds,
}

impl Default for MappingOptions {
    fn default() -> Self {
        Self {
            acceptance_threshold: 0.75,
            sample_size: 20,
            thresholds: ConfidenceThresholds::default(),
        }
    }
}

impl MappingOptions {
    #[must_use]
    pub fn with_acceptance_threshold(mut self, threshold: f32) -> Self {
        self.acceptance_threshold = threshold;
        self
    }

    #[must_use]
    pub fn with_sample_size(mut self, sample_size: usize) -> Self {
        self.sample_size = sample_size;
        self
    }
}
