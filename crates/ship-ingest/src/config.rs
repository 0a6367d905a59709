//! Pipeline configuration.

use serde::{Deserialize, Serialize};
use ship_map::MappingOptions;
use ship_normalize::{Derivation, NormalizeOptions};

/// How rows are processed once the mapping is known.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Parallelism {
    #[default]
    Sequential,
    /// Bounded worker pool with this many threads. Output order is preserved.
    Pool(usize),
}

/// What a normalization error on an optional field does to its record.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OptionalFieldErrors {
    /// Any error excludes the record.
    #[default]
    Reject,
    /// Keep the record with the field missing; the error stays in the ledger.
    Keep,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IngestConfig {
    pub normalize: NormalizeOptions,
    pub mapping: MappingOptions,
    pub parallelism: Parallelism,
    /// Rows handed to the pool at once.
    pub batch_size: usize,
    pub optional_field_errors: OptionalFieldErrors,
    /// Allow raw cell values in trace output.
    pub log_data: bool,
    /// Fields computed after normalization, in order.
    pub derivations: Vec<Derivation>,
}

impl Default for IngestConfig {
    fn default() -> Self {
        Self {
            normalize: NormalizeOptions::default(),
            mapping: MappingOptions::default(),
            parallelism: Parallelism::Sequential,
            batch_size: 256,
            optional_field_errors: OptionalFieldErrors::Reject,
            log_data: false,
            derivations: Vec::new(),
        }
    }
}

impl IngestConfig {
    #[must_use]
    pub fn with_normalize(mut self, normalize: NormalizeOptions) -> Self {
        self.normalize = normalize;
        self
    }

    #[must_use]
    pub fn with_mapping(mut self, mapping: MappingOptions) -> Self {
        self.mapping = mapping;
        self
    }

    #[must_use]
    pub fn with_parallelism(mut self, parallelism: Parallelism) -> Self {
        self.parallelism = parallelism;
        self
    }

    #[must_use]
    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size.max(1);
        self
    }

    #[must_use]
    pub fn with_optional_field_errors(mut self, mode: OptionalFieldErrors) -> Self {
        self.optional_field_errors = mode;
        self
    }

    #[must_use]
    pub fn with_log_data(mut self, enable: bool) -> Self {
        self.log_data = enable;
        self
    }

    #[must_use]
    pub fn with_derivations(mut self, derivations: Vec<Derivation>) -> Self {
        self.derivations = derivations;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn loads_partial_toml() {
        let config: IngestConfig = toml::from_str(
            r#"
parallelism = { pool = 4 }
optional_field_errors = "keep"

[normalize]
date_order = "month-first"
"#,
        )
        .expect("parse config");
        assert_eq!(config.parallelism, Parallelism::Pool(4));
        assert_eq!(config.optional_field_errors, OptionalFieldErrors::Keep);
        assert_eq!(config.batch_size, 256);
        assert_eq!(config.normalize.date_order.as_str(), "month-first");
    }
}
