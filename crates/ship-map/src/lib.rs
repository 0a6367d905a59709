//! Column mapping: source headers to canonical schema fields.

pub mod cache;
pub mod confidence;
pub mod engine;
pub mod options;
pub mod score;
pub mod tokens;
pub mod utils;

pub use cache::MappingCache;
pub use confidence::{ConfidenceLevel, ConfidenceThresholds};
pub use engine::{ColumnMapper, NameScores};
pub use options::MappingOptions;
pub use score::{ColumnScore, ScoreComponent, score_field, score_name};
pub use utils::normalize_text;
