//! Error types for profile loading.

use std::path::PathBuf;

use ship_model::SchemaError;
use ship_normalize::NormalizeError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ProfileError {
    /// Profile file could not be read.
    #[error("failed to read profile {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse profile {origin}: {source}")]
    Toml {
        origin: String,
        #[source]
        source: toml::de::Error,
    },

    #[error("unknown profile '{name}' (available: {})", available.join(", "))]
    UnknownProfile { name: String, available: Vec<String> },

    #[error("profile {origin} has an invalid schema: {source}")]
    InvalidSchema {
        origin: String,
        #[source]
        source: SchemaError,
    },

    #[error("profile {origin} has an invalid identifier pattern: {source}")]
    InvalidPattern {
        origin: String,
        #[source]
        source: NormalizeError,
    },

    #[error("profile {origin} has an invalid derived field: {source}")]
    InvalidDerivation {
        origin: String,
        #[source]
        source: NormalizeError,
    },

    /// A rule names a field the schema does not define.
    #[error("profile {origin}: rule '{rule}' refers to unknown field '{field}'")]
    UnknownRuleField {
        origin: String,
        rule: String,
        field: String,
    },
}

pub type Result<T> = std::result::Result<T, ProfileError>;
