use thiserror::Error;

#[derive(Debug, Error)]
pub enum NormalizeError {
    #[error("field '{field}' has an invalid identifier pattern '{pattern}': {source}")]
    InvalidPattern {
        field: String,
        pattern: String,
        #[source]
        source: regex::Error,
    },

    #[error("derived field '{target}': {reason}")]
    InvalidDerivation { target: String, reason: String },
}

pub type Result<T> = std::result::Result<T, NormalizeError>;
