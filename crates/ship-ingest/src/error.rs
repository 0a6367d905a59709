//! Error types for shipment ingestion.

use std::path::PathBuf;

use ship_model::SchemaError;
use ship_normalize::NormalizeError;
use thiserror::Error;

/// Errors raised by a [`SourceAdapter`](crate::SourceAdapter).
#[derive(Debug, Error)]
pub enum SourceError {
    /// The source could not be opened.
    #[error("failed to open {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The underlying reader failed and cannot continue.
    #[error("failed to read CSV: {0}")]
    Csv(#[from] csv::Error),

    /// A single row could not be decoded.
    #[error("unreadable row{}: {message}", line.map(|line| format!(" at line {line}")).unwrap_or_default())]
    Row {
        line: Option<u64>,
        message: String,
        /// Whether later rows can still be read.
        recoverable: bool,
    },
}

impl SourceError {
    pub fn row(message: impl Into<String>, recoverable: bool) -> Self {
        SourceError::Row {
            line: None,
            message: message.into(),
            recoverable,
        }
    }

    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            SourceError::Row {
                recoverable: true,
                ..
            }
        )
    }
}

/// File-level failures. Everything below this level is a ledger diagnostic.
#[derive(Debug, Error)]
pub enum IngestError {
    #[error("{name} has no header or no data rows")]
    EmptySource { name: String },

    #[error("{name} is missing required fields: {}", missing.join(", "))]
    SchemaMismatch { name: String, missing: Vec<String> },

    #[error("invalid schema: {0}")]
    InvalidSchema(#[from] SchemaError),

    #[error(transparent)]
    Normalize(#[from] NormalizeError),

    #[error(transparent)]
    Source(#[from] SourceError),

    #[error("failed to build worker pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
}

pub type Result<T> = std::result::Result<T, IngestError>;
