//! Shipment ingestion: read a tabular source, map its columns onto a
//! canonical schema, normalize and validate every row, and collect the
//! outcome in an [`IngestionResult`](ship_model::IngestionResult).
//!
//! # Example
//!
//! ```ignore
//! let pipeline = IngestionPipeline::new(schema, IngestConfig::default())?
//!     .with_validator(validator);
//! let mut source = CsvSource::open(Path::new("shipments.csv"), CsvOptions::default())?;
//! let result = pipeline.run(&mut source)?;
//! ```

pub mod config;
pub mod error;
pub mod pipeline;
pub mod run;
pub mod source;

pub use config::{IngestConfig, OptionalFieldErrors, Parallelism};
pub use error::{IngestError, Result, SourceError};
pub use pipeline::IngestionPipeline;
pub use run::IngestionRun;
pub use source::{CsvOptions, CsvSource, MemorySource, RowResult, SourceAdapter, detect_header_row};
