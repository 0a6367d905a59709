//! Output tables for an ingestion result.
//!
//! Two tables per source, each as CSV or JSON:
//! - **records**: `row_index` plus every schema field in order, accepted rows only
//! - **diagnostics**: `row_index, severity, code, field, message, raw_value`

pub mod error;
pub mod format;
pub mod table;
pub mod writer;

pub use error::{OutputError, Result};
pub use format::OutputFormat;
pub use table::{DIAGNOSTIC_COLUMNS, diagnostic_cells, record_cells, record_columns};
pub use writer::{output_stem, write_diagnostics, write_outputs, write_records};
