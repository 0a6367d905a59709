pub mod cell;
pub mod diagnostic;
pub mod error;
pub mod mapping;
pub mod result;
pub mod schema;
pub mod value;

pub use cell::{CellValue, RawRow, format_number};
pub use diagnostic::{Diagnostic, DiagnosticCode, DiagnosticLedger, Severity};
pub use error::{Result, SchemaError};
pub use mapping::{ColumnMapping, FieldAssignment, RejectedCandidate};
pub use result::{IngestionResult, IngestionSummary};
pub use schema::{CanonicalSchema, FieldDef, SemanticType};
pub use value::{CanonicalRecord, FieldValue};
