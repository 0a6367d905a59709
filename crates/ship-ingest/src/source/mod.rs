//! Source adapters: anything that yields a header and a finite stream of rows.

mod delimited;
mod header;
mod memory;

use ship_model::CellValue;

use crate::error::SourceError;

pub use delimited::{CsvOptions, CsvSource};
pub use header::detect_header_row;
pub use memory::MemorySource;

/// One row from a source, or the reason it could not be read.
pub type RowResult = Result<Vec<CellValue>, SourceError>;

/// A tabular input.
///
/// `header_row` is read first. `rows` is lazy and finite and can be consumed
/// only once; each row is already padded or truncated to the header width.
pub trait SourceAdapter {
    /// Name used in diagnostics and results, usually the file name.
    fn source_name(&self) -> &str;

    fn header_row(&mut self) -> Result<Vec<String>, SourceError>;

    fn rows(&mut self) -> Box<dyn Iterator<Item = RowResult> + '_>;
}

/// Pad with empty cells or truncate to `width`.
pub(crate) fn fit_to_width(mut cells: Vec<CellValue>, width: Option<usize>) -> Vec<CellValue> {
    if let Some(width) = width {
        cells.resize(width, CellValue::Empty);
    }
    cells
}
