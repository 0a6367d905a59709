use std::collections::VecDeque;

use ship_model::CellValue;

use super::{RowResult, SourceAdapter, fit_to_width};
use crate::error::SourceError;

/// In-memory source for tests and for callers that already hold parsed rows.
#[derive(Debug)]
pub struct MemorySource {
    name: String,
    header: Vec<String>,
    rows: VecDeque<RowResult>,
}

impl MemorySource {
    pub fn new(name: impl Into<String>, header: Vec<String>, rows: Vec<Vec<CellValue>>) -> Self {
        let width = Some(header.len());
        Self {
            name: name.into(),
            rows: rows
                .into_iter()
                .map(|row| Ok(fit_to_width(row, width)))
                .collect(),
            header,
        }
    }

    /// Build from string slices; blank strings become empty cells.
    pub fn from_text(name: impl Into<String>, header: &[&str], rows: &[&[&str]]) -> Self {
        Self::new(
            name,
            header.iter().map(|label| (*label).to_string()).collect(),
            rows.iter()
                .map(|row| row.iter().map(|cell| CellValue::text(*cell)).collect())
                .collect(),
        )
    }

    /// Append a row that fails to read.
    #[must_use]
    pub fn with_row_error(mut self, error: SourceError) -> Self {
        self.rows.push_back(Err(error));
        self
    }

    #[must_use]
    pub fn with_row(mut self, row: Vec<CellValue>) -> Self {
        self.rows
            .push_back(Ok(fit_to_width(row, Some(self.header.len()))));
        self
    }
}

impl SourceAdapter for MemorySource {
    fn source_name(&self) -> &str {
        &self.name
    }

    fn header_row(&mut self) -> Result<Vec<String>, SourceError> {
        Ok(self.header.clone())
    }

    fn rows(&mut self) -> Box<dyn Iterator<Item = RowResult> + '_> {
        Box::new(self.rows.drain(..))
    }
}
