//! CSV and TSV files via the `csv` crate.

use std::collections::VecDeque;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use csv::{ReaderBuilder, StringRecord};
use ship_model::CellValue;
use tracing::{debug, trace};

use super::header::{detect_header_row, header_labels, normalize_label};
use super::{RowResult, SourceAdapter, fit_to_width};
use crate::error::SourceError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CsvOptions {
    /// Field delimiter. `None` picks tab for `.tsv`/`.tab` files and comma otherwise.
    pub delimiter: Option<u8>,
    /// Fixed header position among non-blank rows; `None` detects it.
    pub header_row: Option<usize>,
    /// Non-blank rows inspected for header detection.
    pub header_scan_rows: usize,
}

impl Default for CsvOptions {
    fn default() -> Self {
        Self {
            delimiter: None,
            header_row: None,
            header_scan_rows: 5,
        }
    }
}

impl CsvOptions {
    #[must_use]
    pub fn with_delimiter(mut self, delimiter: u8) -> Self {
        self.delimiter = Some(delimiter);
        self
    }

    #[must_use]
    pub fn with_header_row(mut self, index: usize) -> Self {
        self.header_row = Some(index);
        self
    }
}

/// A delimited text file read lazily record by record.
pub struct CsvSource {
    name: String,
    reader: csv::Reader<Box<dyn Read>>,
    options: CsvOptions,
    header: Option<Vec<String>>,
    buffered: VecDeque<RowResult>,
}

impl CsvSource {
    pub fn open(path: &Path, options: CsvOptions) -> Result<Self, SourceError> {
        let file = File::open(path).map_err(|source| SourceError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let mut options = options;
        if options.delimiter.is_none() {
            let tabbed = path
                .extension()
                .and_then(|ext| ext.to_str())
                .is_some_and(|ext| ext.eq_ignore_ascii_case("tsv") || ext.eq_ignore_ascii_case("tab"));
            options.delimiter = Some(if tabbed { b'\t' } else { b',' });
        }
        let name = path
            .file_name()
            .map_or_else(|| path.display().to_string(), |name| name.to_string_lossy().into_owned());
        Ok(Self::from_reader(name, file, options))
    }

    pub fn from_reader(name: impl Into<String>, reader: impl Read + 'static, options: CsvOptions) -> Self {
        let reader = ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .delimiter(options.delimiter.unwrap_or(b','))
            .from_reader(Box::new(reader) as Box<dyn Read>);
        Self {
            name: name.into(),
            reader,
            options,
            header: None,
            buffered: VecDeque::new(),
        }
    }

    /// Read up to `header_scan_rows` non-blank records and pick the header among them.
    fn scan_for_header(&mut self) -> Vec<String> {
        let mut scanned: Vec<Result<Vec<String>, SourceError>> = Vec::new();
        let mut record = StringRecord::new();
        while scanned.iter().filter(|row| row.is_ok()).count() < self.options.header_scan_rows {
            match self.reader.read_record(&mut record) {
                Ok(true) => {
                    let row = record_cells(&record);
                    if !row.iter().all(String::is_empty) {
                        scanned.push(Ok(row));
                    }
                }
                Ok(false) => break,
                Err(err) => {
                    let err = classify(err);
                    let fatal = !err.is_recoverable();
                    scanned.push(Err(err));
                    if fatal {
                        break;
                    }
                }
            }
        }

        let readable: Vec<(usize, &Vec<String>)> = scanned
            .iter()
            .enumerate()
            .filter_map(|(pos, row)| row.as_ref().ok().map(|row| (pos, row)))
            .collect();
        let candidates: Vec<Vec<String>> = readable.iter().map(|(_, row)| (*row).clone()).collect();
        let chosen = self
            .options
            .header_row
            .unwrap_or_else(|| detect_header_row(&candidates));
        let Some(&(position, row)) = readable.get(chosen) else {
            return Vec::new();
        };
        let header = header_labels(row);
        debug!(source = %self.name, row = position, columns = header.len(), "detected header row");

        let width = Some(header.len());
        self.buffered = scanned
            .into_iter()
            .skip(position + 1)
            .map(|row| row.map(|cells| fit_to_width(to_cells(cells), width)))
            .collect();
        header
    }
}

impl SourceAdapter for CsvSource {
    fn source_name(&self) -> &str {
        &self.name
    }

    fn header_row(&mut self) -> Result<Vec<String>, SourceError> {
        if let Some(header) = &self.header {
            return Ok(header.clone());
        }
        let header = self.scan_for_header();
        self.header = Some(header.clone());
        Ok(header)
    }

    fn rows(&mut self) -> Box<dyn Iterator<Item = RowResult> + '_> {
        let width = self.header.as_ref().map(Vec::len);
        let buffered = std::mem::take(&mut self.buffered);
        let live = self.reader.records().filter_map(move |record| match record {
            Ok(record) => {
                let cells = record_cells(&record);
                if cells.iter().all(String::is_empty) {
                    trace!("skipped blank row");
                    return None;
                }
                Some(Ok(fit_to_width(to_cells(cells), width)))
            }
            Err(err) => Some(Err(classify(err))),
        });
        Box::new(buffered.into_iter().chain(live))
    }
}

fn record_cells(record: &StringRecord) -> Vec<String> {
    record.iter().map(normalize_label).collect()
}

fn to_cells(cells: Vec<String>) -> Vec<CellValue> {
    cells.into_iter().map(CellValue::text).collect()
}

/// Decoding problems affect one record; anything else stops the reader.
fn classify(err: csv::Error) -> SourceError {
    let line = err.position().map(csv::Position::line);
    match err.kind() {
        csv::ErrorKind::Utf8 { .. } | csv::ErrorKind::UnequalLengths { .. } => SourceError::Row {
            line,
            message: err.to_string(),
            recoverable: true,
        },
        _ => SourceError::Csv(err),
    }
}
