//! Writers for the records and diagnostics tables.

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use ship_model::{CanonicalSchema, DiagnosticLedger, IngestionResult};
use tracing::info;

use crate::error::{OutputError, Result};
use crate::format::OutputFormat;
use crate::table::{
    DIAGNOSTIC_COLUMNS, DiagnosticObject, RecordObject, diagnostic_cells, record_cells,
    record_columns,
};

/// Write the accepted records of `result` in `format`.
pub fn write_records<W: Write>(
    writer: W,
    result: &IngestionResult,
    schema: &CanonicalSchema,
    format: OutputFormat,
) -> Result<()> {
    match format {
        OutputFormat::Csv => {
            let mut csv = csv::Writer::from_writer(writer);
            csv.write_record(record_columns(schema))?;
            for record in &result.records {
                csv.write_record(record_cells(record, schema))?;
            }
            csv.flush().map_err(csv::Error::from)?;
        }
        OutputFormat::Json => {
            let objects: Vec<RecordObject<'_>> = result
                .records
                .iter()
                .map(|record| RecordObject { record, schema })
                .collect();
            write_json(writer, &objects)?;
        }
    }
    Ok(())
}

/// Write every ledger entry in `format`, file-level entries included.
pub fn write_diagnostics<W: Write>(
    writer: W,
    diagnostics: &DiagnosticLedger,
    format: OutputFormat,
) -> Result<()> {
    match format {
        OutputFormat::Csv => {
            let mut csv = csv::Writer::from_writer(writer);
            csv.write_record(DIAGNOSTIC_COLUMNS)?;
            for diagnostic in diagnostics {
                csv.write_record(diagnostic_cells(diagnostic))?;
            }
            csv.flush().map_err(csv::Error::from)?;
        }
        OutputFormat::Json => {
            let objects: Vec<DiagnosticObject<'_>> =
                diagnostics.iter().map(DiagnosticObject::from).collect();
            write_json(writer, &objects)?;
        }
    }
    Ok(())
}

fn write_json<W: Write, T: serde::Serialize>(mut writer: W, value: &T) -> Result<()> {
    serde_json::to_writer_pretty(&mut writer, value)?;
    writer.write_all(b"\n").map_err(serde_json::Error::io)?;
    writer.flush().map_err(serde_json::Error::io)?;
    Ok(())
}

/// Write `<stem>_records.<ext>` and `<stem>_diagnostics.<ext>` into `dir` for
/// each requested format, returning the paths written.
pub fn write_outputs(
    dir: &Path,
    result: &IngestionResult,
    schema: &CanonicalSchema,
    formats: &[OutputFormat],
) -> Result<Vec<PathBuf>> {
    fs::create_dir_all(dir).map_err(|source| OutputError::Io {
        path: dir.to_path_buf(),
        source,
    })?;
    let stem = output_stem(&result.source);
    let mut written = Vec::new();
    for &format in formats {
        let records_path = dir.join(format!("{stem}_records.{}", format.extension()));
        write_records(create(&records_path)?, result, schema, format)?;
        written.push(records_path);

        let diagnostics_path = dir.join(format!("{stem}_diagnostics.{}", format.extension()));
        write_diagnostics(create(&diagnostics_path)?, &result.diagnostics, format)?;
        written.push(diagnostics_path);
    }
    info!(source = %result.source, files = written.len(), "outputs written");
    Ok(written)
}

fn create(path: &Path) -> Result<BufWriter<File>> {
    let file = File::create(path).map_err(|source| OutputError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(BufWriter::new(file))
}

/// File stem of the source name, or `output` when there is none.
pub fn output_stem(source: &str) -> String {
    Path::new(source)
        .file_stem()
        .and_then(|stem| stem.to_str())
        .filter(|stem| !stem.is_empty())
        .unwrap_or("output")
        .to_string()
}
