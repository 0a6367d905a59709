use std::path::PathBuf;

use ship_model::{IngestionResult, IngestionSummary};

/// Outcome of `ship ingest` across every input file.
#[derive(Debug)]
pub struct IngestReport {
    pub profile: String,
    pub files: Vec<FileReport>,
    pub dry_run: bool,
}

#[derive(Debug)]
pub struct FileReport {
    pub path: PathBuf,
    /// The ingestion result, or the fatal error that stopped the file.
    pub result: Result<IngestionResult, String>,
    pub outputs: Vec<PathBuf>,
}

impl FileReport {
    pub fn summary(&self) -> Option<&IngestionSummary> {
        self.result.as_ref().ok().map(|result| &result.summary)
    }

    pub fn failed(&self) -> bool {
        self.result.is_err()
    }
}

impl IngestReport {
    /// Sum of the per-file summaries; failed files contribute nothing.
    pub fn totals(&self) -> IngestionSummary {
        self.files
            .iter()
            .filter_map(FileReport::summary)
            .fold(IngestionSummary::default(), |acc, summary| IngestionSummary {
                total_rows: acc.total_rows + summary.total_rows,
                accepted: acc.accepted + summary.accepted,
                rejected: acc.rejected + summary.rejected,
                warned: acc.warned + summary.warned,
            })
    }

    pub fn failed_files(&self) -> usize {
        self.files.iter().filter(|file| file.failed()).count()
    }

    /// True when a file failed fatally or any record was rejected.
    pub fn has_errors(&self) -> bool {
        self.failed_files() > 0 || self.totals().rejected > 0
    }
}
