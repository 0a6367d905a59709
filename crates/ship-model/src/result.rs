//! Final outcome of an ingestion run.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::diagnostic::DiagnosticLedger;
use crate::mapping::ColumnMapping;
use crate::value::CanonicalRecord;

/// Row counts for one run.
///
/// `accepted + rejected == total_rows`; `warned` counts accepted records that
/// carry any diagnostic, including errors kept on optional fields.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IngestionSummary {
    pub total_rows: usize,
    pub accepted: usize,
    pub rejected: usize,
    pub warned: usize,
}

impl IngestionSummary {
    /// Accepted records without any diagnostic.
    pub fn clean(&self) -> usize {
        self.accepted.saturating_sub(self.warned)
    }

    pub fn is_consistent(&self) -> bool {
        self.accepted + self.rejected == self.total_rows && self.warned <= self.accepted
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IngestionResult {
    pub source: String,
    pub mapping: ColumnMapping,
    pub records: Vec<CanonicalRecord>,
    pub diagnostics: DiagnosticLedger,
    pub summary: IngestionSummary,
}

impl IngestionResult {
    /// SHA-256 hex digest of the JSON form. Identical inputs give identical digests.
    pub fn fingerprint(&self) -> Result<String, serde_json::Error> {
        let bytes = serde_json::to_vec(self)?;
        Ok(hex::encode(Sha256::digest(&bytes)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clean_excludes_warned_records() {
        let summary = IngestionSummary {
            total_rows: 10,
            accepted: 8,
            rejected: 2,
            warned: 3,
        };
        assert!(summary.is_consistent());
        assert_eq!(summary.clean(), 5);
    }

    #[test]
    fn fingerprint_changes_with_content() {
        let mut result = IngestionResult {
            source: "a.csv".to_string(),
            mapping: ColumnMapping::default(),
            records: vec![],
            diagnostics: DiagnosticLedger::new(),
            summary: IngestionSummary::default(),
        };
        let first = result.fingerprint().expect("fingerprint");
        assert_eq!(first.len(), 64);
        assert_eq!(first, result.fingerprint().expect("fingerprint"));
        result.source = "b.csv".to_string();
        assert_ne!(first, result.fingerprint().expect("fingerprint"));
    }
}
