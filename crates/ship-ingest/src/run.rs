//! Incremental ingestion: submit rows one at a time, then finish.

use rayon::prelude::*;
use ship_model::{
    CanonicalRecord, ColumnMapping, Diagnostic, DiagnosticLedger, IngestionResult,
    IngestionSummary,
};

use crate::pipeline::IngestionPipeline;
use crate::source::RowResult;

/// Result of processing a single row.
#[derive(Debug)]
pub(crate) struct RowOutcome {
    record: Option<CanonicalRecord>,
    diagnostics: Vec<Diagnostic>,
}

impl RowOutcome {
    pub(crate) fn accepted(record: CanonicalRecord, diagnostics: Vec<Diagnostic>) -> Self {
        Self {
            record: Some(record),
            diagnostics,
        }
    }

    pub(crate) fn rejected(diagnostics: Vec<Diagnostic>) -> Self {
        Self {
            record: None,
            diagnostics,
        }
    }
}

/// An ingestion in progress.
///
/// Rows are numbered in submission order. A caller may stop submitting at any
/// point; `finish` then returns a valid result covering the rows seen so far.
/// With a worker pool, rows are buffered and processed a batch at a time, and
/// outcomes are applied in row order so the result matches sequential runs.
#[derive(Debug)]
pub struct IngestionRun<'p> {
    pipeline: &'p IngestionPipeline,
    source: String,
    mapping: ColumnMapping,
    pending: Vec<(usize, RowResult)>,
    next_row: usize,
    records: Vec<CanonicalRecord>,
    ledger: DiagnosticLedger,
    summary: IngestionSummary,
}

impl<'p> IngestionRun<'p> {
    pub(crate) fn new(
        pipeline: &'p IngestionPipeline,
        source: String,
        mapping: ColumnMapping,
        file_diagnostics: Vec<Diagnostic>,
    ) -> Self {
        let mut ledger = DiagnosticLedger::new();
        ledger.extend(file_diagnostics);
        Self {
            pipeline,
            source,
            mapping,
            pending: Vec::new(),
            next_row: 0,
            records: Vec::new(),
            ledger,
            summary: IngestionSummary::default(),
        }
    }

    pub fn mapping(&self) -> &ColumnMapping {
        &self.mapping
    }

    /// Rows submitted so far, processed or not.
    pub fn rows_submitted(&self) -> usize {
        self.next_row
    }

    /// Diagnostics for rows already processed.
    pub fn diagnostics(&self) -> &DiagnosticLedger {
        &self.ledger
    }

    /// Queue one row and return its index.
    pub fn submit(&mut self, row: RowResult) -> usize {
        let index = self.next_row;
        self.next_row += 1;
        if self.pipeline.pool().is_none() {
            let outcome = self.pipeline.process_row(&self.mapping, index, row);
            self.absorb(outcome);
            return index;
        }
        self.pending.push((index, row));
        if self.pending.len() >= self.pipeline.config().batch_size.max(1) {
            self.flush();
        }
        index
    }

    pub fn finish(mut self) -> IngestionResult {
        self.flush();
        self.summary.total_rows = self.next_row;
        debug_assert!(self.summary.is_consistent());
        IngestionResult {
            source: self.source,
            mapping: self.mapping,
            records: self.records,
            diagnostics: self.ledger,
            summary: self.summary,
        }
    }

    fn flush(&mut self) {
        if self.pending.is_empty() {
            return;
        }
        let batch = std::mem::take(&mut self.pending);
        let pipeline = self.pipeline;
        let mapping = &self.mapping;
        let process = |(index, row): (usize, RowResult)| pipeline.process_row(mapping, index, row);
        let outcomes: Vec<RowOutcome> = match pipeline.pool() {
            Some(pool) => pool.install(|| batch.into_par_iter().map(process).collect()),
            None => batch.into_iter().map(process).collect(),
        };
        for outcome in outcomes {
            self.absorb(outcome);
        }
    }

    fn absorb(&mut self, outcome: RowOutcome) {
        // Kept errors on optional fields count as well as warnings.
        let warned = !outcome.diagnostics.is_empty();
        self.ledger.extend(outcome.diagnostics);
        match outcome.record {
            Some(record) => {
                self.summary.accepted += 1;
                if warned {
                    self.summary.warned += 1;
                }
                self.records.push(record);
            }
            None => self.summary.rejected += 1,
        }
    }
}
