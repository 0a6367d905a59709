//! The ingestion pipeline: header, mapping, rows, result.

use std::sync::Arc;

use ship_map::{ColumnMapper, MappingCache};
use ship_model::{
    CanonicalRecord, CanonicalSchema, CellValue, ColumnMapping, Diagnostic, DiagnosticCode,
    FieldValue, IngestionResult,
};
use ship_normalize::FieldNormalizer;
use ship_validate::RecordValidator;
use tracing::{debug, info, info_span, trace, warn};

use crate::config::{IngestConfig, OptionalFieldErrors, Parallelism};
use crate::error::{IngestError, Result};
use crate::run::{IngestionRun, RowOutcome};
use crate::source::{RowResult, SourceAdapter};

const REDACTED_VALUE: &str = "[REDACTED]";

/// Turns one tabular source into an [`IngestionResult`] for a fixed schema.
///
/// The pipeline is immutable once built and may be reused for any number of
/// sources. Fatal errors are limited to an empty source, unmapped required
/// fields and configuration problems; every row-level problem ends up in the
/// diagnostic ledger instead.
#[derive(Debug)]
pub struct IngestionPipeline {
    schema: CanonicalSchema,
    config: IngestConfig,
    normalizer: FieldNormalizer,
    mapper: ColumnMapper,
    validator: RecordValidator,
    cache: Option<Arc<MappingCache>>,
    pool: Option<rayon::ThreadPool>,
}

impl IngestionPipeline {
    pub fn new(schema: CanonicalSchema, config: IngestConfig) -> Result<Self> {
        schema.validate()?;
        let normalizer = FieldNormalizer::for_schema(&schema, config.normalize.clone())?;
        for derivation in &config.derivations {
            derivation.check(&schema)?;
        }
        let mapper = ColumnMapper::new(config.mapping.clone()).with_normalizer(normalizer.clone());
        let pool = match config.parallelism {
            Parallelism::Sequential => None,
            Parallelism::Pool(threads) => Some(
                rayon::ThreadPoolBuilder::new()
                    .num_threads(threads)
                    .thread_name(|idx| format!("ship-ingest-{idx}"))
                    .build()?,
            ),
        };
        Ok(Self {
            schema,
            config,
            normalizer,
            mapper,
            validator: RecordValidator::new(),
            cache: None,
            pool,
        })
    }

    #[must_use]
    pub fn with_validator(mut self, validator: RecordValidator) -> Self {
        self.validator = validator;
        self
    }

    /// Share mappings between sources whose headers are identical.
    #[must_use]
    pub fn with_cache(mut self, cache: Arc<MappingCache>) -> Self {
        self.cache = Some(cache);
        self
    }

    pub fn schema(&self) -> &CanonicalSchema {
        &self.schema
    }

    pub fn config(&self) -> &IngestConfig {
        &self.config
    }

    pub(crate) fn pool(&self) -> Option<&rayon::ThreadPool> {
        self.pool.as_ref()
    }

    /// Map `header` using `samples` for content sniffing. Name scores come
    /// from the cache when one is attached; sniffing always uses `samples`.
    pub fn compute_mapping(&self, header: &[String], samples: &[Vec<CellValue>]) -> ColumnMapping {
        match &self.cache {
            Some(cache) => {
                let scores = cache.get_or_insert_with(&self.schema.name, header, || {
                    self.mapper.score_names(header, &self.schema)
                });
                self.mapper.map_scored(&scores, &self.schema, samples)
            }
            None => self.mapper.map_with_samples(header, &self.schema, samples),
        }
    }

    /// Begin an incremental run with a precomputed mapping.
    ///
    /// Fails when a required field has no column. Each dropped column is
    /// recorded as a file-level warning.
    pub fn start(&self, source: impl Into<String>, mapping: ColumnMapping) -> Result<IngestionRun<'_>> {
        let source = source.into();
        let missing = mapping.missing_required(&self.schema);
        if !missing.is_empty() {
            warn!(source = %source, missing = ?missing, "required fields have no column");
            return Err(IngestError::SchemaMismatch {
                name: source,
                missing,
            });
        }

        let levels = self.config.mapping.thresholds.count_by_level(&mapping);
        info!(
            source = %source,
            mapped = mapping.assignments.len(),
            unmapped_columns = mapping.unmapped_columns.len(),
            unmapped_fields = mapping.unmapped_fields.len(),
            levels = ?levels,
            "column mapping computed"
        );
        let dropped: Vec<Diagnostic> = mapping
            .unmapped_columns
            .iter()
            .map(|column| {
                debug!(column = %column, "column dropped");
                Diagnostic::warning(
                    DiagnosticCode::UnmappedColumn,
                    format!("column '{column}' does not match any field and was dropped"),
                )
            })
            .collect();
        Ok(IngestionRun::new(self, source, mapping, dropped))
    }

    /// Ingest a whole source.
    pub fn run<S>(&self, source: &mut S) -> Result<IngestionResult>
    where
        S: SourceAdapter + ?Sized,
    {
        let name = source.source_name().to_string();
        let span = info_span!("ingest", source = %name);
        let _guard = span.enter();
        info!("ingestion started");

        let header = info_span!("header_read").in_scope(|| source.header_row())?;
        if header.is_empty() {
            warn!("source has no header");
            return Err(IngestError::EmptySource { name });
        }

        let mut rows = source.rows();
        let mut buffered: Vec<RowResult> = Vec::new();
        while buffered.len() < self.config.mapping.sample_size.max(1) {
            let Some(row) = rows.next() else {
                break;
            };
            let fatal = is_fatal(&row);
            buffered.push(row);
            if fatal {
                break;
            }
        }
        if buffered.is_empty() {
            warn!("source has no data rows");
            return Err(IngestError::EmptySource { name });
        }

        let mut run = info_span!("mapping").in_scope(|| {
            let samples: Vec<Vec<CellValue>> = buffered
                .iter()
                .filter_map(|row| row.as_ref().ok().cloned())
                .collect();
            let mapping = self.compute_mapping(&header, &samples);
            self.start(name.as_str(), mapping)
        })?;

        let stream_ended = buffered.last().is_some_and(is_fatal);
        {
            let span = info_span!("row_processing");
            let _rows = span.enter();
            let remaining = (!stream_ended).then_some(rows);
            for row in buffered.into_iter().chain(remaining.into_iter().flatten()) {
                let fatal = is_fatal(&row);
                if let Err(err) = &row
                    && fatal
                {
                    warn!(error = %err, "source stopped; finishing with rows read so far");
                }
                run.submit(row);
                if fatal {
                    break;
                }
            }
        }

        let result = info_span!("finalize").in_scope(|| run.finish());
        info!(
            total = result.summary.total_rows,
            accepted = result.summary.accepted,
            rejected = result.summary.rejected,
            warned = result.summary.warned,
            "ingestion finished"
        );
        Ok(result)
    }

    /// Normalize and validate one row against `mapping`.
    pub(crate) fn process_row(&self, mapping: &ColumnMapping, index: usize, row: RowResult) -> RowOutcome {
        let cells = match row {
            Ok(cells) => cells,
            Err(err) => {
                trace!(row = index, error = %err, "row unreadable");
                let diagnostic =
                    Diagnostic::error(DiagnosticCode::SourceRead, err.to_string()).at_row(index);
                return RowOutcome::rejected(vec![diagnostic]);
            }
        };

        let mut record = CanonicalRecord::new(index);
        let mut diagnostics = Vec::new();
        let mut blocking = false;
        for field in &self.schema.fields {
            let Some(position) = mapping.column_index(&field.name) else {
                record.insert(&field.name, FieldValue::Missing);
                continue;
            };
            let raw = cells.get(position).unwrap_or(&CellValue::Empty);
            let normalized = self.normalizer.normalize_field(raw, field);
            let mut value = normalized.value;
            if let Some(issue) = normalized.issue {
                trace!(
                    row = index,
                    field = %field.name,
                    code = %issue.code,
                    raw = %self.redact(&raw.display_text()),
                    "field issue"
                );
                if issue.is_error() {
                    record.flag(&field.name);
                    let keep = !field.required
                        && self.config.optional_field_errors == OptionalFieldErrors::Keep;
                    if keep {
                        value = FieldValue::Missing;
                    } else {
                        blocking = true;
                    }
                }
                diagnostics.push(issue.at_row(index));
            }
            record.insert(&field.name, value);
        }
        for derivation in &self.config.derivations {
            if let Some(issue) = derivation.apply(&mut record) {
                diagnostics.push(issue.at_row(index));
            }
        }

        let checks = self.validator.validate(&record, &self.schema);
        blocking |= checks.iter().any(Diagnostic::is_error);
        diagnostics.extend(checks);
        trace!(
            row = index,
            accepted = !blocking,
            issues = diagnostics.len(),
            "row processed"
        );
        if blocking {
            RowOutcome::rejected(diagnostics)
        } else {
            RowOutcome::accepted(record, diagnostics)
        }
    }

    fn redact<'a>(&self, value: &'a str) -> &'a str {
        if self.config.log_data {
            value
        } else {
            REDACTED_VALUE
        }
    }
}

fn is_fatal(row: &RowResult) -> bool {
    row.as_ref().is_err_and(|err| !err.is_recoverable())
}
