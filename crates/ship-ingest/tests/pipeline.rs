use std::io::Write;
use std::sync::Arc;

use ship_ingest::{
    CsvOptions, CsvSource, IngestConfig, IngestError, IngestionPipeline, MemorySource,
    OptionalFieldErrors, Parallelism, SourceError,
};
use ship_map::MappingCache;
use ship_model::{
    CanonicalSchema, DiagnosticCode, FieldDef, FieldValue, IngestionResult, SemanticType, Severity,
};
use ship_normalize::Derivation;
use ship_validate::{RecordValidator, Rule};

const HEADER: &[&str] = &["Tracking #", "Ship Dt", "Origin", "Dest", "Wt (kg)", "Status", "Remarks"];

fn schema() -> CanonicalSchema {
    CanonicalSchema::new(
        "shipment",
        vec![
            FieldDef::new("trackingId", SemanticType::identifier(None))
                .required()
                .with_aliases(["tracking number", "awb"]),
            FieldDef::new("shipDate", SemanticType::Date).required(),
            FieldDef::new("origin", SemanticType::String).required(),
            FieldDef::new("destination", SemanticType::String).required(),
            FieldDef::new("weight", SemanticType::Decimal),
            FieldDef::new(
                "status",
                SemanticType::enumeration(["Pending", "InTransit", "Delivered"]),
            ),
        ],
    )
}

fn pipeline(config: IngestConfig) -> IngestionPipeline {
    IngestionPipeline::new(schema(), config)
        .expect("valid pipeline")
        .with_validator(
            RecordValidator::new()
                .with_rule(Rule::not_equal("origin", "destination"))
                .with_rule(Rule::positive("weight")),
        )
}

fn mixed_source() -> MemorySource {
    MemorySource::from_text(
        "mixed.csv",
        HEADER,
        &[
            &["1Z001", "2024-03-01", "Rotterdam", "Hamburg", "12.5", "Delivered", ""],
            &["1Z002", "03/04/2024", "Antwerp", "Le Havre", "1,250.75", "InTransit", "fragile"],
            &["", "2024-03-02", "Rotterdam", "Bremen", "3", "Pending", ""],
            &["1Z004", "2024-03-05", "Hamburg", "Hamburg", "4", "In-Transt", ""],
            &["1Z005", "31/02/2024", "Rotterdam", "Oslo", "heavy", "Pending", ""],
        ],
    )
}

fn run(config: IngestConfig, mut source: MemorySource) -> IngestionResult {
    pipeline(config).run(&mut source).expect("ingestion succeeds")
}

#[test]
fn counts_add_up_and_ledger_rows_are_in_range() {
    let result = run(IngestConfig::default(), mixed_source());

    assert_eq!(result.summary.total_rows, 5);
    assert_eq!(result.summary.accepted, 2);
    assert_eq!(result.summary.rejected, 3);
    assert_eq!(result.summary.warned, 1);
    assert!(result.summary.is_consistent());
    for diagnostic in &result.diagnostics {
        if let Some(row) = diagnostic.row {
            assert!(row < result.summary.total_rows);
        }
    }
    let rows: Vec<usize> = result.records.iter().map(|record| record.row_index).collect();
    assert_eq!(rows, vec![0, 1]);
}

#[test]
fn every_row_problem_lands_in_the_ledger() {
    let result = run(IngestConfig::default(), mixed_source());
    let codes: Vec<(Option<usize>, DiagnosticCode)> = result
        .diagnostics
        .iter()
        .map(|diagnostic| (diagnostic.row, diagnostic.code))
        .collect();
    assert_eq!(
        codes,
        vec![
            (None, DiagnosticCode::UnmappedColumn),
            (Some(1), DiagnosticCode::AmbiguousDate),
            (Some(2), DiagnosticCode::RequiredFieldMissing),
            (Some(3), DiagnosticCode::UnknownEnumValue),
            (Some(3), DiagnosticCode::RuleViolation),
            (Some(4), DiagnosticCode::InvalidDate),
            (Some(4), DiagnosticCode::InvalidDecimal),
        ]
    );
    let enum_issue = &result.diagnostics.entries()[3];
    assert!(enum_issue.message.contains("InTransit"), "{}", enum_issue.message);
    assert_eq!(enum_issue.raw.as_deref(), Some("In-Transt"));
}

#[test]
fn blank_tracking_id_gives_exactly_one_error() {
    let result = run(IngestConfig::default(), mixed_source());
    let row_two: Vec<_> = result
        .diagnostics
        .iter()
        .filter(|diagnostic| diagnostic.row == Some(2))
        .collect();
    assert_eq!(row_two.len(), 1);
    assert_eq!(row_two[0].severity, Severity::Error);
    assert_eq!(row_two[0].field.as_deref(), Some("trackingId"));
}

#[test]
fn ambiguous_date_follows_configured_order() {
    let result = run(IngestConfig::default(), mixed_source());
    assert_eq!(result.records[1].value("shipDate").render(), "2024-04-03");
    assert_eq!(result.records[1].value("weight"), &FieldValue::Decimal(1250.75));
}

#[test]
fn fingerprint_is_stable_across_runs_and_execution_modes() {
    let first = run(IngestConfig::default(), mixed_source());
    let second = run(IngestConfig::default(), mixed_source());
    let pooled = run(
        IngestConfig::default()
            .with_parallelism(Parallelism::Pool(3))
            .with_batch_size(2),
        mixed_source(),
    );
    let fingerprint = first.fingerprint().expect("fingerprint");
    assert_eq!(fingerprint, second.fingerprint().expect("fingerprint"));
    assert_eq!(fingerprint, pooled.fingerprint().expect("fingerprint"));
    assert_eq!(first, pooled);
}

#[test]
fn unmapped_required_field_is_fatal() {
    let mut source = MemorySource::from_text(
        "no-tracking.csv",
        &["Ship Date", "Origin", "Destination", "Weight"],
        &[&["2024-03-01", "Rotterdam", "Hamburg", "1"]],
    );
    let err = pipeline(IngestConfig::default())
        .run(&mut source)
        .expect_err("schema mismatch");
    match err {
        IngestError::SchemaMismatch { name, missing } => {
            assert_eq!(name, "no-tracking.csv");
            assert_eq!(missing, vec!["trackingId"]);
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn header_without_rows_is_an_empty_source() {
    let mut source = MemorySource::from_text("header-only.csv", HEADER, &[]);
    let err = pipeline(IngestConfig::default())
        .run(&mut source)
        .expect_err("empty source");
    assert!(matches!(err, IngestError::EmptySource { .. }));

    let mut source = MemorySource::from_text("blank.csv", &[], &[]);
    assert!(matches!(
        pipeline(IngestConfig::default()).run(&mut source),
        Err(IngestError::EmptySource { .. })
    ));
}

#[test]
fn unrecoverable_source_error_ends_the_stream() {
    let source = MemorySource::from_text(
        "broken.csv",
        HEADER,
        &[&["1Z001", "2024-03-01", "Rotterdam", "Hamburg", "1", "Pending", ""]],
    )
    .with_row_error(SourceError::row("connection reset", false))
    .with_row(
        ["1Z003", "2024-03-01", "Rotterdam", "Oslo", "1", "Pending", ""]
            .into_iter()
            .map(Into::into)
            .collect(),
    );
    let result = run(IngestConfig::default(), source);
    assert_eq!(result.summary.total_rows, 2);
    assert_eq!(result.summary.accepted, 1);
    assert_eq!(result.summary.rejected, 1);
    assert_eq!(result.diagnostics.count_code(DiagnosticCode::SourceRead), 1);
}

#[test]
fn recoverable_source_error_rejects_only_that_row() {
    let source = MemorySource::from_text(
        "latin1.csv",
        HEADER,
        &[&["1Z001", "2024-03-01", "Rotterdam", "Hamburg", "1", "Pending", ""]],
    )
    .with_row_error(SourceError::row("invalid UTF-8", true))
    .with_row(
        ["1Z003", "2024-03-01", "Rotterdam", "Oslo", "1", "Pending", ""]
            .into_iter()
            .map(Into::into)
            .collect(),
    );
    let result = run(IngestConfig::default(), source);
    assert_eq!(result.summary.total_rows, 3);
    assert_eq!(result.summary.accepted, 2);
    let read_error = result
        .diagnostics
        .iter()
        .find(|diagnostic| diagnostic.code == DiagnosticCode::SourceRead)
        .expect("source read diagnostic");
    assert_eq!(read_error.row, Some(1));
}

#[test]
fn keep_mode_accepts_records_with_bad_optional_fields() {
    let source = MemorySource::from_text(
        "keep.csv",
        HEADER,
        &[&["1Z001", "2024-03-01", "Rotterdam", "Hamburg", "heavy", "Pending", ""]],
    );
    let result = run(
        IngestConfig::default().with_optional_field_errors(OptionalFieldErrors::Keep),
        source,
    );
    assert_eq!(result.summary.accepted, 1);
    assert_eq!(result.summary.warned, 1);
    assert_eq!(result.summary.clean(), 0);
    assert!(result.records[0].is_missing("weight"));
    assert_eq!(result.diagnostics.count_code(DiagnosticCode::InvalidDecimal), 1);
}

#[test]
fn incremental_run_can_stop_early() {
    let pipeline = pipeline(IngestConfig::default());
    let header: Vec<String> = HEADER.iter().map(|label| (*label).to_string()).collect();
    let mapping = pipeline.compute_mapping(&header, &[]);

    let empty = pipeline.start("cancelled.csv", mapping.clone()).expect("start");
    let result = empty.finish();
    assert_eq!(result.summary.total_rows, 0);
    assert_eq!(result.diagnostics.count_code(DiagnosticCode::UnmappedColumn), 1);

    let mut run = pipeline.start("partial.csv", mapping).expect("start");
    let row = ["1Z001", "2024-03-01", "Rotterdam", "Hamburg", "1", "Pending", ""]
        .into_iter()
        .map(Into::into)
        .collect::<Vec<_>>();
    assert_eq!(run.submit(Ok(row.clone())), 0);
    assert_eq!(run.submit(Ok(row)), 1);
    assert_eq!(run.rows_submitted(), 2);
    let result = run.finish();
    assert_eq!(result.summary.accepted, 2);
    assert!(result.summary.is_consistent());
}

#[test]
fn mapping_cache_is_shared_between_sources() {
    let cache = Arc::new(MappingCache::new());
    let pipeline = pipeline(IngestConfig::default()).with_cache(Arc::clone(&cache));
    let first = pipeline.run(&mut mixed_source()).expect("first");
    let second = pipeline.run(&mut mixed_source()).expect("second");
    assert_eq!(cache.len(), 1);
    assert_eq!(first.mapping, second.mapping);
}

#[test]
fn cached_header_still_sniffs_each_file() {
    let schema = CanonicalSchema::new(
        "dated",
        vec![
            FieldDef::new("tracking", SemanticType::identifier(None)).required(),
            FieldDef::new("date", SemanticType::Date).required(),
        ],
    );
    let header = &["Tracking", "Date", "date"];
    let mut first_file = MemorySource::from_text(
        "a.csv",
        header,
        &[
            &["A1", "2024-03-01", "n/a"],
            &["A2", "2024-03-02", "n/a"],
            &["A3", "2024-03-03", "n/a"],
        ],
    );
    let second_rows: &[&[&str]] = &[
        &["B1", "tbc", "2024-04-01"],
        &["B2", "tbc", "2024-04-02"],
        &["B3", "tbc", "2024-04-03"],
    ];

    let alone = IngestionPipeline::new(schema.clone(), IngestConfig::default())
        .expect("valid pipeline")
        .run(&mut MemorySource::from_text("b.csv", header, second_rows))
        .expect("second file alone");

    let cache = Arc::new(MappingCache::new());
    let shared = IngestionPipeline::new(schema, IngestConfig::default())
        .expect("valid pipeline")
        .with_cache(Arc::clone(&cache));
    let first = shared.run(&mut first_file).expect("first file");
    let second = shared
        .run(&mut MemorySource::from_text("b.csv", header, second_rows))
        .expect("second file");

    assert_eq!(cache.len(), 1);
    assert_eq!(first.mapping.column_index("date"), Some(1));
    assert_eq!(second.mapping.column_index("date"), Some(2));
    assert_eq!(second.summary.accepted, 3);
    assert_eq!(
        second.fingerprint().expect("fingerprint"),
        alone.fingerprint().expect("fingerprint")
    );
}

#[test]
fn dirty_values_in_a_required_column_are_reported_per_row() {
    let schema = CanonicalSchema::new(
        "weights",
        vec![
            FieldDef::new("trackingId", SemanticType::identifier(None))
                .required()
                .with_aliases(["tracking number"]),
            FieldDef::new("weight", SemanticType::Decimal).required(),
        ],
    );
    let mut source = MemorySource::from_text(
        "d.csv",
        &["Tracking #", "Wt (kg)"],
        &[
            &["1Z001", "12 kg"],
            &["1Z002", "13 kg"],
            &["1Z003", "n/a"],
            &["1Z004", "14"],
        ],
    );
    let result = IngestionPipeline::new(schema, IngestConfig::default())
        .expect("valid pipeline")
        .run(&mut source)
        .expect("dirty column still maps");

    assert_eq!(result.mapping.column_index("weight"), Some(1));
    assert_eq!(result.summary.total_rows, 4);
    assert_eq!(result.summary.accepted, 1);
    assert_eq!(result.diagnostics.count_code(DiagnosticCode::InvalidDecimal), 3);
}

fn fixture_schema() -> CanonicalSchema {
    CanonicalSchema::new(
        "fixture",
        vec![
            FieldDef::new("vessel", SemanticType::String).required(),
            FieldDef::new("quantity", SemanticType::Decimal),
            FieldDef::new("freight", SemanticType::String),
            FieldDef::new("freightTotal", SemanticType::Decimal),
        ],
    )
}

#[test]
fn freight_total_is_derived_from_the_quote() {
    let config = IngestConfig::default().with_derivations(vec![Derivation::freight_total(
        "freightTotal",
        "freight",
        "quantity",
    )]);
    let pipeline = IngestionPipeline::new(fixture_schema(), config)
        .expect("valid pipeline")
        .with_validator(RecordValidator::new().with_rule(
            Rule::positive("freightTotal").with_severity(Severity::Warning),
        ));
    let mut source = MemorySource::from_text(
        "fixtures.csv",
        &["Vessel", "Qty", "Freight"],
        &[
            &["Nordic Star", "30,000", "USD 12.5 pmt"],
            &["Aegean Sea", "32000", "USD 2.15M Lumpsum"],
            &["Baltic Wave", "5000", "USD 850K"],
            &["Caspian Dawn", "10000", "RNR"],
            &["Dover Strait", "10000", "on subs"],
        ],
    );

    let result = pipeline.run(&mut source).expect("ingestion succeeds");

    assert_eq!(result.mapping.column_index("freight"), Some(2));
    assert_eq!(result.mapping.column_index("freightTotal"), None);
    assert_eq!(result.summary.accepted, 5);
    let totals: Vec<&FieldValue> = result
        .records
        .iter()
        .map(|record| record.value("freightTotal"))
        .collect();
    assert_eq!(
        totals,
        vec![
            &FieldValue::Decimal(375_000.0),
            &FieldValue::Decimal(2_150_000.0),
            &FieldValue::Decimal(850_000.0),
            &FieldValue::Missing,
            &FieldValue::Missing,
        ]
    );
    assert_eq!(
        result.records[0].value("freight"),
        &FieldValue::Text("USD 12.5 pmt".to_string())
    );
    assert_eq!(result.diagnostics.count_code(DiagnosticCode::InvalidFreight), 1);
    assert_eq!(result.diagnostics.count_code(DiagnosticCode::RuleViolation), 0);
    assert_eq!(result.summary.warned, 1);
}

#[test]
fn derivation_with_unknown_fields_is_a_configuration_error() {
    let config = IngestConfig::default().with_derivations(vec![Derivation::freight_total(
        "total",
        "freight",
        "quantity",
    )]);
    let err = IngestionPipeline::new(fixture_schema(), config).expect_err("unknown target");
    assert!(matches!(err, IngestError::Normalize(_)));
    assert!(err.to_string().contains("total"));
}

#[test]
fn csv_file_with_title_line_ingests() {
    let dir = tempfile::tempdir().expect("temp dir");
    let path = dir.path().join("shipments.csv");
    let mut file = std::fs::File::create(&path).expect("create csv");
    writeln!(file, "Carrier export,,,,,").expect("write");
    writeln!(file, "Tracking #,Ship Dt,Origin,Dest,Wt (kg),Status").expect("write");
    writeln!(file, "1Z001,2024-03-01,Rotterdam,Hamburg,12.5,Delivered").expect("write");
    writeln!(file, ",,,,,").expect("write");
    writeln!(file, "1Z002,2024-03-02,Antwerp,Oslo,\"1,100\",Pending").expect("write");
    drop(file);

    let mut source = CsvSource::open(&path, CsvOptions::default()).expect("open csv");
    let result = pipeline(IngestConfig::default())
        .run(&mut source)
        .expect("ingest csv");
    assert_eq!(result.source, "shipments.csv");
    assert_eq!(result.summary.total_rows, 2);
    assert_eq!(result.summary.accepted, 2);
    assert!(result.diagnostics.is_empty());
    assert_eq!(result.records[1].value("weight"), &FieldValue::Decimal(1100.0));
}

#[test]
fn missing_file_is_a_source_error() {
    let dir = tempfile::tempdir().expect("temp dir");
    let err = CsvSource::open(&dir.path().join("absent.csv"), CsvOptions::default())
        .err()
        .expect("open fails");
    assert!(matches!(err, SourceError::Io { .. }));
}
