use std::fs;
use std::path::Path;

use clap::Parser;
use ship_cli::cli::{Cli, Command, IngestArgs};
use ship_cli::commands::{ingest_config, run_ingest, schema_table};
use ship_cli::summary::{issue_table, summary_table};
use ship_ingest::{OptionalFieldErrors, Parallelism};
use ship_normalize::{DateOrder, DecimalSeparator};
use ship_standards::load_profile_from;

const SHIPMENTS: &str = "\
Tracking Number,Ship Date,Origin,Destination,Weight,Status
1Z999AA10123456784,2024-03-01,Rotterdam,Hamburg,12 kg,Delivered
1Z999AA10123456785,2024-03-02,Antwerp,Antwerp,3,Pending
";

const CLEAN: &str = "\
Tracking Number,Ship Date,Origin,Destination,Weight,Status
1Z999AA10123456786,2024-03-04,Oslo,Bergen,7.5,In Transit
";

fn ingest_args(args: &[&str]) -> IngestArgs {
    let mut argv = vec!["ship", "ingest"];
    argv.extend_from_slice(args);
    match Cli::try_parse_from(argv).expect("arguments parse").command {
        Command::Ingest(args) => args,
        _ => panic!("expected the ingest command"),
    }
}

fn write(dir: &Path, name: &str, contents: &str) -> String {
    let path = dir.join(name);
    fs::write(&path, contents).expect("write input");
    path.display().to_string()
}

#[test]
fn ingest_writes_both_tables_and_counts_rejections() {
    let dir = tempfile::tempdir().expect("temp dir");
    let input = write(dir.path(), "shipments.csv", SHIPMENTS);
    let out = dir.path().join("out");
    let out_arg = out.display().to_string();

    let report = run_ingest(&ingest_args(&[&input, "--output-dir", &out_arg]), false)
        .expect("ingest runs");

    assert_eq!(report.profile, "shipment");
    let totals = report.totals();
    assert_eq!(totals.total_rows, 2);
    assert_eq!(totals.accepted, 1);
    assert_eq!(totals.rejected, 1);
    assert!(report.has_errors());

    let outputs = &report.files[0].outputs;
    assert_eq!(outputs.len(), 4);
    for name in [
        "shipments_records.csv",
        "shipments_diagnostics.csv",
        "shipments_records.json",
        "shipments_diagnostics.json",
    ] {
        assert!(out.join(name).is_file(), "{name} written");
    }
    let records = fs::read_to_string(out.join("shipments_records.csv")).expect("records");
    assert!(records.contains("1Z999AA10123456784"));
    assert!(!records.contains("1Z999AA10123456785"));
}

#[test]
fn dry_run_writes_nothing() {
    let dir = tempfile::tempdir().expect("temp dir");
    let input = write(dir.path(), "clean.csv", CLEAN);

    let report = run_ingest(&ingest_args(&[&input, "--dry-run", "--format", "json"]), false)
        .expect("ingest runs");

    assert!(report.dry_run);
    assert!(report.files[0].outputs.is_empty());
    assert!(!dir.path().join("output").exists());
    assert!(!report.has_errors());
    assert_eq!(report.totals().accepted, 1);
}

#[test]
fn default_output_directory_sits_beside_the_input() {
    let dir = tempfile::tempdir().expect("temp dir");
    let input = write(dir.path(), "clean.csv", CLEAN);

    let report = run_ingest(&ingest_args(&[&input, "--format", "csv"]), false).expect("ingest runs");

    assert_eq!(report.files[0].outputs.len(), 2);
    assert!(dir.path().join("output").join("clean_records.csv").is_file());
}

#[test]
fn a_failing_file_does_not_stop_the_others() {
    let dir = tempfile::tempdir().expect("temp dir");
    let missing = dir.path().join("missing.csv").display().to_string();
    let input = write(dir.path(), "clean.csv", CLEAN);

    let report =
        run_ingest(&ingest_args(&[&missing, &input, "--dry-run"]), false).expect("ingest runs");

    assert_eq!(report.failed_files(), 1);
    assert!(report.files[0].failed());
    assert!(!report.files[1].failed());
    assert_eq!(report.totals().accepted, 1);
    assert!(report.has_errors());
}

#[test]
fn headerless_file_is_reported_as_failed() {
    let dir = tempfile::tempdir().expect("temp dir");
    let input = write(dir.path(), "empty.csv", "");

    let report = run_ingest(&ingest_args(&[&input, "--dry-run"]), false).expect("ingest runs");

    let error = report.files[0].result.as_ref().expect_err("empty file fails");
    assert!(error.contains("empty.csv"), "{error}");
}

#[test]
fn unknown_profile_aborts_the_command() {
    let dir = tempfile::tempdir().expect("temp dir");
    let input = write(dir.path(), "clean.csv", CLEAN);

    let error = run_ingest(&ingest_args(&[&input, "--profile", "no-such-profile"]), false)
        .expect_err("unknown profile");
    assert!(format!("{error:#}").contains("no-such-profile"));
}

#[test]
fn command_line_flags_override_profile_options() {
    let profile = load_profile_from("shipment", None).expect("shipment profile");
    let args = ingest_args(&[
        "a.csv",
        "--threads",
        "4",
        "--date-order",
        "month-first",
        "--decimal-comma",
        "--keep-invalid-optional",
    ]);

    let config = ingest_config(&profile, &args, true);

    assert_eq!(config.parallelism, Parallelism::Pool(4));
    assert_eq!(config.normalize.date_order, DateOrder::MonthFirst);
    assert_eq!(config.normalize.decimal_separator, DecimalSeparator::Comma);
    assert_eq!(config.optional_field_errors, OptionalFieldErrors::Keep);
    assert!(config.log_data);
    assert_eq!(config.normalize.units, profile.normalize.units);
}

#[test]
fn profile_options_apply_without_flags() {
    let profile = load_profile_from("fixture", None).expect("fixture profile");
    let config = ingest_config(&profile, &ingest_args(&["a.csv"]), false);

    assert_eq!(config.parallelism, Parallelism::Sequential);
    assert_eq!(config.mapping, profile.mapping);
    assert_eq!(config.optional_field_errors, OptionalFieldErrors::Reject);
    assert_eq!(config.derivations, profile.derivations);
    assert_eq!(config.derivations.len(), 1);
}

#[test]
fn zero_threads_is_rejected() {
    assert!(Cli::try_parse_from(["ship", "ingest", "a.csv", "--threads", "0"]).is_err());
}

#[test]
fn tables_show_fields_and_grouped_diagnostics() {
    let profile = load_profile_from("shipment", None).expect("shipment profile");
    let schema = schema_table(&profile).to_string();
    assert!(schema.contains("trackingId"));
    assert!(schema.contains("identifier"));

    let dir = tempfile::tempdir().expect("temp dir");
    let input = write(dir.path(), "shipments.csv", SHIPMENTS);
    let report = run_ingest(&ingest_args(&[&input, "--dry-run"]), false).expect("ingest runs");

    assert!(summary_table(&report).to_string().contains("TOTAL"));
    let issues = issue_table(&report).expect("diagnostics present").to_string();
    assert!(issues.contains("rule_violation"));
}

#[test]
fn unwritable_output_fails_only_that_file() {
    let dir = tempfile::tempdir().expect("temp dir");
    let blocked = dir.path().join("blocked");
    let open = dir.path().join("open");
    fs::create_dir_all(&blocked).expect("blocked dir");
    fs::create_dir_all(&open).expect("open dir");
    // A regular file where the output directory would go.
    fs::write(blocked.join("output"), "not a directory").expect("write blocker");
    let first = write(&blocked, "first.csv", CLEAN);
    let second = write(&open, "second.csv", CLEAN);

    let report = run_ingest(&ingest_args(&[&first, &second, "--format", "csv"]), false)
        .expect("ingest runs");

    assert_eq!(report.failed_files(), 1);
    let error = report.files[0].result.as_ref().expect_err("write fails");
    assert!(error.contains("write outputs"), "{error}");
    assert!(report.files[0].outputs.is_empty());
    assert!(!report.files[1].failed());
    assert_eq!(report.files[1].outputs.len(), 2);
    assert!(open.join("output").join("second_records.csv").is_file());
    assert!(report.has_errors());
}
