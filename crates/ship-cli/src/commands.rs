use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use comfy_table::Table;
use tracing::{info, info_span, warn};

use ship_ingest::{
    CsvOptions, CsvSource, IngestConfig, IngestionPipeline, OptionalFieldErrors, Parallelism,
};
use ship_map::MappingCache;
use ship_normalize::DecimalSeparator;
use ship_output::write_outputs;
use ship_standards::{Profile, ProfileSource, list_profiles, load_profile, profile_dir};

use crate::cli::{IngestArgs, SchemaArgs};
use crate::summary::apply_table_style;
use crate::types::{FileReport, IngestReport};

/// Profile options with the command line applied on top.
pub fn ingest_config(profile: &Profile, args: &IngestArgs, log_data: bool) -> IngestConfig {
    let mut normalize = profile.normalize.clone();
    if let Some(order) = args.date_order {
        normalize.date_order = order.into();
    }
    if args.decimal_comma {
        normalize.decimal_separator = DecimalSeparator::Comma;
    }
    let parallelism = match args.threads {
        Some(threads) => Parallelism::Pool(usize::from(threads)),
        None => Parallelism::Sequential,
    };
    let optional_field_errors = if args.keep_invalid_optional {
        OptionalFieldErrors::Keep
    } else {
        OptionalFieldErrors::Reject
    };
    IngestConfig::default()
        .with_normalize(normalize)
        .with_mapping(profile.mapping.clone())
        .with_parallelism(parallelism)
        .with_optional_field_errors(optional_field_errors)
        .with_log_data(log_data)
        .with_derivations(profile.derivations.clone())
}

pub fn run_ingest(args: &IngestArgs, log_data: bool) -> Result<IngestReport> {
    let profile = load_profile(&args.profile)
        .with_context(|| format!("load profile '{}'", args.profile))?;
    let config = ingest_config(&profile, args, log_data);
    let pipeline = IngestionPipeline::new(profile.schema.clone(), config)
        .context("build ingestion pipeline")?
        .with_validator(profile.validator())
        .with_cache(Arc::new(MappingCache::new()));
    let formats = args.format.formats();

    let mut files = Vec::with_capacity(args.files.len());
    for path in &args.files {
        let span = info_span!("file", path = %path.display());
        let _guard = span.enter();
        let result = CsvSource::open(path, CsvOptions::default())
            .map_err(ship_ingest::IngestError::from)
            .and_then(|mut source| pipeline.run(&mut source));
        let report = match result {
            Ok(result) => {
                info!(
                    accepted = result.summary.accepted,
                    rejected = result.summary.rejected,
                    "file ingested"
                );
                if args.dry_run {
                    FileReport {
                        path: path.clone(),
                        result: Ok(result),
                        outputs: Vec::new(),
                    }
                } else {
                    let dir = output_dir(args.output_dir.as_deref(), path);
                    match write_outputs(&dir, &result, pipeline.schema(), &formats) {
                        Ok(outputs) => FileReport {
                            path: path.clone(),
                            result: Ok(result),
                            outputs,
                        },
                        Err(error) => {
                            warn!(%error, dir = %dir.display(), "outputs could not be written");
                            FileReport {
                                path: path.clone(),
                                result: Err(format!(
                                    "write outputs to {}: {error}",
                                    dir.display()
                                )),
                                outputs: Vec::new(),
                            }
                        }
                    }
                }
            }
            Err(error) => {
                warn!(%error, "file could not be ingested");
                FileReport {
                    path: path.clone(),
                    result: Err(error.to_string()),
                    outputs: Vec::new(),
                }
            }
        };
        files.push(report);
    }

    Ok(IngestReport {
        profile: profile.name().to_string(),
        files,
        dry_run: args.dry_run,
    })
}

/// `--output-dir`, or an `output` directory beside the input file.
fn output_dir(explicit: Option<&Path>, input: &Path) -> PathBuf {
    match explicit {
        Some(dir) => dir.to_path_buf(),
        None => input
            .parent()
            .unwrap_or_else(|| Path::new("."))
            .join("output"),
    }
}

pub fn run_profiles() -> Result<()> {
    let dir = profile_dir();
    let entries = list_profiles(dir.as_deref()).context("list profiles")?;
    let mut table = Table::new();
    table.set_header(vec!["Profile", "Source", "Fields", "Description"]);
    apply_table_style(&mut table);
    for entry in entries {
        let source = match &entry.source {
            ProfileSource::Builtin => "built-in".to_string(),
            ProfileSource::File(path) => path.display().to_string(),
        };
        let lookup = match &entry.source {
            ProfileSource::Builtin => entry.name.clone(),
            ProfileSource::File(path) => path.display().to_string(),
        };
        let (fields, description) = match load_profile(&lookup) {
            Ok(profile) => (
                profile.schema.fields.len().to_string(),
                profile.description.unwrap_or_default(),
            ),
            Err(error) => ("-".to_string(), format!("invalid: {error}")),
        };
        table.add_row(vec![entry.name, source, fields, description]);
    }
    println!("{table}");
    Ok(())
}

pub fn run_schema(args: &SchemaArgs) -> Result<()> {
    let profile = load_profile(&args.profile)
        .with_context(|| format!("load profile '{}'", args.profile))?;
    if let Some(description) = &profile.description {
        println!("{}: {description}", profile.name());
    }
    println!("{}", schema_table(&profile));
    if !profile.rules.is_empty() {
        println!();
        println!("Rules:");
        println!("{}", rules_table(&profile));
    }
    Ok(())
}

pub fn schema_table(profile: &Profile) -> Table {
    let mut table = Table::new();
    table.set_header(vec!["Field", "Type", "Required", "Aliases"]);
    apply_table_style(&mut table);
    for field in &profile.schema.fields {
        let aliases = if field.aliases.is_empty() {
            "-".to_string()
        } else {
            field.aliases.join(", ")
        };
        table.add_row(vec![
            field.name.clone(),
            field.semantic_type.to_string(),
            if field.required { "yes" } else { "no" }.to_string(),
            aliases,
        ]);
    }
    table
}

pub fn rules_table(profile: &Profile) -> Table {
    let mut table = Table::new();
    table.set_header(vec!["Rule", "Severity", "Message"]);
    apply_table_style(&mut table);
    for spec in &profile.rules {
        let rule = spec.to_rule();
        table.add_row(vec![
            rule.name,
            rule.severity.as_str().to_string(),
            rule.message,
        ]);
    }
    table
}
