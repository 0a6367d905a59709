//! CLI argument definitions for the `ship` tool.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;
use ship_normalize::DateOrder;
use ship_output::OutputFormat;

#[derive(Parser)]
#[command(
    name = "ship",
    version,
    about = "Shipment record ingestion - normalize messy shipment spreadsheets",
    long_about = "Map the columns of CSV/TSV shipment exports onto a canonical schema,\n\
                  normalize dates, quantities and statuses, validate every record,\n\
                  and write the accepted records plus a diagnostics ledger."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Adjust log verbosity (-v for info, -vv for debug, -q for errors only).
    #[command(flatten)]
    pub verbosity: Verbosity<WarnLevel>,

    /// Control ANSI color output (auto, always, never).
    #[command(flatten)]
    pub color: Color,

    /// Explicit log level (overrides -v/-q flags).
    #[arg(long = "log-level", value_enum, global = true)]
    pub log_level: Option<LogLevelArg>,

    /// Log output format (pretty for human, json for machine parsing).
    #[arg(
        long = "log-format",
        value_enum,
        default_value = "pretty",
        global = true
    )]
    pub log_format: LogFormatArg,

    /// Write logs to a file instead of stderr.
    #[arg(long = "log-file", value_name = "PATH", global = true)]
    pub log_file: Option<PathBuf>,

    /// Include raw cell values in trace logs.
    #[arg(long = "log-data", global = true)]
    pub log_data: bool,
}

#[derive(Subcommand)]
pub enum Command {
    /// Ingest one or more CSV/TSV files.
    Ingest(IngestArgs),

    /// List the available profiles.
    Profiles,

    /// Print the fields and rules of a profile.
    Schema(SchemaArgs),
}

#[derive(Parser)]
pub struct IngestArgs {
    /// Input files (CSV, or TSV by extension).
    #[arg(value_name = "FILES", required = true)]
    pub files: Vec<PathBuf>,

    /// Profile name or path to a profile TOML file.
    #[arg(long = "profile", value_name = "NAME|PATH", default_value = "shipment")]
    pub profile: String,

    /// Output directory (default: `output` next to each input file).
    #[arg(long = "output-dir", value_name = "DIR")]
    pub output_dir: Option<PathBuf>,

    /// Output format to generate.
    #[arg(long = "format", value_enum, default_value = "both")]
    pub format: OutputFormatArg,

    /// Report without writing output files.
    #[arg(long = "dry-run")]
    pub dry_run: bool,

    /// Process rows on a worker pool with this many threads.
    #[arg(long = "threads", value_name = "N", value_parser = clap::value_parser!(u16).range(1..))]
    pub threads: Option<u16>,

    /// Reading of ambiguous numeric dates such as 03/04/2024.
    #[arg(long = "date-order", value_enum)]
    pub date_order: Option<DateOrderArg>,

    /// Numbers use a decimal comma (1.234,5).
    #[arg(long = "decimal-comma")]
    pub decimal_comma: bool,

    /// Keep records whose optional fields fail to normalize, with the field left empty.
    #[arg(long = "keep-invalid-optional")]
    pub keep_invalid_optional: bool,
}

#[derive(Parser)]
pub struct SchemaArgs {
    /// Profile name or path to a profile TOML file.
    #[arg(value_name = "PROFILE")]
    pub profile: String,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum OutputFormatArg {
    Csv,
    Json,
    Both,
}

impl OutputFormatArg {
    pub fn formats(self) -> Vec<OutputFormat> {
        match self {
            OutputFormatArg::Csv => vec![OutputFormat::Csv],
            OutputFormatArg::Json => vec![OutputFormat::Json],
            OutputFormatArg::Both => OutputFormat::ALL.to_vec(),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum DateOrderArg {
    DayFirst,
    MonthFirst,
}

impl From<DateOrderArg> for DateOrder {
    fn from(value: DateOrderArg) -> Self {
        match value {
            DateOrderArg::DayFirst => DateOrder::DayFirst,
            DateOrderArg::MonthFirst => DateOrder::MonthFirst,
        }
    }
}

/// CLI log level choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogLevelArg {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// CLI log format choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Compact,
    Json,
}
