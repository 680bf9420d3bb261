//! CLI argument definitions.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;

#[derive(Parser)]
#[command(
    name = "labkpi",
    version,
    about = "Lab KPI reporter - ingest spreadsheet exports and derive case and staff metrics",
    long_about = "Ingest messy CSV/TSV/XLSX laboratory exports and derive standardized\n\
                  per-case, per-month, and per-staff KPI tables (volume, turnaround\n\
                  time, abnormal/failure rates, workload)."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Adjust log verbosity (-v for debug, -vv for trace, -q for errors only).
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
}

#[derive(Subcommand)]
pub enum Command {
    /// Ingest one export and print its KPI tables.
    Report(ReportArgs),

    /// Print the effective KPI configuration as JSON.
    Config(ConfigArgs),
}

#[derive(Parser)]
pub struct ReportArgs {
    /// Spreadsheet export to ingest (.csv, .tsv, .xlsx, .xls; anything
    /// else is treated as delimited text).
    #[arg(value_name = "FILE")]
    pub file: PathBuf,

    /// Period start (YYYY-MM-DD). Filters productivity records and drives
    /// the monthly table's year.
    #[arg(long = "start", value_name = "DATE")]
    pub start_date: String,

    /// Period end (YYYY-MM-DD), inclusive.
    #[arg(long = "end", value_name = "DATE")]
    pub end_date: String,

    /// KPI config file (JSON). Falls back to $LABKPI_CONFIG, then defaults.
    #[arg(long = "config", value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Also print the per-day table for the selected period.
    #[arg(long = "daily")]
    pub daily: bool,

    /// Also compute period metrics with threshold statuses.
    #[arg(long = "metrics")]
    pub metrics: bool,

    /// Write all derived tables as CSV files into this directory.
    #[arg(long = "export-dir", value_name = "DIR")]
    pub export_dir: Option<PathBuf>,

    /// Write the canonical records as JSON to this path.
    #[arg(long = "records-json", value_name = "PATH")]
    pub records_json: Option<PathBuf>,
}

#[derive(Parser)]
pub struct ConfigArgs {
    /// KPI config file (JSON). Falls back to $LABKPI_CONFIG, then defaults.
    #[arg(long = "config", value_name = "PATH")]
    pub config: Option<PathBuf>,
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
