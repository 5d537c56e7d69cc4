//! CLI argument definitions for the reconciliation tool.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;

#[derive(Parser)]
#[command(
    name = "recon",
    version,
    about = "Reconcile hospital EHR exports against a clinical registry",
    long_about = "Compare a merged hospital EHR export against a clinical trial\n\
                  registry export, patient by patient and variable by variable,\n\
                  and report agreement statistics with mismatch details."
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
}

#[derive(Subcommand)]
pub enum Command {
    /// Reconcile a source export directory against a registry export.
    Reconcile(ReconcileArgs),
}

#[derive(Parser)]
pub struct ReconcileArgs {
    /// Directory containing the categorized source export CSV files.
    #[arg(value_name = "SOURCE_DIR")]
    pub source_dir: PathBuf,

    /// Registry export CSV file.
    #[arg(long = "target", value_name = "FILE")]
    pub target: PathBuf,

    /// Mapping table CSV describing which columns correspond.
    #[arg(long = "mapping", value_name = "FILE")]
    pub mapping: PathBuf,

    /// Identity cross-reference CSV linking the two id spaces.
    #[arg(long = "cross-reference", value_name = "FILE")]
    pub cross_reference: PathBuf,

    /// JSON file with per-column code-to-label dictionaries
    /// (built-in defaults apply when omitted).
    #[arg(long = "value-maps", value_name = "FILE")]
    pub value_maps: Option<PathBuf>,

    /// Output directory (default: <SOURCE_DIR>/reconciliation).
    #[arg(long = "output-dir", value_name = "DIR")]
    pub output_dir: Option<PathBuf>,

    /// Column the source CSV files are merged on.
    #[arg(long = "merge-column", default_value = "PAT_ENC_CSN_ID")]
    pub merge_column: String,

    /// Source column holding the numeric patient identifier.
    #[arg(long = "source-id-column", default_value = "img.FID")]
    pub source_id_column: String,

    /// Registry column whose trailing digits are the patient identifier.
    #[arg(long = "target-case-column", default_value = "Case ID")]
    pub target_case_column: String,

    /// Source column used for month bucketing.
    #[arg(long = "source-date-column", default_value = "enct.arrival_date")]
    pub source_date_column: String,

    /// Registry column used for month bucketing when the source date
    /// is missing.
    #[arg(long = "target-date-column", default_value = "Arrival at hospital")]
    pub target_date_column: String,

    /// Cross-reference column holding the source identifier.
    #[arg(long = "xref-source-column", default_value = "FID")]
    pub xref_source_column: String,

    /// Cross-reference column holding the registry identifier.
    #[arg(long = "xref-target-column", default_value = "SSR Identification")]
    pub xref_target_column: String,

    /// First calendar month inside reporting scope (1-12).
    #[arg(
        long = "month-start",
        default_value_t = 4,
        value_parser = clap::value_parser!(u32).range(1..=12)
    )]
    pub month_start: u32,

    /// Last calendar month inside reporting scope (1-12).
    #[arg(
        long = "month-end",
        default_value_t = 12,
        value_parser = clap::value_parser!(u32).range(1..=12)
    )]
    pub month_end: u32,
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
