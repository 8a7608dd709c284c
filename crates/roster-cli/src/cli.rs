//! CLI argument definitions.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;

#[derive(Parser)]
#[command(
    name = "roster",
    version,
    about = "Import CSV files into the roster with adaptive header mapping",
    long_about = "Import CSV files into the roster.\n\n\
                  Headers are matched to record fields by name similarity, value types and\n\
                  known vocabularies. Confirmed mappings are learned for later files."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Directory holding records, learned mappings and import history.
    #[arg(
        long = "data-dir",
        value_name = "DIR",
        default_value = "roster-data",
        global = true
    )]
    pub data_dir: PathBuf,

    /// Configuration file (default: <DATA_DIR>/roster.toml).
    #[arg(long = "config", value_name = "PATH", global = true)]
    pub config: Option<PathBuf>,

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

    /// Allow cell values in log output.
    #[arg(long = "log-data", global = true)]
    pub log_data: bool,
}

#[derive(Subcommand)]
pub enum Command {
    /// List the target fields headers can map to.
    Fields,

    /// Suggest a target field for every header of a CSV file.
    Suggest(SuggestArgs),

    /// Import a CSV file as one all-or-nothing batch.
    Import(ImportArgs),

    /// Show past import jobs, newest first.
    History(HistoryArgs),

    /// Show learned header mappings.
    Learned,
}

#[derive(Parser)]
pub struct SuggestArgs {
    #[arg(value_name = "FILE")]
    pub file: PathBuf,

    /// Show the top-ranked fields with their score breakdown.
    #[arg(long = "explain")]
    pub explain: bool,

    /// Number of ranked fields shown per header with --explain.
    #[arg(long = "top", value_name = "N", default_value_t = 3)]
    pub top: usize,
}

#[derive(Parser)]
pub struct ImportArgs {
    #[arg(value_name = "FILE")]
    pub file: PathBuf,

    /// Confirm a header mapping (repeatable); FIELD may be `none`.
    #[arg(long = "map", value_name = "HEADER=FIELD")]
    pub map: Vec<String>,

    /// Use the suggested field for every header not given with --map.
    #[arg(long = "accept-suggestions")]
    pub accept_suggestions: bool,
}

#[derive(Parser)]
pub struct HistoryArgs {
    /// Show at most this many jobs.
    #[arg(long = "limit", value_name = "N")]
    pub limit: Option<usize>,
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
