//! CLI argument definitions for the sales ETL.

use std::num::NonZeroUsize;
use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{InfoLevel, Verbosity};
use colorchoice_clap::Color;
use tracing::level_filters::LevelFilter;

use etl_cli::logging::LogFormat;

#[derive(Parser)]
#[command(
    name = "sales-etl",
    version,
    about = "Customer and sales ETL - validate, transform and delta-load CSV sources",
    long_about = "Load customer and sales CSV files, validate and standardize them,\n\
                  derive tenure and order classification, merge and summarize by\n\
                  product, then load the results into SQLite.\n\n\
                  Keyed tables only receive rows that are not stored yet; the\n\
                  product summary is replaced on every run."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Adjust log verbosity (-v for debug, -vv for trace, -q for warnings only).
    #[command(flatten)]
    pub verbosity: Verbosity<InfoLevel>,

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

    /// Prefix each log line with its timestamp.
    #[arg(long = "log-timestamps", global = true)]
    pub log_timestamps: bool,

    /// Include the emitting module in each log line.
    #[arg(long = "log-target", global = true)]
    pub log_target: bool,
}

#[derive(Subcommand)]
pub enum Command {
    /// Run the full pipeline and load the outputs into a database.
    Run(RunArgs),

    /// Run the pipeline without a database and print the output tables.
    Preview(PreviewArgs),
}

#[derive(Parser)]
pub struct RunArgs {
    /// Pipeline configuration file (JSON).
    #[arg(long = "config", value_name = "CONFIG")]
    pub config: PathBuf,

    /// SQLite database file; created when missing.
    #[arg(long = "database", value_name = "DB")]
    pub database: PathBuf,

    /// Rows per insert batch (overrides `load.batch_size`).
    #[arg(long = "batch-size", value_name = "N")]
    pub batch_size: Option<NonZeroUsize>,
}

#[derive(Parser)]
pub struct PreviewArgs {
    /// Pipeline configuration file (JSON).
    #[arg(long = "config", value_name = "CONFIG")]
    pub config: PathBuf,

    /// Rows shown per table.
    #[arg(long = "rows", value_name = "N", default_value_t = 10)]
    pub rows: usize,
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

impl From<LogLevelArg> for LevelFilter {
    fn from(level: LogLevelArg) -> Self {
        match level {
            LogLevelArg::Error => LevelFilter::ERROR,
            LogLevelArg::Warn => LevelFilter::WARN,
            LogLevelArg::Info => LevelFilter::INFO,
            LogLevelArg::Debug => LevelFilter::DEBUG,
            LogLevelArg::Trace => LevelFilter::TRACE,
        }
    }
}

impl From<LogFormatArg> for LogFormat {
    fn from(format: LogFormatArg) -> Self {
        match format {
            LogFormatArg::Pretty => LogFormat::Pretty,
            LogFormatArg::Compact => LogFormat::Compact,
            LogFormatArg::Json => LogFormat::Json,
        }
    }
}
