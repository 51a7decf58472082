//! CLI argument definitions.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;
use tracing::level_filters::LevelFilter;
use unitsheet_cli::logging::LogFormat;

#[derive(Parser)]
#[command(
    name = "unitsheet",
    version,
    about = "Map, transform and group developer unit inventory sheets",
    long_about = "Map the columns of a developer inventory sheet onto system fields,\n\
                  run the configured transformations, group units into listings and\n\
                  report what changed since the previous upload."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Adjust log verbosity (-v for info, -vv for debug, -q for errors only).
    #[command(flatten)]
    pub verbosity: Verbosity<WarnLevel>,

    #[command(flatten)]
    pub color: Color,

    /// Explicit log level (overrides -v/-q flags).
    #[arg(long = "log-level", value_enum, global = true)]
    pub log_level: Option<LogLevelArg>,

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

    /// Field registry file (TOML or CSV). Defaults to $UNITSHEET_FIELDS or
    /// the built-in registry.
    #[arg(long = "fields", value_name = "PATH", global = true)]
    pub fields: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Command {
    /// List the system fields of the active registry.
    Fields,

    /// Suggest column-to-field mappings for a sheet.
    Suggest(SuggestArgs),

    /// Map, transform and group a sheet.
    Run(RunArgs),
}

#[derive(Parser)]
pub struct SuggestArgs {
    #[arg(value_name = "SHEET")]
    pub sheet: PathBuf,

    /// Minimum confidence for a suggestion (0.0 to 1.0).
    #[arg(long = "min-confidence", default_value_t = 0.75)]
    pub min_confidence: f32,
}

#[derive(Parser)]
pub struct RunArgs {
    /// CSV inventory sheet.
    #[arg(value_name = "SHEET")]
    pub sheet: PathBuf,

    /// Job file with mappings, transformations, grouping and assets.
    #[arg(long = "job", value_name = "PATH")]
    pub job: Option<PathBuf>,

    /// Snapshot of the previous run, for merging and delta tracking.
    #[arg(long = "previous", value_name = "PATH")]
    pub previous: Option<PathBuf>,

    /// Output snapshot path (default: <SHEET>.groups.json).
    #[arg(long = "output", value_name = "PATH")]
    pub output: Option<PathBuf>,

    /// Report without writing the snapshot.
    #[arg(long = "dry-run")]
    pub dry_run: bool,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum LogLevelArg {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<LogLevelArg> for LevelFilter {
    fn from(level: LogLevelArg) -> Self {
        match level {
            LogLevelArg::Error => Self::ERROR,
            LogLevelArg::Warn => Self::WARN,
            LogLevelArg::Info => Self::INFO,
            LogLevelArg::Debug => Self::DEBUG,
            LogLevelArg::Trace => Self::TRACE,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Compact,
    Json,
}

impl From<LogFormatArg> for LogFormat {
    fn from(format: LogFormatArg) -> Self {
        match format {
            LogFormatArg::Pretty => Self::Pretty,
            LogFormatArg::Compact => Self::Compact,
            LogFormatArg::Json => Self::Json,
        }
    }
}
