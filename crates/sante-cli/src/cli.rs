//! CLI argument definitions for the health-statistics pipeline.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;
use sante_store::WriteMode;

#[derive(Parser)]
#[command(
    name = "sante",
    version,
    about = "Normalize French public health statistics into one canonical table",
    long_about = "Normalize French public health statistics into one canonical table.\n\n\
                  Reads CSV, Excel, ZIP and HTML sources, maps them onto the\n\
                  (maladie, annee, region, indicateur, valeur, unite) schema,\n\
                  aggregates them and synchronises each disease into SQLite."
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
    /// Run the full pipeline over the configured sources.
    Run(RunArgs),

    /// Load a canonical CSV into storage, replacing each disease it holds.
    Load(LoadArgs),

    /// List stored observations, most recent year first.
    Query(QueryArgs),

    /// Mean, minimum and maximum per indicator and year.
    Stats(StatsArgs),

    /// Print the quality report of a canonical CSV.
    Report(ReportArgs),

    /// List the configured sources.
    Sources(SourcesArgs),
}

#[derive(Parser)]
pub struct RunArgs {
    /// Configuration file (default: ./sante.toml when present).
    #[arg(long = "config", value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Folder holding the source files.
    #[arg(long = "data-dir", value_name = "DIR")]
    pub data_dir: Option<PathBuf>,

    /// Merged canonical CSV to write.
    #[arg(long = "output", value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// SQLite database receiving the observations.
    #[arg(long = "db", value_name = "FILE")]
    pub db: Option<PathBuf>,

    /// Skip the storage step.
    #[arg(long = "no-db", conflicts_with = "db")]
    pub no_db: bool,

    /// How each disease's rows are written to storage.
    #[arg(long = "mode", value_enum)]
    pub mode: Option<WriteModeArg>,
}

#[derive(Parser)]
pub struct LoadArgs {
    /// Canonical CSV file to load.
    #[arg(value_name = "CSV")]
    pub csv: PathBuf,

    /// SQLite database (default: the configured one).
    #[arg(long = "db", value_name = "FILE")]
    pub db: Option<PathBuf>,

    /// Configuration file (default: ./sante.toml when present).
    #[arg(long = "config", value_name = "FILE")]
    pub config: Option<PathBuf>,
}

#[derive(Parser)]
pub struct QueryArgs {
    #[arg(long = "disease", value_name = "NAME")]
    pub disease: Option<String>,

    #[arg(long = "indicator", value_name = "NAME")]
    pub indicator: Option<String>,

    #[arg(long = "year")]
    pub year: Option<i64>,

    #[arg(long = "region", value_name = "NAME")]
    pub region: Option<String>,

    /// Maximum number of rows returned.
    #[arg(long = "limit", default_value_t = 100)]
    pub limit: usize,

    /// SQLite database (default: the configured one).
    #[arg(long = "db", value_name = "FILE")]
    pub db: Option<PathBuf>,

    /// Configuration file (default: ./sante.toml when present).
    #[arg(long = "config", value_name = "FILE")]
    pub config: Option<PathBuf>,
}

#[derive(Parser)]
pub struct StatsArgs {
    #[arg(long = "disease", value_name = "NAME")]
    pub disease: Option<String>,

    #[arg(long = "indicator", value_name = "NAME")]
    pub indicator: Option<String>,

    #[arg(long = "year")]
    pub year: Option<i64>,

    /// SQLite database (default: the configured one).
    #[arg(long = "db", value_name = "FILE")]
    pub db: Option<PathBuf>,

    /// Configuration file (default: ./sante.toml when present).
    #[arg(long = "config", value_name = "FILE")]
    pub config: Option<PathBuf>,
}

#[derive(Parser)]
pub struct ReportArgs {
    /// Canonical CSV file to describe.
    #[arg(value_name = "CSV")]
    pub csv: PathBuf,

    /// Print the report as JSON instead of tables.
    #[arg(long = "json")]
    pub json: bool,
}

#[derive(Parser)]
pub struct SourcesArgs {
    /// Configuration file (default: ./sante.toml when present).
    #[arg(long = "config", value_name = "FILE")]
    pub config: Option<PathBuf>,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum WriteModeArg {
    Replace,
    Upsert,
}

impl From<WriteModeArg> for WriteMode {
    fn from(arg: WriteModeArg) -> Self {
        match arg {
            WriteModeArg::Replace => WriteMode::Replace,
            WriteModeArg::Upsert => WriteMode::Upsert,
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
