//! CLI argument definitions.

use std::path::PathBuf;

use brfss_map::DEFAULT_CUTOFF;
use brfss_standards::Generation;
use clap::{Args, Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;

#[derive(Parser)]
#[command(
    name = "brfss",
    version,
    about = "BRFSS yearly survey pipeline - harmonize and impute annual survey files",
    long_about = "Download annual BRFSS transport archives, project every year onto one\n\
                  canonical column schema, impute missing values and write one cleaned\n\
                  CSV per year. Completed stages are detected on disk and skipped."
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
    /// Run the yearly pipeline.
    Run(RunArgs),

    /// Suggest raw columns for every registry alias, per year.
    Inspect(InspectArgs),

    /// Print the column registry.
    Schema(SchemaArgs),
}

#[derive(Args)]
pub struct RegistryArgs {
    /// Built-in registry generation.
    #[arg(long = "generation", value_enum)]
    pub generation: Option<GenerationArg>,

    /// Custom registry file (TOML), replacing the built-in generation.
    #[arg(long = "registry", value_name = "PATH", conflicts_with = "generation")]
    pub registry: Option<PathBuf>,
}

#[derive(Args)]
pub struct PipelineArgs {
    /// Pipeline configuration file (TOML). Flags override its values.
    #[arg(long = "config", value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Root directory for archives, raw tables and cleaned tables.
    #[arg(long = "data-dir", value_name = "DIR")]
    pub data_dir: Option<PathBuf>,

    /// First survey year.
    #[arg(long = "from", value_name = "YEAR")]
    pub from: Option<i32>,

    /// Last survey year (default: the current year).
    #[arg(long = "to", value_name = "YEAR")]
    pub to: Option<i32>,

    #[command(flatten)]
    pub registry: RegistryArgs,
}

#[derive(Args)]
pub struct RunArgs {
    #[command(flatten)]
    pub pipeline: PipelineArgs,

    /// Base URL of the annual archives.
    #[arg(long = "base-url", value_name = "URL")]
    pub base_url: Option<String>,

    /// Fail a year, writing nothing, when a column cannot be imputed.
    ///
    /// By default such a year is written with the column left empty and is
    /// flagged in the summary.
    #[arg(long = "fail-on-gap")]
    pub fail_on_gap: bool,
}

#[derive(Args)]
pub struct InspectArgs {
    #[command(flatten)]
    pub pipeline: PipelineArgs,

    /// Where to write the suggestions (default: <DATA_DIR>/column_matches.csv).
    #[arg(long = "output", value_name = "PATH")]
    pub output: Option<PathBuf>,

    /// Minimum name similarity for a suggestion (0 to 1).
    #[arg(long = "cutoff", default_value_t = DEFAULT_CUTOFF)]
    pub cutoff: f64,
}

#[derive(Args)]
pub struct SchemaArgs {
    /// Pipeline configuration file (TOML).
    #[arg(long = "config", value_name = "PATH")]
    pub config: Option<PathBuf>,

    #[command(flatten)]
    pub registry: RegistryArgs,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum GenerationArg {
    KaggleV1,
    CdcV2,
}

impl From<GenerationArg> for Generation {
    fn from(value: GenerationArg) -> Self {
        match value {
            GenerationArg::KaggleV1 => Generation::KaggleV1,
            GenerationArg::CdcV2 => Generation::CdcV2,
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
