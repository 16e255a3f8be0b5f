//! CLI argument definitions for the player cross-reference tool.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;

#[derive(Parser)]
#[command(
    name = "player-xref",
    version,
    about = "Resolve player identities between a roster feed and a free-text stats feed",
    long_about = "Resolve player identities between a roster feed and a free-text stats feed.\n\n\
                  Matches stats-feed display names to roster ids with fuzzy scoring under a\n\
                  relaxing confidence threshold, caches the mapping per run, and writes the\n\
                  joined per-player dataset as JSON or CSV."
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
    /// Match, merge, prune and write the joined dataset.
    Run(RunArgs),

    /// Match names only and print the match table.
    Resolve(ResolveArgs),

    /// Delete a cached mapping so the next run re-matches.
    Invalidate(InvalidateArgs),
}

/// Where a run's inputs and cached mapping live.
#[derive(Args)]
pub struct SourceArgs {
    /// Directory holding `{RUN_KEY}_roster.json` and `{RUN_KEY}_stats.json`.
    #[arg(long = "data-dir", value_name = "DIR", default_value = ".data")]
    pub data_dir: PathBuf,

    /// Run key of the snapshots to use (default: today's date, YYYY_MM_DD).
    #[arg(long = "run-key", value_name = "KEY", conflicts_with = "latest")]
    pub run_key: Option<String>,

    /// Use the most recent run key found in the data directory.
    #[arg(long = "latest")]
    pub latest: bool,

    /// Directory for cached mappings (default: the data directory).
    #[arg(long = "cache-dir", value_name = "DIR")]
    pub cache_dir: Option<PathBuf>,

    /// Ignore and do not write the match cache.
    #[arg(long = "no-cache")]
    pub no_cache: bool,

    /// JSON file with pipeline options.
    #[arg(long = "config", value_name = "PATH")]
    pub config: Option<PathBuf>,
}

#[derive(Args)]
pub struct RunArgs {
    #[command(flatten)]
    pub source: SourceArgs,

    /// Output directory for the joined dataset (default: the data directory).
    #[arg(long = "output-dir", value_name = "DIR")]
    pub output_dir: Option<PathBuf>,

    /// Output format to generate.
    #[arg(long = "format", value_enum, default_value = "json")]
    pub format: OutputFormatArg,

    /// Drop players with fewer minutes than this (overrides config).
    #[arg(long = "min-minutes", value_name = "MINUTES")]
    pub min_minutes: Option<u32>,

    /// Also drop injured or suspended players with a known return.
    #[arg(long = "remove-injured")]
    pub remove_injured: bool,
}

#[derive(Args)]
pub struct ResolveArgs {
    #[command(flatten)]
    pub source: SourceArgs,
}

#[derive(Args)]
pub struct InvalidateArgs {
    /// Run key whose cached mapping should be deleted.
    #[arg(value_name = "RUN_KEY")]
    pub run_key: String,

    /// Directory for cached mappings.
    #[arg(long = "cache-dir", value_name = "DIR", default_value = ".data")]
    pub cache_dir: PathBuf,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum OutputFormatArg {
    Json,
    Csv,
    Both,
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
