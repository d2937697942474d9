//! Command-line parsing for the CoWIN dashboard.
//!
//! Argument parsing and command dispatch stay separate from loading and
//! rendering, which live in the library modules.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(name = "cowin", version, about = "CoWIN vaccination dashboard")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Launch the interactive dashboard.
    Tui(SourceArgs),
    /// Load once and print the dashboard as text.
    Show(ShowArgs),
    /// Fetch once and write the data to a JSON snapshot.
    Export(ExportArgs),
}

/// Where to fetch from.
#[derive(Debug, Args, Clone, Default)]
pub struct SourceArgs {
    /// Vaccination data endpoint (default: $COWIN_API_URL, then the public CoWIN endpoint).
    #[arg(long, value_name = "URL")]
    pub url: Option<String>,

    /// Request timeout in seconds (default: $COWIN_TIMEOUT_SECS, then 30).
    #[arg(long, value_name = "SECS")]
    pub timeout: Option<u64>,
}

#[derive(Debug, Args)]
pub struct ShowArgs {
    #[command(flatten)]
    pub source: SourceArgs,

    /// Render a snapshot produced by `cowin export` instead of fetching.
    #[arg(long, value_name = "JSON", conflicts_with = "url")]
    pub snapshot: Option<PathBuf>,

    /// Bar width (columns) for the largest daily count.
    #[arg(long, default_value_t = 40)]
    pub width: usize,
}

#[derive(Debug, Args)]
pub struct ExportArgs {
    #[command(flatten)]
    pub source: SourceArgs,

    /// Output JSON path.
    #[arg(long, short = 'o', value_name = "JSON")]
    pub out: PathBuf,
}
