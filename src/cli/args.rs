//! CLI argument definitions using clap derive

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use crate::cli::commands::{
    build::BuildCommands, catalog::CatalogCommands, completions::CompletionsArgs,
    config::ConfigCommands, init::InitArgs, metrics::MetricsArgs, test::TestCommands,
};

#[derive(Parser)]
#[command(name = "droneforge")]
#[command(author, version, about = "Assemble virtual drones and estimate their flight performance")]
#[command(long_about = "Build drones from a catalog of parts, then run simulated flight tests that \
derive stability, power, speed and thermal estimates from the parts you chose.")]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    #[command(flatten)]
    pub global: GlobalOpts,
}

#[derive(clap::Args, Clone, Debug)]
pub struct GlobalOpts {
    /// Output format
    #[arg(long, short = 'f', global = true, default_value = "auto")]
    pub format: OutputFormat,

    /// Suppress non-essential output
    #[arg(long, short = 'q', global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Enable verbose output (debug logging)
    #[arg(long, short = 'v', global = true)]
    pub verbose: bool,

    /// Project root (default: auto-detect by finding .droneforge/)
    #[arg(long, global = true)]
    pub project: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize a new DroneForge project
    Init(InitArgs),

    /// Browse the component catalog and test library
    #[command(subcommand)]
    Catalog(CatalogCommands),

    /// Create and edit drone builds
    #[command(subcommand)]
    Build(BuildCommands),

    /// Show the performance panel for a build
    Metrics(MetricsArgs),

    /// Run simulated flight tests
    #[command(subcommand)]
    Test(TestCommands),

    /// View and modify configuration
    #[command(subcommand)]
    Config(ConfigCommands),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum OutputFormat {
    /// Automatically detect based on context (yaml for show, tsv for list)
    #[default]
    Auto,
    /// YAML format (full fidelity)
    Yaml,
    /// Tab-separated values (for piping)
    Tsv,
    /// JSON format (for programming)
    Json,
    /// CSV format (for spreadsheets)
    Csv,
    /// Markdown tables
    Md,
    /// Just IDs, one per line
    Id,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        <Self as ValueEnum>::from_str(s, true)
    }
}
