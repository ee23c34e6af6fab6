//! CLI argument definitions.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

use crate::commands::{
    ConfigArgs, CountryRegionArgs, ExposureArgs, PositionsArgs, VolatilityArgs,
};

/// Exposure - Sub-fund risk exposure and NAV volatility analytics
#[derive(Parser)]
#[command(name = "exposure")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Output format
    #[arg(short, long, value_enum, default_value = "table", global = true)]
    pub format: OutputFormat,

    /// Suppress non-essential output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Run configuration file (defaults to ./exposure.toml if present)
    #[arg(short, long, global = true, env = "EXPOSURE_CONFIG")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand)]
pub enum Commands {
    /// Load a position file and summarize its contents
    Positions(PositionsArgs),

    /// Net, long, short and gross exposure by asset class and currency
    Exposure(ExposureArgs),

    /// Exposure by country of risk and region
    CountryRegion(CountryRegionArgs),

    /// Annualized NAV volatility of a sub-fund
    Volatility(VolatilityArgs),

    /// Manage the run configuration
    Config(ConfigArgs),
}

/// Output format options
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable table format
    #[default]
    Table,
    /// JSON format
    Json,
    /// CSV format
    Csv,
}

/// Options shared by every command.
#[derive(Debug, Clone)]
pub struct GlobalOptions {
    /// Output format.
    pub format: OutputFormat,
    /// Suppress non-essential output.
    pub quiet: bool,
    /// Explicit configuration file.
    pub config: Option<PathBuf>,
}

impl Cli {
    /// Options shared by every command.
    pub fn globals(&self) -> GlobalOptions {
        GlobalOptions {
            format: self.format,
            quiet: self.quiet,
            config: self.config.clone(),
        }
    }
}
