//! Exposure CLI - Command-line interface for sub-fund exposure analytics.
//!
//! # Usage
//!
//! ```bash
//! # Summarize a position file
//! exposure positions data/positions.csv
//!
//! # Exposure by asset class and asset currency
//! exposure exposure data/positions.csv
//!
//! # Exposure in EUR, written to a file
//! exposure exposure data/positions.csv --eur --output exposure_eur.csv
//!
//! # Net and gross equity exposure by country and region
//! exposure country-region data/positions.csv data/country_region.csv \
//!     --asset-class Equity --metric net --metric gross
//!
//! # Annualized NAV volatility
//! exposure volatility data/nav.xlsx --subfund SF1 --as-of 2021-01-01
//! ```

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

mod cli;
mod commands;
mod error;
mod output;
mod settings;

use cli::{Cli, Commands};

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Logs go to stderr so table/json/csv output on stdout stays clean
    let filter = if cli.verbose {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug"))
    } else if cli.quiet {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let globals = cli.globals();

    // Execute command
    match cli.command {
        Commands::Positions(args) => commands::positions::execute(args, &globals)?,
        Commands::Exposure(args) => commands::exposure::execute(args, &globals)?,
        Commands::CountryRegion(args) => commands::country_region::execute(args, &globals)?,
        Commands::Volatility(args) => commands::volatility::execute(args, &globals)?,
        Commands::Config(args) => commands::config::execute(args, &globals)?,
    }

    Ok(())
}
