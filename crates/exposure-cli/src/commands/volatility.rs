//! Volatility command implementation.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use serde::Serialize;
use tabled::Tabled;

use exposure_core::{annualized_volatility, annualized_volatility_by_subfund, VolatilityEstimate};
use exposure_ext_file::read_nav;

use crate::cli::{GlobalOptions, OutputFormat};
use crate::commands::parse_date;
use crate::output::{print_header, print_output, print_warning};

/// Arguments for the volatility command.
#[derive(Args, Debug)]
pub struct VolatilityArgs {
    /// NAV history file (.csv, .xlsx, .xls, .ods)
    pub nav: PathBuf,

    /// Sub-fund code (default: every sub-fund in the file)
    #[arg(short, long)]
    pub subfund: Option<String>,

    /// Use observations strictly before this date (YYYY-MM-DD)
    #[arg(short, long)]
    pub as_of: String,
}

/// One volatility result row.
#[derive(Debug, Clone, Serialize, Tabled)]
pub struct VolatilityRow {
    #[tabled(rename = "Subfund")]
    pub subfund_code: String,
    #[tabled(rename = "As Of")]
    pub as_of: String,
    #[tabled(rename = "Frequency")]
    pub frequency: String,
    #[tabled(rename = "Obs")]
    pub observations: usize,
    #[tabled(rename = "Std Dev")]
    pub std_dev: String,
    #[tabled(rename = "Annualized")]
    pub annualized: String,
}

impl From<&VolatilityEstimate> for VolatilityRow {
    fn from(est: &VolatilityEstimate) -> Self {
        Self {
            subfund_code: est.subfund_code.clone(),
            as_of: est.as_of.to_string(),
            frequency: est.frequency.to_string(),
            observations: est.observations,
            std_dev: format!("{:.6}", est.std_dev),
            annualized: format!("{:.6}", est.annualized),
        }
    }
}

/// Execute the volatility command.
pub fn execute(args: VolatilityArgs, globals: &GlobalOptions) -> Result<()> {
    let as_of = parse_date(&args.as_of)?;
    let nav = read_nav(&args.nav)
        .with_context(|| format!("Failed to read NAV history from {}", args.nav.display()))?;

    let estimates: Vec<VolatilityEstimate> = match &args.subfund {
        Some(subfund) => vec![annualized_volatility(&nav, subfund, as_of)?],
        None => annualized_volatility_by_subfund(&nav, as_of)
            .into_iter()
            .filter_map(|(code, result)| match result {
                Ok(est) => Some(est),
                Err(e) => {
                    if !globals.quiet {
                        print_warning(&format!("{code}: {e}"));
                    }
                    None
                }
            })
            .collect(),
    };

    match globals.format {
        OutputFormat::Json => crate::output::print_json(&estimates),
        format => {
            if format == OutputFormat::Table && !globals.quiet {
                print_header("Annualized NAV Volatility");
            }
            let rows: Vec<VolatilityRow> = estimates.iter().map(VolatilityRow::from).collect();
            print_output(&rows, format)
        }
    }
}
