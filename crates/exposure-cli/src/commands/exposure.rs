//! Exposure command implementation.
//!
//! Net, long, short and gross exposure per sub-fund, date, asset class and
//! currency.

use std::fs::File;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, ValueEnum};

use exposure_core::aggregation::grouping::with_denominator_fields;
use exposure_core::{
    calculate_exposure_by, default_group_fields, CurrencyMode, ExposureMetric, GroupField,
};
use exposure_ext_file::write_exposure_csv;

use crate::cli::{GlobalOptions, OutputFormat};
use crate::commands::{load_positions, report_diagnostics};
use crate::output::{print_exposure_rows, print_header, print_success};
use crate::settings::RunConfig;

/// Arguments for the exposure command.
#[derive(Args, Debug)]
pub struct ExposureArgs {
    /// Position CSV file
    pub positions: PathBuf,

    /// Convert to EUR and normalize per sub-fund and date
    #[arg(long)]
    pub eur: bool,

    /// Additional grouping columns
    #[arg(long, value_enum)]
    pub by: Vec<GroupBy>,

    /// Write the exposure table to a CSV file
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

/// Optional grouping columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum GroupBy {
    /// Sector
    Sector,
    /// Country of risk
    Country,
}

impl From<GroupBy> for GroupField {
    fn from(by: GroupBy) -> Self {
        match by {
            GroupBy::Sector => GroupField::Sector,
            GroupBy::Country => GroupField::CountryOfRisk,
        }
    }
}

/// Execute the exposure command.
pub fn execute(args: ExposureArgs, globals: &GlobalOptions) -> Result<()> {
    let (settings, _) = RunConfig::load(globals.config.as_deref())?;
    let mode = CurrencyMode::from_eur_flag(args.eur);
    let config = settings.exposure_config(mode)?;

    let records = load_positions(&args.positions, &settings)?;

    let mut fields = default_group_fields(mode);
    fields.extend(args.by.iter().copied().map(GroupField::from));
    let fields = with_denominator_fields(&fields, mode);

    let report = calculate_exposure_by(&records, &fields, &config)?;
    report_diagnostics(&report.diagnostics, globals.quiet);

    if let Some(path) = &args.output {
        let file = File::create(path)
            .with_context(|| format!("Failed to create {}", path.display()))?;
        write_exposure_csv(file, &report.rows, &fields, &ExposureMetric::ALL)?;
        if !globals.quiet {
            print_success(&format!(
                "Wrote {} rows to {}",
                report.rows.len(),
                path.display()
            ));
        }
        return Ok(());
    }

    if globals.format == OutputFormat::Table && !globals.quiet {
        print_header(&format!("Exposure ({})", mode));
    }
    print_exposure_rows(&report.rows, &fields, &ExposureMetric::ALL, globals.format)
}
