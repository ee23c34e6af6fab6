//! Country/region command implementation.
//!
//! Exposure broken down by country of risk and region.

use std::collections::BTreeSet;
use std::fs::File;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;

use exposure_core::{
    calculate_exposure_by_country_region, country_region_fields, CurrencyMode, ExposureConfig,
    ExposureMetric, PositionRecord,
};
use exposure_ext_file::{read_country_region, write_exposure_csv};

use crate::cli::{GlobalOptions, OutputFormat};
use crate::commands::{load_positions, report_diagnostics};
use crate::error::CliError;
use crate::output::{print_exposure_rows, print_header, print_info, print_success};
use crate::settings::RunConfig;

/// Arguments for the country-region command.
#[derive(Args, Debug)]
pub struct CountryRegionArgs {
    /// Position CSV file
    pub positions: PathBuf,

    /// Country to region mapping CSV file
    pub country_region: PathBuf,

    /// Convert to EUR and normalize per sub-fund and date
    #[arg(long)]
    pub eur: bool,

    /// Asset classes to report (default: every non-cash class present)
    #[arg(long = "asset-class")]
    pub asset_classes: Vec<String>,

    /// Metrics to report: net, long, short, gross (default: all)
    #[arg(long = "metric", value_parser = parse_metric)]
    pub metrics: Vec<ExposureMetric>,

    /// Write the exposure table to a CSV file
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

fn parse_metric(s: &str) -> Result<ExposureMetric, CliError> {
    s.parse().map_err(|_| CliError::InvalidMetric(s.to_string()))
}

/// Execute the country-region command.
pub fn execute(args: CountryRegionArgs, globals: &GlobalOptions) -> Result<()> {
    let (settings, _) = RunConfig::load(globals.config.as_deref())?;
    let mode = CurrencyMode::from_eur_flag(args.eur);
    let config = settings.exposure_config(mode)?;

    let records = load_positions(&args.positions, &settings)?;
    let map = read_country_region(&args.country_region).with_context(|| {
        format!(
            "Failed to read country/region mapping from {}",
            args.country_region.display()
        )
    })?;

    let asset_classes = if args.asset_classes.is_empty() {
        non_cash_classes(&records, &config)
    } else {
        args.asset_classes.iter().cloned().collect()
    };
    let metrics = if args.metrics.is_empty() {
        ExposureMetric::ALL.to_vec()
    } else {
        args.metrics.clone()
    };

    let report =
        calculate_exposure_by_country_region(&map, &records, &asset_classes, &metrics, &config)?;
    report_diagnostics(&report.diagnostics, globals.quiet);

    let fields = country_region_fields(mode);
    if let Some(path) = &args.output {
        let file = File::create(path)
            .with_context(|| format!("Failed to create {}", path.display()))?;
        write_exposure_csv(file, &report.rows, &fields, &report.metrics)?;
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
        print_header(&format!("Exposure by Country/Region ({})", mode));
        if !report.cash.is_empty() {
            print_info(&format!(
                "{} cash position(s) without a country of risk set aside",
                report.cash.len()
            ));
        }
    }
    print_exposure_rows(&report.rows, &fields, &report.metrics, globals.format)
}

/// Distinct asset classes in the records, excluding the cash class.
pub fn non_cash_classes(records: &[PositionRecord], config: &ExposureConfig) -> BTreeSet<String> {
    records
        .iter()
        .filter(|r| !config.is_cash(&r.asset_class))
        .map(|r| r.asset_class.clone())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use rust_decimal::Decimal;

    fn record(asset_class: &str) -> PositionRecord {
        PositionRecord::builder()
            .subfund_code("SF1")
            .valuation_date(NaiveDate::from_ymd_opt(2021, 3, 31).unwrap())
            .asset_ccy("EUR")
            .market_value(Decimal::ONE)
            .asset_class(asset_class)
            .build()
            .unwrap()
    }

    #[test]
    fn test_non_cash_classes() {
        let records = [record("Equity"), record("Currency"), record("Fixed Income")];
        let classes = non_cash_classes(&records, &ExposureConfig::default());
        assert_eq!(
            classes.into_iter().collect::<Vec<_>>(),
            ["Equity", "Fixed Income"]
        );
    }

    #[test]
    fn test_parse_metric() {
        assert_eq!(parse_metric("Gross").unwrap(), ExposureMetric::Gross);
        assert!(parse_metric("beta").is_err());
    }
}
