//! Positions command implementation.
//!
//! Loads a position file and summarizes it per sub-fund.

use std::collections::BTreeMap;
use std::path::PathBuf;

use anyhow::Result;
use clap::Args;
use rust_decimal::Decimal;
use serde::Serialize;
use tabled::Tabled;

use exposure_core::PositionRecord;

use crate::cli::{GlobalOptions, OutputFormat};
use crate::commands::load_positions;
use crate::output::{print_header, print_output};
use crate::settings::RunConfig;

/// Arguments for the positions command.
#[derive(Args, Debug)]
pub struct PositionsArgs {
    /// Position CSV file
    pub file: PathBuf,

    /// Replace sub-fund long names with subfund001, subfund002, ...
    #[arg(long)]
    pub anonymize: bool,
}

/// One sub-fund in the summary.
#[derive(Debug, Clone, Serialize, Tabled)]
pub struct SubfundSummary {
    #[tabled(rename = "Subfund")]
    pub subfund_code: String,
    #[tabled(rename = "Name")]
    pub name: String,
    #[tabled(rename = "CCY")]
    pub subfund_ccy: String,
    #[tabled(rename = "Dates")]
    pub dates: usize,
    #[tabled(rename = "First")]
    pub first_date: String,
    #[tabled(rename = "Last")]
    pub last_date: String,
    #[tabled(rename = "Positions")]
    pub positions: usize,
    #[tabled(rename = "Long MV")]
    pub long_value: Decimal,
    #[tabled(rename = "Short MV")]
    pub short_value: Decimal,
}

/// Execute the positions command.
pub fn execute(args: PositionsArgs, globals: &GlobalOptions) -> Result<()> {
    let (mut settings, _) = RunConfig::load(globals.config.as_deref())?;
    settings.anonymize |= args.anonymize;

    let records = load_positions(&args.file, &settings)?;
    let summary = summarize(&records);

    if globals.format == OutputFormat::Table && !globals.quiet {
        print_header(&format!(
            "{} positions in {} sub-funds",
            records.len(),
            summary.len()
        ));
    }
    print_output(&summary, globals.format)
}

/// Summarizes records per sub-fund, ordered by code.
pub fn summarize(records: &[PositionRecord]) -> Vec<SubfundSummary> {
    let mut by_subfund: BTreeMap<&str, Vec<&PositionRecord>> = BTreeMap::new();
    for record in records {
        by_subfund
            .entry(record.subfund_code.as_str())
            .or_default()
            .push(record);
    }

    by_subfund
        .into_iter()
        .map(|(code, records)| {
            let mut dates: Vec<_> = records.iter().map(|r| r.valuation_date).collect();
            dates.sort();
            dates.dedup();

            SubfundSummary {
                subfund_code: code.to_string(),
                name: records
                    .iter()
                    .find_map(|r| r.subfund_long_name.clone())
                    .unwrap_or_default(),
                subfund_ccy: records[0].subfund_ccy.clone(),
                dates: dates.len(),
                first_date: dates.first().map(|d| d.to_string()).unwrap_or_default(),
                last_date: dates.last().map(|d| d.to_string()).unwrap_or_default(),
                positions: records.len(),
                long_value: records
                    .iter()
                    .filter(|r| r.is_long())
                    .map(|r| r.market_value)
                    .sum(),
                short_value: records
                    .iter()
                    .filter(|r| r.is_short())
                    .map(|r| r.market_value)
                    .sum(),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn record(code: &str, day: u32, value: i64) -> PositionRecord {
        PositionRecord::builder()
            .subfund_code(code)
            .valuation_date(NaiveDate::from_ymd_opt(2021, 3, day).unwrap())
            .asset_ccy("EUR")
            .market_value(Decimal::from(value))
            .asset_class("Equity")
            .build()
            .unwrap()
    }

    #[test]
    fn test_summarize() {
        let records = [
            record("SF2", 31, 100),
            record("SF1", 30, -40),
            record("SF1", 31, 60),
            record("SF1", 31, 10),
        ];
        let summary = summarize(&records);

        assert_eq!(summary.len(), 2);
        assert_eq!(summary[0].subfund_code, "SF1");
        assert_eq!(summary[0].dates, 2);
        assert_eq!(summary[0].positions, 3);
        assert_eq!(summary[0].first_date, "2021-03-30");
        assert_eq!(summary[0].long_value, Decimal::from(70));
        assert_eq!(summary[0].short_value, Decimal::from(-40));
        assert_eq!(summary[1].positions, 1);
    }
}
