//! CSV position source.

use std::collections::HashMap;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use std::str::FromStr;

use chrono::NaiveDate;
use exposure_core::PositionRecord;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::{FileError, FileResult};

/// Columns every position file must have.
pub const POSITION_COLUMNS: [&str; 10] = [
    "Subfund_Code",
    "Valuation_Date",
    "Subfund_CCY",
    "Asset_Code",
    "Asset_CCY",
    "Market_Value_in_Subfund_CCY",
    "Asset_Class",
    "Country_of_Risk",
    "Sector",
    "Is_Hedge",
];

/// Month-first date format of the position extracts.
pub const DEFAULT_POSITION_DATE_FORMAT: &str = "%m/%d/%Y";

/// Options for reading a position file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PositionFileOptions {
    /// `chrono` format of `Valuation_Date`.
    pub date_format: String,

    /// Field delimiter.
    pub delimiter: u8,

    /// Replace sub-fund long names with `subfund001`, `subfund002`, ...
    pub anonymize: bool,
}

impl Default for PositionFileOptions {
    fn default() -> Self {
        Self {
            date_format: DEFAULT_POSITION_DATE_FORMAT.to_string(),
            delimiter: b',',
            anonymize: false,
        }
    }
}

impl PositionFileOptions {
    /// Sets the date format.
    #[must_use]
    pub fn with_date_format(mut self, format: impl Into<String>) -> Self {
        self.date_format = format.into();
        self
    }

    /// Sets the delimiter.
    #[must_use]
    pub fn with_delimiter(mut self, delimiter: u8) -> Self {
        self.delimiter = delimiter;
        self
    }

    /// Enables or disables anonymization.
    #[must_use]
    pub fn with_anonymize(mut self, anonymize: bool) -> Self {
        self.anonymize = anonymize;
        self
    }
}

/// CSV record for positions.
#[derive(Debug, Deserialize)]
struct PositionRow {
    #[serde(rename = "Subfund_Code")]
    subfund_code: String,
    #[serde(rename = "Subfund_Long_Name", default)]
    subfund_long_name: Option<String>,
    #[serde(rename = "Valuation_Date")]
    valuation_date: String,
    #[serde(rename = "Subfund_CCY")]
    subfund_ccy: String,
    #[serde(rename = "Asset_Code")]
    asset_code: String,
    #[serde(rename = "Asset_CCY")]
    asset_ccy: String,
    #[serde(rename = "Market_Value_in_Subfund_CCY")]
    market_value: String,
    #[serde(rename = "Asset_Class")]
    asset_class: String,
    #[serde(rename = "Country_of_Risk")]
    country_of_risk: String,
    #[serde(rename = "Sector")]
    sector: String,
    #[serde(rename = "Is_Hedge")]
    is_hedge: String,
}

impl PositionRow {
    fn into_record(self, line: usize, date_format: &str) -> FileResult<PositionRecord> {
        let valuation_date = parse_date(&self.valuation_date, date_format, line, "Valuation_Date")?;
        let market_value = parse_decimal(&self.market_value, line, "Market_Value_in_Subfund_CCY")?;
        let is_hedge = parse_flag(&self.is_hedge, line, "Is_Hedge")?;

        let mut builder = PositionRecord::builder()
            .subfund_code(self.subfund_code)
            .valuation_date(valuation_date)
            .subfund_ccy(self.subfund_ccy)
            .asset_code(self.asset_code)
            .asset_ccy(self.asset_ccy)
            .market_value(market_value)
            .asset_class(self.asset_class)
            .country_of_risk(self.country_of_risk)
            .sector(self.sector)
            .is_hedge(is_hedge);
        if let Some(name) = self.subfund_long_name.filter(|n| !n.is_empty()) {
            builder = builder.subfund_long_name(name);
        }

        builder
            .build()
            .map_err(|e| FileError::parse(line, "Subfund_Code", e.to_string()))
    }
}

/// Reads positions from a file.
///
/// # Errors
///
/// Returns an error if the file cannot be opened, a required column is
/// missing, or any field fails to parse.
pub fn read_positions(
    path: impl AsRef<Path>,
    options: &PositionFileOptions,
) -> FileResult<Vec<PositionRecord>> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|e| FileError::io(path, e))?;
    let records = read_positions_from_reader(file, options)?;
    info!(path = %path.display(), records = records.len(), "loaded positions");
    Ok(records)
}

/// Reads positions from any reader.
///
/// # Errors
///
/// See [`read_positions`].
pub fn read_positions_from_reader<R: Read>(
    reader: R,
    options: &PositionFileOptions,
) -> FileResult<Vec<PositionRecord>> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(options.delimiter)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers = reader.headers()?.clone();
    for column in POSITION_COLUMNS {
        if !headers.iter().any(|h| h == column) {
            return Err(FileError::missing_column(column));
        }
    }

    let mut records = Vec::new();
    for (idx, row) in reader.deserialize::<PositionRow>().enumerate() {
        records.push(row?.into_record(idx + 1, &options.date_format)?);
    }

    if options.anonymize {
        anonymize_subfund_names(&mut records);
    }
    Ok(records)
}

/// Replaces each distinct sub-fund long name with `subfundNNN`, numbered in
/// order of first appearance.
pub fn anonymize_subfund_names(records: &mut [PositionRecord]) {
    let mut aliases: HashMap<String, String> = HashMap::new();
    for record in records.iter_mut() {
        if let Some(name) = record.subfund_long_name.take() {
            let next = aliases.len() + 1;
            let alias = aliases
                .entry(name)
                .or_insert_with(|| format!("subfund{next:03}"))
                .clone();
            record.subfund_long_name = Some(alias);
        }
    }
}

/// Distinct sub-fund names in order of first appearance.
///
/// Uses the long name where present, the code otherwise.
#[must_use]
pub fn subfund_names(records: &[PositionRecord]) -> Vec<String> {
    let mut names: Vec<String> = Vec::new();
    for record in records {
        let name = record
            .subfund_long_name
            .as_deref()
            .unwrap_or(&record.subfund_code);
        if !names.iter().any(|n| n == name) {
            names.push(name.to_string());
        }
    }
    names
}

pub(crate) fn parse_date(
    value: &str,
    format: &str,
    line: usize,
    column: &str,
) -> FileResult<NaiveDate> {
    NaiveDate::parse_from_str(value, format).map_err(|e| {
        FileError::parse(line, column, format!("'{value}' does not match {format}: {e}"))
    })
}

pub(crate) fn parse_decimal(value: &str, line: usize, column: &str) -> FileResult<Decimal> {
    Decimal::from_str(value)
        .or_else(|_| Decimal::from_scientific(value))
        .map_err(|_| FileError::parse(line, column, format!("'{value}' is not a number")))
}

fn parse_flag(value: &str, line: usize, column: &str) -> FileResult<bool> {
    match value {
        "Yes" => Ok(true),
        "No" => Ok(false),
        other => Err(FileError::parse(
            line,
            column,
            format!("expected Yes or No, got '{other}'"),
        )),
    }
}
