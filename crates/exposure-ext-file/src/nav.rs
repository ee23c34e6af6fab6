//! NAV history sources.
//!
//! NAV files carry `Subfund_Code`, `Valuation_Date` and `NAV` columns with
//! year-first dates. CSV files are read directly; spreadsheets (`.xlsx`,
//! `.xls`, `.ods`) are read from their first worksheet when the `xlsx`
//! feature is enabled.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use chrono::NaiveDate;
use exposure_core::NavRecord;
use serde::Deserialize;
use tracing::info;

use crate::error::{FileError, FileResult};
use crate::positions::parse_decimal;

/// Columns every NAV file must have.
pub const NAV_COLUMNS: [&str; 3] = ["Subfund_Code", "Valuation_Date", "NAV"];

const YEAR_FIRST_FORMATS: [&str; 3] = ["%Y-%m-%d", "%Y/%m/%d", "%Y%m%d"];

#[derive(Debug, Deserialize)]
struct NavRow {
    #[serde(rename = "Subfund_Code")]
    subfund_code: String,
    #[serde(rename = "Valuation_Date")]
    valuation_date: String,
    #[serde(rename = "NAV")]
    nav: String,
}

/// Reads a NAV history, picking the reader from the file extension.
///
/// # Errors
///
/// Returns [`FileError::UnsupportedFormat`] for unknown extensions, and the
/// reader's error for malformed content.
pub fn read_nav(path: impl AsRef<Path>) -> FileResult<Vec<NavRecord>> {
    let path = path.as_ref();
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase)
        .unwrap_or_default();

    let records = match extension.as_str() {
        "csv" | "txt" => {
            let file = File::open(path).map_err(|e| FileError::io(path, e))?;
            read_nav_csv(file)?
        }
        #[cfg(feature = "xlsx")]
        "xlsx" | "xlsm" | "xls" | "ods" => read_nav_spreadsheet(path)?,
        other => return Err(FileError::UnsupportedFormat(format!("'.{other}' NAV file"))),
    };

    info!(path = %path.display(), records = records.len(), "loaded NAV history");
    Ok(records)
}

/// Reads a NAV history in CSV form.
///
/// # Errors
///
/// Returns an error for a missing column or an unparseable field.
pub fn read_nav_csv<R: Read>(reader: R) -> FileResult<Vec<NavRecord>> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers = reader.headers()?.clone();
    for column in NAV_COLUMNS {
        if !headers.iter().any(|h| h == column) {
            return Err(FileError::missing_column(column));
        }
    }

    let mut records = Vec::new();
    for (idx, row) in reader.deserialize::<NavRow>().enumerate() {
        let row = row?;
        let line = idx + 1;
        records.push(NavRecord::new(
            row.subfund_code,
            parse_year_first_date(&row.valuation_date, line)?,
            parse_decimal(&row.nav, line, "NAV")?,
        ));
    }
    Ok(records)
}

/// Reads a NAV history from the first worksheet of a spreadsheet.
///
/// # Errors
///
/// Returns [`FileError::Spreadsheet`] when the workbook cannot be opened or
/// has no worksheet, and a parse error for malformed cells.
#[cfg(feature = "xlsx")]
pub fn read_nav_spreadsheet(path: impl AsRef<Path>) -> FileResult<Vec<NavRecord>> {
    use calamine::{open_workbook_auto, Data, DataType, Reader};
    use rust_decimal::Decimal;

    let path = path.as_ref();
    let mut workbook =
        open_workbook_auto(path).map_err(|e| FileError::Spreadsheet(e.to_string()))?;
    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| FileError::Spreadsheet(format!("{} has no worksheet", path.display())))?
        .map_err(|e| FileError::Spreadsheet(e.to_string()))?;

    let mut rows = range.rows();
    let header: Vec<String> = rows
        .next()
        .map(|cells| cells.iter().map(|c| c.to_string().trim().to_string()).collect())
        .unwrap_or_default();
    let column = |name: &str| {
        header
            .iter()
            .position(|h| h == name)
            .ok_or_else(|| FileError::missing_column(name))
    };
    let code_idx = column("Subfund_Code")?;
    let date_idx = column("Valuation_Date")?;
    let nav_idx = column("NAV")?;

    let mut records = Vec::new();
    for (idx, cells) in rows.enumerate() {
        let line = idx + 1;
        if cells.iter().all(|c| c.is_empty()) {
            continue;
        }
        let cell = |i: usize| cells.get(i).cloned().unwrap_or(Data::Empty);

        let code = cell(code_idx).to_string().trim().to_string();
        let date_cell = cell(date_idx);
        let date = match (&date_cell, date_cell.as_date()) {
            (Data::String(_), _) | (_, None) => {
                parse_year_first_date(date_cell.to_string().trim(), line)?
            }
            (_, Some(date)) => date,
        };
        let nav = match cell(nav_idx) {
            Data::Float(v) => Decimal::try_from(v)
                .map_err(|e| FileError::parse(line, "NAV", e.to_string()))?,
            Data::Int(v) => Decimal::from(v),
            other => parse_decimal(other.to_string().trim(), line, "NAV")?,
        };

        records.push(NavRecord::new(code, date, nav));
    }
    Ok(records)
}

fn parse_year_first_date(value: &str, line: usize) -> FileResult<NaiveDate> {
    let date_part = value.split([' ', 'T']).next().unwrap_or(value);
    YEAR_FIRST_FORMATS
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(date_part, format).ok())
        .ok_or_else(|| {
            FileError::parse(
                line,
                "Valuation_Date",
                format!("'{value}' is not a year-first date"),
            )
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_read_nav_csv() {
        let data = "Subfund_Code,Valuation_Date,NAV\n\
                    SF1,2019-01-07,100.5\n\
                    SF1,2019-01-14 00:00:00,101\n\
                    SF2,2019/01/07,55.25\n";
        let records = read_nav_csv(data.as_bytes()).unwrap();
        assert_eq!(records.len(), 3);
        assert_eq!(records[0].nav, dec!(100.5));
        assert_eq!(
            records[1].valuation_date,
            NaiveDate::from_ymd_opt(2019, 1, 14).unwrap()
        );
        assert_eq!(records[2].subfund_code, "SF2");
    }

    #[test]
    fn test_month_first_date_rejected() {
        let data = "Subfund_Code,Valuation_Date,NAV\nSF1,01/07/2019,100\n";
        let err = read_nav_csv(data.as_bytes()).unwrap_err();
        assert!(matches!(err, FileError::Parse { line: 1, .. }));
    }

    #[test]
    fn test_missing_nav_column() {
        let data = "Subfund_Code,Valuation_Date\nSF1,2019-01-07\n";
        let err = read_nav_csv(data.as_bytes()).unwrap_err();
        assert!(matches!(err, FileError::MissingColumn { .. }));
    }

    #[test]
    fn test_read_nav_by_extension() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nav.csv");
        std::fs::write(&path, "Subfund_Code,Valuation_Date,NAV\nSF1,2020-12-31,10\n").unwrap();
        assert_eq!(read_nav(&path).unwrap().len(), 1);

        let path = dir.path().join("nav.parquet");
        std::fs::write(&path, "").unwrap();
        assert!(matches!(
            read_nav(&path).unwrap_err(),
            FileError::UnsupportedFormat(_)
        ));
    }

    #[cfg(feature = "xlsx")]
    #[test]
    fn test_unreadable_workbook() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nav.xlsx");
        std::fs::write(&path, "not a workbook").unwrap();
        assert!(matches!(
            read_nav(&path).unwrap_err(),
            FileError::Spreadsheet(_)
        ));
    }
}
