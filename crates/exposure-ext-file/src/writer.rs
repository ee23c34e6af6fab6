//! Exposure table CSV output.

use std::io::Write;

use exposure_core::aggregation::GroupField;
use exposure_core::{ExposureMetric, ExposureRow};

use crate::error::FileResult;

/// Header row for an exposure table with the given grouping and metrics.
///
/// Columns follow a fixed order: `Subfund_Code`, `Valuation_Date`, the
/// grouping columns in field order, then one `ExposurePercentage_*` column
/// per metric in net, long, short, gross order.
#[must_use]
pub fn exposure_headers(fields: &[GroupField], metrics: &[ExposureMetric]) -> Vec<&'static str> {
    let mut fields = fields.to_vec();
    fields.sort();
    fields.dedup();

    let mut headers = vec!["Subfund_Code", "Valuation_Date"];
    headers.extend(fields.iter().map(GroupField::column_name));
    headers.extend(
        ExposureMetric::ALL
            .iter()
            .filter(|m| metrics.contains(m))
            .map(ExposureMetric::column_name),
    );
    headers
}

/// Writes exposure rows as CSV.
///
/// Undefined percentages are written as `NaN`; metrics projected away are
/// written as empty fields.
///
/// # Errors
///
/// Returns an error if writing fails.
pub fn write_exposure_csv<W: Write>(
    writer: W,
    rows: &[ExposureRow],
    fields: &[GroupField],
    metrics: &[ExposureMetric],
) -> FileResult<()> {
    let mut fields = fields.to_vec();
    fields.sort();
    fields.dedup();
    let metrics: Vec<ExposureMetric> = ExposureMetric::ALL
        .into_iter()
        .filter(|m| metrics.contains(m))
        .collect();

    let mut writer = csv::Writer::from_writer(writer);
    writer.write_record(exposure_headers(&fields, &metrics))?;

    for row in rows {
        let mut record = vec![row.subfund_code.clone(), row.valuation_date.to_string()];
        record.extend(
            fields
                .iter()
                .map(|f| f.value(row).unwrap_or_default().to_string()),
        );
        record.extend(
            metrics
                .iter()
                .map(|m| row.metric(*m).map(format_percentage).unwrap_or_default()),
        );
        writer.write_record(&record)?;
    }

    writer.flush().map_err(csv::Error::from)?;
    Ok(())
}

fn format_percentage(value: f64) -> String {
    if value.is_nan() {
        "NaN".to_string()
    } else {
        value.to_string()
    }
}
