//! Exposure output rows.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::{ExposureMetric, MetricValues};

/// One exposure row: a grouping identity and its percentages.
///
/// Grouping fields the calculation did not group by are `None`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExposureRow {
    /// Sub-fund identifier.
    pub subfund_code: String,
    /// Valuation date.
    pub valuation_date: NaiveDate,
    /// Asset class.
    pub asset_class: Option<String>,
    /// Asset currency.
    pub asset_ccy: Option<String>,
    /// Sector.
    pub sector: Option<String>,
    /// Country of risk.
    pub country_of_risk: Option<String>,
    /// Region of the country of risk.
    pub region: Option<String>,
    /// Sum of absolute values of the denominator group.
    pub total: Decimal,
    /// Exposure percentages.
    pub metrics: MetricValues,
}

impl ExposureRow {
    /// Returns one metric.
    #[must_use]
    pub fn metric(&self, metric: ExposureMetric) -> Option<f64> {
        self.metrics.get(metric)
    }

    /// Net exposure, NaN if projected away.
    #[must_use]
    pub fn net(&self) -> f64 {
        self.metrics.net.unwrap_or(f64::NAN)
    }

    /// Long exposure, NaN if projected away.
    #[must_use]
    pub fn long(&self) -> f64 {
        self.metrics.long.unwrap_or(f64::NAN)
    }

    /// Short exposure, NaN if projected away.
    #[must_use]
    pub fn short(&self) -> f64 {
        self.metrics.short.unwrap_or(f64::NAN)
    }

    /// Gross exposure, NaN if projected away.
    #[must_use]
    pub fn gross(&self) -> f64 {
        self.metrics.gross.unwrap_or(f64::NAN)
    }

    /// Returns true if the row's denominator was zero.
    #[must_use]
    pub fn is_undefined(&self) -> bool {
        self.metrics.has_undefined()
    }
}
