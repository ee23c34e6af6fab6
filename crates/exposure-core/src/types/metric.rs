//! Exposure metrics and currency modes.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ExposureError;

/// One of the four exposure views.
///
/// Ordering is the fixed output column order: net, long, short, gross.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExposureMetric {
    /// Signed sum of all values.
    Net,
    /// Sum of positive values.
    Long,
    /// Sum of negative values.
    Short,
    /// Sum of absolute values.
    Gross,
}

impl ExposureMetric {
    /// All metrics in output order.
    pub const ALL: [Self; 4] = [Self::Net, Self::Long, Self::Short, Self::Gross];

    /// Returns the lowercase metric name.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::Net => "net",
            Self::Long => "long",
            Self::Short => "short",
            Self::Gross => "gross",
        }
    }

    /// Returns the output column name, e.g. `ExposurePercentage_net`.
    #[must_use]
    pub fn column_name(&self) -> &'static str {
        match self {
            Self::Net => "ExposurePercentage_net",
            Self::Long => "ExposurePercentage_long",
            Self::Short => "ExposurePercentage_short",
            Self::Gross => "ExposurePercentage_gross",
        }
    }
}

impl std::fmt::Display for ExposureMetric {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for ExposureMetric {
    type Err = ExposureError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "net" => Ok(Self::Net),
            "long" => Ok(Self::Long),
            "short" => Ok(Self::Short),
            "gross" => Ok(Self::Gross),
            other => Err(ExposureError::invalid_input(format!(
                "unknown exposure metric '{other}'"
            ))),
        }
    }
}

/// Exposure percentages of one output row.
///
/// A metric is `None` only when it was projected away. `Some(NaN)` marks a
/// percentage whose denominator was zero.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct MetricValues {
    /// Net exposure in percent.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub net: Option<f64>,
    /// Long exposure in percent.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub long: Option<f64>,
    /// Short exposure in percent (zero or negative).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub short: Option<f64>,
    /// Gross exposure in percent.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gross: Option<f64>,
}

impl MetricValues {
    /// Creates values with all four metrics present.
    #[must_use]
    pub fn new(net: f64, long: f64, short: f64, gross: f64) -> Self {
        Self {
            net: Some(net),
            long: Some(long),
            short: Some(short),
            gross: Some(gross),
        }
    }

    /// Returns the value of one metric.
    #[must_use]
    pub fn get(&self, metric: ExposureMetric) -> Option<f64> {
        match metric {
            ExposureMetric::Net => self.net,
            ExposureMetric::Long => self.long,
            ExposureMetric::Short => self.short,
            ExposureMetric::Gross => self.gross,
        }
    }

    /// Keeps only the given metrics.
    #[must_use]
    pub fn project(&self, metrics: &[ExposureMetric]) -> Self {
        let keep = |m: ExposureMetric, v: Option<f64>| if metrics.contains(&m) { v } else { None };
        Self {
            net: keep(ExposureMetric::Net, self.net),
            long: keep(ExposureMetric::Long, self.long),
            short: keep(ExposureMetric::Short, self.short),
            gross: keep(ExposureMetric::Gross, self.gross),
        }
    }

    /// Iterates the present metrics in output order.
    pub fn iter(&self) -> impl Iterator<Item = (ExposureMetric, f64)> + '_ {
        ExposureMetric::ALL
            .into_iter()
            .filter_map(move |m| self.get(m).map(|v| (m, v)))
    }

    /// Returns true if any present metric is undefined.
    #[must_use]
    pub fn has_undefined(&self) -> bool {
        self.iter().any(|(_, v)| v.is_nan())
    }
}

/// Currency in which values are summed and normalized.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CurrencyMode {
    /// Sub-fund currency values, denominators per asset currency.
    #[default]
    AssetCurrency,
    /// Values converted to EUR, one denominator per sub-fund and date.
    Eur,
}

impl CurrencyMode {
    /// Returns the mode for a `use_eur` flag.
    #[must_use]
    pub fn from_eur_flag(use_eur: bool) -> Self {
        if use_eur {
            Self::Eur
        } else {
            Self::AssetCurrency
        }
    }

    /// Returns true for EUR mode.
    #[must_use]
    pub fn is_eur(&self) -> bool {
        matches!(self, Self::Eur)
    }

    /// Returns a human-readable name for the mode.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::AssetCurrency => "Asset CCY",
            Self::Eur => "EUR",
        }
    }
}

impl std::fmt::Display for CurrencyMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metric_order_and_names() {
        let names: Vec<_> = ExposureMetric::ALL.iter().map(|m| m.name()).collect();
        assert_eq!(names, ["net", "long", "short", "gross"]);
        assert!(ExposureMetric::Net < ExposureMetric::Gross);
        assert_eq!(ExposureMetric::Short.column_name(), "ExposurePercentage_short");
    }

    #[test]
    fn test_metric_from_str() {
        assert_eq!("Gross".parse::<ExposureMetric>().unwrap(), ExposureMetric::Gross);
        assert!("delta".parse::<ExposureMetric>().is_err());
    }

    #[test]
    fn test_projection_keeps_fixed_order() {
        let values = MetricValues::new(1.0, 2.0, -1.0, 3.0);
        let projected = values.project(&[ExposureMetric::Gross, ExposureMetric::Net]);
        let present: Vec<_> = projected.iter().map(|(m, _)| m).collect();
        assert_eq!(present, [ExposureMetric::Net, ExposureMetric::Gross]);
        assert_eq!(projected.long, None);
    }

    #[test]
    fn test_has_undefined() {
        assert!(!MetricValues::new(1.0, 1.0, 0.0, 1.0).has_undefined());
        assert!(MetricValues::new(f64::NAN, 0.0, 0.0, f64::NAN).has_undefined());
    }

    #[test]
    fn test_currency_mode() {
        assert_eq!(CurrencyMode::default(), CurrencyMode::AssetCurrency);
        assert!(CurrencyMode::from_eur_flag(true).is_eur());
        assert_eq!(format!("{}", CurrencyMode::Eur), "EUR");
    }
}
