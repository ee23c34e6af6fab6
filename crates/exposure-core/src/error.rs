//! Error types for exposure analytics.
//!
//! Hard failures are [`ExposureError`]. Conditions that leave the rest of a
//! calculation intact are reported as [`Diagnostic`] values next to the result.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type for exposure operations.
pub type ExposureResult<T> = Result<T, ExposureError>;

/// Errors that can occur during exposure operations.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ExposureError {
    /// Currency code outside the conversion table under a rejecting policy.
    #[error("No EUR rate for currency '{currency}'")]
    UnmappedCurrency {
        /// The currency code.
        currency: String,
    },

    /// The NAV series has a sampling cadence with no annualization factor.
    #[error("Unsupported NAV frequency: mean gap of {mean_gap_days} days")]
    UnsupportedFrequency {
        /// Mean gap between consecutive observations, in days.
        mean_gap_days: f64,
    },

    /// Not enough observations for the requested statistic.
    #[error("Insufficient data for {subfund}: {observations} observation(s), need at least {required}")]
    InsufficientData {
        /// The sub-fund code.
        subfund: String,
        /// Observations available.
        observations: usize,
        /// Observations required.
        required: usize,
    },

    /// The NAV series is not in ascending date order.
    #[error("NAV series for {subfund} is not sorted by date: {previous} precedes {next}")]
    UnsortedSeries {
        /// The sub-fund code.
        subfund: String,
        /// Earlier row's date.
        previous: NaiveDate,
        /// Later row's date.
        next: NaiveDate,
    },

    /// A country appears twice in the mapping with different regions.
    #[error("Country '{country}' mapped to both '{first}' and '{second}'")]
    DuplicateCountry {
        /// The country code.
        country: String,
        /// Region seen first.
        first: String,
        /// Conflicting region.
        second: String,
    },

    /// Missing required field during construction.
    #[error("Missing required field: {field}")]
    MissingField {
        /// The name of the missing field.
        field: String,
    },

    /// Invalid input.
    #[error("Invalid input: {reason}")]
    InvalidInput {
        /// The reason the input is invalid.
        reason: String,
    },
}

impl ExposureError {
    /// Create an unmapped currency error.
    #[must_use]
    pub fn unmapped_currency(currency: impl Into<String>) -> Self {
        Self::UnmappedCurrency {
            currency: currency.into(),
        }
    }

    /// Create a missing field error.
    #[must_use]
    pub fn missing_field(field: impl Into<String>) -> Self {
        Self::MissingField {
            field: field.into(),
        }
    }

    /// Create an invalid input error.
    #[must_use]
    pub fn invalid_input(reason: impl Into<String>) -> Self {
        Self::InvalidInput {
            reason: reason.into(),
        }
    }
}

/// A non-fatal condition found while computing exposures.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Diagnostic {
    /// Currency had no EUR rate; values were left unconverted.
    UnmappedCurrency {
        /// The currency code.
        currency: String,
        /// Number of records carrying the code.
        records: usize,
    },

    /// Denominator group summed to zero; its percentages are NaN.
    ZeroDenominator {
        /// Sub-fund code.
        subfund_code: String,
        /// Valuation date.
        valuation_date: NaiveDate,
        /// Asset currency (asset-currency mode only).
        currency: Option<String>,
    },

    /// Risk countries absent from the country/region mapping.
    MissingCountryMapping {
        /// Distinct unmatched country codes.
        countries: Vec<String>,
    },
}

impl std::fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UnmappedCurrency { currency, records } => write!(
                f,
                "currency {currency} has no EUR rate, {records} record(s) left unconverted"
            ),
            Self::ZeroDenominator {
                subfund_code,
                valuation_date,
                currency,
            } => match currency {
                Some(ccy) => write!(
                    f,
                    "zero total for {subfund_code} {valuation_date} {ccy}, percentages undefined"
                ),
                None => write!(
                    f,
                    "zero total for {subfund_code} {valuation_date}, percentages undefined"
                ),
            },
            Self::MissingCountryMapping { countries } => {
                write!(f, "no region for risk countries: {}", countries.join(", "))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = ExposureError::unmapped_currency("GBP");
        assert!(err.to_string().contains("GBP"));

        let err = ExposureError::UnsupportedFrequency { mean_gap_days: 3.5 };
        assert!(err.to_string().contains("3.5"));

        let err = ExposureError::missing_field("valuation_date");
        assert!(err.to_string().contains("valuation_date"));

        let err = ExposureError::invalid_input("empty subfund code");
        assert!(err.to_string().contains("empty subfund code"));
    }

    #[test]
    fn test_diagnostic_display() {
        let diag = Diagnostic::ZeroDenominator {
            subfund_code: "SF1".into(),
            valuation_date: NaiveDate::from_ymd_opt(2021, 3, 31).unwrap(),
            currency: Some("USD".into()),
        };
        let text = diag.to_string();
        assert!(text.contains("SF1"));
        assert!(text.contains("2021-03-31"));
        assert!(text.contains("USD"));

        let diag = Diagnostic::MissingCountryMapping {
            countries: vec!["XX".into(), "YY".into()],
        };
        assert!(diag.to_string().ends_with("XX, YY"));
    }

    #[test]
    fn test_diagnostic_serializes_with_kind_tag() {
        let diag = Diagnostic::UnmappedCurrency {
            currency: "GBP".into(),
            records: 2,
        };
        let json = serde_json::to_string(&diag).unwrap();
        assert!(json.contains("\"kind\":\"unmapped_currency\""));
    }
}
