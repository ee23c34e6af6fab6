//! Annualized NAV volatility.
//!
//! The sampling frequency is inferred from the mean gap between consecutive
//! valuation dates, and the sample standard deviation of the NAV level is
//! scaled by the matching annualization factor.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use rust_decimal::prelude::ToPrimitive;
use serde::{Deserialize, Serialize};
use statrs::statistics::Statistics;
use tracing::debug;

use crate::error::{ExposureError, ExposureResult};
use crate::types::NavRecord;

const GAP_TOLERANCE: f64 = 1e-9;

/// Sampling frequency of a NAV series.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SamplingFrequency {
    /// One-day gaps, 252 periods a year.
    Daily,
    /// Seven-day gaps, 52 periods a year.
    Weekly,
    /// Thirty-day gaps, 12 periods a year.
    Monthly,
}

impl SamplingFrequency {
    /// Classifies a mean gap in days. Only exact 1, 7 and 30 are recognized.
    #[must_use]
    pub fn from_mean_gap(days: f64) -> Option<Self> {
        [(1.0, Self::Daily), (7.0, Self::Weekly), (30.0, Self::Monthly)]
            .into_iter()
            .find(|(gap, _)| (days - gap).abs() < GAP_TOLERANCE)
            .map(|(_, freq)| freq)
    }

    /// Periods per year.
    #[must_use]
    pub fn periods_per_year(&self) -> u32 {
        match self {
            Self::Daily => 252,
            Self::Weekly => 52,
            Self::Monthly => 12,
        }
    }

    /// Square root of the periods per year.
    #[must_use]
    pub fn annualization_factor(&self) -> f64 {
        f64::from(self.periods_per_year()).sqrt()
    }

    /// Returns a human-readable name.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::Daily => "Daily",
            Self::Weekly => "Weekly",
            Self::Monthly => "Monthly",
        }
    }
}

impl std::fmt::Display for SamplingFrequency {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Annualized volatility of one sub-fund's NAV.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VolatilityEstimate {
    /// Sub-fund code.
    pub subfund_code: String,
    /// Observations strictly before this date were used.
    pub as_of: NaiveDate,
    /// Inferred sampling frequency.
    pub frequency: SamplingFrequency,
    /// Number of observations used.
    pub observations: usize,
    /// Mean gap between observations, in days.
    pub mean_gap_days: f64,
    /// Sample standard deviation of the NAV level.
    pub std_dev: f64,
    /// `std_dev` times the annualization factor.
    pub annualized: f64,
}

/// Annualized volatility of `subfund`'s NAV using observations before `as_of`.
///
/// The series must be in ascending date order; it is not re-sorted.
///
/// # Errors
///
/// - [`ExposureError::InsufficientData`] with fewer than two observations
/// - [`ExposureError::UnsortedSeries`] if dates are not strictly increasing
/// - [`ExposureError::UnsupportedFrequency`] if the mean gap is not 1, 7 or 30 days
pub fn annualized_volatility(
    nav: &[NavRecord],
    subfund: &str,
    as_of: NaiveDate,
) -> ExposureResult<VolatilityEstimate> {
    let series: Vec<&NavRecord> = nav
        .iter()
        .filter(|r| r.subfund_code == subfund && r.valuation_date < as_of)
        .collect();

    if series.len() < 2 {
        return Err(ExposureError::InsufficientData {
            subfund: subfund.to_string(),
            observations: series.len(),
            required: 2,
        });
    }

    let mut gap_days = 0i64;
    for pair in series.windows(2) {
        let (previous, next) = (pair[0].valuation_date, pair[1].valuation_date);
        if next <= previous {
            return Err(ExposureError::UnsortedSeries {
                subfund: subfund.to_string(),
                previous,
                next,
            });
        }
        gap_days += (next - previous).num_days();
    }

    let mean_gap_days = gap_days as f64 / (series.len() - 1) as f64;
    let frequency = SamplingFrequency::from_mean_gap(mean_gap_days)
        .ok_or(ExposureError::UnsupportedFrequency { mean_gap_days })?;

    let levels: Vec<f64> = series
        .iter()
        .map(|r| r.nav.to_f64().unwrap_or(f64::NAN))
        .collect();
    let std_dev = levels.iter().std_dev();
    let annualized = std_dev * frequency.annualization_factor();

    debug!(
        subfund,
        observations = series.len(),
        frequency = %frequency,
        annualized,
        "estimated NAV volatility"
    );

    Ok(VolatilityEstimate {
        subfund_code: subfund.to_string(),
        as_of,
        frequency,
        observations: series.len(),
        mean_gap_days,
        std_dev,
        annualized,
    })
}

/// Runs [`annualized_volatility`] for every sub-fund in the series.
///
/// Results are keyed by sub-fund code; a failure for one sub-fund does not
/// affect the others.
#[must_use]
pub fn annualized_volatility_by_subfund(
    nav: &[NavRecord],
    as_of: NaiveDate,
) -> BTreeMap<String, ExposureResult<VolatilityEstimate>> {
    let mut subfunds: Vec<&str> = nav.iter().map(|r| r.subfund_code.as_str()).collect();
    subfunds.sort_unstable();
    subfunds.dedup();

    subfunds
        .into_iter()
        .map(|code| (code.to_string(), annualized_volatility(nav, code, as_of)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use chrono::Duration;
    use rust_decimal::Decimal;

    fn series(subfund: &str, start: NaiveDate, step: i64, navs: &[f64]) -> Vec<NavRecord> {
        navs.iter()
            .enumerate()
            .map(|(i, nav)| {
                NavRecord::new(
                    subfund,
                    start + Duration::days(step * i as i64),
                    Decimal::try_from(*nav).unwrap(),
                )
            })
            .collect()
    }

    fn start() -> NaiveDate {
        NaiveDate::from_ymd_opt(2020, 1, 6).unwrap()
    }

    #[test]
    fn test_frequency_table() {
        assert_eq!(SamplingFrequency::from_mean_gap(1.0), Some(SamplingFrequency::Daily));
        assert_eq!(SamplingFrequency::from_mean_gap(7.0), Some(SamplingFrequency::Weekly));
        assert_eq!(SamplingFrequency::from_mean_gap(30.0), Some(SamplingFrequency::Monthly));
        assert_eq!(SamplingFrequency::from_mean_gap(1.4), None);
        assert_relative_eq!(SamplingFrequency::Weekly.annualization_factor(), 52f64.sqrt());
    }

    #[test]
    fn test_weekly_series() {
        let nav = series("SF1", start(), 7, &[100.0, 102.0, 101.0, 104.0, 103.0]);
        let as_of = start() + Duration::days(365);
        let est = annualized_volatility(&nav, "SF1", as_of).unwrap();

        // mean 102, squared deviations 4+0+1+4+1 = 10, sample variance 2.5
        assert_eq!(est.frequency, SamplingFrequency::Weekly);
        assert_eq!(est.observations, 5);
        assert_relative_eq!(est.std_dev, 2.5f64.sqrt(), epsilon = 1e-12);
        assert_relative_eq!(est.annualized, 2.5f64.sqrt() * 52f64.sqrt(), epsilon = 1e-12);
    }

    #[test]
    fn test_as_of_is_exclusive() {
        let nav = series("SF1", start(), 1, &[10.0, 11.0, 12.0, 50.0]);
        let as_of = start() + Duration::days(3);
        let est = annualized_volatility(&nav, "SF1", as_of).unwrap();
        assert_eq!(est.observations, 3);
        assert_relative_eq!(est.std_dev, 1.0, epsilon = 1e-12);
        assert_relative_eq!(est.annualized, 252f64.sqrt(), epsilon = 1e-12);
    }

    #[test]
    fn test_other_subfunds_ignored() {
        let mut nav = series("SF1", start(), 30, &[1.0, 2.0, 3.0]);
        nav.extend(series("SF2", start(), 1, &[5.0, 9.0]));
        let est = annualized_volatility(&nav, "SF1", start() + Duration::days(90)).unwrap();
        assert_eq!(est.frequency, SamplingFrequency::Monthly);
        assert_eq!(est.observations, 3);
    }

    #[test]
    fn test_unsupported_frequency() {
        let nav = series("SF1", start(), 3, &[1.0, 2.0, 3.0]);
        let err = annualized_volatility(&nav, "SF1", start() + Duration::days(30)).unwrap_err();
        assert_eq!(err, ExposureError::UnsupportedFrequency { mean_gap_days: 3.0 });
    }

    #[test]
    fn test_irregular_gaps_average_out() {
        // gaps of 5 and 9 days average to a weekly cadence
        let mut nav = series("SF1", start(), 5, &[1.0, 2.0]);
        nav.push(NavRecord::new("SF1", start() + Duration::days(14), Decimal::from(3)));
        let est = annualized_volatility(&nav, "SF1", start() + Duration::days(30)).unwrap();
        assert_eq!(est.frequency, SamplingFrequency::Weekly);
    }

    #[test]
    fn test_insufficient_data() {
        let nav = series("SF1", start(), 1, &[1.0]);
        let err = annualized_volatility(&nav, "SF1", start() + Duration::days(10)).unwrap_err();
        assert!(matches!(
            err,
            ExposureError::InsufficientData { observations: 1, required: 2, .. }
        ));

        let err = annualized_volatility(&nav, "NOPE", start()).unwrap_err();
        assert!(matches!(err, ExposureError::InsufficientData { observations: 0, .. }));
    }

    #[test]
    fn test_unsorted_series_rejected() {
        let mut nav = series("SF1", start(), 1, &[1.0, 2.0, 3.0]);
        nav.swap(0, 2);
        let err = annualized_volatility(&nav, "SF1", start() + Duration::days(10)).unwrap_err();
        assert!(matches!(err, ExposureError::UnsortedSeries { .. }));
    }

    #[test]
    fn test_by_subfund() {
        let mut nav = series("SF2", start(), 7, &[1.0, 2.0, 4.0]);
        nav.extend(series("SF1", start(), 2, &[1.0, 2.0]));
        let results = annualized_volatility_by_subfund(&nav, start() + Duration::days(60));
        assert_eq!(results.len(), 2);
        assert!(results["SF1"].is_err());
        assert!(results["SF2"].is_ok());
    }
}
