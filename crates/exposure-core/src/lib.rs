//! # Exposure Core
//!
//! Risk exposure and NAV volatility analytics for investment sub-funds.
//!
//! ## Design Philosophy
//!
//! - **Pure functions**: All calculations are stateless with explicit inputs
//! - **Records in, rows out**: File formats live in `exposure-ext-file`
//! - **Partial results**: Conditions affecting one group are returned as
//!   [`Diagnostic`]s instead of failing the whole calculation
//!
//! ## Features
//!
//! - **Exposure**: Net, long, short and gross percentages per sub-fund, date,
//!   asset class and currency
//! - **EUR mode**: Fixed-rate conversion with one denominator per sub-fund and date
//! - **Country/Region**: Breakdown joined from a country to region mapping
//! - **Volatility**: Annualized NAV volatility with frequency inference
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use exposure_core::prelude::*;
//!
//! let record = PositionRecord::builder()
//!     .subfund_code("SF1")
//!     .valuation_date(NaiveDate::from_ymd_opt(2021, 3, 31).unwrap())
//!     .asset_ccy("USD")
//!     .market_value(dec!(100))
//!     .asset_class("Equity")
//!     .build()?;
//!
//! let report = calculate_exposure(&[record], &ExposureConfig::default())?;
//! println!("net = {:.2}%", report.rows[0].net());
//! ```
//!
//! ## Module Overview
//!
//! - [`aggregation`] - Exposure and country/region aggregation
//! - [`fx`] - Fixed-rate EUR conversion
//! - [`volatility`] - Annualized NAV volatility
//! - [`types`] - Records, rows, metrics and configuration

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]
#![allow(clippy::module_name_repetitions)]

pub mod aggregation;
pub mod error;
pub mod fx;
pub mod types;
pub mod volatility;

// Re-export error types at crate root
pub use error::{Diagnostic, ExposureError, ExposureResult};

pub use types::{
    CountryRegionMap, CurrencyMode, ExposureConfig, ExposureMetric, ExposureRow, MetricValues,
    NavRecord, PositionRecord, PositionRecordBuilder, DEFAULT_CASH_ASSET_CLASS,
};

pub use fx::{to_eur, FxTable, UnmappedCurrencyPolicy};

pub use aggregation::{
    calculate_exposure, calculate_exposure_by, calculate_exposure_by_country_region,
    country_region_fields, default_group_fields, CountryRegionReport, ExposureReport, GroupField,
    UnmatchedPosition,
};

pub use volatility::{
    annualized_volatility, annualized_volatility_by_subfund, SamplingFrequency,
    VolatilityEstimate,
};

/// Prelude module for convenient imports.
///
/// ```rust,ignore
/// use exposure_core::prelude::*;
/// ```
pub mod prelude {
    pub use crate::error::{Diagnostic, ExposureError, ExposureResult};

    pub use crate::types::{
        CountryRegionMap, CurrencyMode, ExposureConfig, ExposureMetric, ExposureRow,
        MetricValues, NavRecord, PositionRecord,
    };

    pub use crate::fx::{FxTable, UnmappedCurrencyPolicy};

    pub use crate::aggregation::{
        calculate_exposure, calculate_exposure_by, calculate_exposure_by_country_region,
        CountryRegionReport, ExposureReport, GroupField,
    };

    pub use crate::volatility::{annualized_volatility, SamplingFrequency, VolatilityEstimate};

    // Re-export commonly used types from dependencies
    pub use chrono::NaiveDate;
    pub use rust_decimal::Decimal;
    pub use rust_decimal_macros::dec;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_crate_compiles() {
        let err = ExposureError::unmapped_currency("GBP");
        assert!(err.to_string().contains("GBP"));
    }
}
