//! Exposure aggregation.
//!
//! - **Exposure**: net / long / short / gross by sub-fund, date, asset class
//!   and currency
//! - **Country/region**: the same metrics broken down by country of risk and
//!   region, with unmatched and cash positions returned separately
//!
//! All functions are pure - they read position records and return new rows
//! without modifying their inputs.
//!
//! # Example
//!
//! ```rust,ignore
//! use exposure_core::aggregation::*;
//! use exposure_core::prelude::*;
//!
//! let config = ExposureConfig::default();
//! let by_ccy = calculate_exposure(&records, &config)?;
//! let in_eur = calculate_exposure(&records, &config.clone().with_currency_mode(CurrencyMode::Eur))?;
//! ```

mod country_region;
mod exposure;
pub mod grouping;

pub use country_region::*;
pub use exposure::*;
pub use grouping::GroupField;
