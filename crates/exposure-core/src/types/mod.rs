//! Domain types for exposure analytics.
//!
//! - [`PositionRecord`]: One sub-fund position on a valuation date
//! - [`NavRecord`]: One NAV observation
//! - [`CountryRegionMap`]: Country to region lookup
//! - [`ExposureMetric`] / [`MetricValues`]: The four exposure views
//! - [`ExposureRow`]: One aggregated output row
//! - [`ExposureConfig`]: Configuration for exposure computation

mod config;
mod country;
mod metric;
mod record;
mod row;

pub use config::{ExposureConfig, DEFAULT_CASH_ASSET_CLASS};
pub use country::CountryRegionMap;
pub use metric::{CurrencyMode, ExposureMetric, MetricValues};
pub use record::{NavRecord, PositionRecord, PositionRecordBuilder};
pub use row::ExposureRow;
