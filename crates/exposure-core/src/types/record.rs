//! Position and NAV records.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{ExposureError, ExposureResult};

/// One position of a sub-fund on a valuation date.
///
/// The sign of `market_value` gives the side: positive is long, negative is
/// short, zero is flat. Aggregations read records by reference and never
/// modify them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PositionRecord {
    /// Sub-fund identifier.
    pub subfund_code: String,

    /// Sub-fund display name. Administrative, ignored by every metric.
    pub subfund_long_name: Option<String>,

    /// Valuation date.
    pub valuation_date: NaiveDate,

    /// Sub-fund reference currency.
    pub subfund_ccy: String,

    /// Asset identifier.
    pub asset_code: String,

    /// Asset currency.
    pub asset_ccy: String,

    /// Signed market value in sub-fund currency.
    pub market_value: Decimal,

    /// Asset class (e.g. "Equity", "Fixed Income", "Currency").
    pub asset_class: String,

    /// Country of risk code, empty when the asset has none.
    pub country_of_risk: String,

    /// Sector.
    pub sector: String,

    /// Hedge flag. Administrative, ignored by every metric.
    pub is_hedge: bool,
}

impl PositionRecord {
    /// Creates a new builder.
    #[must_use]
    pub fn builder() -> PositionRecordBuilder {
        PositionRecordBuilder::new()
    }

    /// Returns true for a long position.
    #[must_use]
    pub fn is_long(&self) -> bool {
        self.market_value > Decimal::ZERO
    }

    /// Returns true for a short position.
    #[must_use]
    pub fn is_short(&self) -> bool {
        self.market_value < Decimal::ZERO
    }

    /// Returns the country of risk, or `None` when blank.
    #[must_use]
    pub fn risk_country(&self) -> Option<&str> {
        let country = self.country_of_risk.trim();
        if country.is_empty() {
            None
        } else {
            Some(country)
        }
    }
}

/// Builder for [`PositionRecord`].
#[derive(Debug, Clone, Default)]
pub struct PositionRecordBuilder {
    subfund_code: Option<String>,
    subfund_long_name: Option<String>,
    valuation_date: Option<NaiveDate>,
    subfund_ccy: Option<String>,
    asset_code: String,
    asset_ccy: Option<String>,
    market_value: Option<Decimal>,
    asset_class: Option<String>,
    country_of_risk: String,
    sector: String,
    is_hedge: bool,
}

impl PositionRecordBuilder {
    /// Creates a new builder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the sub-fund code.
    #[must_use]
    pub fn subfund_code(mut self, code: impl Into<String>) -> Self {
        self.subfund_code = Some(code.into());
        self
    }

    /// Sets the sub-fund display name.
    #[must_use]
    pub fn subfund_long_name(mut self, name: impl Into<String>) -> Self {
        self.subfund_long_name = Some(name.into());
        self
    }

    /// Sets the valuation date.
    #[must_use]
    pub fn valuation_date(mut self, date: NaiveDate) -> Self {
        self.valuation_date = Some(date);
        self
    }

    /// Sets the sub-fund currency. Defaults to EUR.
    #[must_use]
    pub fn subfund_ccy(mut self, ccy: impl Into<String>) -> Self {
        self.subfund_ccy = Some(ccy.into());
        self
    }

    /// Sets the asset code.
    #[must_use]
    pub fn asset_code(mut self, code: impl Into<String>) -> Self {
        self.asset_code = code.into();
        self
    }

    /// Sets the asset currency.
    #[must_use]
    pub fn asset_ccy(mut self, ccy: impl Into<String>) -> Self {
        self.asset_ccy = Some(ccy.into());
        self
    }

    /// Sets the signed market value in sub-fund currency.
    #[must_use]
    pub fn market_value(mut self, value: Decimal) -> Self {
        self.market_value = Some(value);
        self
    }

    /// Sets the asset class.
    #[must_use]
    pub fn asset_class(mut self, class: impl Into<String>) -> Self {
        self.asset_class = Some(class.into());
        self
    }

    /// Sets the country of risk.
    #[must_use]
    pub fn country_of_risk(mut self, country: impl Into<String>) -> Self {
        self.country_of_risk = country.into();
        self
    }

    /// Sets the sector.
    #[must_use]
    pub fn sector(mut self, sector: impl Into<String>) -> Self {
        self.sector = sector.into();
        self
    }

    /// Sets the hedge flag.
    #[must_use]
    pub fn is_hedge(mut self, hedge: bool) -> Self {
        self.is_hedge = hedge;
        self
    }

    /// Builds the record.
    ///
    /// # Errors
    ///
    /// Returns an error if a required field is missing or the sub-fund code is blank.
    pub fn build(self) -> ExposureResult<PositionRecord> {
        let subfund_code = self
            .subfund_code
            .ok_or_else(|| ExposureError::missing_field("subfund_code"))?;
        if subfund_code.trim().is_empty() {
            return Err(ExposureError::invalid_input("subfund_code is blank"));
        }

        let valuation_date = self
            .valuation_date
            .ok_or_else(|| ExposureError::missing_field("valuation_date"))?;
        let asset_ccy = self
            .asset_ccy
            .ok_or_else(|| ExposureError::missing_field("asset_ccy"))?;
        let market_value = self
            .market_value
            .ok_or_else(|| ExposureError::missing_field("market_value"))?;
        let asset_class = self
            .asset_class
            .ok_or_else(|| ExposureError::missing_field("asset_class"))?;

        Ok(PositionRecord {
            subfund_code,
            subfund_long_name: self.subfund_long_name,
            valuation_date,
            subfund_ccy: self.subfund_ccy.unwrap_or_else(|| "EUR".to_string()),
            asset_code: self.asset_code,
            asset_ccy,
            market_value,
            asset_class,
            country_of_risk: self.country_of_risk,
            sector: self.sector,
            is_hedge: self.is_hedge,
        })
    }
}

/// Net asset value of a sub-fund on a valuation date.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NavRecord {
    /// Sub-fund identifier.
    pub subfund_code: String,

    /// Valuation date.
    pub valuation_date: NaiveDate,

    /// Net asset value.
    pub nav: Decimal,
}

impl NavRecord {
    /// Creates a new NAV record.
    #[must_use]
    pub fn new(subfund_code: impl Into<String>, valuation_date: NaiveDate, nav: Decimal) -> Self {
        Self {
            subfund_code: subfund_code.into(),
            valuation_date,
            nav,
        }
    }
}
