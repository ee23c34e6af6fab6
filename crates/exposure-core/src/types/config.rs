//! Configuration for exposure computation.

use serde::{Deserialize, Serialize};

use super::CurrencyMode;
use crate::fx::{FxTable, UnmappedCurrencyPolicy};

/// Asset class treated as cash when no country of risk is mapped.
pub const DEFAULT_CASH_ASSET_CLASS: &str = "Currency";

/// Configuration for exposure computation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExposureConfig {
    /// Currency in which values are summed and normalized.
    pub currency_mode: CurrencyMode,

    /// Rate table used in EUR mode.
    pub fx: FxTable,

    /// Handling of currencies missing from `fx` in EUR mode.
    pub unmapped_currency: UnmappedCurrencyPolicy,

    /// Asset class segregated as cash by the country/region breakdown.
    pub cash_asset_class: String,
}

impl Default for ExposureConfig {
    fn default() -> Self {
        Self {
            currency_mode: CurrencyMode::AssetCurrency,
            fx: FxTable::fixed(),
            unmapped_currency: UnmappedCurrencyPolicy::PassThrough,
            cash_asset_class: DEFAULT_CASH_ASSET_CLASS.to_string(),
        }
    }
}

impl ExposureConfig {
    /// Creates a config with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a config for EUR mode.
    #[must_use]
    pub fn eur() -> Self {
        Self {
            currency_mode: CurrencyMode::Eur,
            ..Self::default()
        }
    }

    /// Sets the currency mode.
    #[must_use]
    pub fn with_currency_mode(mut self, mode: CurrencyMode) -> Self {
        self.currency_mode = mode;
        self
    }

    /// Sets the rate table.
    #[must_use]
    pub fn with_fx(mut self, fx: FxTable) -> Self {
        self.fx = fx;
        self
    }

    /// Sets the unmapped currency policy.
    #[must_use]
    pub fn with_unmapped_currency(mut self, policy: UnmappedCurrencyPolicy) -> Self {
        self.unmapped_currency = policy;
        self
    }

    /// Sets the cash asset class name.
    #[must_use]
    pub fn with_cash_asset_class(mut self, class: impl Into<String>) -> Self {
        self.cash_asset_class = class.into();
        self
    }

    /// Returns true if `asset_class` is the cash class.
    #[must_use]
    pub fn is_cash(&self, asset_class: &str) -> bool {
        asset_class.trim().eq_ignore_ascii_case(self.cash_asset_class.trim())
    }
}
