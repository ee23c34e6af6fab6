//! Fixed-rate conversion to EUR.
//!
//! Rates are quoted as units of foreign currency per EUR, so a foreign value
//! is divided by its rate to obtain EUR.

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::error::{ExposureError, ExposureResult};

/// What to do with a currency that has no rate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnmappedCurrencyPolicy {
    /// Keep the value unconverted and report a diagnostic.
    #[default]
    PassThrough,
    /// Fail the calculation.
    Reject,
}

/// Currency code to EUR rate table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FxTable {
    rates: BTreeMap<String, Decimal>,
}

impl Default for FxTable {
    fn default() -> Self {
        Self::fixed()
    }
}

impl FxTable {
    /// The standard snapshot: USD, CNY, JPY, RUB and EUR.
    #[must_use]
    pub fn fixed() -> Self {
        let rates = [
            ("EUR", dec!(1.0)),
            ("USD", dec!(1.18)),
            ("CNY", dec!(7.63)),
            ("JPY", dec!(129.70)),
            ("RUB", dec!(86.79)),
        ]
        .into_iter()
        .map(|(ccy, rate)| (ccy.to_string(), rate))
        .collect();
        Self { rates }
    }

    /// A table holding only EUR.
    #[must_use]
    pub fn eur_only() -> Self {
        let mut rates = BTreeMap::new();
        rates.insert("EUR".to_string(), Decimal::ONE);
        Self { rates }
    }

    /// Adds or replaces a rate.
    ///
    /// # Errors
    ///
    /// Returns an error if the rate is not strictly positive.
    pub fn with_rate(mut self, currency: impl Into<String>, rate: Decimal) -> ExposureResult<Self> {
        let currency = currency.into().trim().to_uppercase();
        if rate <= Decimal::ZERO {
            return Err(ExposureError::invalid_input(format!(
                "EUR rate for {currency} must be positive, got {rate}"
            )));
        }
        self.rates.insert(currency, rate);
        Ok(self)
    }

    /// Returns the rate for a currency.
    #[must_use]
    pub fn rate(&self, currency: &str) -> Option<Decimal> {
        self.rates.get(currency).copied()
    }

    /// Returns true if the currency has a rate.
    #[must_use]
    pub fn contains(&self, currency: &str) -> bool {
        self.rates.contains_key(currency)
    }

    /// Iterates `(currency, rate)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (&str, Decimal)> {
        self.rates.iter().map(|(c, r)| (c.as_str(), *r))
    }

    /// Converts a signed value to EUR.
    ///
    /// # Errors
    ///
    /// Returns [`ExposureError::UnmappedCurrency`] if the currency has no rate.
    pub fn to_eur(&self, value: Decimal, currency: &str) -> ExposureResult<Decimal> {
        self.rate(currency)
            .map(|rate| value / rate)
            .ok_or_else(|| ExposureError::unmapped_currency(currency))
    }

    /// Converts a signed value to EUR, leaving it unconverted when the
    /// currency has no rate.
    #[must_use]
    pub fn to_eur_or_unconverted(&self, value: Decimal, currency: &str) -> Decimal {
        self.to_eur(value, currency).unwrap_or(value)
    }
}

/// Converts a value to EUR with the fixed snapshot table.
///
/// Unknown currencies come back unconverted.
#[must_use]
pub fn to_eur(value: Decimal, currency: &str) -> Decimal {
    FxTable::fixed().to_eur_or_unconverted(value, currency)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixed_rates() {
        let fx = FxTable::fixed();
        assert_eq!(fx.to_eur(dec!(118), "USD").unwrap(), dec!(100));
        assert_eq!(fx.to_eur(dec!(-763), "CNY").unwrap(), dec!(-100));
        assert_eq!(fx.to_eur(dec!(12970), "JPY").unwrap(), dec!(100));
        assert_eq!(fx.to_eur(dec!(86.79), "RUB").unwrap(), dec!(1));
        assert_eq!(fx.to_eur(dec!(42.5), "EUR").unwrap(), dec!(42.5));
    }

    #[test]
    fn test_unmapped_currency() {
        let fx = FxTable::fixed();
        assert_eq!(
            fx.to_eur(dec!(10), "GBP").unwrap_err(),
            ExposureError::unmapped_currency("GBP")
        );
        assert_eq!(fx.to_eur_or_unconverted(dec!(10), "GBP"), dec!(10));
        assert_eq!(to_eur(dec!(10), "GBP"), dec!(10));
    }

    #[test]
    fn test_override_rate() {
        let fx = FxTable::fixed().with_rate("gbp", dec!(0.85)).unwrap();
        assert_eq!(fx.rate("GBP"), Some(dec!(0.85)));
        assert_eq!(fx.to_eur(dec!(0.85), "GBP").unwrap(), dec!(1));
    }

    #[test]
    fn test_non_positive_rate_rejected() {
        assert!(FxTable::fixed().with_rate("USD", Decimal::ZERO).is_err());
    }

    #[test]
    fn test_eur_only() {
        let fx = FxTable::eur_only();
        assert!(fx.contains("EUR"));
        assert!(!fx.contains("USD"));
    }
}
