//! Run configuration loaded from TOML.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::debug;

use exposure_core::{CurrencyMode, ExposureConfig, FxTable, UnmappedCurrencyPolicy};
use exposure_ext_file::{PositionFileOptions, DEFAULT_POSITION_DATE_FORMAT};

use crate::error::{CliError, CliResult};

/// File looked up in the working directory when `--config` is not given.
pub const DEFAULT_CONFIG_FILE: &str = "exposure.toml";

/// Run configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunConfig {
    /// `chrono` format of `Valuation_Date` in position files
    #[serde(default = "default_date_format")]
    pub date_format: String,

    /// Position file delimiter
    #[serde(default = "default_delimiter")]
    pub delimiter: String,

    /// Replace sub-fund long names on load
    #[serde(default)]
    pub anonymize: bool,

    /// Asset class set aside as cash by the country/region breakdown
    #[serde(default = "default_cash_asset_class")]
    pub cash_asset_class: String,

    /// Currencies without an EUR rate
    #[serde(default)]
    pub unmapped_currency: UnmappedCurrencyPolicy,

    /// Units of currency per EUR, applied over the fixed table
    #[serde(default = "default_fx_rates")]
    pub fx_rates: BTreeMap<String, Decimal>,
}

fn default_date_format() -> String {
    DEFAULT_POSITION_DATE_FORMAT.to_string()
}

fn default_delimiter() -> String {
    ",".to_string()
}

fn default_cash_asset_class() -> String {
    exposure_core::DEFAULT_CASH_ASSET_CLASS.to_string()
}

fn default_fx_rates() -> BTreeMap<String, Decimal> {
    FxTable::fixed()
        .iter()
        .map(|(ccy, rate)| (ccy.to_string(), rate))
        .collect()
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            date_format: default_date_format(),
            delimiter: default_delimiter(),
            anonymize: false,
            cash_asset_class: default_cash_asset_class(),
            unmapped_currency: UnmappedCurrencyPolicy::default(),
            fx_rates: default_fx_rates(),
        }
    }
}

impl RunConfig {
    /// Loads configuration from a TOML file.
    pub fn from_file(path: &Path) -> CliResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| CliError::Config {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
        toml::from_str(&content).map_err(|e| CliError::Config {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })
    }

    /// Loads the explicit file, else `./exposure.toml` if present, else defaults.
    ///
    /// Returns the file the configuration came from, if any.
    pub fn load(explicit: Option<&Path>) -> CliResult<(Self, Option<PathBuf>)> {
        let path = match explicit {
            Some(path) => Some(path.to_path_buf()),
            None => Some(PathBuf::from(DEFAULT_CONFIG_FILE)).filter(|p| p.exists()),
        };

        match path {
            Some(path) => {
                debug!(path = %path.display(), "loading run configuration");
                Ok((Self::from_file(&path)?, Some(path)))
            }
            None => Ok((Self::default(), None)),
        }
    }

    /// Serializes to TOML.
    pub fn to_toml(&self) -> anyhow::Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Position file options.
    pub fn position_options(&self) -> CliResult<PositionFileOptions> {
        let delimiter = match self.delimiter.as_bytes() {
            [b] if b.is_ascii() => *b,
            _ => return Err(CliError::InvalidDelimiter(self.delimiter.clone())),
        };
        Ok(PositionFileOptions::default()
            .with_date_format(self.date_format.clone())
            .with_delimiter(delimiter)
            .with_anonymize(self.anonymize))
    }

    /// Effective rate table: the fixed table with configured rates applied.
    pub fn fx_table(&self) -> anyhow::Result<FxTable> {
        let mut fx = FxTable::fixed();
        for (ccy, rate) in &self.fx_rates {
            fx = fx.with_rate(ccy.as_str(), *rate)?;
        }
        Ok(fx)
    }

    /// Exposure configuration for a currency mode.
    pub fn exposure_config(&self, mode: CurrencyMode) -> anyhow::Result<ExposureConfig> {
        Ok(ExposureConfig::new()
            .with_currency_mode(mode)
            .with_fx(self.fx_table()?)
            .with_unmapped_currency(self.unmapped_currency)
            .with_cash_asset_class(self.cash_asset_class.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_defaults_from_empty_file() {
        let config: RunConfig = toml::from_str("").unwrap();
        assert_eq!(config, RunConfig::default());
        assert_eq!(config.position_options().unwrap(), PositionFileOptions::default());
    }

    #[test]
    fn test_partial_file() {
        let config: RunConfig = toml::from_str(
            r#"
date_format = "%d.%m.%Y"
delimiter = ";"
unmapped_currency = "reject"

[fx_rates]
GBP = 0.86
"#,
        )
        .unwrap();

        let options = config.position_options().unwrap();
        assert_eq!(options.delimiter, b';');
        assert_eq!(options.date_format, "%d.%m.%Y");

        let exposure = config.exposure_config(CurrencyMode::Eur).unwrap();
        assert_eq!(exposure.unmapped_currency, UnmappedCurrencyPolicy::Reject);
        assert_eq!(
            exposure.fx.rate("GBP").map(|r| r.round_dp(6)),
            Some(Decimal::from_str("0.86").unwrap())
        );
        // Overrides replace the default table only where given
        assert!(exposure.fx.contains("USD"));
    }

    #[test]
    fn test_bad_delimiter() {
        let config = RunConfig {
            delimiter: "||".into(),
            ..RunConfig::default()
        };
        assert!(matches!(
            config.position_options(),
            Err(CliError::InvalidDelimiter(_))
        ));
    }

    #[test]
    fn test_toml_round_trip() {
        let config = RunConfig::default();
        let text = config.to_toml().unwrap();
        assert!(text.contains("date_format"));
        let parsed: RunConfig = toml::from_str(&text).unwrap();
        assert_eq!(parsed.cash_asset_class, config.cash_asset_class);
        assert_eq!(parsed.fx_rates.len(), config.fx_rates.len());
    }
}
