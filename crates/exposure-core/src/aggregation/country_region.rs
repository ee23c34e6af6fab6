//! Exposure broken down by country of risk and region.
//!
//! Positions are joined to a [`CountryRegionMap`] on their country of risk.
//! Unmatched cash positions are set aside, unmatched non-cash positions are
//! reported and left out. Denominators are taken over every position before
//! the join, so percentages stay comparable with [`calculate_exposure`].
//!
//! [`calculate_exposure`]: super::calculate_exposure

use std::collections::BTreeSet;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::exposure::{
    aggregate_views, ensure_not_empty, value_positions, zero_denominator_diagnostics,
};
use super::grouping::{sum_abs_by_denominator, GroupField, ValuedPosition};
use crate::error::{Diagnostic, ExposureResult};
use crate::types::{
    CountryRegionMap, CurrencyMode, ExposureConfig, ExposureMetric, ExposureRow, PositionRecord,
};

/// A non-cash position whose country of risk has no region.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnmatchedPosition {
    /// Sub-fund code.
    pub subfund_code: String,
    /// Valuation date.
    pub valuation_date: NaiveDate,
    /// Asset code.
    pub asset_code: String,
    /// Asset class.
    pub asset_class: String,
    /// The unmatched country of risk (may be empty).
    pub country_of_risk: String,
}

impl From<&PositionRecord> for UnmatchedPosition {
    fn from(record: &PositionRecord) -> Self {
        Self {
            subfund_code: record.subfund_code.clone(),
            valuation_date: record.valuation_date,
            asset_code: record.asset_code.clone(),
            asset_class: record.asset_class.clone(),
            country_of_risk: record.country_of_risk.clone(),
        }
    }
}

/// Result of a country/region exposure calculation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CountryRegionReport {
    /// Currency mode the rows were computed in.
    pub currency_mode: CurrencyMode,
    /// Metrics present in each row, in output order.
    pub metrics: Vec<ExposureMetric>,
    /// Exposure rows for the requested asset classes.
    pub rows: Vec<ExposureRow>,
    /// Non-cash positions without a region, excluded from `rows`.
    pub unmatched: Vec<UnmatchedPosition>,
    /// Cash positions without a region, excluded from `rows`.
    pub cash: Vec<PositionRecord>,
    /// Non-fatal conditions met along the way.
    pub diagnostics: Vec<Diagnostic>,
}

impl CountryRegionReport {
    /// Distinct unmatched risk countries, sorted.
    #[must_use]
    pub fn unmatched_countries(&self) -> Vec<String> {
        self.unmatched
            .iter()
            .map(|p| p.country_of_risk.clone())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }
}

/// Grouping used by the breakdown: asset class, asset currency (asset-currency
/// mode only), country of risk and region.
#[must_use]
pub fn country_region_fields(mode: CurrencyMode) -> Vec<GroupField> {
    let mut fields = vec![GroupField::AssetClass];
    if mode == CurrencyMode::AssetCurrency {
        fields.push(GroupField::AssetCcy);
    }
    fields.extend([GroupField::CountryOfRisk, GroupField::Region]);
    fields
}

/// Calculates exposures by sub-fund, date, asset class, country of risk and
/// region.
///
/// Only rows whose asset class is in `asset_classes` are returned, and only
/// the `metrics` requested are filled in, in the fixed order net, long,
/// short, gross.
///
/// # Errors
///
/// Fails if `metrics` is empty, or when EUR conversion meets an unmapped
/// currency under a rejecting policy.
///
/// # Example
///
/// ```rust,ignore
/// let classes = BTreeSet::from(["Equity".to_string()]);
/// let report = calculate_exposure_by_country_region(
///     &map, &records, &classes, &[ExposureMetric::Net], &ExposureConfig::default())?;
/// for country in report.unmatched_countries() {
///     eprintln!("no region for {country}");
/// }
/// ```
pub fn calculate_exposure_by_country_region(
    country_region: &CountryRegionMap,
    records: &[PositionRecord],
    asset_classes: &BTreeSet<String>,
    metrics: &[ExposureMetric],
    config: &ExposureConfig,
) -> ExposureResult<CountryRegionReport> {
    ensure_not_empty(metrics, "exposure metrics")?;
    let mode = config.currency_mode;

    let (positions, mut diagnostics) = value_positions(records, config)?;
    let totals = sum_abs_by_denominator(&positions, mode);
    diagnostics.extend(zero_denominator_diagnostics(&totals));

    let JoinOutcome {
        matched,
        unmatched,
        cash,
    } = join_regions(country_region, positions, config);

    let countries: BTreeSet<&str> = unmatched.iter().map(|p| p.country_of_risk.as_str()).collect();
    if !countries.is_empty() {
        warn!(
            positions = unmatched.len(),
            countries = ?countries,
            "risk countries without region, positions excluded"
        );
        diagnostics.push(Diagnostic::MissingCountryMapping {
            countries: countries.into_iter().map(str::to_string).collect(),
        });
    }

    let selected: Vec<ExposureMetric> = ExposureMetric::ALL
        .into_iter()
        .filter(|m| metrics.contains(m))
        .collect();
    let rows: Vec<ExposureRow> =
        aggregate_views(&matched, &totals, &country_region_fields(mode), mode)
            .into_iter()
            .filter(|row| {
                row.asset_class
                    .as_ref()
                    .is_some_and(|class| asset_classes.contains(class))
            })
            .map(|mut row| {
                row.metrics = row.metrics.project(&selected);
                row
            })
            .collect();

    debug!(
        records = records.len(),
        matched = matched.len(),
        unmatched = unmatched.len(),
        cash = cash.len(),
        rows = rows.len(),
        "calculated country/region exposure"
    );

    Ok(CountryRegionReport {
        currency_mode: mode,
        metrics: selected,
        rows,
        unmatched,
        cash,
        diagnostics,
    })
}

struct JoinOutcome<'a> {
    matched: Vec<ValuedPosition<'a>>,
    unmatched: Vec<UnmatchedPosition>,
    cash: Vec<PositionRecord>,
}

/// Attaches regions and splits off positions without one.
///
/// Mapping entries no position refers to carry no value and drop out here.
fn join_regions<'a>(
    country_region: &'a CountryRegionMap,
    positions: Vec<ValuedPosition<'a>>,
    config: &ExposureConfig,
) -> JoinOutcome<'a> {
    let mut outcome = JoinOutcome {
        matched: Vec::with_capacity(positions.len()),
        unmatched: Vec::new(),
        cash: Vec::new(),
    };

    for position in positions {
        let region = position
            .record
            .risk_country()
            .and_then(|country| country_region.region(country));

        match region {
            Some(region) => outcome.matched.push(position.with_region(region)),
            None if config.is_cash(&position.record.asset_class) => {
                outcome.cash.push(position.record.clone());
            }
            None => outcome.unmatched.push(UnmatchedPosition::from(position.record)),
        }
    }
    outcome
}
