//! Net, long, short and gross exposure by sub-fund and date.
//!
//! Each group's four sums are divided by the absolute-value total of its
//! denominator group and scaled to percent. In asset-currency mode the
//! denominator is per sub-fund, date and asset currency; in EUR mode values
//! are converted first and the denominator pools all currencies per sub-fund
//! and date.

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::grouping::{
    sum_abs_by_denominator, with_denominator_fields, DenominatorKey, GroupField, GroupKey,
    ValuedPosition, ViewSums,
};
use crate::error::{Diagnostic, ExposureError, ExposureResult};
use crate::fx::UnmappedCurrencyPolicy;
use crate::types::{CurrencyMode, ExposureConfig, ExposureRow, PositionRecord};

/// Result of an exposure calculation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExposureReport {
    /// Currency mode the rows were computed in.
    pub currency_mode: CurrencyMode,
    /// One row per group, ordered by grouping key.
    pub rows: Vec<ExposureRow>,
    /// Non-fatal conditions met along the way.
    pub diagnostics: Vec<Diagnostic>,
}

impl ExposureReport {
    /// Returns the rows whose percentages are undefined.
    pub fn undefined_rows(&self) -> impl Iterator<Item = &ExposureRow> {
        self.rows.iter().filter(|r| r.is_undefined())
    }
}

/// Default grouping for a currency mode.
///
/// Asset class and asset currency in asset-currency mode, asset class alone
/// in EUR mode.
#[must_use]
pub fn default_group_fields(mode: CurrencyMode) -> Vec<GroupField> {
    match mode {
        CurrencyMode::AssetCurrency => vec![GroupField::AssetClass, GroupField::AssetCcy],
        CurrencyMode::Eur => vec![GroupField::AssetClass],
    }
}

/// Calculates exposures by sub-fund, date, asset class and (in asset-currency
/// mode) asset currency.
///
/// # Errors
///
/// Fails only when EUR conversion meets an unmapped currency under
/// [`UnmappedCurrencyPolicy::Reject`].
///
/// # Example
///
/// ```rust,ignore
/// let report = calculate_exposure(&records, &ExposureConfig::eur())?;
/// for row in &report.rows {
///     println!("{} {:?} net={:.2}%", row.subfund_code, row.asset_class, row.net());
/// }
/// ```
pub fn calculate_exposure(
    records: &[PositionRecord],
    config: &ExposureConfig,
) -> ExposureResult<ExposureReport> {
    calculate_exposure_by(records, &default_group_fields(config.currency_mode), config)
}

/// Calculates exposures grouped by sub-fund, date and the given fields.
///
/// In asset-currency mode [`GroupField::AssetCcy`] is always added so that a
/// group shares a single denominator.
///
/// # Errors
///
/// See [`calculate_exposure`].
pub fn calculate_exposure_by(
    records: &[PositionRecord],
    fields: &[GroupField],
    config: &ExposureConfig,
) -> ExposureResult<ExposureReport> {
    let mode = config.currency_mode;
    let (positions, mut diagnostics) = value_positions(records, config)?;
    let totals = sum_abs_by_denominator(&positions, mode);
    diagnostics.extend(zero_denominator_diagnostics(&totals));

    let fields = with_denominator_fields(fields, mode);
    let rows = aggregate_views(&positions, &totals, &fields, mode);
    debug!(
        records = records.len(),
        groups = rows.len(),
        mode = %mode,
        "calculated exposure"
    );

    Ok(ExposureReport {
        currency_mode: mode,
        rows,
        diagnostics,
    })
}

/// Pairs each record with the value its metrics use.
///
/// In EUR mode the sub-fund currency value is converted with the configured
/// table; each record maps independently and the source is left untouched.
pub(crate) fn value_positions<'a>(
    records: &'a [PositionRecord],
    config: &ExposureConfig,
) -> ExposureResult<(Vec<ValuedPosition<'a>>, Vec<Diagnostic>)> {
    if !config.currency_mode.is_eur() {
        let positions = records
            .iter()
            .map(|r| ValuedPosition::new(r, r.market_value))
            .collect();
        return Ok((positions, Vec::new()));
    }

    let mut unmapped: BTreeMap<&str, usize> = BTreeMap::new();
    let mut positions = Vec::with_capacity(records.len());
    for record in records {
        let value = match config.fx.to_eur(record.market_value, &record.subfund_ccy) {
            Ok(eur) => eur,
            Err(err) => match config.unmapped_currency {
                UnmappedCurrencyPolicy::Reject => return Err(err),
                UnmappedCurrencyPolicy::PassThrough => {
                    *unmapped.entry(record.subfund_ccy.as_str()).or_default() += 1;
                    record.market_value
                }
            },
        };
        positions.push(ValuedPosition::new(record, value));
    }

    let diagnostics = unmapped
        .into_iter()
        .map(|(currency, count)| {
            warn!(currency, records = count, "no EUR rate, values left unconverted");
            Diagnostic::UnmappedCurrency {
                currency: currency.to_string(),
                records: count,
            }
        })
        .collect();

    Ok((positions, diagnostics))
}

/// Reports every denominator group whose total is zero.
pub(crate) fn zero_denominator_diagnostics(
    totals: &BTreeMap<DenominatorKey, Decimal>,
) -> Vec<Diagnostic> {
    totals
        .iter()
        .filter(|(_, total)| total.is_zero())
        .map(|(key, _)| {
            warn!(
                subfund = %key.subfund_code,
                date = %key.valuation_date,
                currency = ?key.currency,
                "zero exposure total, percentages undefined"
            );
            Diagnostic::ZeroDenominator {
                subfund_code: key.subfund_code.clone(),
                valuation_date: key.valuation_date,
                currency: key.currency.clone(),
            }
        })
        .collect()
}

/// Sums the four sign views per group and normalizes them.
///
/// `fields` must already carry the denominator fields for `mode`.
pub(crate) fn aggregate_views(
    positions: &[ValuedPosition<'_>],
    totals: &BTreeMap<DenominatorKey, Decimal>,
    fields: &[GroupField],
    mode: CurrencyMode,
) -> Vec<ExposureRow> {
    let mut groups: BTreeMap<GroupKey, (Decimal, ViewSums)> = BTreeMap::new();
    for position in positions {
        let total = totals
            .get(&DenominatorKey::for_record(position.record, mode))
            .copied()
            .unwrap_or_default();
        groups
            .entry(GroupKey::from_position(position, fields))
            .or_insert_with(|| (total, ViewSums::default()))
            .1
            .add(position.value);
    }

    groups
        .into_iter()
        .map(|(key, (total, sums))| key.into_row(total, sums.percentages(total)))
        .collect()
}

/// Rejects a calculation request with nothing to compute.
pub(crate) fn ensure_not_empty<T>(items: &[T], what: &str) -> ExposureResult<()> {
    if items.is_empty() {
        return Err(ExposureError::invalid_input(format!("no {what} requested")));
    }
    Ok(())
}
