//! Grouping keys, denominators and sign views shared by the aggregators.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::types::{CurrencyMode, ExposureRow, MetricValues, PositionRecord};

/// A record paired with the value its metrics are computed from.
///
/// `value` is the sub-fund currency market value, or its EUR equivalent in
/// EUR mode. `region` is filled in by the country/region join.
#[derive(Debug, Clone, Copy)]
pub struct ValuedPosition<'a> {
    /// Source record.
    pub record: &'a PositionRecord,
    /// Value used for totals and metrics.
    pub value: Decimal,
    /// Region of the record's risk country, once joined.
    pub region: Option<&'a str>,
}

impl<'a> ValuedPosition<'a> {
    /// Pairs a record with a value.
    #[must_use]
    pub fn new(record: &'a PositionRecord, value: Decimal) -> Self {
        Self {
            record,
            value,
            region: None,
        }
    }

    /// Attaches a region.
    #[must_use]
    pub fn with_region(mut self, region: &'a str) -> Self {
        self.region = Some(region);
        self
    }
}

/// Optional grouping dimensions beyond sub-fund and date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GroupField {
    /// Asset class.
    AssetClass,
    /// Asset currency.
    AssetCcy,
    /// Sector.
    Sector,
    /// Country of risk.
    CountryOfRisk,
    /// Region (only meaningful after a country/region join).
    Region,
}

impl GroupField {
    /// Column header used in exposure tables.
    #[must_use]
    pub fn column_name(&self) -> &'static str {
        match self {
            GroupField::AssetClass => "Asset_Class",
            GroupField::AssetCcy => "Asset_CCY",
            GroupField::Sector => "Sector",
            GroupField::CountryOfRisk => "Country_of_Risk",
            GroupField::Region => "Region",
        }
    }

    /// Returns this field's value in a row.
    #[must_use]
    pub fn value<'a>(&self, row: &'a ExposureRow) -> Option<&'a str> {
        match self {
            GroupField::AssetClass => row.asset_class.as_deref(),
            GroupField::AssetCcy => row.asset_ccy.as_deref(),
            GroupField::Sector => row.sector.as_deref(),
            GroupField::CountryOfRisk => row.country_of_risk.as_deref(),
            GroupField::Region => row.region.as_deref(),
        }
    }
}

/// Key of one output group.
///
/// Field order drives row ordering: sub-fund, date, asset class, currency,
/// sector, country, region.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct GroupKey {
    /// Sub-fund code.
    pub subfund_code: String,
    /// Valuation date.
    pub valuation_date: NaiveDate,
    /// Asset class, if grouped.
    pub asset_class: Option<String>,
    /// Asset currency, if grouped.
    pub asset_ccy: Option<String>,
    /// Sector, if grouped.
    pub sector: Option<String>,
    /// Country of risk, if grouped.
    pub country_of_risk: Option<String>,
    /// Region, if grouped.
    pub region: Option<String>,
}

impl GroupKey {
    /// Projects a position onto the given fields.
    #[must_use]
    pub fn from_position(position: &ValuedPosition<'_>, fields: &[GroupField]) -> Self {
        let record = position.record;
        let pick = |field: GroupField, value: &str| {
            fields.contains(&field).then(|| value.to_string())
        };

        Self {
            subfund_code: record.subfund_code.clone(),
            valuation_date: record.valuation_date,
            asset_class: pick(GroupField::AssetClass, &record.asset_class),
            asset_ccy: pick(GroupField::AssetCcy, &record.asset_ccy),
            sector: pick(GroupField::Sector, &record.sector),
            country_of_risk: pick(GroupField::CountryOfRisk, &record.country_of_risk),
            region: fields
                .contains(&GroupField::Region)
                .then(|| position.region.unwrap_or_default().to_string()),
        }
    }

    /// Builds the output row for this key.
    #[must_use]
    pub fn into_row(self, total: Decimal, metrics: MetricValues) -> ExposureRow {
        ExposureRow {
            subfund_code: self.subfund_code,
            valuation_date: self.valuation_date,
            asset_class: self.asset_class,
            asset_ccy: self.asset_ccy,
            sector: self.sector,
            country_of_risk: self.country_of_risk,
            region: self.region,
            total,
            metrics,
        }
    }
}

/// Key of a denominator group.
///
/// Asset-currency mode: sub-fund, date and asset currency. EUR mode:
/// sub-fund and date only, pooling all currencies.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DenominatorKey {
    /// Sub-fund code.
    pub subfund_code: String,
    /// Valuation date.
    pub valuation_date: NaiveDate,
    /// Asset currency in asset-currency mode.
    pub currency: Option<String>,
}

impl DenominatorKey {
    /// Returns the denominator key of a record.
    #[must_use]
    pub fn for_record(record: &PositionRecord, mode: CurrencyMode) -> Self {
        Self {
            subfund_code: record.subfund_code.clone(),
            valuation_date: record.valuation_date,
            currency: match mode {
                CurrencyMode::AssetCurrency => Some(record.asset_ccy.clone()),
                CurrencyMode::Eur => None,
            },
        }
    }
}

/// Sums absolute values per denominator group.
#[must_use]
pub fn sum_abs_by_denominator(
    positions: &[ValuedPosition<'_>],
    mode: CurrencyMode,
) -> BTreeMap<DenominatorKey, Decimal> {
    let mut totals: BTreeMap<DenominatorKey, Decimal> = BTreeMap::new();
    for position in positions {
        *totals
            .entry(DenominatorKey::for_record(position.record, mode))
            .or_default() += position.value.abs();
    }
    totals
}

/// Adds the fields a group needs so it never spans two denominators.
#[must_use]
pub fn with_denominator_fields(fields: &[GroupField], mode: CurrencyMode) -> Vec<GroupField> {
    let mut fields = fields.to_vec();
    if mode == CurrencyMode::AssetCurrency && !fields.contains(&GroupField::AssetCcy) {
        fields.push(GroupField::AssetCcy);
    }
    fields.sort();
    fields.dedup();
    fields
}

/// Sign-based partition of positions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignView {
    /// All values as signed.
    Net,
    /// Positive values only.
    Long,
    /// Negative values only.
    Short,
    /// All values as absolute.
    Gross,
}

impl SignView {
    /// All views in output order.
    pub const ALL: [Self; 4] = [Self::Net, Self::Long, Self::Short, Self::Gross];

    /// Returns what a value contributes to this view, or `None` if filtered out.
    #[must_use]
    pub fn contribution(&self, value: Decimal) -> Option<Decimal> {
        match self {
            Self::Net => Some(value),
            Self::Long => (value > Decimal::ZERO).then_some(value),
            Self::Short => (value < Decimal::ZERO).then_some(value),
            Self::Gross => Some(value.abs()),
        }
    }

    fn index(&self) -> usize {
        match self {
            Self::Net => 0,
            Self::Long => 1,
            Self::Short => 2,
            Self::Gross => 3,
        }
    }
}

/// Per-group sums of the four views.
///
/// A view is `None` when no record of the group passed its filter, which is
/// the hole an outer join of the four views leaves.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ViewSums {
    sums: [Option<Decimal>; 4],
}

impl ViewSums {
    /// Adds one value to every view that accepts it.
    pub fn add(&mut self, value: Decimal) {
        for view in SignView::ALL {
            if let Some(contribution) = view.contribution(value) {
                let slot = &mut self.sums[view.index()];
                *slot = Some(slot.unwrap_or_default() + contribution);
            }
        }
    }

    /// Returns the sum of one view.
    #[must_use]
    pub fn get(&self, view: SignView) -> Option<Decimal> {
        self.sums[view.index()]
    }

    /// Converts the sums to percentages of `total`.
    ///
    /// Missing views count as zero. A zero total makes every metric NaN.
    #[must_use]
    pub fn percentages(&self, total: Decimal) -> MetricValues {
        let pct = |view: SignView| percentage(self.get(view).unwrap_or_default(), total);
        MetricValues::new(
            pct(SignView::Net),
            pct(SignView::Long),
            pct(SignView::Short),
            pct(SignView::Gross),
        )
    }
}

/// `value / total * 100`, or NaN when `total` is zero.
#[must_use]
pub fn percentage(value: Decimal, total: Decimal) -> f64 {
    if total.is_zero() {
        return f64::NAN;
    }
    (value / total * Decimal::ONE_HUNDRED)
        .to_f64()
        .unwrap_or(f64::NAN)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn record(ccy: &str, value: Decimal) -> PositionRecord {
        PositionRecord::builder()
            .subfund_code("SF1")
            .valuation_date(NaiveDate::from_ymd_opt(2021, 1, 29).unwrap())
            .asset_ccy(ccy)
            .market_value(value)
            .asset_class("Equity")
            .country_of_risk("US")
            .sector("Tech")
            .build()
            .unwrap()
    }

    #[test]
    fn test_sign_views() {
        assert_eq!(SignView::Net.contribution(dec!(-5)), Some(dec!(-5)));
        assert_eq!(SignView::Long.contribution(dec!(-5)), None);
        assert_eq!(SignView::Short.contribution(dec!(-5)), Some(dec!(-5)));
        assert_eq!(SignView::Gross.contribution(dec!(-5)), Some(dec!(5)));
        assert_eq!(SignView::Long.contribution(Decimal::ZERO), None);
        assert_eq!(SignView::Short.contribution(Decimal::ZERO), None);
    }

    #[test]
    fn test_view_sums_missing_short() {
        let mut sums = ViewSums::default();
        sums.add(dec!(30));
        sums.add(dec!(70));
        assert_eq!(sums.get(SignView::Short), None);

        let pct = sums.percentages(dec!(200));
        assert_eq!(pct.net, Some(50.0));
        assert_eq!(pct.long, Some(50.0));
        assert_eq!(pct.short, Some(0.0));
        assert_eq!(pct.gross, Some(50.0));
    }

    #[test]
    fn test_zero_total_is_nan() {
        let mut sums = ViewSums::default();
        sums.add(Decimal::ZERO);
        let pct = sums.percentages(Decimal::ZERO);
        assert!(pct.net.unwrap().is_nan());
        assert!(pct.short.unwrap().is_nan());
        assert!(pct.has_undefined());
    }

    #[test]
    fn test_denominators_by_mode() {
        let records = [record("USD", dec!(100)), record("USD", dec!(-40)), record("JPY", dec!(60))];
        let positions: Vec<_> = records
            .iter()
            .map(|r| ValuedPosition::new(r, r.market_value))
            .collect();

        let by_ccy = sum_abs_by_denominator(&positions, CurrencyMode::AssetCurrency);
        assert_eq!(by_ccy.len(), 2);
        let usd = DenominatorKey::for_record(&records[0], CurrencyMode::AssetCurrency);
        assert_eq!(by_ccy[&usd], dec!(140));

        let pooled = sum_abs_by_denominator(&positions, CurrencyMode::Eur);
        assert_eq!(pooled.len(), 1);
        assert_eq!(pooled.values().next(), Some(&dec!(200)));
    }

    #[test]
    fn test_group_key_projection() {
        let r = record("USD", dec!(1));
        let position = ValuedPosition::new(&r, r.market_value).with_region("Americas");

        let key = GroupKey::from_position(&position, &[GroupField::AssetClass]);
        assert_eq!(key.asset_class.as_deref(), Some("Equity"));
        assert_eq!(key.asset_ccy, None);
        assert_eq!(key.region, None);

        let key = GroupKey::from_position(
            &position,
            &[GroupField::CountryOfRisk, GroupField::Region, GroupField::Sector],
        );
        assert_eq!(key.country_of_risk.as_deref(), Some("US"));
        assert_eq!(key.region.as_deref(), Some("Americas"));
        assert_eq!(key.sector.as_deref(), Some("Tech"));
    }

    #[test]
    fn test_denominator_fields_added() {
        let fields = with_denominator_fields(&[GroupField::Sector], CurrencyMode::AssetCurrency);
        assert_eq!(fields, [GroupField::AssetCcy, GroupField::Sector]);

        let fields = with_denominator_fields(&[GroupField::Sector], CurrencyMode::Eur);
        assert_eq!(fields, [GroupField::Sector]);
    }

    #[test]
    fn test_percentage() {
        assert!((percentage(dec!(100), dec!(140)) - 71.428_571_428_571_43).abs() < 1e-9);
        assert!(percentage(dec!(1), Decimal::ZERO).is_nan());
    }

    #[test]
    fn test_field_columns() {
        let r = record("USD", dec!(10));
        let position = ValuedPosition::new(&r, r.market_value);
        let row = GroupKey::from_position(&position, &[GroupField::AssetClass, GroupField::AssetCcy])
            .into_row(dec!(10), MetricValues::new(100.0, 100.0, 0.0, 100.0));

        assert_eq!(GroupField::AssetCcy.column_name(), "Asset_CCY");
        assert_eq!(GroupField::AssetClass.value(&row), Some("Equity"));
        assert_eq!(GroupField::AssetCcy.value(&row), Some("USD"));
        assert_eq!(GroupField::Region.value(&row), None);
    }
}
