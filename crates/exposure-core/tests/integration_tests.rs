//! Integration tests for exposure-core.
//!
//! These tests run the public entry points on small multi-fund portfolios.

use std::collections::BTreeSet;

use approx::assert_relative_eq;
use exposure_core::prelude::*;
use exposure_core::{annualized_volatility_by_subfund, Diagnostic};

// =============================================================================
// TEST FIXTURES
// =============================================================================

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

#[allow(clippy::too_many_arguments)]
fn position(
    subfund: &str,
    valuation_date: NaiveDate,
    subfund_ccy: &str,
    asset_ccy: &str,
    class: &str,
    country: &str,
    value: Decimal,
) -> PositionRecord {
    PositionRecord::builder()
        .subfund_code(subfund)
        .subfund_long_name(format!("{subfund} Global Opportunities"))
        .valuation_date(valuation_date)
        .subfund_ccy(subfund_ccy)
        .asset_code(format!("{subfund}-{class}-{country}-{value}"))
        .asset_ccy(asset_ccy)
        .market_value(value)
        .asset_class(class)
        .country_of_risk(country)
        .sector("Diversified")
        .build()
        .unwrap()
}

/// Two sub-funds over two month-ends, mixed currencies and sides.
fn create_portfolio() -> Vec<PositionRecord> {
    let jan = date(2021, 1, 29);
    let feb = date(2021, 2, 26);
    vec![
        position("EQ1", jan, "EUR", "EUR", "Equity", "DE", dec!(500)),
        position("EQ1", jan, "EUR", "EUR", "Equity", "FR", dec!(-100)),
        position("EQ1", jan, "EUR", "USD", "Equity", "US", dec!(300)),
        position("EQ1", jan, "EUR", "USD", "Fixed Income", "US", dec!(200)),
        position("EQ1", jan, "EUR", "EUR", "Currency", "", dec!(50)),
        position("EQ1", feb, "EUR", "EUR", "Equity", "DE", dec!(400)),
        position("EQ1", feb, "EUR", "EUR", "Equity", "BR", dec!(-200)),
        position("FI2", jan, "USD", "USD", "Fixed Income", "US", dec!(1180)),
        position("FI2", jan, "USD", "JPY", "Fixed Income", "JP", dec!(-590)),
        position("FI2", jan, "USD", "USD", "Currency", "", dec!(-118)),
    ]
}

fn country_map() -> CountryRegionMap {
    CountryRegionMap::from_pairs([
        ("DE", "Europe"),
        ("FR", "Europe"),
        ("US", "North America"),
        ("JP", "Asia Pacific"),
        ("CH", "Europe"),
    ])
    .unwrap()
}

// =============================================================================
// EXPOSURE
// =============================================================================

#[test]
fn test_metric_identities_hold_for_every_row() {
    let records = create_portfolio();
    for config in [ExposureConfig::default(), ExposureConfig::eur()] {
        let report = calculate_exposure(&records, &config).unwrap();
        assert!(!report.rows.is_empty());
        for row in &report.rows {
            assert_relative_eq!(row.net(), row.long() + row.short(), epsilon = 1e-9);
            assert_relative_eq!(row.gross(), row.long().abs() + row.short().abs(), epsilon = 1e-9);
            assert!(row.long() >= 0.0);
            assert!(row.short() <= 0.0);
        }
    }
}

#[test]
fn test_gross_sums_to_hundred_per_denominator() {
    let records = create_portfolio();

    let report = calculate_exposure(&records, &ExposureConfig::default()).unwrap();
    let mut by_denominator: std::collections::BTreeMap<_, f64> = Default::default();
    for row in &report.rows {
        *by_denominator
            .entry((row.subfund_code.clone(), row.valuation_date, row.asset_ccy.clone()))
            .or_default() += row.gross();
    }
    for gross in by_denominator.values() {
        assert_relative_eq!(*gross, 100.0, epsilon = 1e-9);
    }

    let report = calculate_exposure(&records, &ExposureConfig::eur()).unwrap();
    let mut by_denominator: std::collections::BTreeMap<_, f64> = Default::default();
    for row in &report.rows {
        *by_denominator
            .entry((row.subfund_code.clone(), row.valuation_date))
            .or_default() += row.gross();
    }
    assert_eq!(by_denominator.len(), 3);
    for gross in by_denominator.values() {
        assert_relative_eq!(*gross, 100.0, epsilon = 1e-9);
    }
}

#[test]
fn test_eur_mode_converts_by_subfund_currency() {
    let records = create_portfolio();
    let report = calculate_exposure(&records, &ExposureConfig::eur()).unwrap();

    // FI2 is a USD fund: 1180 + 590 + 118 USD = 1888 USD = 1600 EUR
    let fi2: Vec<_> = report.rows.iter().filter(|r| r.subfund_code == "FI2").collect();
    assert_eq!(fi2.len(), 2);
    assert!(fi2.iter().all(|r| r.total == dec!(1600)));

    let fixed_income = fi2
        .iter()
        .find(|r| r.asset_class.as_deref() == Some("Fixed Income"))
        .unwrap();
    assert_relative_eq!(fixed_income.long(), 1000.0 / 1600.0 * 100.0, epsilon = 1e-9);
    assert_relative_eq!(fixed_income.short(), -500.0 / 1600.0 * 100.0, epsilon = 1e-9);
}

#[test]
fn test_all_eur_portfolio_is_mode_invariant() {
    let d = date(2021, 3, 31);
    let records = vec![
        position("E", d, "EUR", "EUR", "Equity", "DE", dec!(70)),
        position("E", d, "EUR", "EUR", "Equity", "FR", dec!(-30)),
        position("E", d, "EUR", "EUR", "Fixed Income", "DE", dec!(50)),
    ];

    let by_ccy = calculate_exposure(&records, &ExposureConfig::default()).unwrap();
    let in_eur = calculate_exposure(&records, &ExposureConfig::eur()).unwrap();
    assert_eq!(by_ccy.rows.len(), in_eur.rows.len());
    for (a, b) in by_ccy.rows.iter().zip(&in_eur.rows) {
        assert_eq!(a.asset_class, b.asset_class);
        assert_eq!(a.total, b.total);
        for metric in ExposureMetric::ALL {
            assert_relative_eq!(
                a.metric(metric).unwrap(),
                b.metric(metric).unwrap(),
                epsilon = 1e-9
            );
        }
    }
}

#[test]
fn test_single_group_gross_equals_abs_net() {
    let d = date(2021, 3, 31);
    let records = vec![
        position("S", d, "EUR", "USD", "Equity", "US", dec!(25)),
        position("S", d, "EUR", "USD", "Equity", "US", dec!(75)),
    ];
    let report = calculate_exposure(&records, &ExposureConfig::default()).unwrap();
    let row = &report.rows[0];
    assert_eq!(row.total, dec!(100));
    assert_relative_eq!(row.gross(), row.net().abs());
}

#[test]
fn test_source_records_untouched() {
    let records = create_portfolio();
    let before = records.clone();
    let _ = calculate_exposure(&records, &ExposureConfig::eur()).unwrap();
    assert_eq!(records, before);
}

// =============================================================================
// COUNTRY / REGION
// =============================================================================

#[test]
fn test_country_region_breakdown() {
    let records = create_portfolio();
    let classes: BTreeSet<String> = ["Equity", "Fixed Income"].iter().map(|s| s.to_string()).collect();

    let report = calculate_exposure_by_country_region(
        &country_map(),
        &records,
        &classes,
        &ExposureMetric::ALL,
        &ExposureConfig::default(),
    )
    .unwrap();

    assert!(report.rows.iter().all(|r| r.region.is_some()));
    assert!(report.rows.iter().all(|r| r.country_of_risk.as_deref() != Some("BR")));
    assert_eq!(report.unmatched_countries(), vec!["BR".to_string()]);
    assert_eq!(report.cash.len(), 2);
    assert!(report.cash.iter().all(|r| r.asset_class == "Currency"));
    assert!(report.diagnostics.contains(&Diagnostic::MissingCountryMapping {
        countries: vec!["BR".into()]
    }));

    // EQ1 February EUR: denominator includes the unmatched BR short
    let de_feb = report
        .rows
        .iter()
        .find(|r| r.valuation_date == date(2021, 2, 26) && r.country_of_risk.as_deref() == Some("DE"))
        .unwrap();
    assert_eq!(de_feb.total, dec!(600));
    assert_relative_eq!(de_feb.net(), 400.0 / 600.0 * 100.0, epsilon = 1e-9);
}

#[test]
fn test_country_region_matches_plain_exposure_when_fully_mapped() {
    let d = date(2021, 6, 30);
    let records = vec![
        position("M", d, "EUR", "EUR", "Equity", "DE", dec!(40)),
        position("M", d, "EUR", "EUR", "Equity", "DE", dec!(-10)),
        position("M", d, "EUR", "EUR", "Fixed Income", "CH", dec!(50)),
    ];
    let classes: BTreeSet<String> = ["Equity", "Fixed Income"].iter().map(|s| s.to_string()).collect();

    let plain = calculate_exposure(&records, &ExposureConfig::default()).unwrap();
    let by_country = calculate_exposure_by_country_region(
        &country_map(),
        &records,
        &classes,
        &ExposureMetric::ALL,
        &ExposureConfig::default(),
    )
    .unwrap();

    assert_eq!(plain.rows.len(), by_country.rows.len());
    for (a, b) in plain.rows.iter().zip(&by_country.rows) {
        assert_eq!(a.metrics, b.metrics);
        assert_eq!(b.region.as_deref(), Some("Europe"));
    }
}

// =============================================================================
// VOLATILITY
// =============================================================================

#[test]
fn test_volatility_across_subfunds() {
    let start = date(2021, 1, 4);
    let mut nav = Vec::new();
    for (i, level) in [100.0, 101.0, 99.0, 102.0].iter().enumerate() {
        nav.push(NavRecord::new(
            "EQ1",
            start + chrono::Duration::days(7 * i as i64),
            Decimal::try_from(*level).unwrap(),
        ));
    }
    for (i, level) in [10.0, 10.5].iter().enumerate() {
        nav.push(NavRecord::new(
            "FI2",
            start + chrono::Duration::days(30 * i as i64),
            Decimal::try_from(*level).unwrap(),
        ));
    }

    let results = annualized_volatility_by_subfund(&nav, date(2021, 12, 31));
    let eq1 = results["EQ1"].as_ref().unwrap();
    assert_eq!(eq1.frequency, SamplingFrequency::Weekly);
    // mean 100.5, deviations -0.5 0.5 -1.5 1.5, sample variance 5/3
    assert_relative_eq!(eq1.annualized, (5.0f64 / 3.0).sqrt() * 52f64.sqrt(), epsilon = 1e-9);

    let fi2 = results["FI2"].as_ref().unwrap();
    assert_eq!(fi2.frequency, SamplingFrequency::Monthly);
    assert_relative_eq!(fi2.std_dev, 0.125f64.sqrt(), epsilon = 1e-12);
}
