//! Integration tests for the odds math: conversion, payouts, arbitrage and drops

use odds_engine::odds::{classify, compute_drop, BookmakerOdds, MovementObservation};
use odds_engine::{
    ArbitrageStakeDistributor, BettingCalculator, DecimalOdds, DropThreshold, MatchId,
    MovementDetector, OddsConverter, OddsFormat, OddsSnapshot, Outcome, RawOdds,
};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

fn odds(value: Decimal) -> DecimalOdds {
    DecimalOdds::new(value).unwrap()
}

#[test]
fn test_american_round_trip() {
    for value in [dec!(1.01), dec!(1.5), dec!(2.0), dec!(2.5), dec!(10.0)] {
        let american = OddsConverter::decimal_to_american(odds(value));
        let back = OddsConverter::american_to_decimal(american).unwrap();
        assert!((back.value() - value).abs() < dec!(0.000001));
    }
}

#[test_log::test]
fn test_sentinel_inputs_render_empty() {
    let placeholders: Vec<RawOdds> = vec![
        "".into(),
        "-".into(),
        "N/A".into(),
        "0".into(),
        "0.00".into(),
        "1.005".into(),
        f64::NAN.into(),
        0.5_f64.into(),
    ];

    for raw in &placeholders {
        for target in [OddsFormat::Decimal, OddsFormat::Moneyline, OddsFormat::Fractional] {
            assert_eq!(OddsConverter::format_raw(raw, None, target), "", "{:?}", raw);
        }
    }
}

#[test]
fn test_same_price_across_formats() {
    for raw in ["2.50", "+150", "3/2"] {
        let formatted = OddsConverter::format_raw(&RawOdds::from(raw), None, OddsFormat::Decimal);
        assert_eq!(formatted, "2.50", "{}", raw);
    }
}

#[test]
fn test_settlement_scenario() {
    let wager = BettingCalculator::calculate_return(dec!(10), dec!(2.5)).unwrap();
    assert_eq!(wager.total_return, dec!(25.0));
    assert_eq!(wager.profit, dec!(15.0));
}

#[test]
fn test_arbitrage_reference_market() {
    let arb = ArbitrageStakeDistributor::distribute(&[dec!(2.1), dec!(3.4), dec!(4.0)], dec!(100))
        .unwrap();

    let returns: Vec<Decimal> = arb
        .stake_per_outcome
        .iter()
        .zip(&arb.odds_per_outcome)
        .map(|(stake, odds)| *stake * odds.value())
        .collect();
    for value in &returns {
        assert!((*value - arb.guaranteed_return).abs() < dec!(0.0000001));
    }

    let inv_sum = Decimal::ONE / dec!(2.1) + Decimal::ONE / dec!(3.4) + Decimal::ONE / dec!(4.0);
    let expected = (Decimal::ONE / inv_sum - Decimal::ONE) * dec!(100);
    assert_eq!(arb.profit_percent.round_dp(2), expected.round_dp(2));
}

#[test]
fn test_arbitrage_serialized_field_set() {
    let arb = ArbitrageStakeDistributor::distribute(&[dec!(2.1), dec!(2.1)], dec!(50)).unwrap();
    let value = serde_json::to_value(&arb).unwrap();
    let mut fields: Vec<&str> = value.as_object().unwrap().keys().map(String::as_str).collect();
    fields.sort_unstable();
    assert_eq!(
        fields,
        vec![
            "guaranteed_return",
            "odds_per_outcome",
            "profit_percent",
            "stake_per_outcome",
            "total_stake"
        ]
    );
}

#[test]
fn test_arbitrage_from_bookmaker_board() {
    let price = |v: Decimal| DecimalOdds::checked(v);
    let board = vec![
        BookmakerOdds::new("north", vec![price(dec!(2.05)), price(dec!(3.9))]),
        BookmakerOdds::new("south", vec![price(dec!(1.95)), price(dec!(2.2))]),
    ];
    let (best, arb) = ArbitrageStakeDistributor::from_quotes(&board, 2, dec!(200)).unwrap();
    assert_eq!(best[0].bookmaker, "north");
    assert_eq!(best[1].bookmaker, "north");
    assert!(arb.is_sure_bet());
}

#[test]
fn test_drop_classification() {
    let drop = compute_drop(dec!(2.5), dec!(2.0)).unwrap();
    assert_eq!(drop, dec!(20.0));
    assert!(classify(drop, dec!(20)));
    assert!(!classify(drop, dec!(30)));
}

#[test]
fn test_detector_with_presets() {
    let observations: Vec<MovementObservation> = [
        ("a", dec!(2.5), dec!(2.0)),
        ("b", dec!(3.0), dec!(1.5)),
        ("c", dec!(1.8), dec!(2.4)),
    ]
    .into_iter()
    .map(|(id, previous, current)| MovementObservation {
        match_id: MatchId::from(id),
        outcome: Outcome::Away,
        teams: String::new(),
        league: String::new(),
        snapshot: OddsSnapshot::new(odds(previous), odds(current)),
    })
    .collect();

    let counts: Vec<usize> = [DropThreshold::TWENTY, DropThreshold::THIRTY, DropThreshold::FIFTY]
        .into_iter()
        .map(|threshold| MovementDetector::new(threshold).detect(&observations).len())
        .collect();
    assert_eq!(counts, vec![2, 1, 1]);
}
