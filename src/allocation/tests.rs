#![allow(clippy::unwrap_used)]

use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use super::*;

fn standard_ratios() -> CategoryRatios {
    [
        ("인건비", dec!(40)),
        ("학생인건비", dec!(20)),
        ("재료비", dec!(20)),
        ("연구활동비", dec!(15)),
        ("연구수당", dec!(5)),
    ]
    .into_iter()
    .map(|(c, r)| (c.to_string(), r))
    .collect()
}

// ── compute_allocation ────────────────────────────────────────

#[test]
fn test_even_split_loses_nothing() {
    // 100M budget at 80% direct cost: every share divides evenly
    let allocation = compute_allocation(100_000_000, dec!(80), &standard_ratios());

    assert_eq!(allocation["인건비"], 32_000_000);
    assert_eq!(allocation["학생인건비"], 16_000_000);
    assert_eq!(allocation["재료비"], 16_000_000);
    assert_eq!(allocation["연구활동비"], 12_000_000);
    assert_eq!(allocation["연구수당"], 4_000_000);
    assert_eq!(allocation.values().sum::<i64>(), 80_000_000);
}

#[test]
fn test_truncation_bounded_by_category_count() {
    // 1/3-ish splits force flooring in every category
    let ratios: CategoryRatios = [
        ("인건비", dec!(33.33)),
        ("학생인건비", dec!(33.33)),
        ("재료비", dec!(33.34)),
        ("연구활동비", dec!(0)),
        ("연구수당", dec!(0)),
    ]
    .into_iter()
    .map(|(c, r)| (c.to_string(), r))
    .collect();

    let total_budget = 10_000_001;
    let allocation = compute_allocation(total_budget, dec!(77), &ratios);
    let allocated: i64 = allocation.values().sum();
    let direct_floor = direct_cost(total_budget, dec!(77))
        .floor()
        .to_i64()
        .unwrap();

    assert!(allocated <= direct_floor);
    // Each floored term drops strictly less than one won
    assert!(direct_floor - allocated < BUDGET_CATEGORIES.len() as i64);
}

#[test]
fn test_deterministic() {
    let a = compute_allocation(99_999_999, dec!(73.5), &standard_ratios());
    let b = compute_allocation(99_999_999, dec!(73.5), &standard_ratios());
    assert_eq!(a, b);
}

#[test]
fn test_missing_ratio_treated_as_zero() {
    let mut ratios = standard_ratios();
    ratios.remove("연구수당");

    let allocation = compute_allocation(100_000_000, dec!(80), &ratios);
    assert_eq!(allocation["연구수당"], 0);
    assert_eq!(allocation.len(), BUDGET_CATEGORIES.len());
}

#[test]
fn test_extra_category_carried_through() {
    let mut ratios = standard_ratios();
    ratios.insert("간접비".into(), dec!(10));

    let allocation = compute_allocation(100_000_000, dec!(80), &ratios);
    assert_eq!(allocation["간접비"], 8_000_000);
    assert_eq!(allocation.len(), BUDGET_CATEGORIES.len() + 1);
}

#[test]
fn test_zero_budget_allocates_zero() {
    let allocation = compute_allocation(0, dec!(80), &standard_ratios());
    assert!(allocation.values().all(|&amount| amount == 0));
}

#[test]
fn test_out_of_range_inputs_still_compute() {
    // Garbage in, garbage out: the engine never rejects
    let allocation = compute_allocation(-1_000_000, dec!(80), &standard_ratios());
    assert_eq!(allocation["인건비"], -320_000);

    let over = compute_allocation(1_000_000, dec!(150), &standard_ratios());
    assert_eq!(over["인건비"], 600_000);
}

// ── derive_ratios ─────────────────────────────────────────────

#[test]
fn test_derive_recovers_even_ratios_exactly() {
    let allocation = compute_allocation(100_000_000, dec!(80), &standard_ratios());
    let derived = derive_ratios(100_000_000, dec!(80), &allocation);

    for (category, ratio) in &standard_ratios() {
        assert_eq!(derived[category], *ratio, "category {category}");
    }
}

#[test]
fn test_derive_round_trip_within_one_percent_each() {
    let ratios = standard_ratios();
    // Awkward budget so every allocation gets floored
    let allocation = compute_allocation(12_345_678, dec!(81.7), &ratios);
    let derived = derive_ratios(12_345_678, dec!(81.7), &allocation);

    for category in BUDGET_CATEGORIES {
        let diff = (derived[category] - ratios[category]).abs();
        assert!(diff <= Decimal::ONE, "category {category} drifted by {diff}");
    }
    let sum = ratio_sum(&derived);
    assert!((sum - dec!(100)).abs() <= dec!(3), "sum drifted to {sum}");
}

#[test]
fn test_derive_zero_direct_cost_yields_zeroes() {
    let mut allocation = Allocation::new();
    allocation.insert("인건비".into(), 5_000_000);

    for ratios in [
        derive_ratios(0, dec!(80), &allocation),
        derive_ratios(100_000_000, dec!(0), &allocation),
    ] {
        assert!(ratios.values().all(|&r| r == Decimal::ZERO));
    }
}

#[test]
fn test_derive_rounds_to_whole_percent() {
    let mut allocation = Allocation::new();
    // 1,234,567 of an 8,000,000 direct cost = 15.432...%
    allocation.insert("재료비".into(), 1_234_567);

    let ratios = derive_ratios(10_000_000, dec!(80), &allocation);
    assert_eq!(ratios["재료비"], dec!(15));
}

// ── ratio validation ──────────────────────────────────────────

#[test]
fn test_balanced_at_exactly_100() {
    assert!(ratios_balanced(&standard_ratios()));
}

#[test]
fn test_balanced_within_tolerance() {
    let mut ratios = standard_ratios();
    ratios.insert("연구수당".into(), dec!(5.1));
    assert!(ratios_balanced(&ratios));

    ratios.insert("연구수당".into(), dec!(4.9));
    assert!(ratios_balanced(&ratios));
}

#[test]
fn test_unbalanced_rejected() {
    let mut ratios = standard_ratios();
    ratios.insert("연구수당".into(), dec!(4));
    assert_eq!(ratio_sum(&ratios), dec!(99));
    assert!(!ratios_balanced(&ratios));

    ratios.insert("연구수당".into(), dec!(6));
    assert!(!ratios_balanced(&ratios));
}

#[test]
fn test_direct_cost_fractional_ratio() {
    assert_eq!(direct_cost(1_000_000, dec!(72.5)), dec!(725000));
    assert_eq!(direct_cost(0, dec!(80)), Decimal::ZERO);
}
