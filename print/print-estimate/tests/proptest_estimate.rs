//! Property-based tests for the estimation engine.
//!
//! Run with: cargo test -p print-estimate -- proptest

use print_estimate::{estimate, PrintParams};
use proptest::prelude::*;

// =============================================================================
// Strategies
// =============================================================================

fn arb_params() -> impl Strategy<Value = PrintParams> {
    (
        1u32..50,
        0.0..=100.0f64,
        0u32..6,
        0.1..1.2f64,
        0.8..2.0f64,
        0.0..100.0f64,
    )
        .prop_map(|(amount, infill, walls, nozzle, density, price)| PrintParams {
            amount,
            infill_percent: infill,
            wall_count: walls,
            nozzle_diameter: nozzle,
            density,
            price_per_kg: price,
        })
}

/// Volume and surface area of a box with edges in `0.1..200` mm.
fn arb_part() -> impl Strategy<Value = (f64, f64)> {
    prop::array::uniform3(0.1..200.0f64)
        .prop_map(|[a, b, c]| (a * b * c, 2.0 * (a * b + b * c + c * a)))
}

/// A part whose wall shell is larger than its volume, with at least one wall.
fn arb_solid_case() -> impl Strategy<Value = (f64, f64, PrintParams)> {
    (0.1..5000.0f64, 1.01..10.0f64, arb_params()).prop_map(|(volume, k, params)| {
        let params = params.with_wall_count(params.wall_count.max(1));
        let area = volume / params.shell_thickness() * k;
        (volume, area, params)
    })
}

fn close(a: f64, b: f64) -> bool {
    (a - b).abs() <= 1e-9 * a.abs().max(b.abs()).max(1.0)
}

// =============================================================================
// Properties
// =============================================================================

proptest! {
    #[test]
    fn proptest_estimate_is_pure((volume, area) in arb_part(), params in arb_params()) {
        prop_assert_eq!(estimate(volume, area, &params), estimate(volume, area, &params));
    }

    #[test]
    fn proptest_doubling_amount_doubles_weight_and_price(
        (volume, area) in arb_part(),
        params in arb_params(),
    ) {
        let single = estimate(volume, area, &params);
        let double = estimate(volume, area, &params.with_amount(params.amount * 2));
        prop_assert!(close(double.weight, 2.0 * single.weight));
        prop_assert!(close(double.price, 2.0 * single.price));
    }

    #[test]
    fn proptest_fallback_ignores_infill(
        (volume, area, params) in arb_solid_case(),
        other_infill in 0.0..=100.0f64,
    ) {
        let a = estimate(volume, area, &params);
        prop_assert!(a.solid_fallback);
        let b = estimate(volume, area, &params.with_infill_percent(other_infill));
        prop_assert_eq!(a.weight, b.weight);
        prop_assert_eq!(a.price, b.price);
    }

    #[test]
    fn proptest_printed_volume_never_exceeds_part(
        (volume, area) in arb_part(),
        params in arb_params(),
    ) {
        let est = estimate(volume, area, &params);
        prop_assert!(est.printed_volume <= volume * (1.0 + 1e-12));
        prop_assert!(est.weight >= 0.0);
        prop_assert!(est.price >= 0.0);
    }

    #[test]
    fn proptest_fallback_matches_threshold(
        (volume, area) in arb_part(),
        params in arb_params(),
    ) {
        let est = estimate(volume, area, &params);
        prop_assert_eq!(est.solid_fallback, est.wall_volume >= volume);
    }
}
