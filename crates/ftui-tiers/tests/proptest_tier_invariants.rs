//! Property-based invariant tests for tier classification.
//!
//! These hold for **any** table and width:
//!
//! 1. Inclusive boundary: a tier is active iff its threshold ≤ width.
//! 2. Membership is monotonic in width.
//! 3. Invalid widths never activate a tier.
//!
//! Registry-level properties live in `src/property_tests.rs`, next to the
//! recording fakes they use.

use ftui_tiers::{BreakpointTable, resolve};
use proptest::prelude::*;

// ── Helpers ─────────────────────────────────────────────────────────────

fn table_strategy() -> impl Strategy<Value = BreakpointTable> {
    proptest::collection::vec(("[A-Z]{1,4}", 0.0f64..=2_000.0), 0..=6).prop_map(|entries| {
        let mut table = BreakpointTable::new();
        for (name, min_width) in entries {
            table
                .insert(name, min_width)
                .expect("generated names and thresholds are valid");
        }
        table
    })
}

fn width_strategy() -> impl Strategy<Value = f64> {
    prop_oneof![
        0.0f64..=2_500.0,
        (0u32..=2_500).prop_map(f64::from),
    ]
}

// ═════════════════════════════════════════════════════════════════════════
// 1. Inclusive boundary
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn active_iff_threshold_reached(table in table_strategy(), width in width_strategy()) {
        let active = resolve(width, &table);
        for tier in table.iter() {
            prop_assert_eq!(
                active.contains(&tier.name),
                width >= tier.min_width,
                "tier {} (min {}) at width {}", tier.name, tier.min_width, width
            );
        }
        prop_assert!(active.iter().all(|name| table.contains(name)));
    }

    #[test]
    fn threshold_itself_is_active(table in table_strategy()) {
        for tier in table.iter() {
            prop_assert!(resolve(tier.min_width, &table).contains(&tier.name));
        }
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 2. Monotonicity
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn membership_monotonic(
        table in table_strategy(),
        w1 in width_strategy(),
        w2 in width_strategy(),
    ) {
        let (lo, hi) = if w1 <= w2 { (w1, w2) } else { (w2, w1) };
        let narrow = resolve(lo, &table);
        let wide = resolve(hi, &table);
        prop_assert!(
            narrow.is_subset(&wide),
            "resolve({}) = {:?} not within resolve({}) = {:?}",
            lo, narrow, hi, wide
        );
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 3. Invalid widths
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn negative_width_activates_nothing(table in table_strategy(), width in -5_000.0f64..-0.001) {
        prop_assert!(resolve(width, &table).is_empty());
    }
}
