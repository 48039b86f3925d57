#![forbid(unsafe_code)]

//! Width → active tier classification.
//!
//! [`resolve`] is pure: a tier is active when the measured width meets or
//! exceeds its threshold, boundary inclusive. Tiers are evaluated
//! independently, so for a fixed table membership is monotonic in width.

use std::collections::BTreeSet;

use crate::table::BreakpointTable;

/// Set of active tier names.
pub type TierSet = BTreeSet<String>;

/// Sanitized container width.
///
/// Returns `None` for readings that cannot classify anything (negative or
/// non-finite). Such readings resolve to the empty tier set.
#[inline]
#[must_use]
pub fn usable_width(width: f64) -> Option<f64> {
    (width.is_finite() && width >= 0.0).then_some(width)
}

/// Whether a tier with threshold `min_width` is satisfied by `width`.
#[inline]
#[must_use]
pub fn satisfies(width: f64, min_width: f64) -> bool {
    usable_width(width).is_some_and(|w| w >= min_width)
}

/// Tiers of `table` active at `width`.
///
/// Never fails: an invalid width yields the empty set.
#[must_use]
pub fn resolve(width: f64, table: &BreakpointTable) -> TierSet {
    table
        .iter()
        .filter(|tier| satisfies(width, tier.min_width))
        .map(|tier| tier.name.clone())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn set(names: &[&str]) -> TierSet {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn inclusive_boundary() {
        let table = BreakpointTable::standard();
        assert_eq!(resolve(576.0, table), set(&["SM", "MD"]));
        assert_eq!(resolve(575.99, table), set(&["SM"]));
    }

    #[test]
    fn default_table_widths() {
        let table = BreakpointTable::standard();
        assert_eq!(resolve(0.0, table), set(&[]));
        assert_eq!(resolve(383.0, table), set(&[]));
        assert_eq!(resolve(384.0, table), set(&["SM"]));
        assert_eq!(resolve(959.0, table), set(&["SM", "MD", "LG"]));
        assert_eq!(resolve(960.0, table), set(&["SM", "MD", "LG", "XL"]));
        assert_eq!(resolve(10_000.0, table), set(&["SM", "MD", "LG", "XL"]));
    }

    #[test]
    fn unsorted_thresholds_evaluated_independently() {
        let table = BreakpointTable::new()
            .with_tier("WIDE", 900.0)
            .and_then(|t| t.with_tier("NARROW", 100.0))
            .unwrap();
        assert_eq!(resolve(150.0, &table), set(&["NARROW"]));
        assert_eq!(resolve(900.0, &table), set(&["NARROW", "WIDE"]));
    }

    #[test]
    fn empty_table_resolves_to_nothing() {
        assert!(resolve(1_000.0, &BreakpointTable::new()).is_empty());
    }

    #[test]
    fn invalid_widths_resolve_to_nothing() {
        let table = BreakpointTable::new().with_tier("ANY", 0.0).unwrap();
        assert_eq!(resolve(0.0, &table), set(&["ANY"]));
        for width in [-1.0, f64::NAN, f64::INFINITY, f64::NEG_INFINITY] {
            assert!(resolve(width, &table).is_empty(), "{width}");
            assert!(resolve(width, BreakpointTable::standard()).is_empty(), "{width}");
        }
    }

    #[test]
    fn usable_width_filters() {
        assert_eq!(usable_width(12.5), Some(12.5));
        assert_eq!(usable_width(0.0), Some(0.0));
        assert_eq!(usable_width(-0.5), None);
        assert_eq!(usable_width(f64::NAN), None);
    }
}
