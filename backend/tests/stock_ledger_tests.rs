//! Stock ledger tests
//!
//! Tests the stock movement rules:
//! - Stock never goes negative; a movement that would is rejected whole
//! - Draining stock to exactly zero succeeds
//! - The ledger of signed movements always sums to the current level

use proptest::prelude::*;

/// Mirror of the ledger's delta rule: apply a signed movement to the
/// current level, rejecting anything that would drive it below zero.
fn apply_movement(current: Option<i64>, delta: i64) -> Result<i64, &'static str> {
    match current {
        Some(stock) => match stock.checked_add(delta) {
            None => Err("movement out of range"),
            Some(new_stock) if new_stock < 0 => Err("insufficient stock"),
            Some(new_stock) => Ok(new_stock),
        },
        None if delta <= 0 => Err("no inventory record"),
        None => Ok(delta),
    }
}

// ============================================================================
// Unit Tests
// ============================================================================

#[cfg(test)]
mod unit_tests {
    use super::*;

    #[test]
    fn test_sale_decrements_stock() {
        assert_eq!(apply_movement(Some(10), -6), Ok(4));
    }

    #[test]
    fn test_stock_can_drain_to_exactly_zero() {
        // 10 in stock, sell 6, then sell the remaining 4
        let after_first = apply_movement(Some(10), -6).unwrap();
        assert_eq!(after_first, 4);
        assert_eq!(apply_movement(Some(after_first), -4), Ok(0));
    }

    #[test]
    fn test_oversell_rejected_and_level_unchanged() {
        // 10 in stock, sell 6, then try to sell 5 more
        let after_first = apply_movement(Some(10), -6).unwrap();
        let result = apply_movement(Some(after_first), -5);
        assert!(result.is_err());
        // The failed movement leaves the level where it was
        assert_eq!(after_first, 4);
    }

    #[test]
    fn test_negative_movement_needs_existing_record() {
        assert!(apply_movement(None, -1).is_err());
        assert_eq!(apply_movement(None, 5), Ok(5));
    }

    #[test]
    fn test_extreme_movement_rejected_not_wrapped() {
        assert!(apply_movement(Some(1), i64::MAX).is_err());
        assert_eq!(apply_movement(Some(0), i64::MIN), Err("insufficient stock"));
    }

    #[test]
    fn test_stock_transaction_types() {
        let types = [
            "sale",
            "stock_in",
            "stock_out",
            "adjustment",
            "cancellation_reversal",
        ];

        assert_eq!(types.len(), 5);

        // All types should be snake_case
        for t in types {
            assert!(t.chars().all(|c| c.is_lowercase() || c == '_'));
        }
    }
}

// ============================================================================
// Property Tests
// ============================================================================

#[cfg(test)]
mod property_tests {
    use super::*;

    /// Strategy for generating signed stock movements
    fn movement_strategy() -> impl Strategy<Value = i64> {
        -100i64..=100i64
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        /// Applying any sequence of movements never leaves stock negative
        #[test]
        fn prop_stock_never_negative(
            initial in 0i64..=1000i64,
            movements in prop::collection::vec(movement_strategy(), 1..50)
        ) {
            let mut stock = initial;
            for delta in movements {
                if let Ok(new_stock) = apply_movement(Some(stock), delta) {
                    stock = new_stock;
                }
            }
            prop_assert!(stock >= 0);
        }

        /// The current level equals the initial level plus the sum of
        /// all accepted movements
        #[test]
        fn prop_level_is_sum_of_accepted_movements(
            initial in 0i64..=1000i64,
            movements in prop::collection::vec(movement_strategy(), 1..50)
        ) {
            let mut stock = initial;
            let mut accepted_sum = 0i64;
            for delta in movements {
                if let Ok(new_stock) = apply_movement(Some(stock), delta) {
                    stock = new_stock;
                    accepted_sum += delta;
                }
            }
            prop_assert_eq!(stock, initial + accepted_sum);
        }

        /// A rejected movement is exactly one that would overdraw
        #[test]
        fn prop_rejection_iff_overdraw(
            stock in 0i64..=1000i64,
            delta in movement_strategy()
        ) {
            let result = apply_movement(Some(stock), delta);
            if stock + delta < 0 {
                prop_assert!(result.is_err());
            } else {
                prop_assert_eq!(result, Ok(stock + delta));
            }
        }

        /// A sale followed by its cancellation reversal restores the level
        #[test]
        fn prop_cancellation_restores_level(
            stock in 0i64..=1000i64,
            quantity in 1i64..=100i64
        ) {
            if let Ok(after_sale) = apply_movement(Some(stock), -quantity) {
                let after_reversal = apply_movement(Some(after_sale), quantity);
                prop_assert_eq!(after_reversal, Ok(stock));
            }
        }
    }
}
