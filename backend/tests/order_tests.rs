//! Order arithmetic tests
//!
//! Tests the order-level money rules:
//! - The total is the sum of catalog-priced line totals
//! - Cancellation refunds exactly what was charged

use proptest::prelude::*;
use rust_decimal::Decimal;
use std::str::FromStr;

// Helper to create Decimal from string
fn dec(s: &str) -> Decimal {
    Decimal::from_str(s).unwrap()
}

/// Price of one order line.
fn line_total(unit_price: Decimal, quantity: i64) -> Decimal {
    unit_price * Decimal::from(quantity)
}

// ============================================================================
// Unit Tests
// ============================================================================

#[cfg(test)]
mod unit_tests {
    use super::*;

    #[test]
    fn test_total_sums_line_totals() {
        // 2 x 19.99 + 1 x 5.50
        let total = line_total(dec("19.99"), 2) + line_total(dec("5.50"), 1);
        assert_eq!(total, dec("45.48"));
    }

    #[test]
    fn test_server_side_price_is_authoritative() {
        // The catalog price decides the line total; a client-claimed
        // price plays no part in the arithmetic.
        let catalog_price = dec("10.00");
        assert_eq!(line_total(catalog_price, 3), dec("30.00"));
    }

    #[test]
    fn test_decimal_totals_have_no_float_drift() {
        // 0.1 * 3 is exact in decimal arithmetic
        assert_eq!(line_total(dec("0.10"), 3), dec("0.30"));
    }

    #[test]
    fn test_order_status_values() {
        let statuses = ["pending", "completed", "cancelled"];
        assert_eq!(statuses.len(), 3);
        for s in statuses {
            assert!(s.chars().all(|c| c.is_lowercase()));
        }
    }
}

// ============================================================================
// Property Tests
// ============================================================================

#[cfg(test)]
mod property_tests {
    use super::*;

    /// Strategy for generating unit prices (0.01 to 1000.00)
    fn price_strategy() -> impl Strategy<Value = Decimal> {
        (1i64..=100000i64).prop_map(|n| Decimal::new(n, 2))
    }

    /// Strategy for generating line quantities
    fn quantity_strategy() -> impl Strategy<Value = i64> {
        1i64..=100i64
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        /// The order total equals the sum of its line totals
        #[test]
        fn prop_total_is_sum_of_lines(
            lines in prop::collection::vec(
                (price_strategy(), quantity_strategy()),
                1..10
            )
        ) {
            let total: Decimal = lines
                .iter()
                .map(|(price, qty)| line_total(*price, *qty))
                .sum();

            let mut running = Decimal::ZERO;
            for (price, qty) in &lines {
                running += line_total(*price, *qty);
            }

            prop_assert_eq!(total, running);
            prop_assert!(total > Decimal::ZERO);
        }

        /// Cancelling an order refunds exactly the charged total, so a
        /// charge followed by the refund leaves the balance untouched
        #[test]
        fn prop_cancellation_refund_is_exact(
            opening in (-100000i64..=100000i64).prop_map(|n| Decimal::new(n, 2)),
            lines in prop::collection::vec(
                (price_strategy(), quantity_strategy()),
                1..10
            )
        ) {
            let total: Decimal = lines
                .iter()
                .map(|(price, qty)| line_total(*price, *qty))
                .sum();

            let charged = opening + total;
            let refunded = charged - total;
            prop_assert_eq!(refunded, opening);
        }

        /// Line totals scale linearly in quantity
        #[test]
        fn prop_line_total_linear_in_quantity(
            price in price_strategy(),
            quantity in quantity_strategy()
        ) {
            prop_assert_eq!(
                line_total(price, quantity) + line_total(price, 1),
                line_total(price, quantity + 1)
            );
        }
    }
}
