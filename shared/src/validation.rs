//! Validation helpers for the POS Inventory Platform
//!
//! Small, pure checks shared by the services layer. Each returns a
//! static message suitable for wrapping in the caller's error type.

use rust_decimal::Decimal;

/// Validate a sale/adjustment quantity (must be strictly positive).
pub fn validate_quantity(quantity: i64) -> Result<(), &'static str> {
    if quantity <= 0 {
        return Err("Quantity must be positive");
    }
    Ok(())
}

/// Validate a monetary price (must not be negative).
pub fn validate_price(price: Decimal) -> Result<(), &'static str> {
    if price < Decimal::ZERO {
        return Err("Price cannot be negative");
    }
    Ok(())
}

/// Validate a ledger amount (must be non-zero).
pub fn validate_ledger_amount(amount: Decimal) -> Result<(), &'static str> {
    if amount == Decimal::ZERO {
        return Err("Amount must be non-zero");
    }
    Ok(())
}

/// Validate a payment amount (must be strictly positive).
pub fn validate_payment_amount(amount: Decimal) -> Result<(), &'static str> {
    if amount <= Decimal::ZERO {
        return Err("Payment amount must be positive");
    }
    Ok(())
}

/// Validate a SKU: 3-32 characters, uppercase alphanumeric plus dashes.
pub fn validate_sku(sku: &str) -> Result<(), &'static str> {
    if sku.len() < 3 {
        return Err("SKU must be at least 3 characters");
    }
    if sku.len() > 32 {
        return Err("SKU must be at most 32 characters");
    }
    if !sku
        .chars()
        .all(|c| c.is_ascii_uppercase() || c.is_ascii_digit() || c == '-')
    {
        return Err("SKU must be uppercase alphanumeric with dashes");
    }
    Ok(())
}

/// Validate email format (basic check).
pub fn validate_email(email: &str) -> Result<(), &'static str> {
    if email.contains('@') && email.contains('.') && email.len() >= 5 {
        Ok(())
    } else {
        Err("Invalid email format")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn quantity_must_be_positive() {
        assert!(validate_quantity(1).is_ok());
        assert!(validate_quantity(0).is_err());
        assert!(validate_quantity(-3).is_err());
    }

    #[test]
    fn price_cannot_be_negative() {
        assert!(validate_price(Decimal::ZERO).is_ok());
        assert!(validate_price(dec("99.99")).is_ok());
        assert!(validate_price(dec("-0.01")).is_err());
    }

    #[test]
    fn ledger_amount_must_be_non_zero() {
        assert!(validate_ledger_amount(dec("50")).is_ok());
        assert!(validate_ledger_amount(dec("-50")).is_ok());
        assert!(validate_ledger_amount(Decimal::ZERO).is_err());
    }

    #[test]
    fn payment_amount_must_be_positive() {
        assert!(validate_payment_amount(dec("30")).is_ok());
        assert!(validate_payment_amount(Decimal::ZERO).is_err());
        assert!(validate_payment_amount(dec("-30")).is_err());
    }

    #[test]
    fn sku_format() {
        assert!(validate_sku("LAP-2024-001").is_ok());
        assert!(validate_sku("AB").is_err());
        assert!(validate_sku("lowercase-sku").is_err());
    }

    #[test]
    fn email_basic_check() {
        assert!(validate_email("john@example.com").is_ok());
        assert!(validate_email("not-an-email").is_err());
    }
}
