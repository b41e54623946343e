//! Money calculation utilities using rust_decimal for precision

use rust_decimal::prelude::*;
use thiserror::Error;

/// Rounding strategy for monetary values (2 decimal places, half away from zero)
const DECIMAL_PLACES: u32 = 2;

/// Maximum allowed quantity per order line
pub const MAX_QUANTITY: i32 = 999;

/// Maximum allowed catalog unit price (10,000,000)
pub const MAX_PRICE: Decimal = Decimal::from_parts(10_000_000, 0, 0, false, 0);

/// Maximum allowed tip or discount when closing a table (10,000,000)
pub const MAX_PAYMENT_AMOUNT: Decimal = Decimal::from_parts(10_000_000, 0, 0, false, 0);

/// Round a monetary value to 2 decimal places
#[inline]
pub fn to_money(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(DECIMAL_PLACES, RoundingStrategy::MidpointAwayFromZero)
}

/// Whether a line quantity is acceptable
pub fn is_valid_quantity(quantity: i32) -> bool {
    (1..=MAX_QUANTITY).contains(&quantity)
}

/// Invalid tip/discount combination
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AmountError {
    #[error("{0} must not be negative")]
    Negative(&'static str),
    #[error("discount exceeds the amount due")]
    DiscountExceedsTotal,
    #[error("{field} exceeds the maximum of {max}")]
    TooLarge { field: &'static str, max: Decimal },
    #[error("amount is too large to compute")]
    Overflow,
}

/// Reject negative amounts and amounts above `max`
fn check_amount(value: Decimal, field: &'static str, max: Decimal) -> Result<(), AmountError> {
    if value.is_sign_negative() && !value.is_zero() {
        return Err(AmountError::Negative(field));
    }
    if value > max {
        return Err(AmountError::TooLarge { field, max });
    }
    Ok(())
}

/// Validate a catalog unit price (zero allowed)
pub fn check_price(price: Decimal) -> Result<(), AmountError> {
    check_amount(price, "price", MAX_PRICE)
}

/// Sum of amounts, failing instead of overflowing
pub fn checked_sum<I: IntoIterator<Item = Decimal>>(values: I) -> Result<Decimal, AmountError> {
    values
        .into_iter()
        .try_fold(Decimal::ZERO, |acc, v| acc.checked_add(v))
        .ok_or(AmountError::Overflow)
}

/// Final amount billed when closing a table: `base + tip - discount`
pub fn closing_total(
    base: Decimal,
    tip: Decimal,
    discount: Decimal,
) -> Result<Decimal, AmountError> {
    check_amount(tip, "tip", MAX_PAYMENT_AMOUNT)?;
    check_amount(discount, "discount", MAX_PAYMENT_AMOUNT)?;
    let total = base
        .checked_add(tip)
        .and_then(|t| t.checked_sub(discount))
        .ok_or(AmountError::Overflow)?;
    if total < Decimal::ZERO {
        return Err(AmountError::DiscountExceedsTotal);
    }
    Ok(to_money(total))
}
