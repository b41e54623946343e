//! Input validation helpers
//!
//! Text length limits shared by the CRUD handlers and the order engine.

use crate::orders::money::check_price;
use rust_decimal::Decimal;
use shared::AppError;

// ── Text length limits ──────────────────────────────────────────────

/// Entity names: table, category, menu item, special
pub const MAX_NAME_LEN: usize = 200;

/// Notes, descriptions, reasons, special instructions
pub const MAX_NOTE_LEN: usize = 500;

/// Table numbers and locations
pub const MAX_SHORT_TEXT_LEN: usize = 100;

/// Largest table capacity accepted
pub const MAX_CAPACITY: i32 = 100;

// ── Validation helpers (CRUD handlers) ──────────────────────────────

/// Validate that a required string is non-empty and within the length limit.
pub fn validate_required_text(value: &str, field: &str, max_len: usize) -> Result<(), AppError> {
    if value.trim().is_empty() {
        return Err(AppError::validation(format!("{field} must not be empty")));
    }
    if value.len() > max_len {
        return Err(AppError::validation(format!(
            "{field} is too long ({} chars, max {max_len})",
            value.len()
        )));
    }
    Ok(())
}

/// Validate that an optional string, if present, is within the length limit.
pub fn validate_optional_text(
    value: &Option<String>,
    field: &str,
    max_len: usize,
) -> Result<(), AppError> {
    if let Some(v) = value
        && v.len() > max_len
    {
        return Err(AppError::validation(format!(
            "{field} is too long ({} chars, max {max_len})",
            v.len()
        )));
    }
    Ok(())
}

/// Validate a table capacity
pub fn validate_capacity(capacity: i32) -> Result<(), AppError> {
    if !(1..=MAX_CAPACITY).contains(&capacity) {
        return Err(AppError::validation(format!(
            "capacity must be between 1 and {MAX_CAPACITY}"
        )));
    }
    Ok(())
}

/// Validate a catalog price (zero allowed, negative or above the cap rejected)
pub fn validate_price(price: Decimal) -> Result<(), AppError> {
    check_price(price)
        .map_err(|e| AppError::with_message(shared::ErrorCode::InvalidPrice, e.to_string()))
}

// ── Validation helpers (order engine) ───────────────────────────────

/// Length check for order text fields, reported as a plain message
pub fn check_order_text(value: &Option<String>, field: &str) -> Result<(), String> {
    match value {
        Some(v) if v.len() > MAX_NOTE_LEN => Err(format!(
            "{field} is too long ({} chars, max {MAX_NOTE_LEN})",
            v.len()
        )),
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::ErrorCode;

    #[test]
    fn required_text() {
        assert!(validate_required_text("Mesa 1", "name", MAX_NAME_LEN).is_ok());
        assert!(validate_required_text("   ", "name", MAX_NAME_LEN).is_err());
        let long = "x".repeat(MAX_NAME_LEN + 1);
        let err = validate_required_text(&long, "name", MAX_NAME_LEN).unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationFailed);
    }

    #[test]
    fn optional_text_and_capacity() {
        assert!(validate_optional_text(&None, "notes", MAX_NOTE_LEN).is_ok());
        assert!(validate_optional_text(&Some("x".repeat(501)), "notes", MAX_NOTE_LEN).is_err());
        assert!(validate_capacity(0).is_err());
        assert!(validate_capacity(4).is_ok());
        assert!(check_order_text(&Some("sin cebolla".into()), "notes").is_ok());
    }

    #[test]
    fn negative_price_rejected() {
        assert!(validate_price(Decimal::ZERO).is_ok());
        let err = validate_price(Decimal::NEGATIVE_ONE).unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidPrice);
    }

    #[test]
    fn price_above_cap_rejected() {
        let err = validate_price(Decimal::from_i128_with_scale(10_i128.pow(28), 0)).unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidPrice);
        assert!(validate_price(Decimal::from(32_000)).is_ok());
    }
}
