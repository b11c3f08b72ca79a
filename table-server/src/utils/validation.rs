//! Input validation helpers
//!
//! Centralized text length constants and validation functions.

use crate::utils::AppError;
use rust_decimal::Decimal;

// ── Text length limits ──────────────────────────────────────────────

/// Entity names: menu item, category, table, etc.
pub const MAX_NAME_LEN: usize = 200;

/// Notes, descriptions, special instructions, request messages
pub const MAX_NOTE_LEN: usize = 500;

/// Short identifiers: phone numbers, customer names
pub const MAX_SHORT_TEXT_LEN: usize = 100;

/// URLs / image paths
pub const MAX_URL_LEN: usize = 2048;

// ── Numeric limits ──────────────────────────────────────────────────

/// Maximum allowed unit price
pub const MAX_PRICE: Decimal = Decimal::from_parts(1_000_000, 0, 0, false, 0);

/// Maximum allowed quantity per order line
pub const MAX_QUANTITY: i32 = 99;

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

/// Validate a unit price: non-negative and below the ceiling.
pub fn validate_price(price: Decimal, field: &str) -> Result<(), AppError> {
    if price.is_sign_negative() {
        return Err(AppError::with_message(
            crate::utils::ErrorCode::MenuItemInvalidPrice,
            format!("{field} must be non-negative, got {price}"),
        ));
    }
    if price > MAX_PRICE {
        return Err(AppError::with_message(
            crate::utils::ErrorCode::MenuItemInvalidPrice,
            format!("{field} exceeds maximum allowed ({MAX_PRICE}), got {price}"),
        ));
    }
    Ok(())
}

/// Validate a tax rate: fraction within [0, 1].
pub fn validate_tax_rate(rate: Decimal) -> Result<(), AppError> {
    if rate.is_sign_negative() || rate > Decimal::ONE {
        return Err(AppError::validation(format!(
            "tax_rate must be between 0 and 1, got {rate}"
        )));
    }
    Ok(())
}
