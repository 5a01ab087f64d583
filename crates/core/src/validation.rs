//! Input validation for product and category writes.

use rust_decimal::Decimal;

use crate::error::CoreError;

/// Maximum length for a product name.
pub const MAX_PRODUCT_NAME_LEN: usize = 200;

/// Maximum length for a category name.
pub const MAX_CATEGORY_NAME_LEN: usize = 100;

/// Validate a product name: non-blank and within length limit.
pub fn validate_product_name(name: &str) -> Result<(), CoreError> {
    validate_name("Product", name, MAX_PRODUCT_NAME_LEN)
}

/// Validate a category name: non-blank and within length limit.
pub fn validate_category_name(name: &str) -> Result<(), CoreError> {
    validate_name("Category", name, MAX_CATEGORY_NAME_LEN)
}

/// Validate a product price: must not be negative.
pub fn validate_price(price: Decimal) -> Result<(), CoreError> {
    if price.is_sign_negative() && !price.is_zero() {
        return Err(CoreError::Validation(format!(
            "Price must not be negative, got {price}"
        )));
    }
    Ok(())
}

fn validate_name(entity: &str, name: &str, max_len: usize) -> Result<(), CoreError> {
    if name.trim().is_empty() {
        return Err(CoreError::Validation(format!(
            "{entity} name must not be empty"
        )));
    }
    let len = name.chars().count();
    if len > max_len {
        return Err(CoreError::Validation(format!(
            "{entity} name too long: {len} chars (max {max_len})"
        )));
    }
    Ok(())
}
