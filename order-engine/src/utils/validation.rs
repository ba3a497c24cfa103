//! Input validation helpers
//!
//! Text checks shared by the cart, the composer and the order editor. All of
//! them fail with [`OrderError::Validation`] naming the offending field.

use crate::orders::OrderError;

/// Validate a required string (non-blank + max length).
pub fn validate_required_text(
    value: Option<&str>,
    field: &'static str,
    max_len: usize,
) -> Result<(), OrderError> {
    match value {
        Some(v) if !v.trim().is_empty() => validate_text_len(v, field, max_len),
        _ => Err(OrderError::validation(field, format!("{field} is required"))),
    }
}

/// Validate an optional string (max length only).
pub fn validate_optional_text(
    value: Option<&str>,
    field: &'static str,
    max_len: usize,
) -> Result<(), OrderError> {
    match value {
        Some(v) => validate_text_len(v, field, max_len),
        None => Ok(()),
    }
}

fn validate_text_len(value: &str, field: &'static str, max_len: usize) -> Result<(), OrderError> {
    let len = value.chars().count();
    if len > max_len {
        return Err(OrderError::validation(
            field,
            format!("{field} is too long ({len} chars, max {max_len})"),
        ));
    }
    Ok(())
}

/// Trim user input; blank strings become `None`.
pub fn normalize_text(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
