//! Input validation helpers
//!
//! Centralized text length constants and validation functions shared by the
//! menu, order and auth services. Request DTOs carry `validator` derives for
//! shape checks; these helpers enforce the rules that need domain context.

use crate::utils::AppError;

// ── Text length limits ──────────────────────────────────────────────

/// Entity names: menu item, category, user name
pub const MAX_NAME_LEN: usize = 200;

/// Special instructions, descriptions
pub const MAX_NOTE_LEN: usize = 500;

/// Review comments
pub const MAX_COMMENT_LEN: usize = 1000;

/// Email addresses (RFC 5321)
pub const MAX_EMAIL_LEN: usize = 254;

/// Passwords (before hashing)
pub const MAX_PASSWORD_LEN: usize = 128;

/// Maximum allowed menu price
pub const MAX_PRICE: f64 = 100_000.0;

// ── Validation helpers ──────────────────────────────────────────────

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

/// Validate a price: finite, non-negative, below [`MAX_PRICE`].
pub fn validate_price(price: f64) -> Result<(), AppError> {
    if !price.is_finite() || price < 0.0 || price > MAX_PRICE {
        return Err(AppError::with_message(
            shared::error::ErrorCode::MenuItemInvalidPrice,
            format!("price must be between 0 and {MAX_PRICE}, got {price}"),
        ));
    }
    Ok(())
}

/// Case-insensitive check that `email` belongs to `domain` (e.g. `@iiitkottayam.ac.in`).
pub fn is_campus_email(email: &str, domain: &str) -> bool {
    let email = email.trim().to_ascii_lowercase();
    let domain = domain.trim().to_ascii_lowercase();
    let suffix = if domain.starts_with('@') {
        domain
    } else {
        format!("@{domain}")
    };
    email.len() > suffix.len() && email.ends_with(&suffix)
}

/// Normalize an email for use as a lookup key.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_ascii_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_required_text() {
        assert!(validate_required_text("Dosa", "name", MAX_NAME_LEN).is_ok());
        assert!(validate_required_text("   ", "name", MAX_NAME_LEN).is_err());
        assert!(validate_required_text(&"x".repeat(201), "name", MAX_NAME_LEN).is_err());
    }

    #[test]
    fn test_optional_text() {
        assert!(validate_optional_text(&None, "note", MAX_NOTE_LEN).is_ok());
        assert!(validate_optional_text(&Some("x".repeat(501)), "note", MAX_NOTE_LEN).is_err());
    }

    #[test]
    fn test_price_bounds() {
        assert!(validate_price(0.0).is_ok());
        assert!(validate_price(120.0).is_ok());
        assert!(validate_price(-1.0).is_err());
        assert!(validate_price(f64::NAN).is_err());
        assert!(validate_price(f64::INFINITY).is_err());
    }

    #[test]
    fn test_campus_email() {
        let domain = "iiitkottayam.ac.in";
        assert!(is_campus_email("asha@iiitkottayam.ac.in", domain));
        assert!(is_campus_email("Asha@IIITKottayam.ac.in", "@iiitkottayam.ac.in"));
        assert!(!is_campus_email("asha@gmail.com", domain));
        assert!(!is_campus_email("@iiitkottayam.ac.in", domain));
        assert!(!is_campus_email("asha@fake-iiitkottayam.ac.in", domain));
    }
}
