//! Input validation helpers shared by the services.

use crate::error::{CoreError, Result};
use chrono::{DateTime, Utc};

/// Maximum voucher code length.
pub const MAX_VOUCHER_CODE_LEN: usize = 64;

/// Reject empty or whitespace-only required fields.
///
/// # Errors
///
/// Returns [`CoreError::Validation`] naming `field`.
pub fn require_non_empty(field: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(CoreError::Validation(format!("{field} required")));
    }
    Ok(())
}

/// Check voucher code shape: 1 to [`MAX_VOUCHER_CODE_LEN`] characters of
/// ASCII letters, digits, `-` or `_`.
///
/// # Errors
///
/// Returns [`CoreError::Validation`] describing the problem.
///
/// # Examples
///
/// ```
/// use photobooth_core::validation::validate_voucher_code;
///
/// assert!(validate_voucher_code("WELCOME50").is_ok());
/// assert!(validate_voucher_code("new-year_2025").is_ok());
/// assert!(validate_voucher_code("two words").is_err());
/// ```
pub fn validate_voucher_code(code: &str) -> Result<()> {
    require_non_empty("code", code)?;
    if code.len() > MAX_VOUCHER_CODE_LEN {
        return Err(CoreError::Validation(format!(
            "code must be at most {MAX_VOUCHER_CODE_LEN} characters"
        )));
    }
    if !code
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
    {
        return Err(CoreError::Validation(
            "code may only contain letters, digits, '-' and '_'".to_string(),
        ));
    }
    Ok(())
}

/// Require `valid_from <= valid_to` when both are set.
///
/// # Errors
///
/// Returns [`CoreError::Validation`] if the window is inverted.
pub fn validate_window(
    valid_from: Option<DateTime<Utc>>,
    valid_to: Option<DateTime<Utc>>,
) -> Result<()> {
    match (valid_from, valid_to) {
        (Some(from), Some(to)) if from > to => Err(CoreError::Validation(
            "valid_from must not be after valid_to".to_string(),
        )),
        _ => Ok(()),
    }
}

/// Reject negative or non-finite amounts.
///
/// # Errors
///
/// Returns [`CoreError::Validation`] naming `field`.
pub fn validate_amount(field: &str, value: f64) -> Result<()> {
    if !value.is_finite() || value < 0.0 {
        return Err(CoreError::Validation(format!(
            "{field} must be a non-negative number"
        )));
    }
    Ok(())
}
