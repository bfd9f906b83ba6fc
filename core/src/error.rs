//! Error types for the photobooth core.

use serde::Serialize;
use std::fmt;
use thiserror::Error;

/// Result type alias for core operations.
pub type Result<T> = std::result::Result<T, CoreError>;

/// Why a voucher cannot be redeemed right now.
///
/// The `Display` strings are part of the public contract: they are returned
/// verbatim to booth clients.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum IneligibleReason {
    /// The voucher's `active` flag is off.
    Inactive,

    /// `valid_from` lies in the future.
    NotYetValid,

    /// `valid_to` lies in the past.
    Expired,

    /// `used_count` has reached `max_usage`.
    UsageLimitReached,
}

impl IneligibleReason {
    /// Metric label for this reason.
    #[must_use]
    pub const fn as_label(self) -> &'static str {
        match self {
            Self::Inactive => "inactive",
            Self::NotYetValid => "not_yet_valid",
            Self::Expired => "expired",
            Self::UsageLimitReached => "limit_reached",
        }
    }
}

impl fmt::Display for IneligibleReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let message = match self {
            Self::Inactive => "voucher inactive",
            Self::NotYetValid => "voucher not yet valid",
            Self::Expired => "voucher expired",
            Self::UsageLimitReached => "voucher usage limit reached",
        };
        f.write_str(message)
    }
}

/// Error taxonomy for the photobooth core.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum CoreError {
    // ═══════════════════════════════════════════════════════════
    // Booth Authentication Errors
    // ═══════════════════════════════════════════════════════════

    /// Token is malformed, badly signed, uses a non-HMAC algorithm,
    /// is expired, or carries incomplete claims.
    #[error("invalid booth token")]
    InvalidToken,

    /// Token is well formed but disagrees with the booth's live state.
    #[error("booth token does not match current booth state")]
    TokenMismatch,

    // ═══════════════════════════════════════════════════════════
    // Domain Errors
    // ═══════════════════════════════════════════════════════════

    /// Referenced entity does not exist.
    #[error("{resource} {id} not found")]
    NotFound {
        /// Entity kind (e.g. "booth").
        resource: &'static str,
        /// Lookup key that missed.
        id: String,
    },

    /// Voucher exists but cannot be redeemed.
    #[error("{0}")]
    VoucherIneligible(IneligibleReason),

    /// Request input failed validation.
    #[error("{0}")]
    Validation(String),

    /// Write collided with a uniqueness constraint.
    #[error("{0}")]
    Conflict(String),

    // ═══════════════════════════════════════════════════════════
    // System Errors
    // ═══════════════════════════════════════════════════════════

    /// Backing store failed.
    #[error("Database error: {0}")]
    Database(String),

    /// Unexpected internal failure (e.g. token signing).
    #[error("Internal error: {0}")]
    Internal(String),
}

impl CoreError {
    /// Shorthand for [`CoreError::NotFound`].
    #[must_use]
    pub fn not_found(resource: &'static str, id: impl fmt::Display) -> Self {
        Self::NotFound {
            resource,
            id: id.to_string(),
        }
    }

    /// Returns `true` if this error means the caller is not authenticated.
    ///
    /// # Examples
    ///
    /// ```
    /// # use photobooth_core::CoreError;
    /// assert!(CoreError::TokenMismatch.is_auth_failure());
    /// assert!(!CoreError::Validation("code required".into()).is_auth_failure());
    /// ```
    pub const fn is_auth_failure(&self) -> bool {
        matches!(self, Self::InvalidToken | Self::TokenMismatch)
    }

    /// Returns `true` if this error is caused by the caller's input rather
    /// than by the system.
    ///
    /// # Examples
    ///
    /// ```
    /// # use photobooth_core::{CoreError, IneligibleReason};
    /// assert!(CoreError::VoucherIneligible(IneligibleReason::Expired).is_user_error());
    /// assert!(!CoreError::Database("timeout".into()).is_user_error());
    /// ```
    pub const fn is_user_error(&self) -> bool {
        matches!(
            self,
            Self::NotFound { .. }
                | Self::VoucherIneligible(_)
                | Self::Validation(_)
                | Self::Conflict(_)
        )
    }
}
