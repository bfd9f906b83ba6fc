//! # Photobooth Core
//!
//! Domain model and business rules of the photobooth platform: branches own
//! booths, booths run customer sessions, and sessions take photos, get paid
//! for and redeem vouchers.
//!
//! ## Components
//!
//! - [`BoothTokenAuthority`]: issues, rotates and validates versioned
//!   HMAC-signed booth access tokens. Bumping a booth's `token_version`
//!   revokes every token issued before it.
//! - [`VoucherLedger`]: checks voucher eligibility and records redemptions
//!   through the store's atomic conditional increment, so `used_count`
//!   never exceeds `max_usage` under concurrent load.
//! - [`services`]: CRUD for branches, booths, sessions, vouchers, photos and
//!   their share links, the frame and filter catalogs, payments, users, and
//!   booth logs and analytics.
//! - [`providers`]: store traits implemented by `photobooth-postgres` and by
//!   the in-memory [`mocks`].
//!
//! ## Example: redeeming a voucher
//!
//! ```
//! use photobooth_core::environment::SystemClock;
//! use photobooth_core::mocks::InMemoryVoucherRepository;
//! use photobooth_core::model::{NewRedemption, SessionId};
//! use photobooth_core::services::{CreateVoucher, VoucherService};
//! use photobooth_core::{IneligibleReason, CoreError, VoucherLedger};
//! use std::sync::Arc;
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() -> photobooth_core::Result<()> {
//! let vouchers = Arc::new(InMemoryVoucherRepository::new());
//! let clock = Arc::new(SystemClock);
//! let admin = VoucherService::new(vouchers.clone(), clock.clone());
//! let ledger = VoucherLedger::new(vouchers, clock);
//!
//! let input: CreateVoucher = serde_json::from_str(
//!     r#"{"code":"WELCOME50","type":"discount","value":50,"unit":"percent","max_usage":1}"#,
//! ).map_err(|e| CoreError::Validation(e.to_string()))?;
//! admin.create(input).await?;
//!
//! let redeem = |session_id| NewRedemption { session_id, tel: None, discount: Some(50.0) };
//! let receipt = ledger.redeem("WELCOME50", redeem(SessionId::new())).await?;
//! assert_eq!(receipt.voucher.used_count, 1);
//!
//! let second = ledger.redeem("WELCOME50", redeem(SessionId::new())).await;
//! assert_eq!(second, Err(CoreError::VoucherIneligible(IneligibleReason::UsageLimitReached)));
//! # Ok(())
//! # }
//! ```

#![deny(missing_docs)]
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]
#![deny(clippy::todo)]
#![deny(clippy::unimplemented)]

pub mod config;
pub mod constants;
pub mod environment;
pub mod error;
pub mod ledger;
pub mod model;
pub mod providers;
pub mod services;
pub mod token;
pub mod validation;

/// In-memory store implementations.
#[cfg(any(test, feature = "test-utils"))]
pub mod mocks;

// Re-export main types for convenience
pub use config::TokenConfig;
pub use environment::{Clock, SystemClock};
pub use error::{CoreError, IneligibleReason, Result};
pub use ledger::{RedemptionReceipt, VoucherLedger};
pub use token::{BoothClaims, BoothTokenAuthority, ValidatedToken};
