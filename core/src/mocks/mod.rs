//! In-memory store implementations for testing.
//!
//! Every store keeps its rows behind one `Mutex`, so the conditional
//! counter updates (`initialize_token_version`, `bump_token_version`,
//! `record_redemption`, `adjust_points`) are atomic exactly like their `PostgreSQL`
//! counterparts.

pub mod booth;
pub mod branch;
pub mod media;
pub mod payment;
pub mod session;
pub mod telemetry;
pub mod user;
pub mod voucher;

pub use booth::InMemoryBoothRepository;
pub use branch::InMemoryBranchRepository;
pub use media::{InMemoryFilterRepository, InMemoryFrameRepository, InMemoryPhotoRepository};
pub use payment::InMemoryPaymentRepository;
pub use session::InMemorySessionRepository;
pub use telemetry::InMemoryTelemetryRepository;
pub use user::InMemoryUserRepository;
pub use voucher::InMemoryVoucherRepository;

use crate::error::CoreError;
use std::sync::{Arc, Mutex, MutexGuard};

fn lock<'a, T>(mutex: &'a Arc<Mutex<T>>, store: &str) -> Result<MutexGuard<'a, T>, CoreError> {
    mutex
        .lock()
        .map_err(|_| CoreError::Internal(format!("{store} store lock poisoned")))
}
