//! # Photobooth Testing
//!
//! Testing utilities for the photobooth platform.
//!
//! This crate provides:
//! - `FixedClock` for deterministic validity-window checks
//! - Fixture builders for branches, booths, sessions, photos, frames and
//!   vouchers
//! - `TestEnv`: in-memory stores wired to the token authority, the voucher
//!   ledger and the CRUD services
//! - proptest strategies for voucher codes and voucher creation requests
//!
//! ## Example
//!
//! ```
//! use photobooth_testing::TestEnv;
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() -> photobooth_core::Result<()> {
//! let env = TestEnv::new();
//! let (branch, booth) = env.seed_booth().await?;
//!
//! let token = env.authority.register(booth.id, Some(branch.id)).await?;
//! let identity = env.authority.validate(&token).await?;
//! assert_eq!(identity.booth_id, booth.id);
//! # Ok(())
//! # }
//! ```

use chrono::{DateTime, Utc};
use photobooth_core::environment::Clock;

/// Mock implementations for testing.
pub mod mocks {
    use super::{Clock, DateTime, Utc};

    /// Fixed clock for deterministic tests
    ///
    /// Always returns the same time, making tests reproducible.
    ///
    /// # Example
    ///
    /// ```
    /// use photobooth_testing::mocks::FixedClock;
    /// use photobooth_core::environment::Clock;
    /// use chrono::Utc;
    ///
    /// let clock = FixedClock::new(Utc::now());
    /// assert_eq!(clock.now(), clock.now());
    /// ```
    #[derive(Debug, Clone)]
    pub struct FixedClock {
        time: DateTime<Utc>,
    }

    impl FixedClock {
        /// Create a new fixed clock with the given time
        #[must_use]
        pub const fn new(time: DateTime<Utc>) -> Self {
            Self { time }
        }
    }

    impl Clock for FixedClock {
        fn now(&self) -> DateTime<Utc> {
            self.time
        }
    }

    /// Create a default fixed clock for tests (2025-01-01 00:00:00 UTC)
    #[must_use]
    pub fn test_clock() -> FixedClock {
        FixedClock::new(DateTime::<Utc>::from_timestamp(1_735_689_600, 0).unwrap_or_default())
    }
}

pub mod env;
pub mod fixtures;
pub mod properties;

// Re-export commonly used items
pub use env::TestEnv;
pub use mocks::{FixedClock, test_clock};

/// Install a `tracing` subscriber that writes through the test harness.
///
/// Safe to call from every test; only the first call installs.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("photobooth=debug")),
        )
        .with_test_writer()
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixed_clock() {
        let clock = test_clock();
        let time1 = clock.now();
        let time2 = clock.now();
        assert_eq!(time1, time2);
        assert_eq!(time1.to_rfc3339(), "2025-01-01T00:00:00+00:00");
    }
}
