//! Store interfaces.
//!
//! The core depends only on these traits; `photobooth-postgres` provides the
//! production implementations and [`crate::mocks`] provides in-memory ones.
//!
//! # Mutation discipline
//!
//! The booth `token_version`, the voucher `used_count` and the user point
//! balance are the shared counters the core mutates. They change
//! exclusively through store-level atomic operations
//! ([`BoothRepository::bump_token_version`],
//! [`BoothRepository::initialize_token_version`],
//! [`VoucherRepository::record_redemption`],
//! [`UserRepository::adjust_points`]) so that concurrent requests, possibly
//! served by different processes, never lose an update. The plain `update`
//! methods never write a counter.

pub mod booth;
pub mod branch;
pub mod media;
pub mod payment;
pub mod session;
pub mod telemetry;
pub mod user;
pub mod voucher;

pub use booth::BoothRepository;
pub use branch::BranchRepository;
pub use media::{FilterRepository, FrameRepository, PhotoRepository};
pub use payment::PaymentRepository;
pub use session::SessionRepository;
pub use telemetry::TelemetryRepository;
pub use user::UserRepository;
pub use voucher::VoucherRepository;
