//! Application state for Axum handlers.

use photobooth_core::environment::Clock;
use photobooth_core::providers::{
    BoothRepository, BranchRepository, FilterRepository, FrameRepository, PaymentRepository,
    PhotoRepository, SessionRepository, TelemetryRepository, UserRepository, VoucherRepository,
};
use photobooth_core::services::{
    BoothService, BranchService, FilterService, FrameService, PaymentService, PhotoService,
    SessionService, TelemetryService, UserService, VoucherService,
};
use photobooth_core::{BoothTokenAuthority, TokenConfig, VoucherLedger};
use std::sync::Arc;

/// Stores backing an [`AppState`].
#[derive(Clone)]
pub struct Repositories {
    /// Branch store.
    pub branches: Arc<dyn BranchRepository>,
    /// Booth store.
    pub booths: Arc<dyn BoothRepository>,
    /// Session store.
    pub sessions: Arc<dyn SessionRepository>,
    /// Voucher and redemption store.
    pub vouchers: Arc<dyn VoucherRepository>,
    /// Photo and share link store.
    pub photos: Arc<dyn PhotoRepository>,
    /// Frame catalog.
    pub frames: Arc<dyn FrameRepository>,
    /// Filter catalog.
    pub filters: Arc<dyn FilterRepository>,
    /// Payment store.
    pub payments: Arc<dyn PaymentRepository>,
    /// User store.
    pub users: Arc<dyn UserRepository>,
    /// Booth log and analytics store.
    pub telemetry: Arc<dyn TelemetryRepository>,
}

/// Application state shared across all HTTP handlers.
///
/// Cheap to clone: every field is reference counted.
#[derive(Clone)]
pub struct AppState {
    /// Booth token authority.
    pub authority: Arc<BoothTokenAuthority>,
    /// Voucher redemption ledger.
    pub ledger: Arc<VoucherLedger>,
    /// Branch CRUD.
    pub branches: BranchService,
    /// Booth CRUD.
    pub booths: BoothService,
    /// Session CRUD.
    pub sessions: SessionService,
    /// Voucher CRUD.
    pub vouchers: VoucherService,
    /// Photos and share links.
    pub photos: PhotoService,
    /// Frame catalog.
    pub frames: FrameService,
    /// Filter catalog.
    pub filters: FilterService,
    /// Session payments.
    pub payments: PaymentService,
    /// Accounts and points.
    pub users: UserService,
    /// Booth logs and analytics.
    pub telemetry: TelemetryService,
}

impl AppState {
    /// Wire every core component to `repositories`.
    #[must_use]
    pub fn new(repositories: Repositories, clock: Arc<dyn Clock>, tokens: TokenConfig) -> Self {
        let Repositories {
            branches,
            booths,
            sessions,
            vouchers,
            photos,
            frames,
            filters,
            payments,
            users,
            telemetry,
        } = repositories;

        Self {
            authority: Arc::new(BoothTokenAuthority::new(booths.clone(), clock.clone(), tokens)),
            ledger: Arc::new(VoucherLedger::new(vouchers.clone(), clock.clone())),
            branches: BranchService::new(branches.clone(), booths.clone(), clock.clone()),
            booths: BoothService::new(
                booths.clone(),
                branches,
                sessions.clone(),
                telemetry.clone(),
                clock.clone(),
            ),
            sessions: SessionService::new(
                sessions.clone(),
                photos.clone(),
                payments.clone(),
                vouchers.clone(),
                clock.clone(),
            ),
            vouchers: VoucherService::new(vouchers, clock.clone()),
            photos: PhotoService::new(
                photos.clone(),
                frames.clone(),
                filters.clone(),
                sessions.clone(),
                clock.clone(),
            ),
            frames: FrameService::new(frames, photos.clone(), clock.clone()),
            filters: FilterService::new(filters, photos, clock.clone()),
            payments: PaymentService::new(payments, sessions.clone(), clock.clone()),
            users: UserService::new(users, clock.clone()),
            telemetry: TelemetryService::new(telemetry, booths, sessions, clock),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_state_is_clone_and_send() {
        fn assert_bounds<T: Clone + Send + Sync + 'static>() {}
        assert_bounds::<AppState>();
    }
}
