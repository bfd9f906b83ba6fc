//! In-memory environment.

use crate::fixtures;
use crate::mocks::{FixedClock, test_clock};
use photobooth_core::environment::Clock;
use photobooth_core::mocks::{
    InMemoryBoothRepository, InMemoryBranchRepository, InMemoryFilterRepository,
    InMemoryFrameRepository, InMemoryPaymentRepository, InMemoryPhotoRepository,
    InMemorySessionRepository, InMemoryTelemetryRepository, InMemoryUserRepository,
    InMemoryVoucherRepository,
};
use photobooth_core::model::{Booth, Branch, Frame, Photo, Session, Voucher};
use photobooth_core::providers::{
    BoothRepository, BranchRepository, FilterRepository, FrameRepository, PaymentRepository,
    PhotoRepository, SessionRepository, TelemetryRepository, UserRepository, VoucherRepository,
};
use photobooth_core::services::{
    BoothService, BranchService, FilterService, FrameService, PaymentService, PhotoService,
    SessionService, TelemetryService, UserService, VoucherService,
};
use photobooth_core::{BoothTokenAuthority, Result, TokenConfig, VoucherLedger};
use std::sync::Arc;

/// Secret used by [`TestEnv`] to sign booth tokens.
pub const TEST_TOKEN_SECRET: &str = "test-booth-token-secret";

/// In-memory stores wired to every core component.
///
/// The stores are exposed so tests can seed rows and inspect the result
/// of an operation directly.
pub struct TestEnv {
    /// Clock shared by the authority, the ledger and the services.
    pub clock: Arc<FixedClock>,
    /// Branch store.
    pub branches: Arc<InMemoryBranchRepository>,
    /// Booth store.
    pub booths: Arc<InMemoryBoothRepository>,
    /// Session store.
    pub sessions: Arc<InMemorySessionRepository>,
    /// Voucher and redemption store.
    pub vouchers: Arc<InMemoryVoucherRepository>,
    /// Photo and share link store.
    pub photos: Arc<InMemoryPhotoRepository>,
    /// Frame catalog.
    pub frames: Arc<InMemoryFrameRepository>,
    /// Filter catalog.
    pub filters: Arc<InMemoryFilterRepository>,
    /// Payment store.
    pub payments: Arc<InMemoryPaymentRepository>,
    /// User store.
    pub users: Arc<InMemoryUserRepository>,
    /// Booth log and analytics store.
    pub telemetry: Arc<InMemoryTelemetryRepository>,
    /// Token authority signing with [`TEST_TOKEN_SECRET`].
    pub authority: Arc<BoothTokenAuthority>,
    /// Voucher ledger.
    pub ledger: Arc<VoucherLedger>,
    /// Branch service.
    pub branch_service: BranchService,
    /// Booth service.
    pub booth_service: BoothService,
    /// Session service.
    pub session_service: SessionService,
    /// Voucher service.
    pub voucher_service: VoucherService,
    /// Photo service.
    pub photo_service: PhotoService,
    /// Frame service.
    pub frame_service: FrameService,
    /// Filter service.
    pub filter_service: FilterService,
    /// Payment service.
    pub payment_service: PaymentService,
    /// User service.
    pub user_service: UserService,
    /// Telemetry service.
    pub telemetry_service: TelemetryService,
}

impl TestEnv {
    /// Environment pinned at [`test_clock`].
    #[must_use]
    pub fn new() -> Self {
        Self::with_clock(test_clock())
    }

    /// Environment pinned at `clock`.
    #[must_use]
    pub fn with_clock(clock: FixedClock) -> Self {
        let clock = Arc::new(clock);
        let branches = Arc::new(InMemoryBranchRepository::new());
        let booths = Arc::new(InMemoryBoothRepository::new());
        let sessions = Arc::new(InMemorySessionRepository::new());
        let vouchers = Arc::new(InMemoryVoucherRepository::new());
        let photos = Arc::new(InMemoryPhotoRepository::new());
        let frames = Arc::new(InMemoryFrameRepository::new());
        let filters = Arc::new(InMemoryFilterRepository::new());
        let payments = Arc::new(InMemoryPaymentRepository::new());
        let users = Arc::new(InMemoryUserRepository::new());
        let telemetry = Arc::new(InMemoryTelemetryRepository::new());

        let dyn_clock: Arc<dyn Clock> = clock.clone();
        let dyn_branches: Arc<dyn BranchRepository> = branches.clone();
        let dyn_booths: Arc<dyn BoothRepository> = booths.clone();
        let dyn_sessions: Arc<dyn SessionRepository> = sessions.clone();
        let dyn_vouchers: Arc<dyn VoucherRepository> = vouchers.clone();
        let dyn_photos: Arc<dyn PhotoRepository> = photos.clone();
        let dyn_frames: Arc<dyn FrameRepository> = frames.clone();
        let dyn_filters: Arc<dyn FilterRepository> = filters.clone();
        let dyn_payments: Arc<dyn PaymentRepository> = payments.clone();
        let dyn_users: Arc<dyn UserRepository> = users.clone();
        let dyn_telemetry: Arc<dyn TelemetryRepository> = telemetry.clone();

        Self {
            authority: Arc::new(BoothTokenAuthority::new(
                dyn_booths.clone(),
                dyn_clock.clone(),
                TokenConfig::new(TEST_TOKEN_SECRET),
            )),
            ledger: Arc::new(VoucherLedger::new(dyn_vouchers.clone(), dyn_clock.clone())),
            branch_service: BranchService::new(
                dyn_branches.clone(),
                dyn_booths.clone(),
                dyn_clock.clone(),
            ),
            booth_service: BoothService::new(
                dyn_booths.clone(),
                dyn_branches,
                dyn_sessions.clone(),
                dyn_telemetry.clone(),
                dyn_clock.clone(),
            ),
            session_service: SessionService::new(
                dyn_sessions.clone(),
                dyn_photos.clone(),
                dyn_payments.clone(),
                dyn_vouchers.clone(),
                dyn_clock.clone(),
            ),
            voucher_service: VoucherService::new(dyn_vouchers, dyn_clock.clone()),
            photo_service: PhotoService::new(
                dyn_photos.clone(),
                dyn_frames.clone(),
                dyn_filters.clone(),
                dyn_sessions.clone(),
                dyn_clock.clone(),
            ),
            frame_service: FrameService::new(dyn_frames, dyn_photos.clone(), dyn_clock.clone()),
            filter_service: FilterService::new(dyn_filters, dyn_photos, dyn_clock.clone()),
            payment_service: PaymentService::new(
                dyn_payments,
                dyn_sessions.clone(),
                dyn_clock.clone(),
            ),
            user_service: UserService::new(dyn_users, dyn_clock.clone()),
            telemetry_service: TelemetryService::new(
                dyn_telemetry,
                dyn_booths,
                dyn_sessions,
                dyn_clock,
            ),
            clock,
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
        }
    }

    /// Store a branch and one never-registered booth in it.
    ///
    /// # Errors
    ///
    /// Propagates store errors.
    pub async fn seed_booth(&self) -> Result<(Branch, Booth)> {
        let now = self.clock.now();
        let branch = fixtures::branch("Siam", now);
        let booth = fixtures::booth(&branch, now);
        self.branches.create(&branch).await?;
        self.booths.create(&booth).await?;
        Ok((branch, booth))
    }

    /// Store a started session on `booth`.
    ///
    /// # Errors
    ///
    /// Propagates store errors.
    pub async fn seed_session(&self, booth: &Booth) -> Result<Session> {
        let session = fixtures::session(booth.id, self.clock.now());
        self.sessions.create(&session).await?;
        Ok(session)
    }

    /// Store a photo taken in `session`.
    ///
    /// # Errors
    ///
    /// Propagates store errors.
    pub async fn seed_photo(&self, session: &Session) -> Result<Photo> {
        let photo = fixtures::photo(session.id, self.clock.now());
        self.photos.create(&photo).await?;
        Ok(photo)
    }

    /// Store an active frame.
    ///
    /// # Errors
    ///
    /// Propagates store errors.
    pub async fn seed_frame(&self, name: &str) -> Result<Frame> {
        let frame = fixtures::frame(name, self.clock.now());
        self.frames.create(&frame).await?;
        Ok(frame)
    }

    /// Store an active voucher.
    ///
    /// # Errors
    ///
    /// Propagates store errors (including `Conflict` for a reused code).
    pub async fn seed_voucher(&self, code: &str, max_usage: i32) -> Result<Voucher> {
        let voucher = fixtures::voucher(code, max_usage, self.clock.now());
        self.vouchers.create(&voucher).await?;
        Ok(voucher)
    }
}

impl Default for TestEnv {
    fn default() -> Self {
        Self::new()
    }
}
