//! CRUD services for the platform's resources.
//!
//! Each service validates its input, fills defaults and delegates to the
//! store traits in [`crate::providers`]. Request inputs deserialize
//! straight from the HTTP bodies; timestamps in bodies are Unix seconds.
//!
//! Deletes are restrictive: a record that others still point at (a branch
//! with booths, a booth with sessions, a session with photos, a payment or
//! redemptions, a frame or filter in use) is refused with `Conflict`.

pub mod booth;
pub mod branch;
pub mod catalog;
pub mod media;
pub mod payment;
pub mod session;
pub mod telemetry;
pub mod user;
pub mod voucher;

pub use booth::{BoothService, CreateBooth, UpdateBooth};
pub use branch::{BranchService, CreateBranch, UpdateBranch};
pub use catalog::{CreateFilter, CreateFrame, FilterService, FrameService, UpdateFilter, UpdateFrame};
pub use media::{CreatePhoto, CreateQrCode, PhotoService, UpdatePhoto};
pub use payment::{CreatePayment, PaymentService, UpdatePayment};
pub use session::{CreateSession, SessionService, UpdateSession};
pub use telemetry::{RecordEvent, RecordLog, TelemetryService};
pub use user::{CreateUser, UpdateUser, UserService};
pub use voucher::{CreateVoucher, UpdateVoucher, VoucherService};
