//! `PostgreSQL` stores for the photobooth platform.
//!
//! Implements every store trait of `photobooth-core` on top of a sqlx
//! [`PgPool`]. The shared counters are only ever changed by single
//! conditional `UPDATE ... RETURNING` statements:
//!
//! - `booths.token_version`: [`PostgresBoothRepository`]
//! - `vouchers.used_count`: [`PostgresVoucherRepository`], together with
//!   the redemption insert in one transaction
//! - `users.points`: [`PostgresUserRepository`]
//!
//! The expected schema is in `schema.sql` at the crate root.
//!
//! # Example
//!
//! ```no_run
//! use photobooth_postgres::{PgPoolOptions, PostgresStores};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let pool = PgPoolOptions::new()
//!     .max_connections(10)
//!     .connect("postgres://localhost/photobooth")
//!     .await?;
//! let stores = PostgresStores::new(pool);
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod booth;
mod branch;
mod media;
mod payment;
mod session;
mod telemetry;
mod user;
mod voucher;

pub use booth::PostgresBoothRepository;
pub use branch::PostgresBranchRepository;
pub use media::{PostgresFilterRepository, PostgresFrameRepository, PostgresPhotoRepository};
pub use payment::PostgresPaymentRepository;
pub use session::PostgresSessionRepository;
pub use telemetry::PostgresTelemetryRepository;
pub use user::PostgresUserRepository;
pub use voucher::PostgresVoucherRepository;

pub use sqlx::PgPool;
pub use sqlx::postgres::PgPoolOptions;

use photobooth_core::CoreError;

/// Reference schema expected by the stores.
pub const SCHEMA: &str = include_str!("../schema.sql");

/// All stores sharing one connection pool.
#[derive(Clone)]
pub struct PostgresStores {
    /// Branch store.
    pub branches: PostgresBranchRepository,
    /// Booth store.
    pub booths: PostgresBoothRepository,
    /// Session store.
    pub sessions: PostgresSessionRepository,
    /// Voucher and redemption store.
    pub vouchers: PostgresVoucherRepository,
    /// Photo and share link store.
    pub photos: PostgresPhotoRepository,
    /// Frame catalog.
    pub frames: PostgresFrameRepository,
    /// Filter catalog.
    pub filters: PostgresFilterRepository,
    /// Payment store.
    pub payments: PostgresPaymentRepository,
    /// User store.
    pub users: PostgresUserRepository,
    /// Booth log and analytics store.
    pub telemetry: PostgresTelemetryRepository,
}

impl PostgresStores {
    /// Create every store on `pool`.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self {
            branches: PostgresBranchRepository::new(pool.clone()),
            booths: PostgresBoothRepository::new(pool.clone()),
            sessions: PostgresSessionRepository::new(pool.clone()),
            vouchers: PostgresVoucherRepository::new(pool.clone()),
            photos: PostgresPhotoRepository::new(pool.clone()),
            frames: PostgresFrameRepository::new(pool.clone()),
            filters: PostgresFilterRepository::new(pool.clone()),
            payments: PostgresPaymentRepository::new(pool.clone()),
            users: PostgresUserRepository::new(pool.clone()),
            telemetry: PostgresTelemetryRepository::new(pool),
        }
    }
}

/// Apply [`SCHEMA`] to the database.
///
/// Intended for tests and local development; every statement is
/// idempotent.
///
/// # Errors
///
/// Returns `Database` if any statement fails.
pub async fn apply_schema(pool: &PgPool) -> Result<(), CoreError> {
    sqlx::raw_sql(SCHEMA)
        .execute(pool)
        .await
        .map_err(|e| database_error("apply schema", &e))?;
    Ok(())
}

/// Map a sqlx error to the core taxonomy.
///
/// Constraint violations become `Conflict` with a message naming only the
/// action; the database's own message is logged, never returned. Everything
/// else is a `Database` error.
pub(crate) fn database_error(action: &str, error: &sqlx::Error) -> CoreError {
    if let sqlx::Error::Database(db) = error {
        let reason = if db.is_unique_violation() {
            Some("duplicate record")
        } else if db.is_foreign_key_violation() {
            Some("referenced record missing or still in use")
        } else if db.is_check_violation() {
            Some("constraint violated")
        } else {
            None
        };
        if let Some(reason) = reason {
            tracing::debug!(
                error = %db.message(),
                constraint = db.constraint().unwrap_or_default(),
                action,
                "Constraint violation"
            );
            return CoreError::Conflict(format!("Failed to {action}: {reason}"));
        }
    }
    tracing::error!(error = %error, action, "Database operation failed");
    CoreError::Database(format!("Failed to {action}: {error}"))
}

/// Map a corrupt column value to a `Database` error.
pub(crate) fn corrupt_row(column: &str, error: &CoreError) -> CoreError {
    CoreError::Database(format!("Invalid value in column {column}: {error}"))
}
