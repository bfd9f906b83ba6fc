//! Axum HTTP boundary for the photobooth backend.
//!
//! Handlers are thin adapters: they extract and authenticate the request,
//! call the core services, token authority or voucher ledger held in
//! [`AppState`], and map [`photobooth_core::CoreError`] to a status code
//! through [`AppError`].
//!
//! # Request Flow
//!
//! 1. **Correlation ID** assigned and the `http_request` span opened
//! 2. **Extract** path, query and JSON body; malformed input is a 400
//! 3. **Authenticate** booth routes via [`AuthenticatedBooth`], which records
//!    the booth on the request span
//! 4. **Call** the core
//! 5. **Map** the result to a JSON response
//!
//! # Example
//!
//! ```ignore
//! use photobooth_web::{build_router, AppState, Repositories};
//!
//! let state = AppState::new(repositories, Arc::new(SystemClock), TokenConfig::new(secret));
//! let app = build_router(state);
//! axum::serve(listener, app).await?;
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs, clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod error;
pub mod extractors;
pub mod handlers;
pub mod middleware;
pub mod router;
pub mod state;

pub use error::AppError;
pub use extractors::{AppJson, AppQuery, AuthenticatedBooth, BearerToken, CorrelationId};
pub use middleware::{assign_correlation_id, RequestSpan, CORRELATION_ID_HEADER};
pub use router::build_router;
pub use state::{AppState, Repositories};

