//! HTTP request handlers, one module per resource.

pub mod booth_tokens;
pub mod booths;
pub mod branches;
pub mod health;
pub mod media;
pub mod payments;
pub mod sessions;
pub mod users;
pub mod vouchers;

pub use health::health_check;
