//! Customer and staff accounts.

use super::{text_enum, UserId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Account role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    /// Booth customer collecting points.
    #[default]
    Customer,

    /// Branch staff.
    Staff,

    /// Back-office administrator.
    Admin,
}

text_enum!(UserRole, "user role" {
    Customer => "customer",
    Staff => "staff",
    Admin => "admin",
});

/// An account identified by phone number and/or email.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// User ID.
    pub id: UserId,

    /// Phone number; unique when set.
    pub tel: Option<String>,

    /// Email address; unique when set.
    pub email: Option<String>,

    /// Account role.
    pub role: UserRole,

    /// Loyalty point balance, never negative.
    pub points: i32,

    /// Created timestamp.
    pub created_at: DateTime<Utc>,

    /// Last profile change.
    pub updated_at: DateTime<Utc>,
}
