//! Booth entity.

use super::{text_enum, BoothId, BranchId, JsonObject};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Whether a booth is a kiosk on a shop floor or a web/virtual booth.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BoothType {
    /// Hardware kiosk.
    #[default]
    Physical,

    /// Software-only booth.
    Virtual,
}

text_enum!(BoothType, "booth type" {
    Physical => "physical",
    Virtual => "virtual",
});

/// Operational status of a booth.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BoothStatus {
    /// Accepting sessions.
    #[default]
    Active,

    /// Taken out of service.
    Inactive,
}

text_enum!(BoothStatus, "booth status" {
    Active => "active",
    Inactive => "inactive",
});

/// A kiosk belonging to a branch; the unit that authenticates with a booth
/// access token.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Booth {
    /// Booth ID.
    pub id: BoothId,

    /// Owning branch.
    pub branch_id: BranchId,

    /// Display name.
    pub name: String,

    /// Booth type.
    #[serde(rename = "type")]
    pub booth_type: BoothType,

    /// Operational status.
    pub status: BoothStatus,

    /// Booth-specific settings (pricing, layout, ...).
    #[serde(default)]
    pub config: JsonObject,

    /// Current token version. `0` means no token was ever issued; every
    /// valid token must carry exactly this value.
    pub token_version: i32,

    /// Created timestamp.
    pub created_at: DateTime<Utc>,
}

impl Booth {
    /// Version that follows `current` on regeneration.
    ///
    /// Wraps to `1` whenever the increment would not produce a positive
    /// value.
    ///
    /// # Examples
    ///
    /// ```
    /// use photobooth_core::model::Booth;
    ///
    /// assert_eq!(Booth::next_token_version(0), 1);
    /// assert_eq!(Booth::next_token_version(7), 8);
    /// assert_eq!(Booth::next_token_version(i32::MAX), 1);
    /// assert_eq!(Booth::next_token_version(-5), 1);
    /// ```
    #[must_use]
    pub fn next_token_version(current: i32) -> i32 {
        current
            .checked_add(1)
            .filter(|next| *next > 0)
            .unwrap_or(1)
    }
}
