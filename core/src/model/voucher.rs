//! Voucher and redemption entities.

use super::{text_enum, RedemptionId, SessionId, VoucherId};
use crate::error::IneligibleReason;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// What a voucher grants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VoucherType {
    /// Reduces the session price.
    Discount,

    /// Grants a free session.
    Free,
}

text_enum!(VoucherType, "voucher type" {
    Discount => "discount",
    Free => "free",
});

/// Unit of a voucher's `value`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VoucherUnit {
    /// Percentage off.
    Percent,

    /// Fixed amount in Thai baht.
    Baht,

    /// Number of sessions.
    Session,
}

text_enum!(VoucherUnit, "voucher unit" {
    Percent => "percent",
    Baht => "baht",
    Session => "session",
});

/// A discount or free-session code with a usage cap and optional validity
/// window.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Voucher {
    /// Voucher ID.
    pub id: VoucherId,

    /// Unique redemption code.
    pub code: String,

    /// Voucher type.
    #[serde(rename = "type")]
    pub voucher_type: VoucherType,

    /// Amount in `unit`.
    pub value: f64,

    /// Unit of `value`.
    pub unit: VoucherUnit,

    /// Maximum number of redemptions. `0` or negative means unlimited.
    pub max_usage: i32,

    /// Successful redemptions so far.
    pub used_count: i32,

    /// Start of the validity window.
    pub valid_from: Option<DateTime<Utc>>,

    /// End of the validity window.
    pub valid_to: Option<DateTime<Utc>>,

    /// Master on/off switch.
    pub active: bool,

    /// Created timestamp.
    pub created_at: DateTime<Utc>,
}

impl Voucher {
    /// Whether `max_usage` caps redemptions at all.
    #[must_use]
    pub const fn is_limited(&self) -> bool {
        self.max_usage > 0
    }

    /// Check whether the voucher may be redeemed at `now`.
    ///
    /// Checks run in a fixed order and the first failure wins: active flag,
    /// `valid_from`, `valid_to`, usage limit.
    ///
    /// # Errors
    ///
    /// Returns the [`IneligibleReason`] of the first failing check.
    pub fn check_eligibility(&self, now: DateTime<Utc>) -> Result<(), IneligibleReason> {
        if !self.active {
            return Err(IneligibleReason::Inactive);
        }
        if self.valid_from.is_some_and(|from| now < from) {
            return Err(IneligibleReason::NotYetValid);
        }
        if self.valid_to.is_some_and(|to| now > to) {
            return Err(IneligibleReason::Expired);
        }
        if self.is_limited() && self.used_count >= self.max_usage {
            return Err(IneligibleReason::UsageLimitReached);
        }
        Ok(())
    }
}

/// Immutable record of one successful voucher use against one session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Redemption {
    /// Redemption ID.
    pub id: RedemptionId,

    /// Redeemed voucher.
    pub voucher_id: VoucherId,

    /// Session the voucher was applied to.
    pub session_id: SessionId,

    /// Customer phone number.
    pub tel: Option<String>,

    /// Amount actually applied.
    pub discount: Option<f64>,

    /// Created timestamp.
    pub created_at: DateTime<Utc>,
}

/// Caller-supplied part of a redemption.
#[derive(Debug, Clone, PartialEq)]
pub struct NewRedemption {
    /// Session the voucher applies to.
    pub session_id: SessionId,

    /// Customer phone number.
    pub tel: Option<String>,

    /// Amount actually applied.
    pub discount: Option<f64>,
}

impl NewRedemption {
    /// Materialize the redemption row for `voucher_id`.
    #[must_use]
    pub fn into_redemption(self, voucher_id: VoucherId, created_at: DateTime<Utc>) -> Redemption {
        Redemption {
            id: RedemptionId::new(),
            voucher_id,
            session_id: self.session_id,
            tel: self.tel,
            discount: self.discount,
            created_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn voucher(now: DateTime<Utc>) -> Voucher {
        Voucher {
            id: VoucherId::new(),
            code: "WELCOME50".into(),
            voucher_type: VoucherType::Discount,
            value: 50.0,
            unit: VoucherUnit::Percent,
            max_usage: 1,
            used_count: 0,
            valid_from: None,
            valid_to: None,
            active: true,
            created_at: now,
        }
    }

    #[test]
    fn test_fresh_voucher_is_eligible() {
        let now = Utc::now();
        assert_eq!(voucher(now).check_eligibility(now), Ok(()));
    }

    #[test]
    fn test_inactive_wins_over_every_other_check() {
        let now = Utc::now();
        let mut v = voucher(now);
        v.active = false;
        v.valid_to = Some(now - Duration::days(1));
        v.used_count = 5;
        assert_eq!(v.check_eligibility(now), Err(IneligibleReason::Inactive));
    }

    #[test]
    fn test_window_boundaries_are_inclusive() {
        let now = Utc::now();
        let mut v = voucher(now);
        v.valid_from = Some(now);
        v.valid_to = Some(now);
        assert_eq!(v.check_eligibility(now), Ok(()));
        assert_eq!(
            v.check_eligibility(now - Duration::seconds(1)),
            Err(IneligibleReason::NotYetValid)
        );
        assert_eq!(
            v.check_eligibility(now + Duration::seconds(1)),
            Err(IneligibleReason::Expired)
        );
    }

    #[test]
    fn test_non_positive_max_usage_is_unlimited() {
        let now = Utc::now();
        let mut v = voucher(now);
        v.max_usage = 0;
        v.used_count = 10_000;
        assert_eq!(v.check_eligibility(now), Ok(()));
        v.max_usage = -1;
        assert_eq!(v.check_eligibility(now), Ok(()));
    }

    #[test]
    fn test_exhausted_voucher() {
        let now = Utc::now();
        let mut v = voucher(now);
        v.used_count = 1;
        assert_eq!(v.check_eligibility(now), Err(IneligibleReason::UsageLimitReached));
    }
}
