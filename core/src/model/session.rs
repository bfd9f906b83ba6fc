//! Customer session entity.

use super::{text_enum, BoothId, JsonObject, PaymentId, SessionId, UserId, VoucherId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Lifecycle status of a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionStatus {
    /// Customer is using the booth.
    #[default]
    Started,

    /// Photos delivered.
    Success,

    /// Session aborted by an error.
    Failed,

    /// Customer walked away or cancelled.
    Cancelled,
}

text_enum!(SessionStatus, "session status" {
    Started => "started",
    Success => "success",
    Failed => "failed",
    Cancelled => "cancelled",
});

/// One customer visit to a booth.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    /// Session ID.
    pub id: SessionId,

    /// Booth that ran the session.
    pub booth_id: BoothId,

    /// Registered customer, if any.
    pub user_id: Option<UserId>,

    /// Voucher applied at checkout, if any.
    pub voucher_id: Option<VoucherId>,

    /// Payment record, if any.
    pub payment_id: Option<PaymentId>,

    /// Start timestamp.
    pub started_at: Option<DateTime<Utc>>,

    /// Finish timestamp.
    pub finished_at: Option<DateTime<Utc>>,

    /// Lifecycle status.
    pub status: SessionStatus,

    /// Price charged.
    pub total_price: Option<f64>,

    /// Booth configuration captured when the session started.
    #[serde(default)]
    pub booth_snapshot: JsonObject,

    /// Phone number captured for photo delivery.
    pub phone_temp: Option<String>,
}

impl Session {
    /// Whether this session was run by `booth_id`.
    #[must_use]
    pub fn belongs_to(&self, booth_id: BoothId) -> bool {
        self.booth_id == booth_id
    }
}
