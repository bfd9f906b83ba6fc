//! Payment entity.

use super::{text_enum, PaymentId, SessionId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// How the customer paid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentMethod {
    /// Cash at the booth.
    Cash,

    /// PromptPay or bank QR transfer.
    Qr,

    /// Card through Stripe.
    Stripe,

    /// Loyalty points.
    Points,
}

text_enum!(PaymentMethod, "payment method" {
    Cash => "cash",
    Qr => "qr",
    Stripe => "stripe",
    Points => "points",
});

/// Settlement state of a payment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentStatus {
    /// Awaiting confirmation.
    #[default]
    Pending,

    /// Settled.
    Success,

    /// Declined or abandoned.
    Failed,
}

text_enum!(PaymentStatus, "payment status" {
    Pending => "pending",
    Success => "success",
    Failed => "failed",
});

/// The single payment attached to a session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Payment {
    /// Payment ID.
    pub id: PaymentId,

    /// Paid session; at most one payment per session.
    pub session_id: SessionId,

    /// Payment method.
    pub method: PaymentMethod,

    /// Amount charged.
    pub amount: f64,

    /// ISO 4217 currency code.
    pub currency: String,

    /// Settlement state.
    pub status: PaymentStatus,

    /// Provider reference (Stripe charge, bank slip number).
    pub transaction_ref: Option<String>,

    /// Created timestamp.
    pub created_at: DateTime<Utc>,
}
