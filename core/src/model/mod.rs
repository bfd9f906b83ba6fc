//! Domain types.
//!
//! Every entity is a plain `Clone` value; stores hand out copies and the
//! services mutate copies before writing them back.

pub mod booth;
pub mod branch;
pub mod media;
pub mod payment;
pub mod session;
pub mod telemetry;
pub mod user;
pub mod voucher;

pub use booth::{Booth, BoothStatus, BoothType};
pub use branch::Branch;
pub use media::{Filter, Frame, Photo, QrCode};
pub use payment::{Payment, PaymentMethod, PaymentStatus};
pub use session::{Session, SessionStatus};
pub use telemetry::{AnalyticsEvent, BoothLog, LogLevel};
pub use user::{User, UserRole};
pub use voucher::{NewRedemption, Redemption, Voucher, VoucherType, VoucherUnit};

/// Free-form JSON object stored alongside booths, sessions and media.
pub type JsonObject = serde_json::Map<String, serde_json::Value>;

macro_rules! uuid_id {
    ($(#[$meta:meta])* $name:ident, $resource:literal) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, serde::Serialize, serde::Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub uuid::Uuid);

        impl $name {
            /// Generate a new random id.
            #[must_use]
            pub fn new() -> Self {
                Self(uuid::Uuid::new_v4())
            }

            /// Parse an id from its hyphenated string form.
            ///
            /// # Errors
            ///
            /// Returns [`CoreError::Validation`] if `raw` is not a UUID.
            pub fn parse(raw: &str) -> Result<Self, $crate::error::CoreError> {
                uuid::Uuid::parse_str(raw.trim())
                    .map(Self)
                    .map_err(|_| $crate::error::CoreError::Validation(format!("invalid {} id: {raw}", $resource)))
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                self.0.fmt(f)
            }
        }

        impl From<uuid::Uuid> for $name {
            fn from(value: uuid::Uuid) -> Self {
                Self(value)
            }
        }
    };
}

uuid_id!(
    /// Unique identifier for a branch.
    BranchId,
    "branch"
);
uuid_id!(
    /// Unique identifier for a booth.
    BoothId,
    "booth"
);
uuid_id!(
    /// Unique identifier for a customer session.
    SessionId,
    "session"
);
uuid_id!(
    /// Unique identifier for a voucher.
    VoucherId,
    "voucher"
);
uuid_id!(
    /// Unique identifier for a voucher redemption.
    RedemptionId,
    "redemption"
);
uuid_id!(
    /// Unique identifier for a photo.
    PhotoId,
    "photo"
);
uuid_id!(
    /// Unique identifier for a photo frame.
    FrameId,
    "frame"
);
uuid_id!(
    /// Unique identifier for a photo filter.
    FilterId,
    "filter"
);
uuid_id!(
    /// Unique identifier for a photo share link.
    QrCodeId,
    "qr code"
);
uuid_id!(
    /// Unique identifier for a payment.
    PaymentId,
    "payment"
);
uuid_id!(
    /// Unique identifier for a customer account.
    UserId,
    "user"
);
uuid_id!(
    /// Unique identifier for a booth log entry.
    BoothLogId,
    "booth log"
);
uuid_id!(
    /// Unique identifier for an analytics event.
    AnalyticsEventId,
    "analytics event"
);

/// Implements `as_str`/`FromStr` for a text-backed enum.
macro_rules! text_enum {
    ($name:ident, $label:literal { $($variant:ident => $text:literal),+ $(,)? }) => {
        impl $name {
            /// Wire and storage representation.
            #[must_use]
            pub const fn as_str(self) -> &'static str {
                match self {
                    $(Self::$variant => $text),+
                }
            }
        }

        impl std::str::FromStr for $name {
            type Err = $crate::error::CoreError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($text => Ok(Self::$variant),)+
                    other => Err($crate::error::CoreError::Validation(format!("unknown {}: {other}", $label))),
                }
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

pub(crate) use text_enum;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CoreError;

    #[test]
    fn test_id_parse_round_trips_display() {
        let id = BoothId::new();
        assert_eq!(BoothId::parse(&id.to_string()), Ok(id));
    }

    #[test]
    fn test_id_parse_rejects_garbage() {
        let err = VoucherId::parse("not-a-uuid").unwrap_err();
        assert_eq!(err, CoreError::Validation("invalid voucher id: not-a-uuid".into()));
    }

    #[test]
    fn test_id_serializes_as_plain_string() {
        let id = SessionId::new();
        let json = serde_json::to_value(id).unwrap();
        assert_eq!(json, serde_json::Value::String(id.to_string()));
    }
}
