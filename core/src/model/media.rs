//! Photos, the frame and filter catalogs, and photo share links.

use super::{FilterId, FrameId, JsonObject, PhotoId, QrCodeId, SessionId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A picture taken during a session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Photo {
    /// Photo ID.
    pub id: PhotoId,

    /// Session the photo was taken in.
    pub session_id: SessionId,

    /// Frame composited around the picture, if any.
    pub frame_id: Option<FrameId>,

    /// Filter applied to the picture, if any.
    pub filter_id: Option<FilterId>,

    /// Location of the raw capture.
    pub storage_url: String,

    /// Layout data used to render the final image.
    #[serde(default)]
    pub composition: JsonObject,

    /// Location of the rendered image, once rendered.
    pub rendered_url: Option<String>,

    /// Created timestamp.
    pub created_at: DateTime<Utc>,
}

/// A decorative frame offered by the booths.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Frame {
    /// Frame ID.
    pub id: FrameId,

    /// Display name.
    pub name: String,

    /// Seasonal or campaign theme.
    pub theme: Option<String>,

    /// Location of the frame artwork.
    pub file_url: String,

    /// Offered to customers.
    pub active: bool,

    /// Created timestamp.
    pub created_at: DateTime<Utc>,
}

/// An image effect offered by the booths.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Filter {
    /// Filter ID.
    pub id: FilterId,

    /// Display name.
    pub name: String,

    /// Effect parameters interpreted by the booth renderer.
    #[serde(default)]
    pub effect: JsonObject,

    /// Offered to customers.
    pub active: bool,

    /// Created timestamp.
    pub created_at: DateTime<Utc>,
}

/// Share link for a photo, addressed by its unique hash.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QrCode {
    /// Share link ID.
    pub id: QrCodeId,

    /// Shared photo.
    pub photo_id: PhotoId,

    /// Public lookup key encoded in the QR code.
    pub hash: String,

    /// Link stops resolving after this instant.
    pub expire_at: Option<DateTime<Utc>>,

    /// Created timestamp.
    pub created_at: DateTime<Utc>,
}

impl QrCode {
    /// Whether the link has expired at `now`.
    #[must_use]
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expire_at.is_some_and(|expire_at| now >= expire_at)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn test_qr_code_expiry() {
        let now = Utc::now();
        let mut code = QrCode {
            id: QrCodeId::new(),
            photo_id: PhotoId::new(),
            hash: "abc123".into(),
            expire_at: None,
            created_at: now,
        };
        assert!(!code.is_expired(now));

        code.expire_at = Some(now + Duration::minutes(5));
        assert!(!code.is_expired(now));
        assert!(code.is_expired(now + Duration::minutes(5)));
    }
}
