//! Photo service and photo share links.
//!
//! Photos always belong to an existing session and may only reference
//! frames and filters that exist. Share links resolve until they expire;
//! an expired link is reported exactly like an unknown one.

use crate::environment::Clock;
use crate::error::{CoreError, Result};
use crate::model::{
    FilterId, FrameId, JsonObject, Photo, PhotoId, QrCode, QrCodeId, SessionId,
};
use crate::providers::{FilterRepository, FrameRepository, PhotoRepository, SessionRepository};
use crate::validation::require_non_empty;
use chrono::{DateTime, Utc};
use serde::Deserialize;
use std::sync::Arc;

/// Input for [`PhotoService::create`].
#[derive(Debug, Clone, Deserialize)]
pub struct CreatePhoto {
    /// Session the photo was taken in.
    pub session_id: SessionId,

    /// Frame composited around the picture.
    #[serde(default)]
    pub frame_id: Option<FrameId>,

    /// Filter applied.
    #[serde(default)]
    pub filter_id: Option<FilterId>,

    /// Location of the raw capture.
    #[serde(default)]
    pub storage_url: String,

    /// Layout data.
    #[serde(default)]
    pub composition: JsonObject,

    /// Location of the rendered image.
    #[serde(default)]
    pub rendered_url: Option<String>,
}

/// Input for [`PhotoService::update`]. Absent fields are left unchanged.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdatePhoto {
    /// New frame.
    #[serde(default)]
    pub frame_id: Option<FrameId>,

    /// New filter.
    #[serde(default)]
    pub filter_id: Option<FilterId>,

    /// New capture location.
    #[serde(default)]
    pub storage_url: Option<String>,

    /// New layout data.
    #[serde(default)]
    pub composition: Option<JsonObject>,

    /// Location of the rendered image.
    #[serde(default)]
    pub rendered_url: Option<String>,
}

/// Input for [`PhotoService::create_qr_code`].
#[derive(Debug, Clone, Deserialize)]
pub struct CreateQrCode {
    /// Shared photo.
    pub photo_id: PhotoId,

    /// Public lookup key.
    #[serde(default)]
    pub hash: String,

    /// Expiry (Unix seconds on the wire).
    #[serde(default, with = "chrono::serde::ts_seconds_option")]
    pub expire_at: Option<DateTime<Utc>>,
}

/// Photo CRUD and share links.
#[derive(Clone)]
pub struct PhotoService {
    photos: Arc<dyn PhotoRepository>,
    frames: Arc<dyn FrameRepository>,
    filters: Arc<dyn FilterRepository>,
    sessions: Arc<dyn SessionRepository>,
    clock: Arc<dyn Clock>,
}

impl PhotoService {
    /// Create the service.
    #[must_use]
    pub fn new(
        photos: Arc<dyn PhotoRepository>,
        frames: Arc<dyn FrameRepository>,
        filters: Arc<dyn FilterRepository>,
        sessions: Arc<dyn SessionRepository>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            photos,
            frames,
            filters,
            sessions,
            clock,
        }
    }

    async fn check_references(
        &self,
        frame_id: Option<FrameId>,
        filter_id: Option<FilterId>,
    ) -> Result<()> {
        if let Some(frame_id) = frame_id {
            self.frames.get(frame_id).await?;
        }
        if let Some(filter_id) = filter_id {
            self.filters.get(filter_id).await?;
        }
        Ok(())
    }

    /// Store a new photo.
    ///
    /// # Errors
    ///
    /// Returns `Validation` for an empty storage URL, `NotFound` if the
    /// session, frame or filter does not exist.
    pub async fn create(&self, input: CreatePhoto) -> Result<Photo> {
        require_non_empty("storage_url", &input.storage_url)?;
        self.sessions.get(input.session_id).await?;
        self.check_references(input.frame_id, input.filter_id).await?;

        let photo = Photo {
            id: PhotoId::new(),
            session_id: input.session_id,
            frame_id: input.frame_id,
            filter_id: input.filter_id,
            storage_url: input.storage_url,
            composition: input.composition,
            rendered_url: input.rendered_url,
            created_at: self.clock.now(),
        };
        self.photos.create(&photo).await?;

        tracing::info!(photo_id = %photo.id, session_id = %photo.session_id, "Photo stored");
        Ok(photo)
    }

    /// Apply a partial update.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` for an unknown photo, frame or filter,
    /// `Validation` for an empty storage URL.
    pub async fn update(&self, id: PhotoId, input: UpdatePhoto) -> Result<Photo> {
        if let Some(storage_url) = &input.storage_url {
            require_non_empty("storage_url", storage_url)?;
        }

        let mut photo = self.photos.get(id).await?;
        self.check_references(input.frame_id, input.filter_id).await?;

        if input.frame_id.is_some() {
            photo.frame_id = input.frame_id;
        }
        if input.filter_id.is_some() {
            photo.filter_id = input.filter_id;
        }
        if let Some(storage_url) = input.storage_url {
            photo.storage_url = storage_url;
        }
        if let Some(composition) = input.composition {
            photo.composition = composition;
        }
        if input.rendered_url.is_some() {
            photo.rendered_url = input.rendered_url;
        }

        self.photos.update(&photo).await?;
        Ok(photo)
    }

    /// Delete a photo and its share links.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` for an unknown id.
    pub async fn delete(&self, id: PhotoId) -> Result<()> {
        self.photos.delete(id).await?;
        tracing::info!(photo_id = %id, "Photo deleted");
        Ok(())
    }

    /// Fetch a photo.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` for an unknown id.
    pub async fn get(&self, id: PhotoId) -> Result<Photo> {
        self.photos.get(id).await
    }

    /// List the photos of a session, oldest first.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` for an unknown session.
    pub async fn list_by_session(&self, session_id: SessionId) -> Result<Vec<Photo>> {
        self.sessions.get(session_id).await?;
        self.photos.list_by_session(session_id).await
    }

    /// Create a share link for a photo.
    ///
    /// # Errors
    ///
    /// - `Validation` for an empty hash or an expiry in the past
    /// - `NotFound` if the photo does not exist
    /// - `Conflict` if the hash is taken
    pub async fn create_qr_code(&self, input: CreateQrCode) -> Result<QrCode> {
        require_non_empty("hash", &input.hash)?;
        let now = self.clock.now();
        if input.expire_at.is_some_and(|expire_at| expire_at <= now) {
            return Err(CoreError::Validation("expire_at must be in the future".to_string()));
        }
        self.photos.get(input.photo_id).await?;

        let code = QrCode {
            id: QrCodeId::new(),
            photo_id: input.photo_id,
            hash: input.hash,
            expire_at: input.expire_at,
            created_at: now,
        };
        self.photos.create_qr_code(&code).await?;

        tracing::info!(qr_code_id = %code.id, photo_id = %code.photo_id, "Share link created");
        Ok(code)
    }

    /// Resolve a share link by hash.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` for an unknown or expired hash.
    pub async fn resolve_qr_code(&self, hash: &str) -> Result<QrCode> {
        let code = self.photos.get_qr_code(hash).await?;
        if code.is_expired(self.clock.now()) {
            tracing::debug!(qr_code_id = %code.id, "Expired share link requested");
            return Err(CoreError::not_found("qr code", hash));
        }
        Ok(code)
    }

    /// Delete a share link.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` for an unknown id.
    pub async fn delete_qr_code(&self, id: QrCodeId) -> Result<()> {
        self.photos.delete_qr_code(id).await
    }
}
