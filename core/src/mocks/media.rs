//! In-memory photo, frame and filter stores.

use super::lock;
use crate::error::{CoreError, Result};
use crate::model::{Filter, FilterId, Frame, FrameId, Photo, PhotoId, QrCode, QrCodeId, SessionId};
use crate::providers::{FilterRepository, FrameRepository, PhotoRepository};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

#[derive(Debug, Default)]
struct Gallery {
    photos: HashMap<PhotoId, Photo>,
    qr_codes: HashMap<QrCodeId, QrCode>,
}

/// In-memory [`PhotoRepository`].
#[derive(Debug, Clone, Default)]
pub struct InMemoryPhotoRepository {
    inner: Arc<Mutex<Gallery>>,
}

impl InMemoryPhotoRepository {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl PhotoRepository for InMemoryPhotoRepository {
    async fn create(&self, photo: &Photo) -> Result<()> {
        let mut inner = lock(&self.inner, "photo")?;
        if inner.photos.contains_key(&photo.id) {
            return Err(CoreError::Conflict(format!("photo {} already exists", photo.id)));
        }
        inner.photos.insert(photo.id, photo.clone());
        Ok(())
    }

    async fn update(&self, photo: &Photo) -> Result<()> {
        let mut inner = lock(&self.inner, "photo")?;
        let stored = inner
            .photos
            .get_mut(&photo.id)
            .ok_or_else(|| CoreError::not_found("photo", photo.id))?;
        stored.frame_id = photo.frame_id;
        stored.filter_id = photo.filter_id;
        stored.storage_url.clone_from(&photo.storage_url);
        stored.composition.clone_from(&photo.composition);
        stored.rendered_url.clone_from(&photo.rendered_url);
        Ok(())
    }

    async fn delete(&self, id: PhotoId) -> Result<()> {
        let mut inner = lock(&self.inner, "photo")?;
        inner
            .photos
            .remove(&id)
            .ok_or_else(|| CoreError::not_found("photo", id))?;
        inner.qr_codes.retain(|_, code| code.photo_id != id);
        Ok(())
    }

    async fn get(&self, id: PhotoId) -> Result<Photo> {
        lock(&self.inner, "photo")?
            .photos
            .get(&id)
            .cloned()
            .ok_or_else(|| CoreError::not_found("photo", id))
    }

    async fn list_by_session(&self, session_id: SessionId) -> Result<Vec<Photo>> {
        let mut photos: Vec<Photo> = lock(&self.inner, "photo")?
            .photos
            .values()
            .filter(|p| p.session_id == session_id)
            .cloned()
            .collect();
        photos.sort_by_key(|p| (p.created_at, p.id));
        Ok(photos)
    }

    async fn count_with_frame(&self, frame_id: FrameId) -> Result<usize> {
        Ok(lock(&self.inner, "photo")?
            .photos
            .values()
            .filter(|p| p.frame_id == Some(frame_id))
            .count())
    }

    async fn count_with_filter(&self, filter_id: FilterId) -> Result<usize> {
        Ok(lock(&self.inner, "photo")?
            .photos
            .values()
            .filter(|p| p.filter_id == Some(filter_id))
            .count())
    }

    async fn create_qr_code(&self, code: &QrCode) -> Result<()> {
        let mut inner = lock(&self.inner, "photo")?;
        if !inner.photos.contains_key(&code.photo_id) {
            return Err(CoreError::not_found("photo", code.photo_id));
        }
        if inner.qr_codes.values().any(|c| c.hash == code.hash) {
            return Err(CoreError::Conflict(format!("qr code {} already exists", code.hash)));
        }
        inner.qr_codes.insert(code.id, code.clone());
        Ok(())
    }

    async fn get_qr_code(&self, hash: &str) -> Result<QrCode> {
        lock(&self.inner, "photo")?
            .qr_codes
            .values()
            .find(|c| c.hash == hash)
            .cloned()
            .ok_or_else(|| CoreError::not_found("qr code", hash))
    }

    async fn delete_qr_code(&self, id: QrCodeId) -> Result<()> {
        lock(&self.inner, "photo")?
            .qr_codes
            .remove(&id)
            .map(|_| ())
            .ok_or_else(|| CoreError::not_found("qr code", id))
    }
}

/// In-memory [`FrameRepository`].
#[derive(Debug, Clone, Default)]
pub struct InMemoryFrameRepository {
    frames: Arc<Mutex<HashMap<FrameId, Frame>>>,
}

impl InMemoryFrameRepository {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl FrameRepository for InMemoryFrameRepository {
    async fn create(&self, frame: &Frame) -> Result<()> {
        let mut frames = lock(&self.frames, "frame")?;
        if frames.contains_key(&frame.id) {
            return Err(CoreError::Conflict(format!("frame {} already exists", frame.id)));
        }
        frames.insert(frame.id, frame.clone());
        Ok(())
    }

    async fn update(&self, frame: &Frame) -> Result<()> {
        let mut frames = lock(&self.frames, "frame")?;
        let stored = frames
            .get_mut(&frame.id)
            .ok_or_else(|| CoreError::not_found("frame", frame.id))?;
        *stored = Frame {
            created_at: stored.created_at,
            ..frame.clone()
        };
        Ok(())
    }

    async fn delete(&self, id: FrameId) -> Result<()> {
        lock(&self.frames, "frame")?
            .remove(&id)
            .map(|_| ())
            .ok_or_else(|| CoreError::not_found("frame", id))
    }

    async fn get(&self, id: FrameId) -> Result<Frame> {
        lock(&self.frames, "frame")?
            .get(&id)
            .cloned()
            .ok_or_else(|| CoreError::not_found("frame", id))
    }

    async fn list(&self, active_only: bool) -> Result<Vec<Frame>> {
        let mut frames: Vec<Frame> = lock(&self.frames, "frame")?
            .values()
            .filter(|f| !active_only || f.active)
            .cloned()
            .collect();
        frames.sort_by_key(|f| (f.created_at, f.id));
        Ok(frames)
    }
}

/// In-memory [`FilterRepository`].
#[derive(Debug, Clone, Default)]
pub struct InMemoryFilterRepository {
    filters: Arc<Mutex<HashMap<FilterId, Filter>>>,
}

impl InMemoryFilterRepository {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl FilterRepository for InMemoryFilterRepository {
    async fn create(&self, filter: &Filter) -> Result<()> {
        let mut filters = lock(&self.filters, "filter")?;
        if filters.contains_key(&filter.id) {
            return Err(CoreError::Conflict(format!("filter {} already exists", filter.id)));
        }
        filters.insert(filter.id, filter.clone());
        Ok(())
    }

    async fn update(&self, filter: &Filter) -> Result<()> {
        let mut filters = lock(&self.filters, "filter")?;
        let stored = filters
            .get_mut(&filter.id)
            .ok_or_else(|| CoreError::not_found("filter", filter.id))?;
        *stored = Filter {
            created_at: stored.created_at,
            ..filter.clone()
        };
        Ok(())
    }

    async fn delete(&self, id: FilterId) -> Result<()> {
        lock(&self.filters, "filter")?
            .remove(&id)
            .map(|_| ())
            .ok_or_else(|| CoreError::not_found("filter", id))
    }

    async fn get(&self, id: FilterId) -> Result<Filter> {
        lock(&self.filters, "filter")?
            .get(&id)
            .cloned()
            .ok_or_else(|| CoreError::not_found("filter", id))
    }

    async fn list(&self, active_only: bool) -> Result<Vec<Filter>> {
        let mut filters: Vec<Filter> = lock(&self.filters, "filter")?
            .values()
            .filter(|f| !active_only || f.active)
            .cloned()
            .collect();
        filters.sort_by_key(|f| (f.created_at, f.id));
        Ok(filters)
    }
}
