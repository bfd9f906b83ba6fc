//! Frame and filter catalogs.
//!
//! A frame or filter that any photo still uses cannot be deleted; deactivate
//! it instead.

use crate::environment::Clock;
use crate::error::{CoreError, Result};
use crate::model::{Filter, FilterId, Frame, FrameId, JsonObject};
use crate::providers::{FilterRepository, FrameRepository, PhotoRepository};
use crate::validation::require_non_empty;
use serde::Deserialize;
use std::sync::Arc;

/// Input for [`FrameService::create`].
#[derive(Debug, Clone, Deserialize)]
pub struct CreateFrame {
    /// Display name.
    #[serde(default)]
    pub name: String,

    /// Theme.
    #[serde(default)]
    pub theme: Option<String>,

    /// Location of the artwork.
    #[serde(default)]
    pub file_url: String,

    /// Offered to customers, `true` when omitted.
    #[serde(default)]
    pub active: Option<bool>,
}

/// Input for [`FrameService::update`]. Every field is replaced.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateFrame {
    /// Display name.
    #[serde(default)]
    pub name: String,

    /// Theme; `None` clears it.
    #[serde(default)]
    pub theme: Option<String>,

    /// Location of the artwork.
    #[serde(default)]
    pub file_url: String,

    /// Offered to customers.
    #[serde(default)]
    pub active: bool,
}

/// Input for [`FilterService::create`].
#[derive(Debug, Clone, Deserialize)]
pub struct CreateFilter {
    /// Display name.
    #[serde(default)]
    pub name: String,

    /// Effect parameters.
    #[serde(default)]
    pub effect: JsonObject,

    /// Offered to customers, `true` when omitted.
    #[serde(default)]
    pub active: Option<bool>,
}

/// Input for [`FilterService::update`]. Every field is replaced.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateFilter {
    /// Display name.
    #[serde(default)]
    pub name: String,

    /// Effect parameters.
    #[serde(default)]
    pub effect: JsonObject,

    /// Offered to customers.
    #[serde(default)]
    pub active: bool,
}

/// Frame CRUD.
#[derive(Clone)]
pub struct FrameService {
    frames: Arc<dyn FrameRepository>,
    photos: Arc<dyn PhotoRepository>,
    clock: Arc<dyn Clock>,
}

impl FrameService {
    /// Create the service.
    #[must_use]
    pub fn new(
        frames: Arc<dyn FrameRepository>,
        photos: Arc<dyn PhotoRepository>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            frames,
            photos,
            clock,
        }
    }

    /// Add a frame to the catalog.
    ///
    /// # Errors
    ///
    /// Returns `Validation` for an empty name or file URL.
    pub async fn create(&self, input: CreateFrame) -> Result<Frame> {
        require_non_empty("name", &input.name)?;
        require_non_empty("file_url", &input.file_url)?;

        let frame = Frame {
            id: FrameId::new(),
            name: input.name,
            theme: input.theme,
            file_url: input.file_url,
            active: input.active.unwrap_or(true),
            created_at: self.clock.now(),
        };
        self.frames.create(&frame).await?;

        tracing::info!(frame_id = %frame.id, "Frame created");
        Ok(frame)
    }

    /// Replace a frame's fields.
    ///
    /// # Errors
    ///
    /// Returns `Validation` for an empty name or file URL, `NotFound` for an
    /// unknown id.
    pub async fn update(&self, id: FrameId, input: UpdateFrame) -> Result<Frame> {
        require_non_empty("name", &input.name)?;
        require_non_empty("file_url", &input.file_url)?;

        let mut frame = self.frames.get(id).await?;
        frame.name = input.name;
        frame.theme = input.theme;
        frame.file_url = input.file_url;
        frame.active = input.active;
        self.frames.update(&frame).await?;
        Ok(frame)
    }

    /// Delete a frame no photo uses.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` for an unknown id, `Conflict` while photos use it.
    pub async fn delete(&self, id: FrameId) -> Result<()> {
        self.frames.get(id).await?;
        let used_by = self.photos.count_with_frame(id).await?;
        if used_by > 0 {
            return Err(CoreError::Conflict(format!(
                "frame {id} is used by {used_by} photo(s)"
            )));
        }
        self.frames.delete(id).await?;
        tracing::info!(frame_id = %id, "Frame deleted");
        Ok(())
    }

    /// Fetch a frame.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` for an unknown id.
    pub async fn get(&self, id: FrameId) -> Result<Frame> {
        self.frames.get(id).await
    }

    /// List frames.
    ///
    /// # Errors
    ///
    /// Returns a store error.
    pub async fn list(&self, active_only: bool) -> Result<Vec<Frame>> {
        self.frames.list(active_only).await
    }
}

/// Filter CRUD.
#[derive(Clone)]
pub struct FilterService {
    filters: Arc<dyn FilterRepository>,
    photos: Arc<dyn PhotoRepository>,
    clock: Arc<dyn Clock>,
}

impl FilterService {
    /// Create the service.
    #[must_use]
    pub fn new(
        filters: Arc<dyn FilterRepository>,
        photos: Arc<dyn PhotoRepository>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            filters,
            photos,
            clock,
        }
    }

    /// Add a filter to the catalog.
    ///
    /// # Errors
    ///
    /// Returns `Validation` for an empty name.
    pub async fn create(&self, input: CreateFilter) -> Result<Filter> {
        require_non_empty("name", &input.name)?;

        let filter = Filter {
            id: FilterId::new(),
            name: input.name,
            effect: input.effect,
            active: input.active.unwrap_or(true),
            created_at: self.clock.now(),
        };
        self.filters.create(&filter).await?;

        tracing::info!(filter_id = %filter.id, "Filter created");
        Ok(filter)
    }

    /// Replace a filter's fields.
    ///
    /// # Errors
    ///
    /// Returns `Validation` for an empty name, `NotFound` for an unknown id.
    pub async fn update(&self, id: FilterId, input: UpdateFilter) -> Result<Filter> {
        require_non_empty("name", &input.name)?;

        let mut filter = self.filters.get(id).await?;
        filter.name = input.name;
        filter.effect = input.effect;
        filter.active = input.active;
        self.filters.update(&filter).await?;
        Ok(filter)
    }

    /// Delete a filter no photo uses.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` for an unknown id, `Conflict` while photos use it.
    pub async fn delete(&self, id: FilterId) -> Result<()> {
        self.filters.get(id).await?;
        let used_by = self.photos.count_with_filter(id).await?;
        if used_by > 0 {
            return Err(CoreError::Conflict(format!(
                "filter {id} is used by {used_by} photo(s)"
            )));
        }
        self.filters.delete(id).await?;
        tracing::info!(filter_id = %id, "Filter deleted");
        Ok(())
    }

    /// Fetch a filter.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` for an unknown id.
    pub async fn get(&self, id: FilterId) -> Result<Filter> {
        self.filters.get(id).await
    }

    /// List filters.
    ///
    /// # Errors
    ///
    /// Returns a store error.
    pub async fn list(&self, active_only: bool) -> Result<Vec<Filter>> {
        self.filters.list(active_only).await
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::environment::SystemClock;
    use crate::mocks::{InMemoryFilterRepository, InMemoryFrameRepository, InMemoryPhotoRepository};
    use crate::model::{Photo, PhotoId, SessionId};
    use chrono::Utc;

    fn frame_input(name: &str) -> CreateFrame {
        CreateFrame {
            name: name.into(),
            theme: Some("valentine".into()),
            file_url: format!("s3://frames/{name}.png"),
            active: None,
        }
    }

    fn photo_with(frame_id: Option<FrameId>, filter_id: Option<FilterId>) -> Photo {
        Photo {
            id: PhotoId::new(),
            session_id: SessionId::new(),
            frame_id,
            filter_id,
            storage_url: "s3://captures/1.jpg".into(),
            composition: JsonObject::new(),
            rendered_url: None,
            created_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_frame_lifecycle() {
        let service = FrameService::new(
            Arc::new(InMemoryFrameRepository::new()),
            Arc::new(InMemoryPhotoRepository::new()),
            Arc::new(SystemClock),
        );
        let hearts = service.create(frame_input("hearts")).await.unwrap();
        assert!(hearts.active);
        service.create(frame_input("stars")).await.unwrap();

        let retired = service
            .update(
                hearts.id,
                UpdateFrame {
                    name: "Hearts".into(),
                    theme: None,
                    file_url: hearts.file_url.clone(),
                    active: false,
                },
            )
            .await
            .unwrap();
        assert_eq!(retired.theme, None);
        assert_eq!(retired.created_at, hearts.created_at);

        assert_eq!(service.list(false).await.unwrap().len(), 2);
        assert_eq!(service.list(true).await.unwrap().len(), 1);

        service.delete(hearts.id).await.unwrap();
        assert!(matches!(
            service.get(hearts.id).await,
            Err(CoreError::NotFound { resource: "frame", .. })
        ));
    }

    #[tokio::test]
    async fn test_frame_requires_file_url() {
        let service = FrameService::new(
            Arc::new(InMemoryFrameRepository::new()),
            Arc::new(InMemoryPhotoRepository::new()),
            Arc::new(SystemClock),
        );
        let mut input = frame_input("hearts");
        input.file_url = String::new();
        assert!(matches!(service.create(input).await, Err(CoreError::Validation(_))));
    }

    #[tokio::test]
    async fn test_frame_in_use_cannot_be_deleted() {
        let photos = Arc::new(InMemoryPhotoRepository::new());
        let service = FrameService::new(
            Arc::new(InMemoryFrameRepository::new()),
            photos.clone(),
            Arc::new(SystemClock),
        );
        let frame = service.create(frame_input("hearts")).await.unwrap();
        photos.create(&photo_with(Some(frame.id), None)).await.unwrap();

        assert!(matches!(service.delete(frame.id).await, Err(CoreError::Conflict(_))));
        assert!(service.get(frame.id).await.is_ok());
    }

    #[tokio::test]
    async fn test_filter_in_use_cannot_be_deleted() {
        let photos = Arc::new(InMemoryPhotoRepository::new());
        let service = FilterService::new(
            Arc::new(InMemoryFilterRepository::new()),
            photos.clone(),
            Arc::new(SystemClock),
        );
        let sepia = service
            .create(serde_json::from_str(r#"{"name":"Sepia","effect":{"tone":0.8}}"#).unwrap())
            .await
            .unwrap();
        assert!(sepia.active);
        assert_eq!(sepia.effect["tone"], 0.8);

        let photo = photo_with(None, Some(sepia.id));
        photos.create(&photo).await.unwrap();
        assert!(matches!(service.delete(sepia.id).await, Err(CoreError::Conflict(_))));

        photos.delete(photo.id).await.unwrap();
        service.delete(sepia.id).await.unwrap();
        assert!(service.list(false).await.unwrap().is_empty());
    }
}
