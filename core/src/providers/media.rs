//! Photo, frame and filter store traits.

use crate::error::Result;
use crate::model::{Filter, FilterId, Frame, FrameId, Photo, PhotoId, QrCode, QrCodeId, SessionId};
use async_trait::async_trait;

/// Photo persistence, including the share links of each photo.
///
/// Share links live with their photo: deleting a photo deletes its links.
#[async_trait]
pub trait PhotoRepository: Send + Sync {
    /// Insert a new photo.
    ///
    /// # Errors
    ///
    /// Returns error if the write fails.
    async fn create(&self, photo: &Photo) -> Result<()>;

    /// Overwrite frame, filter, storage URL, composition and rendered URL.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the photo does not exist.
    async fn update(&self, photo: &Photo) -> Result<()>;

    /// Delete a photo and its share links.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the photo does not exist.
    async fn delete(&self, id: PhotoId) -> Result<()>;

    /// Fetch a photo.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the photo does not exist.
    async fn get(&self, id: PhotoId) -> Result<Photo>;

    /// List the photos of a session, oldest first.
    ///
    /// # Errors
    ///
    /// Returns error if the read fails.
    async fn list_by_session(&self, session_id: SessionId) -> Result<Vec<Photo>>;

    /// Number of photos using a frame.
    ///
    /// # Errors
    ///
    /// Returns error if the read fails.
    async fn count_with_frame(&self, frame_id: FrameId) -> Result<usize>;

    /// Number of photos using a filter.
    ///
    /// # Errors
    ///
    /// Returns error if the read fails.
    async fn count_with_filter(&self, filter_id: FilterId) -> Result<usize>;

    /// Insert a share link.
    ///
    /// # Errors
    ///
    /// Returns `Conflict` if the hash is already taken.
    async fn create_qr_code(&self, code: &QrCode) -> Result<()>;

    /// Fetch a share link by its hash.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if no link has this hash.
    async fn get_qr_code(&self, hash: &str) -> Result<QrCode>;

    /// Delete a share link.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the link does not exist.
    async fn delete_qr_code(&self, id: QrCodeId) -> Result<()>;
}

/// Frame catalog persistence.
#[async_trait]
pub trait FrameRepository: Send + Sync {
    /// Insert a new frame.
    ///
    /// # Errors
    ///
    /// Returns error if the write fails.
    async fn create(&self, frame: &Frame) -> Result<()>;

    /// Overwrite name, theme, file URL and active flag.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the frame does not exist.
    async fn update(&self, frame: &Frame) -> Result<()>;

    /// Delete a frame.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the frame does not exist.
    async fn delete(&self, id: FrameId) -> Result<()>;

    /// Fetch a frame.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the frame does not exist.
    async fn get(&self, id: FrameId) -> Result<Frame>;

    /// List frames, optionally only active ones.
    ///
    /// # Errors
    ///
    /// Returns error if the read fails.
    async fn list(&self, active_only: bool) -> Result<Vec<Frame>>;
}

/// Filter catalog persistence.
#[async_trait]
pub trait FilterRepository: Send + Sync {
    /// Insert a new filter.
    ///
    /// # Errors
    ///
    /// Returns error if the write fails.
    async fn create(&self, filter: &Filter) -> Result<()>;

    /// Overwrite name, effect and active flag.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the filter does not exist.
    async fn update(&self, filter: &Filter) -> Result<()>;

    /// Delete a filter.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the filter does not exist.
    async fn delete(&self, id: FilterId) -> Result<()>;

    /// Fetch a filter.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the filter does not exist.
    async fn get(&self, id: FilterId) -> Result<Filter>;

    /// List filters, optionally only active ones.
    ///
    /// # Errors
    ///
    /// Returns error if the read fails.
    async fn list(&self, active_only: bool) -> Result<Vec<Filter>>;
}
