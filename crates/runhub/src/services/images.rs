//! Event cover and profile picture storage.

use std::sync::Arc;

use runhub_core::api::{ApiResult, ObjectStore};
use runhub_core::event::{EventId, UserId};
use runhub_core::storage::{
    file_extension, find_in_listing, ImageKind, ImageUpload, FALLBACK_EVENT_IMAGE_URL,
    IMAGE_EXTENSIONS,
};

/// Uploads and locates images in object storage.
#[derive(Clone)]
pub struct ImageService {
    store: Arc<dyn ObjectStore>,
}

impl ImageService {
    pub fn new(store: Arc<dyn ObjectStore>) -> Self {
        Self { store }
    }

    /// Uploads an event cover, replacing any previous one with the same
    /// extension. Returns the public URL.
    pub async fn upload_event_image(&self, event_id: EventId, image: ImageUpload) -> ApiResult<String> {
        self.upload(ImageKind::Event, event_id, image).await
    }

    /// Uploads a profile picture. Returns the public URL.
    pub async fn upload_profile_image(&self, user_id: UserId, image: ImageUpload) -> ApiResult<String> {
        self.upload(ImageKind::Profile, user_id, image).await
    }

    /// Tries every known extension and returns the URL of the first image found.
    pub async fn find_image_url(&self, kind: ImageKind, owner_id: u64) -> ApiResult<Option<String>> {
        for extension in IMAGE_EXTENSIONS {
            let file_name = kind.file_name(owner_id, extension);
            let listing = self
                .store
                .list(kind.bucket(), kind.folder(), Some(&file_name))
                .await?;
            if find_in_listing(&listing, &file_name) {
                let path = kind.object_path(owner_id, extension);
                return Ok(Some(self.store.public_url(kind.bucket(), &path)));
            }
        }
        Ok(None)
    }

    /// Returns the event's cover URL, or the fallback image when none exists
    /// or storage is unreachable.
    pub async fn event_image_url(&self, event_id: EventId) -> String {
        match self.find_image_url(ImageKind::Event, event_id).await {
            Ok(Some(url)) => url,
            Ok(None) => FALLBACK_EVENT_IMAGE_URL.to_string(),
            Err(err) => {
                tracing::warn!(event_id, error = %err, "Failed to look up event image");
                FALLBACK_EVENT_IMAGE_URL.to_string()
            }
        }
    }

    async fn upload(&self, kind: ImageKind, owner_id: u64, image: ImageUpload) -> ApiResult<String> {
        let extension = file_extension(&image.file_name);
        let path = kind.object_path(owner_id, &extension);
        let stored = self
            .store
            .upload(kind.bucket(), &path, image.bytes, &image.content_type)
            .await?;
        tracing::debug!(bucket = kind.bucket(), path = %stored, "Image uploaded");
        Ok(self.store.public_url(kind.bucket(), &stored))
    }
}
