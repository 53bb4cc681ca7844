//! Event write paths.
//!
//! Every successful write publishes one invalidation so the event collection
//! and all views derived from it are refetched on the next read.

use std::sync::Arc;

use chrono::Utc;
use runhub_core::api::EventsApi;
use runhub_core::event::{
    transform_backend_event, validate_new_event, validate_patch, EventId, EventPatch, NewEvent,
    RunEvent,
};
use runhub_core::storage::ImageUpload;

use crate::cache::InvalidationBus;

use super::error::Result;
use super::images::ImageService;

/// Creates, updates and deletes events.
#[derive(Clone)]
pub struct EventService {
    api: Arc<dyn EventsApi>,
    images: ImageService,
    bus: Arc<InvalidationBus>,
}

impl EventService {
    pub fn new(api: Arc<dyn EventsApi>, images: ImageService, bus: Arc<InvalidationBus>) -> Self {
        Self { api, images, bus }
    }

    /// Creates an event and optionally uploads its cover image.
    ///
    /// A failed upload is logged; the event is still created.
    pub async fn create_event(&self, event: NewEvent, image: Option<ImageUpload>) -> Result<RunEvent> {
        validate_new_event(&event)?;

        // 1. Persist
        let payload = event.into_payload(Utc::now());
        let created = self.api.create_event(&payload).await?;

        // 2. Attach the cover
        if let Some(image) = image {
            if let Err(err) = self.images.upload_event_image(created.id, image).await {
                tracing::warn!(event_id = created.id, error = %err, "Failed to upload event image");
            }
        }

        // 3. Invalidate
        self.bus.invalidate_all().await;

        tracing::info!(event_id = created.id, title = %created.title, "Event created");
        Ok(transform_backend_event(&created))
    }

    pub async fn update_event(&self, id: EventId, patch: EventPatch) -> Result<RunEvent> {
        validate_patch(&patch)?;

        let updated = self.api.update_event(id, &patch.into_backend()).await?;
        self.bus.invalidate_all().await;

        tracing::info!(event_id = id, "Event updated");
        Ok(transform_backend_event(&updated))
    }

    pub async fn delete_event(&self, id: EventId) -> Result<()> {
        self.api.delete_event(id).await?;
        self.bus.invalidate_all().await;

        tracing::info!(event_id = id, "Event deleted");
        Ok(())
    }
}
