use async_trait::async_trait;

use crate::event::{BackendEvent, BackendEventPatch, BackendEventPayload, EventId, UserId};
use crate::geo::GeocodeMatch;
use crate::post::{BackendPost, BackendPostImage, NewPost, NewPostImage, PostId, PostImageId, PostPatch};
use crate::registration::{BackendRegistration, RegistrationId};
use crate::storage::ObjectInfo;

use super::ApiResult;

/// Port for the backend's event endpoints.
#[async_trait]
pub trait EventsApi: Send + Sync {
    /// Lists every event.
    async fn list_events(&self) -> ApiResult<Vec<BackendEvent>>;

    /// Gets a single event by its ID.
    async fn get_event(&self, id: EventId) -> ApiResult<BackendEvent>;

    /// Creates a new event and returns the stored record.
    async fn create_event(&self, payload: &BackendEventPayload) -> ApiResult<BackendEvent>;

    /// Applies a partial update to an event.
    async fn update_event(&self, id: EventId, patch: &BackendEventPatch) -> ApiResult<BackendEvent>;

    /// Deletes an event by its ID.
    async fn delete_event(&self, id: EventId) -> ApiResult<()>;
}

/// Port for the backend's registration endpoints.
#[async_trait]
pub trait RegistrationsApi: Send + Sync {
    /// Lists every registration. The backend offers no server-side filter.
    async fn list_registrations(&self) -> ApiResult<Vec<BackendRegistration>>;

    /// Registers a runner for an event.
    async fn create_registration(
        &self,
        event_id: EventId,
        runner_id: UserId,
    ) -> ApiResult<BackendRegistration>;

    /// Cancels a registration.
    async fn delete_registration(&self, id: RegistrationId) -> ApiResult<()>;
}

/// Port for the backend's business post and post image endpoints.
#[async_trait]
pub trait BusinessPostsApi: Send + Sync {
    /// Lists every post. The backend offers no server-side filter.
    async fn list_posts(&self) -> ApiResult<Vec<BackendPost>>;

    async fn create_post(&self, post: &NewPost) -> ApiResult<BackendPost>;

    async fn update_post(&self, id: PostId, patch: &PostPatch) -> ApiResult<BackendPost>;

    async fn delete_post(&self, id: PostId) -> ApiResult<()>;

    /// Lists every post image.
    async fn list_post_images(&self) -> ApiResult<Vec<BackendPostImage>>;

    /// Stores an image for a post and returns the image record.
    async fn create_post_image(&self, image: &NewPostImage) -> ApiResult<BackendPostImage>;

    async fn delete_post_image(&self, id: PostImageId) -> ApiResult<()>;
}

/// Port for the address geocoding service.
#[async_trait]
pub trait GeocodingApi: Send + Sync {
    /// Looks up an address and returns at most one candidate.
    async fn search(&self, address: &str) -> ApiResult<Vec<GeocodeMatch>>;
}

/// Port for the object storage service holding event and profile images.
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Uploads (or overwrites) an object and returns its stored path.
    async fn upload(
        &self,
        bucket: &str,
        path: &str,
        bytes: Vec<u8>,
        content_type: &str,
    ) -> ApiResult<String>;

    /// Lists objects under `prefix`, optionally narrowed by a name search.
    async fn list(
        &self,
        bucket: &str,
        prefix: &str,
        search: Option<&str>,
    ) -> ApiResult<Vec<ObjectInfo>>;

    /// Returns the public URL of an object. No request is made.
    fn public_url(&self, bucket: &str, path: &str) -> String;
}
