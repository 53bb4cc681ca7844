//! In-memory backend for the demo mode and tests.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::{Mutex, RwLock, RwLockReadGuard, RwLockWriteGuard};
use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;

use runhub_core::api::{ApiError, ApiResult, BusinessPostsApi, EventsApi, RegistrationsApi};
use runhub_core::event::{BackendEvent, BackendEventPatch, BackendEventPayload, EventId, UserId};
use runhub_core::post::{
    BackendImageFile, BackendPost, BackendPostImage, NewPost, NewPostImage, PostId, PostImageId,
    PostPatch,
};
use runhub_core::registration::{BackendRegistration, RegistrationId, RegistrationUser};

/// In-memory stand-in for the backend's event, registration and business
/// post endpoints.
///
/// Counts requests and can inject latency or a failure to exercise the
/// caches. Listings are read when a request arrives and delivered after the
/// configured latency.
#[derive(Debug, Default)]
pub struct InMemoryBackend {
    events: RwLock<BTreeMap<EventId, BackendEvent>>,
    registrations: RwLock<BTreeMap<RegistrationId, BackendRegistration>>,
    posts: RwLock<BTreeMap<PostId, BackendPost>>,
    post_images: RwLock<BTreeMap<PostImageId, BackendPostImage>>,
    next_event_id: AtomicU64,
    next_registration_id: AtomicU64,
    next_post_id: AtomicU64,
    next_post_image_id: AtomicU64,
    list_calls: AtomicUsize,
    get_calls: AtomicUsize,
    write_calls: AtomicUsize,
    registration_list_calls: AtomicUsize,
    failure: Mutex<Option<ApiError>>,
    latency: Mutex<Duration>,
}

impl InMemoryBackend {
    /// Creates a new empty backend.
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores records as-is. Later inserts get IDs past the highest seeded one.
    pub fn seed_events(&self, events: Vec<BackendEvent>) {
        let mut store = self.events_mut();
        for event in events {
            self.next_event_id.fetch_max(event.id, Ordering::SeqCst);
            store.insert(event.id, event);
        }
    }

    /// Inserts an event directly, bypassing request accounting.
    pub fn insert_event(&self, payload: BackendEventPayload) -> BackendEvent {
        let event = self.build_event(payload);
        self.events_mut().insert(event.id, event.clone());
        event
    }

    /// Removes every event, so listings come back empty.
    pub fn clear_events(&self) {
        self.events_mut().clear();
    }

    pub fn seed_registration(&self, event_id: EventId, runner_id: UserId, name: Option<&str>) -> BackendRegistration {
        let registration = BackendRegistration {
            id: self.next_registration_id.fetch_add(1, Ordering::SeqCst) + 1,
            created_at: Utc::now().timestamp_millis(),
            runner_id,
            events_id: event_id,
            user: name.map(|name| RegistrationUser {
                name: Some(name.to_string()),
                email: Some(format!("{}@example.com", name.to_lowercase())),
            }),
        };
        self.registrations_mut()
            .insert(registration.id, registration.clone());
        registration
    }

    pub fn seed_post(&self, business_id: UserId, title: &str, content: &str) -> BackendPost {
        let post = BackendPost {
            id: self.next_post_id.fetch_add(1, Ordering::SeqCst) + 1,
            created_at: Utc::now().timestamp_millis(),
            business_id,
            title: title.to_string(),
            content: content.to_string(),
            business_name: None,
        };
        self.posts_mut().insert(post.id, post.clone());
        post
    }

    pub fn seed_post_image(&self, post_id: PostId, name: &str) -> BackendPostImage {
        self.store_post_image(post_id, name, "image/jpeg")
    }

    /// Number of stored post images.
    pub fn post_image_count(&self) -> usize {
        self.post_images().len()
    }

    /// Makes every following request fail with `error`, or succeed again with `None`.
    pub fn fail_with(&self, error: Option<ApiError>) {
        *self.failure.lock().unwrap_or_else(|p| p.into_inner()) = error;
    }

    /// Delays every following response.
    pub fn set_latency(&self, latency: Duration) {
        *self.latency.lock().unwrap_or_else(|p| p.into_inner()) = latency;
    }

    /// Number of `GET /events` requests received.
    pub fn list_calls(&self) -> usize {
        self.list_calls.load(Ordering::SeqCst)
    }

    /// Number of `GET /events/{id}` requests received.
    pub fn get_calls(&self) -> usize {
        self.get_calls.load(Ordering::SeqCst)
    }

    /// Number of event and registration writes received.
    pub fn write_calls(&self) -> usize {
        self.write_calls.load(Ordering::SeqCst)
    }

    /// Number of `GET /registrations` requests received.
    pub fn registration_list_calls(&self) -> usize {
        self.registration_list_calls.load(Ordering::SeqCst)
    }

    fn events(&self) -> RwLockReadGuard<'_, BTreeMap<EventId, BackendEvent>> {
        self.events.read().unwrap_or_else(|p| p.into_inner())
    }

    fn events_mut(&self) -> RwLockWriteGuard<'_, BTreeMap<EventId, BackendEvent>> {
        self.events.write().unwrap_or_else(|p| p.into_inner())
    }

    fn registrations(&self) -> RwLockReadGuard<'_, BTreeMap<RegistrationId, BackendRegistration>> {
        self.registrations.read().unwrap_or_else(|p| p.into_inner())
    }

    fn registrations_mut(
        &self,
    ) -> RwLockWriteGuard<'_, BTreeMap<RegistrationId, BackendRegistration>> {
        self.registrations.write().unwrap_or_else(|p| p.into_inner())
    }

    fn posts(&self) -> RwLockReadGuard<'_, BTreeMap<PostId, BackendPost>> {
        self.posts.read().unwrap_or_else(|p| p.into_inner())
    }

    fn posts_mut(&self) -> RwLockWriteGuard<'_, BTreeMap<PostId, BackendPost>> {
        self.posts.write().unwrap_or_else(|p| p.into_inner())
    }

    fn post_images(&self) -> RwLockReadGuard<'_, BTreeMap<PostImageId, BackendPostImage>> {
        self.post_images.read().unwrap_or_else(|p| p.into_inner())
    }

    fn post_images_mut(&self) -> RwLockWriteGuard<'_, BTreeMap<PostImageId, BackendPostImage>> {
        self.post_images.write().unwrap_or_else(|p| p.into_inner())
    }

    fn store_post_image(&self, post_id: PostId, name: &str, mime: &str) -> BackendPostImage {
        let id = self.next_post_image_id.fetch_add(1, Ordering::SeqCst) + 1;
        let image = BackendPostImage {
            id,
            created_at: Utc::now().timestamp_millis(),
            business_posts_id: post_id,
            image: Some(BackendImageFile {
                url: format!("memory://images/{}", id),
                name: name.to_string(),
                mime: mime.to_string(),
            }),
        };
        self.post_images_mut().insert(image.id, image.clone());
        image
    }

    fn build_event(&self, payload: BackendEventPayload) -> BackendEvent {
        BackendEvent {
            id: self.next_event_id.fetch_add(1, Ordering::SeqCst) + 1,
            created_at: Utc::now().timestamp_millis(),
            title: payload.title,
            description: payload.description,
            event_start: payload.event_start,
            pace_seconds_per_km: payload.pace_seconds_per_km,
            distance: payload.distance,
            max_participants: payload.max_participants,
            business_id: payload.business_id,
            business_name: payload.business_name,
            event_location: Some(payload.event_location),
            event_address: payload.event_address,
            business_phone: None,
            whatsapp_group_link: Some(payload.whatsapp_group_link).filter(|s| !s.is_empty()),
        }
    }

    /// Applies the injected failure, if any.
    fn check_failure(&self) -> ApiResult<()> {
        match self.failure.lock().unwrap_or_else(|p| p.into_inner()).clone() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    async fn respond<T>(&self, value: ApiResult<T>) -> ApiResult<T> {
        let latency = *self.latency.lock().unwrap_or_else(|p| p.into_inner());
        if !latency.is_zero() {
            tokio::time::sleep(latency).await;
        }
        value
    }
}

#[async_trait]
impl EventsApi for InMemoryBackend {
    async fn list_events(&self) -> ApiResult<Vec<BackendEvent>> {
        self.list_calls.fetch_add(1, Ordering::SeqCst);
        let result = match self.check_failure() {
            Ok(()) => Ok(self.events().values().cloned().collect()),
            Err(err) => Err(err),
        };
        self.respond(result).await
    }

    async fn get_event(&self, id: EventId) -> ApiResult<BackendEvent> {
        self.get_calls.fetch_add(1, Ordering::SeqCst);
        let result = match self.check_failure() {
            Ok(()) => self
                .events()
                .get(&id)
                .cloned()
                .ok_or_else(|| ApiError::not_found(format!("Event {}", id))),
            Err(err) => Err(err),
        };
        self.respond(result).await
    }

    async fn create_event(&self, payload: &BackendEventPayload) -> ApiResult<BackendEvent> {
        self.write_calls.fetch_add(1, Ordering::SeqCst);
        self.check_failure()?;
        let event = self.build_event(payload.clone());
        self.events_mut().insert(event.id, event.clone());
        self.respond(Ok(event)).await
    }

    async fn update_event(&self, id: EventId, patch: &BackendEventPatch) -> ApiResult<BackendEvent> {
        self.write_calls.fetch_add(1, Ordering::SeqCst);
        self.check_failure()?;
        let updated = {
            let mut events = self.events_mut();
            let event = events
                .get_mut(&id)
                .ok_or_else(|| ApiError::not_found(format!("Event {}", id)))?;
            let patch = patch.clone();
            if let Some(title) = patch.title {
                event.title = title;
            }
            if let Some(description) = patch.description {
                event.description = description;
            }
            if let Some(start) = patch.event_start {
                event.event_start = start;
            }
            if let Some(pace) = patch.pace_seconds_per_km {
                event.pace_seconds_per_km = pace;
            }
            if let Some(distance) = patch.distance {
                event.distance = distance;
            }
            if let Some(max) = patch.max_participants {
                event.max_participants = Some(max);
            }
            if let Some(location) = patch.event_location {
                event.event_location = Some(location);
            }
            if let Some(address) = patch.event_address {
                event.event_address = address;
            }
            if let Some(link) = patch.whatsapp_group_link {
                event.whatsapp_group_link = Some(link).filter(|s| !s.is_empty());
            }
            event.clone()
        };
        self.respond(Ok(updated)).await
    }

    async fn delete_event(&self, id: EventId) -> ApiResult<()> {
        self.write_calls.fetch_add(1, Ordering::SeqCst);
        self.check_failure()?;
        let removed = self.events_mut().remove(&id);
        match removed {
            Some(_) => {
                self.registrations_mut().retain(|_, r| r.events_id != id);
                self.respond(Ok(())).await
            }
            None => Err(ApiError::not_found(format!("Event {}", id))),
        }
    }
}

#[async_trait]
impl RegistrationsApi for InMemoryBackend {
    async fn list_registrations(&self) -> ApiResult<Vec<BackendRegistration>> {
        self.registration_list_calls.fetch_add(1, Ordering::SeqCst);
        let result = match self.check_failure() {
            Ok(()) => Ok(self.registrations().values().cloned().collect()),
            Err(err) => Err(err),
        };
        self.respond(result).await
    }

    async fn create_registration(
        &self,
        event_id: EventId,
        runner_id: UserId,
    ) -> ApiResult<BackendRegistration> {
        self.write_calls.fetch_add(1, Ordering::SeqCst);
        self.check_failure()?;
        if !self.events().contains_key(&event_id) {
            return Err(ApiError::not_found(format!("Event {}", event_id)));
        }
        let registration = BackendRegistration {
            id: self.next_registration_id.fetch_add(1, Ordering::SeqCst) + 1,
            created_at: Utc::now().timestamp_millis(),
            runner_id,
            events_id: event_id,
            user: None,
        };
        self.registrations_mut()
            .insert(registration.id, registration.clone());
        self.respond(Ok(registration)).await
    }

    async fn delete_registration(&self, id: RegistrationId) -> ApiResult<()> {
        self.write_calls.fetch_add(1, Ordering::SeqCst);
        self.check_failure()?;
        let removed = self.registrations_mut().remove(&id);
        match removed {
            Some(_) => self.respond(Ok(())).await,
            None => Err(ApiError::not_found(format!("Registration {}", id))),
        }
    }
}

#[async_trait]
impl BusinessPostsApi for InMemoryBackend {
    async fn list_posts(&self) -> ApiResult<Vec<BackendPost>> {
        let result = match self.check_failure() {
            Ok(()) => Ok(self.posts().values().cloned().collect()),
            Err(err) => Err(err),
        };
        self.respond(result).await
    }

    async fn create_post(&self, post: &NewPost) -> ApiResult<BackendPost> {
        self.write_calls.fetch_add(1, Ordering::SeqCst);
        self.check_failure()?;
        let created = self.seed_post(post.business_id, &post.title, &post.content);
        self.respond(Ok(created)).await
    }

    async fn update_post(&self, id: PostId, patch: &PostPatch) -> ApiResult<BackendPost> {
        self.write_calls.fetch_add(1, Ordering::SeqCst);
        self.check_failure()?;
        let updated = {
            let mut posts = self.posts_mut();
            let post = posts
                .get_mut(&id)
                .ok_or_else(|| ApiError::not_found(format!("Post {}", id)))?;
            if let Some(title) = &patch.title {
                post.title = title.clone();
            }
            if let Some(content) = &patch.content {
                post.content = content.clone();
            }
            post.clone()
        };
        self.respond(Ok(updated)).await
    }

    async fn delete_post(&self, id: PostId) -> ApiResult<()> {
        self.write_calls.fetch_add(1, Ordering::SeqCst);
        self.check_failure()?;
        let removed = self.posts_mut().remove(&id);
        match removed {
            Some(_) => {
                self.post_images_mut().retain(|_, image| image.business_posts_id != id);
                self.respond(Ok(())).await
            }
            None => Err(ApiError::not_found(format!("Post {}", id))),
        }
    }

    async fn list_post_images(&self) -> ApiResult<Vec<BackendPostImage>> {
        let result = match self.check_failure() {
            Ok(()) => Ok(self.post_images().values().cloned().collect()),
            Err(err) => Err(err),
        };
        self.respond(result).await
    }

    async fn create_post_image(&self, image: &NewPostImage) -> ApiResult<BackendPostImage> {
        self.write_calls.fetch_add(1, Ordering::SeqCst);
        self.check_failure()?;
        let post_id = image.business_posts_id;
        if !self.posts().contains_key(&post_id) {
            return Err(ApiError::not_found(format!("Post {}", post_id)));
        }
        let Some(mime) = image.mime() else {
            return Err(ApiError::Server {
                status: 400,
                message: "file must be a base64 data URL".to_string(),
            });
        };
        let stored = self.store_post_image(post_id, &format!("post-{}-image", post_id), mime);
        self.respond(Ok(stored)).await
    }

    async fn delete_post_image(&self, id: PostImageId) -> ApiResult<()> {
        self.write_calls.fetch_add(1, Ordering::SeqCst);
        self.check_failure()?;
        let removed = self.post_images_mut().remove(&id);
        match removed {
            Some(_) => self.respond(Ok(())).await,
            None => Err(ApiError::not_found(format!("Image {}", id))),
        }
    }
}
