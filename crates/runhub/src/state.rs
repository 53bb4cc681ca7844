//! Application state.
//!
//! Caches are built once here and shared through `Arc`; every cache that
//! holds event-derived data is registered on the invalidation bus.

use std::sync::Arc;

use chrono::Utc;
use runhub_client::{BackendClient, ClientError, NominatimClient, StorageClient};
use runhub_core::api::{
    BusinessPostsApi, EventsApi, GeocodingApi, ObjectStore, RegistrationsApi,
};
use runhub_core::event::{generate_seed_events, UserId};
use runhub_core::geo::Coordinates;

use crate::backend::{InMemoryBackend, InMemoryGeocoder, InMemoryObjectStore};
use crate::cache::{EventCache, GeocodeCache, InvalidationBus, ViewCache};
use crate::config::Config;
use crate::services::{
    BusinessDashboard, BusinessPostService, EventService, ImageService, MetricsCache,
    RegistrationService,
};

/// Business hosting the demo events.
pub const DEMO_BUSINESS_ID: UserId = 1;

/// Name of the demo business.
pub const DEMO_BUSINESS_NAME: &str = "Harbour Runners";

const DEMO_EVENT_COUNT: u32 = 8;

/// The external services the application talks to.
#[derive(Clone)]
pub struct Ports {
    pub events: Arc<dyn EventsApi>,
    pub registrations: Arc<dyn RegistrationsApi>,
    pub posts: Arc<dyn BusinessPostsApi>,
    pub geocoding: Arc<dyn GeocodingApi>,
    pub storage: Arc<dyn ObjectStore>,
}

impl Ports {
    /// HTTP adapters for the configured endpoints.
    pub fn http(config: &Config) -> Result<Self, ClientError> {
        let mut backend = BackendClient::new(&config.api_url);
        if let Some(token) = &config.api_token {
            backend = backend.with_service_token(token);
        }
        if let Some(token) = &config.session_token {
            backend = backend.with_session_token(token);
        }
        let backend = Arc::new(backend);

        let geocoder = NominatimClient::new(&config.geocoder_url)?
            .with_user_agent(&config.geocoder_user_agent);
        let storage = StorageClient::new(&config.storage_url, &config.storage_key);

        Ok(Self {
            events: backend.clone(),
            registrations: backend.clone(),
            posts: backend,
            geocoding: Arc::new(geocoder),
            storage: Arc::new(storage),
        })
    }

    /// In-memory services seeded with a demo business, its events and a few
    /// registrations.
    pub fn demo() -> Self {
        let backend = Arc::new(InMemoryBackend::new());
        backend.seed_events(generate_seed_events(
            1,
            DEMO_BUSINESS_ID,
            DEMO_BUSINESS_NAME,
            Utc::now(),
            DEMO_EVENT_COUNT,
        ));
        for (event_id, runner_id, name) in [
            (1, 100, Some("Ana")),
            (1, 101, Some("Luis")),
            (2, 100, Some("Ana")),
            (3, 102, None),
            (5, 101, Some("Luis")),
        ] {
            backend.seed_registration(event_id, runner_id, name);
        }
        let welcome = backend.seed_post(
            DEMO_BUSINESS_ID,
            "Welcome to Harbour Runners",
            "Group runs every Tuesday and Saturday from the harbour steps.",
        );
        backend.seed_post_image(welcome.id, "harbour-steps.jpg");
        backend.seed_post(
            DEMO_BUSINESS_ID,
            "Spring 10K registrations open",
            "Sign up early, places are limited to the first 200 runners.",
        );

        let geocoder = Arc::new(InMemoryGeocoder::new());
        for (address, lat, lon) in [
            ("Retiro Park, Madrid", 40.4153, -3.6845),
            ("Madrid Rio, Madrid", 40.3990, -3.7130),
            ("Estadio Vallehermoso, Madrid", 40.4465, -3.7100),
            ("221B Baker Street, London", 51.5237, -0.1585),
        ] {
            geocoder.insert(address, Coordinates::new(lat, lon));
        }

        Self {
            events: backend.clone(),
            registrations: backend.clone(),
            posts: backend,
            geocoding: geocoder,
            storage: Arc::new(InMemoryObjectStore::new("http://localhost:54321")),
        }
    }
}

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub bus: Arc<InvalidationBus>,
    pub events: Arc<EventCache>,
    pub geocoder: Arc<GeocodeCache>,
    pub metrics_views: Arc<MetricsCache>,
    pub event_service: EventService,
    pub registrations: RegistrationService,
    pub posts: BusinessPostService,
    pub images: ImageService,
    pub dashboard: BusinessDashboard,
}

impl AppState {
    pub fn new(ports: Ports, config: &Config) -> Self {
        let bus = Arc::new(InvalidationBus::new());

        let events = Arc::new(EventCache::new(ports.events.clone(), config.event_cache_config()));
        let geocoder = Arc::new(GeocodeCache::new(ports.geocoding, config.geocode_cache_config()));
        let metrics_views: Arc<MetricsCache> = ViewCache::new("business-metrics");

        bus.register(events.clone());
        bus.register(metrics_views.clone());

        let images = ImageService::new(ports.storage);
        let event_service = EventService::new(ports.events, images.clone(), bus.clone());
        let registrations = RegistrationService::new(ports.registrations, bus.clone());
        let posts = BusinessPostService::new(ports.posts, bus.clone());
        let dashboard =
            BusinessDashboard::new(events.clone(), registrations.clone(), metrics_views.clone());

        tracing::debug!(listeners = bus.listener_count(), "Application state ready");

        Self {
            bus,
            events,
            geocoder,
            metrics_views,
            event_service,
            registrations,
            posts,
            images,
            dashboard,
        }
    }

    /// State backed by the seeded in-memory services.
    pub fn with_demo_data(config: &Config) -> Self {
        Self::new(Ports::demo(), config)
    }
}
