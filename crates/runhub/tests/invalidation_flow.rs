//! End-to-end cache behaviour through the public API, wired the way the
//! binary wires it.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use runhub::backend::{InMemoryBackend, InMemoryGeocoder, InMemoryObjectStore};
use runhub::cache::{GeocodeCache, GeocodeCacheConfig, HitSource};
use runhub::config::Config;
use runhub::state::{AppState, Ports};
use runhub_core::api::ApiError;
use runhub_core::cache::CacheDomain;
use runhub_core::event::{generate_seed_events, EventPatch, NewEvent};
use runhub_core::geo::Coordinates;
use runhub_core::post::NewPost;

const HOST: u64 = 7;

struct Harness {
    backend: Arc<InMemoryBackend>,
    geocoder: Arc<InMemoryGeocoder>,
    state: AppState,
}

fn harness(config: Config) -> Harness {
    let backend = Arc::new(InMemoryBackend::new());
    let geocoder = Arc::new(InMemoryGeocoder::new());
    let ports = Ports {
        events: backend.clone(),
        registrations: backend.clone(),
        posts: backend.clone(),
        geocoding: geocoder.clone(),
        storage: Arc::new(InMemoryObjectStore::new("http://storage.local")),
    };
    let state = AppState::new(ports, &config);
    Harness {
        backend,
        geocoder,
        state,
    }
}

fn seeded(config: Config, count: u32) -> Harness {
    let h = harness(config);
    h.backend
        .seed_events(generate_seed_events(1, HOST, "Harbour Runners", Utc::now(), count));
    h
}

fn baker_street() -> Coordinates {
    Coordinates::new(51.5237, -0.1585)
}

#[tokio::test]
async fn test_baker_street_geocoded_once() {
    let h = harness(Config::default());
    h.geocoder.insert("221B Baker Street, London", baker_street());

    let first = h
        .state
        .geocoder
        .geocode("221B Baker Street, London")
        .await
        .unwrap()
        .unwrap();
    let second = h
        .state
        .geocoder
        .geocode("221B Baker Street, London")
        .await
        .unwrap()
        .unwrap();

    assert_eq!(first.coordinates, baker_street());
    assert_eq!(second.coordinates, baker_street());
    assert_eq!(second.source, HitSource::Cache);
    assert_eq!(h.geocoder.calls(), 1);
}

#[tokio::test]
async fn test_concurrent_geocodes_share_one_lookup() {
    let h = harness(Config::default());
    h.geocoder.insert("221B Baker Street, London", baker_street());
    h.geocoder.set_latency(Duration::from_millis(50));

    let cache = h.state.geocoder.clone();
    let lookups: Vec<_> = (0..5)
        .map(|_| {
            let cache = cache.clone();
            tokio::spawn(async move { cache.geocode("221B Baker Street, London").await })
        })
        .collect();
    for lookup in lookups {
        let hit = lookup.await.unwrap().unwrap().unwrap();
        assert_eq!(hit.coordinates, baker_street());
    }
    assert_eq!(h.geocoder.calls(), 1);
}

#[tokio::test]
async fn test_expired_geocode_served_when_geocoder_fails() {
    let geocoder = Arc::new(InMemoryGeocoder::new());
    geocoder.insert("221B Baker Street, London", baker_street());
    let cache = GeocodeCache::new(
        geocoder.clone(),
        GeocodeCacheConfig::with_ttl(Duration::from_millis(50)),
    );

    cache.geocode("221B Baker Street, London").await.unwrap();
    tokio::time::sleep(Duration::from_millis(100)).await;
    geocoder.fail_with(Some(ApiError::Timeout));

    let hit = cache
        .geocode("221B Baker Street, London")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(hit.coordinates, baker_street());
    assert!(hit.is_degraded());
}

#[tokio::test]
async fn test_reads_within_interval_make_one_request() {
    let h = seeded(
        Config {
            events_ttl_secs: 0,
            ..Config::default()
        },
        3,
    );

    let first = h.state.events.get_all_events().await;
    let second = h.state.events.get_all_events().await;

    assert_eq!(first.len(), 3);
    assert_eq!(second, first);
    assert_eq!(h.backend.list_calls(), 1);
}

#[tokio::test]
async fn test_force_refresh_issues_request() {
    let h = seeded(Config::default(), 3);

    h.state.events.get_all_events().await;
    h.state.events.force_refresh();
    h.state.events.get_all_events().await;

    assert_eq!(h.backend.list_calls(), 2);
}

#[tokio::test]
async fn test_empty_listing_keeps_cached_collection() {
    let h = seeded(
        Config {
            events_ttl_secs: 0,
            min_request_interval_ms: 0,
            ..Config::default()
        },
        3,
    );

    assert_eq!(h.state.events.get_all_events().await.len(), 3);
    h.backend.clear_events();

    assert_eq!(h.state.events.get_all_events().await.len(), 3);
    assert_eq!(h.backend.list_calls(), 2);
}

#[tokio::test]
async fn test_rate_limited_without_cache_is_empty() {
    let h = seeded(Config::default(), 3);
    h.backend.fail_with(Some(ApiError::RateLimited));

    assert!(h.state.events.get_all_events().await.is_empty());
    assert_eq!(h.state.events.get_event(1).await, None);
}

#[tokio::test]
async fn test_invalidate_all_is_idempotent() {
    let h = seeded(Config::default(), 3);
    let mut notifications = h.state.bus.subscribe();

    h.state.events.get_all_events().await;
    h.state.bus.invalidate_all().await;
    h.state.bus.invalidate_all().await;

    assert!(!h.state.events.has_entry());
    assert_eq!(notifications.recv().await.unwrap(), CacheDomain::Events);
    assert_eq!(notifications.recv().await.unwrap(), CacheDomain::Events);

    assert_eq!(h.state.events.get_all_events().await.len(), 3);
    assert_eq!(h.backend.list_calls(), 2);
}

#[tokio::test]
async fn test_created_event_visible_on_next_read() {
    let h = seeded(Config::default(), 2);
    assert_eq!(h.state.events.get_all_events().await.len(), 2);

    let created = h
        .state
        .event_service
        .create_event(
            NewEvent::new("Riverside Fartlek", HOST).with_address("Madrid Rio, Madrid"),
            None,
        )
        .await
        .unwrap();

    let events = h.state.events.get_all_events().await;
    assert_eq!(events.len(), 3);
    assert!(events.iter().any(|e| e.id == created.id));

    let hosted = h.state.events.get_business_events(HOST).await;
    assert_eq!(hosted.len(), 3);
}

#[tokio::test]
async fn test_registration_refreshes_dashboard() {
    let h = seeded(Config::default(), 2);
    h.backend.seed_registration(1, 40, Some("Ana"));

    let before = h.state.dashboard.metrics(HOST).await.unwrap();
    assert_eq!(before.total_participants, 1);

    h.state.registrations.register(2, 40).await.unwrap();

    let after = h.state.dashboard.metrics(HOST).await.unwrap();
    assert_eq!(after.total_participants, 2);
    assert_eq!(after.repeat_runners_percentage, 100);
}

#[tokio::test]
async fn test_update_detaches_pending_event_read() {
    let h = seeded(Config::default(), 1);
    h.backend.set_latency(Duration::from_millis(200));

    let pending = {
        let events = h.state.events.clone();
        tokio::spawn(async move { events.get_event(1).await })
    };
    tokio::time::sleep(Duration::from_millis(20)).await;
    h.backend.set_latency(Duration::ZERO);

    let patch = EventPatch {
        title: Some("New title".to_string()),
        ..Default::default()
    };
    h.state.event_service.update_event(1, patch).await.unwrap();

    let event = h.state.events.get_event(1).await.unwrap();
    assert_eq!(event.title, "New title");
    assert_eq!(h.backend.get_calls(), 2);
    pending.await.unwrap();
}

#[tokio::test]
async fn test_new_post_refetches_events() {
    let h = seeded(Config::default(), 2);
    assert_eq!(h.state.events.get_all_events().await.len(), 2);
    assert_eq!(h.backend.list_calls(), 1);

    h.state
        .posts
        .create_post(NewPost::new(HOST, "Trail week", "New routes every day"), Vec::new())
        .await
        .unwrap();

    assert_eq!(h.state.events.get_all_events().await.len(), 2);
    assert_eq!(h.backend.list_calls(), 2);
    assert_eq!(h.state.posts.business_posts(HOST).await.unwrap().len(), 1);
}
