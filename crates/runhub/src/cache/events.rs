//! Cache for the full event collection.
//!
//! The collection is fetched as a whole and held under a single key. Reads
//! never fail: when the backend is unavailable, rate limited or the request
//! gate is closed, the last known collection (fresh or stale) is served, or
//! an empty one if nothing was ever fetched.

use std::sync::{Arc, Mutex, MutexGuard};
use std::time::{Duration, Instant};

use async_trait::async_trait;
use runhub_core::api::{ApiError, EventsApi};
use runhub_core::cache::{event_key, CacheDomain, CacheEntry, InvalidationListener, ALL_EVENTS_KEY};
use runhub_core::event::{
    filter_by_host, find_event, transform_backend_event, transform_backend_events, EventId,
    RunEvent, UserId,
};

use super::flight::SingleFlight;

/// Default lifetime of the cached collection.
pub const DEFAULT_EVENTS_TTL: Duration = Duration::from_secs(10 * 60);

/// Default minimum spacing between backend requests.
pub const DEFAULT_MIN_REQUEST_INTERVAL: Duration = Duration::from_secs(2);

/// Tuning for [`EventCache`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventCacheConfig {
    pub ttl: Duration,
    /// Requests closer together than this are answered from the cache.
    pub min_request_interval: Duration,
    /// When false, an empty listing does not replace a non-empty cached one.
    pub trust_empty_responses: bool,
}

impl Default for EventCacheConfig {
    fn default() -> Self {
        Self {
            ttl: DEFAULT_EVENTS_TTL,
            min_request_interval: DEFAULT_MIN_REQUEST_INTERVAL,
            trust_empty_responses: false,
        }
    }
}

#[derive(Debug, Default)]
struct State {
    entry: Option<CacheEntry<Vec<RunEvent>>>,
    last_request_at: Option<Instant>,
    /// Bumped on every invalidation so fetches started earlier do not store.
    generation: u64,
}

impl State {
    fn gate_open(&self, interval: Duration, now: Instant) -> bool {
        self.last_request_at
            .is_none_or(|last| now.saturating_duration_since(last) >= interval)
    }

    fn cached(&self) -> Vec<RunEvent> {
        self.entry
            .as_ref()
            .map(|entry| entry.value.clone())
            .unwrap_or_default()
    }
}

type SharedState = Arc<Mutex<State>>;

fn lock(state: &Mutex<State>) -> MutexGuard<'_, State> {
    state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// Memoizing front for the event listing of an [`EventsApi`].
pub struct EventCache {
    api: Arc<dyn EventsApi>,
    state: SharedState,
    all_flight: SingleFlight<&'static str, Vec<RunEvent>>,
    event_flight: SingleFlight<String, Result<RunEvent, ApiError>>,
    config: EventCacheConfig,
}

impl EventCache {
    pub fn new(api: Arc<dyn EventsApi>, config: EventCacheConfig) -> Self {
        Self {
            api,
            state: Arc::new(Mutex::new(State::default())),
            all_flight: SingleFlight::new(),
            event_flight: SingleFlight::new(),
            config,
        }
    }

    pub fn config(&self) -> &EventCacheConfig {
        &self.config
    }

    /// Returns every event, preferring fresh data, then stale data, then nothing.
    pub async fn get_all_events(&self) -> Vec<RunEvent> {
        let now = Instant::now();
        {
            let state = lock(&self.state);
            if let Some(entry) = &state.entry {
                if entry.is_fresh(self.config.ttl, now) {
                    tracing::debug!(count = entry.value.len(), "Events cache hit");
                    return entry.value.clone();
                }
            }
        }

        if let Some(events) = self.all_flight.join(&ALL_EVENTS_KEY).await {
            return events;
        }

        let generation = {
            let mut state = lock(&self.state);
            if !state.gate_open(self.config.min_request_interval, now) {
                tracing::debug!("Events request gated, serving cached collection");
                return state.cached();
            }
            state.last_request_at = Some(now);
            state.generation
        };

        let api = self.api.clone();
        let state = self.state.clone();
        let trust_empty = self.config.trust_empty_responses;
        self.all_flight
            .run(ALL_EVENTS_KEY, move || {
                fetch_all(api, state, generation, trust_empty)
            })
            .await
    }

    /// Returns one event.
    ///
    /// A fresh collection is consulted first. Otherwise the event is fetched
    /// on its own when the request gate allows it; when gated or on failure
    /// the cached collection, even if stale, is searched instead.
    pub async fn get_event(&self, id: EventId) -> Option<RunEvent> {
        let now = Instant::now();
        {
            let mut state = lock(&self.state);
            if let Some(entry) = &state.entry {
                if entry.is_fresh(self.config.ttl, now) {
                    if let Some(event) = find_event(&entry.value, id) {
                        return Some(event.clone());
                    }
                }
            }
            if !state.gate_open(self.config.min_request_interval, now) {
                tracing::debug!(event_id = id, "Event request gated, searching cached collection");
                return find_event(&state.cached(), id).cloned();
            }
            state.last_request_at = Some(now);
        }

        let api = self.api.clone();
        let result = self
            .event_flight
            .run(event_key(id), move || async move {
                api.get_event(id)
                    .await
                    .map(|raw| transform_backend_event(&raw))
            })
            .await;

        match result {
            Ok(event) => Some(event),
            Err(err) => {
                tracing::warn!(event_id = id, error = %err, "Failed to fetch event, searching cached collection");
                find_event(&lock(&self.state).cached(), id).cloned()
            }
        }
    }

    /// Returns the events hosted by a business.
    pub async fn get_business_events(&self, business_id: UserId) -> Vec<RunEvent> {
        filter_by_host(&self.get_all_events().await, business_id)
    }

    /// Drops the cached collection and reopens the request gate.
    ///
    /// Reads started afterwards do not join fetches already in flight.
    pub fn force_refresh(&self) {
        self.reset(true);
        tracing::debug!("Events cache force-refreshed");
    }

    /// Drops the cached collection. The request gate is left as is.
    pub fn clear(&self) {
        self.reset(false);
        tracing::debug!("Events cache cleared");
    }

    fn reset(&self, reopen_gate: bool) {
        {
            let mut state = lock(&self.state);
            state.entry = None;
            state.generation += 1;
            if reopen_gate {
                state.last_request_at = None;
            }
        }
        self.all_flight.forget(&ALL_EVENTS_KEY);
        self.event_flight.forget_all();
    }

    /// Returns true if a collection is cached, fresh or stale.
    pub fn has_entry(&self) -> bool {
        lock(&self.state).entry.is_some()
    }
}

async fn fetch_all(
    api: Arc<dyn EventsApi>,
    shared: SharedState,
    generation: u64,
    trust_empty: bool,
) -> Vec<RunEvent> {
    let result = api.list_events().await;

    let mut state = lock(&shared);
    if state.generation != generation {
        tracing::debug!("Events cache invalidated during fetch, not storing");
        return match result {
            Ok(raw) => transform_backend_events(&raw),
            Err(_) => state.cached(),
        };
    }

    match result {
        Ok(raw) if raw.is_empty() => {
            let has_events = state
                .entry
                .as_ref()
                .is_some_and(|entry| !entry.value.is_empty());
            if has_events && !trust_empty {
                let cached = state.cached();
                tracing::warn!(
                    cached = cached.len(),
                    "Backend returned no events, keeping cached collection"
                );
                return cached;
            }
            if trust_empty {
                state.entry = Some(CacheEntry::new(Vec::new()));
            }
            Vec::new()
        }
        Ok(raw) => {
            let events = transform_backend_events(&raw);
            tracing::debug!(count = events.len(), "Fetched events");
            state.entry = Some(CacheEntry::new(events.clone()));
            events
        }
        Err(err) => {
            let cached = state.cached();
            tracing::warn!(error = %err, cached = cached.len(), "Failed to fetch events, serving cached collection");
            cached
        }
    }
}

#[async_trait]
impl InvalidationListener for EventCache {
    fn name(&self) -> &str {
        "events"
    }

    async fn invalidate(&self, domain: CacheDomain) {
        match domain {
            CacheDomain::Events => self.force_refresh(),
        }
    }
}
