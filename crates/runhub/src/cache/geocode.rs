//! Address to coordinates cache.
//!
//! Lookups are memoized per normalized address with a TTL. Expired entries
//! are kept as a fallback for when the geocoder fails, and a background
//! sweeper removes them once per TTL.

use std::num::NonZeroUsize;
use std::sync::{Arc, Mutex, MutexGuard, Weak};
use std::time::{Duration, Instant};

use lru::LruCache;
use runhub_core::api::{ApiError, GeocodingApi};
use runhub_core::cache::{geocode_key, CacheEntry};
use runhub_core::geo::{normalize_address, Coordinates, GeocodeError};
use serde::Serialize;
use tokio::task::JoinHandle;

use super::flight::SingleFlight;

/// Default lifetime of a geocode entry.
pub const DEFAULT_GEOCODE_TTL: Duration = Duration::from_secs(60 * 60);

/// Default maximum number of memoized addresses.
pub const DEFAULT_GEOCODE_CAPACITY: usize = 1000;

/// Tuning for [`GeocodeCache`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeocodeCacheConfig {
    pub ttl: Duration,
    /// How often the sweeper runs. Defaults to the TTL.
    pub sweep_interval: Duration,
    /// Upper bound on entries; the least recently used entry is evicted first.
    pub capacity: NonZeroUsize,
}

impl Default for GeocodeCacheConfig {
    fn default() -> Self {
        Self {
            ttl: DEFAULT_GEOCODE_TTL,
            sweep_interval: DEFAULT_GEOCODE_TTL,
            capacity: NonZeroUsize::new(DEFAULT_GEOCODE_CAPACITY).unwrap_or(NonZeroUsize::MIN),
        }
    }
}

impl GeocodeCacheConfig {
    /// Config with the given TTL, sweeping once per TTL.
    pub fn with_ttl(ttl: Duration) -> Self {
        Self {
            ttl,
            sweep_interval: ttl,
            ..Default::default()
        }
    }
}

/// Where a geocode result came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum HitSource {
    /// Fetched from the geocoder just now.
    Network,
    /// Served from a fresh cache entry.
    Cache,
    /// The geocoder failed and an expired entry was served instead.
    Stale,
}

/// A successful address lookup.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct GeocodeHit {
    pub coordinates: Coordinates,
    pub source: HitSource,
}

impl GeocodeHit {
    /// Returns true if the result came from an expired entry.
    pub fn is_degraded(&self) -> bool {
        self.source == HitSource::Stale
    }
}

type Entries = Mutex<LruCache<String, CacheEntry<Coordinates>>>;

fn lock(entries: &Entries) -> MutexGuard<'_, LruCache<String, CacheEntry<Coordinates>>> {
    entries
        .lock()
        .unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// Memoizing front for a [`GeocodingApi`].
pub struct GeocodeCache {
    api: Arc<dyn GeocodingApi>,
    entries: Arc<Entries>,
    flight: SingleFlight<String, Result<GeocodeHit, GeocodeError>>,
    config: GeocodeCacheConfig,
}

impl GeocodeCache {
    pub fn new(api: Arc<dyn GeocodingApi>, config: GeocodeCacheConfig) -> Self {
        Self {
            api,
            entries: Arc::new(Mutex::new(LruCache::new(config.capacity))),
            flight: SingleFlight::new(),
            config,
        }
    }

    pub fn config(&self) -> &GeocodeCacheConfig {
        &self.config
    }

    /// Resolves an address to coordinates.
    ///
    /// Blank addresses resolve to `Ok(None)` without a lookup. Fresh entries
    /// are served from memory. When the geocoder fails, an expired entry for
    /// the address is served as [`HitSource::Stale`] if there is one.
    pub async fn geocode(&self, address: &str) -> Result<Option<GeocodeHit>, GeocodeError> {
        let Some(address) = normalize_address(address) else {
            return Ok(None);
        };

        if let Some(entry) = lock(&self.entries).get(address) {
            if entry.is_fresh(self.config.ttl, Instant::now()) {
                tracing::debug!(address = %address, "Geocode cache hit");
                return Ok(Some(GeocodeHit {
                    coordinates: entry.value,
                    source: HitSource::Cache,
                }));
            }
        }

        let api = self.api.clone();
        let entries = self.entries.clone();
        let owned = address.to_string();
        self.flight
            .run(geocode_key(address), move || lookup(api, entries, owned))
            .await
            .map(Some)
    }

    /// Removes every entry older than the TTL and returns how many were removed.
    pub fn sweep(&self) -> usize {
        sweep_entries(&self.entries, self.config.ttl)
    }

    /// Number of entries currently held, fresh or stale.
    pub fn len(&self) -> usize {
        lock(&self.entries).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drops every entry.
    pub fn clear(&self) {
        lock(&self.entries).clear();
    }

    /// Spawns the periodic sweeper.
    ///
    /// The task stops on its own once the cache is dropped; abort the handle
    /// to stop it earlier.
    pub fn spawn_sweeper(&self) -> JoinHandle<()> {
        let entries: Weak<Entries> = Arc::downgrade(&self.entries);
        let ttl = self.config.ttl;
        // `interval` rejects a zero period.
        let period = self.config.sweep_interval.max(Duration::from_millis(1));

        tokio::spawn(async move {
            let mut interval = tokio::time::interval(period);
            // The first tick completes immediately.
            interval.tick().await;
            loop {
                interval.tick().await;
                let Some(entries) = entries.upgrade() else {
                    tracing::debug!("Geocode cache dropped, stopping sweeper");
                    break;
                };
                let removed = sweep_entries(&entries, ttl);
                if removed > 0 {
                    tracing::debug!(removed, "Swept expired geocode entries");
                }
            }
        })
    }
}

async fn lookup(
    api: Arc<dyn GeocodingApi>,
    entries: Arc<Entries>,
    address: String,
) -> Result<GeocodeHit, GeocodeError> {
    match api.search(&address).await {
        Ok(matches) => match matches.first() {
            Some(first) => {
                let coordinates = Coordinates::from(first);
                lock(&entries).put(address.clone(), CacheEntry::new(coordinates));
                tracing::debug!(address = %address, "Geocoded address");
                Ok(GeocodeHit {
                    coordinates,
                    source: HitSource::Network,
                })
            }
            None => {
                tracing::debug!(address = %address, "Geocoder returned no results");
                Err(GeocodeError::NotFound)
            }
        },
        Err(err) => {
            let stale = lock(&entries).peek(&address).map(|entry| entry.value);
            match stale {
                Some(coordinates) => {
                    tracing::warn!(address = %address, error = %err, "Geocoder failed, serving stale coordinates");
                    Ok(GeocodeHit {
                        coordinates,
                        source: HitSource::Stale,
                    })
                }
                None => {
                    tracing::warn!(address = %address, error = %err, "Geocoder failed");
                    Err(match err {
                        ApiError::Timeout => GeocodeError::Timeout,
                        _ => GeocodeError::NotFound,
                    })
                }
            }
        }
    }
}

fn sweep_entries(entries: &Entries, ttl: Duration) -> usize {
    let now = Instant::now();
    let mut entries = lock(entries);
    let expired: Vec<String> = entries
        .iter()
        .filter(|(_, entry)| entry.is_stale(ttl, now))
        .map(|(key, _)| key.clone())
        .collect();
    for key in &expired {
        entries.pop(key);
    }
    expired.len()
}
