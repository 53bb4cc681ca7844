//! Client-side caches in front of the backend and geocoder.

mod events;
mod flight;
mod geocode;
mod invalidation;
mod views;

pub use events::{EventCache, EventCacheConfig, DEFAULT_EVENTS_TTL, DEFAULT_MIN_REQUEST_INTERVAL};
pub use flight::SingleFlight;
pub use geocode::{
    GeocodeCache, GeocodeCacheConfig, GeocodeHit, HitSource, DEFAULT_GEOCODE_CAPACITY,
    DEFAULT_GEOCODE_TTL,
};
pub use invalidation::InvalidationBus;
pub use views::ViewCache;
