mod entry;
mod keys;
mod traits;

pub use entry::CacheEntry;
pub use keys::{event_key, geocode_key, ALL_EVENTS_KEY};
pub use traits::{CacheDomain, InvalidationListener};
