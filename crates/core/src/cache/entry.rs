use std::time::{Duration, Instant};

/// A cached value with the time it was stored.
///
/// Entries are never expired on read: a stale entry stays available as a
/// fallback until it is replaced or swept.
#[derive(Debug, Clone, PartialEq)]
pub struct CacheEntry<T> {
    pub value: T,
    pub stored_at: Instant,
}

impl<T> CacheEntry<T> {
    /// Creates an entry stored now.
    pub fn new(value: T) -> Self {
        Self::stored_at(value, Instant::now())
    }

    pub fn stored_at(value: T, stored_at: Instant) -> Self {
        Self { value, stored_at }
    }

    /// Time elapsed since the entry was stored.
    pub fn age(&self, now: Instant) -> Duration {
        now.saturating_duration_since(self.stored_at)
    }

    /// Returns true if the entry is younger than `ttl`.
    pub fn is_fresh(&self, ttl: Duration, now: Instant) -> bool {
        self.age(now) < ttl
    }

    /// Returns true if the entry is at least `ttl` old.
    pub fn is_stale(&self, ttl: Duration, now: Instant) -> bool {
        !self.is_fresh(ttl, now)
    }
}
