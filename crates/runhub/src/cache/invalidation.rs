//! Cache invalidation broadcaster.
//!
//! Write paths publish once; the bus fans out to every registered cache and
//! to async subscribers.

use std::sync::{Arc, RwLock};

use runhub_core::cache::{CacheDomain, InvalidationListener};
use tokio::sync::broadcast;

/// Channel capacity for invalidation notifications.
const CHANNEL_CAPACITY: usize = 100;

/// Fan-out point for cache invalidations.
pub struct InvalidationBus {
    listeners: RwLock<Vec<Arc<dyn InvalidationListener>>>,
    sender: broadcast::Sender<CacheDomain>,
}

impl InvalidationBus {
    pub fn new() -> Self {
        let (sender, _) = broadcast::channel(CHANNEL_CAPACITY);
        Self {
            listeners: RwLock::new(Vec::new()),
            sender,
        }
    }

    /// Registers a cache to be invalidated on every publish.
    pub fn register(&self, listener: Arc<dyn InvalidationListener>) {
        tracing::debug!(listener = listener.name(), "Registered invalidation listener");
        self.listeners
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push(listener);
    }

    /// Subscribes to invalidation notifications.
    pub fn subscribe(&self) -> broadcast::Receiver<CacheDomain> {
        self.sender.subscribe()
    }

    pub fn listener_count(&self) -> usize {
        self.listeners
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .len()
    }

    /// Invalidates the event collection and every view derived from it.
    pub async fn invalidate_events_view(&self) {
        self.publish(CacheDomain::Events).await;
    }

    /// Invalidates every cache.
    pub async fn invalidate_all(&self) {
        self.invalidate_events_view().await;
    }

    async fn publish(&self, domain: CacheDomain) {
        let listeners: Vec<Arc<dyn InvalidationListener>> = self
            .listeners
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone();

        if listeners.is_empty() && self.sender.receiver_count() == 0 {
            tracing::debug!(domain = %domain, "No invalidation listeners registered");
            return;
        }

        for listener in &listeners {
            listener.invalidate(domain).await;
        }

        // No subscribers is fine.
        let _ = self.sender.send(domain);

        tracing::debug!(domain = %domain, listeners = listeners.len(), "Invalidated caches");
    }
}

impl Default for InvalidationBus {
    fn default() -> Self {
        Self::new()
    }
}
