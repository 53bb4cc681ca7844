//! Keyed cache for views derived from the event collection.

use std::collections::HashMap;
use std::hash::Hash;
use std::sync::{Arc, RwLock};

use async_trait::async_trait;
use runhub_core::cache::{CacheDomain, InvalidationListener};

/// Derived values keyed by `K`, cleared whenever events change.
///
/// Entries have no TTL; they live until the next invalidation.
pub struct ViewCache<K, V> {
    name: String,
    views: RwLock<HashMap<K, V>>,
}

impl<K, V> ViewCache<K, V>
where
    K: Eq + Hash,
    V: Clone,
{
    pub fn new(name: impl Into<String>) -> Arc<Self> {
        Arc::new(Self {
            name: name.into(),
            views: RwLock::new(HashMap::new()),
        })
    }

    pub fn get(&self, key: &K) -> Option<V> {
        self.views
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .get(key)
            .cloned()
    }

    pub fn insert(&self, key: K, value: V) {
        self.views
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .insert(key, value);
    }

    pub fn clear(&self) {
        self.views
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clear();
    }

    pub fn len(&self) -> usize {
        self.views
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl<K, V> InvalidationListener for ViewCache<K, V>
where
    K: Eq + Hash + Send + Sync,
    V: Clone + Send + Sync,
{
    fn name(&self) -> &str {
        &self.name
    }

    async fn invalidate(&self, domain: CacheDomain) {
        match domain {
            CacheDomain::Events => {
                self.clear();
                tracing::debug!(view = %self.name, "View cache cleared");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_invalidation_clears_views() {
        let views: Arc<ViewCache<u64, String>> = ViewCache::new("metrics");
        views.insert(1, "a".to_string());
        views.insert(2, "b".to_string());
        assert_eq!(views.get(&1).as_deref(), Some("a"));

        views.invalidate(CacheDomain::Events).await;
        assert!(views.is_empty());
        assert_eq!(views.get(&1), None);

        views.invalidate(CacheDomain::Events).await;
        assert!(views.is_empty());
    }
}
