use std::fmt;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// A family of cached data that can be invalidated as a unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CacheDomain {
    /// The event collection and every view derived from it.
    Events,
}

impl fmt::Display for CacheDomain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CacheDomain::Events => write!(f, "events"),
        }
    }
}

/// A cache that wants to be cleared when its data changes upstream.
#[async_trait]
pub trait InvalidationListener: Send + Sync {
    /// Name used in logs.
    fn name(&self) -> &str;

    /// Drops whatever the listener holds for `domain`.
    ///
    /// Must be idempotent: invalidating twice has the same effect as once.
    async fn invalidate(&self, domain: CacheDomain);
}
