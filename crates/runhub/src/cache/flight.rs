//! In-flight request de-duplication.
//!
//! Concurrent callers asking for the same key share one future instead of
//! each issuing their own request.

use std::collections::HashMap;
use std::future::Future;
use std::hash::Hash;
use std::sync::{Mutex, MutexGuard};

use futures_util::future::{BoxFuture, FutureExt, Shared};

type SharedFuture<V> = Shared<BoxFuture<'static, V>>;

/// Coalesces concurrent work per key.
///
/// The first caller for a key starts the work; callers arriving while it is
/// pending await the same result. The entry is dropped once the work
/// completes, so the next call starts fresh.
pub struct SingleFlight<K, V: Clone> {
    in_flight: Mutex<HashMap<K, SharedFuture<V>>>,
}

impl<K, V> SingleFlight<K, V>
where
    K: Eq + Hash + Clone,
    V: Clone + Send + Sync + 'static,
{
    pub fn new() -> Self {
        Self {
            in_flight: Mutex::new(HashMap::new()),
        }
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<K, SharedFuture<V>>> {
        self.in_flight
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Runs `make()` for `key`, or joins the pending run for it.
    pub async fn run<F, Fut>(&self, key: K, make: F) -> V
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = V> + Send + 'static,
    {
        let future = {
            let mut in_flight = self.lock();
            match in_flight.get(&key) {
                Some(pending) => pending.clone(),
                None => {
                    let future = make().boxed().shared();
                    in_flight.insert(key.clone(), future.clone());
                    future
                }
            }
        };
        self.complete(key, future).await
    }

    /// Awaits the pending run for `key`, if there is one.
    pub async fn join(&self, key: &K) -> Option<V> {
        let pending = self.lock().get(key).cloned()?;
        Some(self.complete(key.clone(), pending).await)
    }

    /// Detaches the pending run for `key`.
    ///
    /// Callers already waiting still get its result; later callers start a new run.
    pub fn forget(&self, key: &K) {
        self.lock().remove(key);
    }

    /// Detaches every pending run.
    pub fn forget_all(&self) {
        self.lock().clear();
    }

    /// Returns true if work for `key` is pending.
    pub fn is_pending(&self, key: &K) -> bool {
        self.lock().contains_key(key)
    }

    async fn complete(&self, key: K, future: SharedFuture<V>) -> V {
        let output = future.clone().await;
        let mut in_flight = self.lock();
        if in_flight
            .get(&key)
            .is_some_and(|current| current.ptr_eq(&future))
        {
            in_flight.remove(&key);
        }
        output
    }
}

impl<K, V> Default for SingleFlight<K, V>
where
    K: Eq + Hash + Clone,
    V: Clone + Send + Sync + 'static,
{
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use std::time::Duration;

    #[tokio::test]
    async fn test_concurrent_calls_share_one_run() {
        let flight: Arc<SingleFlight<&'static str, u32>> = Arc::new(SingleFlight::new());
        let runs = Arc::new(AtomicUsize::new(0));

        let mut handles = Vec::new();
        for _ in 0..5 {
            let flight = flight.clone();
            let runs = runs.clone();
            handles.push(tokio::spawn(async move {
                flight
                    .run("key", || async move {
                        runs.fetch_add(1, Ordering::SeqCst);
                        tokio::time::sleep(Duration::from_millis(50)).await;
                        7
                    })
                    .await
            }));
        }

        for handle in handles {
            assert_eq!(handle.await.unwrap(), 7);
        }
        assert_eq!(runs.load(Ordering::SeqCst), 1);
        assert!(!flight.is_pending(&"key"));
    }

    #[tokio::test]
    async fn test_sequential_calls_run_again() {
        let flight: SingleFlight<u8, u32> = SingleFlight::new();
        let runs = Arc::new(AtomicUsize::new(0));

        for _ in 0..3 {
            let runs = runs.clone();
            flight
                .run(1, || async move {
                    runs.fetch_add(1, Ordering::SeqCst);
                    1
                })
                .await;
        }
        assert_eq!(runs.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_join_without_pending_run() {
        let flight: SingleFlight<u8, u32> = SingleFlight::new();
        assert_eq!(flight.join(&1).await, None);
    }

    #[tokio::test]
    async fn test_forget_starts_new_run() {
        let flight: Arc<SingleFlight<u8, u32>> = Arc::new(SingleFlight::new());

        let slow = {
            let flight = flight.clone();
            tokio::spawn(async move {
                flight
                    .run(1, || async {
                        tokio::time::sleep(Duration::from_millis(100)).await;
                        1
                    })
                    .await
            })
        };
        tokio::time::sleep(Duration::from_millis(20)).await;
        assert!(flight.is_pending(&1));

        flight.forget(&1);
        let fresh = flight.run(1, || async { 2 }).await;
        assert_eq!(fresh, 2);
        assert_eq!(slow.await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_forget_all_detaches_every_key() {
        let flight: Arc<SingleFlight<u8, u32>> = Arc::new(SingleFlight::new());

        let pending: Vec<_> = (1..=2u8)
            .map(|key| {
                let flight = flight.clone();
                tokio::spawn(async move {
                    flight
                        .run(key, || async {
                            tokio::time::sleep(Duration::from_millis(100)).await;
                            0
                        })
                        .await
                })
            })
            .collect();
        tokio::time::sleep(Duration::from_millis(20)).await;
        assert!(flight.is_pending(&1) && flight.is_pending(&2));

        flight.forget_all();
        assert!(!flight.is_pending(&1));
        assert!(!flight.is_pending(&2));
        assert_eq!(flight.run(2, || async { 9 }).await, 9);
        for handle in pending {
            assert_eq!(handle.await.unwrap(), 0);
        }
    }
}
