//! Process-wide snapshot cache with a bounded time-to-live.
//!
//! Each key owns its own `RwLock`. Fresh entries are served under the read
//! lock, so concurrent searches never wait on each other for a hit. A stale
//! or missing entry is refreshed under the write lock after re-checking
//! freshness; a second caller arriving during the refresh waits for it and
//! then reads the new entry instead of loading again.

use std::collections::HashMap;
use std::future::Future;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use tokio::sync::RwLock;
use tokio::time::Instant;

struct Entry<T> {
    value: Arc<T>,
    loaded_at: Instant,
}

type Slot<T> = Arc<RwLock<Option<Entry<T>>>>;

pub struct SnapshotCache<T> {
    ttl: Duration,
    slots: Mutex<HashMap<String, Slot<T>>>,
}

impl<T> SnapshotCache<T> {
    /// A `ttl` of zero disables caching: every call loads.
    #[must_use]
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            slots: Mutex::new(HashMap::new()),
        }
    }

    fn slot(&self, key: &str) -> Slot<T> {
        let mut slots = self.slots.lock().unwrap_or_else(PoisonError::into_inner);
        Arc::clone(slots.entry(key.to_owned()).or_default())
    }

    fn fresh(&self, entry: Option<&Entry<T>>) -> Option<Arc<T>> {
        entry
            .filter(|e| e.loaded_at.elapsed() < self.ttl)
            .map(|e| Arc::clone(&e.value))
    }

    /// Returns the cached value for `key`, running `load` if it is missing or
    /// older than the TTL.
    ///
    /// # Errors
    ///
    /// Propagates the error from `load`. Failed loads are not cached, so the
    /// next call tries again.
    pub async fn get_or_load<F, Fut, E>(&self, key: &str, load: F) -> Result<Arc<T>, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, E>>,
    {
        if self.ttl.is_zero() {
            return load().await.map(Arc::new);
        }

        let slot = self.slot(key);
        {
            let guard = slot.read().await;
            if let Some(value) = self.fresh(guard.as_ref()) {
                tracing::debug!(key, "snapshot cache hit");
                return Ok(value);
            }
        }

        let mut guard = slot.write().await;
        if let Some(value) = self.fresh(guard.as_ref()) {
            tracing::debug!(key, "snapshot refreshed by a concurrent search");
            return Ok(value);
        }

        tracing::debug!(key, "snapshot cache miss, loading");
        let value = Arc::new(load().await?);
        *guard = Some(Entry {
            value: Arc::clone(&value),
            loaded_at: Instant::now(),
        });
        Ok(value)
    }

    /// Drops every cached entry.
    pub fn clear(&self) {
        self.slots
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    async fn load_counted(counter: &AtomicUsize, value: u32) -> Result<u32, String> {
        counter.fetch_add(1, Ordering::SeqCst);
        tokio::time::sleep(Duration::from_millis(50)).await;
        Ok(value)
    }

    #[tokio::test(start_paused = true)]
    async fn fresh_entries_are_served_without_loading() {
        let cache = SnapshotCache::new(Duration::from_secs(60));
        let loads = AtomicUsize::new(0);

        let first = cache.get_or_load("konzum", || load_counted(&loads, 1)).await;
        let second = cache.get_or_load("konzum", || load_counted(&loads, 2)).await;

        assert_eq!(*first.unwrap(), 1);
        assert_eq!(*second.unwrap(), 1);
        assert_eq!(loads.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn stale_entries_are_reloaded() {
        let cache = SnapshotCache::new(Duration::from_secs(60));
        let loads = AtomicUsize::new(0);

        cache.get_or_load("spar", || load_counted(&loads, 1)).await.unwrap();
        tokio::time::advance(Duration::from_secs(61)).await;
        let value = cache.get_or_load("spar", || load_counted(&loads, 2)).await.unwrap();

        assert_eq!(*value, 2);
        assert_eq!(loads.load(Ordering::SeqCst), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn concurrent_misses_refresh_once() {
        let cache = SnapshotCache::new(Duration::from_secs(60));
        let loads = AtomicUsize::new(0);

        let (a, b, c) = tokio::join!(
            cache.get_or_load("lidl", || load_counted(&loads, 7)),
            cache.get_or_load("lidl", || load_counted(&loads, 8)),
            cache.get_or_load("lidl", || load_counted(&loads, 9)),
        );

        assert_eq!(loads.load(Ordering::SeqCst), 1);
        assert_eq!(*a.unwrap(), 7);
        assert_eq!(*b.unwrap(), 7);
        assert_eq!(*c.unwrap(), 7);
    }

    #[tokio::test(start_paused = true)]
    async fn keys_refresh_independently() {
        let cache = SnapshotCache::new(Duration::from_secs(60));
        let loads = AtomicUsize::new(0);

        let (a, b) = tokio::join!(
            cache.get_or_load("lidl", || load_counted(&loads, 1)),
            cache.get_or_load("spar", || load_counted(&loads, 2)),
        );

        assert_eq!((*a.unwrap(), *b.unwrap()), (1, 2));
        assert_eq!(loads.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn failed_loads_are_not_cached() {
        let cache: SnapshotCache<u32> = SnapshotCache::new(Duration::from_secs(60));

        let err = cache
            .get_or_load("eurospin", || async { Err::<u32, _>("HTTP 503".to_owned()) })
            .await
            .unwrap_err();
        assert_eq!(err, "HTTP 503");

        let value = cache
            .get_or_load("eurospin", || async { Ok::<_, String>(3) })
            .await
            .unwrap();
        assert_eq!(*value, 3);
    }

    #[tokio::test]
    async fn zero_ttl_always_loads() {
        let cache = SnapshotCache::new(Duration::ZERO);
        let loads = AtomicUsize::new(0);

        for _ in 0..3 {
            cache
                .get_or_load("plodine", || async {
                    loads.fetch_add(1, Ordering::SeqCst);
                    Ok::<_, String>(0u8)
                })
                .await
                .unwrap();
        }
        assert_eq!(loads.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn clear_forces_a_reload() {
        let cache = SnapshotCache::new(Duration::from_secs(60));
        let loads = AtomicUsize::new(0);
        let load = || async {
            loads.fetch_add(1, Ordering::SeqCst);
            Ok::<_, String>(0u8)
        };

        cache.get_or_load("konzum", load).await.unwrap();
        cache.clear();
        cache.get_or_load("konzum", load).await.unwrap();
        assert_eq!(loads.load(Ordering::SeqCst), 2);
    }
}
