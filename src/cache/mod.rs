//! Content-addressed, process-lifetime caches for generated artifacts.
//!
//! Each artifact kind gets its own [`ContentCache`]. Caches are bounded LRU
//! maps, and concurrent requests for the same key share one computation.

mod key;

pub use key::{content_fingerprint, CacheKey, Operation};

use crate::error::Result;
use dashmap::DashMap;
use lru::LruCache;
use std::future::Future;
use std::hash::Hash;
use std::num::NonZeroUsize;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::debug;

/// Bounded memo table with at most one in-flight computation per key.
pub struct ContentCache<K, V> {
    name: &'static str,
    entries: Mutex<LruCache<K, V>>,
    inflight: DashMap<K, Arc<Mutex<()>>>,
}

impl<K, V> ContentCache<K, V>
where
    K: Hash + Eq + Clone + std::fmt::Display,
    V: Clone,
{
    /// Create a cache holding at most `capacity` entries.
    pub fn new(name: &'static str, capacity: usize) -> Self {
        let capacity = NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN);
        Self {
            name,
            entries: Mutex::new(LruCache::new(capacity)),
            inflight: DashMap::new(),
        }
    }

    /// Look up an entry, marking it recently used.
    pub async fn get(&self, key: &K) -> Option<V> {
        self.entries.lock().await.get(key).cloned()
    }

    /// Store an entry, evicting the least recently used one when full.
    pub async fn put(&self, key: K, value: V) {
        self.entries.lock().await.put(key, value);
    }

    pub async fn len(&self) -> usize {
        self.entries.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    /// Return the cached value for `key`, or run `compute` and cache its result.
    ///
    /// Concurrent callers with the same key wait for the first one and then
    /// read its result. Errors are returned to the caller that computed them
    /// and are not cached.
    pub async fn get_or_try_insert_with<F, Fut>(&self, key: K, compute: F) -> Result<V>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<V>>,
    {
        if let Some(value) = self.get(&key).await {
            debug!("{} cache hit: {}", self.name, key);
            return Ok(value);
        }

        let gate = self
            .inflight
            .entry(key.clone())
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone();
        // Unregisters the gate even if this future is dropped mid-computation
        let _registration = InflightRegistration {
            inflight: &self.inflight,
            key: key.clone(),
            gate: gate.clone(),
        };
        let _turn = gate.lock().await;

        // Another caller may have filled the entry while we waited
        if let Some(value) = self.get(&key).await {
            debug!("{} cache hit after wait: {}", self.name, key);
            return Ok(value);
        }

        debug!("{} cache miss: {}", self.name, key);
        let result = compute().await;
        if let Ok(value) = &result {
            self.put(key, value.clone()).await;
        }

        result
    }
}

/// Removes a key's in-flight gate when the owning request finishes or is dropped.
struct InflightRegistration<'a, K: Hash + Eq> {
    inflight: &'a DashMap<K, Arc<Mutex<()>>>,
    key: K,
    gate: Arc<Mutex<()>>,
}

impl<K: Hash + Eq> Drop for InflightRegistration<'_, K> {
    fn drop(&mut self) {
        // A newer caller may already have registered its own gate under this key
        self.inflight
            .remove_if(&self.key, |_, gate| Arc::ptr_eq(gate, &self.gate));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::StudyError;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    fn key(text: &str) -> CacheKey {
        CacheKey::new(text, Operation::Notes, None)
    }

    #[tokio::test]
    async fn test_get_put() {
        let cache: ContentCache<CacheKey, String> = ContentCache::new("notes", 4);
        assert!(cache.get(&key("a")).await.is_none());

        cache.put(key("a"), "notes for a".to_string()).await;
        assert_eq!(cache.get(&key("a")).await.as_deref(), Some("notes for a"));
        assert!(cache.get(&key("b")).await.is_none());
    }

    #[tokio::test]
    async fn test_lru_eviction() {
        let cache: ContentCache<CacheKey, u32> = ContentCache::new("notes", 2);
        cache.put(key("a"), 1).await;
        cache.put(key("b"), 2).await;
        // Touch "a" so "b" is the eviction candidate
        assert_eq!(cache.get(&key("a")).await, Some(1));
        cache.put(key("c"), 3).await;

        assert_eq!(cache.len().await, 2);
        assert_eq!(cache.get(&key("a")).await, Some(1));
        assert!(cache.get(&key("b")).await.is_none());
    }

    #[tokio::test]
    async fn test_concurrent_callers_share_one_computation() {
        let cache: ContentCache<CacheKey, String> = ContentCache::new("notes", 8);
        let computations = AtomicUsize::new(0);

        let compute = || async {
            computations.fetch_add(1, Ordering::SeqCst);
            tokio::time::sleep(Duration::from_millis(20)).await;
            Ok("shared".to_string())
        };

        let (a, b, c) = tokio::join!(
            cache.get_or_try_insert_with(key("same"), compute),
            cache.get_or_try_insert_with(key("same"), compute),
            cache.get_or_try_insert_with(key("same"), compute),
        );

        assert_eq!(a.unwrap(), "shared");
        assert_eq!(b.unwrap(), "shared");
        assert_eq!(c.unwrap(), "shared");
        assert_eq!(computations.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_cancelled_requests_release_inflight_gates() {
        let cache: Arc<ContentCache<CacheKey, String>> = Arc::new(ContentCache::new("notes", 8));

        let handles: Vec<_> = (0..20)
            .map(|i| {
                let cache = cache.clone();
                tokio::spawn(async move {
                    cache
                        .get_or_try_insert_with(key(&format!("lecture {}", i)), || {
                            std::future::pending::<Result<String>>()
                        })
                        .await
                })
            })
            .collect();

        tokio::time::sleep(Duration::from_millis(20)).await;
        assert_eq!(cache.inflight.len(), 20);

        for handle in &handles {
            handle.abort();
        }
        for handle in handles {
            assert!(handle.await.unwrap_err().is_cancelled());
        }

        assert!(cache.inflight.is_empty());
        assert!(cache.is_empty().await);
    }

    #[tokio::test]
    async fn test_finished_requests_release_inflight_gates() {
        let cache: ContentCache<CacheKey, String> = ContentCache::new("notes", 8);
        cache
            .get_or_try_insert_with(key("done"), || async { Ok("notes".to_string()) })
            .await
            .unwrap();
        assert!(cache.inflight.is_empty());
    }

    #[tokio::test]
    async fn test_errors_are_not_cached() {
        let cache: ContentCache<CacheKey, String> = ContentCache::new("notes", 8);

        let failed = cache
            .get_or_try_insert_with(key("x"), || async {
                Err(StudyError::Completion("boom".to_string()))
            })
            .await;
        assert!(failed.is_err());
        assert!(cache.is_empty().await);

        let ok = cache
            .get_or_try_insert_with(key("x"), || async { Ok("second try".to_string()) })
            .await
            .unwrap();
        assert_eq!(ok, "second try");
    }
}
