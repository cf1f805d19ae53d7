//! Thread-safe handle around an [`LruCache`]

use std::borrow::Borrow;
use std::hash::Hash;
use std::sync::Arc;

use parking_lot::RwLock;

use crate::error::Result;
use crate::lru::{Capacity, LruCache};
use crate::stats::CacheStats;

/// Cloneable, lock-guarded LRU cache
///
/// Clones share the same underlying cache. Every operation holds the lock
/// for its whole critical section. Lookups take the write lock since a hit
/// updates recency and counters.
pub struct SharedCache<K, V> {
    inner: Arc<RwLock<LruCache<K, V>>>,
}

impl<K, V> Clone for SharedCache<K, V> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<K, V> SharedCache<K, V>
where
    K: Hash + Eq + Clone,
    V: Clone,
{
    /// Create a shared cache with the given capacity policy
    pub fn new(capacity: Capacity) -> Self {
        Self::from_cache(LruCache::with_capacity(capacity))
    }

    /// Wrap an existing cache
    pub fn from_cache(cache: LruCache<K, V>) -> Self {
        Self {
            inner: Arc::new(RwLock::new(cache)),
        }
    }

    /// Insert or overwrite a value
    pub fn put(&self, key: K, value: V) {
        self.inner.write().put(key, value);
    }

    /// Look up a value, returning a clone on hit
    pub fn get<Q>(&self, key: &Q) -> Result<V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.inner.write().get(key).cloned()
    }

    /// Check presence without touching stats or recency
    pub fn contains<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.inner.read().contains(key)
    }

    /// Remove a key
    pub fn remove<Q>(&self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.inner.write().remove(key)
    }

    /// Current number of entries
    pub fn len(&self) -> usize {
        self.inner.read().len()
    }

    /// Check if the cache is empty
    pub fn is_empty(&self) -> bool {
        self.inner.read().is_empty()
    }

    /// Capacity policy
    pub fn capacity(&self) -> Capacity {
        self.inner.read().capacity()
    }

    /// Snapshot of the counters
    pub fn stats(&self) -> CacheStats {
        self.inner.read().stats()
    }

    /// Drop all entries and reset statistics
    pub fn clear(&self) {
        self.inner.write().clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    #[test]
    fn test_clones_share_state() {
        let cache = SharedCache::new(Capacity::Bounded(2));
        let other = cache.clone();

        cache.put(1, "a".to_string());
        assert_eq!(other.get(&1).unwrap(), "a");
        assert_eq!(cache.stats().hits(), 1);
        assert!(other.get(&2).unwrap_err().is_not_found());
        assert_eq!(cache.stats().misses(), 1);
    }

    #[test]
    fn test_clear_resets() {
        let cache = SharedCache::new(Capacity::Bounded(3));
        for i in 0..3 {
            cache.put(i, i);
        }
        cache.get(&0).unwrap();
        cache.clear();

        assert!(cache.is_empty());
        assert_eq!(cache.stats(), CacheStats::default());
    }

    #[test]
    fn test_concurrent_access_respects_capacity() {
        let cache = SharedCache::new(Capacity::Bounded(64));

        let handles: Vec<_> = (0..4)
            .map(|t| {
                let cache = cache.clone();
                thread::spawn(move || {
                    for i in 0..1_000u64 {
                        let key = t * 1_000 + i;
                        cache.put(key, key);
                        let _ = cache.get(&key);
                        assert!(cache.len() <= 64);
                    }
                })
            })
            .collect();

        for handle in handles {
            handle.join().unwrap();
        }

        let stats = cache.stats();
        assert_eq!(cache.len(), 64);
        assert_eq!(stats.hits() + stats.misses(), 4_000);
        assert_eq!(stats.inserts(), 4_000);
    }
}
