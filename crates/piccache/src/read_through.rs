//! Read-through cache in front of a backing source
//!
//! On a miss the value is loaded from the [`Source`], cached and returned.
//! This is the lookup sequence the persistence layer runs for tags, groups
//! and pictures.

use std::hash::Hash;

use tracing::{debug, trace};

use crate::error::{Error, Result};
use crate::lru::Capacity;
use crate::shared::SharedCache;
use crate::stats::CacheStats;

/// Backing store consulted on cache misses
pub trait Source {
    /// Lookup key
    type Key: Hash + Eq + Clone;

    /// Loaded value
    type Value: Clone;

    /// Load the value for `key`, `Ok(None)` if the source does not know it
    fn load(&self, key: &Self::Key) -> Result<Option<Self::Value>>;
}

/// Cache layer combining an LRU cache with a backing [`Source`]
pub struct ReadThrough<S: Source> {
    /// Backing source
    source: S,

    /// LRU cache for hot entities
    cache: SharedCache<S::Key, S::Value>,
}

impl<S: Source> ReadThrough<S> {
    /// Create a read-through cache over `source`
    pub fn new(source: S, capacity: Capacity) -> Self {
        Self::with_cache(source, SharedCache::new(capacity))
    }

    /// Use an existing (possibly shared) cache
    pub fn with_cache(source: S, cache: SharedCache<S::Key, S::Value>) -> Self {
        Self { source, cache }
    }

    /// Get a value from the cache, loading it from the source on a miss
    ///
    /// # Returns
    /// * `Ok(value)` - cached or freshly loaded value
    /// * `Err(Error::KeyNotFound)` - unknown to the source; nothing is cached
    /// * `Err(_)` - source failure, propagated unchanged
    pub fn get(&self, key: &S::Key) -> Result<S::Value> {
        match self.cache.get(key) {
            Ok(value) => {
                trace!("cache hit");
                return Ok(value);
            }
            Err(Error::KeyNotFound) => {}
            Err(e) => return Err(e),
        }

        debug!("cache miss, loading from source");
        let value = self.source.load(key)?.ok_or(Error::KeyNotFound)?;
        self.cache.put(key.clone(), value.clone());

        Ok(value)
    }

    /// Replace the cached value after it changed in the source
    pub fn refresh(&self, key: S::Key, value: S::Value) {
        self.cache.put(key, value);
    }

    /// Drop a cached value after it was deleted from the source
    pub fn invalidate(&self, key: &S::Key) -> Option<S::Value> {
        self.cache.remove(key)
    }

    /// Clear the cache (source remains unchanged)
    pub fn clear_cache(&self) {
        self.cache.clear();
    }

    /// Get cache statistics
    pub fn stats(&self) -> CacheStats {
        self.cache.stats()
    }

    /// Get current cache size
    pub fn cache_len(&self) -> usize {
        self.cache.len()
    }

    /// Get cache capacity
    pub fn capacity(&self) -> Capacity {
        self.cache.capacity()
    }

    /// Access the backing source
    pub fn source(&self) -> &S {
        &self.source
    }
}
