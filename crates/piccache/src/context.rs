//! Entity caches of the picture catalog
//!
//! One context owns the tag, group and picture caches and is handed to the
//! services that need them. Clones share the same caches.

use serde::Serialize;
use tracing::info;

use crate::config::{CacheConfig, EntityKind};
use crate::lru::Capacity;
use crate::shared::SharedCache;
use crate::stats::CacheStats;

/// Database row id of a catalog entity
pub type EntityKey = i64;

/// Tag, group and picture caches keyed by row id
pub struct EntityCaches<T, G, P> {
    tags: SharedCache<EntityKey, T>,
    groups: SharedCache<EntityKey, G>,
    pictures: SharedCache<EntityKey, P>,
}

impl<T, G, P> Clone for EntityCaches<T, G, P> {
    fn clone(&self) -> Self {
        Self {
            tags: self.tags.clone(),
            groups: self.groups.clone(),
            pictures: self.pictures.clone(),
        }
    }
}

impl<T: Clone, G: Clone, P: Clone> EntityCaches<T, G, P> {
    /// Create empty caches sized by `config`
    pub fn new(config: &CacheConfig) -> Self {
        let caches = Self {
            tags: SharedCache::new(config.capacity_for(EntityKind::Tag)),
            groups: SharedCache::new(config.capacity_for(EntityKind::Group)),
            pictures: SharedCache::new(config.capacity_for(EntityKind::Picture)),
        };

        info!(
            tags = %caches.tags.capacity(),
            groups = %caches.groups.capacity(),
            pictures = %caches.pictures.capacity(),
            "entity caches initialized"
        );
        caches
    }

    /// Tag cache
    pub fn tags(&self) -> &SharedCache<EntityKey, T> {
        &self.tags
    }

    /// Group cache
    pub fn groups(&self) -> &SharedCache<EntityKey, G> {
        &self.groups
    }

    /// Picture cache
    pub fn pictures(&self) -> &SharedCache<EntityKey, P> {
        &self.pictures
    }

    /// Empty every cache and reset its statistics
    pub fn clear_all(&self) {
        self.tags.clear();
        self.groups.clear();
        self.pictures.clear();
    }

    /// Snapshot of every cache's size and counters
    pub fn report(&self) -> Vec<CacheReport> {
        vec![
            CacheReport::new(
                EntityKind::Tag,
                self.tags.capacity(),
                self.tags.len(),
                self.tags.stats(),
            ),
            CacheReport::new(
                EntityKind::Group,
                self.groups.capacity(),
                self.groups.len(),
                self.groups.stats(),
            ),
            CacheReport::new(
                EntityKind::Picture,
                self.pictures.capacity(),
                self.pictures.len(),
                self.pictures.stats(),
            ),
        ]
    }
}

/// Size and counters of one cache at a point in time
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CacheReport {
    /// Cache name
    pub name: String,
    /// Entry limit, `None` when unbounded
    pub capacity: Option<usize>,
    /// Current number of entries
    pub len: usize,
    /// Counters
    pub stats: CacheStats,
    /// Hit ratio (0.0 to 1.0)
    pub hit_ratio: f64,
}

impl CacheReport {
    /// Build a report from a cache's capacity, size and counters
    pub fn new(name: impl ToString, capacity: Capacity, len: usize, stats: CacheStats) -> Self {
        Self {
            name: name.to_string(),
            capacity: capacity.limit(),
            len,
            stats,
            hit_ratio: stats.hit_ratio(),
        }
    }
}
