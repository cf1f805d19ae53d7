//! Entity cache configuration
//!
//! ```yaml
//! # cache.yaml
//! tags: 2000
//! groups: 2000
//! pictures: 20000   # negative = unbounded
//! ```

use std::fmt;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::lru::Capacity;

/// Default tag cache size
pub const DEFAULT_TAG_CAPACITY: i64 = 2000;

/// Default group cache size
pub const DEFAULT_GROUP_CAPACITY: i64 = 2000;

/// Default picture cache size
pub const DEFAULT_PICTURE_CAPACITY: i64 = 20000;

/// Kind of catalog entity held by a cache
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntityKind {
    /// Tags attached to pictures
    Tag,
    /// Hierarchical picture groups
    Group,
    /// Imported pictures
    Picture,
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EntityKind::Tag => write!(f, "tag"),
            EntityKind::Group => write!(f, "group"),
            EntityKind::Picture => write!(f, "picture"),
        }
    }
}

/// Capacities of the entity caches
///
/// Values are signed; a negative capacity disables eviction for that cache.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CacheConfig {
    /// Tag cache capacity
    pub tags: i64,
    /// Group cache capacity
    pub groups: i64,
    /// Picture cache capacity
    pub pictures: i64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            tags: DEFAULT_TAG_CAPACITY,
            groups: DEFAULT_GROUP_CAPACITY,
            pictures: DEFAULT_PICTURE_CAPACITY,
        }
    }
}

impl CacheConfig {
    /// Parse configuration from a YAML document
    pub fn from_yaml_str(content: &str) -> Result<Self> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_str(content)?)
    }

    /// Load configuration from a YAML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Self::from_yaml_str(&content)
    }

    /// Capacity policy for the given entity cache
    pub fn capacity_for(&self, kind: EntityKind) -> Capacity {
        let raw = match kind {
            EntityKind::Tag => self.tags,
            EntityKind::Group => self.groups,
            EntityKind::Picture => self.pictures,
        };
        Capacity::from_signed(raw)
    }
}
