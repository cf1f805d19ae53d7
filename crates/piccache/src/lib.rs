//! # piccache
//!
//! LRU entity cache layer for the PicDB picture catalog.
//!
//! ## Architecture
//! - **LruCache**: AHash map + index-linked recency list (O(1) get/put/evict)
//! - **SharedCache**: `Arc<RwLock<_>>` handle for cross-thread use
//! - **ReadThrough**: loads misses from a backing [`Source`] and caches them
//! - **EntityCaches**: tag/group/picture caches passed to services explicitly
//!
//! A lookup of an absent key is a normal outcome reported as
//! [`Error::KeyNotFound`]; the caller fetches the value and puts it back.

#![warn(missing_docs)]

mod config;
mod context;
mod error;
mod lru;
mod read_through;
mod shared;
mod stats;

pub use config::{
    CacheConfig, EntityKind, DEFAULT_GROUP_CAPACITY, DEFAULT_PICTURE_CAPACITY,
    DEFAULT_TAG_CAPACITY,
};
pub use context::{CacheReport, EntityCaches, EntityKey};
pub use error::{Error, Result, SourceError};
pub use lru::{Capacity, LruCache};
pub use read_through::{ReadThrough, Source};
pub use shared::SharedCache;
pub use stats::CacheStats;
