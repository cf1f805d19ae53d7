//! LRU (Least Recently Used) cache implementation
//!
//! Recency is an index-linked list over a slab of nodes, so refreshing a key
//! and evicting the tail are both O(1). The head is the most recently used
//! key, the tail is the next eviction candidate.

use std::borrow::Borrow;
use std::collections::HashMap;
use std::fmt;
use std::hash::Hash;

use ahash::RandomState;

use crate::error::{Error, Result};
use crate::stats::CacheStats;

/// Upper bound on slots reserved up front for a bounded cache
const MAX_PREALLOC: usize = 4096;

/// Capacity policy of an [`LruCache`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Capacity {
    /// Keep at most this many entries, evicting the least recently used
    Bounded(usize),

    /// Never evict; recency is not tracked
    Unbounded,
}

impl Capacity {
    /// Interpret a signed capacity: negative values mean unbounded
    ///
    /// Positive values beyond `usize::MAX` saturate.
    pub fn from_signed(capacity: i64) -> Self {
        if capacity < 0 {
            return Capacity::Unbounded;
        }
        Capacity::Bounded(usize::try_from(capacity).unwrap_or(usize::MAX))
    }

    /// Whether eviction and recency tracking are enabled
    pub fn is_bounded(&self) -> bool {
        matches!(self, Capacity::Bounded(_))
    }

    /// Entry limit, `None` when unbounded
    pub fn limit(&self) -> Option<usize> {
        match self {
            Capacity::Bounded(limit) => Some(*limit),
            Capacity::Unbounded => None,
        }
    }
}

impl From<usize> for Capacity {
    fn from(capacity: usize) -> Self {
        Capacity::Bounded(capacity)
    }
}

impl fmt::Display for Capacity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Capacity::Bounded(limit) => write!(f, "{}", limit),
            Capacity::Unbounded => write!(f, "unbounded"),
        }
    }
}

/// Node in the LRU doubly-linked list
struct Node<K, V> {
    key: K,
    value: V,
    prev: Option<usize>,
    next: Option<usize>,
}

/// Keyed store with least-recently-used eviction and hit/miss accounting
///
/// Misses are reported as [`Error::KeyNotFound`]; the cache never populates
/// itself; callers fetch the value elsewhere and [`put`](Self::put) it.
///
/// # Examples
///
/// ```
/// use piccache::LruCache;
///
/// let mut cache = LruCache::new(2);
/// cache.put(1, "a");
/// cache.put(2, "b");
/// cache.put(3, "c");
///
/// assert!(cache.get(&1).is_err());
/// assert_eq!(cache.get(&3).unwrap(), &"c");
/// assert_eq!((cache.hits(), cache.misses()), (1, 1));
/// ```
pub struct LruCache<K, V> {
    map: HashMap<K, usize, RandomState>,
    nodes: Vec<Option<Node<K, V>>>,
    head: Option<usize>,
    tail: Option<usize>,
    free_list: Vec<usize>,
    capacity: Capacity,
    stats: CacheStats,
}

impl<K, V> LruCache<K, V>
where
    K: Hash + Eq + Clone,
{
    /// Create a bounded LRU cache holding at most `capacity` entries
    ///
    /// A capacity of 0 is valid and retains nothing.
    pub fn new(capacity: usize) -> Self {
        Self::with_capacity(Capacity::Bounded(capacity))
    }

    /// Create a cache that never evicts
    pub fn unbounded() -> Self {
        Self::with_capacity(Capacity::Unbounded)
    }

    /// Create a cache from a signed capacity, negative meaning unbounded
    pub fn from_signed(capacity: i64) -> Self {
        Self::with_capacity(Capacity::from_signed(capacity))
    }

    /// Create a cache with an explicit capacity policy
    pub fn with_capacity(capacity: Capacity) -> Self {
        let reserve = capacity.limit().unwrap_or(0).min(MAX_PREALLOC);

        Self {
            map: HashMap::with_capacity_and_hasher(reserve, RandomState::new()),
            nodes: Vec::with_capacity(reserve),
            head: None,
            tail: None,
            free_list: Vec::new(),
            capacity,
            stats: CacheStats::new(),
        }
    }

    /// Insert or overwrite the value for `key`
    ///
    /// In bounded mode the key becomes the most recently used one and the
    /// least recently used entries are evicted until the bound holds again.
    pub fn put(&mut self, key: K, value: V) {
        self.stats.record_insert();

        if let Some(&idx) = self.map.get(&key) {
            if let Some(node) = &mut self.nodes[idx] {
                node.value = value;
            }
            if self.capacity.is_bounded() {
                self.move_to_front(idx);
            }
            return;
        }

        let idx = self.alloc_node();
        self.nodes[idx] = Some(Node {
            key: key.clone(),
            value,
            prev: None,
            next: None,
        });
        self.map.insert(key, idx);

        if let Capacity::Bounded(limit) = self.capacity {
            self.push_front(idx);
            while self.map.len() > limit {
                if !self.evict() {
                    break;
                }
            }
        }
    }

    /// Look up `key`, counting a hit or a miss
    ///
    /// A hit refreshes the key's recency. A miss returns
    /// [`Error::KeyNotFound`]. Lookups never evict.
    pub fn get<Q>(&mut self, key: &Q) -> Result<&V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let idx = match self.map.get(key) {
            Some(&idx) => idx,
            None => {
                self.stats.record_miss();
                return Err(Error::KeyNotFound);
            }
        };

        self.stats.record_hit();
        if self.capacity.is_bounded() {
            self.move_to_front(idx);
        }
        self.nodes[idx]
            .as_ref()
            .map(|node| &node.value)
            .ok_or(Error::KeyNotFound)
    }

    /// Check whether `key` is stored without touching stats or recency
    pub fn contains<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.map.contains_key(key)
    }

    /// Read the value for `key` without touching stats or recency
    pub fn peek<Q>(&self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let idx = *self.map.get(key)?;
        self.nodes[idx].as_ref().map(|node| &node.value)
    }

    /// Remove a key from the cache
    pub fn remove<Q>(&mut self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let idx = self.map.remove(key)?;
        if self.capacity.is_bounded() {
            self.unlink(idx);
        }
        let node = self.nodes[idx].take();
        self.free_node(idx);
        node.map(|node| node.value)
    }

    /// Get the current number of entries
    pub fn len(&self) -> usize {
        self.map.len()
    }

    /// Check if the cache is empty
    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    /// Get the capacity policy
    pub fn capacity(&self) -> Capacity {
        self.capacity
    }

    /// Hits since construction or the last [`clear`](Self::clear)
    pub fn hits(&self) -> u64 {
        self.stats.hits()
    }

    /// Misses since construction or the last [`clear`](Self::clear)
    pub fn misses(&self) -> u64 {
        self.stats.misses()
    }

    /// Snapshot of all counters
    pub fn stats(&self) -> CacheStats {
        self.stats
    }

    /// Drop all entries and reset statistics
    pub fn clear(&mut self) {
        self.map.clear();
        self.nodes.clear();
        self.free_list.clear();
        self.head = None;
        self.tail = None;
        self.stats.reset();
    }

    /// Iterate over stored keys
    ///
    /// Order follows the underlying hash map and says nothing about recency.
    pub fn keys(&self) -> impl Iterator<Item = &K> + '_ {
        self.map.keys()
    }

    /// Iterate over stored entries, in the same order as [`keys`](Self::keys)
    pub fn iter(&self) -> impl Iterator<Item = (&K, &V)> + '_ {
        self.map
            .iter()
            .filter_map(|(key, &idx)| self.nodes[idx].as_ref().map(|node| (key, &node.value)))
    }

    fn move_to_front(&mut self, idx: usize) {
        if self.head == Some(idx) {
            return; // Already at front
        }

        self.unlink(idx);
        self.push_front(idx);
    }

    fn push_front(&mut self, idx: usize) {
        if let Some(node) = &mut self.nodes[idx] {
            node.prev = None;
            node.next = self.head;
        }

        if let Some(head_idx) = self.head {
            if let Some(head) = &mut self.nodes[head_idx] {
                head.prev = Some(idx);
            }
        }

        self.head = Some(idx);
        if self.tail.is_none() {
            self.tail = Some(idx);
        }
    }

    fn unlink(&mut self, idx: usize) {
        let (prev, next) = match &mut self.nodes[idx] {
            Some(node) => (node.prev.take(), node.next.take()),
            None => return,
        };

        match prev {
            Some(prev_idx) => {
                if let Some(prev_node) = &mut self.nodes[prev_idx] {
                    prev_node.next = next;
                }
            }
            None => {
                self.head = next;
            }
        }

        match next {
            Some(next_idx) => {
                if let Some(next_node) = &mut self.nodes[next_idx] {
                    next_node.prev = prev;
                }
            }
            None => {
                self.tail = prev;
            }
        }
    }

    /// Drop the tail entry. Returns false when the list is empty.
    fn evict(&mut self) -> bool {
        let Some(tail_idx) = self.tail else {
            return false;
        };

        self.unlink(tail_idx);
        if let Some(node) = self.nodes[tail_idx].take() {
            self.map.remove(&node.key);
        }
        self.free_node(tail_idx);
        self.stats.record_eviction();
        true
    }

    fn alloc_node(&mut self) -> usize {
        if let Some(idx) = self.free_list.pop() {
            idx
        } else {
            let idx = self.nodes.len();
            self.nodes.push(None);
            idx
        }
    }

    fn free_node(&mut self, idx: usize) {
        self.free_list.push(idx);
    }

    /// Keys from most to least recently used (bounded mode only)
    #[cfg(test)]
    pub(crate) fn recency(&self) -> Vec<K> {
        let mut keys = Vec::with_capacity(self.len());
        let mut cursor = self.head;
        while let Some(idx) = cursor {
            let node = self.nodes[idx].as_ref().expect("linked slot is occupied");
            keys.push(node.key.clone());
            cursor = node.next;
        }
        keys
    }

    #[cfg(test)]
    pub(crate) fn check_invariants(&self) {
        let occupied = self.nodes.iter().filter(|slot| slot.is_some()).count();
        assert_eq!(occupied, self.map.len(), "slab and map disagree");
        assert_eq!(
            self.nodes.len(),
            occupied + self.free_list.len(),
            "free list leaks slots"
        );

        for (key, &idx) in &self.map {
            let node = self.nodes[idx].as_ref().expect("mapped slot is occupied");
            assert!(node.key == *key, "slot holds a different key");
        }

        match self.capacity {
            Capacity::Bounded(limit) => {
                assert!(self.map.len() <= limit, "capacity exceeded");
                let recency = self.recency();
                assert_eq!(recency.len(), self.map.len(), "recency and map disagree");
                for key in &recency {
                    assert!(self.map.contains_key(key), "recency holds a stale key");
                }
                assert_eq!(self.head.is_none(), self.tail.is_none());
            }
            Capacity::Unbounded => {
                assert!(self.head.is_none() && self.tail.is_none());
            }
        }
    }
}

impl<K, V> fmt::Debug for LruCache<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LruCache")
            .field("len", &self.map.len())
            .field("capacity", &self.capacity)
            .field("stats", &self.stats)
            .finish()
    }
}


#[cfg(test)]
mod property_tests {
    use super::LruCache;
    use proptest::prelude::*;
    use std::collections::HashMap as StdHashMap;

    #[derive(Debug, Clone)]
    enum Operation {
        Put(i8, u16),
        Get(i8),
        Contains(i8),
        Remove(i8),
        Clear,
    }

    fn operation_strategy() -> impl Strategy<Value = Operation> {
        prop_oneof![
            6 => (any::<i8>(), any::<u16>()).prop_map(|(k, v)| Operation::Put(k % 8, v)),
            6 => any::<i8>().prop_map(|k| Operation::Get(k % 8)),
            2 => any::<i8>().prop_map(|k| Operation::Contains(k % 8)),
            2 => any::<i8>().prop_map(|k| Operation::Remove(k % 8)),
            1 => Just(Operation::Clear),
        ]
    }

    /// Straightforward list-based model: most recently used first.
    #[derive(Default)]
    struct Model {
        limit: usize,
        store: StdHashMap<i8, u16>,
        usage: Vec<i8>,
        hits: u64,
        misses: u64,
    }

    impl Model {
        fn touch(&mut self, key: i8) {
            self.usage.retain(|k| *k != key);
            self.usage.insert(0, key);
            while self.usage.len() > self.limit {
                if let Some(old) = self.usage.pop() {
                    self.store.remove(&old);
                }
            }
        }
    }

    proptest! {
        /// len() never exceeds capacity.
        #[test]
        fn prop_len_within_capacity(
            capacity in 0usize..20,
            keys in prop::collection::vec(any::<u32>(), 0..200)
        ) {
            let mut cache = LruCache::new(capacity);
            for key in keys {
                cache.put(key, ());
                prop_assert!(cache.len() <= capacity);
            }
        }

        /// Distinct keys never read back keep exactly the newest `capacity`.
        #[test]
        fn prop_eviction_keeps_newest(capacity in 0usize..20, extra in 1usize..30) {
            let total = capacity + extra;
            let mut cache = LruCache::new(capacity);
            for key in 0..total {
                cache.put(key, key);
            }
            prop_assert_eq!(cache.len(), capacity);
            for key in 0..total {
                prop_assert_eq!(cache.contains(&key), key >= total - capacity);
            }
        }

        /// put followed by get returns the stored value.
        #[test]
        fn prop_put_get_round_trip(key in any::<String>(), value in any::<Vec<u8>>()) {
            let mut cache = LruCache::new(3);
            cache.put(key.clone(), value.clone());
            prop_assert_eq!(cache.len(), 1);
            prop_assert_eq!(cache.get(&key).unwrap(), &value);
            prop_assert_eq!(cache.hits(), 1);
            prop_assert_eq!(cache.misses(), 0);
        }

        /// Arbitrary operation sequences agree with the list model.
        #[test]
        fn prop_matches_model(
            capacity in 0usize..6,
            ops in prop::collection::vec(operation_strategy(), 0..200)
        ) {
            let mut cache = LruCache::new(capacity);
            let mut model = Model { limit: capacity, ..Model::default() };

            for op in ops {
                match op {
                    Operation::Put(k, v) => {
                        cache.put(k, v);
                        model.store.insert(k, v);
                        model.touch(k);
                    }
                    Operation::Get(k) => {
                        let actual = cache.get(&k).ok().copied();
                        let expected = model.store.get(&k).copied();
                        if expected.is_some() {
                            model.hits += 1;
                            model.touch(k);
                        } else {
                            model.misses += 1;
                        }
                        prop_assert_eq!(actual, expected);
                    }
                    Operation::Contains(k) => {
                        prop_assert_eq!(cache.contains(&k), model.store.contains_key(&k));
                    }
                    Operation::Remove(k) => {
                        prop_assert_eq!(cache.remove(&k), model.store.remove(&k));
                        model.usage.retain(|key| *key != k);
                    }
                    Operation::Clear => {
                        cache.clear();
                        model = Model { limit: capacity, ..Model::default() };
                    }
                }

                cache.check_invariants();
                prop_assert_eq!(cache.recency(), model.usage.clone());
                prop_assert_eq!(cache.hits(), model.hits);
                prop_assert_eq!(cache.misses(), model.misses);
            }
        }

        /// Unbounded caches never evict regardless of operation mix.
        #[test]
        fn prop_unbounded_never_evicts(
            ops in prop::collection::vec(operation_strategy(), 0..200)
        ) {
            let mut cache = LruCache::unbounded();
            let mut store = StdHashMap::new();

            for op in ops {
                match op {
                    Operation::Put(k, v) => {
                        cache.put(k, v);
                        store.insert(k, v);
                    }
                    Operation::Get(k) => {
                        prop_assert_eq!(cache.get(&k).ok().copied(), store.get(&k).copied());
                    }
                    Operation::Contains(k) => {
                        prop_assert_eq!(cache.contains(&k), store.contains_key(&k));
                    }
                    Operation::Remove(k) => {
                        prop_assert_eq!(cache.remove(&k), store.remove(&k));
                    }
                    Operation::Clear => {
                        cache.clear();
                        store.clear();
                    }
                }
                cache.check_invariants();
                prop_assert_eq!(cache.len(), store.len());
                prop_assert_eq!(cache.stats().evictions(), 0);
            }
        }
    }
}
