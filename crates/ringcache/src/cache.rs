//! Fixed-capacity cache with least-recently-used eviction

use std::borrow::Borrow;
use std::collections::HashMap;
use std::fmt;
use std::hash::Hash;
use std::num::NonZeroUsize;

use ahash::RandomState;
use tracing::{debug, trace};

use crate::error::{Error, Result};
use crate::ring::{Handle, Ring};
use crate::stats::CacheStats;

/// Key/value pair stored in a ring node
struct Entry<K, V> {
    key: K,
    value: V,
}

/// Fixed-capacity key/value cache.
///
/// Every `set` and `get` moves the touched entry to the front of the recency
/// ring. Inserting a new key into a full cache evicts the entry at the back,
/// i.e. the one whose last touch is oldest.
pub struct Cache<K, V> {
    /// key -> ring handle; the only place keys are mapped to nodes
    index: HashMap<K, Handle, RandomState>,

    /// Entries ordered from most to least recently touched
    ring: Ring<Entry<K, V>>,

    capacity: NonZeroUsize,

    stats: CacheStats,
}

impl<K, V> Cache<K, V>
where
    K: Hash + Eq + Clone,
{
    /// Create a new cache holding at most `capacity` entries
    ///
    /// # Arguments
    /// * `capacity` - Maximum number of entries, at least 1
    ///
    /// # Returns
    /// * `Result<Cache>` - `Error::InvalidCapacity` when `capacity` is 0
    pub fn new(capacity: usize) -> Result<Self> {
        let capacity = NonZeroUsize::new(capacity).ok_or(Error::InvalidCapacity(capacity))?;
        debug!(capacity = capacity.get(), "creating cache");

        Ok(Self {
            index: HashMap::with_capacity_and_hasher(capacity.get(), RandomState::new()),
            ring: Ring::with_capacity(capacity.get()),
            capacity,
            stats: CacheStats::new(),
        })
    }

    /// Insert or update a key.
    ///
    /// An existing key has its value replaced in place and is moved to the
    /// front; the size is unchanged and nothing is evicted. A new key evicts
    /// the least recently touched entry first if the cache is full.
    pub fn set(&mut self, key: K, value: V) {
        if let Some(&handle) = self.index.get(&key) {
            if let Some(entry) = self.ring.get_mut(handle) {
                entry.value = value;
            }
            self.ring.move_to_front(handle);
            self.stats.record_update();
            return;
        }

        if self.index.len() >= self.capacity.get() {
            self.evict();
        }

        let handle = self.ring.insert_front(Entry {
            key: key.clone(),
            value,
        });
        self.index.insert(key, handle);
        self.stats.record_insert();
    }

    /// Look up a key and mark it as most recently used
    ///
    /// # Returns
    /// * `Result<&V>` - `Error::NotFound` if the key is not cached
    pub fn get<Q>(&mut self, key: &Q) -> Result<&V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let Some(&handle) = self.index.get(key) else {
            self.stats.record_miss();
            return Err(Error::NotFound);
        };

        self.ring.move_to_front(handle);
        self.stats.record_hit();
        self.ring
            .get(handle)
            .map(|entry| &entry.value)
            .ok_or(Error::NotFound)
    }

    /// Look up a key without touching its recency
    pub fn peek<Q>(&self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let handle = *self.index.get(key)?;
        self.ring.get(handle).map(|entry| &entry.value)
    }

    /// Check whether a key is cached without touching its recency
    pub fn contains<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.index.contains_key(key)
    }

    /// Remove a key, returning its value
    pub fn remove<Q>(&mut self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let handle = self.index.remove(key)?;
        self.ring.remove(handle).map(|entry| entry.value)
    }

    /// Drop every entry and reset statistics
    pub fn clear(&mut self) {
        self.index.clear();
        self.ring.clear();
        self.stats.reset();
        debug!(capacity = self.capacity.get(), "cache cleared");
    }

    /// Drop the least recently touched entry from the ring and the index together
    fn evict(&mut self) {
        if let Some(entry) = self.ring.remove_back() {
            self.index.remove(&entry.key);
            self.stats.record_eviction();
            trace!(len = self.index.len(), "evicted least recently used entry");
        }
    }
}

impl<K, V> Cache<K, V> {
    /// Get the number of cached entries
    pub fn len(&self) -> usize {
        self.index.len()
    }

    /// Check if the cache is empty
    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    /// Get the maximum number of entries
    pub fn capacity(&self) -> usize {
        self.capacity.get()
    }

    /// Most recently touched entry
    pub fn front(&self) -> Option<(&K, &V)> {
        let handle = self.ring.front()?;
        self.ring.get(handle).map(|entry| (&entry.key, &entry.value))
    }

    /// Least recently touched entry, the next to be evicted
    pub fn back(&self) -> Option<(&K, &V)> {
        let handle = self.ring.back()?;
        self.ring.get(handle).map(|entry| (&entry.key, &entry.value))
    }

    /// Iterate entries from most to least recently touched
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = (&K, &V)> + ExactSizeIterator + '_ {
        self.ring.iter().map(|entry| (&entry.key, &entry.value))
    }

    /// Iterate keys from most to least recently touched
    pub fn keys(&self) -> impl DoubleEndedIterator<Item = &K> + ExactSizeIterator + '_ {
        self.ring.iter().map(|entry| &entry.key)
    }

    /// Get cache statistics
    pub fn stats(&self) -> &CacheStats {
        &self.stats
    }
}

impl<K: fmt::Debug, V: fmt::Debug> fmt::Debug for Cache<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Cache")
            .field("capacity", &self.capacity)
            .field("len", &self.index.len())
            .field("entries", &DebugEntries(self))
            .finish()
    }
}

struct DebugEntries<'a, K, V>(&'a Cache<K, V>);

impl<K: fmt::Debug, V: fmt::Debug> fmt::Debug for DebugEntries<'_, K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.0.iter()).finish()
    }
}
