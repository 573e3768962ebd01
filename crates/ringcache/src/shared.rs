//! Thread-safe handle around [`Cache`]
//!
//! Reads reorder the recency ring, so there is no reader/writer split: one
//! mutex guards the index and the ring together.

use std::borrow::Borrow;
use std::hash::Hash;
use std::sync::Arc;

use parking_lot::Mutex;

use crate::cache::Cache;
use crate::error::Result;

/// Cloneable, shareable cache handle
pub struct SharedCache<K, V> {
    inner: Arc<Mutex<Cache<K, V>>>,
}

impl<K, V> SharedCache<K, V>
where
    K: Hash + Eq + Clone,
{
    /// Create a new shared cache holding at most `capacity` entries
    pub fn new(capacity: usize) -> Result<Self> {
        Ok(Self::from(Cache::new(capacity)?))
    }

    /// Insert or update a key
    pub fn set(&self, key: K, value: V) {
        self.inner.lock().set(key, value);
    }

    /// Look up a key, mark it as most recently used and return a copy of its value
    pub fn get<Q>(&self, key: &Q) -> Result<V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
        V: Clone,
    {
        self.inner.lock().get(key).cloned()
    }

    /// Check whether a key is cached without touching its recency
    pub fn contains<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.inner.lock().contains(key)
    }

    /// Remove a key, returning its value
    pub fn remove<Q>(&self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.inner.lock().remove(key)
    }

    /// Drop every entry
    pub fn clear(&self) {
        self.inner.lock().clear();
    }
}

impl<K, V> SharedCache<K, V> {
    /// Get the number of cached entries
    pub fn len(&self) -> usize {
        self.inner.lock().len()
    }

    /// Check if the cache is empty
    pub fn is_empty(&self) -> bool {
        self.inner.lock().is_empty()
    }

    /// Get the maximum number of entries
    pub fn capacity(&self) -> usize {
        self.inner.lock().capacity()
    }

    /// Run several operations under one lock acquisition
    pub fn with<R>(&self, f: impl FnOnce(&mut Cache<K, V>) -> R) -> R {
        f(&mut self.inner.lock())
    }
}

impl<K, V> From<Cache<K, V>> for SharedCache<K, V> {
    fn from(cache: Cache<K, V>) -> Self {
        Self {
            inner: Arc::new(Mutex::new(cache)),
        }
    }
}

impl<K, V> Clone for SharedCache<K, V> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}
