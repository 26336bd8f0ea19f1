//! Shared Cache Module
//!
//! Thread-safe façade over [`CacheStore`]. Every operation holds one
//! cache-wide lock for its full duration, so operations are linearizable
//! against each other and never observe a half-updated index or ordering.

use std::borrow::Borrow;
use std::collections::HashSet;
use std::hash::Hash;
use std::time::Duration;

use parking_lot::Mutex;

use crate::cache::{CacheStats, CacheStore};
use crate::config::{CacheConfig, EvictionPolicy};
use crate::error::{InvariantError, Result};

// == Cache ==
/// Bounded LRU/LFU cache safe to share between threads (wrap it in an `Arc`).
///
/// # Example
/// ```
/// use mini_cache::{Cache, CacheConfig};
///
/// let cache = Cache::new(CacheConfig::lru(2));
/// cache.set("a", 1);
/// cache.set("b", 2);
/// cache.set("c", 3); // evicts "a"
///
/// assert_eq!(cache.get(&"a"), None);
/// assert_eq!(cache.get(&"c"), Some(3));
/// ```
#[derive(Debug)]
pub struct Cache<K, V> {
    inner: Mutex<CacheStore<K, V>>,
}

impl<K, V> Cache<K, V>
where
    K: Hash + Eq + Clone,
    V: Clone,
{
    pub fn new(config: CacheConfig) -> Self {
        Self {
            inner: Mutex::new(CacheStore::new(config)),
        }
    }

    /// Builds a cache from `CACHE_*` environment variables.
    pub fn from_env() -> Result<Self> {
        Ok(Self::new(CacheConfig::from_env()?))
    }

    pub fn set(&self, key: K, value: V) {
        self.inner.lock().set(key, value);
    }

    pub fn set_with_ttl(&self, key: K, value: V, ttl: Duration) {
        self.inner.lock().set_with_ttl(key, value, ttl);
    }

    pub fn get<Q>(&self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.inner.lock().get(key)
    }

    pub fn invalidate<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.inner.lock().invalidate(key)
    }

    pub fn evict<Q>(&self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.inner.lock().evict(key)
    }

    pub fn contains_key<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.inner.lock().contains_key(key)
    }

    pub fn ttl_remaining<Q>(&self, key: &Q) -> Option<Duration>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.inner.lock().ttl_remaining(key)
    }

    pub fn len(&self) -> usize {
        self.inner.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.lock().is_empty()
    }

    pub fn keys(&self) -> HashSet<K> {
        self.inner.lock().keys()
    }

    pub fn values(&self) -> Vec<V> {
        self.inner.lock().values()
    }

    pub fn to_list(&self) -> Vec<(K, V)> {
        self.inner.lock().to_list()
    }

    /// See [`CacheStore::top_k`].
    pub fn top_k(&self, k: usize) -> Result<Vec<(K, V)>> {
        self.inner.lock().top_k(k)
    }

    pub fn purge_expired(&self) -> usize {
        self.inner.lock().purge_expired()
    }

    pub fn clear(&self) {
        self.inner.lock().clear();
    }

    pub fn stats(&self) -> CacheStats {
        self.inner.lock().stats()
    }

    pub fn capacity(&self) -> usize {
        self.inner.lock().capacity()
    }

    pub fn policy(&self) -> EvictionPolicy {
        self.inner.lock().policy()
    }

    pub fn check_invariants(&self) -> std::result::Result<(), InvariantError> {
        self.inner.lock().check_invariants()
    }
}

impl<K, V> From<CacheStore<K, V>> for Cache<K, V> {
    fn from(store: CacheStore<K, V>) -> Self {
        Self {
            inner: Mutex::new(store),
        }
    }
}
