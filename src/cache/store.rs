//! Cache Store Module
//!
//! Main cache engine combining a HashMap index with a policy-specific
//! ordering structure and lazy TTL expiration. Single-threaded: every
//! operation takes `&mut self`; see [`Cache`](crate::cache::Cache) for the
//! shared, locked variant.

use std::borrow::Borrow;
use std::collections::{HashMap, HashSet};
use std::hash::Hash;
use std::time::{Duration, Instant};

use tracing::{debug, trace};

use crate::cache::arena::NodeId;
use crate::cache::tracker::Tracker;
use crate::cache::{CacheEntry, CacheStats};
use crate::config::{CacheConfig, EvictionPolicy};
use crate::error::{CacheError, InvariantError, Result};

/// Upper bound on the up-front allocation for large capacities.
const PREALLOC_LIMIT: usize = 4096;

// == Cache Store ==
/// Bounded cache storage with LRU or LFU eviction and TTL support.
///
/// Expired entries are not removed by a timer. They stay resident until an
/// operation observes them: `get` and `set` reconcile the entry they touch,
/// while `len`, `is_empty`, `keys`, `values`, `to_list` and `top_k` sweep
/// the whole cache first. Every expiry-driven removal is counted as an
/// eviction. Explicit removal never touches the statistics.
#[derive(Debug)]
pub struct CacheStore<K, V> {
    /// Key to arena slot
    index: HashMap<K, NodeId>,
    /// Policy ordering over the resident entries
    tracker: Tracker<K, V>,
    /// Performance statistics
    stats: CacheStats,
    /// Maximum number of entries allowed
    capacity: usize,
    /// TTL for entries stored without an explicit one
    default_ttl: Option<Duration>,
    refresh_ttl_on_read: bool,
}

impl<K, V> CacheStore<K, V>
where
    K: Hash + Eq + Clone,
    V: Clone,
{
    // == Constructor ==
    /// Creates a new CacheStore from a validated configuration.
    pub fn new(config: CacheConfig) -> Self {
        let prealloc = config.capacity.min(PREALLOC_LIMIT);
        Self {
            index: HashMap::with_capacity(prealloc),
            tracker: Tracker::new(config.eviction_policy, prealloc),
            stats: CacheStats::new(),
            capacity: config.capacity,
            default_ttl: config.default_ttl,
            refresh_ttl_on_read: config.refresh_ttl_on_read,
        }
    }

    // == Set ==
    /// Stores a key-value pair using the default TTL.
    ///
    /// If the key already exists, the value is overwritten and the entry is
    /// touched. Its TTL is kept, and its expiry clock restarts only when
    /// `refresh_ttl_on_read` is set.
    /// If the cache is at capacity, one entry chosen by the policy is evicted
    /// first. With a capacity of zero nothing is ever stored.
    pub fn set(&mut self, key: K, value: V) {
        self.insert(key, value, self.default_ttl);
    }

    /// Stores a key-value pair that expires `ttl` after insertion, overriding
    /// the default TTL. An existing live key keeps the TTL it was created with.
    pub fn set_with_ttl(&mut self, key: K, value: V, ttl: Duration) {
        self.insert(key, value, Some(ttl));
    }

    fn insert(&mut self, key: K, value: V, ttl: Option<Duration>) {
        if let Some(&id) = self.index.get(&key) {
            match self.tracker.get_mut(id) {
                Some(entry) if !entry.is_expired() => {
                    entry.value = value;
                    if self.refresh_ttl_on_read {
                        entry.refresh();
                    }
                    self.tracker.touch(id);
                    return;
                }
                _ => self.expire(&key),
            }
        }

        if self.capacity == 0 {
            trace!("capacity is zero, insert ignored");
            return;
        }

        if self.index.len() >= self.capacity {
            self.evict_victim();
        }

        let id = self.tracker.insert(CacheEntry::new(key.clone(), value, ttl));
        self.index.insert(key, id);
    }

    // == Get ==
    /// Retrieves a value by key.
    ///
    /// A live entry counts as a hit and is touched (and its expiry clock
    /// restarted when `refresh_ttl_on_read` is set). A missing key counts as
    /// a miss. An expired entry is removed and counted as an eviction only.
    pub fn get<Q>(&mut self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let Some(&id) = self.index.get(key) else {
            self.stats.record_miss();
            return None;
        };

        let entry = match self.tracker.get_mut(id) {
            Some(entry) if !entry.is_expired() => entry,
            _ => {
                self.expire(key);
                return None;
            }
        };
        if self.refresh_ttl_on_read {
            entry.refresh();
        }
        let value = entry.value.clone();

        self.stats.record_hit();
        self.tracker.touch(id);
        Some(value)
    }

    // == Invalidate ==
    /// Removes an entry by key. Returns whether an entry was removed.
    ///
    /// Explicit removal does not touch the statistics.
    pub fn invalidate<Q>(&mut self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.evict(key).is_some()
    }

    // == Evict ==
    /// Removes an entry by key and returns its value.
    ///
    /// A resident entry is removed even if its TTL has already run out.
    pub fn evict<Q>(&mut self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.unlink(key).map(|entry| entry.value)
    }

    // == Contains ==
    /// Whether a live entry exists, without touching it or counting a lookup.
    pub fn contains_key<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.live_entry(key).is_some()
    }

    // == Time To Live ==
    /// Remaining lifetime of a live entry.
    ///
    /// Returns None when the key is absent, expired, or never expires.
    pub fn ttl_remaining<Q>(&self, key: &Q) -> Option<Duration>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.live_entry(key)?.ttl_remaining()
    }

    // == Purge Expired ==
    /// Removes all expired entries from the cache.
    ///
    /// Returns the number of entries removed.
    pub fn purge_expired(&mut self) -> usize {
        let now = Instant::now();
        let expired: Vec<NodeId> = self
            .tracker
            .iter()
            .filter(|(_, entry)| entry.is_expired_at(now))
            .map(|(id, _)| id)
            .collect();

        for &id in &expired {
            if let Some(entry) = self.tracker.remove(id) {
                self.index.remove(&entry.key);
                self.stats.record_eviction();
            }
        }

        if !expired.is_empty() {
            debug!(removed = expired.len(), "purged expired entries");
        }
        expired.len()
    }

    // == Length ==
    /// Returns the number of live entries, purging expired ones first.
    pub fn len(&mut self) -> usize {
        self.purge_expired();
        self.index.len()
    }

    /// Returns true if no live entry remains.
    pub fn is_empty(&mut self) -> bool {
        self.len() == 0
    }

    /// Number of physically resident entries, expired ones included.
    pub fn resident_len(&self) -> usize {
        self.index.len()
    }

    // == Snapshots ==
    /// Keys of all live entries.
    pub fn keys(&mut self) -> HashSet<K> {
        self.purge_expired();
        self.index.keys().cloned().collect()
    }

    /// Values of all live entries, in structural order.
    pub fn values(&mut self) -> Vec<V> {
        self.purge_expired();
        self.tracker
            .iter()
            .map(|(_, entry)| entry.value.clone())
            .collect()
    }

    /// Live key-value pairs in structural order: most recently used first
    /// for LRU; highest frequency first, most recently touched first within a
    /// frequency, for LFU.
    pub fn to_list(&mut self) -> Vec<(K, V)> {
        self.purge_expired();
        self.pairs(usize::MAX)
    }

    // == Top K ==
    /// The first `k` pairs of [`to_list`](Self::to_list): the `k` most
    /// recently used entries for LRU, the `k` most frequently used for LFU.
    ///
    /// Fails with `InvalidArgument` when `k` is zero or exceeds the number of
    /// live entries.
    pub fn top_k(&mut self, k: usize) -> Result<Vec<(K, V)>> {
        let len = self.len();
        if k == 0 {
            return Err(CacheError::InvalidArgument(
                "k must be greater than zero".to_string(),
            ));
        }
        if k > len {
            return Err(CacheError::InvalidArgument(format!(
                "k ({k}) exceeds the number of live entries ({len})"
            )));
        }
        Ok(self.pairs(k))
    }

    // == Clear ==
    /// Drops every entry. Statistics are kept.
    pub fn clear(&mut self) {
        self.index.clear();
        self.tracker.clear();
    }

    // == Stats ==
    /// Returns a copy of the current statistics.
    pub fn stats(&self) -> CacheStats {
        self.stats
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn policy(&self) -> EvictionPolicy {
        self.tracker.policy()
    }

    /// Verifies that the index and the ordering structure agree and that the
    /// capacity bound holds.
    pub fn check_invariants(&self) -> std::result::Result<(), InvariantError> {
        self.tracker.check_invariants()?;
        if self.tracker.len() != self.index.len() {
            return Err(InvariantError::new(format!(
                "index holds {} keys but tracker holds {} entries",
                self.index.len(),
                self.tracker.len()
            )));
        }
        if self.index.len() > self.capacity {
            return Err(InvariantError::new(format!(
                "{} entries exceed capacity {}",
                self.index.len(),
                self.capacity
            )));
        }
        for (key, &id) in &self.index {
            match self.tracker.get(id) {
                Some(entry) if entry.key == *key => {}
                _ => return Err(InvariantError::new("index points at a foreign slot")),
            }
        }
        Ok(())
    }

    // == Internal Helpers ==
    fn live_entry<Q>(&self, key: &Q) -> Option<&CacheEntry<K, V>>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let id = *self.index.get(key)?;
        self.tracker.get(id).filter(|entry| !entry.is_expired())
    }

    fn unlink<Q>(&mut self, key: &Q) -> Option<CacheEntry<K, V>>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let id = self.index.remove(key)?;
        self.tracker.remove(id)
    }

    /// Lazy-expiry removal of a single entry.
    fn expire<Q>(&mut self, key: &Q)
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        if self.unlink(key).is_some() {
            self.stats.record_eviction();
            trace!("expired entry removed on access");
        }
    }

    fn evict_victim(&mut self) {
        let Some(id) = self.tracker.victim() else {
            return;
        };
        if let Some(entry) = self.tracker.remove(id) {
            self.index.remove(&entry.key);
            self.stats.record_eviction();
            debug!(policy = %self.tracker.policy(), "evicted entry to make room");
        }
    }

    fn pairs(&self, limit: usize) -> Vec<(K, V)> {
        self.tracker
            .iter()
            .take(limit)
            .map(|(_, entry)| (entry.key.clone(), entry.value.clone()))
            .collect()
    }
}
