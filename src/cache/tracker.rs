//! Tracker Module
//!
//! Dispatches ordering operations to the LRU or LFU tracker chosen by the
//! configured eviction policy. `CacheStore` only talks to this type.

use crate::cache::arena::NodeId;
use crate::cache::{CacheEntry, LfuTracker, LruTracker};
use crate::config::EvictionPolicy;
use crate::error::InvariantError;

// == Tracker ==
/// Policy-specific ordering over the resident entries.
#[derive(Debug)]
pub enum Tracker<K, V> {
    /// Single recency list
    Lru(LruTracker<K, V>),
    /// Frequency buckets, each a recency list
    Lfu(LfuTracker<K, V>),
}

impl<K, V> Tracker<K, V> {
    // == Constructor ==
    /// Creates an empty tracker for `policy` with room for `capacity` entries.
    pub fn new(policy: EvictionPolicy, capacity: usize) -> Self {
        match policy {
            EvictionPolicy::Lru => Tracker::Lru(LruTracker::with_capacity(capacity)),
            EvictionPolicy::Lfu => Tracker::Lfu(LfuTracker::with_capacity(capacity)),
        }
    }

    pub fn policy(&self) -> EvictionPolicy {
        match self {
            Tracker::Lru(_) => EvictionPolicy::Lru,
            Tracker::Lfu(_) => EvictionPolicy::Lfu,
        }
    }

    // == Mutation ==
    /// Stores a new entry in the policy's starting position.
    pub fn insert(&mut self, entry: CacheEntry<K, V>) -> NodeId {
        match self {
            Tracker::Lru(lru) => lru.insert(entry),
            Tracker::Lfu(lfu) => lfu.insert(entry),
        }
    }

    /// Applies the policy's "touched" transition.
    pub fn touch(&mut self, id: NodeId) {
        match self {
            Tracker::Lru(lru) => lru.touch(id),
            Tracker::Lfu(lfu) => lfu.touch(id),
        }
    }

    pub fn remove(&mut self, id: NodeId) -> Option<CacheEntry<K, V>> {
        match self {
            Tracker::Lru(lru) => lru.remove(id),
            Tracker::Lfu(lfu) => lfu.remove(id),
        }
    }

    // == Queries ==
    /// The entry the policy gives up next.
    pub fn victim(&self) -> Option<NodeId> {
        match self {
            Tracker::Lru(lru) => lru.peek_oldest(),
            Tracker::Lfu(lfu) => lfu.peek_victim(),
        }
    }

    pub fn get(&self, id: NodeId) -> Option<&CacheEntry<K, V>> {
        match self {
            Tracker::Lru(lru) => lru.get(id),
            Tracker::Lfu(lfu) => lfu.get(id),
        }
    }

    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut CacheEntry<K, V>> {
        match self {
            Tracker::Lru(lru) => lru.get_mut(id),
            Tracker::Lfu(lfu) => lfu.get_mut(id),
        }
    }

    /// Entries in structural order: recency for LRU, frequency then recency for LFU.
    pub fn iter(&self) -> Box<dyn Iterator<Item = (NodeId, &CacheEntry<K, V>)> + '_> {
        match self {
            Tracker::Lru(lru) => Box::new(lru.iter()),
            Tracker::Lfu(lfu) => Box::new(lfu.iter()),
        }
    }

    /// Number of entries held.
    pub fn len(&self) -> usize {
        match self {
            Tracker::Lru(lru) => lru.len(),
            Tracker::Lfu(lfu) => lfu.len(),
        }
    }

    pub fn clear(&mut self) {
        match self {
            Tracker::Lru(lru) => lru.clear(),
            Tracker::Lfu(lfu) => lfu.clear(),
        }
    }

    // == Invariants ==
    pub fn check_invariants(&self) -> Result<(), InvariantError> {
        match self {
            Tracker::Lru(lru) => lru.check_invariants(),
            Tracker::Lfu(lfu) => lfu.check_invariants(),
        }
    }
}
