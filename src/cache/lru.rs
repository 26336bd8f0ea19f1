//! LRU Tracker Module
//!
//! Implements Least Recently Used ordering for cache eviction.

use crate::cache::arena::{LinkArena, ListId, NodeId};
use crate::cache::CacheEntry;
use crate::error::InvariantError;

// == LRU Tracker ==
/// Orders entries by access time in a single sentinel-bounded list.
///
/// - Front = Most recently used
/// - Back = Least recently used
///
/// Touch, insert, remove and eviction are all O(1).
#[derive(Debug)]
pub struct LruTracker<K, V> {
    arena: LinkArena<CacheEntry<K, V>>,
    list: ListId,
}

impl<K, V> LruTracker<K, V> {
    // == Constructor ==
    /// Creates a new empty LRU tracker.
    pub fn new() -> Self {
        Self::with_capacity(0)
    }

    /// Creates an empty tracker with room for `capacity` entries.
    pub fn with_capacity(capacity: usize) -> Self {
        // two extra slots for the sentinels
        let mut arena = LinkArena::with_capacity(capacity.saturating_add(2));
        let list = arena.new_list();
        Self { arena, list }
    }

    // == Insert ==
    /// Stores a new entry as the most recently used.
    pub fn insert(&mut self, entry: CacheEntry<K, V>) -> NodeId {
        self.arena.push_front(self.list, entry)
    }

    // == Touch ==
    /// Marks an entry as recently used (moves to front).
    pub fn touch(&mut self, id: NodeId) {
        self.arena.move_to_front(self.list, id);
    }

    // == Remove ==
    /// Removes an entry from the tracker.
    pub fn remove(&mut self, id: NodeId) -> Option<CacheEntry<K, V>> {
        self.arena.remove(id)
    }

    // == Peek Oldest ==
    /// Returns the least recently used entry's handle without removing it.
    pub fn peek_oldest(&self) -> Option<NodeId> {
        self.arena.back(self.list)
    }

    // == Evict Oldest ==
    /// Returns and removes the least recently used entry.
    ///
    /// Returns None if tracker is empty.
    pub fn evict_oldest(&mut self) -> Option<CacheEntry<K, V>> {
        let id = self.peek_oldest()?;
        self.arena.remove(id)
    }

    pub fn get(&self, id: NodeId) -> Option<&CacheEntry<K, V>> {
        self.arena.get(id)
    }

    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut CacheEntry<K, V>> {
        self.arena.get_mut(id)
    }

    /// Iterates from most to least recently used.
    pub fn iter(&self) -> impl Iterator<Item = (NodeId, &CacheEntry<K, V>)> + '_ {
        self.arena.iter(self.list)
    }

    // == Length ==
    /// Returns the number of tracked entries.
    pub fn len(&self) -> usize {
        self.arena.len()
    }

    pub fn is_empty(&self) -> bool {
        self.arena.is_empty()
    }

    pub fn clear(&mut self) {
        self.arena.clear();
        self.list = self.arena.new_list();
    }

    /// Verifies that the list links are symmetric and cover every entry.
    pub fn check_invariants(&self) -> Result<(), InvariantError> {
        let linked = self.arena.check_list(self.list)?;
        if linked != self.arena.len() {
            return Err(InvariantError::new(format!(
                "{} entries stored but {} linked",
                self.arena.len(),
                linked
            )));
        }
        Ok(())
    }
}

impl<K, V> Default for LruTracker<K, V> {
    fn default() -> Self {
        Self::new()
    }
}
