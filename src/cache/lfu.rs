//! LFU Tracker Module
//!
//! Implements Least Frequently Used ordering with frequency buckets.
//!
//! ```text
//!   min_frequency = 1
//!        │
//!        ▼
//!   freq=1: head ─► [d] ◄──► [a] ◄── tail   (a is the next victim)
//!   freq=3: head ─► [b] ◄── tail
//! ```
//!
//! Each bucket is a recency list: touched entries enter at the head, so the
//! tail of the minimum bucket is the least recently touched entry among the
//! least frequently used ones.

use std::collections::BTreeMap;

use crate::cache::arena::{LinkArena, ListId, NodeId};
use crate::cache::CacheEntry;
use crate::error::InvariantError;

// == LFU Tracker ==
#[derive(Debug)]
pub struct LfuTracker<K, V> {
    arena: LinkArena<CacheEntry<K, V>>,
    /// Non-empty buckets only; empty ones are released eagerly
    buckets: BTreeMap<u64, ListId>,
    min_frequency: Option<u64>,
}

impl<K, V> LfuTracker<K, V> {
    pub fn new() -> Self {
        Self::with_capacity(0)
    }

    /// Creates an empty tracker with room for `capacity` entries.
    pub fn with_capacity(capacity: usize) -> Self {
        // sentinels of the frequency-1 bucket; higher buckets grow on demand
        Self {
            arena: LinkArena::with_capacity(capacity.saturating_add(2)),
            buckets: BTreeMap::new(),
            min_frequency: None,
        }
    }

    // == Insert ==
    /// Stores a new entry at frequency 1, which always becomes the minimum.
    pub fn insert(&mut self, mut entry: CacheEntry<K, V>) -> NodeId {
        entry.frequency = 1;
        let list = self.bucket(1);
        let id = self.arena.push_front(list, entry);
        self.min_frequency = Some(1);
        id
    }

    // == Touch ==
    /// Moves an entry to the head of the next frequency bucket.
    pub fn touch(&mut self, id: NodeId) {
        let Some(freq) = self.arena.get(id).map(|e| e.frequency) else {
            return;
        };
        let next = freq.saturating_add(1);

        self.arena.detach(id);
        if self.release_if_empty(freq) && self.min_frequency == Some(freq) {
            // the touched entry is about to land in `next`
            self.min_frequency = Some(next);
        }

        if let Some(entry) = self.arena.get_mut(id) {
            entry.frequency = next;
        }
        let list = self.bucket(next);
        self.arena.attach_front(list, id);
    }

    // == Remove ==
    /// Removes an entry, recomputing the minimum if its bucket disappears.
    pub fn remove(&mut self, id: NodeId) -> Option<CacheEntry<K, V>> {
        let entry = self.arena.remove(id)?;
        let freq = entry.frequency;
        if self.release_if_empty(freq) && self.min_frequency == Some(freq) {
            self.min_frequency = self.buckets.keys().next().copied();
        }
        Some(entry)
    }

    // == Eviction ==
    /// Least recently touched entry of the lowest frequency bucket.
    pub fn peek_victim(&self) -> Option<NodeId> {
        let list = self.buckets.get(&self.min_frequency?)?;
        self.arena.back(*list)
    }

    pub fn evict(&mut self) -> Option<CacheEntry<K, V>> {
        let id = self.peek_victim()?;
        self.remove(id)
    }

    pub fn get(&self, id: NodeId) -> Option<&CacheEntry<K, V>> {
        self.arena.get(id)
    }

    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut CacheEntry<K, V>> {
        self.arena.get_mut(id)
    }

    pub fn frequency(&self, id: NodeId) -> Option<u64> {
        self.arena.get(id).map(|e| e.frequency)
    }

    pub fn min_frequency(&self) -> Option<u64> {
        self.min_frequency
    }

    /// Iterates from the highest frequency down; most recently touched first
    /// within a frequency.
    pub fn iter(&self) -> impl Iterator<Item = (NodeId, &CacheEntry<K, V>)> + '_ {
        self.buckets
            .values()
            .rev()
            .flat_map(move |list| self.arena.iter(*list))
    }

    pub fn len(&self) -> usize {
        self.arena.len()
    }

    pub fn is_empty(&self) -> bool {
        self.arena.is_empty()
    }

    pub fn clear(&mut self) {
        self.arena.clear();
        self.buckets.clear();
        self.min_frequency = None;
    }

    /// Verifies bucket links, per-entry frequencies and the tracked minimum.
    pub fn check_invariants(&self) -> Result<(), InvariantError> {
        let mut linked = 0;
        for (&freq, &list) in &self.buckets {
            let count = self.arena.check_list(list)?;
            if count == 0 {
                return Err(InvariantError::new(format!("bucket {freq} is empty")));
            }
            if let Some((_, entry)) = self.arena.iter(list).find(|(_, e)| e.frequency != freq) {
                return Err(InvariantError::new(format!(
                    "entry with frequency {} found in bucket {freq}",
                    entry.frequency
                )));
            }
            linked += count;
        }
        if linked != self.arena.len() {
            return Err(InvariantError::new(format!(
                "{} entries stored but {} linked",
                self.arena.len(),
                linked
            )));
        }
        let smallest = self.buckets.keys().next().copied();
        if self.min_frequency != smallest {
            return Err(InvariantError::new(format!(
                "min_frequency is {:?} but smallest bucket is {:?}",
                self.min_frequency, smallest
            )));
        }
        Ok(())
    }

    fn bucket(&mut self, freq: u64) -> ListId {
        *self
            .buckets
            .entry(freq)
            .or_insert_with(|| self.arena.new_list())
    }

    /// Drops the bucket for `freq` if nothing is left in it.
    fn release_if_empty(&mut self, freq: u64) -> bool {
        match self.buckets.get(&freq) {
            Some(&list) if self.arena.is_list_empty(list) => {
                self.buckets.remove(&freq);
                self.arena.release_list(list);
                true
            }
            _ => false,
        }
    }
}

impl<K, V> Default for LfuTracker<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(key: &'static str) -> CacheEntry<&'static str, ()> {
        CacheEntry::new(key, (), None)
    }

    fn order(lfu: &LfuTracker<&'static str, ()>) -> Vec<(&'static str, u64)> {
        lfu.iter().map(|(_, e)| (e.key, e.frequency)).collect()
    }

    #[test]
    fn test_lfu_new() {
        let lfu: LfuTracker<&str, ()> = LfuTracker::new();
        assert!(lfu.is_empty());
        assert_eq!(lfu.min_frequency(), None);
        assert!(lfu.peek_victim().is_none());
        assert!(lfu.check_invariants().is_ok());
    }

    #[test]
    fn test_lfu_insert_starts_at_one() {
        let mut lfu = LfuTracker::new();
        let a = lfu.insert(entry("a"));
        lfu.insert(entry("b"));

        assert_eq!(lfu.frequency(a), Some(1));
        assert_eq!(lfu.min_frequency(), Some(1));
        assert_eq!(lfu.peek_victim(), Some(a));
        assert_eq!(order(&lfu), vec![("b", 1), ("a", 1)]);
    }

    #[test]
    fn test_lfu_touch_advances_min_frequency() {
        let mut lfu = LfuTracker::new();
        let a = lfu.insert(entry("a"));

        lfu.touch(a);
        assert_eq!(lfu.frequency(a), Some(2));
        assert_eq!(lfu.min_frequency(), Some(2));

        lfu.touch(a);
        assert_eq!(lfu.min_frequency(), Some(3));
        assert!(lfu.check_invariants().is_ok());
    }

    #[test]
    fn test_lfu_insert_resets_min_frequency() {
        let mut lfu = LfuTracker::new();
        let a = lfu.insert(entry("a"));
        lfu.touch(a);
        lfu.touch(a);

        let b = lfu.insert(entry("b"));
        assert_eq!(lfu.min_frequency(), Some(1));
        assert_eq!(lfu.peek_victim(), Some(b));
    }

    #[test]
    fn test_lfu_victim_is_least_recent_of_min_bucket() {
        let mut lfu = LfuTracker::new();
        lfu.insert(entry("k1"));
        let k2 = lfu.insert(entry("k2"));
        let k3 = lfu.insert(entry("k3"));

        lfu.touch(k2);
        lfu.touch(k2);
        lfu.touch(k3);

        assert_eq!(lfu.evict().map(|e| e.key), Some("k1"));
        // k3 (freq 2) now goes before k2 (freq 3)
        assert_eq!(lfu.peek_victim(), Some(k3));
        assert_eq!(order(&lfu), vec![("k2", 3), ("k3", 2)]);
        assert!(lfu.check_invariants().is_ok());
    }

    #[test]
    fn test_lfu_ties_broken_by_recency() {
        let mut lfu = LfuTracker::new();
        let a = lfu.insert(entry("a"));
        let b = lfu.insert(entry("b"));

        lfu.touch(b);
        lfu.touch(a);

        // both at frequency 2, b touched first
        assert_eq!(lfu.peek_victim(), Some(b));
        assert_eq!(order(&lfu), vec![("a", 2), ("b", 2)]);
    }

    #[test]
    fn test_lfu_remove_recomputes_min_frequency() {
        let mut lfu = LfuTracker::new();
        let a = lfu.insert(entry("a"));
        let b = lfu.insert(entry("b"));
        lfu.touch(b);
        lfu.touch(b);

        assert_eq!(lfu.remove(a).map(|e| e.key), Some("a"));
        assert_eq!(lfu.min_frequency(), Some(3));
        assert_eq!(lfu.peek_victim(), Some(b));

        lfu.remove(b);
        assert_eq!(lfu.min_frequency(), None);
        assert!(lfu.is_empty());
        assert!(lfu.check_invariants().is_ok());
    }

    #[test]
    fn test_lfu_remove_from_higher_bucket_keeps_min() {
        let mut lfu = LfuTracker::new();
        let a = lfu.insert(entry("a"));
        lfu.insert(entry("b"));
        lfu.touch(a);

        lfu.remove(a);
        assert_eq!(lfu.min_frequency(), Some(1));
        assert!(lfu.check_invariants().is_ok());
    }

    #[test]
    fn test_lfu_clear() {
        let mut lfu = LfuTracker::new();
        let a = lfu.insert(entry("a"));
        lfu.touch(a);

        lfu.clear();
        assert!(lfu.is_empty());
        assert_eq!(lfu.min_frequency(), None);
        assert!(lfu.check_invariants().is_ok());
    }
}
