//! Link Arena Module
//!
//! Doubly linked lists stored in one slot arena and linked by index.
//!
//! Every list owns two permanent sentinel slots, so a real node always has a
//! neighbour on both sides and splicing never special-cases the ends:
//!
//! ```text
//!   head ─► [n3] ◄──► [n1] ◄──► [n7] ◄── tail
//!   (MRU)                        (LRU)
//! ```
//!
//! Freed slots are recycled through a free list, so a `NodeId` stays valid
//! for as long as its value is resident.

use crate::error::InvariantError;

/// Stable handle to an occupied slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(usize);

/// Handle to one list: the indices of its two sentinels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListId {
    head: usize,
    tail: usize,
}

#[derive(Debug)]
enum SlotState<T> {
    Free,
    Sentinel,
    Occupied(T),
}

#[derive(Debug)]
struct Slot<T> {
    state: SlotState<T>,
    prev: usize,
    next: usize,
}

// == Link Arena ==
#[derive(Debug)]
pub struct LinkArena<T> {
    slots: Vec<Slot<T>>,
    free: Vec<usize>,
    len: usize,
}

impl<T> LinkArena<T> {
    pub fn new() -> Self {
        Self {
            slots: Vec::new(),
            free: Vec::new(),
            len: 0,
        }
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            slots: Vec::with_capacity(capacity),
            free: Vec::new(),
            len: 0,
        }
    }

    /// Number of occupied (non-sentinel) slots across all lists.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    // == Lists ==
    /// Allocates a new empty list.
    pub fn new_list(&mut self) -> ListId {
        let head = self.alloc(SlotState::Sentinel);
        let tail = self.alloc(SlotState::Sentinel);
        self.slots[head].next = tail;
        self.slots[tail].prev = head;
        ListId { head, tail }
    }

    /// Frees the sentinels of an empty list. The handle must not be used again.
    pub fn release_list(&mut self, list: ListId) {
        debug_assert!(self.is_list_empty(list), "released a non-empty list");
        for idx in [list.head, list.tail] {
            self.slots[idx].state = SlotState::Free;
            self.free.push(idx);
        }
    }

    pub fn is_list_empty(&self, list: ListId) -> bool {
        self.slots[list.head].next == list.tail
    }

    /// Oldest node of `list`.
    pub fn back(&self, list: ListId) -> Option<NodeId> {
        let idx = self.slots[list.tail].prev;
        (idx != list.head).then_some(NodeId(idx))
    }

    // == Node Access ==
    pub fn get(&self, id: NodeId) -> Option<&T> {
        match self.slots.get(id.0).map(|slot| &slot.state) {
            Some(SlotState::Occupied(value)) => Some(value),
            _ => None,
        }
    }

    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut T> {
        match self.slots.get_mut(id.0).map(|slot| &mut slot.state) {
            Some(SlotState::Occupied(value)) => Some(value),
            _ => None,
        }
    }

    // == Mutation ==
    /// Stores `value` as the new front of `list`.
    pub fn push_front(&mut self, list: ListId, value: T) -> NodeId {
        let idx = self.alloc(SlotState::Occupied(value));
        self.len += 1;
        self.link_after(list.head, idx);
        NodeId(idx)
    }

    /// Unlinks a node from whatever list holds it, keeping its value.
    pub fn detach(&mut self, id: NodeId) {
        debug_assert!(self.get(id).is_some(), "detach of a vacant slot");
        self.unlink(id.0);
    }

    /// Links a detached node in as the new front of `list`.
    pub fn attach_front(&mut self, list: ListId, id: NodeId) {
        debug_assert!(self.get(id).is_some(), "attach of a vacant slot");
        self.link_after(list.head, id.0);
    }

    pub fn move_to_front(&mut self, list: ListId, id: NodeId) {
        self.detach(id);
        self.attach_front(list, id);
    }

    /// Unlinks a node and frees its slot, returning the value.
    pub fn remove(&mut self, id: NodeId) -> Option<T> {
        let slot = self.slots.get_mut(id.0)?;
        if !matches!(slot.state, SlotState::Occupied(_)) {
            return None;
        }
        let state = std::mem::replace(&mut slot.state, SlotState::Free);
        self.unlink(id.0);
        self.free.push(id.0);
        self.len -= 1;
        match state {
            SlotState::Occupied(value) => Some(value),
            _ => None,
        }
    }

    /// Drops every list and value.
    pub fn clear(&mut self) {
        self.slots.clear();
        self.free.clear();
        self.len = 0;
    }

    // == Iteration ==
    /// Iterates `list` from front to back.
    pub fn iter(&self, list: ListId) -> ListIter<'_, T> {
        ListIter {
            arena: self,
            current: self.slots[list.head].next,
            tail: list.tail,
        }
    }

    /// Walks `list` in both directions and returns its length.
    pub fn check_list(&self, list: ListId) -> Result<usize, InvariantError> {
        let limit = self.slots.len();
        let mut count = 0;
        let mut prev = list.head;
        let mut idx = self.slots[list.head].next;
        while idx != list.tail {
            if !matches!(self.slots[idx].state, SlotState::Occupied(_)) {
                return Err(InvariantError::new(format!(
                    "slot {idx} linked into a list is not occupied"
                )));
            }
            if self.slots[idx].prev != prev {
                return Err(InvariantError::new(format!(
                    "slot {idx} prev link is {} instead of {prev}",
                    self.slots[idx].prev
                )));
            }
            count += 1;
            if count > limit {
                return Err(InvariantError::new("list contains a cycle"));
            }
            prev = idx;
            idx = self.slots[idx].next;
        }
        if self.slots[list.tail].prev != prev {
            return Err(InvariantError::new("tail sentinel prev link is stale"));
        }
        Ok(count)
    }

    fn alloc(&mut self, state: SlotState<T>) -> usize {
        match self.free.pop() {
            Some(idx) => {
                self.slots[idx] = Slot {
                    state,
                    prev: idx,
                    next: idx,
                };
                idx
            }
            None => {
                let idx = self.slots.len();
                self.slots.push(Slot {
                    state,
                    prev: idx,
                    next: idx,
                });
                idx
            }
        }
    }

    fn link_after(&mut self, anchor: usize, idx: usize) {
        let next = self.slots[anchor].next;
        self.slots[idx].prev = anchor;
        self.slots[idx].next = next;
        self.slots[anchor].next = idx;
        self.slots[next].prev = idx;
    }

    fn unlink(&mut self, idx: usize) {
        let (prev, next) = (self.slots[idx].prev, self.slots[idx].next);
        self.slots[prev].next = next;
        self.slots[next].prev = prev;
        self.slots[idx].prev = idx;
        self.slots[idx].next = idx;
    }
}

impl<T> Default for LinkArena<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// Front-to-back iterator over one list.
pub struct ListIter<'a, T> {
    arena: &'a LinkArena<T>,
    current: usize,
    tail: usize,
}

impl<'a, T> Iterator for ListIter<'a, T> {
    type Item = (NodeId, &'a T);

    fn next(&mut self) -> Option<Self::Item> {
        if self.current == self.tail {
            return None;
        }
        let idx = self.current;
        let slot = &self.arena.slots[idx];
        self.current = slot.next;
        match &slot.state {
            SlotState::Occupied(value) => Some((NodeId(idx), value)),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn values(arena: &LinkArena<&'static str>, list: ListId) -> Vec<&'static str> {
        arena.iter(list).map(|(_, v)| *v).collect()
    }

    #[test]
    fn test_new_list_is_empty() {
        let mut arena: LinkArena<u32> = LinkArena::new();
        let list = arena.new_list();
        assert!(arena.is_list_empty(list));
        assert!(arena.is_empty());
        assert_eq!(arena.back(list), None);
        assert_eq!(arena.check_list(list), Ok(0));
    }

    #[test]
    fn test_push_front_orders_newest_first() {
        let mut arena = LinkArena::new();
        let list = arena.new_list();
        let a = arena.push_front(list, "a");
        arena.push_front(list, "b");
        let c = arena.push_front(list, "c");

        assert_eq!(values(&arena, list), vec!["c", "b", "a"]);
        assert_eq!(arena.iter(list).next().map(|(id, _)| id), Some(c));
        assert_eq!(arena.back(list), Some(a));
        assert_eq!(arena.len(), 3);
        assert_eq!(arena.check_list(list), Ok(3));
    }

    #[test]
    fn test_move_to_front() {
        let mut arena = LinkArena::new();
        let list = arena.new_list();
        let a = arena.push_front(list, "a");
        arena.push_front(list, "b");
        arena.push_front(list, "c");

        arena.move_to_front(list, a);
        assert_eq!(values(&arena, list), vec!["a", "c", "b"]);
        assert_eq!(arena.check_list(list), Ok(3));
    }

    #[test]
    fn test_move_between_lists() {
        let mut arena = LinkArena::new();
        let first = arena.new_list();
        let second = arena.new_list();
        let a = arena.push_front(first, "a");
        arena.push_front(first, "b");

        arena.detach(a);
        arena.attach_front(second, a);

        assert_eq!(values(&arena, first), vec!["b"]);
        assert_eq!(values(&arena, second), vec!["a"]);
        assert_eq!(arena.len(), 2);
    }

    #[test]
    fn test_remove_single_and_ends() {
        let mut arena = LinkArena::new();
        let list = arena.new_list();
        let a = arena.push_front(list, "a");
        let b = arena.push_front(list, "b");
        let c = arena.push_front(list, "c");

        assert_eq!(arena.remove(c), Some("c"));
        assert_eq!(arena.remove(a), Some("a"));
        assert_eq!(values(&arena, list), vec!["b"]);
        assert_eq!(arena.remove(b), Some("b"));
        assert!(arena.is_list_empty(list));
        assert_eq!(arena.remove(b), None, "double remove must be a no-op");
        assert_eq!(arena.check_list(list), Ok(0));
    }

    #[test]
    fn test_slots_are_recycled() {
        let mut arena = LinkArena::new();
        let list = arena.new_list();
        let a = arena.push_front(list, "a");
        arena.remove(a);
        let b = arena.push_front(list, "b");
        assert_eq!(a, b, "freed slot should be reused");
        assert_eq!(arena.get(b), Some(&"b"));
    }

    #[test]
    fn test_release_list_recycles_sentinels() {
        let mut arena: LinkArena<u8> = LinkArena::new();
        let first = arena.new_list();
        arena.release_list(first);
        let second = arena.new_list();
        assert!(arena.is_list_empty(second));
        assert_eq!(arena.slots.len(), 2);
    }

    #[test]
    fn test_get_mut() {
        let mut arena = LinkArena::new();
        let list = arena.new_list();
        let id = arena.push_front(list, 1);
        if let Some(value) = arena.get_mut(id) {
            *value = 5;
        }
        assert_eq!(arena.get(id), Some(&5));
    }
}
