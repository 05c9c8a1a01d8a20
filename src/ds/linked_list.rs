//! Doubly linked list with stable, generation-checked node handles.
//!
//! Nodes live in a [`SlotArena`] and are linked by [`NodeHandle`], so every
//! insertion returns a handle that stays valid until that node is removed
//! and supports O(1) unlink/move without re-searching by index.
//!
//! ## Architecture
//!
//! ```text
//!   arena (SlotArena<Node<T>>)
//!   ┌────────┬──────────────────────────────────────────────┐
//!   │ handle │ Node { value, prev, next }                   │
//!   ├────────┼──────────────────────────────────────────────┤
//!   │ h_1    │ { value: A, prev: None, next: Some(h_2) }    │
//!   │ h_2    │ { value: B, prev: Some(h_1), next: h_3 }     │
//!   │ h_3    │ { value: C, prev: Some(h_2), next: None }    │
//!   └────────┴──────────────────────────────────────────────┘
//!
//!   head ─► [h_1] ◄──► [h_2] ◄──► [h_3] ◄── tail
//! ```
//!
//! ## Index resolution
//!
//! Integer indices are Python-style and wrap: for a list of length `n`,
//! any index is reduced modulo `n` with a sign correction, so `at(n)` is
//! `at(0)` and `at(-1)` is `at(n - 1)`. Index-to-handle lookup walks from
//! whichever end is closer (head for the first half, tail for the second),
//! halving the average traversal cost.
//!
//! ## Performance
//! - `push_front` / `push_back` / `pop_front` / `pop_back`: O(1)
//! - `remove(handle)` / `move_to_front(handle)`: O(1)
//! - `handle_at` / `delete` / `swap` / `move_to`: O(n/2) average
//! - `sort_by`: quicksort over node values, O(n log n) average
//!
//! `debug_validate_invariants()` is available in debug/test builds;
//! `check_invariants()` returns the failure as an [`InvariantError`].

use std::cmp::Ordering;

use crate::ds::slot_arena::{NodeHandle, SlotArena};
use crate::error::{InvariantError, StaleHandle};

#[derive(Debug)]
struct Node<T> {
    value: T,
    prev: Option<NodeHandle>,
    next: Option<NodeHandle>,
}

#[derive(Debug)]
/// Doubly linked list storing nodes in a [`SlotArena`], linked by [`NodeHandle`].
pub struct LinkedList<T> {
    arena: SlotArena<Node<T>>,
    head: Option<NodeHandle>,
    tail: Option<NodeHandle>,
}

impl<T> LinkedList<T> {
    /// Creates an empty list.
    pub fn new() -> Self {
        Self {
            arena: SlotArena::new(),
            head: None,
            tail: None,
        }
    }

    /// Creates an empty list with reserved node capacity.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            arena: SlotArena::with_capacity(capacity),
            head: None,
            tail: None,
        }
    }

    /// Returns the number of nodes in the list.
    pub fn len(&self) -> usize {
        self.arena.len()
    }

    /// Returns `true` if the list is empty.
    pub fn is_empty(&self) -> bool {
        self.arena.is_empty()
    }

    /// Returns `true` if `handle` currently names a node in this list.
    pub fn contains_handle(&self, handle: NodeHandle) -> bool {
        self.arena.contains(handle)
    }

    /// Returns the value at the front of the list.
    pub fn front(&self) -> Option<&T> {
        self.head
            .and_then(|handle| self.arena.get(handle).map(|node| &node.value))
    }

    /// Returns the handle of the front node.
    pub fn front_handle(&self) -> Option<NodeHandle> {
        self.head
    }

    /// Returns the value at the back of the list.
    pub fn back(&self) -> Option<&T> {
        self.tail
            .and_then(|handle| self.arena.get(handle).map(|node| &node.value))
    }

    /// Returns the handle of the back node.
    pub fn back_handle(&self) -> Option<NodeHandle> {
        self.tail
    }

    /// Returns the value for a node handle, if still live.
    pub fn get(&self, handle: NodeHandle) -> Option<&T> {
        self.arena.get(handle).map(|node| &node.value)
    }

    /// Returns a mutable reference to a node value, if still live.
    pub fn get_mut(&mut self, handle: NodeHandle) -> Option<&mut T> {
        self.arena.get_mut(handle).map(|node| &mut node.value)
    }

    /// Like [`get`](Self::get), but reports a stale handle as an error.
    pub fn try_get(&self, handle: NodeHandle) -> Result<&T, StaleHandle> {
        self.arena.try_get(handle).map(|node| &node.value)
    }

    /// Inserts a new node at the front and returns its handle.
    pub fn push_front(&mut self, value: T) -> NodeHandle {
        let handle = self.arena.insert(Node {
            value,
            prev: None,
            next: self.head,
        });
        if let Some(head) = self.head {
            if let Some(node) = self.arena.get_mut(head) {
                node.prev = Some(handle);
            }
        } else {
            self.tail = Some(handle);
        }
        self.head = Some(handle);
        handle
    }

    /// Inserts a new node at the back and returns its handle.
    pub fn push_back(&mut self, value: T) -> NodeHandle {
        let handle = self.arena.insert(Node {
            value,
            prev: self.tail,
            next: None,
        });
        if let Some(tail) = self.tail {
            if let Some(node) = self.arena.get_mut(tail) {
                node.next = Some(handle);
            }
        } else {
            self.head = Some(handle);
        }
        self.tail = Some(handle);
        handle
    }

    /// Removes and returns the front value.
    pub fn pop_front(&mut self) -> Option<T> {
        let handle = self.head?;
        self.detach(handle)?;
        self.arena.remove(handle).map(|node| node.value)
    }

    /// Removes and returns the back value.
    pub fn pop_back(&mut self) -> Option<T> {
        let handle = self.tail?;
        self.detach(handle)?;
        self.arena.remove(handle).map(|node| node.value)
    }

    /// Removes the node named by `handle` and returns its value.
    ///
    /// A stale handle is a no-op returning `None`.
    pub fn remove(&mut self, handle: NodeHandle) -> Option<T> {
        self.detach(handle)?;
        self.arena.remove(handle).map(|node| node.value)
    }

    /// Like [`remove`](Self::remove), but reports a stale handle as an error.
    pub fn try_remove(&mut self, handle: NodeHandle) -> Result<T, StaleHandle> {
        self.remove(handle).ok_or_else(|| handle.stale())
    }

    /// Moves an existing node to the front; returns `false` if `handle` is stale.
    pub fn move_to_front(&mut self, handle: NodeHandle) -> bool {
        if !self.arena.contains(handle) {
            return false;
        }
        if Some(handle) == self.head {
            return true;
        }
        self.detach(handle);
        self.attach_front(handle);
        true
    }

    /// Returns the value at `index`, resolving wraparound and negative
    /// indices; an empty list yields `T::default()`.
    pub fn at(&self, index: isize) -> T
    where
        T: Clone + Default,
    {
        self.handle_at(index)
            .and_then(|handle| self.get(handle).cloned())
            .unwrap_or_default()
    }

    /// Resolves an index to the handle of the node at that position.
    ///
    /// Indices are normalized like [`at`](Self::at); the walk starts from
    /// whichever end of the list is closer to the target.
    pub fn handle_at(&self, index: isize) -> Option<NodeHandle> {
        let position = self.normalize_index(index)?;
        self.handle_at_position(position)
    }

    /// Index-based ordered removal; out-of-range on an empty list is a no-op.
    pub fn delete(&mut self, index: isize) -> Option<T> {
        let handle = self.handle_at(index)?;
        self.remove(handle)
    }

    /// Index-based removal that swaps the target's value with the tail's
    /// and pops the tail, trading order preservation for an O(1) unlink.
    pub fn delete_unordered(&mut self, index: isize) -> Option<T> {
        let target = self.handle_at(index)?;
        let tail = self.tail?;
        if target != tail {
            self.swap_values(target, tail);
        }
        self.pop_back()
    }

    /// Removes every node whose value matches `pred`; returns the count.
    pub fn delete_by<F>(&mut self, mut pred: F) -> usize
    where
        F: FnMut(&T) -> bool,
    {
        let doomed: Vec<NodeHandle> = self
            .iter_entries()
            .filter(|(_, value)| pred(value))
            .map(|(handle, _)| handle)
            .collect();
        let count = doomed.len();
        for handle in doomed {
            self.remove(handle);
        }
        count
    }

    /// Swaps the values at indices `i` and `j`; no-op `false` when the list
    /// is empty.
    pub fn swap(&mut self, i: isize, j: isize) -> bool {
        let (a, b) = match (self.handle_at(i), self.handle_at(j)) {
            (Some(a), Some(b)) => (a, b),
            _ => return false,
        };
        if a != b {
            self.swap_values(a, b);
        }
        true
    }

    /// Repositions the node at index `from` so it ends up at index `to`;
    /// no-op `false` when the list is empty.
    pub fn move_to(&mut self, from: isize, to: isize) -> bool {
        let (from_pos, to_pos) = match (self.normalize_index(from), self.normalize_index(to)) {
            (Some(f), Some(t)) => (f, t),
            _ => return false,
        };
        if from_pos == to_pos {
            return true;
        }
        let (moving, anchor) = match (
            self.handle_at_position(from_pos),
            self.handle_at_position(to_pos),
        ) {
            (Some(m), Some(a)) => (m, a),
            _ => return false,
        };
        self.detach(moving);
        if from_pos < to_pos {
            self.attach_after(anchor, moving);
        } else {
            self.attach_before(anchor, moving);
        }
        true
    }

    /// Sorts the list in place with a three-way comparator.
    ///
    /// Quicksort over the linked structure: partitioning compares and swaps
    /// node values, leaving the node chain itself untouched, so handles keep
    /// naming the same positions. Not stable for equal elements. Lists of
    /// fewer than two elements are no-ops.
    pub fn sort_by<F>(&mut self, mut cmp: F)
    where
        F: FnMut(&T, &T) -> Ordering,
    {
        if self.len() < 2 {
            return;
        }
        if let (Some(head), Some(tail)) = (self.head, self.tail) {
            self.quicksort_range(head, tail, &mut cmp);
        }
    }

    /// Truncates from the tail until at most `capacity` nodes remain.
    ///
    /// `shrink(0)` clears the list; `capacity >= len` is a no-op.
    pub fn shrink(&mut self, capacity: usize) {
        while self.len() > capacity {
            self.pop_back();
        }
    }

    /// Returns a fresh list holding this list's values followed by `other`'s.
    ///
    /// Neither input is modified.
    pub fn merge(&self, other: &Self) -> Self
    where
        T: Clone,
    {
        let mut merged = Self::with_capacity(self.len() + other.len());
        for value in self.iter() {
            merged.push_back(value.clone());
        }
        for value in other.iter() {
            merged.push_back(value.clone());
        }
        merged
    }

    /// Appends `other`'s values to this list, consuming `other`.
    pub fn join(&mut self, mut other: Self) {
        while let Some(value) = other.pop_front() {
            self.push_back(value);
        }
    }

    /// Visits `(index, value)` pairs from the head; stops when `f` returns
    /// `false`.
    pub fn for_each<F>(&self, mut f: F)
    where
        F: FnMut(usize, &T) -> bool,
    {
        for (index, value) in self.iter().enumerate() {
            if !f(index, value) {
                break;
            }
        }
    }

    /// Returns the first value matching `pred`.
    pub fn find<F>(&self, mut pred: F) -> Option<&T>
    where
        F: FnMut(&T) -> bool,
    {
        self.iter().find(|value| pred(value))
    }

    /// Returns the index of the first value matching `pred`.
    pub fn position<F>(&self, mut pred: F) -> Option<usize>
    where
        F: FnMut(&T) -> bool,
    {
        self.iter().position(|value| pred(value))
    }

    /// Returns `true` if any value matches `pred`.
    pub fn any<F>(&self, pred: F) -> bool
    where
        F: FnMut(&T) -> bool,
    {
        self.position(pred).is_some()
    }

    /// Returns a new list holding clones of every value matching `pred`.
    pub fn filter<F>(&self, mut pred: F) -> Self
    where
        T: Clone,
        F: FnMut(&T) -> bool,
    {
        let mut filtered = Self::new();
        for value in self.iter() {
            if pred(value) {
                filtered.push_back(value.clone());
            }
        }
        filtered
    }

    /// Returns the index of the first value equal to `needle`.
    pub fn index_of(&self, needle: &T) -> Option<usize>
    where
        T: PartialEq,
    {
        self.iter().position(|value| value == needle)
    }

    /// Returns an iterator over values from front to back.
    pub fn iter(&self) -> Iter<'_, T> {
        Iter {
            list: self,
            current: self.head,
        }
    }

    /// Returns an iterator over `(NodeHandle, &T)` pairs from front to back.
    pub fn iter_entries(&self) -> EntryIter<'_, T> {
        EntryIter {
            list: self,
            current: self.head,
        }
    }

    /// Clears the list and frees all nodes, expiring every handle.
    pub fn clear(&mut self) {
        self.arena.clear();
        self.head = None;
        self.tail = None;
    }

    /// Validates the structural invariants, returning the first violation.
    pub fn check_invariants(&self) -> Result<(), InvariantError> {
        if self.head.is_none() || self.tail.is_none() {
            if self.head.is_some() || self.tail.is_some() {
                return Err(InvariantError::new("head/tail set on empty list"));
            }
            if self.len() != 0 {
                return Err(InvariantError::new("empty endpoints but non-zero len"));
            }
            return Ok(());
        }

        let mut count = 0usize;
        let mut current = self.head;
        let mut prev = None;
        let mut forward = Vec::with_capacity(self.len());

        while let Some(handle) = current {
            let node = self
                .arena
                .get(handle)
                .ok_or_else(|| InvariantError::new("linked node missing from arena"))?;
            if node.prev != prev {
                return Err(InvariantError::new("prev link does not match traversal"));
            }
            forward.push(handle);
            prev = Some(handle);
            current = node.next;
            count += 1;
            if count > self.len() {
                return Err(InvariantError::new("cycle detected in list"));
            }
        }

        if count != self.len() {
            return Err(InvariantError::new("traversal count differs from len"));
        }
        if prev != self.tail {
            return Err(InvariantError::new("forward traversal does not end at tail"));
        }

        // The backward walk must visit exactly the forward sequence reversed.
        let mut current = self.tail;
        for &expected in forward.iter().rev() {
            let handle = current
                .ok_or_else(|| InvariantError::new("backward traversal ended early"))?;
            if handle != expected {
                return Err(InvariantError::new("backward traversal order mismatch"));
            }
            current = self.arena.get(handle).and_then(|node| node.prev);
        }

        Ok(())
    }

    #[cfg(any(test, debug_assertions))]
    pub fn debug_validate_invariants(&self) {
        if let Err(err) = self.check_invariants() {
            panic!("{err}");
        }
    }

    fn normalize_index(&self, index: isize) -> Option<usize> {
        if self.is_empty() {
            return None;
        }
        let len = self.len() as isize;
        let mut normalized = index % len;
        if normalized < 0 {
            normalized += len;
        }
        Some(normalized as usize)
    }

    fn handle_at_position(&self, position: usize) -> Option<NodeHandle> {
        if position < self.len() / 2 + self.len() % 2 {
            let mut current = self.head?;
            for _ in 0..position {
                current = self.arena.get(current)?.next?;
            }
            Some(current)
        } else {
            let mut current = self.tail?;
            for _ in 0..(self.len() - 1 - position) {
                current = self.arena.get(current)?.prev?;
            }
            Some(current)
        }
    }

    fn swap_values(&mut self, a: NodeHandle, b: NodeHandle) {
        if let Some((x, y)) = self.arena.get2_mut(a, b) {
            std::mem::swap(&mut x.value, &mut y.value);
        }
    }

    fn next_of(&self, handle: NodeHandle) -> Option<NodeHandle> {
        self.arena.get(handle).and_then(|node| node.next)
    }

    fn prev_of(&self, handle: NodeHandle) -> Option<NodeHandle> {
        self.arena.get(handle).and_then(|node| node.prev)
    }

    fn quicksort_range<F>(&mut self, low: NodeHandle, high: NodeHandle, cmp: &mut F)
    where
        F: FnMut(&T, &T) -> Ordering,
    {
        if low == high {
            return;
        }
        let pivot = self.partition_range(low, high, cmp);
        if pivot != low {
            if let Some(before) = self.prev_of(pivot) {
                self.quicksort_range(low, before, cmp);
            }
        }
        if pivot != high {
            if let Some(after) = self.next_of(pivot) {
                self.quicksort_range(after, high, cmp);
            }
        }
    }

    // Lomuto partition over [low, high] with high's value as the pivot.
    // `boundary` tracks the last node of the <=-pivot region; values are
    // swapped between nodes, links stay put.
    fn partition_range<F>(&mut self, low: NodeHandle, high: NodeHandle, cmp: &mut F) -> NodeHandle
    where
        F: FnMut(&T, &T) -> Ordering,
    {
        let mut boundary: Option<NodeHandle> = None;
        let mut scan = low;
        while scan != high {
            let le_pivot = match (self.arena.get(scan), self.arena.get(high)) {
                (Some(node), Some(pivot)) => {
                    cmp(&node.value, &pivot.value) != Ordering::Greater
                },
                _ => false,
            };
            if le_pivot {
                let next_boundary = match boundary {
                    None => low,
                    Some(handle) => self.next_of(handle).unwrap_or(scan),
                };
                if next_boundary != scan {
                    self.swap_values(next_boundary, scan);
                }
                boundary = Some(next_boundary);
            }
            scan = match self.next_of(scan) {
                Some(next) => next,
                None => break,
            };
        }

        let slot = match boundary {
            None => low,
            Some(handle) => self.next_of(handle).unwrap_or(high),
        };
        if slot != high {
            self.swap_values(slot, high);
        }
        slot
    }

    fn detach(&mut self, handle: NodeHandle) -> Option<()> {
        let (prev, next) = {
            let node = self.arena.get(handle)?;
            (node.prev, node.next)
        };

        if let Some(prev_handle) = prev {
            if let Some(prev_node) = self.arena.get_mut(prev_handle) {
                prev_node.next = next;
            }
        } else {
            self.head = next;
        }

        if let Some(next_handle) = next {
            if let Some(next_node) = self.arena.get_mut(next_handle) {
                next_node.prev = prev;
            }
        } else {
            self.tail = prev;
        }

        if let Some(node) = self.arena.get_mut(handle) {
            node.prev = None;
            node.next = None;
        }

        Some(())
    }

    fn attach_front(&mut self, handle: NodeHandle) -> Option<()> {
        let old_head = self.head;
        if let Some(node) = self.arena.get_mut(handle) {
            node.prev = None;
            node.next = old_head;
        } else {
            return None;
        }
        if let Some(old_head) = old_head {
            if let Some(head_node) = self.arena.get_mut(old_head) {
                head_node.prev = Some(handle);
            }
        } else {
            self.tail = Some(handle);
        }
        self.head = Some(handle);
        Some(())
    }

    fn attach_before(&mut self, anchor: NodeHandle, handle: NodeHandle) -> Option<()> {
        let anchor_prev = self.arena.get(anchor)?.prev;
        {
            let node = self.arena.get_mut(handle)?;
            node.prev = anchor_prev;
            node.next = Some(anchor);
        }
        if let Some(prev) = anchor_prev {
            if let Some(prev_node) = self.arena.get_mut(prev) {
                prev_node.next = Some(handle);
            }
        } else {
            self.head = Some(handle);
        }
        if let Some(anchor_node) = self.arena.get_mut(anchor) {
            anchor_node.prev = Some(handle);
        }
        Some(())
    }

    fn attach_after(&mut self, anchor: NodeHandle, handle: NodeHandle) -> Option<()> {
        let anchor_next = self.arena.get(anchor)?.next;
        {
            let node = self.arena.get_mut(handle)?;
            node.prev = Some(anchor);
            node.next = anchor_next;
        }
        if let Some(next) = anchor_next {
            if let Some(next_node) = self.arena.get_mut(next) {
                next_node.prev = Some(handle);
            }
        } else {
            self.tail = Some(handle);
        }
        if let Some(anchor_node) = self.arena.get_mut(anchor) {
            anchor_node.next = Some(handle);
        }
        Some(())
    }
}

/// Iterator over values from front to back.
pub struct Iter<'a, T> {
    list: &'a LinkedList<T>,
    current: Option<NodeHandle>,
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<Self::Item> {
        let handle = self.current?;
        let node = self.list.arena.get(handle)?;
        self.current = node.next;
        Some(&node.value)
    }
}

/// Iterator over `(NodeHandle, &T)` pairs from front to back.
pub struct EntryIter<'a, T> {
    list: &'a LinkedList<T>,
    current: Option<NodeHandle>,
}

impl<'a, T> Iterator for EntryIter<'a, T> {
    type Item = (NodeHandle, &'a T);

    fn next(&mut self) -> Option<Self::Item> {
        let handle = self.current?;
        let node = self.list.arena.get(handle)?;
        self.current = node.next;
        Some((handle, &node.value))
    }
}

impl<T> Default for LinkedList<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> crate::traits::List<T> for LinkedList<T> {
    fn len(&self) -> usize {
        LinkedList::len(self)
    }

    fn push_front(&mut self, value: T) {
        LinkedList::push_front(self, value);
    }

    fn push_back(&mut self, value: T) {
        LinkedList::push_back(self, value);
    }

    fn pop_front(&mut self) -> Option<T> {
        LinkedList::pop_front(self)
    }

    fn pop_back(&mut self) -> Option<T> {
        LinkedList::pop_back(self)
    }

    fn at(&self, index: isize) -> T
    where
        T: Clone + Default,
    {
        LinkedList::at(self, index)
    }

    fn delete(&mut self, index: isize) -> Option<T> {
        LinkedList::delete(self, index)
    }

    fn shrink(&mut self, capacity: usize) {
        LinkedList::shrink(self, capacity)
    }

    fn clear(&mut self) {
        LinkedList::clear(self)
    }
}

impl<T> Extend<T> for LinkedList<T> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        for value in iter {
            self.push_back(value);
        }
    }
}

impl<T> FromIterator<T> for LinkedList<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut list = Self::new();
        list.extend(iter);
        list
    }
}
