//! Recency ring: a circular doubly-linked list stored in an arena.
//!
//! Nodes live in a `Vec` and link to each other through integer handles, so
//! unlinking and relinking is plain index arithmetic. Slot 0 is the sentinel:
//! it never holds a value, is never freed, and its neighbours are the front
//! (most recently touched) and the back (least recently touched) of the ring.
//! Freed slots go on a free-list and are reused by later inserts.

/// Arena index of the sentinel node.
const SENTINEL: usize = 0;

/// Stable, non-owning reference to a node in a [`Ring`].
///
/// A handle stays valid until its node is removed or the ring is cleared.
/// Using a stale handle never panics, but after slot reuse it may address a
/// different node, so owners must drop handles together with their nodes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Handle(usize);

struct Node<T> {
    value: Option<T>,
    prev: usize,
    next: usize,
}

impl<T> Node<T> {
    fn sentinel() -> Self {
        Self {
            value: None,
            prev: SENTINEL,
            next: SENTINEL,
        }
    }
}

/// Circular doubly-linked list ordered from most to least recently touched.
///
/// The ring only manages order; it knows nothing about keys.
pub struct Ring<T> {
    nodes: Vec<Node<T>>,
    free_list: Vec<usize>,
    count: usize,
}

impl<T> Ring<T> {
    /// Create an empty ring holding only the sentinel
    pub fn new() -> Self {
        Self::with_capacity(0)
    }

    /// Create an empty ring with room for `capacity` data nodes
    pub fn with_capacity(capacity: usize) -> Self {
        let mut nodes = Vec::with_capacity(capacity + 1);
        nodes.push(Node::sentinel());

        Self {
            nodes,
            free_list: Vec::new(),
            count: 0,
        }
    }

    /// Number of data nodes (the sentinel is not counted)
    pub fn len(&self) -> usize {
        self.count
    }

    /// Check if the ring holds no data nodes
    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// Insert a value as the new front and return its handle
    pub fn insert_front(&mut self, value: T) -> Handle {
        let idx = self.alloc_node(value);
        self.link_front(idx);
        self.count += 1;
        Handle(idx)
    }

    /// Move a node to the front.
    ///
    /// A node already at the front is left untouched. Stale handles and the
    /// sentinel are ignored.
    pub fn move_to_front(&mut self, handle: Handle) {
        let idx = handle.0;
        if !self.is_live(idx) || self.nodes[idx].prev == SENTINEL {
            return;
        }

        self.unlink(idx);
        self.link_front(idx);
    }

    /// Remove the back node and return its value, or `None` if the ring is empty
    pub fn remove_back(&mut self) -> Option<T> {
        if self.count == 0 {
            return None;
        }
        let back = self.nodes[SENTINEL].prev;
        self.remove(Handle(back))
    }

    /// Remove an arbitrary node and return its value
    pub fn remove(&mut self, handle: Handle) -> Option<T> {
        let idx = handle.0;
        if !self.is_live(idx) {
            return None;
        }

        self.unlink(idx);
        self.count -= 1;
        self.free_node(idx)
    }

    /// Handle of the most recently touched node
    pub fn front(&self) -> Option<Handle> {
        if self.count == 0 {
            None
        } else {
            Some(Handle(self.nodes[SENTINEL].next))
        }
    }

    /// Handle of the least recently touched node (the eviction candidate)
    pub fn back(&self) -> Option<Handle> {
        if self.count == 0 {
            None
        } else {
            Some(Handle(self.nodes[SENTINEL].prev))
        }
    }

    /// Borrow the value behind a handle
    pub fn get(&self, handle: Handle) -> Option<&T> {
        if handle.0 == SENTINEL {
            return None;
        }
        self.nodes.get(handle.0).and_then(|node| node.value.as_ref())
    }

    /// Mutably borrow the value behind a handle
    pub fn get_mut(&mut self, handle: Handle) -> Option<&mut T> {
        if handle.0 == SENTINEL {
            return None;
        }
        self.nodes.get_mut(handle.0).and_then(|node| node.value.as_mut())
    }

    /// Drop every data node and start over with a fresh sentinel
    pub fn clear(&mut self) {
        self.nodes.truncate(1);
        self.nodes[SENTINEL] = Node::sentinel();
        self.free_list.clear();
        self.count = 0;
    }

    /// Iterate values from front to back
    pub fn iter(&self) -> Iter<'_, T> {
        Iter {
            nodes: &self.nodes,
            front: self.nodes[SENTINEL].next,
            back: self.nodes[SENTINEL].prev,
            remaining: self.count,
        }
    }

    fn is_live(&self, idx: usize) -> bool {
        idx != SENTINEL
            && self
                .nodes
                .get(idx)
                .is_some_and(|node| node.value.is_some())
    }

    /// Splice `idx` in right after the sentinel
    fn link_front(&mut self, idx: usize) {
        let first = self.nodes[SENTINEL].next;

        let node = &mut self.nodes[idx];
        node.prev = SENTINEL;
        node.next = first;

        self.nodes[first].prev = idx;
        self.nodes[SENTINEL].next = idx;
    }

    /// Detach `idx`, patching both neighbours
    fn unlink(&mut self, idx: usize) {
        let (prev, next) = {
            let node = &self.nodes[idx];
            (node.prev, node.next)
        };

        self.nodes[prev].next = next;
        self.nodes[next].prev = prev;

        let node = &mut self.nodes[idx];
        node.prev = SENTINEL;
        node.next = SENTINEL;
    }

    fn alloc_node(&mut self, value: T) -> usize {
        if let Some(idx) = self.free_list.pop() {
            self.nodes[idx].value = Some(value);
            idx
        } else {
            let idx = self.nodes.len();
            self.nodes.push(Node {
                value: Some(value),
                prev: SENTINEL,
                next: SENTINEL,
            });
            idx
        }
    }

    fn free_node(&mut self, idx: usize) -> Option<T> {
        self.free_list.push(idx);
        self.nodes[idx].value.take()
    }

    /// Walk the ring in both directions and check every link.
    #[cfg(test)]
    pub(crate) fn assert_links(&self) {
        let sentinel = &self.nodes[SENTINEL];
        assert!(sentinel.value.is_none(), "sentinel must not hold a value");

        let mut forward = Vec::with_capacity(self.count);
        let mut cur = sentinel.next;
        while cur != SENTINEL {
            assert!(forward.len() < self.count, "forward walk overran count");
            let node = &self.nodes[cur];
            assert!(node.value.is_some(), "linked node {cur} is free");
            assert_eq!(self.nodes[node.next].prev, cur, "stale prev after {cur}");
            forward.push(cur);
            cur = node.next;
        }
        assert_eq!(forward.len(), self.count, "forward walk missed nodes");

        let mut backward = Vec::with_capacity(self.count);
        let mut cur = sentinel.prev;
        while cur != SENTINEL {
            assert!(backward.len() < self.count, "backward walk overran count");
            let node = &self.nodes[cur];
            assert_eq!(self.nodes[node.prev].next, cur, "stale next before {cur}");
            backward.push(cur);
            cur = node.prev;
        }
        backward.reverse();
        assert_eq!(forward, backward, "ring split into disjoint cycles");

        let live = self.nodes.iter().filter(|node| node.value.is_some()).count();
        assert_eq!(live, self.count, "arena holds unlinked values");
    }

    #[cfg(test)]
    pub(crate) fn arena_len(&self) -> usize {
        self.nodes.len()
    }
}

impl<T> Default for Ring<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: std::fmt::Debug> std::fmt::Debug for Ring<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

/// Front-to-back iterator over a [`Ring`]
pub struct Iter<'a, T> {
    nodes: &'a [Node<T>],
    front: usize,
    back: usize,
    remaining: usize,
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        let node = &self.nodes[self.front];
        self.front = node.next;
        self.remaining -= 1;
        node.value.as_ref()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<T> DoubleEndedIterator for Iter<'_, T> {
    fn next_back(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        let node = &self.nodes[self.back];
        self.back = node.prev;
        self.remaining -= 1;
        node.value.as_ref()
    }
}

impl<T> ExactSizeIterator for Iter<'_, T> {}

#[cfg(test)]
mod tests {
    use super::*;

    fn collect<T: Copy>(ring: &Ring<T>) -> Vec<T> {
        ring.iter().copied().collect()
    }

    #[test]
    fn test_ring_new_is_empty() {
        let ring: Ring<i32> = Ring::new();

        assert_eq!(ring.len(), 0);
        assert!(ring.is_empty());
        assert_eq!(ring.front(), None);
        assert_eq!(ring.back(), None);
        assert_eq!(ring.nodes[SENTINEL].next, SENTINEL);
        assert_eq!(ring.nodes[SENTINEL].prev, SENTINEL);
        ring.assert_links();
    }

    #[test]
    fn test_ring_insert_front() {
        let mut ring = Ring::new();

        let first = ring.insert_front(1);
        // Single node links to the sentinel on both sides
        assert_eq!(ring.nodes[first.0].prev, SENTINEL);
        assert_eq!(ring.nodes[first.0].next, SENTINEL);
        ring.assert_links();

        ring.insert_front(2);
        ring.insert_front(3);

        assert_eq!(ring.len(), 3);
        assert_eq!(collect(&ring), vec![3, 2, 1]);
        assert_eq!(ring.get(ring.front().unwrap()), Some(&3));
        assert_eq!(ring.get(ring.back().unwrap()), Some(&1));
        ring.assert_links();
    }

    #[test]
    fn test_ring_move_to_front() {
        let mut ring = Ring::new();
        let handles: Vec<_> = (1..=5).map(|v| ring.insert_front(v)).collect();
        // Order: 5 4 3 2 1

        ring.move_to_front(handles[2]);
        assert_eq!(collect(&ring), vec![3, 5, 4, 2, 1]);
        ring.assert_links();

        // Back node
        ring.move_to_front(handles[0]);
        assert_eq!(collect(&ring), vec![1, 3, 5, 4, 2]);
        ring.assert_links();

        // Node just behind the front
        ring.move_to_front(handles[2]);
        assert_eq!(collect(&ring), vec![3, 1, 5, 4, 2]);
        ring.assert_links();

        assert_eq!(ring.len(), 5);
    }

    #[test]
    fn test_ring_move_front_is_noop() {
        let mut ring = Ring::new();
        ring.insert_front(1);
        let front = ring.insert_front(2);

        let before: Vec<_> = ring.nodes.iter().map(|n| (n.prev, n.next)).collect();
        ring.move_to_front(front);
        let after: Vec<_> = ring.nodes.iter().map(|n| (n.prev, n.next)).collect();

        assert_eq!(before, after);
        ring.assert_links();
    }

    #[test]
    fn test_ring_move_only_node() {
        let mut ring = Ring::new();
        let only = ring.insert_front(7);

        ring.move_to_front(only);

        assert_eq!(collect(&ring), vec![7]);
        ring.assert_links();
    }

    #[test]
    fn test_ring_remove_back() {
        let mut ring = Ring::new();
        for v in 1..=3 {
            ring.insert_front(v);
        }

        assert_eq!(ring.remove_back(), Some(1));
        ring.assert_links();
        assert_eq!(ring.remove_back(), Some(2));
        ring.assert_links();
        assert_eq!(collect(&ring), vec![3]);

        assert_eq!(ring.remove_back(), Some(3));
        assert!(ring.is_empty());
        assert_eq!(ring.nodes[SENTINEL].next, SENTINEL);
        assert_eq!(ring.nodes[SENTINEL].prev, SENTINEL);
        ring.assert_links();
    }

    #[test]
    fn test_ring_remove_back_empty() {
        let mut ring: Ring<i32> = Ring::new();
        assert_eq!(ring.remove_back(), None);
        assert_eq!(ring.len(), 0);
        ring.assert_links();
    }

    #[test]
    fn test_ring_remove_patches_new_back() {
        let mut ring = Ring::new();
        for v in 1..=4 {
            ring.insert_front(v);
        }

        ring.remove_back();
        let back = ring.back().unwrap();

        // New back points forward to the sentinel, and the sentinel points back to it
        assert_eq!(ring.nodes[back.0].next, SENTINEL);
        assert_eq!(ring.nodes[SENTINEL].prev, back.0);
        assert_eq!(ring.get(back), Some(&2));
        assert_eq!(ring.iter().rev().copied().collect::<Vec<_>>(), vec![2, 3, 4]);
    }

    #[test]
    fn test_ring_remove_middle() {
        let mut ring = Ring::new();
        let handles: Vec<_> = (1..=3).map(|v| ring.insert_front(v)).collect();

        assert_eq!(ring.remove(handles[1]), Some(2));
        assert_eq!(collect(&ring), vec![3, 1]);
        ring.assert_links();

        // Already removed
        assert_eq!(ring.remove(handles[1]), None);
        assert_eq!(ring.len(), 2);
    }

    #[test]
    fn test_ring_stale_handles_ignored() {
        let mut ring = Ring::new();
        let a = ring.insert_front(1);
        ring.insert_front(2);
        ring.remove(a);

        ring.move_to_front(a);
        ring.move_to_front(Handle(SENTINEL));
        ring.move_to_front(Handle(99));

        assert_eq!(collect(&ring), vec![2]);
        assert_eq!(ring.get(a), None);
        assert_eq!(ring.get(Handle(SENTINEL)), None);
        ring.assert_links();
    }

    #[test]
    fn test_ring_reuses_free_slots() {
        let mut ring = Ring::new();
        for v in 0..4 {
            ring.insert_front(v);
        }

        for v in 4..100 {
            ring.remove_back();
            ring.insert_front(v);
            ring.assert_links();
        }

        // Sentinel plus four data slots
        assert_eq!(ring.arena_len(), 5);
        assert_eq!(collect(&ring), vec![99, 98, 97, 96]);
    }

    #[test]
    fn test_ring_get_mut() {
        let mut ring = Ring::new();
        let h = ring.insert_front(String::from("a"));

        if let Some(value) = ring.get_mut(h) {
            value.push('b');
        }

        assert_eq!(ring.get(h).map(String::as_str), Some("ab"));
    }

    #[test]
    fn test_ring_clear() {
        let mut ring = Ring::new();
        let h = ring.insert_front(1);
        ring.insert_front(2);

        ring.clear();

        assert!(ring.is_empty());
        assert_eq!(ring.get(h), None);
        assert_eq!(ring.arena_len(), 1);
        ring.assert_links();

        ring.insert_front(3);
        assert_eq!(collect(&ring), vec![3]);
        ring.assert_links();
    }

    #[test]
    fn test_ring_iter_both_ends() {
        let mut ring = Ring::new();
        for v in 1..=4 {
            ring.insert_front(v);
        }

        let mut iter = ring.iter();
        assert_eq!(iter.len(), 4);
        assert_eq!(iter.next(), Some(&4));
        assert_eq!(iter.next_back(), Some(&1));
        assert_eq!(iter.next(), Some(&3));
        assert_eq!(iter.next_back(), Some(&2));
        assert_eq!(iter.next(), None);
        assert_eq!(iter.next_back(), None);
    }
}
