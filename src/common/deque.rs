//! An arena-backed doubly-linked deque with stable node handles.
//!
//! The deque keeps the access order of cache entries: front = least recently
//! used, back = most recently used. Nodes live in a `Vec` arena and are
//! addressed by [`NodeHandle`] indices, so the lookup index can record an
//! entry's position without holding a reference into the list. Freed slots
//! are recycled through an intrusive free list, keeping the arena bounded by
//! the peak number of live entries.

/// Null link marker for the index-based list.
const SENTINEL: usize = usize::MAX;

/// Stable address of a live node in a [`Deque`] arena.
///
/// A handle stays valid until the node it names is unlinked (or the deque is
/// cleared). Handles are only ever dereferenced by the deque itself, so a
/// stale handle cannot dangle; passing one back after its node was unlinked
/// is a logic error and panics.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct NodeHandle(usize);

struct DeqNode<T> {
    /// `None` marks a vacant slot; `next` then links to the next free slot.
    element: Option<T>,
    prev: usize,
    next: usize,
}

pub(crate) struct Deque<T> {
    arena: Vec<DeqNode<T>>,
    head: usize,
    tail: usize,
    free_head: usize,
    len: usize,
}

impl<T> Default for Deque<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Deque<T> {
    pub(crate) fn new() -> Self {
        Self::with_capacity(0)
    }

    pub(crate) fn with_capacity(capacity: usize) -> Self {
        Self {
            arena: Vec::with_capacity(capacity),
            head: SENTINEL,
            tail: SENTINEL,
            free_head: SENTINEL,
            len: 0,
        }
    }

    pub(crate) fn len(&self) -> usize {
        self.len
    }

    /// Appends `element` at the back (the most-recently-used position) and
    /// returns a stable handle to its node.
    pub(crate) fn push_back(&mut self, element: T) -> NodeHandle {
        let idx = self.alloc_slot(element);
        self.link_back(idx);
        NodeHandle(idx)
    }

    /// Moves the node named by `handle` to the back. No-op if it is already
    /// the back-most node.
    pub(crate) fn move_to_back(&mut self, handle: NodeHandle) {
        let idx = handle.0;
        debug_assert!(self.arena[idx].element.is_some(), "move_to_back: vacant slot");
        if self.tail == idx {
            return;
        }
        self.detach(idx);
        self.link_back(idx);
    }

    /// Returns the front (least-recently-used) element without removing it.
    pub(crate) fn peek_front(&self) -> Option<&T> {
        if self.head == SENTINEL {
            None
        } else {
            self.arena[self.head].element.as_ref()
        }
    }

    /// Removes and returns the front (least-recently-used) element.
    pub(crate) fn pop_front(&mut self) -> Option<T> {
        if self.head == SENTINEL {
            return None;
        }
        let idx = self.head;
        self.detach(idx);
        Some(self.free_slot(idx))
    }

    /// Removes the node named by `handle` from anywhere in the deque and
    /// returns its element.
    ///
    /// Panics if the handle does not name a live node.
    pub(crate) fn unlink(&mut self, handle: NodeHandle) -> T {
        let idx = handle.0;
        if idx >= self.arena.len() || self.arena[idx].element.is_none() {
            panic!("unlink: handle {:?} does not name a live node", handle);
        }
        self.detach(idx);
        self.free_slot(idx)
    }

    /// Drops all elements and resets the arena.
    pub(crate) fn clear(&mut self) {
        self.arena.clear();
        self.head = SENTINEL;
        self.tail = SENTINEL;
        self.free_head = SENTINEL;
        self.len = 0;
    }

    /// Iterates front-to-back (LRU to MRU).
    pub(crate) fn iter(&self) -> Iter<'_, T> {
        Iter {
            arena: &self.arena,
            current: self.head,
        }
    }

    fn alloc_slot(&mut self, element: T) -> usize {
        self.len += 1;
        if self.free_head != SENTINEL {
            let idx = self.free_head;
            self.free_head = self.arena[idx].next;
            self.arena[idx] = DeqNode {
                element: Some(element),
                prev: SENTINEL,
                next: SENTINEL,
            };
            idx
        } else {
            self.arena.push(DeqNode {
                element: Some(element),
                prev: SENTINEL,
                next: SENTINEL,
            });
            self.arena.len() - 1
        }
    }

    /// Unlinks the node at `idx` from the list without freeing its slot.
    fn detach(&mut self, idx: usize) {
        let prev = self.arena[idx].prev;
        let next = self.arena[idx].next;

        if prev != SENTINEL {
            self.arena[prev].next = next;
        } else {
            self.head = next;
        }

        if next != SENTINEL {
            self.arena[next].prev = prev;
        } else {
            self.tail = prev;
        }

        self.arena[idx].prev = SENTINEL;
        self.arena[idx].next = SENTINEL;
    }

    /// Takes the element out of the slot at `idx` and pushes the slot onto
    /// the free list.
    fn free_slot(&mut self, idx: usize) -> T {
        let element = match self.arena[idx].element.take() {
            Some(element) => element,
            None => panic!("free_slot: slot {} is already vacant", idx),
        };
        self.arena[idx].next = self.free_head;
        self.free_head = idx;
        self.len -= 1;
        element
    }

    fn link_back(&mut self, idx: usize) {
        self.arena[idx].prev = self.tail;
        self.arena[idx].next = SENTINEL;

        if self.tail != SENTINEL {
            self.arena[self.tail].next = idx;
        } else {
            self.head = idx;
        }
        self.tail = idx;
    }
}

pub(crate) struct Iter<'a, T> {
    arena: &'a [DeqNode<T>],
    current: usize,
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<Self::Item> {
        if self.current == SENTINEL {
            return None;
        }
        let node = &self.arena[self.current];
        self.current = node.next;
        node.element.as_ref()
    }
}
