//! Array-backed binary min-heap keyed by any totally ordered key.
//!
//! Entries are stored densely as a complete binary tree: the parent of index `i`
//! is `(i - 1) / 2` and its children are `2i + 1` and `2i + 2`. Every non-root
//! entry has a key greater than or equal to its parent's key, so the root is
//! always the minimum. Equal keys are not FIFO on their own; callers that need
//! stable ordering must encode arrival order into the key (see [`TaskKey`]).
//!
//! [`TaskKey`]: crate::core::TaskKey

use std::fmt;

/// Binary min-heap over `(key, value)` entries.
///
/// Enqueue and dequeue are `O(log n)`, size is `O(1)`. No operation fails:
/// dequeueing an empty queue yields `None`.
pub struct PriorityQueue<K, T> {
    heap: Vec<(K, T)>,
}

impl<K: Ord, T> PriorityQueue<K, T> {
    /// Create an empty queue.
    #[must_use]
    pub const fn new() -> Self {
        Self { heap: Vec::new() }
    }

    /// Create an empty queue with room for `capacity` entries before reallocating.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            heap: Vec::with_capacity(capacity),
        }
    }

    /// Insert `value` ranked by `key`.
    pub fn enqueue(&mut self, value: T, key: K) {
        self.heap.push((key, value));
        self.sift_up(self.heap.len() - 1);
    }

    /// Remove and return the value with the smallest key, or `None` if empty.
    pub fn dequeue(&mut self) -> Option<T> {
        if self.heap.is_empty() {
            return None;
        }
        // Move the last entry into the root slot, then sink it.
        let (_, value) = self.heap.swap_remove(0);
        if !self.heap.is_empty() {
            self.sift_down(0);
        }
        Some(value)
    }

    /// Key of the entry the next `dequeue` would return.
    #[must_use]
    pub fn peek_key(&self) -> Option<&K> {
        self.heap.first().map(|(key, _)| key)
    }

    /// Number of queued entries.
    #[must_use]
    pub fn size(&self) -> usize {
        self.heap.len()
    }

    /// Alias for [`size`](Self::size).
    #[must_use]
    pub fn len(&self) -> usize {
        self.heap.len()
    }

    /// True when nothing is queued.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }

    /// Drop every queued entry.
    pub fn clear(&mut self) {
        self.heap.clear();
    }

    fn sift_up(&mut self, mut index: usize) {
        while index > 0 {
            let parent = (index - 1) / 2;
            // Strict: an equal key stays below the existing entry.
            if self.heap[index].0 >= self.heap[parent].0 {
                break;
            }
            self.heap.swap(index, parent);
            index = parent;
        }
    }

    fn sift_down(&mut self, mut index: usize) {
        let len = self.heap.len();
        loop {
            let left = 2 * index + 1;
            let right = left + 1;
            let mut smallest = index;

            if left < len && self.heap[left].0 < self.heap[smallest].0 {
                smallest = left;
            }
            // Right wins only when strictly smaller than the current pick, so ties go left.
            if right < len && self.heap[right].0 < self.heap[smallest].0 {
                smallest = right;
            }
            if smallest == index {
                break;
            }
            self.heap.swap(index, smallest);
            index = smallest;
        }
    }

    #[cfg(test)]
    fn heap_property_holds(&self) -> bool {
        (1..self.heap.len()).all(|i| self.heap[i].0 >= self.heap[(i - 1) / 2].0)
    }
}

impl<K: Ord, T> Default for PriorityQueue<K, T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: fmt::Debug, T: fmt::Debug> fmt::Debug for PriorityQueue<K, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PriorityQueue")
            .field("len", &self.heap.len())
            .field("heap", &self.heap)
            .finish()
    }
}
