//! Min-priority frontier for wavefront expansions.
//!
//! Shortest-path expansions over the mesh pop the smallest key first. The
//! key type carries the full tie-break order, so pop order is a pure
//! function of the pushed keys and never depends on heap layout.

use std::cmp::{Ordering, Reverse};
use std::collections::BinaryHeap;

/// A non-negative path cost with a total order.
///
/// Ordered by [`f64::total_cmp`], so NaN sorts after every finite cost
/// instead of poisoning comparisons.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Cost(pub f64);

impl Eq for Cost {}

impl PartialOrd for Cost {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Cost {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.total_cmp(&other.0)
    }
}

/// A min-priority queue over an explicitly ordered key.
///
/// `K`'s `Ord` implementation is the complete pop order: the smallest key
/// pops first. Callers encode tie-breaks (plate id, cell id, push sequence)
/// as trailing key fields.
///
/// # Examples
///
/// ```
/// use strata_mesh::{Cost, Frontier};
///
/// let mut f = Frontier::new();
/// f.push((Cost(2.0), 1u32));
/// f.push((Cost(0.5), 7u32));
/// f.push((Cost(0.5), 3u32));
/// assert_eq!(f.pop(), Some((Cost(0.5), 3)));
/// assert_eq!(f.pop(), Some((Cost(0.5), 7)));
/// assert_eq!(f.pop(), Some((Cost(2.0), 1)));
/// assert_eq!(f.pop(), None);
/// ```
#[derive(Debug, Clone)]
pub struct Frontier<K: Ord> {
    heap: BinaryHeap<Reverse<K>>,
}

impl<K: Ord> Frontier<K> {
    /// Create an empty frontier.
    pub fn new() -> Self {
        Self {
            heap: BinaryHeap::new(),
        }
    }

    /// Create an empty frontier with room for `capacity` keys.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            heap: BinaryHeap::with_capacity(capacity),
        }
    }

    /// Push a key.
    pub fn push(&mut self, key: K) {
        self.heap.push(Reverse(key));
    }

    /// Pop the smallest key.
    pub fn pop(&mut self) -> Option<K> {
        self.heap.pop().map(|Reverse(k)| k)
    }

    /// Drop all keys, keeping the allocation.
    pub fn clear(&mut self) {
        self.heap.clear();
    }

    /// Number of queued keys.
    pub fn len(&self) -> usize {
        self.heap.len()
    }

    /// Returns `true` if no keys are queued.
    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }
}

impl<K: Ord> Default for Frontier<K> {
    fn default() -> Self {
        Self::new()
    }
}
