//! Addressable min-heaps for grow and expand events (C5).
//!
//! Grounded on the `priority-queue` crate, the same dependency `yuewuo-fusion-blossom` (and
//! independently `yuewuo-mwps`) reach for whenever they need an addressable decrease-key heap.

use crate::util::{BlossomIndex, OrderedWeight, Weight};
use priority_queue::PriorityQueue;
use std::cmp::Reverse;

type Priority = Reverse<OrderedWeight>;

/// an addressable min-heap keyed by [`BlossomIndex`]; each blossom holds at most one entry at a
/// time, matching the `growRef`/`expandRef` handle contract
#[derive(Default)]
pub struct EventHeap {
    queue: PriorityQueue<BlossomIndex, Priority>,
}

impl EventHeap {
    pub fn new() -> Self {
        Self { queue: PriorityQueue::new() }
    }

    /// insert `b` with `key`, or lower its existing key if `key` is smaller; returns true iff the
    /// heap's entry for `b` changed
    pub fn insert_or_decrease(&mut self, b: BlossomIndex, key: Weight) -> bool {
        let new_priority = Reverse(OrderedWeight(key));
        match self.queue.get_priority(&b) {
            None => {
                self.queue.push(b, new_priority);
                true
            }
            Some(&current) => {
                if new_priority > current {
                    self.queue.change_priority(&b, new_priority);
                    true
                } else {
                    false
                }
            }
        }
    }

    /// remove `b`'s entry if present (used when a blossom leaves the state that made it eligible)
    pub fn remove(&mut self, b: BlossomIndex) {
        self.queue.remove(&b);
    }

    pub fn contains(&self, b: BlossomIndex) -> bool {
        self.queue.get(&b).is_some()
    }

    /// the minimum `(blossom, key)` pair without removing it
    pub fn peek_min(&self) -> Option<(BlossomIndex, Weight)> {
        self.queue.peek().map(|(&b, p)| (b, (p.0).0))
    }

    /// extract the minimum `(blossom, key)` pair
    pub fn pop_min(&mut self) -> Option<(BlossomIndex, Weight)> {
        self.queue.pop().map(|(b, Reverse(OrderedWeight(k)))| (b, k))
    }

    pub fn clear(&mut self) {
        self.queue.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pops_in_ascending_order() {
        let mut heap = EventHeap::new();
        heap.insert_or_decrease(1, 5.0);
        heap.insert_or_decrease(2, 1.0);
        heap.insert_or_decrease(3, 3.0);
        assert_eq!(heap.pop_min(), Some((2, 1.0)));
        assert_eq!(heap.pop_min(), Some((3, 3.0)));
        assert_eq!(heap.pop_min(), Some((1, 5.0)));
        assert_eq!(heap.pop_min(), None);
    }

    #[test]
    fn decrease_key_only_lowers() {
        let mut heap = EventHeap::new();
        heap.insert_or_decrease(1, 5.0);
        assert!(!heap.insert_or_decrease(1, 7.0));
        assert_eq!(heap.peek_min(), Some((1, 5.0)));
        assert!(heap.insert_or_decrease(1, 2.0));
        assert_eq!(heap.peek_min(), Some((1, 2.0)));
    }

    #[test]
    fn remove_drops_entry() {
        let mut heap = EventHeap::new();
        heap.insert_or_decrease(1, 5.0);
        heap.remove(1);
        assert!(!heap.contains(1));
        assert!(heap.is_empty());
    }
}
