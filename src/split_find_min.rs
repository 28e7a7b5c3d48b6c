//! Split-find-min over the odd/out blossoms' slot range `[0, n)` (C3).
//!
//! `yuewuo-fusion-blossom/src/primal_module_serial.rs` tracks per-node boundary edge lists
//! directly rather than Gabow's accelerator structure, so this one has no direct counterpart to
//! adapt; it is implemented with an interval `BTreeSet` of group boundaries plus an array-backed
//! range-min segment tree over per-slot keys, giving O(log n) per operation rather than the
//! paper's O(α(n)) — a documented, observable-behavior-preserving substitution (see DESIGN.md).

use crate::util::{BlossomIndex, EdgeEvent, VertexIndex};
use std::collections::BTreeMap;
use std::collections::BTreeSet;

/// simple array-backed segment tree over `Option<EdgeEvent>`, supporting point update and
/// range-minimum query (`None` sorts as +infinity)
struct MinSegTree {
    n: usize,
    tree: Vec<Option<EdgeEvent>>,
}

fn combine(a: Option<EdgeEvent>, b: Option<EdgeEvent>) -> Option<EdgeEvent> {
    match (a, b) {
        (None, None) => None,
        (Some(x), None) => Some(x),
        (None, Some(y)) => Some(y),
        (Some(x), Some(y)) => Some(if x <= y { x } else { y }),
    }
}

impl MinSegTree {
    fn new(n: usize) -> Self {
        Self { n, tree: vec![None; 2 * n.max(1)] }
    }

    fn set(&mut self, mut i: usize, value: Option<EdgeEvent>) {
        i += self.n;
        self.tree[i] = value;
        while i > 1 {
            i /= 2;
            self.tree[i] = combine(self.tree[2 * i], self.tree[2 * i + 1]);
        }
    }

    /// minimum over `[l, r)`, 0-indexed
    fn query(&self, mut l: usize, mut r: usize) -> Option<EdgeEvent> {
        let mut result = None;
        l += self.n;
        r += self.n;
        while l < r {
            if l & 1 == 1 {
                result = combine(result, self.tree[l]);
                l += 1;
            }
            if r & 1 == 1 {
                r -= 1;
                result = combine(result, self.tree[r]);
            }
            l /= 2;
            r /= 2;
        }
        result
    }
}

pub struct SplitFindMin {
    n: usize,
    /// group start boundaries, always containing `0` and `n`
    boundaries: BTreeSet<usize>,
    /// group start -> owning blossom
    payload: BTreeMap<usize, BlossomIndex>,
    keys: MinSegTree,
    /// per-slot current key, for `decrease_key`'s "never increases" check
    slot_key: Vec<Option<EdgeEvent>>,
}

impl SplitFindMin {
    /// one group `[0, n)` with no payload and no keys (search begin)
    pub fn init(n: usize) -> Self {
        let mut boundaries = BTreeSet::new();
        boundaries.insert(0);
        boundaries.insert(n);
        Self {
            n,
            boundaries,
            payload: BTreeMap::new(),
            keys: MinSegTree::new(n.max(1)),
            slot_key: vec![None; n],
        }
    }

    /// collapse back to one group `[0, n)` with no payload and no keys, keeping `n` fixed; used at
    /// the start of every search instead of reallocating via `init`
    pub fn reset(&mut self) {
        self.boundaries.clear();
        self.boundaries.insert(0);
        self.boundaries.insert(self.n);
        self.payload.clear();
        self.keys = MinSegTree::new(self.n.max(1));
        self.slot_key.fill(None);
    }

    fn group_start(&self, slot: usize) -> usize {
        *self.boundaries.range(..=slot).next_back().expect("0 is always a boundary")
    }

    fn group_end(&self, start: usize) -> usize {
        *self.boundaries.range(start + 1..).next().expect("n is always a boundary")
    }

    /// install `b` as the payload of the root group; used once, right after `init`, for the first
    /// top-level blossom that owns the whole `[0, n)` range
    pub fn set_root_payload(&mut self, b: BlossomIndex) {
        self.payload.insert(0, b);
    }

    /// the blossom currently owning slot `v`
    pub fn find_blossom(&self, v: VertexIndex) -> BlossomIndex {
        let start = self.group_start(v);
        *self.payload.get(&start).expect("every group has a payload")
    }

    /// cut the current group at `begin`/`end`, installing `b` as the payload of the middle group
    /// and restoring the old payload on the flanks
    pub fn split(&mut self, b: BlossomIndex, begin: usize, end: usize) {
        if begin == end {
            return;
        }
        let old_start = self.group_start(begin);
        let old_payload = *self.payload.get(&old_start).expect("every group has a payload");
        if self.boundaries.insert(end) {
            self.payload.insert(end, old_payload);
        }
        self.boundaries.insert(begin);
        self.payload.insert(begin, b);
    }

    /// returns true iff `new_key` strictly lowers slot `v`'s key (a key never increases)
    pub fn decrease_key(&mut self, v: VertexIndex, new_key: EdgeEvent) -> bool {
        let lowers = match self.slot_key[v] {
            None => true,
            Some(current) => new_key < current,
        };
        if lowers {
            self.slot_key[v] = Some(new_key);
            self.keys.set(v, Some(new_key));
        }
        lowers
    }

    /// the minimum key in `v`'s current group
    pub fn find_min(&self, v: VertexIndex) -> Option<EdgeEvent> {
        let start = self.group_start(v);
        let end = self.group_end(start);
        self.keys.query(start, end)
    }

    pub fn len(&self) -> usize {
        self.n
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ev(edge: usize, slack: f64) -> EdgeEvent {
        EdgeEvent { edge, slack_bar: slack }
    }

    #[test]
    fn single_group_tracks_min() {
        let mut sfm = SplitFindMin::init(5);
        sfm.set_root_payload(100);
        assert_eq!(sfm.find_blossom(3), 100);
        assert!(sfm.decrease_key(2, ev(0, 3.0)));
        assert!(sfm.decrease_key(4, ev(1, 1.0)));
        assert!(!sfm.decrease_key(4, ev(2, 2.0))); // does not lower
        assert_eq!(sfm.find_min(0), Some(ev(1, 1.0)));
    }

    #[test]
    fn split_installs_new_payload_and_restores_flanks() {
        let mut sfm = SplitFindMin::init(10);
        sfm.set_root_payload(1);
        sfm.decrease_key(1, ev(0, 5.0));
        sfm.decrease_key(6, ev(1, 2.0));
        sfm.split(2, 3, 7);
        assert_eq!(sfm.find_blossom(0), 1);
        assert_eq!(sfm.find_blossom(3), 2);
        assert_eq!(sfm.find_blossom(6), 2);
        assert_eq!(sfm.find_blossom(7), 1);
        // slot 1's key is now only visible within group [0,3)
        assert_eq!(sfm.find_min(0), Some(ev(0, 5.0)));
        // slot 6's key is visible within group [3,7)
        assert_eq!(sfm.find_min(5), Some(ev(1, 2.0)));
    }

    #[test]
    fn nested_split_further_narrows_group() {
        let mut sfm = SplitFindMin::init(10);
        sfm.set_root_payload(1);
        sfm.split(2, 2, 8);
        sfm.split(3, 4, 6);
        assert_eq!(sfm.find_blossom(0), 1);
        assert_eq!(sfm.find_blossom(3), 2);
        assert_eq!(sfm.find_blossom(5), 3);
        assert_eq!(sfm.find_blossom(7), 2);
        assert_eq!(sfm.find_blossom(9), 1);
    }
}
