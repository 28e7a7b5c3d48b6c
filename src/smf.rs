//! Subtree-merge-find-min (C4): tracks the globally minimum non-tree edge whose endpoints lie in
//! the same merged subtree of an incrementally grown rooted forest.
//!
//! No direct teacher analog; implemented with a size-based union-find over SMF node ids plus
//! small-to-large reclassification of not-yet-internal ("boundary") non-tree edges into per-group
//! `BinaryHeap`s. Amortized O(n log^2 n) rather than the paper's O(α(n)) per op — a documented,
//! observable-behavior-preserving substitution (see DESIGN.md).

use crate::util::{OrderedWeight, Weight};
use std::cmp::Reverse;
use std::collections::BinaryHeap;

pub type SmfNodeIndex = usize;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct HeapItem {
    key: Reverse<OrderedWeight>,
    edge_ref: usize,
}

impl PartialOrd for HeapItem {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}
impl Ord for HeapItem {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.key.cmp(&other.key)
    }
}

#[derive(Debug, Clone)]
struct NonTreeEdgeRecord {
    a: SmfNodeIndex,
    b: SmfNodeIndex,
    key: Weight,
    data: u64,
}

#[derive(Default, Debug, Clone)]
struct GroupData {
    heap: BinaryHeap<HeapItem>,
    /// edges touching this group that have not yet been confirmed internal
    incident: Vec<usize>,
}

pub struct SubtreeMergeFindMin {
    parent: Vec<SmfNodeIndex>,
    size: Vec<usize>,
    /// present only at the current root of a group
    group: Vec<Option<GroupData>>,
    edges: Vec<NonTreeEdgeRecord>,
    /// virtual root of roots, returned by `init_tree`
    virtual_root: SmfNodeIndex,
}

/// a recorded non-tree edge returned by [`SubtreeMergeFindMin::find_min_non_tree_edge`]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NonTreeEdge {
    pub a: SmfNodeIndex,
    pub b: SmfNodeIndex,
    pub key: Weight,
    pub data: u64,
}

impl SubtreeMergeFindMin {
    pub fn new() -> Self {
        let virtual_root = 0;
        Self {
            parent: vec![virtual_root],
            size: vec![1],
            group: vec![Some(GroupData::default())],
            edges: Vec::new(),
            virtual_root,
        }
    }

    /// reset to a single virtual root and no leaves/edges; returns the virtual root id
    pub fn init_tree(&mut self) -> SmfNodeIndex {
        self.parent.clear();
        self.size.clear();
        self.group.clear();
        self.edges.clear();
        self.virtual_root = 0;
        self.parent.push(self.virtual_root);
        self.size.push(1);
        self.group.push(Some(GroupData::default()));
        self.virtual_root
    }

    /// re-initialize with `n` vertex-keyed nodes, all inactive (no group), plus one dedicated,
    /// always-active virtual root at index `n`; used by the search driver, which has one candidate
    /// SMF node per graph vertex and activates a vertex's node the moment it turns even, merging it
    /// into the virtual root's group so that every even vertex in the forest — regardless of which
    /// search tree it belongs to — ends up in one shared group over the course of a search
    pub fn reset_for_vertices(&mut self, n: usize) {
        self.parent = (0..=n).collect();
        self.size = vec![1; n + 1];
        self.group = vec![None; n + 1];
        self.group[n] = Some(GroupData::default());
        self.edges.clear();
        self.virtual_root = n;
    }

    /// activate vertex `v` as its own singleton group, if not already active; idempotent
    pub fn activate_vertex(&mut self, v: SmfNodeIndex) {
        if self.group[v].is_none() {
            self.parent[v] = v;
            self.size[v] = 1;
            self.group[v] = Some(GroupData::default());
        }
    }

    pub fn virtual_root(&self) -> SmfNodeIndex {
        self.virtual_root
    }

    /// attach a new leaf under `parent_hint`; the SMF tree shape itself is informational (only
    /// membership/merging matters for this structure's observable contract), so the new leaf
    /// starts as its own singleton group
    pub fn add_leaf(&mut self, _parent_hint: SmfNodeIndex) -> SmfNodeIndex {
        let id = self.parent.len();
        self.parent.push(id);
        self.size.push(1);
        self.group.push(Some(GroupData::default()));
        id
    }

    fn find(&mut self, x: SmfNodeIndex) -> SmfNodeIndex {
        let mut root = x;
        while self.parent[root] != root {
            root = self.parent[root];
        }
        let mut cur = x;
        while self.parent[cur] != root {
            let next = self.parent[cur];
            self.parent[cur] = root;
            cur = next;
        }
        root
    }

    pub fn is_same_sub_tree(&mut self, a: SmfNodeIndex, b: SmfNodeIndex) -> bool {
        self.find(a) == self.find(b)
    }

    /// declare that the path between `a` and `b` now lies in one merged subtree
    pub fn merge_sub_trees(&mut self, a: SmfNodeIndex, b: SmfNodeIndex) {
        let ra = self.find(a);
        let rb = self.find(b);
        if ra == rb {
            return;
        }
        let (big, small) = if self.size[ra] >= self.size[rb] { (ra, rb) } else { (rb, ra) };
        self.parent[small] = big;
        self.size[big] += self.size[small];

        let small_group = self.group[small].take().expect("root must carry group data");
        {
            let big_group = self.group[big].as_mut().expect("root must carry group data");
            for item in small_group.heap {
                big_group.heap.push(item);
            }
        }
        // reclassify small's boundary edges against the now-merged structure
        for edge_ref in small_group.incident {
            let record = &self.edges[edge_ref];
            let (x, y) = (record.a, record.b);
            if self.find(x) == self.find(y) {
                let key = HeapItem { key: Reverse(OrderedWeight(record.key)), edge_ref };
                self.group[big].as_mut().unwrap().heap.push(key);
            } else {
                self.group[big].as_mut().unwrap().incident.push(edge_ref);
            }
        }
    }

    /// record an undirected non-tree edge with key `data_key`; `data` is an opaque payload (e.g.
    /// a half-edge id) returned verbatim by `find_min_non_tree_edge`
    pub fn add_non_tree_edge(&mut self, a: SmfNodeIndex, b: SmfNodeIndex, key: Weight, data: u64) {
        let edge_ref = self.edges.len();
        self.edges.push(NonTreeEdgeRecord { a, b, key, data });
        if self.find(a) == self.find(b) {
            let root = self.find(a);
            let item = HeapItem { key: Reverse(OrderedWeight(key)), edge_ref };
            self.group[root].as_mut().unwrap().heap.push(item);
        } else {
            let ra = self.find(a);
            let rb = self.find(b);
            self.group[ra].as_mut().unwrap().incident.push(edge_ref);
            self.group[rb].as_mut().unwrap().incident.push(edge_ref);
        }
    }

    /// the non-tree edge of minimum key whose endpoints lie in the same merged subtree, if any;
    /// entries whose endpoints have since diverged in a now-defunct sense cannot occur since
    /// groups only ever merge, never split, within a search
    pub fn find_min_non_tree_edge(&mut self) -> Option<NonTreeEdge> {
        self.find_min_non_tree_edge_select(|_, _| false, |_, _, _, _| false)
    }

    /// like [`Self::find_min_non_tree_edge`], but:
    /// - `interior(a, b)` reports edges that have become internal to a single blossom since they
    ///   were recorded; such entries are popped and discarded permanently rather than considered
    ///   (an edge that becomes interior stays interior for the rest of the search)
    /// - among candidates tied within `EPSILON`, `prefer(a1, b1, a2, b2)` is asked whether
    ///   candidate 1 should win over the current-best candidate 2 (used to prefer an augmenting
    ///   edge over a blossom-forming one at equal slack)
    pub fn find_min_non_tree_edge_select(
        &mut self,
        mut interior: impl FnMut(SmfNodeIndex, SmfNodeIndex) -> bool,
        prefer: impl Fn(SmfNodeIndex, SmfNodeIndex, SmfNodeIndex, SmfNodeIndex) -> bool,
    ) -> Option<NonTreeEdge> {
        let mut best: Option<NonTreeEdge> = None;
        for root in 0..self.group.len() {
            loop {
                let edge_ref = match &self.group[root] {
                    Some(group) => group.heap.peek().map(|item| item.edge_ref),
                    None => None,
                };
                let Some(edge_ref) = edge_ref else { break };
                let record = self.edges[edge_ref].clone();
                if interior(record.a, record.b) {
                    self.group[root].as_mut().unwrap().heap.pop();
                    continue;
                }
                let candidate = NonTreeEdge { a: record.a, b: record.b, key: record.key, data: record.data };
                best = Some(match best {
                    None => candidate,
                    Some(cur) if candidate.key + crate::util::EPSILON < cur.key => candidate,
                    Some(cur) if (candidate.key - cur.key).abs() <= crate::util::EPSILON
                        && prefer(candidate.a, candidate.b, cur.a, cur.b) =>
                    {
                        candidate
                    }
                    Some(cur) => cur,
                });
                break;
            }
        }
        best
    }

    pub fn has_non_tree_edge(&mut self) -> bool {
        self.find_min_non_tree_edge().is_some()
    }

    /// drop all state for the next search
    pub fn clear(&mut self) {
        self.init_tree();
    }
}

impl Default for SubtreeMergeFindMin {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn edge_only_qualifies_after_merge() {
        let mut smf = SubtreeMergeFindMin::new();
        let root = smf.init_tree();
        let a = smf.add_leaf(root);
        let b = smf.add_leaf(root);
        smf.add_non_tree_edge(a, b, 5.0, 99);
        assert!(smf.find_min_non_tree_edge().is_none());
        smf.merge_sub_trees(a, b);
        let found = smf.find_min_non_tree_edge().unwrap();
        assert_eq!(found.data, 99);
        assert_eq!(found.key, 5.0);
    }

    #[test]
    fn returns_global_minimum_among_qualifying_edges() {
        let mut smf = SubtreeMergeFindMin::new();
        let root = smf.init_tree();
        let a = smf.add_leaf(root);
        let b = smf.add_leaf(root);
        let c = smf.add_leaf(root);
        smf.merge_sub_trees(a, b);
        smf.add_non_tree_edge(a, b, 3.0, 1);
        smf.add_non_tree_edge(a, b, 1.0, 2);
        smf.add_non_tree_edge(a, c, 0.5, 3); // does not qualify, c unmerged
        let found = smf.find_min_non_tree_edge().unwrap();
        assert_eq!(found.data, 2);
    }

    #[test]
    fn transitive_merge_activates_edge() {
        let mut smf = SubtreeMergeFindMin::new();
        let root = smf.init_tree();
        let a = smf.add_leaf(root);
        let b = smf.add_leaf(root);
        let c = smf.add_leaf(root);
        smf.add_non_tree_edge(a, c, 2.0, 7);
        smf.merge_sub_trees(a, b);
        assert!(smf.find_min_non_tree_edge().is_none());
        smf.merge_sub_trees(b, c);
        let found = smf.find_min_non_tree_edge().unwrap();
        assert_eq!(found.data, 7);
    }
}
