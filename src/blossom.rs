//! The laminar blossom forest (C6): an arena of [`Blossom`] records addressed by index.
//!
//! Uses an index arena rather than owning pointers between blossoms (`dual_module.rs`'s
//! `DualNodeClass::Blossom` uses `Arc`/`Weak` for the analogous structure); the laminar family
//! here nests and dissolves too often for that ownership style to stay sound, so indices into a
//! single arena replace it. See DESIGN.md for the rationale.

use crate::event_heap::EventHeap;
use crate::graph::DirectedView;
use crate::smf::SubtreeMergeFindMin;
use crate::split_find_min::SplitFindMin;
use crate::union_find::EvenUnionFind;
use crate::util::{BlossomIndex, HalfEdgeIndex, VertexIndex, Weight};

/// one node of the laminar blossom family
#[derive(Debug, Clone)]
pub struct Blossom {
    pub base: VertexIndex,
    pub parent: Option<BlossomIndex>,
    pub child: Option<BlossomIndex>,
    pub left: Option<BlossomIndex>,
    pub right: Option<BlossomIndex>,
    pub to_left_edge: Option<HalfEdgeIndex>,
    pub to_right_edge: Option<HalfEdgeIndex>,
    /// search-tree root vertex if this top-level blossom is in the tree, `None` if out
    pub root: Option<VertexIndex>,
    pub tree_parent_edge: Option<HalfEdgeIndex>,
    pub is_even: bool,
    /// dual variable; live-updated every delta-step while this blossom is top-level and
    /// non-trivial (see `search::run_phase`), rather than tracked via delta-snapshot fields
    pub z0: Weight,
    pub last_visit_idx: u64,
}

impl Blossom {
    fn trivial(vertex: VertexIndex) -> Self {
        Self {
            base: vertex,
            parent: None,
            child: None,
            left: None,
            right: None,
            to_left_edge: None,
            to_right_edge: None,
            root: None,
            tree_parent_edge: None,
            is_even: false,
            z0: 0.0,
            last_visit_idx: 0,
        }
    }

    pub fn is_trivial(&self) -> bool {
        self.child.is_none()
    }
}

/// the arena plus the two accelerators whose state is indexed in lockstep with it: the even
/// union-find (C2) and the odd/out split-find-min (C3) both key their payloads by [`BlossomIndex`]
/// and are therefore owned alongside the forest rather than by the search driver directly.
pub struct BlossomForest {
    pub blossoms: Vec<Blossom>,
    pub vertex_num: usize,
    pub evens: EvenUnionFind,
    pub odds: SplitFindMin,
    pub grow_events: EventHeap,
    pub expand_events: EventHeap,
    pub smf: SubtreeMergeFindMin,
    visit_generation: u64,
}

impl BlossomForest {
    pub fn new(vertex_num: usize) -> Self {
        let blossoms = (0..vertex_num).map(Blossom::trivial).collect();
        Self {
            blossoms,
            vertex_num,
            evens: EvenUnionFind::new(vertex_num),
            odds: SplitFindMin::init(vertex_num),
            grow_events: EventHeap::new(),
            expand_events: EventHeap::new(),
            smf: SubtreeMergeFindMin::new(),
            visit_generation: 0,
        }
    }

    pub fn allocate(&mut self, blossom: Blossom) -> BlossomIndex {
        self.blossoms.push(blossom);
        self.blossoms.len() - 1
    }

    pub fn next_visit_generation(&mut self) -> u64 {
        self.visit_generation += 1;
        self.visit_generation
    }

    /// splice `right` after `left` in their shared ring, recording the connecting edge's two
    /// sub-blossom endpoints (`b0`/`b1`) on the edge itself, mutating `view`
    pub fn connect(
        &mut self,
        view: &mut DirectedView,
        left: BlossomIndex,
        right: BlossomIndex,
        edge_left_to_right: HalfEdgeIndex,
    ) {
        self.blossoms[left].right = Some(right);
        self.blossoms[left].to_right_edge = Some(edge_left_to_right);
        self.blossoms[right].left = Some(left);
        self.blossoms[right].to_left_edge = Some(edge_left_to_right);
        view.set_b0(edge_left_to_right, Some(left));
        view.set_b1(edge_left_to_right, Some(right));
        let twin = view.twin(edge_left_to_right);
        view.set_b0(twin, Some(right));
        view.set_b1(twin, Some(left));
    }

    /// remove ring linkage from `b` (used while tearing down a dissolved blossom's children on
    /// expand)
    pub fn disconnect_ring(&mut self, view: &mut DirectedView, b: BlossomIndex) {
        if let Some(edge) = self.blossoms[b].to_left_edge.take() {
            view.set_b0(edge, None);
            view.set_b1(edge, None);
            let twin = view.twin(edge);
            view.set_b0(twin, None);
            view.set_b1(twin, None);
        }
        if let Some(edge) = self.blossoms[b].to_right_edge.take() {
            view.set_b0(edge, None);
            view.set_b1(edge, None);
            let twin = view.twin(edge);
            view.set_b0(twin, None);
            view.set_b1(twin, None);
        }
        self.blossoms[b].left = None;
        self.blossoms[b].right = None;
    }

    /// lazily collect every trivial (singleton-vertex) descendant of `b`, i.e. the vertices
    /// belonging to this blossom
    pub fn vertices_of(&self, b: BlossomIndex) -> Vec<VertexIndex> {
        let mut out = Vec::new();
        self.collect_vertices(b, &mut out);
        out
    }

    fn collect_vertices(&self, b: BlossomIndex, out: &mut Vec<VertexIndex>) {
        if self.blossoms[b].is_trivial() {
            out.push(self.blossoms[b].base);
            return;
        }
        let start = self.blossoms[b].child.expect("non-trivial blossom has a child");
        let mut cur = start;
        loop {
            self.collect_vertices(cur, out);
            cur = self.blossoms[cur].right.expect("ring is circular");
            if cur == start {
                break;
            }
        }
    }

    /// the top-level blossom currently containing `v`, found by climbing arena parent pointers
    /// directly. Used for the structural walks (`lca_in_search_tree`, ring traversal) that
    /// spec §4.6 itself defines via tree-parent-edge climbing rather than through C2/C3; event
    /// selection instead resolves vertices through `evens`/`odds` directly (see `search.rs`).
    pub fn top_of(&self, v: VertexIndex) -> BlossomIndex {
        let mut cur = v;
        while let Some(p) = self.blossoms[cur].parent {
            cur = p;
        }
        cur
    }

    /// climb `treeParentEdge` pointers in lockstep from `b1`/`b2`, marking visited blossoms with
    /// a fresh generation counter, and return the first blossom seen from both sides
    pub fn lca_in_search_tree(
        &mut self,
        view: &DirectedView,
        b1: BlossomIndex,
        b2: BlossomIndex,
    ) -> BlossomIndex {
        let generation = self.next_visit_generation();
        let mut cur1 = Some(b1);
        let mut cur2 = Some(b2);
        loop {
            if let Some(c1) = cur1 {
                if self.blossoms[c1].last_visit_idx == generation {
                    return c1;
                }
                self.blossoms[c1].last_visit_idx = generation;
                cur1 = self.step_toward_root(view, c1);
            }
            if let Some(c2) = cur2 {
                if self.blossoms[c2].last_visit_idx == generation {
                    return c2;
                }
                self.blossoms[c2].last_visit_idx = generation;
                cur2 = self.step_toward_root(view, c2);
            }
            if cur1.is_none() && cur2.is_none() {
                unreachable!("two blossoms in the same search tree must share a root");
            }
        }
    }

    fn step_toward_root(&mut self, view: &DirectedView, b: BlossomIndex) -> Option<BlossomIndex> {
        let edge = self.blossoms[b].tree_parent_edge?;
        let parent_vertex = view.target(edge);
        Some(self.top_of(parent_vertex))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::Graph;

    #[test]
    fn trivial_blossoms_seed_one_per_vertex() {
        let forest = BlossomForest::new(4);
        assert_eq!(forest.blossoms.len(), 4);
        for v in 0..4 {
            assert!(forest.blossoms[v].is_trivial());
            assert_eq!(forest.blossoms[v].base, v);
        }
    }

    #[test]
    fn connect_sets_ring_and_edge_endpoints() {
        let graph = Graph::new(2, vec![(0, 1, 1.0)]).unwrap();
        let mut view = DirectedView::from_graph(&graph);
        let mut forest = BlossomForest::new(2);
        forest.connect(&mut view, 0, 1, 0);
        assert_eq!(forest.blossoms[0].right, Some(1));
        assert_eq!(forest.blossoms[1].left, Some(0));
        assert_eq!(view.b0(0), Some(0));
        assert_eq!(view.b1(0), Some(1));
        let twin = view.twin(0);
        assert_eq!(view.b0(twin), Some(1));
        assert_eq!(view.b1(twin), Some(0));
    }

    #[test]
    fn vertices_of_trivial_blossom_is_itself() {
        let forest = BlossomForest::new(3);
        assert_eq!(forest.vertices_of(2), vec![2]);
    }
}
