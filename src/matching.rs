//! `Worker`: owns one run's directed view, blossom forest, and dual state, and drives phases to
//! completion. Mirrors `SolverSerial`'s facade shape from
//! `yuewuo-fusion-blossom/src/mwpm_solver.rs` — build once from a [`Graph`], call a `solve`-shaped
//! method, read results back out.

use crate::blossom::BlossomForest;
use crate::error::MatchingError;
use crate::graph::{DirectedView, Graph};
use crate::search;
use crate::util::{EdgeIndex, HalfEdgeIndex, Weight};
use log::{debug, info};
use std::collections::HashSet;

/// a maximum weight matching: the set of original edge indices selected, plus its total weight
#[derive(Debug, Clone, PartialEq)]
pub struct Matching {
    pub edges: HashSet<EdgeIndex>,
    pub weight: Weight,
}

/// owns the mutable state of one matching computation
pub struct Worker {
    view: DirectedView,
    forest: BlossomForest,
    mate: Vec<Option<HalfEdgeIndex>>,
    y: Vec<Weight>,
    /// remaining headroom before the non-perfect-matching termination threshold (spec's single
    /// persisted delta1 scalar); decremented by every delta-step applied across every phase
    delta1_threshold: Weight,
}

impl Worker {
    pub fn new(graph: &Graph) -> Self {
        let view = DirectedView::from_graph(graph);
        let vertex_num = view.vertex_num();
        let forest = BlossomForest::new(vertex_num);
        let initial_y = graph.edges().iter().map(|&(_, _, w)| w / 2.0).fold(0.0, |acc: Weight, w| acc.max(w));
        Self {
            view,
            forest,
            mate: vec![None; vertex_num],
            y: vec![initial_y; vertex_num],
            delta1_threshold: initial_y,
        }
    }

    /// run phases until the forest is stuck; returns the number of augmentations performed
    pub fn run(&mut self, perfect: bool) -> usize {
        let mut augmentations = 0;
        loop {
            let outcome = search::run_phase(
                &mut self.view,
                &mut self.forest,
                &mut self.mate,
                &mut self.y,
                &mut self.delta1_threshold,
                perfect,
            );
            if !outcome.augmented {
                debug!("phase stuck after {augmentations} augmentations");
                break;
            }
            augmentations += 1;
            debug!("augmentation {augmentations} applied");
        }
        augmentations
    }

    pub fn is_perfect(&self) -> bool {
        self.mate.iter().all(|m| m.is_some())
    }

    pub fn extract_matching(&self, graph: &Graph) -> Matching {
        let mut edges = HashSet::new();
        let mut weight = 0.0;
        for v in 0..self.mate.len() {
            if let Some(e) = self.mate[v] {
                let orig = self.view.orig_edge(e);
                if edges.insert(orig) {
                    weight += graph.edge_weight(orig);
                }
            }
        }
        Matching { edges, weight }
    }
}

/// compute a maximum weight matching on `graph`.
///
/// If `perfect` is true, every vertex must be matched or [`MatchingError::NoPerfectMatching`] is
/// returned; otherwise the returned matching is the maximum weight matching over all matchings,
/// including the empty one, with no guarantee every vertex is covered.
pub fn compute_max_matching(graph: &Graph, perfect: bool) -> Result<Matching, MatchingError> {
    let mut worker = Worker::new(graph);
    let augmentations = worker.run(perfect);
    info!("matching computed with {augmentations} augmentations over {} vertices", graph.vertex_num());
    if perfect && !worker.is_perfect() {
        return Err(MatchingError::NoPerfectMatching);
    }
    Ok(worker.extract_matching(graph))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_edge_matches_both_vertices() {
        let graph = Graph::new(2, vec![(0, 1, 5.0)]).unwrap();
        let matching = compute_max_matching(&graph, true).unwrap();
        assert_eq!(matching.edges.len(), 1);
        assert_eq!(matching.weight, 5.0);
    }

    #[test]
    fn triangle_has_no_perfect_matching() {
        let graph = Graph::new(3, vec![(0, 1, 1.0), (1, 2, 1.0), (0, 2, 1.0)]).unwrap();
        let err = compute_max_matching(&graph, true).unwrap_err();
        assert_eq!(err, MatchingError::NoPerfectMatching);
    }

    #[test]
    fn triangle_non_perfect_picks_one_edge() {
        let graph = Graph::new(3, vec![(0, 1, 1.0), (1, 2, 1.0), (0, 2, 1.0)]).unwrap();
        let matching = compute_max_matching(&graph, false).unwrap();
        assert_eq!(matching.edges.len(), 1);
    }

    #[test]
    fn prefers_heavier_alternative_via_blossom() {
        // a 4-cycle with one heavy diagonal-free edge pair; the max weight perfect matching
        // should pick the two weight-5 edges over the two weight-1 edges.
        let graph = Graph::new(4, vec![(0, 1, 5.0), (1, 2, 1.0), (2, 3, 5.0), (3, 0, 1.0)]).unwrap();
        let matching = compute_max_matching(&graph, true).unwrap();
        assert_eq!(matching.weight, 10.0);
    }

    #[test]
    fn empty_graph_is_trivially_perfect() {
        let graph = Graph::new(0, vec![]).unwrap();
        let matching = compute_max_matching(&graph, true).unwrap();
        assert!(matching.edges.is_empty());
    }

    #[test]
    fn odd_cycle_blossom_five_vertices() {
        let graph = Graph::new(
            5,
            vec![(0, 1, 2.0), (1, 2, 2.0), (2, 3, 2.0), (3, 4, 2.0), (4, 0, 2.0)],
        )
        .unwrap();
        let matching = compute_max_matching(&graph, false).unwrap();
        assert_eq!(matching.edges.len(), 2);
        assert_eq!(matching.weight, 4.0);
    }

    // S1: triangle, non-perfect picks the single heaviest edge
    #[test]
    fn scenario_triangle() {
        let graph = Graph::new(3, vec![(0, 1, 3.0), (1, 2, 2.0), (0, 2, 4.0)]).unwrap();
        let matching = compute_max_matching(&graph, false).unwrap();
        assert_eq!(matching.weight, 4.0);
        assert_eq!(matching.edges.len(), 1);
    }

    // S2: odd cycle plus a chord requiring a blossom contraction to find the true optimum
    #[test]
    fn scenario_odd_cycle_requires_blossom() {
        let graph = Graph::new(
            5,
            vec![(0, 1, 5.0), (1, 2, 5.0), (2, 3, 5.0), (3, 4, 5.0), (4, 0, 5.0), (2, 4, 1.0)],
        )
        .unwrap();
        let matching = compute_max_matching(&graph, false).unwrap();
        assert_eq!(matching.edges.len(), 2);
        assert_eq!(matching.weight, 10.0);
    }

    // S3: two triangles bridged by one heavy edge
    #[test]
    fn scenario_two_triangles_heavy_bridge() {
        let graph = Graph::new(
            6,
            vec![(0, 1, 1.0), (1, 2, 1.0), (0, 2, 1.0), (3, 4, 1.0), (4, 5, 1.0), (3, 5, 1.0), (2, 3, 10.0)],
        )
        .unwrap();
        let matching = compute_max_matching(&graph, false).unwrap();
        assert_eq!(matching.weight, 12.0);
        assert_eq!(matching.edges.len(), 3);
    }

    // S4: perfect matching on a 4-cycle must take the two weight-2 edges
    #[test]
    fn scenario_four_cycle_perfect() {
        let graph = Graph::new(4, vec![(0, 1, 1.0), (1, 2, 2.0), (2, 3, 1.0), (3, 0, 2.0)]).unwrap();
        let matching = compute_max_matching(&graph, true).unwrap();
        assert_eq!(matching.weight, 4.0);
    }

    // S5: Petersen graph, unit weights, both perfect and non-perfect give a 5-edge matching
    #[test]
    fn scenario_petersen_nested_blossoms() {
        let graph = crate::example_graphs::petersen_graph();
        let non_perfect = compute_max_matching(&graph, false).unwrap();
        assert_eq!(non_perfect.edges.len(), 5);
        assert_eq!(non_perfect.weight, 5.0);
        let perfect = compute_max_matching(&graph, true).unwrap();
        assert_eq!(perfect.edges.len(), 5);
        assert_eq!(perfect.weight, 5.0);
    }

    // S6: K4 with tied weights must still produce a valid maximum matching of two disjoint edges
    #[test]
    fn scenario_k4_weight_tie_determinism() {
        let graph = crate::example_graphs::complete_graph(4);
        let matching = compute_max_matching(&graph, true).unwrap();
        assert_eq!(matching.edges.len(), 2);
        assert_eq!(matching.weight, 2.0);
    }

    fn is_valid_matching(graph: &Graph, matching: &Matching) -> bool {
        let mut covered = vec![false; graph.vertex_num()];
        for &e in &matching.edges {
            let (u, v) = graph.edge_endpoints(e);
            if covered[u] || covered[v] {
                return false;
            }
            covered[u] = true;
            covered[v] = true;
        }
        true
    }

    fn brute_force_max_weight(graph: &Graph) -> Weight {
        let m = graph.edge_num();
        let mut best = 0.0;
        for mask in 0..(1u32 << m) {
            let mut covered = vec![false; graph.vertex_num()];
            let mut weight = 0.0;
            let mut ok = true;
            for e in 0..m {
                if mask & (1 << e) != 0 {
                    let (u, v) = graph.edge_endpoints(e);
                    if covered[u] || covered[v] {
                        ok = false;
                        break;
                    }
                    covered[u] = true;
                    covered[v] = true;
                    weight += graph.edge_weight(e);
                }
            }
            if ok && weight > best {
                best = weight;
            }
        }
        best
    }

    #[test]
    fn invariant_matching_validity_on_random_graphs() {
        for seed in 0..8 {
            let graph = crate::example_graphs::random_graph(9, 0.4, 8.0, seed);
            let matching = compute_max_matching(&graph, false).unwrap();
            assert!(is_valid_matching(&graph, &matching));
        }
    }

    #[test]
    fn invariant_optimality_against_brute_force() {
        for seed in 0..6 {
            let graph = crate::example_graphs::random_graph(7, 0.5, 6.0, seed);
            let matching = compute_max_matching(&graph, false).unwrap();
            let expected = brute_force_max_weight(&graph);
            assert!((matching.weight - expected).abs() < 1e-6, "seed {seed}: got {}, expected {expected}", matching.weight);
        }
    }

    #[test]
    fn invariant_empty_and_trivial_graphs() {
        let empty = Graph::new(4, vec![]).unwrap();
        let matching = compute_max_matching(&empty, false).unwrap();
        assert!(matching.edges.is_empty());
        assert_eq!(matching.weight, 0.0);

        let single_positive = Graph::new(2, vec![(0, 1, 2.5)]).unwrap();
        let matching = compute_max_matching(&single_positive, false).unwrap();
        assert_eq!(matching.edges.len(), 1);
    }

    #[test]
    fn invariant_negation_duality() {
        // unconstrained optimum here is the empty matching (every perfect matching is negative)
        let graph = Graph::new(4, vec![(0, 1, -3.0), (2, 3, -3.0), (0, 2, -1.0), (1, 3, -1.0)]).unwrap();
        let perfect = compute_max_matching(&graph, true).unwrap();
        assert_eq!(perfect.weight, -2.0);

        // shifting every weight by a large enough constant makes the unconstrained solver prefer
        // full matchings too; its value minus the shift recovers the same best perfect matching
        const SHIFT: Weight = 100.0;
        let shifted = Graph::new(
            4,
            graph.edges().iter().map(|&(u, v, w)| (u, v, w + SHIFT)).collect(),
        )
        .unwrap();
        let unconstrained = compute_max_matching(&shifted, false).unwrap();
        assert_eq!(unconstrained.edges.len(), 2);
        assert!((unconstrained.weight - SHIFT * 2.0 - perfect.weight).abs() < 1e-6);
    }

    #[test]
    fn invariant_permutation_invariance() {
        let graph = Graph::new(5, vec![(0, 1, 5.0), (1, 2, 5.0), (2, 3, 5.0), (3, 4, 5.0), (4, 0, 5.0), (2, 4, 1.0)]).unwrap();
        let permuted = Graph::new(5, vec![(4, 3, 5.0), (3, 2, 5.0), (2, 1, 5.0), (1, 0, 5.0), (0, 4, 5.0), (2, 0, 1.0)]).unwrap();
        let a = compute_max_matching(&graph, false).unwrap();
        let b = compute_max_matching(&permuted, false).unwrap();
        assert_eq!(a.weight, b.weight);
    }
}
