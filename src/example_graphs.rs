//! Test and demo graph generators (C10): fixed small families plus a seeded random generator, for
//! exercising [`crate::matching::compute_max_matching`] without hand-writing edge lists.

use crate::graph::Graph;
use crate::util::{VertexIndex, Weight};
use rand::{Rng, SeedableRng};
use rand_xoshiro::Xoshiro256StarStar;

/// the complete graph on `vertex_num` vertices, every edge weighted `1.0`
pub fn complete_graph(vertex_num: usize) -> Graph {
    let mut edges = Vec::with_capacity(vertex_num * vertex_num.saturating_sub(1) / 2);
    for u in 0..vertex_num {
        for v in (u + 1)..vertex_num {
            edges.push((u, v, 1.0));
        }
    }
    Graph::new(vertex_num, edges).expect("complete graph edges are always valid")
}

/// the Petersen graph: 10 vertices, the outer 5-cycle (0..5), the inner pentagram (5..10, step 2),
/// and five spokes connecting them. All edges weighted `1.0`.
pub fn petersen_graph() -> Graph {
    let mut edges = Vec::new();
    for i in 0..5 {
        edges.push((i, (i + 1) % 5, 1.0));
    }
    for i in 0..5 {
        edges.push((5 + i, 5 + (i + 2) % 5, 1.0));
    }
    for i in 0..5 {
        edges.push((i, 5 + i, 1.0));
    }
    Graph::new(10, edges).expect("Petersen graph edges are always valid")
}

/// a uniformly random simple graph on `vertex_num` vertices: each of the `vertex_num *
/// (vertex_num - 1) / 2` possible edges is included independently with probability
/// `edge_probability`, weighted uniformly in `[1.0, max_weight]`. Deterministic given `seed`.
pub fn random_graph(vertex_num: usize, edge_probability: f64, max_weight: Weight, seed: u64) -> Graph {
    let mut rng = Xoshiro256StarStar::seed_from_u64(seed);
    let mut edges = Vec::new();
    for u in 0..vertex_num {
        for v in (u + 1)..vertex_num {
            if rng.gen_bool(edge_probability) {
                let weight = rng.gen_range(1.0..=max_weight.max(1.0));
                edges.push((u as VertexIndex, v as VertexIndex, weight));
            }
        }
    }
    Graph::new(vertex_num, edges).expect("random graph edges are always valid")
}
