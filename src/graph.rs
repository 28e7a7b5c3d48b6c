//! Undirected graph storage and the directed twin-edge view the search driver operates on (C1).

use crate::error::MatchingError;
use crate::util::{BlossomIndex, EdgeIndex, HalfEdgeIndex, VertexIndex, Weight};
use serde::{Deserialize, Serialize};

/// an undirected, weighted, simple graph (parallel edges allowed, self-loops rejected)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Graph {
    vertex_num: usize,
    /// `(source, target, weight)` per original undirected edge
    edges: Vec<(VertexIndex, VertexIndex, Weight)>,
}

impl Graph {
    /// build a graph from an explicit vertex count and edge list, validating eagerly
    pub fn new(
        vertex_num: usize,
        weighted_edges: Vec<(VertexIndex, VertexIndex, Weight)>,
    ) -> Result<Self, MatchingError> {
        for &(u, v, w) in &weighted_edges {
            if u >= vertex_num {
                return Err(MatchingError::VertexOutOfRange { index: u, vertex_num });
            }
            if v >= vertex_num {
                return Err(MatchingError::VertexOutOfRange { index: v, vertex_num });
            }
            if u == v {
                return Err(MatchingError::SelfLoop(u));
            }
            if !w.is_finite() {
                return Err(MatchingError::InvalidWeight(w));
            }
        }
        Ok(Self { vertex_num, edges: weighted_edges })
    }

    pub fn vertex_num(&self) -> usize {
        self.vertex_num
    }

    pub fn edge_num(&self) -> usize {
        self.edges.len()
    }

    pub fn edge_endpoints(&self, e: EdgeIndex) -> (VertexIndex, VertexIndex) {
        let (u, v, _) = self.edges[e];
        (u, v)
    }

    pub fn edge_weight(&self, e: EdgeIndex) -> Weight {
        self.edges[e].2
    }

    pub fn edges(&self) -> &[(VertexIndex, VertexIndex, Weight)] {
        &self.edges
    }
}

/// builder mirroring `SolverInitializer`'s accumulate-then-finalize role: accumulate edges
/// incrementally, then finalize with the same validation `Graph::new` performs
#[derive(Debug, Default, Clone)]
pub struct GraphBuilder {
    vertex_num: usize,
    weighted_edges: Vec<(VertexIndex, VertexIndex, Weight)>,
}

impl GraphBuilder {
    pub fn new(vertex_num: usize) -> Self {
        Self { vertex_num, weighted_edges: Vec::new() }
    }

    pub fn add_edge(&mut self, u: VertexIndex, v: VertexIndex, weight: Weight) -> &mut Self {
        self.weighted_edges.push((u, v, weight));
        self
    }

    pub fn build(self) -> Result<Graph, MatchingError> {
        Graph::new(self.vertex_num, self.weighted_edges)
    }
}

/// one directed half-edge; two of these (sharing `orig_edge`) represent one undirected edge.
///
/// `b0`/`b1` are the sub-blossoms that currently sit at this half-edge's source/target whenever it
/// is recorded as a ring edge (`toLeftEdge`/`toRightEdge`) connecting two sub-blossoms of some
/// enclosing blossom; they are mutated by [`crate::blossom::BlossomForest::connect`] and cleared on
/// expand. This is the only place the edge view is stateful.
#[derive(Debug, Clone, Copy)]
pub struct HalfEdge {
    pub source: VertexIndex,
    pub target: VertexIndex,
    pub orig_edge: EdgeIndex,
    pub twin: HalfEdgeIndex,
    pub weight: Weight,
    pub b0: Option<BlossomIndex>,
    pub b1: Option<BlossomIndex>,
}

/// the directed twin-edge view the search driver (C7) consumes; built once per [`Worker`](crate::matching::Worker)
/// from a [`Graph`] and never rebuilt across searches (only `b0`/`b1` mutate)
#[derive(Debug, Clone)]
pub struct DirectedView {
    vertex_num: usize,
    half_edges: Vec<HalfEdge>,
    /// outgoing half-edge ids per vertex
    out_edges: Vec<Vec<HalfEdgeIndex>>,
}

impl DirectedView {
    pub fn from_graph(graph: &Graph) -> Self {
        let vertex_num = graph.vertex_num();
        let mut half_edges = Vec::with_capacity(graph.edge_num() * 2);
        let mut out_edges = vec![Vec::new(); vertex_num];
        for (orig_edge, &(u, v, weight)) in graph.edges().iter().enumerate() {
            let e1 = half_edges.len();
            let e2 = e1 + 1;
            half_edges.push(HalfEdge {
                source: u,
                target: v,
                orig_edge,
                twin: e2,
                weight,
                b0: None,
                b1: None,
            });
            half_edges.push(HalfEdge {
                source: v,
                target: u,
                orig_edge,
                twin: e1,
                weight,
                b0: None,
                b1: None,
            });
            out_edges[u].push(e1);
            out_edges[v].push(e2);
        }
        Self { vertex_num, half_edges, out_edges }
    }

    pub fn vertex_num(&self) -> usize {
        self.vertex_num
    }

    pub fn half_edge_num(&self) -> usize {
        self.half_edges.len()
    }

    #[inline]
    pub fn source(&self, e: HalfEdgeIndex) -> VertexIndex {
        self.half_edges[e].source
    }

    #[inline]
    pub fn target(&self, e: HalfEdgeIndex) -> VertexIndex {
        self.half_edges[e].target
    }

    #[inline]
    pub fn twin(&self, e: HalfEdgeIndex) -> HalfEdgeIndex {
        self.half_edges[e].twin
    }

    #[inline]
    pub fn weight(&self, e: HalfEdgeIndex) -> Weight {
        self.half_edges[e].weight
    }

    #[inline]
    pub fn orig_edge(&self, e: HalfEdgeIndex) -> EdgeIndex {
        self.half_edges[e].orig_edge
    }

    #[inline]
    pub fn out_edges(&self, v: VertexIndex) -> &[HalfEdgeIndex] {
        &self.out_edges[v]
    }

    #[inline]
    pub fn b0(&self, e: HalfEdgeIndex) -> Option<BlossomIndex> {
        self.half_edges[e].b0
    }

    #[inline]
    pub fn b1(&self, e: HalfEdgeIndex) -> Option<BlossomIndex> {
        self.half_edges[e].b1
    }

    #[inline]
    pub fn set_b0(&mut self, e: HalfEdgeIndex, b: Option<BlossomIndex>) {
        self.half_edges[e].b0 = b;
    }

    #[inline]
    pub fn set_b1(&mut self, e: HalfEdgeIndex, b: Option<BlossomIndex>) {
        self.half_edges[e].b1 = b;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_out_of_range_endpoint() {
        let err = Graph::new(2, vec![(0, 5, 1.0)]).unwrap_err();
        assert_eq!(err, MatchingError::VertexOutOfRange { index: 5, vertex_num: 2 });
    }

    #[test]
    fn rejects_self_loop() {
        let err = Graph::new(2, vec![(0, 0, 1.0)]).unwrap_err();
        assert_eq!(err, MatchingError::SelfLoop(0));
    }

    #[test]
    fn rejects_non_finite_weight() {
        let err = Graph::new(2, vec![(0, 1, f64::NAN)]).unwrap_err();
        assert!(matches!(err, MatchingError::InvalidWeight(_)));
    }

    #[test]
    fn directed_view_twins() {
        let graph = Graph::new(3, vec![(0, 1, 3.0), (1, 2, 2.0)]).unwrap();
        let view = DirectedView::from_graph(&graph);
        assert_eq!(view.half_edge_num(), 4);
        for e in 0..view.half_edge_num() {
            let t = view.twin(e);
            assert_eq!(view.twin(t), e);
            assert_eq!(view.source(e), view.target(t));
            assert_eq!(view.weight(e), view.weight(t));
        }
        assert_eq!(view.out_edges(1).len(), 2);
    }

    #[test]
    fn builder_matches_new() {
        let mut builder = GraphBuilder::new(2);
        builder.add_edge(0, 1, 4.0);
        let graph = builder.build().unwrap();
        assert_eq!(graph.edge_num(), 1);
        assert_eq!(graph.edge_weight(0), 4.0);
    }
}
