//! Error types surfaced to callers of the matching engine.
//!
//! Only genuinely recoverable, caller-visible conditions are represented here. Numeric
//! infeasibility and programmer-error conditions (stale heap handles, broken invariants) remain
//! fatal `panic!`s raised directly at the point of detection in [`crate::search`], matching the
//! teacher's own `assert!`/`panic!` style for invariant violations.

use crate::util::{Weight, VertexIndex};
use thiserror::Error;

/// errors produced while constructing a [`crate::graph::Graph`] or computing a matching
#[derive(Debug, Error, Clone, PartialEq)]
pub enum MatchingError {
    /// an edge endpoint is not in `[0, vertex_num)`
    #[error("vertex index {index} out of range for a graph with {vertex_num} vertices")]
    VertexOutOfRange { index: VertexIndex, vertex_num: usize },

    /// an edge endpoint equals the other endpoint (self-loop)
    #[error("self-loop on vertex {0} is not supported")]
    SelfLoop(VertexIndex),

    /// an edge weight is not finite (`NaN` or `±infinity`)
    #[error("edge weight {0} is not finite")]
    InvalidWeight(Weight),

    /// `perfect=true` was requested but the graph has no perfect matching
    #[error("no perfect matching exists for this graph")]
    NoPerfectMatching,
}
