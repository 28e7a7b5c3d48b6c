//! Maximum weight matching on general weighted undirected graphs via the Galil-Micali-Gabow
//! blossom algorithm.
//!
//! The public surface is [`graph::Graph`]/[`graph::GraphBuilder`] for building an input and
//! [`matching::compute_max_matching`] for solving it. Everything else is internal machinery the
//! search driver needs (the directed twin-edge view, the blossom forest, the union-find and
//! split-find-min accelerators, the event heaps).

pub mod blossom;
pub mod cli;
pub mod error;
pub mod event_heap;
pub mod example_graphs;
pub mod graph;
pub mod matching;
pub mod search;
pub mod smf;
pub mod split_find_min;
pub mod union_find;
pub mod util;

pub use error::MatchingError;
pub use graph::{Graph, GraphBuilder};
pub use matching::{compute_max_matching, Matching};
