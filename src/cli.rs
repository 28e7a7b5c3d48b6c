//! `blossom-match` CLI (C9): `solve` reads a graph from a JSON file and prints the matching,
//! `random` generates and solves a random graph for quick experimentation.

use crate::example_graphs::random_graph;
use crate::graph::Graph;
use crate::matching::compute_max_matching;
use crate::util::Weight;
use clap::{Parser, Subcommand};
use log::info;
use std::fs;
use std::path::PathBuf;

#[derive(Parser)]
#[clap(author, version, about = "Maximum weight matching on general weighted graphs")]
#[clap(propagate_version = true)]
#[clap(subcommand_required = true)]
#[clap(arg_required_else_help = true)]
pub struct Cli {
    #[clap(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// solve a graph read from a JSON file (`{"vertex_num": N, "edges": [[u, v, w], ...]}`)
    Solve {
        /// path to the input graph file
        #[clap(parse(from_os_str))]
        file: PathBuf,
        /// require every vertex to be matched; fail if no perfect matching exists
        #[clap(long, action)]
        perfect: bool,
    },
    /// generate a random graph and solve it
    Random {
        /// number of vertices
        #[clap(short = 'n', long, default_value_t = 10)]
        vertex_num: usize,
        /// probability that any given pair of vertices is connected by an edge
        #[clap(short = 'p', long, default_value_t = 0.3)]
        edge_probability: f64,
        /// maximum edge weight (weights are drawn uniformly from `[1.0, max_weight]`)
        #[clap(long, default_value_t = 10.0)]
        max_weight: Weight,
        /// random seed, for reproducible runs
        #[clap(long, default_value_t = 0)]
        seed: u64,
        /// require every vertex to be matched; fail if no perfect matching exists
        #[clap(long, action)]
        perfect: bool,
    },
}

#[derive(serde::Deserialize)]
struct GraphFile {
    vertex_num: usize,
    edges: Vec<(usize, usize, Weight)>,
}

impl Cli {
    pub fn run(self) {
        match self.command {
            Commands::Solve { file, perfect } => {
                let contents = fs::read_to_string(&file)
                    .unwrap_or_else(|e| panic!("failed to read {}: {e}", file.display()));
                let parsed: GraphFile = serde_json::from_str(&contents)
                    .unwrap_or_else(|e| panic!("failed to parse {}: {e}", file.display()));
                let graph = Graph::new(parsed.vertex_num, parsed.edges)
                    .unwrap_or_else(|e| panic!("invalid graph in {}: {e}", file.display()));
                info!("loaded graph with {} vertices and {} edges", graph.vertex_num(), graph.edge_num());
                report(&graph, perfect);
            }
            Commands::Random { vertex_num, edge_probability, max_weight, seed, perfect } => {
                let graph = random_graph(vertex_num, edge_probability, max_weight, seed);
                info!("generated random graph with {} vertices and {} edges", graph.vertex_num(), graph.edge_num());
                report(&graph, perfect);
            }
        }
    }
}

fn report(graph: &Graph, perfect: bool) {
    match compute_max_matching(graph, perfect) {
        Ok(matching) => {
            println!("matched {} edge(s), total weight {}", matching.edges.len(), matching.weight);
            let mut edges: Vec<_> = matching.edges.iter().copied().collect();
            edges.sort_unstable();
            for e in edges {
                let (u, v) = graph.edge_endpoints(e);
                println!("  {u} -- {v} (weight {})", graph.edge_weight(e));
            }
        }
        Err(err) => {
            eprintln!("error: {err}");
            std::process::exit(1);
        }
    }
}
