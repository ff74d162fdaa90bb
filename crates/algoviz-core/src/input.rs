//! Algorithm inputs.
//!
//! [`Input`] is the request body of the remote step-generation contract and
//! the argument of every adapter. Graph vertices are interned by label in
//! first-seen order, so adjacency order follows edge enumeration order.

use std::fmt;

use indexmap::IndexSet;
use rand::Rng;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

/// Default bounds for generated arrays.
pub const RANDOM_MIN: i64 = 10;
pub const RANDOM_MAX: i64 = 200;

/// Input to one algorithm run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Input {
    Array { values: Vec<i64> },
    Search { values: Vec<i64>, target: i64 },
    Graph { graph: Graph, source: usize },
    Knapsack { items: Vec<Item>, capacity: i64 },
    Activities { activities: Vec<Activity> },
    Jobs { jobs: Vec<Job> },
    Text { text: String, pattern: String },
    Sequences { first: String, second: String },
    /// Matrix chain `A1..An` where `Ai` is `dims[i-1] x dims[i]`.
    Dimensions { dims: Vec<i64> },
    Frequencies { symbols: Vec<Symbol> },
}

impl Input {
    pub fn kind(&self) -> InputKind {
        match self {
            Input::Array { .. } => InputKind::Array,
            Input::Search { .. } => InputKind::Search,
            Input::Graph { .. } => InputKind::Graph,
            Input::Knapsack { .. } => InputKind::Knapsack,
            Input::Activities { .. } => InputKind::Activities,
            Input::Jobs { .. } => InputKind::Jobs,
            Input::Text { .. } => InputKind::Text,
            Input::Sequences { .. } => InputKind::Sequences,
            Input::Dimensions { .. } => InputKind::Dimensions,
            Input::Frequencies { .. } => InputKind::Frequencies,
        }
    }
}

/// Discriminant of [`Input`], used in error messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InputKind {
    Array,
    Search,
    Graph,
    Knapsack,
    Activities,
    Jobs,
    Text,
    Sequences,
    Dimensions,
    Frequencies,
}

impl fmt::Display for InputKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            InputKind::Array => "array",
            InputKind::Search => "search",
            InputKind::Graph => "graph",
            InputKind::Knapsack => "knapsack",
            InputKind::Activities => "activities",
            InputKind::Jobs => "jobs",
            InputKind::Text => "text",
            InputKind::Sequences => "sequences",
            InputKind::Dimensions => "dimensions",
            InputKind::Frequencies => "frequencies",
        };
        f.write_str(name)
    }
}

/// A knapsack item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    pub weight: i64,
    pub value: i64,
}

impl Item {
    pub fn new(weight: i64, value: i64) -> Self {
        Item { weight, value }
    }
}

/// An activity occupying the half-open interval `[start, end)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Activity {
    pub start: i64,
    pub end: i64,
}

/// A unit-time job with a deadline (in slots, 1-based) and a profit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Job {
    pub deadline: i64,
    pub profit: i64,
}

/// A symbol and how often it occurs, for prefix-code construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Symbol {
    pub symbol: char,
    pub frequency: i64,
}

impl Symbol {
    pub fn new(symbol: char, frequency: i64) -> Self {
        Symbol { symbol, frequency }
    }
}

/// A weighted edge between two vertex indices.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Edge {
    pub from: usize,
    pub to: usize,
    #[serde(default = "unit_weight")]
    pub weight: i64,
}

fn unit_weight() -> i64 {
    1
}

/// A graph given as labelled vertices and an ordered edge list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Graph {
    pub labels: Vec<String>,
    pub edges: Vec<Edge>,
    #[serde(default)]
    pub directed: bool,
}

impl Graph {
    pub fn vertex_count(&self) -> usize {
        self.labels.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// Index of the vertex with `label`.
    pub fn vertex(&self, label: &str) -> Option<usize> {
        self.labels.iter().position(|l| l == label)
    }

    /// Label for vertex `v`, falling back to its index.
    pub fn label(&self, v: usize) -> String {
        self.labels
            .get(v)
            .cloned()
            .unwrap_or_else(|| v.to_string())
    }

    /// Outgoing `(neighbor, edge index)` pairs per vertex, in edge
    /// enumeration order. Undirected edges appear in both lists. Edges with
    /// an out-of-range endpoint are ignored; validation rejects them first.
    pub fn adjacency(&self) -> Vec<Vec<(usize, usize)>> {
        let n = self.vertex_count();
        let mut adj = vec![Vec::new(); n];
        for (idx, edge) in self.edges.iter().enumerate() {
            if edge.from >= n || edge.to >= n {
                continue;
            }
            adj[edge.from].push((edge.to, idx));
            if !self.directed && edge.from != edge.to {
                adj[edge.to].push((edge.from, idx));
            }
        }
        adj
    }
}

/// Builds a [`Graph`] from labelled edges.
#[derive(Debug, Default)]
pub struct GraphBuilder {
    labels: IndexSet<String>,
    edges: Vec<Edge>,
    directed: bool,
}

impl GraphBuilder {
    pub fn undirected() -> Self {
        Self::default()
    }

    pub fn directed() -> Self {
        GraphBuilder {
            directed: true,
            ..Self::default()
        }
    }

    /// Adds a vertex without edges. Re-adding a label is a no-op.
    pub fn vertex(mut self, label: &str) -> Self {
        self.intern(label);
        self
    }

    pub fn edge(mut self, from: &str, to: &str, weight: i64) -> Self {
        let from = self.intern(from);
        let to = self.intern(to);
        self.edges.push(Edge { from, to, weight });
        self
    }

    pub fn build(self) -> Graph {
        Graph {
            labels: self.labels.into_iter().collect(),
            edges: self.edges,
            directed: self.directed,
        }
    }

    fn intern(&mut self, label: &str) -> usize {
        match self.labels.get_index_of(label) {
            Some(idx) => idx,
            None => self.labels.insert_full(label.to_string()).0,
        }
    }
}

/// Generates `len` values in `[min, max]` from `seed`. The same seed always
/// yields the same array.
pub fn random_array(seed: u64, len: usize, min: i64, max: i64) -> Vec<i64> {
    let (lo, hi) = if min <= max { (min, max) } else { (max, min) };
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    (0..len).map(|_| rng.gen_range(lo..=hi)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_interns_labels_in_first_seen_order() {
        let graph = GraphBuilder::undirected()
            .edge("B", "A", 4)
            .edge("A", "C", 2)
            .edge("C", "B", 1)
            .build();
        assert_eq!(graph.labels, vec!["B", "A", "C"]);
        assert_eq!(graph.edges[1], Edge { from: 1, to: 2, weight: 2 });
        assert_eq!(graph.vertex("C"), Some(2));
    }

    #[test]
    fn undirected_adjacency_lists_both_directions_in_edge_order() {
        let graph = GraphBuilder::undirected()
            .edge("A", "B", 1)
            .edge("A", "C", 1)
            .edge("B", "C", 1)
            .build();
        let adj = graph.adjacency();
        assert_eq!(adj[0], vec![(1, 0), (2, 1)]);
        assert_eq!(adj[1], vec![(0, 0), (2, 2)]);
        assert_eq!(adj[2], vec![(0, 1), (1, 2)]);
    }

    #[test]
    fn directed_adjacency_is_one_way() {
        let graph = GraphBuilder::directed().edge("A", "B", 1).build();
        let adj = graph.adjacency();
        assert_eq!(adj[0], vec![(1, 0)]);
        assert!(adj[1].is_empty());
    }

    #[test]
    fn random_array_is_reproducible_and_bounded() {
        let a = random_array(7, 32, RANDOM_MIN, RANDOM_MAX);
        let b = random_array(7, 32, RANDOM_MIN, RANDOM_MAX);
        assert_eq!(a, b);
        assert!(a.iter().all(|v| (RANDOM_MIN..=RANDOM_MAX).contains(v)));
        assert_ne!(a, random_array(8, 32, RANDOM_MIN, RANDOM_MAX));
    }

    #[test]
    fn input_json_is_tagged_by_kind() {
        let input: Input =
            serde_json::from_str(r#"{"kind":"search","values":[1,2,3],"target":2}"#).unwrap();
        assert_eq!(
            input,
            Input::Search {
                values: vec![1, 2, 3],
                target: 2
            }
        );
        assert_eq!(input.kind(), InputKind::Search);
    }

    #[test]
    fn symbols_decode_from_single_character_strings() {
        let input: Input = serde_json::from_str(
            r#"{"kind":"frequencies","symbols":[{"symbol":"a","frequency":5}]}"#,
        )
        .unwrap();
        assert_eq!(
            input,
            Input::Frequencies {
                symbols: vec![Symbol::new('a', 5)]
            }
        );
    }

    proptest::proptest! {
        #[test]
        fn adjacency_degree_matches_edge_count(
            edges in proptest::collection::vec((0usize..6, 0usize..6), 0..20)
        ) {
            let mut builder = GraphBuilder::undirected();
            for v in 0..6 {
                builder = builder.vertex(&v.to_string());
            }
            for (a, b) in &edges {
                builder = builder.edge(&a.to_string(), &b.to_string(), 1);
            }
            let graph = builder.build();
            let self_loops = edges.iter().filter(|(a, b)| a == b).count();
            let degree: usize = graph.adjacency().iter().map(Vec::len).sum();
            proptest::prop_assert_eq!(degree, 2 * edges.len() - self_loops);
        }
    }
}
