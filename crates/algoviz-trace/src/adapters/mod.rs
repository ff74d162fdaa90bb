//! Per-family algorithm adapters.
//!
//! Each adapter validates its input before recording anything, records one
//! step per algorithm event in execution order and seals the trace with an
//! [`Outcome`](algoviz_core::Outcome).

pub mod branch_and_bound;
pub mod dynamic;
pub mod greedy;
pub mod searching;
pub mod shortest_path;
pub mod sorting;
pub mod spanning_tree;
pub mod string_matching;
pub mod traversal;

use algoviz_core::{Graph, Snapshot, ValidationError};
use petgraph::graph::{DiGraph, NodeIndex, UnGraph};

/// Longest array the sorting and searching adapters accept.
pub const ARRAY_LEN_LIMIT: usize = 128;
pub const VERTEX_LIMIT: usize = 64;
pub const EDGE_LIMIT: usize = 256;
/// Most items, activities, jobs or symbols a greedy adapter accepts.
pub const ITEM_LIMIT: usize = 64;
pub const TEXT_LEN_LIMIT: usize = 256;

/// Rejects a collection longer than `limit`.
pub fn check_len(what: &'static str, len: usize, limit: usize) -> Result<(), ValidationError> {
    if len > limit {
        return Err(ValidationError::TooLarge {
            what,
            size: len,
            limit,
        });
    }
    Ok(())
}

/// Rejects `values` whose absolute values do not sum within `i64`. Any sum
/// of a subset of them then fits too.
pub fn check_total(
    what: &'static str,
    values: impl IntoIterator<Item = i64>,
) -> Result<(), ValidationError> {
    values
        .into_iter()
        .try_fold(0i64, |acc, v| v.checked_abs().and_then(|v| acc.checked_add(v)))
        .map(|_| ())
        .ok_or(ValidationError::Overflow { what })
}

/// Rejects empty or oversized graphs, dangling edge endpoints and an
/// out-of-range source.
pub fn check_graph(graph: &Graph, source: Option<usize>) -> Result<(), ValidationError> {
    let count = graph.vertex_count();
    if count == 0 {
        return Err(ValidationError::Empty { what: "graph" });
    }
    check_len("vertex count", count, VERTEX_LIMIT)?;
    check_len("edge count", graph.edge_count(), EDGE_LIMIT)?;
    for edge in &graph.edges {
        for vertex in [edge.from, edge.to] {
            if vertex >= count {
                return Err(ValidationError::VertexOutOfRange { vertex, count });
            }
        }
    }
    if let Some(vertex) = source {
        if vertex >= count {
            return Err(ValidationError::VertexOutOfRange { vertex, count });
        }
    }
    Ok(())
}

/// Rejects negative edge weights.
pub fn check_non_negative_weights(graph: &Graph) -> Result<(), ValidationError> {
    match graph.edges.iter().position(|e| e.weight < 0) {
        Some(edge) => Err(ValidationError::NegativeEdgeWeight {
            edge,
            weight: graph.edges[edge].weight,
        }),
        None => Ok(()),
    }
}

/// Builds a petgraph directed graph with one node per vertex.
pub(crate) fn to_petgraph_directed(graph: &Graph) -> DiGraph<(), ()> {
    let mut g = DiGraph::with_capacity(graph.vertex_count(), graph.edge_count());
    for _ in 0..graph.vertex_count() {
        g.add_node(());
    }
    for edge in &graph.edges {
        g.add_edge(NodeIndex::new(edge.from), NodeIndex::new(edge.to), ());
    }
    g
}

/// Builds a petgraph undirected graph with one node per vertex.
pub(crate) fn to_petgraph_undirected(graph: &Graph) -> UnGraph<(), ()> {
    let mut g = UnGraph::with_capacity(graph.vertex_count(), graph.edge_count());
    for _ in 0..graph.vertex_count() {
        g.add_node(());
    }
    for edge in &graph.edges {
        g.add_edge(NodeIndex::new(edge.from), NodeIndex::new(edge.to), ());
    }
    g
}

/// Snapshot of graph algorithm state.
pub(crate) fn graph_snapshot(
    graph: &Graph,
    frontier: Vec<usize>,
    visited: &[usize],
    distances: &[Option<i64>],
    tree: &[usize],
) -> Snapshot {
    Snapshot::Graph {
        vertex_count: graph.vertex_count(),
        edge_count: graph.edge_count(),
        frontier,
        visited: visited.to_vec(),
        distances: distances.to_vec(),
        tree: tree.to_vec(),
    }
}

/// Formats a tentative distance, `inf` for unreachable.
pub(crate) fn fmt_dist(d: Option<i64>) -> String {
    match d {
        Some(d) => d.to_string(),
        None => "inf".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use algoviz_core::GraphBuilder;

    #[test]
    fn dangling_endpoint_is_rejected() {
        let mut graph = GraphBuilder::undirected().edge("A", "B", 1).build();
        graph.edges[0].to = 5;
        assert_eq!(
            check_graph(&graph, Some(0)).unwrap_err(),
            ValidationError::VertexOutOfRange { vertex: 5, count: 2 }
        );
    }

    #[test]
    fn source_out_of_range_is_rejected() {
        let graph = GraphBuilder::undirected().edge("A", "B", 1).build();
        assert_eq!(
            check_graph(&graph, Some(2)).unwrap_err(),
            ValidationError::VertexOutOfRange { vertex: 2, count: 2 }
        );
        assert!(check_graph(&graph, Some(1)).is_ok());
    }

    #[test]
    fn negative_weight_is_reported_with_its_edge() {
        let graph = GraphBuilder::directed()
            .edge("A", "B", 1)
            .edge("B", "C", -2)
            .build();
        assert_eq!(
            check_non_negative_weights(&graph).unwrap_err(),
            ValidationError::NegativeEdgeWeight { edge: 1, weight: -2 }
        );
    }

    #[test]
    fn oversized_graph_is_rejected() {
        let mut builder = GraphBuilder::undirected();
        for v in 0..=VERTEX_LIMIT {
            builder = builder.vertex(&v.to_string());
        }
        assert_eq!(
            check_graph(&builder.build(), None).unwrap_err(),
            ValidationError::TooLarge {
                what: "vertex count",
                size: VERTEX_LIMIT + 1,
                limit: VERTEX_LIMIT
            }
        );
    }

    #[test]
    fn totals_that_leave_i64_are_rejected() {
        assert!(check_total("weights", [i64::MAX - 1, 1]).is_ok());
        assert_eq!(
            check_total("weights", [i64::MAX, 1]).unwrap_err(),
            ValidationError::Overflow { what: "weights" }
        );
        assert!(check_total("weights", [i64::MIN]).is_err());
        assert!(check_total("weights", [-5, 5]).is_ok());
    }

    #[test]
    fn petgraph_mirror_keeps_isolated_vertices() {
        let graph = GraphBuilder::undirected()
            .edge("A", "B", 1)
            .vertex("C")
            .build();
        assert_eq!(to_petgraph_undirected(&graph).node_count(), 3);
        assert_eq!(to_petgraph_directed(&graph).edge_count(), 1);
    }
}
