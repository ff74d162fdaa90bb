//! Minimum spanning tree adapters: Prim and Kruskal.
//!
//! Both require an undirected graph. Candidate ties are broken by edge
//! enumeration order.

use algoviz_core::{AlgorithmId, Graph, Outcome, Ref, StepKind, Trace, TraceError, ValidationError};
use petgraph::algo::connected_components;
use petgraph::unionfind::UnionFind;

use super::{check_graph, check_total, graph_snapshot, to_petgraph_undirected};
use crate::recorder::TraceRecorder;

/// Also bounds the total edge weight so any tree's weight fits in `i64`.
fn check_undirected(graph: &Graph, algorithm: AlgorithmId) -> Result<(), ValidationError> {
    if graph.directed {
        return Err(ValidationError::DirectedGraph { algorithm });
    }
    check_total("edge weights", graph.edges.iter().map(|e| e.weight))
}

/// Prim needs a single component to grow a spanning tree from `source`.
pub fn check_prim(graph: &Graph, source: usize) -> Result<(), ValidationError> {
    check_graph(graph, Some(source))?;
    check_undirected(graph, AlgorithmId::Prim)?;
    if connected_components(&to_petgraph_undirected(graph)) != 1 {
        return Err(ValidationError::Disconnected);
    }
    Ok(())
}

pub fn check_kruskal(graph: &Graph) -> Result<(), ValidationError> {
    check_graph(graph, None)?;
    check_undirected(graph, AlgorithmId::Kruskal)
}

fn tree_weight(graph: &Graph, tree: &[usize]) -> i64 {
    tree.iter().map(|&e| graph.edges[e].weight).sum()
}

/// Prim's algorithm. Each round scans every edge crossing the cut and
/// accepts the lightest, `(weight, edge index)` ascending. When a vertex
/// joins, its other edges back into the tree are rejected.
pub fn prim(graph: &Graph, source: usize) -> Result<Trace, TraceError> {
    check_prim(graph, source)?;
    let n = graph.vertex_count();
    let adj = graph.adjacency();
    let mut rec = TraceRecorder::new(AlgorithmId::Prim);

    let mut in_tree = vec![false; n];
    let mut members = vec![source];
    let mut tree = Vec::new();
    in_tree[source] = true;

    let fringe = |in_tree: &[bool]| {
        let mut out: Vec<usize> = graph
            .edges
            .iter()
            .filter(|e| in_tree[e.from] != in_tree[e.to])
            .map(|e| if in_tree[e.from] { e.to } else { e.from })
            .collect();
        out.sort_unstable();
        out.dedup();
        out
    };

    rec.record(
        StepKind::Visit,
        graph_snapshot(graph, fringe(&in_tree), &members, &[], &tree),
        &[Ref::Vertex(source)],
        format!("grow the tree from {}", graph.label(source)),
    )?;

    while members.len() < n {
        let lightest = graph
            .edges
            .iter()
            .enumerate()
            .filter(|(_, e)| in_tree[e.from] != in_tree[e.to])
            .min_by_key(|&(i, e)| (e.weight, i));
        // Connectivity was checked up front, so a crossing edge exists.
        let Some((accepted, edge)) = lightest else {
            break;
        };
        let (inside, joined) = if in_tree[edge.from] {
            (edge.from, edge.to)
        } else {
            (edge.to, edge.from)
        };
        in_tree[joined] = true;
        members.push(joined);
        tree.push(accepted);
        rec.record(
            StepKind::Accept,
            graph_snapshot(graph, fringe(&in_tree), &members, &[], &tree),
            &[Ref::Edge(accepted), Ref::Vertex(joined)],
            format!(
                "accept {}-{} (weight {}), the lightest edge leaving the tree",
                graph.label(inside),
                graph.label(joined),
                edge.weight
            ),
        )?;

        for &(w, e) in &adj[joined] {
            if e == accepted || !in_tree[w] {
                continue;
            }
            rec.record(
                StepKind::Reject,
                graph_snapshot(graph, fringe(&in_tree), &members, &[], &tree),
                &[Ref::Edge(e)],
                format!(
                    "{}-{} now joins two tree vertices",
                    graph.label(joined),
                    graph.label(w)
                ),
            )?;
        }
    }

    let weight = tree_weight(graph, &tree);
    rec.record(
        StepKind::Done,
        graph_snapshot(graph, Vec::new(), &members, &[], &tree),
        &[],
        format!("spanning tree weight {}", weight),
    )?;
    rec.finish(Outcome::SpanningTree { edges: tree, weight })
}

/// Kruskal's algorithm. Edges are considered ascending by weight (stable in
/// enumeration order); union-find decides acceptance. A disconnected graph
/// yields a spanning forest.
pub fn kruskal(graph: &Graph) -> Result<Trace, TraceError> {
    check_kruskal(graph)?;
    let n = graph.vertex_count();
    let mut rec = TraceRecorder::new(AlgorithmId::Kruskal);

    let mut by_weight: Vec<usize> = (0..graph.edge_count()).collect();
    by_weight.sort_by_key(|&e| graph.edges[e].weight);

    let mut components = UnionFind::<usize>::new(n);
    let mut tree = Vec::new();
    for e in by_weight {
        if tree.len() + 1 >= n {
            break;
        }
        let edge = &graph.edges[e];
        let label = format!(
            "{}-{} (weight {})",
            graph.label(edge.from),
            graph.label(edge.to),
            edge.weight
        );
        if components.union(edge.from, edge.to) {
            tree.push(e);
            rec.record(
                StepKind::Accept,
                graph_snapshot(graph, Vec::new(), &[], &[], &tree),
                &[Ref::Edge(e)],
                format!("accept {}: joins two components", label),
            )?;
        } else {
            rec.record(
                StepKind::Reject,
                graph_snapshot(graph, Vec::new(), &[], &[], &tree),
                &[Ref::Edge(e)],
                format!("reject {}: would close a cycle", label),
            )?;
        }
    }

    let weight = tree_weight(graph, &tree);
    rec.record(
        StepKind::Done,
        graph_snapshot(graph, Vec::new(), &[], &[], &tree),
        &[],
        format!("spanning tree weight {}", weight),
    )?;
    rec.finish(Outcome::SpanningTree { edges: tree, weight })
}
