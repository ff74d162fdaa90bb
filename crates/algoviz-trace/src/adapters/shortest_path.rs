//! Shortest-path adapters: Dijkstra, Bellman–Ford and Floyd–Warshall.

use std::cmp::Reverse;
use std::collections::BinaryHeap;

use algoviz_core::{
    AlgorithmId, Graph, Outcome, Ref, Snapshot, StepKind, Trace, TraceError, ValidationError,
};

use super::{check_graph, check_len, check_non_negative_weights, fmt_dist, graph_snapshot};
use crate::recorder::TraceRecorder;

fn tree_edges(pred: &[Option<usize>]) -> Vec<usize> {
    pred.iter().flatten().copied().collect()
}

fn improves(candidate: i64, current: Option<i64>) -> bool {
    current.map_or(true, |c| candidate < c)
}

/// Dijkstra's algorithm with a lazy-deletion binary heap.
///
/// Heap entries are `(distance, sequence, vertex)`; the sequence number
/// breaks distance ties in insertion order. Each vertex is recorded as
/// `visit` when settled, then every incident edge as `relax` or `skip`.
pub fn dijkstra(graph: &Graph, source: usize) -> Result<Trace, TraceError> {
    check_graph(graph, Some(source))?;
    check_non_negative_weights(graph)?;
    let adj = graph.adjacency();
    let n = graph.vertex_count();
    let mut rec = TraceRecorder::new(AlgorithmId::Dijkstra);

    let mut dist: Vec<Option<i64>> = vec![None; n];
    let mut pred: Vec<Option<usize>> = vec![None; n];
    let mut settled = vec![false; n];
    let mut visited = Vec::new();
    let mut heap = BinaryHeap::new();
    let mut seq = 0u64;

    dist[source] = Some(0);
    heap.push(Reverse((0i64, seq, source)));

    // Live heap entries in pop order, skipping stale ones.
    let frontier = |heap: &BinaryHeap<Reverse<(i64, u64, usize)>>,
                    dist: &[Option<i64>],
                    settled: &[bool]| {
        let mut live: Vec<_> = heap
            .iter()
            .map(|Reverse(entry)| *entry)
            .filter(|&(d, _, v)| !settled[v] && dist[v] == Some(d))
            .collect();
        live.sort_unstable();
        live.into_iter().map(|(_, _, v)| v).collect::<Vec<_>>()
    };

    while let Some(Reverse((d, _, u))) = heap.pop() {
        if settled[u] || dist[u] != Some(d) {
            continue;
        }
        settled[u] = true;
        visited.push(u);
        rec.record(
            StepKind::Visit,
            graph_snapshot(
                graph,
                frontier(&heap, &dist, &settled),
                &visited,
                &dist,
                &tree_edges(&pred),
            ),
            &[Ref::Vertex(u)],
            format!("settle {} at distance {}", graph.label(u), d),
        )?;

        for &(v, e) in &adj[u] {
            let candidate = d.saturating_add(graph.edges[e].weight);
            let refs = [Ref::Vertex(v), Ref::Edge(e)];
            if !settled[v] && improves(candidate, dist[v]) {
                let before = dist[v];
                dist[v] = Some(candidate);
                pred[v] = Some(e);
                seq += 1;
                heap.push(Reverse((candidate, seq, v)));
                rec.record(
                    StepKind::Relax,
                    graph_snapshot(
                        graph,
                        frontier(&heap, &dist, &settled),
                        &visited,
                        &dist,
                        &tree_edges(&pred),
                    ),
                    &refs,
                    format!(
                        "relax {} via {}: {} -> {}",
                        graph.label(v),
                        graph.label(u),
                        fmt_dist(before),
                        candidate
                    ),
                )?;
            } else {
                rec.record(
                    StepKind::Skip,
                    graph_snapshot(
                        graph,
                        frontier(&heap, &dist, &settled),
                        &visited,
                        &dist,
                        &tree_edges(&pred),
                    ),
                    &refs,
                    format!(
                        "{} via {} is {}, not better than {}",
                        graph.label(v),
                        graph.label(u),
                        candidate,
                        fmt_dist(dist[v])
                    ),
                )?;
            }
        }
    }

    rec.record(
        StepKind::Done,
        graph_snapshot(graph, Vec::new(), &visited, &dist, &tree_edges(&pred)),
        &[],
        "all reachable vertices settled",
    )?;
    rec.finish(Outcome::Distances {
        dist,
        negative_cycle: false,
    })
}

/// Bellman–Ford. Negative weights are allowed; an edge that still relaxes
/// after `V - 1` rounds is recorded as `update` and flags a negative cycle.
pub fn bellman_ford(graph: &Graph, source: usize) -> Result<Trace, TraceError> {
    check_graph(graph, Some(source))?;
    let n = graph.vertex_count();
    let mut rec = TraceRecorder::new(AlgorithmId::BellmanFord);

    // Undirected edges relax in both directions.
    let mut arcs = Vec::with_capacity(graph.edge_count() * 2);
    for (e, edge) in graph.edges.iter().enumerate() {
        arcs.push((edge.from, edge.to, e));
        if !graph.directed && edge.from != edge.to {
            arcs.push((edge.to, edge.from, e));
        }
    }

    let mut dist: Vec<Option<i64>> = vec![None; n];
    let mut pred: Vec<Option<usize>> = vec![None; n];
    dist[source] = Some(0);
    rec.record(
        StepKind::Visit,
        graph_snapshot(graph, Vec::new(), &[source], &dist, &[]),
        &[Ref::Vertex(source)],
        format!("start at {} with distance 0", graph.label(source)),
    )?;

    let mut converged = false;
    for round in 1..n {
        let mut changed = false;
        for &(u, v, e) in &arcs {
            let refs = [Ref::Vertex(v), Ref::Edge(e)];
            let Some(du) = dist[u] else {
                rec.record(
                    StepKind::Skip,
                    graph_snapshot(graph, Vec::new(), &[], &dist, &tree_edges(&pred)),
                    &refs,
                    format!("round {}: {} not reached yet", round, graph.label(u)),
                )?;
                continue;
            };
            let candidate = du.saturating_add(graph.edges[e].weight);
            if improves(candidate, dist[v]) {
                let before = dist[v];
                dist[v] = Some(candidate);
                pred[v] = Some(e);
                changed = true;
                rec.record(
                    StepKind::Relax,
                    graph_snapshot(graph, Vec::new(), &[], &dist, &tree_edges(&pred)),
                    &refs,
                    format!(
                        "round {}: relax {} via {}: {} -> {}",
                        round,
                        graph.label(v),
                        graph.label(u),
                        fmt_dist(before),
                        candidate
                    ),
                )?;
            } else {
                rec.record(
                    StepKind::Skip,
                    graph_snapshot(graph, Vec::new(), &[], &dist, &tree_edges(&pred)),
                    &refs,
                    format!(
                        "round {}: {} via {} is {}, not better than {}",
                        round,
                        graph.label(v),
                        graph.label(u),
                        candidate,
                        fmt_dist(dist[v])
                    ),
                )?;
            }
        }
        if !changed {
            converged = true;
            break;
        }
    }

    let mut negative_cycle = false;
    if !converged {
        for &(u, v, e) in &arcs {
            let Some(du) = dist[u] else { continue };
            let candidate = du.saturating_add(graph.edges[e].weight);
            if improves(candidate, dist[v]) {
                negative_cycle = true;
                rec.record(
                    StepKind::Update,
                    graph_snapshot(graph, Vec::new(), &[], &dist, &tree_edges(&pred)),
                    &[Ref::Vertex(v), Ref::Edge(e)],
                    format!(
                        "{} still improves via {}: negative cycle",
                        graph.label(v),
                        graph.label(u)
                    ),
                )?;
            }
        }
    }

    let summary = if negative_cycle {
        "negative cycle reachable from the source; distances are not final"
    } else {
        "distances final"
    };
    rec.record(
        StepKind::Done,
        graph_snapshot(graph, Vec::new(), &[], &dist, &tree_edges(&pred)),
        &[],
        summary,
    )?;
    rec.finish(Outcome::Distances {
        dist,
        negative_cycle,
    })
}

/// Most vertices Floyd–Warshall accepts. Every step carries the full
/// matrix, and there can be one per `(k, i, j)`.
pub const MATRIX_VERTEX_LIMIT: usize = 16;

pub fn check_floyd_warshall(graph: &Graph) -> Result<(), ValidationError> {
    check_graph(graph, None)?;
    check_len("distance matrix vertex count", graph.vertex_count(), MATRIX_VERTEX_LIMIT)
}

/// Floyd–Warshall over the distance matrix. `k` is the outermost loop; an
/// `update` step is recorded for every improvement of `dist[i][j]`.
pub fn floyd_warshall(graph: &Graph) -> Result<Trace, TraceError> {
    check_floyd_warshall(graph)?;
    let n = graph.vertex_count();
    let mut rec = TraceRecorder::new(AlgorithmId::FloydWarshall);

    let mut dist: Vec<Vec<Option<i64>>> = vec![vec![None; n]; n];
    for (i, row) in dist.iter_mut().enumerate() {
        row[i] = Some(0);
    }
    for edge in &graph.edges {
        let mut set = |a: usize, b: usize| {
            if improves(edge.weight, dist[a][b]) {
                dist[a][b] = Some(edge.weight);
            }
        };
        set(edge.from, edge.to);
        if !graph.directed {
            set(edge.to, edge.from);
        }
    }

    for k in 0..n {
        rec.record(
            StepKind::Visit,
            Snapshot::Matrix { cells: dist.clone() },
            &[],
            format!("route through {}", graph.label(k)),
        )?;
        for i in 0..n {
            let Some(ik) = dist[i][k] else { continue };
            for j in 0..n {
                let Some(kj) = dist[k][j] else { continue };
                let candidate = ik.saturating_add(kj);
                if improves(candidate, dist[i][j]) {
                    let before = dist[i][j];
                    dist[i][j] = Some(candidate);
                    rec.record(
                        StepKind::Update,
                        Snapshot::Matrix { cells: dist.clone() },
                        &[
                            Ref::Cell { row: i, col: j },
                            Ref::Cell { row: i, col: k },
                            Ref::Cell { row: k, col: j },
                        ],
                        format!(
                            "{} -> {} via {}: {} -> {}",
                            graph.label(i),
                            graph.label(j),
                            graph.label(k),
                            fmt_dist(before),
                            candidate
                        ),
                    )?;
                }
            }
        }
    }

    rec.record(
        StepKind::Done,
        Snapshot::Matrix { cells: dist.clone() },
        &[],
        "all pairs computed",
    )?;
    rec.finish(Outcome::AllPairs { dist })
}

#[cfg(test)]
mod tests {
    use super::*;
    use algoviz_core::GraphBuilder;

    fn kinds(trace: &Trace) -> Vec<StepKind> {
        trace.steps().iter().map(|s| s.kind).collect()
    }

    fn distances(trace: &Trace) -> (Vec<Option<i64>>, bool) {
        match trace.outcome() {
            Outcome::Distances {
                dist,
                negative_cycle,
            } => (dist.clone(), *negative_cycle),
            other => panic!("unexpected outcome {:?}", other),
        }
    }

    #[test]
    fn dijkstra_settles_by_ascending_distance() {
        let graph = GraphBuilder::directed()
            .edge("A", "B", 4)
            .edge("A", "C", 1)
            .edge("C", "B", 2)
            .edge("B", "D", 1)
            .edge("C", "D", 5)
            .build();
        let trace = dijkstra(&graph, 0).unwrap();
        use StepKind::*;
        assert_eq!(
            kinds(&trace),
            vec![Visit, Relax, Relax, Visit, Relax, Relax, Visit, Relax, Visit, Done]
        );
        assert_eq!(
            distances(&trace),
            (vec![Some(0), Some(3), Some(1), Some(4)], false)
        );
    }

    #[test]
    fn dijkstra_breaks_ties_by_insertion_order_and_skips_non_improving_edges() {
        let graph = GraphBuilder::undirected()
            .edge("A", "B", 1)
            .edge("A", "C", 1)
            .edge("B", "C", 1)
            .build();
        let trace = dijkstra(&graph, 0).unwrap();
        use StepKind::*;
        assert_eq!(
            kinds(&trace),
            vec![Visit, Relax, Relax, Visit, Skip, Skip, Visit, Skip, Skip, Done]
        );
        let settled: Vec<_> = trace
            .steps()
            .iter()
            .filter(|s| s.kind == Visit)
            .map(|s| s.refs[0])
            .collect();
        assert_eq!(settled, vec![Ref::Vertex(0), Ref::Vertex(1), Ref::Vertex(2)]);
    }

    #[test]
    fn dijkstra_rejects_negative_weights() {
        let graph = GraphBuilder::directed().edge("A", "B", -1).build();
        assert_eq!(
            dijkstra(&graph, 0).unwrap_err(),
            TraceError::Validation(ValidationError::NegativeEdgeWeight { edge: 0, weight: -1 })
        );
    }

    #[test]
    fn bellman_ford_handles_negative_edges_and_exits_early() {
        let graph = GraphBuilder::directed()
            .edge("A", "B", 4)
            .edge("A", "C", 5)
            .edge("C", "B", -3)
            .edge("B", "D", 2)
            .build();
        let trace = bellman_ford(&graph, 0).unwrap();
        assert_eq!(
            distances(&trace),
            (vec![Some(0), Some(2), Some(5), Some(4)], false)
        );
        // Start, one relaxing round, one quiet round, done.
        assert_eq!(trace.len(), 1 + 4 + 4 + 1);
    }

    #[test]
    fn bellman_ford_reports_negative_cycle() {
        let graph = GraphBuilder::directed()
            .edge("A", "B", 1)
            .edge("B", "C", -2)
            .edge("C", "B", 1)
            .build();
        let trace = bellman_ford(&graph, 0).unwrap();
        assert!(distances(&trace).1);
        assert!(trace.steps().iter().any(|s| s.kind == StepKind::Update));
    }

    #[test]
    fn floyd_warshall_updates_only_on_improvement() {
        let graph = GraphBuilder::directed()
            .edge("A", "B", 3)
            .edge("B", "C", 1)
            .edge("A", "C", 7)
            .build();
        let trace = floyd_warshall(&graph).unwrap();
        let updates: Vec<_> = trace
            .steps()
            .iter()
            .filter(|s| s.kind == StepKind::Update)
            .collect();
        assert_eq!(updates.len(), 1);
        assert_eq!(
            updates[0].refs.as_slice(),
            &[
                Ref::Cell { row: 0, col: 2 },
                Ref::Cell { row: 0, col: 1 },
                Ref::Cell { row: 1, col: 2 },
            ]
        );
        assert_eq!(
            trace.outcome(),
            &Outcome::AllPairs {
                dist: vec![
                    vec![Some(0), Some(3), Some(4)],
                    vec![None, Some(0), Some(1)],
                    vec![None, None, Some(0)],
                ]
            }
        );
    }

    #[test]
    fn floyd_warshall_rejects_matrices_past_the_vertex_limit() {
        let mut builder = GraphBuilder::directed();
        for v in 0..MATRIX_VERTEX_LIMIT {
            builder = builder.edge(&v.to_string(), &(v + 1).to_string(), 1);
        }
        let graph = builder.build();
        assert_eq!(graph.vertex_count(), MATRIX_VERTEX_LIMIT + 1);
        assert_eq!(
            floyd_warshall(&graph).unwrap_err(),
            TraceError::Validation(ValidationError::TooLarge {
                what: "distance matrix vertex count",
                size: MATRIX_VERTEX_LIMIT + 1,
                limit: MATRIX_VERTEX_LIMIT
            })
        );
        // Dijkstra has no matrix and accepts the same graph.
        assert!(dijkstra(&graph, 0).is_ok());
    }
}
