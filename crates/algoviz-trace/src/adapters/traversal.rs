//! Graph traversal adapters: breadth-first, depth-first, Kahn's
//! topological sort and Kosaraju's strongly connected components.
//!
//! Every step carries the explicit frontier (queue front first, or stack
//! bottom first). Neighbors are examined in adjacency order; a neighbor
//! already visited or already in the frontier is recorded as `skip` and not
//! added again.

use std::collections::VecDeque;

use algoviz_core::{AlgorithmId, Graph, Outcome, Ref, StepKind, Trace, TraceError, ValidationError};
use petgraph::algo::is_cyclic_directed;

use super::{check_graph, graph_snapshot, to_petgraph_directed};
use crate::recorder::TraceRecorder;

fn order_labels(graph: &Graph, order: &[usize]) -> String {
    order
        .iter()
        .map(|&v| graph.label(v))
        .collect::<Vec<_>>()
        .join(", ")
}

pub fn breadth_first_search(graph: &Graph, source: usize) -> Result<Trace, TraceError> {
    check_graph(graph, Some(source))?;
    let adj = graph.adjacency();
    let mut rec = TraceRecorder::new(AlgorithmId::BreadthFirstSearch);
    let mut seen = vec![false; graph.vertex_count()];
    let mut queue = VecDeque::new();
    let mut order = Vec::new();

    seen[source] = true;
    queue.push_back(source);
    rec.record(
        StepKind::Enqueue,
        graph_snapshot(graph, queue.iter().copied().collect(), &order, &[], &[]),
        &[Ref::Vertex(source)],
        format!("enqueue start vertex {}", graph.label(source)),
    )?;

    while let Some(u) = queue.pop_front() {
        order.push(u);
        rec.record(
            StepKind::Visit,
            graph_snapshot(graph, queue.iter().copied().collect(), &order, &[], &[]),
            &[Ref::Vertex(u)],
            format!("dequeue and visit {}", graph.label(u)),
        )?;
        for &(v, e) in &adj[u] {
            if seen[v] {
                rec.record(
                    StepKind::Skip,
                    graph_snapshot(graph, queue.iter().copied().collect(), &order, &[], &[]),
                    &[Ref::Vertex(v), Ref::Edge(e)],
                    format!("{} already visited or queued", graph.label(v)),
                )?;
                continue;
            }
            seen[v] = true;
            queue.push_back(v);
            rec.record(
                StepKind::Enqueue,
                graph_snapshot(graph, queue.iter().copied().collect(), &order, &[], &[]),
                &[Ref::Vertex(v), Ref::Edge(e)],
                format!("enqueue {} from {}", graph.label(v), graph.label(u)),
            )?;
        }
    }

    rec.record(
        StepKind::Done,
        graph_snapshot(graph, Vec::new(), &order, &[], &[]),
        &[],
        format!("visit order: {}", order_labels(graph, &order)),
    )?;
    rec.finish(Outcome::Traversal { order })
}

/// Depth-first search with an explicit stack of `(vertex, next neighbor)`
/// frames, which visits vertices in the same order as the recursive
/// formulation.
pub fn depth_first_search(graph: &Graph, source: usize) -> Result<Trace, TraceError> {
    check_graph(graph, Some(source))?;
    let adj = graph.adjacency();
    let mut rec = TraceRecorder::new(AlgorithmId::DepthFirstSearch);
    let mut seen = vec![false; graph.vertex_count()];
    let mut stack: Vec<(usize, usize)> = Vec::new();
    let mut order = Vec::new();

    seen[source] = true;
    stack.push((source, 0));
    order.push(source);
    rec.record(
        StepKind::Visit,
        graph_snapshot(graph, stack_vertices(&stack), &order, &[], &[]),
        &[Ref::Vertex(source)],
        format!("push and visit start vertex {}", graph.label(source)),
    )?;

    while let Some(&(u, cursor)) = stack.last() {
        let Some(&(v, e)) = adj[u].get(cursor) else {
            stack.pop();
            rec.record(
                StepKind::Pop,
                graph_snapshot(graph, stack_vertices(&stack), &order, &[], &[]),
                &[Ref::Vertex(u)],
                format!("{} has no unvisited neighbors; backtrack", graph.label(u)),
            )?;
            continue;
        };
        if let Some(top) = stack.last_mut() {
            top.1 += 1;
        }
        if seen[v] {
            rec.record(
                StepKind::Skip,
                graph_snapshot(graph, stack_vertices(&stack), &order, &[], &[]),
                &[Ref::Vertex(v), Ref::Edge(e)],
                format!("{} already visited", graph.label(v)),
            )?;
            continue;
        }
        seen[v] = true;
        stack.push((v, 0));
        order.push(v);
        rec.record(
            StepKind::Visit,
            graph_snapshot(graph, stack_vertices(&stack), &order, &[], &[]),
            &[Ref::Vertex(v), Ref::Edge(e)],
            format!("push and visit {} from {}", graph.label(v), graph.label(u)),
        )?;
    }

    rec.record(
        StepKind::Done,
        graph_snapshot(graph, Vec::new(), &order, &[], &[]),
        &[],
        format!("visit order: {}", order_labels(graph, &order)),
    )?;
    rec.finish(Outcome::Traversal { order })
}

fn stack_vertices(stack: &[(usize, usize)]) -> Vec<usize> {
    stack.iter().map(|&(v, _)| v).collect()
}

/// Rejects inputs Kahn's algorithm cannot order.
pub fn check_topological(graph: &Graph) -> Result<(), ValidationError> {
    check_graph(graph, None)?;
    if !graph.directed {
        return Err(ValidationError::UndirectedGraph {
            algorithm: AlgorithmId::TopologicalSort,
        });
    }
    if is_cyclic_directed(&to_petgraph_directed(graph)) {
        return Err(ValidationError::Cyclic);
    }
    Ok(())
}

/// Kahn's algorithm. Zero in-degree vertices are queued in index order.
pub fn topological_sort(graph: &Graph) -> Result<Trace, TraceError> {
    check_topological(graph)?;
    let adj = graph.adjacency();
    let mut rec = TraceRecorder::new(AlgorithmId::TopologicalSort);
    let mut indegree = vec![0usize; graph.vertex_count()];
    for edge in &graph.edges {
        indegree[edge.to] += 1;
    }

    let mut queue = VecDeque::new();
    let mut order = Vec::new();
    for v in 0..graph.vertex_count() {
        if indegree[v] == 0 {
            queue.push_back(v);
            rec.record(
                StepKind::Enqueue,
                graph_snapshot(graph, queue.iter().copied().collect(), &order, &[], &[]),
                &[Ref::Vertex(v)],
                format!("{} has in-degree 0", graph.label(v)),
            )?;
        }
    }

    while let Some(u) = queue.pop_front() {
        order.push(u);
        rec.record(
            StepKind::Visit,
            graph_snapshot(graph, queue.iter().copied().collect(), &order, &[], &[]),
            &[Ref::Vertex(u)],
            format!("emit {}", graph.label(u)),
        )?;
        for &(v, e) in &adj[u] {
            indegree[v] -= 1;
            if indegree[v] == 0 {
                queue.push_back(v);
                rec.record(
                    StepKind::Enqueue,
                    graph_snapshot(graph, queue.iter().copied().collect(), &order, &[], &[]),
                    &[Ref::Vertex(v), Ref::Edge(e)],
                    format!("in-degree of {} reaches 0", graph.label(v)),
                )?;
            } else {
                rec.record(
                    StepKind::Skip,
                    graph_snapshot(graph, queue.iter().copied().collect(), &order, &[], &[]),
                    &[Ref::Vertex(v), Ref::Edge(e)],
                    format!("in-degree of {} is now {}", graph.label(v), indegree[v]),
                )?;
            }
        }
    }

    rec.record(
        StepKind::Done,
        graph_snapshot(graph, Vec::new(), &order, &[], &[]),
        &[],
        format!("topological order: {}", order_labels(graph, &order)),
    )?;
    rec.finish(Outcome::Traversal { order })
}

pub fn check_kosaraju(graph: &Graph) -> Result<(), ValidationError> {
    check_graph(graph, None)?;
    if !graph.directed {
        return Err(ValidationError::UndirectedGraph {
            algorithm: AlgorithmId::Kosaraju,
        });
    }
    Ok(())
}

/// Kosaraju's algorithm. A first depth-first pass, rooted at each unvisited
/// vertex in index order, records every finished vertex as `pop` onto the
/// finish stack. The second pass pops that stack and grows one component
/// per unassigned vertex over the reversed edges, closing it with a
/// `component` step.
pub fn kosaraju(graph: &Graph) -> Result<Trace, TraceError> {
    check_kosaraju(graph)?;
    let n = graph.vertex_count();
    let adj = graph.adjacency();
    let mut rec = TraceRecorder::new(AlgorithmId::Kosaraju);

    let mut seen = vec![false; n];
    let mut finished: Vec<usize> = Vec::new();
    for root in 0..n {
        if seen[root] {
            continue;
        }
        seen[root] = true;
        let mut stack: Vec<(usize, usize)> = vec![(root, 0)];
        rec.record(
            StepKind::Visit,
            graph_snapshot(graph, stack_vertices(&stack), &finished, &[], &[]),
            &[Ref::Vertex(root)],
            format!("start depth-first pass at {}", graph.label(root)),
        )?;
        while let Some(&(u, cursor)) = stack.last() {
            let Some(&(v, e)) = adj[u].get(cursor) else {
                stack.pop();
                finished.push(u);
                rec.record(
                    StepKind::Pop,
                    graph_snapshot(graph, stack_vertices(&stack), &finished, &[], &[]),
                    &[Ref::Vertex(u)],
                    format!("{} finished; push onto finish stack", graph.label(u)),
                )?;
                continue;
            };
            if let Some(top) = stack.last_mut() {
                top.1 += 1;
            }
            if seen[v] {
                rec.record(
                    StepKind::Skip,
                    graph_snapshot(graph, stack_vertices(&stack), &finished, &[], &[]),
                    &[Ref::Vertex(v), Ref::Edge(e)],
                    format!("{} already visited", graph.label(v)),
                )?;
                continue;
            }
            seen[v] = true;
            stack.push((v, 0));
            rec.record(
                StepKind::Visit,
                graph_snapshot(graph, stack_vertices(&stack), &finished, &[], &[]),
                &[Ref::Vertex(v), Ref::Edge(e)],
                format!("visit {} from {}", graph.label(v), graph.label(u)),
            )?;
        }
    }

    let mut reversed = vec![Vec::new(); n];
    for (e, edge) in graph.edges.iter().enumerate() {
        reversed[edge.to].push((edge.from, e));
    }

    let mut assigned = vec![false; n];
    let mut order: Vec<usize> = Vec::new();
    let mut components: Vec<Vec<usize>> = Vec::new();
    let pending = |finished: &[usize]| finished.iter().rev().copied().collect::<Vec<_>>();
    while let Some(root) = finished.pop() {
        if assigned[root] {
            rec.record(
                StepKind::Skip,
                graph_snapshot(graph, pending(&finished), &order, &[], &[]),
                &[Ref::Vertex(root)],
                format!("{} already has a component", graph.label(root)),
            )?;
            continue;
        }
        assigned[root] = true;
        order.push(root);
        let mut component = vec![root];
        rec.record(
            StepKind::Visit,
            graph_snapshot(graph, pending(&finished), &order, &[], &[]),
            &[Ref::Vertex(root)],
            format!(
                "start component {} at {}",
                components.len() + 1,
                graph.label(root)
            ),
        )?;
        let mut stack: Vec<(usize, usize)> = vec![(root, 0)];
        while let Some(&(u, cursor)) = stack.last() {
            let Some(&(v, e)) = reversed[u].get(cursor) else {
                stack.pop();
                continue;
            };
            if let Some(top) = stack.last_mut() {
                top.1 += 1;
            }
            if assigned[v] {
                rec.record(
                    StepKind::Skip,
                    graph_snapshot(graph, pending(&finished), &order, &[], &[]),
                    &[Ref::Vertex(v), Ref::Edge(e)],
                    format!("{} already has a component", graph.label(v)),
                )?;
                continue;
            }
            assigned[v] = true;
            order.push(v);
            component.push(v);
            stack.push((v, 0));
            rec.record(
                StepKind::Visit,
                graph_snapshot(graph, pending(&finished), &order, &[], &[]),
                &[Ref::Vertex(v), Ref::Edge(e)],
                format!("{} reaches {} backwards", graph.label(v), graph.label(u)),
            )?;
        }
        let refs: Vec<Ref> = component.iter().map(|&v| Ref::Vertex(v)).collect();
        rec.record(
            StepKind::Component,
            graph_snapshot(graph, pending(&finished), &order, &[], &[]),
            &refs,
            format!(
                "component {}: {}",
                components.len() + 1,
                order_labels(graph, &component)
            ),
        )?;
        components.push(component);
    }

    rec.record(
        StepKind::Done,
        graph_snapshot(graph, Vec::new(), &order, &[], &[]),
        &[],
        format!("{} strongly connected components", components.len()),
    )?;
    rec.finish(Outcome::Components { components })
}
