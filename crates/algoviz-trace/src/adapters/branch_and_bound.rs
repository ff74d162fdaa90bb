//! Branch-and-bound adapters: the travelling salesman tour.
//!
//! The search extends a partial tour one vertex at a time, candidates in
//! index order. Each extension's lower bound is the cost so far plus the
//! cheapest edge leaving the current vertex and every unvisited one. An
//! extension whose bound cannot beat the best complete tour is recorded as
//! `prune` and not explored.

use algoviz_core::{
    AlgorithmId, Graph, Outcome, Ref, Snapshot, StepKind, Trace, TraceError, ValidationError,
};

use super::{check_graph, check_len, check_non_negative_weights};
use crate::recorder::TraceRecorder;

/// Most vertices the tour search accepts. The search tree grows
/// factorially in this.
pub const TOUR_VERTEX_LIMIT: usize = 8;

/// Needs non-negative weights small enough that a tour plus its bound stays
/// within `i64`. A tour uses an edge at most twice and the bound counts it
/// at most twice more.
pub fn check_tour(graph: &Graph, source: usize) -> Result<(), ValidationError> {
    check_graph(graph, Some(source))?;
    check_len("tour vertex count", graph.vertex_count(), TOUR_VERTEX_LIMIT)?;
    check_non_negative_weights(graph)?;
    graph
        .edges
        .iter()
        .try_fold(0i64, |acc, e| {
            e.weight.checked_mul(4).and_then(|w| acc.checked_add(w))
        })
        .map(|_| ())
        .ok_or(ValidationError::Overflow {
            what: "edge weights",
        })
}

struct TourSearch<'a> {
    graph: &'a Graph,
    rec: TraceRecorder,
    /// Cheapest edge `u -> v`, `None` when there is none.
    dist: Vec<Vec<Option<i64>>>,
    /// Cheapest edge leaving each vertex, 0 when there is none.
    cheapest: Vec<i64>,
    path: Vec<usize>,
    on_path: Vec<bool>,
    cost: i64,
    best: Vec<usize>,
    best_cost: Option<i64>,
}

impl<'a> TourSearch<'a> {
    fn new(graph: &'a Graph, source: usize) -> Self {
        let n = graph.vertex_count();
        let mut dist: Vec<Vec<Option<i64>>> = vec![vec![None; n]; n];
        let mut set = |a: usize, b: usize, w: i64| {
            if a != b && dist[a][b].map_or(true, |d| w < d) {
                dist[a][b] = Some(w);
            }
        };
        for edge in &graph.edges {
            set(edge.from, edge.to, edge.weight);
            if !graph.directed {
                set(edge.to, edge.from, edge.weight);
            }
        }
        let cheapest = dist
            .iter()
            .map(|row| row.iter().flatten().copied().min().unwrap_or(0))
            .collect();
        let mut on_path = vec![false; n];
        on_path[source] = true;
        TourSearch {
            graph,
            rec: TraceRecorder::new(AlgorithmId::TravellingSalesman),
            dist,
            cheapest,
            path: vec![source],
            on_path,
            cost: 0,
            best: Vec::new(),
            best_cost: None,
        }
    }

    fn current(&self) -> usize {
        self.path[self.path.len() - 1]
    }

    fn bound(&self) -> i64 {
        let open: i64 = (0..self.on_path.len())
            .filter(|&v| !self.on_path[v])
            .map(|v| self.cheapest[v])
            .sum();
        self.cost + self.cheapest[self.current()] + open
    }

    fn snapshot(&self) -> Snapshot {
        Snapshot::Tour {
            vertex_count: self.graph.vertex_count(),
            path: self.path.clone(),
            cost: self.cost,
            bound: self.bound(),
            best: self.best.clone(),
            best_cost: self.best_cost,
        }
    }

    fn labels(&self, path: &[usize]) -> String {
        path.iter()
            .map(|&v| self.graph.label(v))
            .collect::<Vec<_>>()
            .join(" -> ")
    }

    fn record(&mut self, kind: StepKind, refs: &[Ref], description: String) -> Result<(), TraceError> {
        let snapshot = self.snapshot();
        self.rec.record(kind, snapshot, refs, description)
    }

    /// Closes the tour back to the start vertex.
    fn close(&mut self) -> Result<(), TraceError> {
        let (start, last) = (self.path[0], self.current());
        let back = if self.path.len() == 1 {
            Some(0)
        } else {
            self.dist[last][start]
        };
        let Some(back) = back else {
            return self.record(
                StepKind::Reject,
                &[Ref::Vertex(last)],
                format!(
                    "no edge from {} back to {}",
                    self.graph.label(last),
                    self.graph.label(start)
                ),
            );
        };
        let total = self.cost + back;
        let tour = format!("{} -> {}", self.labels(&self.path), self.graph.label(start));
        match self.best_cost {
            Some(best) if total >= best => self.record(
                StepKind::Reject,
                &[Ref::Vertex(last), Ref::Vertex(start)],
                format!("tour {} costs {}, best is {}", tour, total, best),
            ),
            _ => {
                self.best = self.path.clone();
                self.best_cost = Some(total);
                self.record(
                    StepKind::Update,
                    &[Ref::Vertex(last), Ref::Vertex(start)],
                    format!("tour {} costs {}: new best", tour, total),
                )
            }
        }
    }

    fn explore(&mut self) -> Result<(), TraceError> {
        if self.path.len() == self.on_path.len() {
            return self.close();
        }
        let u = self.current();
        for v in 0..self.on_path.len() {
            if self.on_path[v] {
                continue;
            }
            let Some(w) = self.dist[u][v] else { continue };
            self.path.push(v);
            self.on_path[v] = true;
            self.cost += w;

            let bound = self.bound();
            let refs = [Ref::Vertex(u), Ref::Vertex(v)];
            match self.best_cost {
                Some(best) if bound >= best => {
                    let description = format!(
                        "prune {}: bound {} cannot beat {}",
                        self.labels(&self.path),
                        bound,
                        best
                    );
                    self.record(StepKind::Prune, &refs, description)?;
                }
                _ => {
                    let description = format!(
                        "extend to {}: cost {}, bound {}",
                        self.graph.label(v),
                        self.cost,
                        bound
                    );
                    self.record(StepKind::Visit, &refs, description)?;
                    self.explore()?;
                }
            }

            self.cost -= w;
            self.on_path[v] = false;
            self.path.pop();
        }
        Ok(())
    }
}

/// Cheapest closed tour from `source` visiting every vertex once.
pub fn travelling_salesman(graph: &Graph, source: usize) -> Result<Trace, TraceError> {
    check_tour(graph, source)?;
    let mut search = TourSearch::new(graph, source);

    let description = format!(
        "start at {}: bound {}",
        graph.label(source),
        search.bound()
    );
    search.record(StepKind::Visit, &[Ref::Vertex(source)], description)?;
    search.explore()?;

    let description = match search.best_cost {
        Some(cost) => format!(
            "best tour {} -> {} costs {}",
            search.labels(&search.best),
            graph.label(source),
            cost
        ),
        None => "no tour visits every vertex".to_string(),
    };
    search.record(StepKind::Done, &[], description)?;
    let TourSearch {
        rec,
        best,
        best_cost,
        ..
    } = search;
    rec.finish(Outcome::Tour {
        order: best,
        cost: best_cost,
    })
}
