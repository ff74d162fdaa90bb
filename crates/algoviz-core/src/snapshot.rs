//! Data-structure state captured with each step.

use serde::{Deserialize, Serialize};

use crate::step::Ref;

/// The state needed to render one frame. Each shape defines which [`Ref`]
/// variants address into it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "shape", rename_all = "snake_case")]
pub enum Snapshot {
    /// Array contents (sorting and searching).
    Array { values: Vec<i64> },
    /// Counting-based sorts: the array, its bucket counts and the output
    /// array being filled.
    Buckets {
        values: Vec<i64>,
        counts: Vec<usize>,
        output: Vec<Option<i64>>,
    },
    /// Traversal, shortest-path and spanning-tree state.
    Graph {
        vertex_count: usize,
        edge_count: usize,
        /// Queue, stack or priority frontier, front first.
        frontier: Vec<usize>,
        /// Vertices in the order they were visited/settled.
        visited: Vec<usize>,
        /// Tentative distances; empty for unweighted traversals.
        distances: Vec<Option<i64>>,
        /// Edge indices accepted into a tree so far.
        tree: Vec<usize>,
    },
    /// A 2-D table. `None` is infinity or a cell not yet filled.
    Matrix { cells: Vec<Vec<Option<i64>>> },
    /// Greedy selection state.
    Selection {
        /// Item indices in the order the greedy rule considers them.
        order: Vec<usize>,
        /// Items taken whole (or accepted), in acceptance order.
        chosen: Vec<usize>,
        /// An item taken fractionally and the fraction taken.
        partial: Option<(usize, f64)>,
        /// Job-scheduling time slots and the job occupying each.
        slots: Vec<Option<usize>>,
        total: f64,
    },
    /// String-matching state for the current alignment.
    Text {
        text: String,
        pattern: String,
        /// Alignment of `pattern[0]` within `text`.
        offset: usize,
        pattern_hash: Option<u64>,
        window_hash: Option<u64>,
        matches: Vec<usize>,
    },
    /// Huffman forest. Nodes `0..n` are the input symbols; merged nodes
    /// follow in creation order.
    Forest {
        weights: Vec<i64>,
        /// Roots still in the priority queue, lightest first.
        queue: Vec<usize>,
        parents: Vec<Option<usize>>,
    },
    /// Branch-and-bound tour search.
    Tour {
        vertex_count: usize,
        /// Partial tour from the start vertex.
        path: Vec<usize>,
        cost: i64,
        bound: i64,
        best: Vec<usize>,
        best_cost: Option<i64>,
    },
}

impl Snapshot {
    /// Returns true if `r` addresses an element of this snapshot.
    pub fn admits(&self, r: &Ref) -> bool {
        match (self, r) {
            (Snapshot::Array { values }, Ref::Slot(i)) => *i < values.len(),
            (Snapshot::Graph { vertex_count, .. }, Ref::Vertex(v)) => v < vertex_count,
            (Snapshot::Graph { edge_count, .. }, Ref::Edge(e)) => e < edge_count,
            (Snapshot::Matrix { cells }, Ref::Cell { row, col }) => {
                cells.get(*row).is_some_and(|r| *col < r.len())
            }
            (Snapshot::Selection { order, .. }, Ref::Item(i)) => *i < order.len(),
            (Snapshot::Selection { slots, .. }, Ref::Slot(i)) => *i < slots.len(),
            (Snapshot::Text { text, .. }, Ref::Text(i)) => *i < text.len(),
            (Snapshot::Text { pattern, .. }, Ref::Pattern(j)) => *j < pattern.len(),
            (Snapshot::Buckets { values, .. }, Ref::Slot(i)) => *i < values.len(),
            (Snapshot::Buckets { counts, .. }, Ref::Bucket(b)) => *b < counts.len(),
            (Snapshot::Forest { weights, .. }, Ref::Item(i)) => *i < weights.len(),
            (Snapshot::Tour { vertex_count, .. }, Ref::Vertex(v)) => v < vertex_count,
            _ => false,
        }
    }

    /// Array contents, if this is an array or bucket snapshot.
    pub fn values(&self) -> Option<&[i64]> {
        match self {
            Snapshot::Array { values } | Snapshot::Buckets { values, .. } => Some(values),
            _ => None,
        }
    }
}
