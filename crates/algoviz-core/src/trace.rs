//! Immutable, ordered step sequences.
//!
//! A [`Trace`] is built once (by the recorder or from a validated remote
//! payload) and never mutated afterwards. Its fields are private; readers get
//! shared slices only.
//!
//! # Determinism
//!
//! [`Trace::fingerprint`] hashes the canonical JSON encoding with blake3. No
//! trace field is a `HashMap`, so the encoding, and therefore the hash, is
//! stable for equal traces.

use serde::{Deserialize, Serialize};

use crate::error::TraceError;
use crate::id::AlgorithmId;
use crate::step::Step;

/// Summary of what the run computed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Outcome {
    Sorted {
        values: Vec<i64>,
    },
    Search {
        index: Option<usize>,
    },
    Traversal {
        order: Vec<usize>,
    },
    Distances {
        dist: Vec<Option<i64>>,
        #[serde(default)]
        negative_cycle: bool,
    },
    AllPairs {
        dist: Vec<Vec<Option<i64>>>,
    },
    SpanningTree {
        edges: Vec<usize>,
        weight: i64,
    },
    Knapsack {
        value: i64,
        items: Vec<usize>,
    },
    Fractional {
        value: f64,
        /// `(item, fraction taken)` in the order taken.
        items: Vec<(usize, f64)>,
    },
    Schedule {
        selected: Vec<usize>,
        profit: i64,
    },
    Subsequence {
        length: usize,
        sequence: String,
    },
    Matches {
        positions: Vec<usize>,
    },
    /// Strongly connected components in discovery order.
    Components {
        components: Vec<Vec<usize>>,
    },
    Parenthesization {
        cost: i64,
        order: String,
    },
    /// Prefix codes per input symbol and the total encoded length in bits.
    Codes {
        codes: Vec<String>,
        bits: i64,
    },
    /// Cheapest closed tour from the start vertex; empty with no cost when
    /// no tour exists.
    Tour {
        order: Vec<usize>,
        cost: Option<i64>,
    },
}

impl Outcome {
    /// Whether a search or match succeeded. `None` for outcomes where the
    /// question does not apply.
    pub fn found(&self) -> Option<bool> {
        match self {
            Outcome::Search { index } => Some(index.is_some()),
            Outcome::Matches { positions } => Some(!positions.is_empty()),
            _ => None,
        }
    }
}

/// The complete step sequence for one algorithm run on one input.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Trace {
    algorithm: AlgorithmId,
    steps: Vec<Step>,
    outcome: Outcome,
}

impl Trace {
    /// Assembles a trace, validating every step against the algorithm's
    /// family. Used for steps that did not come from the local recorder.
    pub fn from_parts(
        algorithm: AlgorithmId,
        steps: Vec<Step>,
        outcome: Outcome,
    ) -> Result<Self, TraceError> {
        if steps.is_empty() {
            return Err(TraceError::Empty);
        }
        let family = algorithm.family();
        for (index, step) in steps.iter().enumerate() {
            step.validate(family)
                .map_err(|source| TraceError::InvalidStep { index, source })?;
        }
        Ok(Trace {
            algorithm,
            steps,
            outcome,
        })
    }

    pub fn algorithm(&self) -> AlgorithmId {
        self.algorithm
    }

    pub fn steps(&self) -> &[Step] {
        &self.steps
    }

    pub fn outcome(&self) -> &Outcome {
        &self.outcome
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    /// Always false for a constructed trace.
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// The step shown at `position`.
    pub fn get(&self, position: usize) -> Option<&Step> {
        self.steps.get(position)
    }

    pub fn last(&self) -> &Step {
        // Construction guarantees at least one step.
        &self.steps[self.steps.len() - 1]
    }

    /// blake3 hash of the canonical JSON encoding.
    pub fn fingerprint(&self) -> blake3::Hash {
        let mut hasher = blake3::Hasher::new();
        // Serializing plain structs, vecs and strings cannot fail; on the
        // impossible error path the hash covers whatever was written.
        let _ = serde_json::to_writer(HashWriter(&mut hasher), self);
        hasher.finalize()
    }

    /// Consumes the trace, returning its steps and outcome.
    pub fn into_parts(self) -> (Vec<Step>, Outcome) {
        (self.steps, self.outcome)
    }
}

struct HashWriter<'a>(&'a mut blake3::Hasher);

impl std::io::Write for HashWriter<'_> {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.0.update(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}
