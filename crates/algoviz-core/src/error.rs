//! Error types for trace construction.
//!
//! Uses `thiserror` for structured, matchable variants. [`ValidationError`]
//! is a caller problem detected before any step is recorded;
//! [`InvalidStepError`] is an adapter defect detected while recording.

use thiserror::Error;

use crate::id::{AlgorithmId, Family};
use crate::input::InputKind;
use crate::step::{Ref, StepKind};

/// Malformed or precondition-violating input.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// The input variant does not match what the algorithm consumes.
    #[error("{algorithm} expects {expected} input, got {got}")]
    InputMismatch {
        algorithm: AlgorithmId,
        expected: InputKind,
        got: InputKind,
    },

    /// A collection that must be non-empty was empty.
    #[error("{what} must not be empty")]
    Empty { what: &'static str },

    /// The algorithm requires ascending input.
    #[error("array must be sorted ascending: values[{index}] is smaller than its predecessor")]
    Unsorted { index: usize },

    #[error("pattern must not be empty")]
    EmptyPattern,

    #[error("capacity must be non-negative, got {capacity}")]
    NegativeCapacity { capacity: i64 },

    #[error("item {item} must have a positive weight, got {weight}")]
    NonPositiveWeight { item: usize, weight: i64 },

    #[error("item {item} must have a non-negative value, got {value}")]
    NegativeValue { item: usize, value: i64 },

    #[error("edge {edge} has negative weight {weight}")]
    NegativeEdgeWeight { edge: usize, weight: i64 },

    #[error("vertex {vertex} out of range for graph with {count} vertices")]
    VertexOutOfRange { vertex: usize, count: usize },

    #[error("{algorithm} requires an undirected graph")]
    DirectedGraph { algorithm: AlgorithmId },

    #[error("{algorithm} requires a directed graph")]
    UndirectedGraph { algorithm: AlgorithmId },

    #[error("graph is not connected")]
    Disconnected,

    #[error("graph contains a cycle")]
    Cyclic,

    #[error("activity {activity} ends ({end}) before it starts ({start})")]
    InvalidInterval { activity: usize, start: i64, end: i64 },

    #[error("job {job} must have a deadline of at least 1, got {deadline}")]
    InvalidDeadline { job: usize, deadline: i64 },

    #[error("job {job} must have a non-negative profit, got {profit}")]
    NegativeProfit { job: usize, profit: i64 },

    #[error("array element {index} must be non-negative, got {value}")]
    NegativeElement { index: usize, value: i64 },

    #[error("dimension {index} must be positive, got {value}")]
    NonPositiveDimension { index: usize, value: i64 },

    #[error("symbol '{symbol}' must have a positive frequency, got {frequency}")]
    NonPositiveFrequency { symbol: char, frequency: i64 },

    #[error("symbol '{symbol}' appears more than once")]
    DuplicateSymbol { symbol: char },

    /// Text-based algorithms address characters by byte position.
    #[error("{what} must be ASCII")]
    NonAscii { what: &'static str },

    /// Some total the algorithm accumulates would not fit in an `i64`.
    #[error("{what} overflow a 64-bit total")]
    Overflow { what: &'static str },

    /// The input exceeds a size limit on the trace it would produce.
    #[error("{what} is {size}, limit is {limit}")]
    TooLarge {
        what: &'static str,
        size: usize,
        limit: usize,
    },
}

/// A step that does not satisfy the step model. Always an adapter defect.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InvalidStepError {
    #[error("step type '{kind}' is not declared by the {family} family")]
    UndeclaredKind { family: Family, kind: StepKind },

    #[error("'{kind}' step references {reference}, which is outside its snapshot")]
    RefOutOfRange { kind: StepKind, reference: Ref },
}

/// Any failure producing a [`crate::Trace`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TraceError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("invalid step {index}: {source}")]
    InvalidStep {
        index: usize,
        #[source]
        source: InvalidStepError,
    },

    #[error("trace contains no steps")]
    Empty,
}

impl TraceError {
    /// Returns the validation error, if this is a caller-side failure.
    pub fn as_validation(&self) -> Option<&ValidationError> {
        match self {
            TraceError::Validation(err) => Some(err),
            _ => None,
        }
    }
}
