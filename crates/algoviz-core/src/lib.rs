//! Data model shared by trace generation, playback and the HTTP service.
//!
//! A [`Trace`] is the complete, ordered and immutable list of [`Step`]s that
//! one algorithm run produced for one [`Input`]. Every step carries a
//! [`StepKind`] from the closed tag set of its algorithm's [`Family`], a
//! [`Snapshot`] of the data structure, the [`Ref`]s it touches and a
//! human-readable description.

pub mod error;
pub mod id;
pub mod input;
pub mod snapshot;
pub mod step;
pub mod trace;

// Re-export commonly used types
pub use error::{InvalidStepError, TraceError, ValidationError};
pub use id::{AlgorithmId, Family, UnknownAlgorithm};
pub use input::{
    random_array, Activity, Edge, Graph, GraphBuilder, Input, InputKind, Item, Job, Symbol,
};
pub use snapshot::Snapshot;
pub use step::{Ref, Refs, Step, StepKind};
pub use trace::{Outcome, Trace};
