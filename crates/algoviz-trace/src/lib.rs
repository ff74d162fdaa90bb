//! Trace generation: a validating recorder plus one adapter per algorithm.
//!
//! # Architecture
//!
//! - [`TraceRecorder`] accumulates steps for one run. Every step is checked
//!   against the algorithm's family as it is recorded, so an adapter defect
//!   fails the run immediately instead of surfacing during playback.
//! - [`adapters`] holds the per-family generators. Each validates its input
//!   before recording anything and always ends with a terminal step.
//! - [`generate`] selects the adapter for an [`AlgorithmId`].
//!
//! Generation is pure and synchronous: no timers, no I/O, no randomness. The
//! same input always yields the same trace.
//!
//! # Usage
//!
//! ```
//! use algoviz_core::{AlgorithmId, Input, Outcome};
//!
//! let input = Input::Array { values: vec![3, 1, 2] };
//! let trace = algoviz_trace::generate(AlgorithmId::BubbleSort, &input).unwrap();
//! assert_eq!(trace.outcome(), &Outcome::Sorted { values: vec![1, 2, 3] });
//! ```
//!
//! [`AlgorithmId`]: algoviz_core::AlgorithmId

pub mod adapters;
pub mod recorder;
pub mod registry;

pub use recorder::TraceRecorder;
pub use registry::{generate, validate};
