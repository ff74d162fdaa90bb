//! Validating step recorder.
//!
//! Adapters drive a [`TraceRecorder`] while they run. Each call to
//! [`TraceRecorder::record`] builds a [`Step`] through [`Step::new`], which
//! rejects undeclared tags and out-of-range refs on the spot.

use algoviz_core::{AlgorithmId, Family, Outcome, Ref, Refs, Snapshot, Step, StepKind, Trace, TraceError};

/// Accumulates the steps of one algorithm run.
#[derive(Debug)]
pub struct TraceRecorder {
    algorithm: AlgorithmId,
    family: Family,
    steps: Vec<Step>,
}

impl TraceRecorder {
    pub fn new(algorithm: AlgorithmId) -> Self {
        TraceRecorder {
            algorithm,
            family: algorithm.family(),
            steps: Vec::new(),
        }
    }

    pub fn algorithm(&self) -> AlgorithmId {
        self.algorithm
    }

    /// Records one step. Fails if the step violates the step model.
    pub fn record(
        &mut self,
        kind: StepKind,
        snapshot: Snapshot,
        refs: &[Ref],
        description: impl Into<String>,
    ) -> Result<(), TraceError> {
        let step = Step::new(
            self.family,
            kind,
            snapshot,
            Refs::from_slice(refs),
            description,
        )
        .map_err(|source| TraceError::InvalidStep {
            index: self.steps.len(),
            source,
        })?;
        self.steps.push(step);
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Seals the recording into an immutable [`Trace`].
    pub fn finish(self, outcome: Outcome) -> Result<Trace, TraceError> {
        tracing::debug!(
            algorithm = %self.algorithm,
            steps = self.steps.len(),
            "trace recorded"
        );
        Trace::from_parts(self.algorithm, self.steps, outcome)
    }
}
