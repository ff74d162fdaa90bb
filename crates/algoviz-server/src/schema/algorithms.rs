//! Schema types for the algorithm catalogue.

use algoviz_core::{AlgorithmId, Family, InputKind, StepKind};
use serde::Serialize;

/// One entry of `GET /algorithms`.
#[derive(Debug, Clone, Serialize)]
pub struct AlgorithmView {
    pub id: AlgorithmId,
    pub family: Family,
    /// The `kind` an input body must carry.
    pub input: InputKind,
    /// Step tags this algorithm may emit.
    pub steps: &'static [StepKind],
}

impl AlgorithmView {
    pub fn new(id: AlgorithmId) -> Self {
        AlgorithmView {
            id,
            family: id.family(),
            input: algoviz_trace::registry::expected_input(id),
            steps: id.family().kinds(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct AlgorithmListResponse {
    pub algorithms: Vec<AlgorithmView>,
}
