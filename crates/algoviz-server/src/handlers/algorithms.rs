//! Algorithm catalogue and stateless step generation.

use algoviz_core::{AlgorithmId, Input};
use algoviz_playback::StepsPayload;
use axum::extract::Path;
use axum::Json;

use crate::error::ApiError;
use crate::schema::algorithms::{AlgorithmListResponse, AlgorithmView};

/// `GET /algorithms`
pub async fn list_algorithms() -> Json<AlgorithmListResponse> {
    let algorithms = AlgorithmId::ALL.into_iter().map(AlgorithmView::new).collect();
    Json(AlgorithmListResponse { algorithms })
}

/// `POST /api/{algorithm}`
///
/// The step-generation contract consumed by remote-first loaders: the body
/// is an input, the answer is the full trace.
pub async fn generate_steps(
    Path(algorithm): Path<String>,
    Json(input): Json<Input>,
) -> Result<Json<StepsPayload>, ApiError> {
    let algorithm: AlgorithmId = algorithm.parse()?;
    let trace = algoviz_trace::generate(algorithm, &input)?;
    tracing::debug!(%algorithm, steps = trace.len(), "generated steps");
    Ok(Json(StepsPayload::from_trace(&trace)))
}
