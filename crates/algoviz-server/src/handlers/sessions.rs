//! Playback session handlers.

use std::sync::Arc;
use std::time::Duration;

use algoviz_playback::{PlaybackError, PlaybackSession, PlaybackState};
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use uuid::Uuid;

use crate::error::ApiError;
use crate::schema::sessions::{
    CreateSessionRequest, CreateSessionResponse, DeleteSessionResponse, SessionListResponse,
    SessionView, SpeedRequest,
};
use crate::state::AppState;

fn view(id: Uuid, session: &PlaybackSession, state: PlaybackState) -> SessionView {
    let trace = session.trace();
    SessionView {
        id,
        algorithm: trace.algorithm(),
        total_steps: trace.len(),
        state,
        step: trace.get(state.position).unwrap_or_else(|| trace.last()).clone(),
    }
}

fn speed(ms: u64) -> Result<Duration, ApiError> {
    if ms == 0 {
        return Err(PlaybackError::InvalidSpeed.into());
    }
    Ok(Duration::from_millis(ms))
}

/// `POST /sessions`
pub async fn create_session(
    State(state): State<AppState>,
    Json(req): Json<CreateSessionRequest>,
) -> Result<(StatusCode, Json<CreateSessionResponse>), ApiError> {
    let speed = match req.speed_ms {
        Some(ms) => speed(ms)?,
        None => state.config.playback.default_speed,
    };
    state.ensure_capacity()?;

    let loaded = state.loader.load(req.algorithm, &req.input).await?;
    let total_steps = loaded.trace.len();
    let session = PlaybackSession::spawn(Arc::new(loaded.trace), speed)?;
    let playback = session.state();

    let id = state.insert_session(session)?;
    tracing::info!(%id, algorithm = %req.algorithm, origin = ?loaded.origin, total_steps, "session created");

    Ok((
        StatusCode::CREATED,
        Json(CreateSessionResponse {
            id,
            algorithm: req.algorithm,
            origin: loaded.origin,
            total_steps,
            state: playback,
        }),
    ))
}

/// `GET /sessions`
pub async fn list_sessions(State(state): State<AppState>) -> Json<SessionListResponse> {
    let mut sessions: Vec<Uuid> = state.sessions.iter().map(|entry| *entry.key()).collect();
    sessions.sort();
    Json(SessionListResponse { sessions })
}

/// `GET /sessions/{id}`
pub async fn get_session(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<SessionView>, ApiError> {
    let session = state.session(id)?;
    Ok(Json(view(id, &session, session.state())))
}

/// `POST /sessions/{id}/play`
pub async fn play(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<SessionView>, ApiError> {
    let session = state.session(id)?;
    let playback = session.play().await?;
    Ok(Json(view(id, &session, playback)))
}

/// `POST /sessions/{id}/pause`
pub async fn pause(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<SessionView>, ApiError> {
    let session = state.session(id)?;
    let playback = session.pause().await?;
    Ok(Json(view(id, &session, playback)))
}

/// `POST /sessions/{id}/resume`
pub async fn resume(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<SessionView>, ApiError> {
    let session = state.session(id)?;
    let playback = session.resume().await?;
    Ok(Json(view(id, &session, playback)))
}

/// `POST /sessions/{id}/reset`
pub async fn reset(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<SessionView>, ApiError> {
    let session = state.session(id)?;
    let playback = session.reset().await?;
    Ok(Json(view(id, &session, playback)))
}

/// `PUT /sessions/{id}/speed`
pub async fn set_speed(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<SpeedRequest>,
) -> Result<Json<SessionView>, ApiError> {
    let session = state.session(id)?;
    let playback = session.set_speed(speed(req.speed_ms)?).await?;
    Ok(Json(view(id, &session, playback)))
}

/// `DELETE /sessions/{id}`
///
/// Removing the last handle stops the session's timer. Sessions that no
/// request touches within the configured TTL are removed the same way.
pub async fn delete_session(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<DeleteSessionResponse>, ApiError> {
    state
        .sessions
        .remove(&id)
        .ok_or_else(|| ApiError::NotFound(format!("session {} not found", id)))?;
    tracing::info!(%id, "session deleted");
    Ok(Json(DeleteSessionResponse { id, deleted: true }))
}
