//! Schema types for playback sessions.

use algoviz_core::{AlgorithmId, Input, Step};
use algoviz_playback::{Origin, PlaybackState};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Request to load a trace and open a playback session on it.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateSessionRequest {
    pub algorithm: AlgorithmId,
    pub input: Input,
    /// Tick interval; the server default when omitted.
    #[serde(default)]
    pub speed_ms: Option<u64>,
}

#[derive(Debug, Clone, Serialize)]
pub struct CreateSessionResponse {
    pub id: Uuid,
    pub algorithm: AlgorithmId,
    pub origin: Origin,
    pub total_steps: usize,
    pub state: PlaybackState,
}

/// A session's state together with the step at its position.
#[derive(Debug, Clone, Serialize)]
pub struct SessionView {
    pub id: Uuid,
    pub algorithm: AlgorithmId,
    pub total_steps: usize,
    pub state: PlaybackState,
    pub step: Step,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SpeedRequest {
    pub speed_ms: u64,
}

#[derive(Debug, Clone, Serialize)]
pub struct SessionListResponse {
    pub sessions: Vec<Uuid>,
}

#[derive(Debug, Clone, Serialize)]
pub struct DeleteSessionResponse {
    pub id: Uuid,
    pub deleted: bool,
}
