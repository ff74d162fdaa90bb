//! Shared application state.

use std::sync::Arc;

use algoviz_playback::{PlaybackSession, TraceLoader};
use dashmap::DashMap;
use tokio::task::JoinHandle;
use tokio::time::Instant;
use uuid::Uuid;

use crate::config::ServerConfig;
use crate::error::ApiError;

/// A live session and the last time a request reached it.
pub struct SessionEntry {
    pub session: Arc<PlaybackSession>,
    pub touched: Instant,
}

/// Shared state for all handlers.
///
/// Sessions are independent: each owns its trace and its playback task, so
/// the map is the only shared structure. Handlers clone the `Arc` out of
/// the map before awaiting on a session.
#[derive(Clone)]
pub struct AppState {
    pub sessions: Arc<DashMap<Uuid, SessionEntry>>,
    pub loader: Arc<TraceLoader>,
    pub config: Arc<ServerConfig>,
}

impl AppState {
    pub fn new(config: ServerConfig) -> Result<Self, ApiError> {
        let loader = TraceLoader::from_config(&config.playback)
            .map_err(|err| ApiError::InternalError(format!("remote client setup failed: {}", err)))?;
        if let Some(url) = &config.playback.remote_url {
            tracing::info!(remote = %url, "sessions prefer remote step generation");
        }
        Ok(Self::with_loader(config, loader))
    }

    /// State with default configuration and no remote generator.
    pub fn local() -> Self {
        Self::with_loader(ServerConfig::default(), TraceLoader::local())
    }

    pub fn with_loader(config: ServerConfig, loader: TraceLoader) -> Self {
        AppState {
            sessions: Arc::new(DashMap::new()),
            loader: Arc::new(loader),
            config: Arc::new(config),
        }
    }

    /// Looks up a session and marks it as used.
    pub fn session(&self, id: Uuid) -> Result<Arc<PlaybackSession>, ApiError> {
        self.sessions
            .get_mut(&id)
            .map(|mut entry| {
                entry.touched = Instant::now();
                Arc::clone(&entry.session)
            })
            .ok_or_else(|| ApiError::NotFound(format!("session {} not found", id)))
    }

    /// Fails when the session limit is reached, after dropping expired
    /// sessions to make room.
    pub fn ensure_capacity(&self) -> Result<(), ApiError> {
        let limit = self.config.max_sessions;
        if self.sessions.len() < limit {
            return Ok(());
        }
        self.reap_expired();
        if self.sessions.len() < limit {
            return Ok(());
        }
        tracing::warn!(limit, "session limit reached");
        Err(ApiError::Unavailable(format!(
            "session limit of {} reached",
            limit
        )))
    }

    pub fn insert_session(&self, session: PlaybackSession) -> Result<Uuid, ApiError> {
        self.ensure_capacity()?;
        let id = Uuid::new_v4();
        self.sessions.insert(
            id,
            SessionEntry {
                session: Arc::new(session),
                touched: Instant::now(),
            },
        );
        Ok(id)
    }

    /// Drops sessions idle for longer than the configured TTL and returns
    /// how many went.
    pub fn reap_expired(&self) -> usize {
        let ttl = self.config.session_ttl;
        let now = Instant::now();
        let before = self.sessions.len();
        self.sessions.retain(|id, entry| {
            let live = now.duration_since(entry.touched) < ttl;
            if !live {
                tracing::info!(%id, "session expired");
            }
            live
        });
        before.saturating_sub(self.sessions.len())
    }

    /// Sweeps expired sessions in the background until the runtime stops.
    pub fn spawn_reaper(&self) -> JoinHandle<()> {
        let state = self.clone();
        let period = self.config.reap_interval();
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(period);
            ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
            loop {
                ticker.tick().await;
                let reaped = state.reap_expired();
                if reaped > 0 {
                    tracing::debug!(reaped, live = state.sessions.len(), "reaped idle sessions");
                }
            }
        })
    }
}
