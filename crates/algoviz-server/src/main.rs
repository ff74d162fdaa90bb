//! Binary entrypoint for the algoviz HTTP server.
//!
//! Configuration comes from environment variables, see
//! [`algoviz_server::config::ServerConfig`] and
//! [`algoviz_playback::PlaybackConfig`].

use algoviz_server::config::ServerConfig;
use algoviz_server::router::build_router;
use algoviz_server::state::AppState;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt::init();

    let config = ServerConfig::from_env();
    let addr = format!("0.0.0.0:{}", config.port);
    tracing::info!(
        max_sessions = config.max_sessions,
        ttl_secs = config.session_ttl.as_secs(),
        "session limits"
    );
    let state = AppState::new(config)?;
    state.spawn_reaper();

    let app = build_router(state);

    tracing::info!("algoviz server starting on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}
