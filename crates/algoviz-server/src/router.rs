//! Router assembly for the algoviz HTTP API.

use axum::routing::{get, post, put};
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::state::AppState;

/// Builds the complete axum router with all API routes.
///
/// Routes use axum 0.8 `/{param}` path syntax. CORS is permissive since
/// browser front-ends are served from other origins.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::health::health))
        // Catalogue and stateless generation
        .route("/algorithms", get(handlers::algorithms::list_algorithms))
        .route("/api/{algorithm}", post(handlers::algorithms::generate_steps))
        // Playback sessions
        .route(
            "/sessions",
            get(handlers::sessions::list_sessions).post(handlers::sessions::create_session),
        )
        .route(
            "/sessions/{id}",
            get(handlers::sessions::get_session).delete(handlers::sessions::delete_session),
        )
        .route("/sessions/{id}/play", post(handlers::sessions::play))
        .route("/sessions/{id}/pause", post(handlers::sessions::pause))
        .route("/sessions/{id}/resume", post(handlers::sessions::resume))
        .route("/sessions/{id}/reset", post(handlers::sessions::reset))
        .route("/sessions/{id}/speed", put(handlers::sessions::set_speed))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
