//! HTTP/JSON API for algorithm traces and server-side playback sessions.
//!
//! Serves the step-generation contract (`POST /api/{algorithm}`) that
//! [`algoviz_playback::RemoteClient`] consumes, and lets clients drive
//! playback sessions that live on the server.

pub mod config;
pub mod error;
pub mod handlers;
pub mod router;
pub mod schema;
pub mod state;
