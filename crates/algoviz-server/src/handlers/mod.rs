//! HTTP handler modules for the algoviz API.
//!
//! Handlers are thin: they parse the request, delegate to the trace
//! registry, the loader or a playback session, and return JSON.

pub mod algorithms;
pub mod health;
pub mod sessions;
