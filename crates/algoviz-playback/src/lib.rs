//! Trace playback.
//!
//! - [`controller`]: the synchronous Idle/Running/Paused/Completed state
//!   machine.
//! - [`session`]: a tokio task that drives a controller on a timer and
//!   publishes its state.
//! - [`loader`]: produces traces from a remote generator when configured,
//!   falling back to the local adapters on any remote failure.
//!
//! Trace generation always completes before a session starts; sessions
//! never run algorithm code.

pub mod config;
pub mod controller;
pub mod error;
pub mod loader;
pub mod remote;
pub mod session;

pub use config::PlaybackConfig;
pub use controller::{Operation, PlaybackController, PlaybackState, Status};
pub use error::{LoadError, PlaybackError, RemoteError};
pub use loader::{LoadedTrace, Origin, TraceLoader};
pub use remote::{RemoteClient, StepsPayload};
pub use session::{Frame, PlaybackSession};
