//! Playback controller finite-state machine.
//!
//! The controller owns a [`PlaybackState`] for a trace of fixed length and
//! nothing else: no timers, no trace data. Transitions are:
//!
//! ```text
//! Idle --play--> Running --pause--> Paused --resume--> Running
//!                Running --advance (last step)--> Completed
//! any  --reset--> Idle (position 0)
//! ```
//!
//! Anything else is a [`PlaybackError::InvalidTransition`]. Timing lives in
//! [`crate::session`], which calls [`PlaybackController::advance`] once per
//! interval.

use std::fmt;
use std::time::Duration;

use serde::{Serialize, Serializer};

use crate::error::PlaybackError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Status {
    Idle,
    Running,
    Paused,
    Completed,
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Status::Idle => "idle",
            Status::Running => "running",
            Status::Paused => "paused",
            Status::Completed => "completed",
        };
        f.write_str(name)
    }
}

/// A controller operation, for error reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Operation {
    Play,
    Pause,
    Resume,
    Advance,
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Operation::Play => "play",
            Operation::Pause => "pause",
            Operation::Resume => "resume",
            Operation::Advance => "advance",
        };
        f.write_str(name)
    }
}

fn as_millis<S: Serializer>(speed: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_u64(u64::try_from(speed.as_millis()).unwrap_or(u64::MAX))
}

/// Where playback is. `position` is always a valid index into the trace.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PlaybackState {
    pub position: usize,
    #[serde(rename = "speed_ms", serialize_with = "as_millis")]
    pub speed: Duration,
    pub status: Status,
}

#[derive(Debug, Clone)]
pub struct PlaybackController {
    len: usize,
    state: PlaybackState,
}

impl PlaybackController {
    /// Creates an idle controller at position 0 for a trace of `len` steps.
    ///
    /// Traces are never empty; `len` is clamped to at least 1.
    pub fn new(len: usize, speed: Duration) -> Result<Self, PlaybackError> {
        if speed.is_zero() {
            return Err(PlaybackError::InvalidSpeed);
        }
        Ok(PlaybackController {
            len: len.max(1),
            state: PlaybackState {
                position: 0,
                speed,
                status: Status::Idle,
            },
        })
    }

    pub fn state(&self) -> PlaybackState {
        self.state
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_running(&self) -> bool {
        self.state.status == Status::Running
    }

    fn last(&self) -> usize {
        self.len - 1
    }

    fn invalid(&self, operation: Operation) -> PlaybackError {
        PlaybackError::InvalidTransition {
            operation,
            status: self.state.status,
        }
    }

    fn start(&mut self) {
        // Nothing left to advance through: go straight to the end.
        self.state.status = if self.state.position >= self.last() {
            Status::Completed
        } else {
            Status::Running
        };
        tracing::debug!(
            position = self.state.position,
            status = %self.state.status,
            "playback started"
        );
    }

    /// Starts playback from `Idle` or `Paused`.
    pub fn play(&mut self) -> Result<PlaybackState, PlaybackError> {
        match self.state.status {
            Status::Idle | Status::Paused => {
                self.start();
                Ok(self.state)
            }
            _ => Err(self.invalid(Operation::Play)),
        }
    }

    /// Freezes playback at the current position. Only valid while running.
    pub fn pause(&mut self) -> Result<PlaybackState, PlaybackError> {
        if self.state.status != Status::Running {
            return Err(self.invalid(Operation::Pause));
        }
        self.state.status = Status::Paused;
        tracing::debug!(position = self.state.position, "playback paused");
        Ok(self.state)
    }

    /// Continues from `Paused`.
    pub fn resume(&mut self) -> Result<PlaybackState, PlaybackError> {
        if self.state.status != Status::Paused {
            return Err(self.invalid(Operation::Resume));
        }
        self.start();
        Ok(self.state)
    }

    /// Changes the tick interval. Position and status are untouched.
    pub fn set_speed(&mut self, speed: Duration) -> Result<PlaybackState, PlaybackError> {
        if speed.is_zero() {
            return Err(PlaybackError::InvalidSpeed);
        }
        self.state.speed = speed;
        Ok(self.state)
    }

    /// Moves to the next step. Reaching the last step completes playback.
    pub fn advance(&mut self) -> Result<PlaybackState, PlaybackError> {
        if self.state.status != Status::Running {
            return Err(self.invalid(Operation::Advance));
        }
        self.state.position += 1;
        if self.state.position >= self.last() {
            self.state.position = self.last();
            self.state.status = Status::Completed;
            tracing::debug!(position = self.state.position, "playback completed");
        }
        Ok(self.state)
    }

    /// Returns to `Idle` at position 0 from any state. Speed is kept.
    pub fn reset(&mut self) -> PlaybackState {
        self.state.position = 0;
        self.state.status = Status::Idle;
        self.state
    }
}
