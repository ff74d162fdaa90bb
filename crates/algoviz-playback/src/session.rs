//! Timer-driven playback of one trace.
//!
//! A [`PlaybackSession`] spawns a tokio task that exclusively owns a
//! [`PlaybackController`]. Callers send commands over an mpsc channel and
//! get the resulting state back on a oneshot. The task waits on whichever
//! comes first, the next command or the next tick deadline, with commands
//! polled first so a pause that arrives at the same instant as a tick
//! always wins.
//!
//! Presenters observe through a `watch` channel (latest state) and a
//! `broadcast` channel (one [`Frame`] per advance). Neither lets them change
//! the position.

use std::sync::Arc;
use std::time::Duration;

use algoviz_core::{Step, Trace};
use serde::Serialize;
use tokio::sync::{broadcast, mpsc, oneshot, watch};
use tokio::task::JoinHandle;
use tokio::time::{sleep_until, Instant};

use crate::controller::{PlaybackController, PlaybackState, Status};
use crate::error::PlaybackError;

const COMMAND_BUFFER: usize = 16;
const FRAME_BUFFER: usize = 256;

/// Emitted every time playback advances.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Frame {
    pub position: usize,
    pub status: Status,
}

#[derive(Debug)]
enum Command {
    Play,
    Pause,
    Resume,
    Reset,
    SetSpeed(Duration),
}

type Reply = oneshot::Sender<Result<PlaybackState, PlaybackError>>;

/// Handle to a running playback task. Dropping it stops the task.
#[derive(Debug)]
pub struct PlaybackSession {
    trace: Arc<Trace>,
    commands: mpsc::Sender<(Command, Reply)>,
    state: watch::Receiver<PlaybackState>,
    frames: broadcast::Sender<Frame>,
    task: JoinHandle<()>,
}

impl PlaybackSession {
    /// Starts an idle session. Must be called from within a tokio runtime.
    pub fn spawn(trace: Arc<Trace>, speed: Duration) -> Result<Self, PlaybackError> {
        let controller = PlaybackController::new(trace.len(), speed)?;
        let (command_tx, command_rx) = mpsc::channel(COMMAND_BUFFER);
        let (state_tx, state_rx) = watch::channel(controller.state());
        let (frame_tx, _) = broadcast::channel(FRAME_BUFFER);

        let task = tokio::spawn(run(controller, command_rx, state_tx, frame_tx.clone()));
        tracing::debug!(
            algorithm = %trace.algorithm(),
            steps = trace.len(),
            speed_ms = speed.as_millis() as u64,
            "playback session started"
        );

        Ok(PlaybackSession {
            trace,
            commands: command_tx,
            state: state_rx,
            frames: frame_tx,
            task,
        })
    }

    pub fn trace(&self) -> &Arc<Trace> {
        &self.trace
    }

    /// The latest published state.
    pub fn state(&self) -> PlaybackState {
        *self.state.borrow()
    }

    /// The step to render right now: `trace[position]`.
    pub fn current_step(&self) -> &Step {
        let position = self.state().position;
        self.trace.get(position).unwrap_or_else(|| self.trace.last())
    }

    /// A read-only view of the state that updates on every change.
    pub fn watch(&self) -> watch::Receiver<PlaybackState> {
        self.state.clone()
    }

    /// Subscribes to advance notifications from now on.
    pub fn frames(&self) -> broadcast::Receiver<Frame> {
        self.frames.subscribe()
    }

    pub async fn play(&self) -> Result<PlaybackState, PlaybackError> {
        self.send(Command::Play).await
    }

    pub async fn pause(&self) -> Result<PlaybackState, PlaybackError> {
        self.send(Command::Pause).await
    }

    pub async fn resume(&self) -> Result<PlaybackState, PlaybackError> {
        self.send(Command::Resume).await
    }

    pub async fn reset(&self) -> Result<PlaybackState, PlaybackError> {
        self.send(Command::Reset).await
    }

    pub async fn set_speed(&self, speed: Duration) -> Result<PlaybackState, PlaybackError> {
        self.send(Command::SetSpeed(speed)).await
    }

    /// Waits until playback reaches `Completed`.
    pub async fn completed(&self) -> Result<PlaybackState, PlaybackError> {
        let mut state = self.state.clone();
        let done = state
            .wait_for(|s| s.status == Status::Completed)
            .await
            .map_err(|_| PlaybackError::SessionClosed)?;
        Ok(*done)
    }

    /// Stops the task. No tick fires afterwards.
    pub fn shutdown(self) {
        tracing::debug!(algorithm = %self.trace.algorithm(), "playback session shut down");
        // Drop aborts the task.
    }

    async fn send(&self, command: Command) -> Result<PlaybackState, PlaybackError> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.commands
            .send((command, reply_tx))
            .await
            .map_err(|_| PlaybackError::SessionClosed)?;
        reply_rx.await.map_err(|_| PlaybackError::SessionClosed)?
    }
}

impl Drop for PlaybackSession {
    fn drop(&mut self) {
        self.task.abort();
    }
}

async fn run(
    mut controller: PlaybackController,
    mut commands: mpsc::Receiver<(Command, Reply)>,
    state: watch::Sender<PlaybackState>,
    frames: broadcast::Sender<Frame>,
) {
    // Start of the current tick interval; `None` while not running.
    let mut interval_start: Option<Instant> = None;

    loop {
        let deadline = interval_start.map(|start| start + controller.state().speed);
        tokio::select! {
            biased;

            received = commands.recv() => {
                let Some((command, reply)) = received else {
                    break;
                };
                let result = apply(&mut controller, command, &mut interval_start);
                state.send_replace(controller.state());
                // The caller may have stopped waiting.
                let _ = reply.send(result);
            }

            _ = sleep_until(deadline.unwrap_or_else(Instant::now)), if deadline.is_some() => {
                match controller.advance() {
                    Ok(next) => {
                        // Anchor to the deadline, not to wake-up time, so ticks
                        // do not drift.
                        interval_start = if next.status == Status::Running { deadline } else { None };
                        state.send_replace(next);
                        let _ = frames.send(Frame {
                            position: next.position,
                            status: next.status,
                        });
                    }
                    Err(err) => {
                        tracing::warn!(error = %err, "tick without running playback");
                        interval_start = None;
                    }
                }
            }
        }
    }
}

fn apply(
    controller: &mut PlaybackController,
    command: Command,
    interval_start: &mut Option<Instant>,
) -> Result<PlaybackState, PlaybackError> {
    let result = match command {
        Command::Play => controller.play(),
        Command::Resume => controller.resume(),
        Command::Pause => controller.pause(),
        Command::Reset => Ok(controller.reset()),
        // The pending deadline follows from `interval_start`, so the next
        // tick lands one new interval after the current one began.
        Command::SetSpeed(speed) => return controller.set_speed(speed),
    };
    if result.is_ok() {
        *interval_start = controller.is_running().then(Instant::now);
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use algoviz_core::{AlgorithmId, Input};

    const SPEED: Duration = Duration::from_millis(100);

    fn trace(len: usize) -> Arc<Trace> {
        // Bubble sort on an already sorted array records n - 1 compares
        // plus the done step.
        let values: Vec<i64> = (0..len as i64).collect();
        let trace = algoviz_trace::generate(AlgorithmId::BubbleSort, &Input::Array { values }).unwrap();
        Arc::new(trace)
    }

    #[tokio::test(start_paused = true)]
    async fn ticks_once_per_interval() {
        let session = PlaybackSession::spawn(trace(5), SPEED).unwrap();
        session.play().await.unwrap();
        tokio::time::sleep(SPEED * 2 + SPEED / 2).await;
        assert_eq!(session.state().position, 2);
        assert_eq!(session.state().status, Status::Running);
    }

    #[tokio::test(start_paused = true)]
    async fn pause_freezes_position() {
        let session = PlaybackSession::spawn(trace(6), SPEED).unwrap();
        session.play().await.unwrap();
        tokio::time::sleep(SPEED + SPEED / 2).await;
        let paused = session.pause().await.unwrap();
        assert_eq!(paused.position, 1);
        tokio::time::sleep(SPEED * 10).await;
        assert_eq!(session.state().position, 1);
        assert_eq!(session.state().status, Status::Paused);
    }

    #[tokio::test(start_paused = true)]
    async fn speed_change_reanchors_pending_tick() {
        let session = PlaybackSession::spawn(trace(6), SPEED).unwrap();
        session.play().await.unwrap();
        tokio::time::sleep(Duration::from_millis(30)).await;
        session.set_speed(Duration::from_millis(50)).await.unwrap();
        // The interval began at 0 ms, so the next tick is due at 50 ms.
        tokio::time::sleep(Duration::from_millis(25)).await;
        assert_eq!(session.state().position, 1);
    }

    #[tokio::test(start_paused = true)]
    async fn reset_cancels_pending_tick() {
        let session = PlaybackSession::spawn(trace(6), SPEED).unwrap();
        session.play().await.unwrap();
        tokio::time::sleep(SPEED + SPEED / 2).await;
        let state = session.reset().await.unwrap();
        assert_eq!((state.position, state.status), (0, Status::Idle));
        tokio::time::sleep(SPEED * 5).await;
        assert_eq!(session.state().position, 0);
    }

    #[tokio::test(start_paused = true)]
    async fn misuse_is_reported_through_the_session() {
        let session = PlaybackSession::spawn(trace(3), SPEED).unwrap();
        assert!(matches!(
            session.pause().await,
            Err(PlaybackError::InvalidTransition { .. })
        ));
        assert_eq!(
            session.set_speed(Duration::ZERO).await.unwrap_err(),
            PlaybackError::InvalidSpeed
        );
    }

    #[tokio::test(start_paused = true)]
    async fn dropping_the_session_stops_the_task() {
        let session = PlaybackSession::spawn(trace(4), SPEED).unwrap();
        session.play().await.unwrap();
        let mut state = session.watch();
        state.borrow_and_update();
        drop(session);
        // The task owned the only sender; once aborted the channel closes
        // without another tick.
        assert!(state.changed().await.is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn completed_resolves_at_the_last_step() {
        let session = PlaybackSession::spawn(trace(4), SPEED).unwrap();
        session.play().await.unwrap();
        let done = session.completed().await.unwrap();
        assert_eq!(done.position, 3);
        assert_eq!(session.current_step(), session.trace().last());
    }
}
