//! The playback state machine.
//!
//! ```text
//! Idle ──start──▶ Running ──last step played──▶ Completed
//!                    │
//!                    └──────stop──────▶ Stopped
//! ```
//!
//! `Completed` and `Stopped` are resting states: like `Idle`, they accept a
//! new `start`. The driver does not perform step side effects itself;
//! [`PlaybackDriver::tick`] hands the step to play back to the caller.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use crate::signal::{Sequence, Step};

use super::timer::{CancelToken, RunId, Scheduler};

/// Interval between steps when none (or an invalid one) is configured.
pub const DEFAULT_SPEED: Duration = Duration::from_millis(150);

/// Playback state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum PlaybackState {
    /// No run has been started.
    #[default]
    Idle,
    /// Steps are being played.
    Running,
    /// Every step was played.
    Completed,
    /// The run was stopped before its end.
    Stopped,
}

impl PlaybackState {
    /// Returns true while a run is in progress.
    pub const fn is_running(self) -> bool {
        matches!(self, PlaybackState::Running)
    }
}

impl core::fmt::Display for PlaybackState {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            PlaybackState::Idle => write!(f, "idle"),
            PlaybackState::Running => write!(f, "running"),
            PlaybackState::Completed => write!(f, "completed"),
            PlaybackState::Stopped => write!(f, "stopped"),
        }
    }
}

/// Handle to a started run.
///
/// The stop flag may be raised from any thread; it is observed once per
/// tick on the thread that drives playback.
#[derive(Debug, Clone)]
pub struct RunHandle {
    id: RunId,
    stop_flag: Arc<AtomicBool>,
}

impl RunHandle {
    fn new(id: RunId) -> Self {
        Self {
            id,
            stop_flag: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Run identifier.
    pub fn id(&self) -> RunId {
        self.id
    }

    /// Ask the run to stop at its next tick.
    pub fn request_stop(&self) {
        self.stop_flag.store(true, Ordering::SeqCst);
    }

    /// Check if a stop was requested.
    pub fn is_stop_requested(&self) -> bool {
        self.stop_flag.load(Ordering::SeqCst)
    }
}

/// What a timer tick asks the caller to do.
#[derive(Debug, PartialEq, Eq)]
pub enum Tick<'a> {
    /// Play `step`, the `index`-th (0-based) of the sequence.
    Step {
        /// Position in the sequence
        index: usize,
        /// The step to play
        step: &'a Step,
    },
    /// The run reached its end.
    Completed,
    /// The run observed a stop request.
    Stopped,
    /// The tick belongs to a run that is no longer active.
    Stale,
}

/// Steps through a sequence, one step per timer tick.
#[derive(Debug)]
pub struct PlaybackDriver {
    state: PlaybackState,
    sequence: Option<Sequence>,
    index: usize,
    run: Option<RunHandle>,
    token: Option<CancelToken>,
    next_run: u64,
    speed: Duration,
}

impl PlaybackDriver {
    /// Create an idle driver ticking every `speed`.
    pub fn new(speed: Duration) -> Self {
        Self {
            state: PlaybackState::Idle,
            sequence: None,
            index: 0,
            run: None,
            token: None,
            next_run: 1,
            speed: normalize_speed(speed),
        }
    }

    /// Current state.
    pub fn state(&self) -> PlaybackState {
        self.state
    }

    /// Number of steps played in the current run.
    pub fn position(&self) -> usize {
        self.index
    }

    /// Sequence of the current (or last) run.
    pub fn sequence(&self) -> Option<&Sequence> {
        self.sequence.as_ref()
    }

    /// Handle of the current (or last) run.
    pub fn run(&self) -> Option<&RunHandle> {
        self.run.as_ref()
    }

    /// Interval between steps.
    pub fn speed(&self) -> Duration {
        self.speed
    }

    /// Change the interval. Applies from the next scheduled tick on.
    pub fn set_speed(&mut self, speed: Duration) {
        self.speed = normalize_speed(speed);
    }

    /// Returns true while a tick is scheduled.
    pub fn has_pending_tick(&self) -> bool {
        self.token.is_some()
    }

    /// Start playing `sequence`.
    ///
    /// Any active run is cancelled first, so at most one tick is ever
    /// scheduled. The first step is due immediately.
    pub fn start<S: Scheduler>(&mut self, sequence: Sequence, scheduler: &mut S) -> RunHandle {
        if let Some(previous) = self.run.take() {
            if self.state.is_running() {
                log::info!("{} superseded by a new run", previous.id());
            }
        }
        self.cancel_pending(scheduler);

        let handle = RunHandle::new(RunId(self.next_run));
        self.next_run += 1;
        log::info!(
            "{} started: {} steps of {} at {:?} per step",
            handle.id(),
            sequence.len(),
            sequence.protocol(),
            self.speed
        );

        self.sequence = Some(sequence);
        self.index = 0;
        self.state = PlaybackState::Running;
        self.run = Some(handle.clone());
        self.token = Some(scheduler.schedule_after(Duration::ZERO, handle.id()));
        handle
    }

    /// Handle a fired timer for `run`.
    ///
    /// Plays at most one step. A stop requested through the handle is
    /// observed here, before any step of this tick is played.
    pub fn tick<S: Scheduler>(&mut self, run: RunId, scheduler: &mut S) -> Tick<'_> {
        let current = match &self.run {
            Some(handle) if handle.id() == run && self.state.is_running() => handle,
            _ => {
                log::warn!("ignoring stale tick for {run}");
                return Tick::Stale;
            }
        };
        self.token = None;

        if current.is_stop_requested() {
            log::info!("{run} stopped after {} steps", self.index);
            self.state = PlaybackState::Stopped;
            return Tick::Stopped;
        }

        let Some(sequence) = self.sequence.as_ref() else {
            self.state = PlaybackState::Completed;
            return Tick::Completed;
        };
        if self.index >= sequence.len() {
            log::info!("{run} completed");
            self.state = PlaybackState::Completed;
            return Tick::Completed;
        }

        let index = self.index;
        self.index += 1;
        self.token = Some(scheduler.schedule_after(self.speed, run));
        log::debug!("{run} step {}/{}", index + 1, sequence.len());
        Tick::Step {
            index,
            step: &sequence[index],
        }
    }

    /// Stop `handle`'s run right away.
    ///
    /// Cancels the pending tick. Returns false when the handle does not
    /// belong to the running run.
    pub fn stop<S: Scheduler>(&mut self, handle: &RunHandle, scheduler: &mut S) -> bool {
        handle.request_stop();
        let is_current = self.run.as_ref().is_some_and(|r| r.id() == handle.id());
        if !is_current || !self.state.is_running() {
            return false;
        }
        self.cancel_pending(scheduler);
        self.state = PlaybackState::Stopped;
        log::info!("{} stopped after {} steps", handle.id(), self.index);
        true
    }

    fn cancel_pending<S: Scheduler>(&mut self, scheduler: &mut S) {
        if let Some(token) = self.token.take() {
            scheduler.cancel(token);
        }
    }
}

impl Default for PlaybackDriver {
    fn default() -> Self {
        Self::new(DEFAULT_SPEED)
    }
}

fn normalize_speed(speed: Duration) -> Duration {
    if speed.is_zero() { DEFAULT_SPEED } else { speed }
}
