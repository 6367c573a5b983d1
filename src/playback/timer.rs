//! Cancellable one-shot timers.
//!
//! Playback is single threaded: the only suspension point is the delay
//! between two ticks. [`TimerQueue`] keeps the scheduled ticks ordered by
//! deadline and hands them out one at a time through
//! [`TimerQueue::next_due`], waiting on its [`Clock`] until each is due.

use std::time::{Duration, Instant};

/// Identifier of one playback run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RunId(pub u64);

impl core::fmt::Display for RunId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "run {}", self.0)
    }
}

/// Handle to a scheduled timer, used to cancel it.
#[derive(Debug, PartialEq, Eq)]
pub struct CancelToken {
    id: u64,
}

impl CancelToken {
    /// Timer id.
    pub fn id(&self) -> u64 {
        self.id
    }
}

/// Trait for scheduling delayed ticks.
pub trait Scheduler {
    /// Fire a tick for `run` once `delay` has elapsed.
    fn schedule_after(&mut self, delay: Duration, run: RunId) -> CancelToken;

    /// Cancel a scheduled tick. Returns false if it already fired.
    fn cancel(&mut self, token: CancelToken) -> bool;
}

/// Source of time for a [`TimerQueue`].
pub trait Clock {
    /// Time elapsed since the clock's origin.
    fn now(&self) -> Duration;

    /// Block until `deadline` (measured from the origin) has passed.
    fn wait_until(&mut self, deadline: Duration);
}

/// A clock that jumps straight to each deadline.
///
/// Playback on a virtual clock is instant and fully deterministic.
#[derive(Debug, Clone, Default)]
pub struct VirtualClock {
    now: Duration,
}

impl VirtualClock {
    /// Create a clock at time zero.
    pub fn new() -> Self {
        Self::default()
    }
}

impl Clock for VirtualClock {
    fn now(&self) -> Duration {
        self.now
    }

    fn wait_until(&mut self, deadline: Duration) {
        self.now = self.now.max(deadline);
    }
}

/// A wall clock that sleeps the calling thread.
#[derive(Debug, Clone)]
pub struct SystemClock {
    origin: Instant,
}

impl SystemClock {
    /// Create a clock whose origin is now.
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SystemClock {
    fn now(&self) -> Duration {
        self.origin.elapsed()
    }

    fn wait_until(&mut self, deadline: Duration) {
        let now = self.now();
        if deadline > now {
            std::thread::sleep(deadline - now);
        }
    }
}

#[derive(Debug)]
struct Timer {
    id: u64,
    deadline: Duration,
    run: RunId,
}

/// Deadline-ordered one-shot timers over a [`Clock`].
#[derive(Debug)]
pub struct TimerQueue<C: Clock> {
    clock: C,
    timers: Vec<Timer>,
    next_id: u64,
}

impl<C: Clock> TimerQueue<C> {
    /// Create an empty queue.
    pub fn new(clock: C) -> Self {
        Self {
            clock,
            timers: Vec::new(),
            next_id: 0,
        }
    }

    /// Number of timers that have neither fired nor been cancelled.
    pub fn pending(&self) -> usize {
        self.timers.len()
    }

    /// Current clock time.
    pub fn now(&self) -> Duration {
        self.clock.now()
    }

    /// The underlying clock.
    pub fn clock(&self) -> &C {
        &self.clock
    }

    /// Wait for the earliest timer and fire it.
    ///
    /// Timers with equal deadlines fire in scheduling order. Returns `None`
    /// when nothing is scheduled.
    pub fn next_due(&mut self) -> Option<RunId> {
        let index = self
            .timers
            .iter()
            .enumerate()
            .min_by_key(|(_, t)| (t.deadline, t.id))
            .map(|(i, _)| i)?;
        let timer = self.timers.remove(index);
        self.clock.wait_until(timer.deadline);
        log::trace!("timer {} fired for {}", timer.id, timer.run);
        Some(timer.run)
    }
}

impl<C: Clock> Scheduler for TimerQueue<C> {
    fn schedule_after(&mut self, delay: Duration, run: RunId) -> CancelToken {
        let id = self.next_id;
        self.next_id += 1;
        self.timers.push(Timer {
            id,
            deadline: self.clock.now() + delay,
            run,
        });
        CancelToken { id }
    }

    fn cancel(&mut self, token: CancelToken) -> bool {
        let before = self.timers.len();
        self.timers.retain(|t| t.id != token.id);
        self.timers.len() != before
    }
}
