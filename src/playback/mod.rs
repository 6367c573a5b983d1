//! Timed, cancellable playback of step sequences.
//!
//! - [`TimerQueue`] schedules one-shot ticks over a [`Clock`]:
//!   [`VirtualClock`] for instant deterministic runs, [`SystemClock`] for
//!   real time.
//! - [`PlaybackDriver`] is the `Idle → Running → Completed | Stopped` state
//!   machine. It plays exactly one step per tick and keeps at most one tick
//!   scheduled.
//! - [`EventLog`] is the per-run transaction log.
//!
//! # Example
//!
//! ```
//! use busline::playback::{PlaybackDriver, Tick, TimerQueue, VirtualClock};
//! use busline::spi::{self, Cpha, Cpol, SpiConfig};
//!
//! let seq = spi::encode(&SpiConfig::new(Cpol::Idle0, Cpha::Leading, 0x01, 0x80)).unwrap();
//! let mut timers = TimerQueue::new(VirtualClock::new());
//! let mut driver = PlaybackDriver::default();
//! driver.start(seq, &mut timers);
//!
//! let mut steps = 0;
//! while let Some(run) = timers.next_due() {
//!     if let Tick::Step { .. } = driver.tick(run, &mut timers) {
//!         steps += 1;
//!     }
//! }
//! assert_eq!(steps, 28);
//! ```

mod driver;
mod event_log;
mod timer;

pub use driver::{DEFAULT_SPEED, PlaybackDriver, PlaybackState, RunHandle, Tick};
pub use event_log::{COMPLETE_LINE, EventLog, HEADER_SEPARATOR, STOPPED_LINE};
pub use timer::{CancelToken, Clock, RunId, Scheduler, SystemClock, TimerQueue, VirtualClock};
