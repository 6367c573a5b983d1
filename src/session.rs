//! One visualizer instance.
//!
//! A [`Session`] owns everything a run touches: the frozen configuration,
//! the playback driver and its timers, the timing diagram with its surface,
//! the transaction log and the live view (line levels, bit decoder, status).
//! Starting a new run cancels the previous one before any new state is
//! allocated, so two runs never draw into the same surface.
//!
//! # Example
//!
//! ```
//! use busline::{Session, SessionOptions};
//! use busline::i2c::I2cConfig;
//! use busline::playback::{PlaybackState, COMPLETE_LINE};
//! use busline::render::RecordingSurface;
//!
//! let mut session = Session::with_virtual_clock(RecordingSurface::new(), SessionOptions::default());
//! session.configure(I2cConfig::write(0x50, 0x42).unwrap());
//! session.start().unwrap();
//! session.run_until_idle();
//!
//! assert_eq!(session.state(), PlaybackState::Completed);
//! assert_eq!(session.log().last(), Some(COMPLETE_LINE));
//! ```

use crate::can::{FrameField, frame_structure};
use crate::hex;
use crate::options::SessionOptions;
use crate::playback::{
    Clock, EventLog, PlaybackDriver, PlaybackState, RunHandle, RunId, Tick, TimerQueue,
    VirtualClock,
};
use crate::protocol::{ConfigNotice, Protocol, TransactionConfig};
use crate::render::{DrawingSurface, TimingDiagram};
use crate::signal::{CurrentField, Level, SignalLine, Step};
use crate::{Error, Result};

/// Status text while no run is active.
pub const STATUS_IDLE: &str = "Idle";
/// Status text right after a run starts.
pub const STATUS_RUNNING: &str = "Running...";
/// Status text after a stop.
pub const STATUS_STOPPED: &str = "Stopped manually";

/// Level of one line, as shown next to the diagram.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LineState {
    /// Line name.
    pub name: String,
    /// Current level.
    pub level: Level,
}

impl LineState {
    /// Text label, e.g. `SCL (High)`.
    pub fn label(&self) -> String {
        format!("{} ({})", self.name, self.level)
    }
}

/// Serializable snapshot of everything a user interface shows.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SessionView {
    /// Protocol of the configured transaction.
    pub protocol: Option<Protocol>,
    /// Playback state.
    pub state: PlaybackState,
    /// Status caption.
    pub status: String,
    /// Steps played so far.
    pub position: usize,
    /// Steps in the current sequence.
    pub total_steps: usize,
    /// Level of every line.
    pub lines: Vec<LineState>,
    /// Bit decoder field of the current step.
    pub field: Option<CurrentField>,
    /// Byte display, `0xNN` or `--`.
    pub byte: String,
    /// Transaction log.
    pub log: Vec<String>,
    /// CAN frame structure (empty for other protocols).
    pub structure: Vec<FrameField>,
}

#[derive(Debug, Clone, Default)]
struct LiveView {
    lines: Vec<LineState>,
    field: Option<CurrentField>,
    byte: Option<u8>,
    status: String,
}

impl LiveView {
    fn reset(&mut self, lines: &[SignalLine], levels: &[Level]) {
        self.lines = lines
            .iter()
            .zip(levels)
            .map(|(line, &level)| LineState {
                name: String::from(line.name),
                level,
            })
            .collect();
        self.field = None;
        self.byte = None;
        self.status = String::from(STATUS_IDLE);
    }

    fn apply(&mut self, step: &Step) {
        for (state, &level) in self.lines.iter_mut().zip(&step.levels) {
            state.level = level;
        }
        self.field = step.field.clone();
        if let Some(byte) = step.byte {
            self.byte = Some(byte);
        }
        if let Some(status) = &step.status {
            self.status.clone_from(status);
        }
    }

    fn finish(&mut self, status: &str) {
        self.field = None;
        self.byte = None;
        self.status = String::from(status);
    }
}

/// A visualizer session.
///
/// `S` is the surface the timing diagram is drawn on, `C` the clock that
/// paces playback.
pub struct Session<S: DrawingSurface, C: Clock> {
    options: SessionOptions,
    config: Option<TransactionConfig>,
    structure: Vec<FrameField>,
    driver: PlaybackDriver,
    timers: TimerQueue<C>,
    diagram: TimingDiagram,
    surface: S,
    log: EventLog,
    view: LiveView,
}

impl<S: DrawingSurface> Session<S, VirtualClock> {
    /// Create a session that plays back instantly.
    pub fn with_virtual_clock(surface: S, options: SessionOptions) -> Self {
        Self::new(surface, VirtualClock::new(), options)
    }
}

impl<S: DrawingSurface, C: Clock> Session<S, C> {
    /// Create an unconfigured session.
    pub fn new(surface: S, clock: C, options: SessionOptions) -> Self {
        let diagram = TimingDiagram::new(
            options.layout_for(Protocol::Can),
            options.viewport_width,
        );
        Self {
            driver: PlaybackDriver::new(options.speed()),
            timers: TimerQueue::new(clock),
            diagram,
            surface,
            options,
            config: None,
            structure: Vec::new(),
            log: EventLog::new(),
            view: LiveView {
                status: String::from(STATUS_IDLE),
                ..LiveView::default()
            },
        }
    }

    /// Set the transaction played by the next [`start`](Self::start).
    ///
    /// The frame structure is recomputed right away. A run already in
    /// progress keeps playing its own frozen configuration; a notice says so.
    pub fn configure(&mut self, config: impl Into<TransactionConfig>) -> Vec<ConfigNotice> {
        let config = config.into();
        let mut notices = Vec::new();

        self.structure = match &config {
            TransactionConfig::Can(frame) => frame_structure(frame),
            _ => Vec::new(),
        };
        if self.driver.state().is_running() {
            let notice = ConfigNotice::new(
                "configuration",
                "A run is in progress; the new configuration applies to the next run.",
            );
            log::info!("{notice}");
            notices.push(notice);
        } else {
            self.view
                .reset(config.protocol().lines(), &config.idle_levels());
        }
        log::debug!("configured {} transaction", config.protocol());
        self.config = Some(config);
        notices
    }

    /// Change the playback interval; non-positive values select the default.
    pub fn set_speed_ms(&mut self, speed_ms: i64) {
        self.options.speed_ms = speed_ms;
        self.driver.set_speed(self.options.speed());
    }

    /// Validate and encode the configured transaction and start playing it.
    ///
    /// On error nothing changes: a run in progress keeps running. On success
    /// any previous run is cancelled, the log is cleared and the diagram is
    /// reset before the first step is scheduled.
    pub fn start(&mut self) -> Result<RunHandle> {
        let config = self.config.as_ref().ok_or(Error::NotConfigured)?;
        let sequence = config.encode().inspect_err(|e| {
            log::warn!("not starting: {e}");
        })?;

        self.log.clear();
        self.log.header(config.summary());

        let layout = self.options.layout_for(sequence.protocol());
        self.diagram = TimingDiagram::new(layout, self.options.viewport_width);
        self.diagram.begin(&sequence, &mut self.surface);

        self.view.reset(sequence.lines(), sequence.idle_levels());
        self.view.status = String::from(STATUS_RUNNING);

        Ok(self.driver.start(sequence, &mut self.timers))
    }

    /// Stop `handle`'s run now.
    ///
    /// The pending tick is cancelled and the stop line is logged
    /// immediately. Returns false if `handle` is not the running run.
    pub fn stop(&mut self, handle: &RunHandle) -> bool {
        if !self.driver.stop(handle, &mut self.timers) {
            return false;
        }
        self.log.stopped();
        self.view.finish(STATUS_STOPPED);
        true
    }

    /// Wait for the next timer and handle it.
    ///
    /// Returns false when nothing is scheduled.
    pub fn pump(&mut self) -> bool {
        match self.timers.next_due() {
            Some(run) => {
                self.on_tick(run);
                true
            }
            None => false,
        }
    }

    /// Pump until no timer is left.
    pub fn run_until_idle(&mut self) {
        while self.pump() {}
    }

    fn on_tick(&mut self, run: RunId) {
        match self.driver.tick(run, &mut self.timers) {
            Tick::Step { index, step } => {
                self.log.step(index + 1, &step.description);
                self.diagram.draw_step(step, &mut self.surface);
                self.view.apply(step);
            }
            Tick::Completed => {
                self.log.complete();
                self.view.finish(STATUS_IDLE);
            }
            Tick::Stopped => {
                self.log.stopped();
                self.view.finish(STATUS_STOPPED);
            }
            Tick::Stale => {}
        }
    }

    /// Playback state.
    pub fn state(&self) -> PlaybackState {
        self.driver.state()
    }

    /// Configured transaction.
    pub fn config(&self) -> Option<&TransactionConfig> {
        self.config.as_ref()
    }

    /// Options in use.
    pub fn options(&self) -> &SessionOptions {
        &self.options
    }

    /// Playback driver (read only).
    pub fn driver(&self) -> &PlaybackDriver {
        &self.driver
    }

    /// Number of scheduled timers; never more than one.
    pub fn pending_timers(&self) -> usize {
        self.timers.pending()
    }

    /// Transaction log of the current (or last) run.
    pub fn log(&self) -> &EventLog {
        &self.log
    }

    /// Drawing surface.
    pub fn surface(&self) -> &S {
        &self.surface
    }

    /// Consume the session and return its surface.
    pub fn into_surface(self) -> S {
        self.surface
    }

    /// Timing diagram state.
    pub fn diagram(&self) -> &TimingDiagram {
        &self.diagram
    }

    /// Level of every line.
    pub fn line_states(&self) -> &[LineState] {
        &self.view.lines
    }

    /// Line labels, e.g. `["SCL (High)", "SDA (Low)"]`.
    pub fn line_labels(&self) -> Vec<String> {
        self.view.lines.iter().map(LineState::label).collect()
    }

    /// Bit decoder field of the step played last.
    pub fn current_field(&self) -> Option<&CurrentField> {
        self.view.field.as_ref()
    }

    /// Byte currently on the wire.
    pub fn current_byte(&self) -> Option<u8> {
        self.view.byte
    }

    /// Status caption.
    pub fn status(&self) -> &str {
        &self.view.status
    }

    /// Frame structure of the configured CAN frame.
    pub fn frame_structure(&self) -> &[FrameField] {
        &self.structure
    }

    /// Snapshot of the live view.
    pub fn view(&self) -> SessionView {
        SessionView {
            protocol: self.config.as_ref().map(TransactionConfig::protocol),
            state: self.driver.state(),
            status: self.view.status.clone(),
            position: self.driver.position(),
            total_steps: self.driver.sequence().map_or(0, |s| s.len()),
            lines: self.view.lines.clone(),
            field: self.view.field.clone(),
            byte: self
                .view
                .byte
                .map_or_else(|| String::from("--"), |b| hex::format_hex(b as u32, 2)),
            log: self.log.lines().to_vec(),
            structure: self.structure.clone(),
        }
    }

    /// Snapshot of the live view as JSON.
    #[cfg(feature = "serde_json")]
    pub fn view_json(&self) -> Result<String> {
        Ok(serde_json::to_string(&self.view())?)
    }
}
