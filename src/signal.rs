//! Signal lines, steps and step sequences.
//!
//! A [`Sequence`] is the complete, ordered list of [`Step`]s produced by one
//! encoder run. Each step fixes the level of every line of the protocol's
//! line set for `duration` base time units. Sequences are built once, before
//! playback, and never mutated afterwards.

use crate::protocol::Protocol;

/// Duration of the idle padding at both ends of a sequence.
pub const IDLE_UNITS: u32 = 3;

/// Logic level of a single bus line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Level {
    /// Logic low.
    Low,
    /// Logic high.
    High,
}

impl Level {
    /// Level of a bit value (`0` is low, anything else is high).
    #[inline]
    pub const fn from_bit(bit: u8) -> Self {
        if bit == 0 { Level::Low } else { Level::High }
    }

    /// Returns true for [`Level::High`].
    #[inline]
    pub const fn is_high(self) -> bool {
        matches!(self, Level::High)
    }

    /// The opposite level.
    #[inline]
    pub const fn inverted(self) -> Self {
        match self {
            Level::Low => Level::High,
            Level::High => Level::Low,
        }
    }

    /// Bit value of this level.
    #[inline]
    pub const fn bit(self) -> u8 {
        self as u8
    }
}

impl From<bool> for Level {
    fn from(high: bool) -> Self {
        if high { Level::High } else { Level::Low }
    }
}

impl core::fmt::Display for Level {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Level::Low => write!(f, "Low"),
            Level::High => write!(f, "High"),
        }
    }
}

/// A named bus wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SignalLine {
    /// Display name, e.g. `"SCL"`.
    pub name: &'static str,
    /// Stroke colour used by the timing diagram.
    pub colour: &'static str,
    /// Level of the line while the bus is idle.
    pub idle: Level,
}

impl SignalLine {
    /// Create a line description.
    pub const fn new(name: &'static str, colour: &'static str, idle: Level) -> Self {
        Self { name, colour, idle }
    }
}

/// Which cell of the bit decoder display a step lights up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum BitSlot {
    /// Data bit `n` of the current byte (7 is the MSB).
    Data(u8),
    /// The acknowledge slot following a byte.
    Ack,
}

/// Metadata shown by the live bit decoder while a step is active.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CurrentField {
    /// Short field name (`"ID"`, `"DLC"`, `"Addr"`, ...).
    pub name: String,
    /// One-line explanation of this bit.
    pub explanation: String,
    /// Bit decoder cell, for byte-oriented protocols.
    pub slot: Option<BitSlot>,
    /// Dominant (CAN) or high (I2C/SPI) flag.
    pub asserted: bool,
}

/// One discrete time slice of a bus transaction.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Step {
    /// Human readable description, written to the transaction log.
    pub description: String,
    /// Level of every line, in the order of the sequence's line set.
    pub levels: Vec<Level>,
    /// Length of the step in base time units.
    pub duration: u32,
    /// Caption drawn centered under the step.
    pub label: Option<String>,
    /// Small annotation drawn above the step (bit value or bit index).
    pub bit_label: Option<String>,
    /// Bit decoder metadata.
    pub field: Option<CurrentField>,
    /// Transaction phase caption, shown in the status area from this step on.
    pub status: Option<String>,
    /// Byte currently on the wire, shown in the byte display from this step on.
    pub byte: Option<u8>,
}

impl Step {
    /// Create a one-unit step with the given line levels.
    pub fn new(description: impl Into<String>, levels: Vec<Level>) -> Self {
        Self {
            description: description.into(),
            levels,
            duration: 1,
            label: None,
            bit_label: None,
            field: None,
            status: None,
            byte: None,
        }
    }

    /// Set the duration in base units.
    pub fn with_duration(mut self, units: u32) -> Self {
        self.duration = units;
        self
    }

    /// Set the diagram caption.
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Set the bit annotation.
    pub fn with_bit_label(mut self, text: impl Into<String>) -> Self {
        self.bit_label = Some(text.into());
        self
    }

    /// Attach bit decoder metadata.
    pub fn with_field(mut self, field: CurrentField) -> Self {
        self.field = Some(field);
        self
    }

    /// Set the status caption.
    pub fn with_status(mut self, status: impl Into<String>) -> Self {
        self.status = Some(status.into());
        self
    }

    /// Set the byte display.
    pub fn with_byte(mut self, byte: u8) -> Self {
        self.byte = Some(byte);
        self
    }

    /// Level of the line at `index` in the line set.
    #[inline]
    pub fn level(&self, index: usize) -> Level {
        self.levels[index]
    }
}

/// A complete, immutable step sequence for one transaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sequence {
    protocol: Protocol,
    idle: Vec<Level>,
    steps: Vec<Step>,
}

impl Sequence {
    /// Protocol that produced this sequence.
    pub fn protocol(&self) -> Protocol {
        self.protocol
    }

    /// Line set of the protocol, in level order.
    pub fn lines(&self) -> &'static [SignalLine] {
        self.protocol.lines()
    }

    /// Rest level of every line for this transaction.
    ///
    /// This is the state the bus is in before the first step; the SPI clock,
    /// for example, rests at the configured CPOL.
    pub fn idle_levels(&self) -> &[Level] {
        &self.idle
    }

    /// All steps in playback order.
    pub fn steps(&self) -> &[Step] {
        &self.steps
    }

    /// Number of steps.
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    /// Returns true when the sequence has no steps.
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Step at `index`.
    pub fn get(&self, index: usize) -> Option<&Step> {
        self.steps.get(index)
    }

    /// Sum of all step durations.
    pub fn total_units(&self) -> u32 {
        self.steps.iter().map(|s| s.duration).sum()
    }

    /// Index of the line called `name`.
    pub fn line_index(&self, name: &str) -> Option<usize> {
        self.lines().iter().position(|l| l.name == name)
    }

    /// Levels of one line across the whole sequence.
    pub fn levels_of(&self, name: &str) -> Option<Vec<Level>> {
        let index = self.line_index(name)?;
        Some(self.steps.iter().map(|s| s.levels[index]).collect())
    }

    /// Steps that carry bit decoder metadata (the data-carrying steps).
    pub fn field_steps(&self) -> impl Iterator<Item = &Step> {
        self.steps.iter().filter(|s| s.field.is_some())
    }
}

impl core::ops::Index<usize> for Sequence {
    type Output = Step;

    fn index(&self, index: usize) -> &Step {
        &self.steps[index]
    }
}

/// Incremental sequence construction used by the encoders.
///
/// The builder remembers the levels of the last pushed step so encoders can
/// hold a line at whatever level it currently has.
pub(crate) struct SequenceBuilder {
    protocol: Protocol,
    idle: Vec<Level>,
    steps: Vec<Step>,
    current: Vec<Level>,
}

impl SequenceBuilder {
    /// Start a sequence with every line at its default idle level.
    pub(crate) fn new(protocol: Protocol) -> Self {
        let idle = protocol.lines().iter().map(|l| l.idle).collect();
        Self::with_idle(protocol, idle)
    }

    /// Start a sequence with explicit rest levels.
    pub(crate) fn with_idle(protocol: Protocol, idle: Vec<Level>) -> Self {
        debug_assert_eq!(idle.len(), protocol.lines().len());
        Self {
            protocol,
            current: idle.clone(),
            idle,
            steps: Vec::with_capacity(64),
        }
    }

    /// Level the line at `index` had in the last pushed step.
    pub(crate) fn current(&self, index: usize) -> Level {
        self.current[index]
    }

    /// Levels with every line at rest.
    pub(crate) fn idle_levels(&self) -> Vec<Level> {
        self.idle.clone()
    }

    /// Number of steps pushed so far.
    pub(crate) fn len(&self) -> usize {
        self.steps.len()
    }

    /// Step at `index`, for adding metadata after the fact.
    ///
    /// Levels must not be changed through this reference.
    pub(crate) fn step_mut(&mut self, index: usize) -> &mut Step {
        &mut self.steps[index]
    }

    /// Append a step and return it for further annotation.
    pub(crate) fn push(&mut self, step: Step) -> &mut Step {
        debug_assert_eq!(step.levels.len(), self.current.len());
        self.current.clone_from(&step.levels);
        let index = self.steps.len();
        self.steps.push(step);
        &mut self.steps[index]
    }

    /// Append the idle padding step.
    pub(crate) fn push_idle(&mut self, description: &str, label: &str) -> &mut Step {
        let levels = self.idle_levels();
        self.push(
            Step::new(description, levels)
                .with_duration(IDLE_UNITS)
                .with_label(label),
        )
    }

    /// Finish the sequence.
    pub(crate) fn finish(self) -> Sequence {
        log::debug!(
            "{} encoder produced {} steps",
            self.protocol,
            self.steps.len()
        );
        Sequence {
            protocol: self.protocol,
            idle: self.idle,
            steps: self.steps,
        }
    }
}
