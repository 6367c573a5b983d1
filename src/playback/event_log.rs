//! The user-facing transaction log.

/// Line written when every step has been played.
pub const COMPLETE_LINE: &str = "--- simulation complete ---";

/// Line written when a run is stopped early.
pub const STOPPED_LINE: &str = "--- simulation stopped ---";

/// Separator between the run header and the step lines.
pub const HEADER_SEPARATOR: &str = "---";

/// Append-only log of one run.
///
/// A run's log is its header, one `[step N] description` line per played
/// step, and exactly one of [`COMPLETE_LINE`] or [`STOPPED_LINE`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EventLog {
    lines: Vec<String>,
    finished: bool,
}

impl EventLog {
    /// Create an empty log.
    pub fn new() -> Self {
        Self::default()
    }

    /// Discard everything, ready for a new run.
    pub fn clear(&mut self) {
        self.lines.clear();
        self.finished = false;
    }

    /// Write the run header followed by the separator.
    pub fn header<I, L>(&mut self, lines: I)
    where
        I: IntoIterator<Item = L>,
        L: Into<String>,
    {
        self.lines.extend(lines.into_iter().map(Into::into));
        self.lines.push(String::from(HEADER_SEPARATOR));
    }

    /// Record step `number` (1-based).
    pub fn step(&mut self, number: usize, description: &str) {
        self.lines.push(format!("[step {number}] {description}"));
    }

    /// Record natural completion. Ignored once the run has finished.
    pub fn complete(&mut self) -> bool {
        self.finish(COMPLETE_LINE)
    }

    /// Record a stop. Ignored once the run has finished.
    pub fn stopped(&mut self) -> bool {
        self.finish(STOPPED_LINE)
    }

    fn finish(&mut self, line: &str) -> bool {
        if self.finished {
            return false;
        }
        self.finished = true;
        self.lines.push(String::from(line));
        true
    }

    /// Returns true after the completion or stop line was written.
    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// All lines in order.
    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    /// Number of lines.
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    /// Returns true when nothing has been logged.
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Most recent line.
    pub fn last(&self) -> Option<&str> {
        self.lines.last().map(String::as_str)
    }

    /// Number of step lines.
    pub fn step_count(&self) -> usize {
        self.lines.iter().filter(|l| l.starts_with("[step ")).count()
    }

    /// The whole log as newline-terminated text.
    pub fn text(&self) -> String {
        let mut out = String::new();
        for line in &self.lines {
            out.push_str(line);
            out.push('\n');
        }
        out
    }
}
