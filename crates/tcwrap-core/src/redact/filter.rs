//! One-line-lookbehind redaction state machine

use tracing::trace;

use super::pattern::WarningPattern;

/// One line of input, newline included when present
pub type Line = Vec<u8>;

/// Lines dropped unconditionally after a warning: the snippet and the blank line
pub const SKIP_RUN: usize = 2;

/// Observable state of a [`LineRedactor`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RedactorState {
    /// Nothing held, nothing to skip
    Idle,
    /// One line waiting for the next to be inspected
    Holding,
    /// Dropping the given number of upcoming lines
    Skipping(usize),
}

/// Drops the `%p` warning pattern from a line sequence
///
/// Lines are released one step late so that the line before a warning can
/// be dropped retroactively. That line is dropped whatever it holds: a
/// context line ending in `:` is the usual case, but a build progress line
/// in that slot goes too.
#[derive(Debug, Clone)]
pub struct LineRedactor {
    pattern: WarningPattern,
    held: Option<Line>,
    skip_count: usize,
    last_match_key: Option<Vec<u8>>,
    matches: usize,
}

impl LineRedactor {
    /// Create a redactor in the idle state
    #[must_use]
    pub const fn new(pattern: WarningPattern) -> Self {
        Self {
            pattern,
            held: None,
            skip_count: 0,
            last_match_key: None,
            matches: 0,
        }
    }

    /// Feed one line; returns the line released for output by this step, if any
    pub fn push(&mut self, line: Line) -> Option<Line> {
        if self.skip_count > 0 {
            self.skip_count -= 1;
            trace!(remaining = self.skip_count, "skipped warning body line");
            return None;
        }

        if let Some(key) = self.pattern.key_of(&line) {
            self.matches += 1;
            if let Some(held) = self.held.take() {
                trace!(context = ends_with_colon(&held), "dropped line before warning");
            }

            // A repeat at the same location does not start a new skip run.
            if self.last_match_key.as_deref() != Some(key) {
                self.last_match_key = Some(key.to_vec());
                self.skip_count = SKIP_RUN;
            }
            trace!(
                key = %String::from_utf8_lossy(key),
                skip = self.skip_count,
                "dropped warning line"
            );
            return None;
        }

        self.held.replace(line)
    }

    /// End of stream; returns the held line, if any
    #[must_use]
    pub fn finish(self) -> Option<Line> {
        self.held
    }

    /// Current state
    #[must_use]
    pub const fn state(&self) -> RedactorState {
        if self.skip_count > 0 {
            RedactorState::Skipping(self.skip_count)
        } else if self.held.is_some() {
            RedactorState::Holding
        } else {
            RedactorState::Idle
        }
    }

    /// Warning lines seen so far
    #[must_use]
    pub const fn matches(&self) -> usize {
        self.matches
    }
}

impl Default for LineRedactor {
    fn default() -> Self {
        Self::new(WarningPattern::default())
    }
}

fn ends_with_colon(line: &[u8]) -> bool {
    let line = line.strip_suffix(b"\n").unwrap_or(line);
    let line = line.strip_suffix(b"\r").unwrap_or(line);
    line.ends_with(b":")
}
