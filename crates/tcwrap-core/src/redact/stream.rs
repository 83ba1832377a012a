//! Driving the redactor from a reader into output sinks

use std::io::{self, BufRead, Write};

use anyhow::Context;

use super::filter::{Line, LineRedactor};
use super::reporting::FilterStats;
use crate::error::Result;

/// Output destinations for one filtering run
///
/// The interactive sink and the filtered log receive the same redacted
/// sequence. The unfiltered log receives every input line as it is read.
pub struct FilterSinks<'a> {
    interactive: &'a mut dyn Write,
    filtered_log: Option<&'a mut dyn Write>,
    unfiltered_log: Option<&'a mut dyn Write>,
}

impl<'a> FilterSinks<'a> {
    /// Sinks writing only to the interactive destination
    pub fn new(interactive: &'a mut dyn Write) -> Self {
        Self {
            interactive,
            filtered_log: None,
            unfiltered_log: None,
        }
    }

    /// Also write the redacted sequence to a durable log
    #[must_use]
    pub fn with_filtered_log(mut self, log: &'a mut dyn Write) -> Self {
        self.filtered_log = Some(log);
        self
    }

    /// Also write the raw input to an audit log
    #[must_use]
    pub fn with_unfiltered_log(mut self, log: &'a mut dyn Write) -> Self {
        self.unfiltered_log = Some(log);
        self
    }

    fn record_raw(&mut self, line: &[u8]) -> Result<()> {
        if let Some(log) = self.unfiltered_log.as_mut() {
            log.write_all(line).context("Failed to write unfiltered log")?;
        }
        Ok(())
    }

    fn emit(&mut self, line: &[u8]) -> Result<()> {
        self.interactive
            .write_all(line)
            .context("Failed to write filtered output")?;
        if let Some(log) = self.filtered_log.as_mut() {
            log.write_all(line).context("Failed to write filtered log")?;
        }
        Ok(())
    }

    fn flush(&mut self) -> Result<()> {
        self.interactive
            .flush()
            .context("Failed to flush filtered output")?;
        if let Some(log) = self.filtered_log.as_mut() {
            log.flush().context("Failed to flush filtered log")?;
        }
        if let Some(log) = self.unfiltered_log.as_mut() {
            log.flush().context("Failed to flush unfiltered log")?;
        }
        Ok(())
    }
}

/// Iterator over raw lines of a reader, newlines kept
///
/// Unlike [`BufRead::lines`] this does not require UTF-8.
pub struct ByteLines<R> {
    reader: R,
}

impl<R: BufRead> ByteLines<R> {
    /// Wrap a reader
    pub const fn new(reader: R) -> Self {
        Self { reader }
    }
}

impl<R: BufRead> Iterator for ByteLines<R> {
    type Item = io::Result<Line>;

    fn next(&mut self) -> Option<Self::Item> {
        let mut line = Vec::new();
        match self.reader.read_until(b'\n', &mut line) {
            Ok(0) => None,
            Ok(_) => Some(Ok(line)),
            Err(e) => Some(Err(e)),
        }
    }
}

/// Filter every line of `reader` into `sinks`
///
/// With no redactor, lines pass straight through to the filtered sinks.
///
/// # Errors
///
/// Returns an error if reading the input or writing a sink fails.
pub fn redact_stream<R: BufRead>(
    reader: R,
    redactor: Option<LineRedactor>,
    sinks: &mut FilterSinks<'_>,
) -> Result<FilterStats> {
    redact_lines(ByteLines::new(reader), redactor, sinks)
}

/// Filter a sequence of lines into `sinks`
///
/// # Errors
///
/// Returns an error if the source yields an error or writing a sink fails.
pub fn redact_lines<I>(
    lines: I,
    mut redactor: Option<LineRedactor>,
    sinks: &mut FilterSinks<'_>,
) -> Result<FilterStats>
where
    I: IntoIterator<Item = io::Result<Line>>,
{
    let mut stats = FilterStats::default();

    for line in lines {
        let line = line.context("Failed to read input line")?;
        stats.lines_read += 1;
        sinks.record_raw(&line)?;

        let released = match redactor.as_mut() {
            Some(redactor) => redactor.push(line),
            None => Some(line),
        };
        if let Some(released) = released {
            sinks.emit(&released)?;
            stats.lines_emitted += 1;
        }
    }

    if let Some(redactor) = redactor {
        stats.matches = redactor.matches();
        if let Some(held) = redactor.finish() {
            sinks.emit(&held)?;
            stats.lines_emitted += 1;
        }
    }

    stats.lines_suppressed = stats.lines_read - stats.lines_emitted;
    sinks.flush()?;

    Ok(stats)
}
