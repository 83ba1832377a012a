//! Build-log redaction
//!
//! gcc emits a three-part warning for every `%p` passed something other than
//! `void*`: the warning line, a code snippet, and a blank line. A context line
//! ending in `:` sometimes precedes it. This module drops that pattern from a
//! line stream and forwards everything else unchanged and in order.
//!
//! - [`WarningPattern`] recognizes the warning line and extracts its location key
//! - [`LineRedactor`] is the one-line-lookbehind state machine
//! - [`redact_stream`] / [`redact_lines`] drive it against output sinks

mod filter;
mod pattern;
mod reporting;
mod stream;

#[cfg(test)]
mod integration_tests;

pub use filter::{Line, LineRedactor, RedactorState, SKIP_RUN};
pub use pattern::{WarningPattern, DEFAULT_WARNING_PATTERN};
pub use reporting::{FilterReporter, FilterStats};
pub use stream::{ByteLines, FilterSinks, redact_lines, redact_stream};
