//! Recognition of the `%p` format warning

use regex::bytes::Regex;

use crate::error::Error;

/// Default warning matcher.
///
/// gcc quotes with U+2018/U+2019 in UTF-8 locales and with `'` otherwise.
/// The greedy group captures the location (`file:line:col`) before the
/// last `: warning: format`. The location may hold arbitrary bytes.
pub const DEFAULT_WARNING_PATTERN: &str =
    r"^((?-u:.)*): warning: format (?:‘|')%p(?:’|') expects argument of type (?:‘|')void";

/// Matcher for the warning line that starts a suppressed diagnostic
#[derive(Debug, Clone)]
pub struct WarningPattern {
    regex: Regex,
}

impl WarningPattern {
    /// Compile a custom pattern; capture group 1 must hold the location key
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidPattern`] if the regex does not compile or has
    /// no capture group.
    pub fn new(pattern: &str) -> Result<Self, Error> {
        let regex = Regex::new(pattern).map_err(|e| Error::InvalidPattern(e.to_string()))?;
        if regex.captures_len() < 2 {
            return Err(Error::InvalidPattern(format!(
                "pattern needs a capture group for the location key: {pattern}"
            )));
        }
        Ok(Self { regex })
    }

    /// Location key of `line` if it is a warning line
    #[must_use]
    pub fn key_of<'h>(&self, line: &'h [u8]) -> Option<&'h [u8]> {
        self.regex
            .captures(line)
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_bytes())
    }

    /// Whether `line` starts a suppressed diagnostic
    #[must_use]
    pub fn is_match(&self, line: &[u8]) -> bool {
        self.regex.is_match(line)
    }
}

impl Default for WarningPattern {
    fn default() -> Self {
        Self {
            regex: Regex::new(DEFAULT_WARNING_PATTERN).expect("built-in warning pattern compiles"),
        }
    }
}
