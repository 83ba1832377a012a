//! Filtering statistics and summary output

/// Counters for one filtering run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FilterStats {
    /// Lines read from the input
    pub lines_read: usize,
    /// Lines written to the filtered sinks
    pub lines_emitted: usize,
    /// Lines dropped by the redactor
    pub lines_suppressed: usize,
    /// Warning lines recognized
    pub matches: usize,
}

/// Filter run reporter
pub struct FilterReporter;

impl FilterReporter {
    /// Generate a summary report
    #[must_use]
    pub fn generate_summary(stats: &FilterStats) -> String {
        let mut output = String::new();

        output.push_str("\n=== Filter Summary ===\n");
        output.push_str(&format!("Lines read:       {}\n", stats.lines_read));
        output.push_str(&format!("Lines emitted:    {}\n", stats.lines_emitted));
        output.push_str(&format!("Lines suppressed: {}\n", stats.lines_suppressed));
        output.push_str(&format!("Warnings matched: {}\n", stats.matches));

        output
    }
}
