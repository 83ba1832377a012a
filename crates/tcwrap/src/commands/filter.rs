use std::io;

use tcwrap_core::redact::{
    FilterReporter, FilterSinks, LineRedactor, WarningPattern, redact_stream,
};

use super::CommandOptions;

pub struct Filter;

impl Filter {
    /// Redact stdin to stdout; diagnostics go to stderr
    pub fn execute(
        pattern: Option<&str>,
        stats: bool,
        options: &CommandOptions<'_>,
    ) -> anyhow::Result<()> {
        let pattern = match pattern {
            Some(pattern) => WarningPattern::new(pattern)?,
            None => WarningPattern::default(),
        };

        let stdin = io::stdin();
        let stdout = io::stdout();
        let mut out = stdout.lock();
        let mut sinks = FilterSinks::new(&mut out);
        let result = redact_stream(stdin.lock(), Some(LineRedactor::new(pattern)), &mut sinks)?;

        if stats || options.verbose {
            eprint!("{}", FilterReporter::generate_summary(&result));
        }

        Ok(())
    }
}
