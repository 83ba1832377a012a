//! Run the build tool with its output logged, optionally filtered
//!
//! Without filtering, the console and `make.log` both receive the raw
//! combined output. With filtering, they receive the redacted output and
//! `make-unfiltered.log` keeps the raw copy.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use anyhow::Context;
use tracing::{info, warn};

use crate::config::ToolNames;
use crate::error::Result;
use crate::process::{CommandSpec, spawn_merged};
use crate::redact::{FilterSinks, FilterStats, LineRedactor, redact_lines};

/// Log that mirrors the console output
pub const FILTERED_LOG: &str = "make.log";

/// Raw output log, written only when filtering
pub const UNFILTERED_LOG: &str = "make-unfiltered.log";

/// Options for one logged build
#[derive(Debug, Clone, Default)]
pub struct MklogOptions {
    /// Drop the bogus `%p` warnings
    pub filter: bool,
    /// Directory for the log files (the current directory when empty)
    pub log_dir: PathBuf,
    /// Arguments passed through to the build tool
    pub args: Vec<String>,
}

/// Result of a logged build
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MklogOutcome {
    /// Exit code of the build tool
    pub exit_code: i32,
    /// Line counts from filtering
    pub stats: FilterStats,
}

impl MklogOptions {
    fn log_path(&self, name: &str) -> PathBuf {
        if self.log_dir.as_os_str().is_empty() {
            PathBuf::from(name)
        } else {
            self.log_dir.join(name)
        }
    }
}

/// Run the build tool, writing its output to `console` and the log files
///
/// The build tool's exit code is returned, not turned into an error, so the
/// caller can exit with it.
///
/// # Errors
///
/// Returns an error if a log file cannot be created, the build tool cannot
/// be started, or writing output fails.
pub fn run_mklog(
    options: &MklogOptions,
    tools: &ToolNames,
    console: &mut dyn Write,
) -> Result<MklogOutcome> {
    let spec = CommandSpec::new(&tools.make).args(options.args.iter().cloned());

    let mut make_log = create_log(&options.log_path(FILTERED_LOG))?;
    let mut unfiltered_log = if options.filter {
        Some(create_log(&options.log_path(UNFILTERED_LOG))?)
    } else {
        None
    };

    info!(command = %spec, filter = options.filter, "starting logged build");
    let mut output = spawn_merged(&spec)?;

    let result = {
        let mut sinks = FilterSinks::new(console).with_filtered_log(&mut make_log);
        if let Some(log) = unfiltered_log.as_mut() {
            sinks = sinks.with_unfiltered_log(log);
        }
        let redactor = options.filter.then(LineRedactor::default);
        redact_lines(output.lines(), redactor, &mut sinks)
    };
    let stats = match result {
        Ok(stats) => stats,
        Err(err) => {
            // Nothing reads the tool's output any more
            match output.kill() {
                Ok(code) => warn!(code, "build tool stopped after output failure"),
                Err(kill_err) => warn!(error = %kill_err, "failed to stop build tool"),
            }
            return Err(err);
        }
    };

    let exit_code = output.wait()?;
    info!(exit_code, "logged build finished");

    Ok(MklogOutcome { exit_code, stats })
}

fn create_log(path: &Path) -> Result<BufWriter<File>> {
    let file = File::create(path)
        .with_context(|| format!("Failed to create log file: {}", path.display()))?;
    Ok(BufWriter::new(file))
}
