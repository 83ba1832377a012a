//! External command specs and runners
//!
//! Every wrapper echoes the command line before running it, so a user can
//! repeat a failed step by hand.

use std::fmt;
use std::io::{self, BufReader, PipeReader};
use std::path::PathBuf;
use std::process::{Child, Command, ExitStatus, Stdio};

use anyhow::Context;
use tracing::{debug, warn};

use crate::error::{Error, Result};
use crate::redact::{ByteLines, Line};

/// An external command to run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandSpec {
    /// Program name or path
    pub program: String,
    /// Arguments, passed without shell interpretation
    pub args: Vec<String>,
    /// Directory to run in, if not the current one
    pub cwd: Option<PathBuf>,
    /// Extra environment variables
    pub env: Vec<(String, String)>,
}

impl CommandSpec {
    /// Command with no arguments
    #[must_use]
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            cwd: None,
            env: Vec::new(),
        }
    }

    /// Append one argument
    #[must_use]
    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    /// Append several arguments
    #[must_use]
    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    /// Run in `dir`
    #[must_use]
    pub fn current_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.cwd = Some(dir.into());
        self
    }

    /// Set an environment variable for the child
    #[must_use]
    pub fn env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.env.push((key.into(), value.into()));
        self
    }

    /// Build the `std` command
    #[must_use]
    pub fn to_command(&self) -> Command {
        let mut cmd = Command::new(&self.program);
        cmd.args(&self.args);
        if let Some(dir) = &self.cwd {
            cmd.current_dir(dir);
        }
        for (key, value) in &self.env {
            cmd.env(key, value);
        }
        cmd
    }
}

impl fmt::Display for CommandSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.program)?;
        for arg in &self.args {
            write!(f, " {arg}")?;
        }
        Ok(())
    }
}

/// Exit code of a finished process; 128+signal when killed on unix
#[must_use]
pub fn exit_code(status: ExitStatus) -> i32 {
    if let Some(code) = status.code() {
        return code;
    }
    #[cfg(unix)]
    {
        use std::os::unix::process::ExitStatusExt;
        if let Some(signal) = status.signal() {
            return 128 + signal;
        }
    }
    1
}

/// Echo and run a command, returning its exit code
///
/// In dry-run mode the command is only echoed and reported as successful.
///
/// # Errors
///
/// Returns an error if the command cannot be started.
pub fn run_echoed(spec: &CommandSpec, dry_run: bool) -> Result<i32> {
    println!("{spec}");
    if dry_run {
        return Ok(0);
    }

    let status = spec
        .to_command()
        .status()
        .with_context(|| format!("Failed to run {}", spec.program))?;
    let code = exit_code(status);
    debug!(command = %spec, code, "command finished");
    Ok(code)
}

/// Echo and run a command, failing on a nonzero exit code
///
/// # Errors
///
/// Returns [`Error::CommandFailed`] on a nonzero exit, or an error if the
/// command cannot be started.
pub fn run_checked(spec: &CommandSpec, dry_run: bool) -> Result<()> {
    let code = run_echoed(spec, dry_run)?;
    if code != 0 {
        return Err(Error::CommandFailed {
            command: spec.to_string(),
            code,
        }
        .into());
    }
    Ok(())
}

/// A running child whose stdout and stderr arrive as one line sequence
///
/// Both streams share the write end of a single pipe, so lines come out in
/// the order the child wrote them.
pub struct MergedOutput {
    child: Child,
    reader: PipeReader,
}

impl MergedOutput {
    /// Lines from the child until every holder of the write end closes it
    pub fn lines(&mut self) -> impl Iterator<Item = io::Result<Line>> + '_ {
        ByteLines::new(BufReader::new(&mut self.reader))
    }

    /// Wait for the child and return its exit code
    ///
    /// # Errors
    ///
    /// Returns an error if waiting on the child fails.
    pub fn wait(mut self) -> Result<i32> {
        let status = self
            .child
            .wait()
            .context("Failed to wait for child process")?;
        Ok(exit_code(status))
    }

    /// Kill the child and reap it, returning its exit code
    ///
    /// # Errors
    ///
    /// Returns an error if waiting on the child fails.
    pub fn kill(mut self) -> Result<i32> {
        if let Err(err) = self.child.kill() {
            warn!(pid = self.child.id(), error = %err, "failed to kill child process");
        }
        self.wait()
    }
}

/// Spawn a command with stdout and stderr merged into one line stream
///
/// # Errors
///
/// Returns an error if the pipe cannot be created or the command cannot be
/// started.
pub fn spawn_merged(spec: &CommandSpec) -> Result<MergedOutput> {
    let (reader, writer) = io::pipe().context("Failed to create output pipe")?;
    let stderr_writer = writer
        .try_clone()
        .context("Failed to duplicate output pipe")?;

    let mut cmd = spec.to_command();
    cmd.stdin(Stdio::inherit())
        .stdout(writer)
        .stderr(stderr_writer);

    let child = cmd
        .spawn()
        .with_context(|| format!("Failed to run {}", spec.program))?;
    debug!(command = %spec, pid = child.id(), "spawned");

    // The command keeps our copies of the write end open; EOF needs them gone
    drop(cmd);

    Ok(MergedOutput { child, reader })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_joins_arguments() {
        let spec = CommandSpec::new("git").args(["pull", "origin", "master:master"]);
        assert_eq!(spec.to_string(), "git pull origin master:master");
    }

    #[test]
    fn test_builder() {
        let spec = CommandSpec::new("make")
            .arg("-j8")
            .current_dir("/tmp")
            .env("LD_LIBRARY_PATH", "/opt/lib");

        assert_eq!(spec.args, vec!["-j8".to_string()]);
        assert_eq!(spec.cwd, Some(PathBuf::from("/tmp")));
        assert_eq!(
            spec.env,
            vec![("LD_LIBRARY_PATH".to_string(), "/opt/lib".to_string())]
        );
    }

    #[test]
    fn test_dry_run_does_not_execute() {
        let spec = CommandSpec::new("/nonexistent/tool");
        assert_eq!(run_echoed(&spec, true).unwrap(), 0);
    }

    #[test]
    fn test_missing_program_is_an_error() {
        let spec = CommandSpec::new("/nonexistent/tool");
        let result = run_echoed(&spec, false);
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("Failed to run"));
    }

    #[test]
    #[cfg(unix)]
    fn test_run_checked_reports_exit_code() {
        let spec = CommandSpec::new("sh").args(["-c", "exit 4"]);

        let err = run_checked(&spec, false).unwrap_err();

        match err.downcast_ref::<Error>() {
            Some(Error::CommandFailed { code, command }) => {
                assert_eq!(*code, 4);
                assert_eq!(command, "sh -c exit 4");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    #[cfg(unix)]
    fn test_spawn_merged_collects_both_streams_in_order() {
        let spec = CommandSpec::new("sh").args(["-c", "echo out; echo err 1>&2; exit 3"]);

        let mut output = spawn_merged(&spec).unwrap();
        let lines: Vec<Line> = output.lines().map(|l| l.unwrap()).collect();
        let code = output.wait().unwrap();

        assert_eq!(lines, vec![b"out\n".to_vec(), b"err\n".to_vec()]);
        assert_eq!(code, 3);
    }

    #[test]
    #[cfg(unix)]
    fn test_spawn_merged_keeps_interleaved_order() {
        let script = "i=0; while [ $i -lt 2000 ]; do echo out$i; echo err$i 1>&2; i=$((i+1)); done";
        let spec = CommandSpec::new("sh").args(["-c", script]);

        let mut output = spawn_merged(&spec).unwrap();
        let lines: Vec<String> = output
            .lines()
            .map(|l| String::from_utf8(l.unwrap()).unwrap())
            .collect();
        assert_eq!(output.wait().unwrap(), 0);

        let expected: Vec<String> = (0..2000)
            .flat_map(|i| [format!("out{i}\n"), format!("err{i}\n")])
            .collect();
        assert_eq!(lines.len(), expected.len());
        for (index, (got, want)) in lines.iter().zip(&expected).enumerate() {
            assert_eq!(got, want, "line {index} out of order");
        }
    }

    #[test]
    #[cfg(unix)]
    fn test_spawn_merged_signal_exit_code() {
        let spec = CommandSpec::new("sh").args(["-c", "kill -9 $$"]);

        let mut output = spawn_merged(&spec).unwrap();
        assert_eq!(output.lines().count(), 0);

        assert_eq!(output.wait().unwrap(), 128 + 9);
    }

    #[test]
    #[cfg(unix)]
    fn test_kill_stops_and_reaps_child() {
        let spec = CommandSpec::new("sh").args(["-c", "echo started; exec sleep 30"]);

        let mut output = spawn_merged(&spec).unwrap();
        let first = output.lines().next().unwrap().unwrap();
        assert_eq!(first, b"started\n");

        let started = std::time::Instant::now();
        assert_eq!(output.kill().unwrap(), 128 + 9);
        assert!(started.elapsed() < std::time::Duration::from_secs(10));
    }
}
