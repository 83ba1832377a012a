//! Sync a local checkout to a remote host and build it there
//!
//! The remote build runs four steps: rsync `llvm`, rsync the lldb tree into
//! `llvm/tools`, configure with cmake (a no-op failure once configured), and
//! build with ninja. Build output is streamed back with remote source paths
//! rewritten to local-relative ones.

use std::borrow::Cow;
use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::Context;
use regex::bytes::Regex;
use tracing::{info, warn};

use crate::config::RemoteSettings;
use crate::error::{Error, Result};
use crate::process::{CommandSpec, MergedOutput, run_checked, run_echoed, spawn_merged};

const DEFAULT_SYNC_OPTIONS: [&str; 1] = ["-avzh"];
const DEFAULT_EXCLUDES: [&str; 4] = [
    "DerivedData",
    ".svn",
    ".git",
    "llvm-build/Release+Asserts",
];

/// Resolved remote build settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteConfig {
    /// Login user
    pub user: String,
    /// Remote hostname
    pub host: String,
    /// Remote directory mirroring the local checkout
    pub sync_root: PathBuf,
    /// Local lldb checkout holding `llvm/`
    pub local_root: PathBuf,
    /// Remote shell
    pub ssh_command: String,
    /// rsync options, before the remote shell option
    pub sync_options: Vec<String>,
    /// rsync exclude patterns
    pub exclude: Vec<String>,
}

impl RemoteConfig {
    /// Resolve settings, filling in defaults
    ///
    /// The user falls back to `$USER` (or `$USERNAME`) and the local root to
    /// `cwd`. Empty option and exclude lists get the stock values.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MissingSetting`] if the host, sync root, or user
    /// cannot be determined.
    pub fn from_settings(settings: &RemoteSettings, cwd: &Path) -> Result<Self, Error> {
        let host = settings
            .host
            .clone()
            .ok_or(Error::MissingSetting("remote.host"))?;
        let sync_root = settings
            .sync_root
            .clone()
            .ok_or(Error::MissingSetting("remote.sync_root"))?;
        let user = settings
            .user
            .clone()
            .or_else(|| std::env::var("USER").ok())
            .or_else(|| std::env::var("USERNAME").ok())
            .filter(|user| !user.is_empty())
            .ok_or(Error::MissingSetting("remote.user"))?;

        let sync_options = if settings.sync_options.is_empty() {
            DEFAULT_SYNC_OPTIONS.iter().map(ToString::to_string).collect()
        } else {
            settings.sync_options.clone()
        };
        let exclude = if settings.exclude.is_empty() {
            DEFAULT_EXCLUDES.iter().map(ToString::to_string).collect()
        } else {
            settings.exclude.clone()
        };

        Ok(Self {
            user,
            host,
            sync_root,
            local_root: settings
                .local_root
                .clone()
                .unwrap_or_else(|| cwd.to_path_buf()),
            ssh_command: settings
                .ssh_command
                .clone()
                .unwrap_or_else(|| "ssh".to_string()),
            sync_options,
            exclude,
        })
    }

    /// `user@host`
    #[must_use]
    pub fn destination(&self) -> String {
        format!("{}@{}", self.user, self.host)
    }

    fn rsync(&self) -> CommandSpec {
        CommandSpec::new("rsync")
            .args(self.sync_options.iter().cloned())
            .args(["-e".to_string(), self.ssh_command.clone()])
            .args(self.exclude.iter().map(|pattern| format!("--exclude={pattern}")))
    }

    fn remote_path(&self, path: &Path) -> String {
        format!("{}:{}", self.destination(), path.display())
    }

    fn ssh_in(&self, dir: &Path) -> CommandSpec {
        CommandSpec::new(&self.ssh_command)
            .arg(self.destination())
            .args(["cd".to_string(), dir.display().to_string(), "&&".to_string()])
    }

    /// rsync the local `llvm` tree to the sync root
    #[must_use]
    pub fn sync_llvm_command(&self) -> CommandSpec {
        self.rsync()
            .arg(self.local_root.join("llvm").display().to_string())
            .arg(self.remote_path(&self.sync_root))
    }

    /// rsync the lldb tree to `llvm/tools` on the remote, skipping its `llvm`
    #[must_use]
    pub fn sync_lldb_command(&self) -> CommandSpec {
        self.rsync()
            .arg("--exclude=/lldb/llvm")
            .arg(self.local_root.display().to_string())
            .arg(self.remote_path(&self.sync_root.join("llvm").join("tools")))
    }

    /// Configure a cmake build on the remote
    ///
    /// `llvm/.git` is touched so the remote configure finds a controlled tree.
    #[must_use]
    pub fn configure_command(&self) -> CommandSpec {
        self.ssh_in(&self.sync_root).args([
            "touch",
            "llvm/.git",
            "&&",
            "tcwrap",
            "configure",
            "--cmake",
        ])
    }

    /// Run ninja in the remote build directory
    #[must_use]
    pub fn build_command(&self) -> CommandSpec {
        self.ssh_in(&self.sync_root.join("build")).arg("ninja")
    }

    /// Rewriter for remote lldb paths in build output
    #[must_use]
    pub fn prefix_stripper(&self) -> RemotePrefix {
        RemotePrefix::new(&self.sync_root)
    }
}

/// Remote `<sync_root>/llvm/tools/lldb/` prefix to strip from build output
#[derive(Debug, Clone)]
pub struct RemotePrefix {
    pattern: Regex,
}

impl RemotePrefix {
    /// Prefix under `sync_root`
    #[must_use]
    pub fn new(sync_root: &Path) -> Self {
        let prefix = sync_root.join("llvm").join("tools").join("lldb");
        let literal = format!("{}/", prefix.display());
        let pattern = Regex::new(&regex::escape(&literal))
            .expect("escaped literal is a valid pattern");
        Self { pattern }
    }

    /// Remove every occurrence of the prefix from `line`
    #[must_use]
    pub fn strip<'h>(&self, line: &'h [u8]) -> Cow<'h, [u8]> {
        self.pattern.replace_all(line, &b""[..])
    }
}

/// Run the full remote build, streaming build output to `console`
///
/// Sync failures stop the run. A failed configure is reported and the build
/// continues, since configure refuses an existing build directory.
/// Returns the remote build's exit code.
///
/// # Errors
///
/// Returns an error if a sync step fails or a command cannot be started.
pub fn run_remote_build(
    config: &RemoteConfig,
    dry_run: bool,
    console: &mut dyn Write,
) -> Result<i32> {
    run_checked(&config.sync_llvm_command(), dry_run).context("Failed to sync llvm")?;
    run_checked(&config.sync_lldb_command(), dry_run).context("Failed to sync lldb")?;

    let code = run_echoed(&config.configure_command(), dry_run)?;
    if code != 0 {
        warn!(code, "remote configure failed; assuming an existing build directory");
    }

    let build = config.build_command();
    println!("{build}");
    if dry_run {
        return Ok(0);
    }

    info!(host = %config.host, "starting remote build");
    let stripper = config.prefix_stripper();
    let mut output = spawn_merged(&build)?;
    if let Err(err) = stream_stripped(&mut output, &stripper, console) {
        if let Err(kill_err) = output.kill() {
            warn!(error = %kill_err, "failed to stop remote build");
        }
        return Err(err);
    }

    output.wait()
}

fn stream_stripped(
    output: &mut MergedOutput,
    stripper: &RemotePrefix,
    console: &mut dyn Write,
) -> Result<()> {
    for line in output.lines() {
        let line = line.context("Failed to read remote build output")?;
        console
            .write_all(&stripper.strip(&line))
            .context("Failed to write build output")?;
    }
    console.flush().context("Failed to write build output")
}
