//! Common types and utilities for command execution

use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};

use tcwrap_core::config::{ConfigManager, ToolConfig};

/// Options shared by every command
pub struct CommandOptions<'a> {
    /// Enable verbose output
    pub verbose: bool,
    /// Print commands without running them (dry-run)
    pub dry_run: bool,
    /// Path to custom config file
    pub config_path: Option<&'a Path>,
    /// Skip loading all config files
    pub no_config: bool,
}

impl<'a> CommandOptions<'a> {
    /// Create new command options
    #[must_use]
    pub const fn new(
        verbose: bool,
        dry_run: bool,
        config_path: Option<&'a Path>,
        no_config: bool,
    ) -> Self {
        Self {
            verbose,
            dry_run,
            config_path,
            no_config,
        }
    }

    /// Effective configuration, or the defaults with `--no-config`
    pub fn load_config(&self) -> anyhow::Result<ToolConfig> {
        if self.no_config {
            return Ok(ToolConfig::default());
        }
        ConfigManager::load(self.config_path)
    }
}

static BUILD_OWNS_INTERRUPT: AtomicBool = AtomicBool::new(false);

/// While held, Ctrl+C is left to the running build tool
///
/// The tool shares our process group, so it receives the same SIGINT. It
/// stops, its output drains, and the logs are flushed before we exit with
/// its status.
pub struct InterruptDeferral;

impl InterruptDeferral {
    #[must_use]
    pub fn begin() -> Self {
        BUILD_OWNS_INTERRUPT.store(true, Ordering::SeqCst);
        Self
    }
}

impl Drop for InterruptDeferral {
    fn drop(&mut self) {
        BUILD_OWNS_INTERRUPT.store(false, Ordering::SeqCst);
    }
}

/// Claim a pending interrupt for the build tool
///
/// Only the first Ctrl+C is deferred; a second one exits immediately.
pub fn defer_interrupt() -> bool {
    BUILD_OWNS_INTERRUPT.swap(false, Ordering::SeqCst)
}
