use std::io;

use anyhow::Context;
use tcwrap_core::remote::{RemoteConfig, run_remote_build};

use super::CommandOptions;

pub struct SyncRemote;

impl SyncRemote {
    /// Returns the remote build's exit code
    pub fn execute(options: &CommandOptions<'_>) -> anyhow::Result<i32> {
        let config = options.load_config()?;
        let settings = config
            .remote
            .as_ref()
            .context("No [remote] section in the configuration")?;
        let remote = RemoteConfig::from_settings(settings, &std::env::current_dir()?)?;

        if options.verbose {
            println!("Executing sync-remote command");
            println!("Remote: {}:{}", remote.destination(), remote.sync_root.display());
        }

        let stdout = io::stdout();
        let mut console = stdout.lock();
        run_remote_build(&remote, options.dry_run, &mut console)
    }
}
