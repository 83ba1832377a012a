//! Configuration file discovery from multiple locations

use std::path::{Path, PathBuf};

use crate::paths::find_parent_in_parent_chain;

/// Project config file name
pub const PROJECT_CONFIG: &str = ".tcwrap.toml";

/// Personal, uncommitted project config file name
pub const LOCAL_CONFIG: &str = ".tcwrap.local.toml";

/// Configuration file locations in order of precedence
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ConfigFiles {
    /// Config from CLI flag (highest precedence)
    pub cli: Option<PathBuf>,
    /// Project-local config (.tcwrap.local.toml)
    pub local: Option<PathBuf>,
    /// Project config (.tcwrap.toml)
    pub project: Option<PathBuf>,
    /// Global XDG config
    pub global: Option<PathBuf>,
}

impl ConfigFiles {
    /// Files that were found, lowest precedence first
    pub fn in_merge_order(&self) -> impl Iterator<Item = &Path> {
        [&self.global, &self.project, &self.local, &self.cli]
            .into_iter()
            .filter_map(|p| p.as_deref())
    }
}

/// Config file discovery
pub struct ConfigDiscovery;

impl ConfigDiscovery {
    /// Discover configuration files relative to the current directory
    ///
    /// Returns a `ConfigFiles` struct with paths to discovered configs.
    #[must_use]
    pub fn discover(cli_path: Option<&Path>) -> ConfigFiles {
        match std::env::current_dir() {
            Ok(cwd) => Self::discover_from(&cwd, cli_path, dirs::config_dir().as_deref()),
            Err(_) => ConfigFiles {
                cli: cli_path.map(Path::to_path_buf),
                ..ConfigFiles::default()
            },
        }
    }

    /// Discover configuration files starting at `start`
    ///
    /// The CLI path is kept as given, even if missing, so loading can report it.
    #[must_use]
    pub fn discover_from(
        start: &Path,
        cli_path: Option<&Path>,
        config_dir: Option<&Path>,
    ) -> ConfigFiles {
        ConfigFiles {
            cli: cli_path.map(Path::to_path_buf),
            local: Self::find_file(start, LOCAL_CONFIG),
            project: Self::find_file(start, PROJECT_CONFIG),
            global: config_dir.and_then(Self::find_global_config),
        }
    }

    /// Find a config file in `start` or its parent directories
    fn find_file(start: &Path, name: &str) -> Option<PathBuf> {
        let dir = find_parent_in_parent_chain(start, name).ok()??;
        let candidate = dir.join(name);
        candidate.is_file().then_some(candidate)
    }

    /// Find global config in the XDG config directory
    fn find_global_config(config_dir: &Path) -> Option<PathBuf> {
        let global_config = config_dir.join("tcwrap").join("config.toml");
        global_config.is_file().then_some(global_config)
    }
}
