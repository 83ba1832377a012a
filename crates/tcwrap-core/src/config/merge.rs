//! Configuration merging with precedence rules
//!
//! # Merging Semantics
//!
//! - **Optional values** (paths, tool names, host): the highest-precedence
//!   file that sets a value wins
//! - **Arrays** (rsync options and excludes): additive, lowest precedence first
//! - **Booleans**: OR semantics, if any config sets `true` the result is `true`

use std::fs;
use std::path::Path;

use anyhow::Context;
use tracing::debug;

use super::discovery::ConfigFiles;
use super::types::{RemoteSettings, ToolConfig};
use crate::error::Result;

/// Configuration merger
pub struct ConfigMerger;

impl ConfigMerger {
    /// Merge multiple config files with precedence rules
    ///
    /// Precedence order (highest to lowest):
    /// 1. CLI config
    /// 2. .tcwrap.local.toml
    /// 3. .tcwrap.toml
    /// 4. Global config
    ///
    /// # Errors
    ///
    /// Returns an error if config files cannot be read or parsed.
    pub fn merge(files: &ConfigFiles) -> Result<ToolConfig> {
        let mut merged = ToolConfig::default();

        for path in files.in_merge_order() {
            Self::merge_into(&mut merged, path)?;
        }

        Ok(merged)
    }

    /// Load and merge a single config file into the existing config
    fn merge_into(base: &mut ToolConfig, path: &Path) -> Result<()> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: ToolConfig = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        debug!(path = %path.display(), "loaded config file");
        Self::overlay(base, config);
        Ok(())
    }

    /// Apply `top` over `base`
    pub(crate) fn overlay(base: &mut ToolConfig, top: ToolConfig) {
        overwrite(&mut base.source_root, top.source_root);

        overwrite(&mut base.tools.config, top.tools.config);
        overwrite(&mut base.tools.make, top.tools.make);
        overwrite(&mut base.tools.cc, top.tools.cc);
        overwrite(&mut base.tools.cxx, top.tools.cxx);
        overwrite(&mut base.tools.ld, top.tools.ld);

        overwrite(&mut base.build.build_dir, top.build.build_dir);
        overwrite(&mut base.build.install_dir, top.build.install_dir);
        base.build.use_cmake |= top.build.use_cmake;

        if let Some(top_remote) = top.remote {
            let remote = base.remote.get_or_insert_with(RemoteSettings::default);
            overwrite(&mut remote.user, top_remote.user);
            overwrite(&mut remote.host, top_remote.host);
            overwrite(&mut remote.sync_root, top_remote.sync_root);
            overwrite(&mut remote.local_root, top_remote.local_root);
            overwrite(&mut remote.ssh_command, top_remote.ssh_command);
            remote.sync_options.extend(top_remote.sync_options);
            remote.exclude.extend(top_remote.exclude);
        }
    }
}

fn overwrite<T>(base: &mut Option<T>, top: Option<T>) {
    if top.is_some() {
        *base = top;
    }
}
