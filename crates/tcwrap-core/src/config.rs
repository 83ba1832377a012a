//! Configuration file parsing, merging, and validation
//!
//! All settings that the workflow scripts used to keep as module constants
//! (source root, remote host, sync exclusions, tool names) live in one
//! [`ToolConfig`] that is loaded once and passed to each operation.
//!
//! This module handles:
//! - Config file discovery from multiple locations
//! - TOML parsing with serde
//! - Config merging with precedence rules
//! - Validation and error reporting

mod discovery;
mod merge;
mod types;
mod validation;

#[cfg(test)]
mod integration_tests;

pub use discovery::{ConfigDiscovery, ConfigFiles, LOCAL_CONFIG, PROJECT_CONFIG};
pub use merge::ConfigMerger;
pub use types::{
    BuildSettings, DEFAULT_BUILD_DIR, DEFAULT_INSTALL_DIR, RemoteSettings, ToolConfig, ToolNames,
    ToolOverrides,
};
pub use validation::ConfigValidator;

use std::path::Path;

use anyhow::Context;

use crate::error::Result;

/// Configuration manager that coordinates discovery, parsing, merging, and validation
pub struct ConfigManager;

impl ConfigManager {
    /// Load and merge configuration from all sources
    ///
    /// # Errors
    ///
    /// Returns an error if the CLI config file is missing, or if config files
    /// are invalid or cannot be read.
    pub fn load(cli_config_path: Option<&Path>) -> Result<ToolConfig> {
        Self::load_files(&ConfigDiscovery::discover(cli_config_path))
    }

    /// Merge and validate an explicit set of files
    ///
    /// # Errors
    ///
    /// Returns an error if the CLI config file is missing, or if config files
    /// are invalid or cannot be read.
    pub fn load_files(files: &ConfigFiles) -> Result<ToolConfig> {
        if let Some(cli) = &files.cli {
            if !cli.is_file() {
                anyhow::bail!("Config file not found: {}", cli.display());
            }
        }

        // Parse and merge configs
        let merged = ConfigMerger::merge(files)?;

        // Validate the final configuration
        ConfigValidator::validate(&merged)?;

        Ok(merged)
    }

    /// Render a configuration as TOML
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn render(config: &ToolConfig) -> Result<String> {
        toml::to_string_pretty(config).context("Failed to serialize configuration")
    }
}
