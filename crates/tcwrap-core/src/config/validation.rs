//! Configuration validation and error reporting

use super::types::ToolConfig;
use crate::error::Result;

/// Configuration validator
pub struct ConfigValidator;

impl ConfigValidator {
    /// Validate a configuration
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid.
    pub fn validate(config: &ToolConfig) -> Result<()> {
        let tools = &config.tools;
        for (name, value) in [
            ("config", &tools.config),
            ("make", &tools.make),
            ("cc", &tools.cc),
            ("cxx", &tools.cxx),
            ("ld", &tools.ld),
        ] {
            if let Some(value) = value {
                if value.trim().is_empty() {
                    anyhow::bail!("Tool name for '{name}' cannot be empty");
                }
                if value.chars().any(char::is_whitespace) {
                    anyhow::bail!("Tool name for '{name}' cannot contain whitespace: {value:?}");
                }
            }
        }

        if config
            .build
            .build_dir
            .as_ref()
            .is_some_and(|dir| dir.as_os_str().is_empty())
        {
            anyhow::bail!("Build directory cannot be empty");
        }

        if config
            .build
            .install_dir
            .as_ref()
            .is_some_and(|dir| dir.as_os_str().is_empty())
        {
            anyhow::bail!("Install directory cannot be empty");
        }

        if let Some(remote) = &config.remote {
            if remote.host.as_ref().is_some_and(|h| h.trim().is_empty()) {
                anyhow::bail!("Remote host cannot be empty");
            }

            for (idx, pattern) in remote.exclude.iter().enumerate() {
                if pattern.trim().is_empty() {
                    anyhow::bail!("Remote exclude #{} cannot be empty", idx + 1);
                }
            }
        }

        Ok(())
    }
}
