//! Configuration types and structures

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Default build directory, relative to the llvm parent
pub const DEFAULT_BUILD_DIR: &str = "build";

/// Default install directory, relative to the llvm parent
pub const DEFAULT_INSTALL_DIR: &str = "install";

/// Names of the external tools one build uses
///
/// Resolved once from [`ToolConfig`] and passed to each operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolNames {
    /// Configure step: `cmake`, or the autoconf script name under `llvm/`
    pub config: String,
    /// Build tool: `ninja` or `make`
    pub make: String,
    /// C compiler
    pub cc: String,
    /// C++ compiler
    pub cxx: String,
    /// Linker
    pub ld: String,
}

impl ToolNames {
    /// Stock tool names for cmake/ninja or configure/make builds
    #[must_use]
    pub fn for_build_system(use_cmake: bool) -> Self {
        let (config, make) = if use_cmake {
            ("cmake", "ninja")
        } else {
            ("configure", "make")
        };
        Self {
            config: config.to_string(),
            make: make.to_string(),
            cc: "gcc".to_string(),
            cxx: "g++".to_string(),
            ld: "ld".to_string(),
        }
    }
}

/// Per-tool overrides from config files
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ToolOverrides {
    /// Configure tool override
    #[serde(skip_serializing_if = "Option::is_none")]
    pub config: Option<String>,
    /// Build tool override
    #[serde(skip_serializing_if = "Option::is_none")]
    pub make: Option<String>,
    /// C compiler override
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cc: Option<String>,
    /// C++ compiler override
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cxx: Option<String>,
    /// Linker override
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ld: Option<String>,
}

/// Build layout settings
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BuildSettings {
    /// Build directory relative to the llvm parent
    #[serde(skip_serializing_if = "Option::is_none")]
    pub build_dir: Option<PathBuf>,
    /// Install directory relative to the llvm parent
    #[serde(skip_serializing_if = "Option::is_none")]
    pub install_dir: Option<PathBuf>,
    /// Configure for cmake/ninja instead of configure/make
    pub use_cmake: bool,
}

impl BuildSettings {
    /// Configured build directory or the default
    #[must_use]
    pub fn build_dir(&self) -> &Path {
        self.build_dir
            .as_deref()
            .unwrap_or_else(|| Path::new(DEFAULT_BUILD_DIR))
    }

    /// Configured install directory or the default
    #[must_use]
    pub fn install_dir(&self) -> &Path {
        self.install_dir
            .as_deref()
            .unwrap_or_else(|| Path::new(DEFAULT_INSTALL_DIR))
    }
}

/// Remote build host settings
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RemoteSettings {
    /// Login user (defaults to `$USER`)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user: Option<String>,
    /// Remote hostname
    #[serde(skip_serializing_if = "Option::is_none")]
    pub host: Option<String>,
    /// Directory on the remote host that mirrors the local checkout
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sync_root: Option<PathBuf>,
    /// Local directory holding `llvm` (defaults to the current directory)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub local_root: Option<PathBuf>,
    /// Remote shell for rsync and remote commands
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ssh_command: Option<String>,
    /// Extra rsync options
    pub sync_options: Vec<String>,
    /// rsync exclude patterns
    pub exclude: Vec<String>,
}

/// Main configuration structure
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ToolConfig {
    /// Directory holding the `llvm` checkout, instead of searching the parent chain
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_root: Option<PathBuf>,

    /// Tool name overrides
    pub tools: ToolOverrides,

    /// Build layout
    pub build: BuildSettings,

    /// Remote build host
    #[serde(skip_serializing_if = "Option::is_none")]
    pub remote: Option<RemoteSettings>,
}

impl ToolConfig {
    /// Resolve tool names for a build system, applying overrides
    #[must_use]
    pub fn tool_names(&self, use_cmake: bool) -> ToolNames {
        let stock = ToolNames::for_build_system(use_cmake);
        let tools = &self.tools;
        ToolNames {
            config: tools.config.clone().unwrap_or(stock.config),
            make: tools.make.clone().unwrap_or(stock.make),
            cc: tools.cc.clone().unwrap_or(stock.cc),
            cxx: tools.cxx.clone().unwrap_or(stock.cxx),
            ld: tools.ld.clone().unwrap_or(stock.ld),
        }
    }
}
