use std::path::PathBuf;

/// Result type alias defaulting to `anyhow::Error`
pub type Result<T, E = anyhow::Error> = std::result::Result<T, E>;

/// Failures callers may want to match on
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Parent-chain search was given an absolute path
    #[error("parent chain search takes a relative path, got {}", .0.display())]
    AbsoluteSearchPath(PathBuf),

    /// No llvm checkout above the starting directory
    #[error("no llvm directory found in parent chain of {}", .0.display())]
    LlvmNotFound(PathBuf),

    /// Directory that must be created fresh already exists
    #[error("{kind} directory must not already exist: {}", .path.display())]
    DirectoryExists {
        /// "build", "install", or "coverage report"
        kind: &'static str,
        /// Offending path
        path: PathBuf,
    },

    /// External command exited unsuccessfully
    #[error("{command} failed with exit code {code}")]
    CommandFailed {
        /// Command line as echoed to the user
        command: String,
        /// Exit code (128+signal when killed)
        code: i32,
    },

    /// Mutually exclusive build options were requested
    #[error("incompatible build options: {0}")]
    IncompatibleOptions(String),

    /// A setting required by the command is not configured
    #[error("missing setting '{0}' (set it in a config file)")]
    MissingSetting(&'static str),

    /// A required external tool is not on `PATH`
    #[error("{tool} not found on PATH (hint: {hint})")]
    ToolNotFound {
        /// Program name
        tool: String,
        /// How to get it
        hint: &'static str,
    },

    /// Redaction pattern is unusable
    #[error("invalid warning pattern: {0}")]
    InvalidPattern(String),
}
