//! # tcwrap
//!
//! Core library for the toolchain developer-workflow wrappers.
//!
//! This library provides the pieces behind the `tcwrap` commands: the
//! build-log warning redactor, directory helpers, configuration loading,
//! and the plans for configuring, building, and syncing an llvm/clang/lldb
//! checkout.

#![warn(missing_docs)]
#![warn(clippy::all)]

/// Core error types for the tcwrap library
pub mod error;

/// Build-log redaction of known bogus compiler warnings
pub mod redact;

/// Scoped working directory changes
pub mod workdir;

/// Directory-chain and executable-path search
pub mod paths;

/// Configuration file parsing and management
pub mod config;

/// External command specs and runners
pub mod process;

/// Build drivers (make logging, configure)
pub mod build;

/// Remote host sync and build
pub mod remote;

/// Version-control helpers
pub mod vcs;
