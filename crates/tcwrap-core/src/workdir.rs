//! Scoped working directory changes
//!
//! [`WorkingDir`] changes the process working directory for as long as the
//! guard lives and restores the original directory when it is dropped, on
//! normal return, `?` propagation, or panic unwinding alike.
//!
//! The working directory is process-wide state: guards must not be held by
//! more than one thread at a time.

use std::env;
use std::path::{Path, PathBuf};

use anyhow::Context;
use tracing::{debug, warn};

use crate::error::Result;

/// Guard that restores the previous working directory on drop
#[derive(Debug)]
pub struct WorkingDir {
    original: PathBuf,
    target: PathBuf,
    echo: bool,
}

impl WorkingDir {
    /// Change into `target`, remembering the current directory
    ///
    /// With `echo`, prints `cd <dir>` for each change (except into `.`).
    ///
    /// # Errors
    ///
    /// Returns an error if the current directory cannot be read or `target`
    /// cannot be entered. Nothing is changed in that case.
    pub fn enter(target: impl AsRef<Path>, echo: bool) -> Result<Self> {
        let target = target.as_ref().to_path_buf();
        let original = env::current_dir().context("Failed to get current directory")?;

        if original != target {
            if echo && target != Path::new(".") {
                println!("cd {}", target.display());
            }
            env::set_current_dir(&target)
                .with_context(|| format!("Failed to change directory to {}", target.display()))?;
            debug!(from = %original.display(), to = %target.display(), "entered directory");
        }

        Ok(Self {
            original,
            target,
            echo,
        })
    }

    /// Directory that will be restored
    #[must_use]
    pub fn original(&self) -> &Path {
        &self.original
    }

    /// Directory that was entered
    #[must_use]
    pub fn target(&self) -> &Path {
        &self.target
    }
}

impl Drop for WorkingDir {
    fn drop(&mut self) {
        if self.original == self.target {
            return;
        }
        if self.echo && self.target != Path::new(".") {
            println!("cd {}", self.original.display());
        }
        if let Err(e) = env::set_current_dir(&self.original) {
            warn!(dir = %self.original.display(), error = %e, "failed to restore working directory");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::cwd_lock;
    use std::fs;
    use tempfile::TempDir;

    fn canonical_cwd() -> PathBuf {
        dunce::canonicalize(env::current_dir().unwrap()).unwrap()
    }

    #[test]
    fn test_enter_and_restore() {
        let _lock = cwd_lock();
        let tmp = TempDir::new().unwrap();
        let before = canonical_cwd();

        {
            let guard = WorkingDir::enter(tmp.path(), false).unwrap();
            assert_eq!(canonical_cwd(), dunce::canonicalize(tmp.path()).unwrap());
            assert_eq!(guard.target(), tmp.path());
        }

        assert_eq!(canonical_cwd(), before);
    }

    #[test]
    fn test_restore_on_early_error() {
        let _lock = cwd_lock();
        let tmp = TempDir::new().unwrap();
        let before = canonical_cwd();

        let run = || -> Result<()> {
            let _guard = WorkingDir::enter(tmp.path(), false)?;
            anyhow::bail!("build step failed");
        };

        assert!(run().is_err());
        assert_eq!(canonical_cwd(), before);
    }

    #[test]
    fn test_restore_on_panic() {
        let _lock = cwd_lock();
        let tmp = TempDir::new().unwrap();
        let before = canonical_cwd();
        let target = tmp.path().to_path_buf();

        let result = std::panic::catch_unwind(move || {
            let _guard = WorkingDir::enter(&target, false).unwrap();
            panic!("boom");
        });

        assert!(result.is_err());
        assert_eq!(canonical_cwd(), before);
    }

    #[test]
    fn test_nested_guards() {
        let _lock = cwd_lock();
        let tmp = TempDir::new().unwrap();
        let inner = tmp.path().join("inner");
        fs::create_dir(&inner).unwrap();
        let before = canonical_cwd();

        {
            let _outer = WorkingDir::enter(tmp.path(), false).unwrap();
            {
                let _inner = WorkingDir::enter("inner", false).unwrap();
                assert_eq!(canonical_cwd(), dunce::canonicalize(&inner).unwrap());
            }
            assert_eq!(canonical_cwd(), dunce::canonicalize(tmp.path()).unwrap());
        }

        assert_eq!(canonical_cwd(), before);
    }

    #[test]
    fn test_missing_target_leaves_cwd_alone() {
        let _lock = cwd_lock();
        let tmp = TempDir::new().unwrap();
        let before = canonical_cwd();

        let result = WorkingDir::enter(tmp.path().join("missing"), false);

        assert!(result.is_err());
        assert!(result
            .unwrap_err()
            .to_string()
            .contains("Failed to change directory"));
        assert_eq!(canonical_cwd(), before);
    }
}
