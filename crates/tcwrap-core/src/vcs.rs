//! Git and svn helpers for the llvm/clang/lldb checkout layout
//!
//! Each helper changes into the working tree, echoing the `cd`, and echoes
//! the git or svn command before running it.

use std::path::{Path, PathBuf};

use anyhow::bail;

use crate::error::{Error, Result};
use crate::paths::find_parent_in_parent_chain;
use crate::process::{CommandSpec, run_echoed};
use crate::workdir::WorkingDir;

/// Remote used by `pull` unless overridden
pub const DEFAULT_REMOTE: &str = "origin";

/// Branch mapping used by `pull` unless overridden
pub const DEFAULT_BRANCH_MAPPING: &str = "master:master";

/// Repository in the checkout layout
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Checkout {
    /// `llvm`
    #[default]
    Llvm,
    /// `llvm/tools/clang`
    Clang,
    /// `llvm/tools/lldb`
    Lldb,
}

impl Checkout {
    /// Every repository, in clone order
    pub const ALL: [Self; 3] = [Self::Llvm, Self::Clang, Self::Lldb];

    /// Repository name
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Llvm => "llvm",
            Self::Clang => "clang",
            Self::Lldb => "lldb",
        }
    }

    /// Location relative to the llvm parent
    #[must_use]
    pub fn relative_path(self) -> PathBuf {
        match self {
            Self::Llvm => PathBuf::from("llvm"),
            Self::Clang | Self::Lldb => Path::new("llvm").join("tools").join(self.name()),
        }
    }

    /// Directory the repository is cloned into, relative to the llvm parent
    #[must_use]
    pub fn clone_parent(self) -> PathBuf {
        match self {
            Self::Llvm => PathBuf::from("."),
            Self::Clang | Self::Lldb => Path::new("llvm").join("tools"),
        }
    }

    /// Project path under the llvm svn repository root
    #[must_use]
    pub const fn svn_project(self) -> &'static str {
        match self {
            Self::Llvm => "llvm",
            Self::Clang => "cfe",
            Self::Lldb => "lldb",
        }
    }

    /// Find the closest git working tree of this repository at or above `start`
    ///
    /// Returns the repository directory itself.
    ///
    /// # Errors
    ///
    /// Returns [`Error::LlvmNotFound`] if no such tree exists.
    pub fn locate(self, start: &Path) -> Result<PathBuf, Error> {
        let relative = self.relative_path();
        find_parent_in_parent_chain(start, relative.join(".git"))?
            .map(|parent| parent.join(&relative))
            .ok_or_else(|| Error::LlvmNotFound(start.to_path_buf()))
    }
}

/// `git pull <remote> <branch_mapping>` inside `dir`
///
/// # Errors
///
/// Returns an error if `dir` or `remote` is empty, `dir` cannot be entered,
/// or git cannot be started.
pub fn git_pull(dir: &Path, remote: &str, branch_mapping: &str, dry_run: bool) -> Result<i32> {
    if dir.as_os_str().is_empty() {
        bail!("git pull requires a working tree directory");
    }
    if remote.is_empty() {
        bail!("git pull requires a remote");
    }

    let spec = CommandSpec::new("git").args(["pull", remote, branch_mapping]);
    in_directory(dir, &spec, dry_run)
}

/// `git clone <url>` inside `dir`
///
/// # Errors
///
/// Returns an error if `dir` or `url` is empty, `dir` cannot be entered, or
/// git cannot be started.
pub fn git_clone(dir: &Path, url: &str, dry_run: bool) -> Result<i32> {
    if dir.as_os_str().is_empty() {
        bail!("git clone requires a target directory");
    }
    if url.is_empty() {
        bail!("git clone requires a repository URL");
    }

    let spec = CommandSpec::new("git").args(["clone", url]);
    in_directory(dir, &spec, dry_run)
}

/// Clone llvm, clang, and lldb from `<base_url>/<name>` into the standard layout
///
/// Stops at the first failing clone and returns its exit code.
///
/// # Errors
///
/// Returns an error if a clone directory cannot be entered or git cannot be
/// started.
pub fn clone_all(root: &Path, base_url: &str, dry_run: bool) -> Result<i32> {
    let base_url = base_url.trim_end_matches('/');
    for checkout in Checkout::ALL {
        let url = format!("{base_url}/{}", checkout.name());
        let dir = root.join(checkout.clone_parent());
        let code = if dry_run && !dir.exists() {
            println!("cd {}", dir.display());
            run_echoed(&CommandSpec::new("git").args(["clone", url.as_str()]), true)?
        } else {
            git_clone(&dir, &url, dry_run)?
        };
        if code != 0 {
            eprintln!("Error: failed to clone {} (see errors above)", checkout.name());
            return Ok(code);
        }
    }
    Ok(0)
}

/// Run `svn <subcommand>` in llvm, clang, and lldb under `root`
///
/// Every repository is visited even after a failure, so one status run
/// shows all three trees. Returns the first nonzero exit code.
///
/// # Errors
///
/// Returns an error if a repository directory cannot be entered or svn
/// cannot be started.
pub fn svn_each(root: &Path, subcommand: &str, dry_run: bool) -> Result<i32> {
    run_in_each(root, &CommandSpec::new("svn").arg(subcommand), dry_run)
}

fn run_in_each(root: &Path, spec: &CommandSpec, dry_run: bool) -> Result<i32> {
    let mut first_failure = 0;
    for checkout in Checkout::ALL {
        let code = in_directory(&root.join(checkout.relative_path()), spec, dry_run)?;
        if code != 0 {
            eprintln!("Error: {spec} failed in {} (see errors above)", checkout.name());
            if first_failure == 0 {
                first_failure = code;
            }
        }
    }
    Ok(first_failure)
}

/// `svn update` in every repository under `root`
///
/// # Errors
///
/// See [`svn_each`].
pub fn svn_update(root: &Path, dry_run: bool) -> Result<i32> {
    svn_each(root, "update", dry_run)
}

/// `svn status` in every repository under `root`
///
/// # Errors
///
/// See [`svn_each`].
pub fn svn_status(root: &Path, dry_run: bool) -> Result<i32> {
    svn_each(root, "status", dry_run)
}

/// Check out llvm, clang, and lldb trunk from `<repo_url>/<project>/trunk`
///
/// Stops at the first failing checkout and returns its exit code.
///
/// # Errors
///
/// Returns an error if `repo_url` is empty, a checkout directory cannot be
/// entered, or svn cannot be started.
pub fn svn_checkout_all(root: &Path, repo_url: &str, dry_run: bool) -> Result<i32> {
    if repo_url.is_empty() {
        bail!("svn checkout requires a repository URL");
    }
    let repo_url = repo_url.trim_end_matches('/');
    for checkout in Checkout::ALL {
        let url = format!("{repo_url}/{}/trunk", checkout.svn_project());
        let spec = CommandSpec::new("svn").args(["checkout", url.as_str(), checkout.name()]);
        let dir = root.join(checkout.clone_parent());
        let code = if dry_run && !dir.exists() {
            println!("cd {}", dir.display());
            run_echoed(&spec, true)?
        } else {
            in_directory(&dir, &spec, dry_run)?
        };
        if code != 0 {
            eprintln!("Error: failed to check out {} (see errors above)", checkout.name());
            return Ok(code);
        }
    }
    Ok(0)
}

fn in_directory(dir: &Path, spec: &CommandSpec, dry_run: bool) -> Result<i32> {
    let _cwd = WorkingDir::enter(dir, true)?;
    run_echoed(spec, dry_run)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::cwd_lock;
    use std::fs;
    use tempfile::TempDir;

    fn layout() -> TempDir {
        let tmp = TempDir::new().unwrap();
        fs::create_dir_all(tmp.path().join("llvm/.git")).unwrap();
        fs::create_dir_all(tmp.path().join("llvm/tools/clang/.git")).unwrap();
        fs::create_dir_all(tmp.path().join("llvm/tools/lldb/source")).unwrap();
        tmp
    }

    #[test]
    fn test_relative_paths() {
        assert_eq!(Checkout::Llvm.relative_path(), PathBuf::from("llvm"));
        assert_eq!(Checkout::Clang.relative_path(), PathBuf::from("llvm/tools/clang"));
        assert_eq!(Checkout::Lldb.clone_parent(), PathBuf::from("llvm/tools"));
    }

    #[test]
    fn test_locate_from_nested_dir() {
        let tmp = layout();
        let start = tmp.path().join("llvm/tools/lldb/source");

        assert_eq!(Checkout::Llvm.locate(&start).unwrap(), tmp.path().join("llvm"));
        assert_eq!(
            Checkout::Clang.locate(&start).unwrap(),
            tmp.path().join("llvm/tools/clang")
        );
    }

    #[test]
    fn test_locate_missing_repository() {
        let tmp = layout();
        let result = Checkout::Lldb.locate(tmp.path());
        assert!(matches!(result, Err(Error::LlvmNotFound(_))));
    }

    #[test]
    fn test_empty_arguments_rejected() {
        assert!(git_pull(Path::new(""), "origin", "master:master", true).is_err());
        assert!(git_pull(Path::new("/tmp"), "", "master:master", true).is_err());
        assert!(git_clone(Path::new("/tmp"), "", true).is_err());
        assert!(git_clone(Path::new(""), "https://example.com/llvm", true).is_err());
    }

    #[test]
    fn test_pull_dry_run_restores_cwd() {
        let _lock = cwd_lock();
        let tmp = layout();
        let before = std::env::current_dir().unwrap();

        let code = git_pull(
            &tmp.path().join("llvm"),
            DEFAULT_REMOTE,
            DEFAULT_BRANCH_MAPPING,
            true,
        )
        .unwrap();

        assert_eq!(code, 0);
        assert_eq!(std::env::current_dir().unwrap(), before);
    }

    #[test]
    fn test_pull_missing_dir() {
        let _lock = cwd_lock();
        let tmp = TempDir::new().unwrap();

        let result = git_pull(&tmp.path().join("gone"), "origin", "master:master", true);

        assert!(result.is_err());
    }

    #[test]
    fn test_svn_projects() {
        let projects: Vec<_> = Checkout::ALL.iter().map(|c| c.svn_project()).collect();
        assert_eq!(projects, vec!["llvm", "cfe", "lldb"]);
    }

    #[test]
    fn test_svn_update_dry_run_visits_every_tree() {
        let _lock = cwd_lock();
        let tmp = layout();
        let before = std::env::current_dir().unwrap();

        assert_eq!(svn_update(tmp.path(), true).unwrap(), 0);
        assert_eq!(svn_status(tmp.path(), true).unwrap(), 0);

        assert_eq!(std::env::current_dir().unwrap(), before);
    }

    #[test]
    fn test_svn_status_missing_tree() {
        let _lock = cwd_lock();
        let tmp = TempDir::new().unwrap();
        fs::create_dir_all(tmp.path().join("llvm/tools/clang")).unwrap();

        let result = svn_status(tmp.path(), true);

        assert!(result.is_err());
    }

    #[test]
    #[cfg(unix)]
    fn test_failure_in_one_tree_keeps_going() {
        let _lock = cwd_lock();
        let tmp = layout();
        // Fails only in clang; the marker shows lldb was still visited
        let spec = CommandSpec::new("sh").args([
            "-c",
            "[ \"$(basename \"$(pwd)\")\" = clang ] && exit 5; touch visited",
        ]);

        let code = run_in_each(tmp.path(), &spec, false).unwrap();

        assert_eq!(code, 5);
        assert!(tmp.path().join("llvm/visited").exists());
        assert!(tmp.path().join("llvm/tools/lldb/visited").exists());
    }

    #[test]
    fn test_svn_checkout_dry_run() {
        let _lock = cwd_lock();
        let tmp = TempDir::new().unwrap();

        let code = svn_checkout_all(tmp.path(), "https://dev@llvm.org/svn/llvm-project/", true).unwrap();

        assert_eq!(code, 0);
        assert!(!tmp.path().join("llvm").exists());
        assert!(svn_checkout_all(tmp.path(), "", true).is_err());
    }

    #[test]
    fn test_clone_all_dry_run() {
        let _lock = cwd_lock();
        let tmp = TempDir::new().unwrap();
        let before = std::env::current_dir().unwrap();

        let code = clone_all(tmp.path(), "https://example.com/lldb/", true).unwrap();

        assert_eq!(code, 0);
        assert!(!tmp.path().join("llvm").exists());
        assert_eq!(std::env::current_dir().unwrap(), before);
    }
}
