//! Directory-chain and executable-path search

use std::ffi::OsStr;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::Error;

/// Find the closest directory, starting at `start` and walking up, that contains `item`
///
/// `item` may be a nested relative path such as `llvm/.git`. Returns the
/// directory containing it, or `None` once the filesystem root has been
/// checked.
///
/// # Errors
///
/// Returns [`Error::AbsoluteSearchPath`] if `item` is absolute.
pub fn find_parent_in_parent_chain(
    start: &Path,
    item: impl AsRef<Path>,
) -> Result<Option<PathBuf>, Error> {
    let item = item.as_ref();
    if item.is_absolute() {
        return Err(Error::AbsoluteSearchPath(item.to_path_buf()));
    }

    let mut current = start.to_path_buf();
    loop {
        if current.join(item).exists() {
            debug!(item = %item.display(), dir = %current.display(), "found in parent chain");
            return Ok(Some(current));
        }

        // Move to parent directory
        if !current.pop() {
            return Ok(None);
        }
    }
}

/// Find the parent of a git- or svn-controlled `dir_name` in the parent chain
///
/// Git checkouts are preferred: the whole chain is searched for
/// `dir_name/.git` before `dir_name/.svn` is tried.
///
/// # Errors
///
/// Returns [`Error::AbsoluteSearchPath`] if `dir_name` is absolute.
pub fn find_vcs_controlled_dir(
    start: &Path,
    dir_name: impl AsRef<Path>,
) -> Result<Option<PathBuf>, Error> {
    let dir_name = dir_name.as_ref();
    if let Some(parent) = find_parent_in_parent_chain(start, dir_name.join(".git"))? {
        return Ok(Some(parent));
    }
    find_parent_in_parent_chain(start, dir_name.join(".svn"))
}

/// Find the directory holding the `llvm` checkout at or above `start`
///
/// # Errors
///
/// Returns [`Error::LlvmNotFound`] if there is no controlled `llvm` tree.
pub fn find_llvm_parent(start: &Path) -> Result<PathBuf, Error> {
    find_vcs_controlled_dir(start, "llvm")?.ok_or_else(|| Error::LlvmNotFound(start.to_path_buf()))
}

/// Find `prog` in the directories of a `PATH`-style variable
///
/// Entries are checked in order; the first existing `dir/prog` wins.
#[must_use]
pub fn find_in_executable_path(prog: &str, path_var: Option<&OsStr>) -> Option<PathBuf> {
    let path_var = path_var?;
    std::env::split_paths(path_var)
        .filter(|dir| !dir.as_os_str().is_empty())
        .map(|dir| dir.join(prog))
        .find(|candidate| candidate.exists())
}

/// Text telling the user how to remove a tree, for cut-and-paste
#[must_use]
pub fn remove_tree_hint(path: &Path) -> String {
    format!("You can remove this path with:\nrm -rf {}", path.display())
}
