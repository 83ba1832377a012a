use tcwrap_core::vcs::{Checkout, git_pull};

use super::CommandOptions;
use crate::cli::Repo;

pub struct Pull;

impl Pull {
    /// Returns git's exit code
    pub fn execute(
        repo: Repo,
        remote: &str,
        branch_mapping: &str,
        options: &CommandOptions<'_>,
    ) -> anyhow::Result<i32> {
        let config = options.load_config()?;
        let checkout = match repo {
            Repo::Llvm => Checkout::Llvm,
            Repo::Clang => Checkout::Clang,
            Repo::Lldb => Checkout::Lldb,
        };

        let dir = match &config.source_root {
            Some(root) => root.join(checkout.relative_path()),
            None => checkout.locate(&std::env::current_dir()?)?,
        };

        if options.verbose {
            println!("Executing pull command");
            println!("Repository: {}", dir.display());
        }

        let code = git_pull(&dir, remote, branch_mapping, options.dry_run)?;
        if code != 0 {
            eprintln!(
                "Error: Failed to pull {} (see error(s) above)",
                checkout.name()
            );
        }
        Ok(code)
    }
}
