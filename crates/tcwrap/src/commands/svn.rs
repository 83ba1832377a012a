use std::path::Path;

use tcwrap_core::paths::find_llvm_parent;
use tcwrap_core::vcs::{svn_checkout_all, svn_status, svn_update};

use super::CommandOptions;
use crate::cli::SvnAction;

pub struct Svn;

impl Svn {
    /// Returns svn's first nonzero exit code, or 0
    pub fn execute(action: &SvnAction, options: &CommandOptions<'_>) -> anyhow::Result<i32> {
        let cwd = std::env::current_dir()?;

        let run: fn(&Path, bool) -> anyhow::Result<i32> = match action {
            SvnAction::Update => svn_update,
            SvnAction::Status => svn_status,
            SvnAction::Checkout { repo_url } => {
                if options.verbose {
                    println!("Executing svn checkout");
                    println!("Repository: {repo_url}");
                    println!("Into: {}", cwd.display());
                }
                return svn_checkout_all(&cwd, repo_url, options.dry_run);
            }
        };

        let config = options.load_config()?;
        let root = match &config.source_root {
            Some(root) => root.clone(),
            None => find_llvm_parent(&cwd)?,
        };

        if options.verbose {
            println!("Executing svn command");
            println!("Checkout: {}", root.display());
        }

        run(&root, options.dry_run)
    }
}
