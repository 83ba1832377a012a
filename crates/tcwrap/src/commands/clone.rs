use tcwrap_core::vcs::clone_all;

use super::CommandOptions;

pub struct CloneAll;

impl CloneAll {
    /// Returns the exit code of the first failing clone, or 0
    pub fn execute(base_url: &str, options: &CommandOptions<'_>) -> anyhow::Result<i32> {
        let root = std::env::current_dir()?;

        if options.verbose {
            println!("Executing clone command");
            println!("Base URL: {base_url}");
            println!("Into: {}", root.display());
        }

        clone_all(&root, base_url, options.dry_run)
    }
}
