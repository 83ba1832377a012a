use tcwrap_core::config::{ConfigDiscovery, ConfigManager};

use super::CommandOptions;

pub struct Config;

impl Config {
    pub fn execute(options: &CommandOptions<'_>) -> anyhow::Result<()> {
        if options.verbose {
            println!("Executing config command");
            if options.no_config {
                println!("Config files: none (--no-config)");
            } else {
                let files = ConfigDiscovery::discover(options.config_path);
                println!("Config files (lowest precedence first):");
                for path in files.in_merge_order() {
                    println!("  {}", path.display());
                }
            }
        }

        let config = options.load_config()?;
        print!("{}", ConfigManager::render(&config)?);
        Ok(())
    }
}
