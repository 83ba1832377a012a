use std::io;
use std::path::Path;

use tcwrap_core::build::{MklogOptions, run_mklog};
use tcwrap_core::redact::FilterReporter;

use super::CommandOptions;
use super::common::InterruptDeferral;

pub struct Mklog;

impl Mklog {
    /// Returns the build tool's exit code
    pub fn execute(
        filter: bool,
        log_dir: &Path,
        args: &[String],
        options: &CommandOptions<'_>,
    ) -> anyhow::Result<i32> {
        let config = options.load_config()?;
        let tools = config.tool_names(config.build.use_cmake);

        if options.verbose {
            // stdout carries the build output
            eprintln!("Executing mklog command");
            eprintln!("Dry run: {}", options.dry_run);
            eprintln!("Build tool: {}", tools.make);
            eprintln!("Filter: {filter}");
            eprintln!("Log directory: {}", log_dir.display());
        }

        if options.dry_run {
            let mut line = tools.make.clone();
            for arg in args {
                line.push(' ');
                line.push_str(arg);
            }
            println!("[DRY RUN] Would run: {line}");
            return Ok(0);
        }

        let mklog_options = MklogOptions {
            filter,
            log_dir: log_dir.to_path_buf(),
            args: args.to_vec(),
        };
        let stdout = io::stdout();
        let mut console = stdout.lock();
        let outcome = {
            let _deferral = InterruptDeferral::begin();
            run_mklog(&mklog_options, &tools, &mut console)?
        };

        if options.verbose {
            eprint!("{}", FilterReporter::generate_summary(&outcome.stats));
        }

        Ok(outcome.exit_code)
    }
}
