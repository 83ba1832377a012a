
use tcwrap_core::build::{CoverageOptions, check_coverage_tools, coverage_plan, run_coverage};
use tcwrap_core::paths::find_llvm_parent;

use super::CommandOptions;
use crate::cli::CoverageArgs;

pub struct Coverage;

impl Coverage {
    pub fn execute(args: &CoverageArgs, options: &CommandOptions<'_>) -> anyhow::Result<()> {
        let config = options.load_config()?;
        let use_cmake = args.cmake || config.build.use_cmake;
        let tools = config.tool_names(use_cmake);

        let build_dir = match &args.build_dir {
            Some(dir) => dir.clone(),
            None => {
                let llvm_parent = match &config.source_root {
                    Some(root) => root.clone(),
                    None => find_llvm_parent(&std::env::current_dir()?)?,
                };
                llvm_parent.join(config.build.build_dir())
            }
        };

        let coverage_options = CoverageOptions {
            build_dir,
            report_dir: args.output_dir.clone(),
            use_cmake,
            lcov: args.lcov.clone(),
            genhtml: args.genhtml.clone(),
        };

        if options.verbose {
            println!("Executing coverage command");
            println!("Options: {coverage_options:?}");
        }

        if !options.dry_run {
            let path_var = std::env::var_os("PATH");
            check_coverage_tools(&coverage_options, path_var.as_deref())?;
        }

        let plan = coverage_plan(&coverage_options, &tools);
        run_coverage(&plan, options.dry_run)?;

        println!("Coverage report: {}", plan.report_dir.display());
        Ok(())
    }
}
