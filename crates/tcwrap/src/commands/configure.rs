use tcwrap_core::build::{BuildFlavor, ConfigureOptions, execute_configure, prepare_configure};

use super::CommandOptions;
use crate::cli::{ConfigureArgs, Flavor};

pub struct Configure;

impl Configure {
    pub fn execute(args: &ConfigureArgs, options: &CommandOptions<'_>) -> anyhow::Result<()> {
        let config = options.load_config()?;
        let use_cmake = args.cmake || config.build.use_cmake;
        let tools = config.tool_names(use_cmake);

        let configure_options = ConfigureOptions {
            use_cmake,
            build_dir: args
                .build_dir
                .clone()
                .unwrap_or_else(|| config.build.build_dir().to_path_buf()),
            install_dir: args
                .install_dir
                .clone()
                .unwrap_or_else(|| config.build.install_dir().to_path_buf()),
            flavor: match args.flavor {
                Flavor::Debug => BuildFlavor::Debug,
                Flavor::Release => BuildFlavor::Release,
                Flavor::ReleaseDebug => BuildFlavor::ReleaseDebug,
            },
            coverage: args.coverage,
            stock_libedit: args.stock_libedit,
            python_dir: args.python_dir.clone(),
            libedit_root: args.libedit_dir.clone(),
        };

        if options.verbose {
            println!("Executing configure command");
            println!("Options: {configure_options:?}");
            println!("Tools: {tools:?}");
        }

        let cwd = std::env::current_dir()?;
        let path_var = std::env::var_os("PATH");
        let plan = prepare_configure(
            &configure_options,
            &tools,
            &cwd,
            config.source_root.as_deref(),
            path_var.as_deref(),
        )?;

        execute_configure(&plan, options.dry_run)
    }
}
