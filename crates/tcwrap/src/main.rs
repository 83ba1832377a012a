mod cli;
mod commands;

use anyhow::Context;
use clap::Parser;
use cli::{Cli, Commands};
use commands::CommandOptions;
use tracing_subscriber::EnvFilter;

fn main() -> anyhow::Result<()> {
    // Set up Ctrl+C handler for graceful interruption
    ctrlc::set_handler(|| {
        if commands::common::defer_interrupt() {
            eprintln!("\n\nInterrupted by user (Ctrl+C), waiting for the build tool to stop");
            return;
        }
        eprintln!("\n\nInterrupted by user (Ctrl+C)");
        std::process::exit(130); // Standard exit code for SIGINT
    })
    .context("Failed to set Ctrl+C handler")?;

    let cli = Cli::parse();
    init_tracing(cli.verbose);
    tracing::debug!(command = ?cli.command, "parsed arguments");

    // stdout of `filter` and `mklog` is the build output
    if cli.verbose && !matches!(cli.command, Commands::Filter { .. } | Commands::Mklog { .. }) {
        println!("Verbose mode enabled");
        println!("Dry run: {}", cli.dry_run);
    }

    let options = CommandOptions::new(
        cli.verbose,
        cli.dry_run,
        cli.config.as_deref(),
        cli.no_config,
    );

    let exit_code = match &cli.command {
        Commands::Mklog {
            filter,
            log_dir,
            args,
        } => commands::Mklog::execute(*filter, log_dir, args, &options)
            .context("Failed to execute mklog command")?,
        Commands::Filter { pattern, stats } => {
            commands::Filter::execute(pattern.as_deref(), *stats, &options)
                .context("Failed to execute filter command")?;
            0
        }
        Commands::Configure(args) => {
            commands::Configure::execute(args, &options)
                .context("Failed to execute configure command")?;
            0
        }
        Commands::Pull {
            repo,
            remote,
            branch_mapping,
        } => commands::Pull::execute(*repo, remote, branch_mapping, &options)
            .context("Failed to execute pull command")?,
        Commands::Clone { base_url } => commands::CloneAll::execute(base_url, &options)
            .context("Failed to execute clone command")?,
        Commands::Coverage(args) => {
            commands::Coverage::execute(args, &options)
                .context("Failed to execute coverage command")?;
            0
        }
        Commands::Svn { action } => commands::Svn::execute(action, &options)
            .context("Failed to execute svn command")?,
        Commands::SyncRemote => commands::SyncRemote::execute(&options)
            .context("Failed to execute sync-remote command")?,
        Commands::Config => {
            commands::Config::execute(&options).context("Failed to execute config command")?;
            0
        }
    };

    if exit_code != 0 {
        std::process::exit(exit_code);
    }

    Ok(())
}

/// Diagnostics go to stderr so stdout carries only command output
fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
