use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Toolchain Checkout Workflow Wrapper
///
/// Configure, build, pull, and remote-sync an llvm/clang/lldb checkout, with build logs
/// free of bogus gcc `%p` format warnings
#[derive(Parser, Debug)]
#[command(name = "tcwrap")]
#[command(about, long_about = None, version)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Print commands without running them (dry-run)
    #[arg(long, global = true)]
    pub dry_run: bool,

    /// Use specific config file
    #[arg(long, global = true, value_name = "PATH", conflicts_with = "no_config")]
    pub config: Option<PathBuf>,

    /// Ignore all config files
    #[arg(long, global = true, conflicts_with = "config")]
    pub no_config: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the build tool, logging output to make.log
    Mklog {
        /// Drop bogus `%p` format warnings (raw output goes to make-unfiltered.log)
        #[arg(short, long)]
        filter: bool,

        /// Directory for the log files
        #[arg(long, value_name = "DIR", default_value = ".")]
        log_dir: PathBuf,

        /// Arguments passed to the build tool
        #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
        args: Vec<String>,
    },

    /// Filter build output from stdin to stdout
    Filter {
        /// Warning pattern; its first capture group is the location key
        #[arg(long, value_name = "REGEX")]
        pattern: Option<String>,

        /// Print line counts to stderr when done
        #[arg(long)]
        stats: bool,
    },

    /// Set up a fresh build directory next to the llvm checkout
    Configure(ConfigureArgs),

    /// Pull one repository of the checkout
    Pull {
        /// Repository to pull
        #[arg(value_enum, default_value = "llvm")]
        repo: Repo,

        /// Remote to pull from
        #[arg(long, default_value = "origin")]
        remote: String,

        /// Branch mapping (remote:local)
        #[arg(long, default_value = "master:master")]
        branch_mapping: String,
    },

    /// Clone llvm, clang, and lldb into the standard layout
    Clone {
        /// URL prefix; each repository is cloned from <BASE_URL>/<name>
        base_url: String,
    },

    /// Run the lldb tests under lcov and write an HTML coverage report
    Coverage(CoverageArgs),

    /// Run svn in llvm, clang, and lldb
    Svn {
        #[command(subcommand)]
        action: SvnAction,
    },

    /// Sync the checkout to the remote host and build it there
    SyncRemote,

    /// Show the effective configuration
    Config,
}

#[derive(Subcommand, Debug)]
pub enum SvnAction {
    /// svn update in each repository
    Update,
    /// svn status in each repository
    Status,
    /// Check out llvm, clang, and lldb trunk into the current directory
    Checkout {
        /// Repository root; each project comes from <REPO_URL>/<project>/trunk
        repo_url: String,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum Flavor {
    /// Unoptimized with assertions (default)
    Debug,
    /// Optimized without assertions
    Release,
    /// Optimized with debug info and assertions
    ReleaseDebug,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum Repo {
    /// llvm
    Llvm,
    /// llvm/tools/clang
    Clang,
    /// llvm/tools/lldb
    Lldb,
}

#[derive(Args, Debug)]
#[allow(clippy::struct_excessive_bools)]
pub struct ConfigureArgs {
    /// Configure for cmake/ninja instead of configure/make
    #[arg(short = 'c', long)]
    pub cmake: bool,

    /// Build directory, relative to the llvm parent
    #[arg(short, long, value_name = "DIR")]
    pub build_dir: Option<PathBuf>,

    /// Install directory, relative to the llvm parent
    #[arg(short, long, value_name = "DIR")]
    pub install_dir: Option<PathBuf>,

    /// Optimization level
    #[arg(long, value_enum, default_value = "debug")]
    pub flavor: Flavor,

    /// Instrument the build for code coverage
    #[arg(long)]
    pub coverage: bool,

    /// Use the system libedit instead of the bundled one
    #[arg(long)]
    pub stock_libedit: bool,

    /// Alternate python installation root
    #[arg(long, value_name = "DIR", env = "LLDB_PYTHON_BASE_DIR")]
    pub python_dir: Option<PathBuf>,

    /// Bundled libedit root (holds include/ and <os>-<arch>/lib)
    #[arg(long, value_name = "DIR", env = "LLDB_LIBEDIT_DIR")]
    pub libedit_dir: Option<PathBuf>,
}

#[derive(Args, Debug)]
pub struct CoverageArgs {
    /// Instrumented build directory (default: the configured build directory)
    #[arg(short, long, value_name = "DIR")]
    pub build_dir: Option<PathBuf>,

    /// Run tests assuming cmake/ninja instead of configure/make
    #[arg(short = 'c', long)]
    pub cmake: bool,

    /// Report directory; must not exist yet
    #[arg(short, long, value_name = "DIR", default_value = "coverage-report")]
    pub output_dir: PathBuf,

    /// lcov executable
    #[arg(long, value_name = "PATH", default_value = "lcov")]
    pub lcov: String,

    /// genhtml executable
    #[arg(long, value_name = "PATH", default_value = "genhtml")]
    pub genhtml: String,
}
