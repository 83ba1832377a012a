//! Configure a fresh build directory
//!
//! Supports both cmake/ninja and the autoconf `configure` script. The build
//! and install directories are placed next to the `llvm` checkout and must
//! not exist yet.

use std::ffi::OsStr;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context;
use tracing::{info, warn};

use crate::config::ToolNames;
use crate::error::{Error, Result};
use crate::paths::{find_in_executable_path, find_llvm_parent, remove_tree_hint};
use crate::process::{CommandSpec, run_checked};
use crate::workdir::WorkingDir;

const COVERAGE_FLAGS: [&str; 2] = ["-fprofile-arcs", "-ftest-coverage"];

/// Optimization and debug-info level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BuildFlavor {
    /// Unoptimized, assertions on
    #[default]
    Debug,
    /// Optimized, assertions off
    Release,
    /// Optimized with debug info and assertions
    ReleaseDebug,
}

impl BuildFlavor {
    /// `CMAKE_BUILD_TYPE` value
    #[must_use]
    pub const fn cmake_build_type(self) -> &'static str {
        match self {
            Self::Debug => "Debug",
            Self::Release => "Release",
            Self::ReleaseDebug => "RelWithDebInfo",
        }
    }

    const fn has_debug_info(self) -> bool {
        !matches!(self, Self::Release)
    }
}

/// What to configure
#[derive(Debug, Clone, Default)]
pub struct ConfigureOptions {
    /// cmake/ninja instead of configure/make
    pub use_cmake: bool,
    /// Build directory, relative to the llvm parent
    pub build_dir: PathBuf,
    /// Install directory, relative to the llvm parent
    pub install_dir: PathBuf,
    /// Optimization level
    pub flavor: BuildFlavor,
    /// Instrument for gcov
    pub coverage: bool,
    /// Use the system libedit instead of the bundled one
    pub stock_libedit: bool,
    /// Alternate python installation root
    pub python_dir: Option<PathBuf>,
    /// Bundled libedit root (holds `include/` and `<platform>/lib`)
    pub libedit_root: Option<PathBuf>,
}

/// Bundled libedit locations
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LibeditDirs {
    /// Header directory
    pub include: PathBuf,
    /// Library directory for this platform
    pub lib: PathBuf,
}

impl LibeditDirs {
    /// Locations under a libedit root for the running platform
    #[must_use]
    pub fn for_platform(root: &Path) -> Self {
        let platform = format!("{}-{}", std::env::consts::OS, std::env::consts::ARCH);
        Self {
            include: root.join("include"),
            lib: root.join(platform).join("lib"),
        }
    }
}

/// A fully resolved configure step
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigurePlan {
    /// Absolute build directory
    pub build_dir: PathBuf,
    /// Absolute install directory
    pub install_dir: PathBuf,
    /// Command to run inside the build directory
    pub command: CommandSpec,
    /// One-line description of the configuration
    pub summary: String,
    /// Bundled libedit in use, if any
    pub libedit: Option<LibeditDirs>,
    /// Custom python root in use, if any
    pub python_dir: Option<PathBuf>,
}

/// C++ compiler flags for the options
#[must_use]
pub fn cxx_flags(opts: &ConfigureOptions, libedit: Option<&LibeditDirs>) -> String {
    let mut flags = Vec::new();

    if let Some(libedit) = libedit.filter(|_| !opts.stock_libedit) {
        flags.push(format!("-I{}", libedit.include.display()));
    }
    if opts.coverage {
        flags.extend(COVERAGE_FLAGS.iter().map(ToString::to_string));
    }
    if let Some(python) = &opts.python_dir {
        flags.push(format!(
            "-I{}",
            python.join("include").join("python2.7").display()
        ));
    }

    flags.join(" ")
}

/// Linker flags for the options
#[must_use]
pub fn ld_flags(opts: &ConfigureOptions, libedit: Option<&LibeditDirs>) -> String {
    let mut flags = Vec::new();

    if let Some(libedit) = libedit.filter(|_| !opts.stock_libedit) {
        flags.push(format!("-L{}", libedit.lib.display()));
    }
    if opts.coverage {
        flags.extend(COVERAGE_FLAGS.iter().map(ToString::to_string));
    }
    if let Some(python) = &opts.python_dir {
        flags.push(format!("-L{}", python.join("lib").display()));
        flags.push(format!(
            "-L{}",
            python.join("lib").join("python2.7").join("config").display()
        ));
    }

    flags.join(" ")
}

/// Build the configure command for a checkout under `llvm_parent`
///
/// # Errors
///
/// Returns [`Error::IncompatibleOptions`] if coverage is requested for a
/// build without debug info.
pub fn plan(
    opts: &ConfigureOptions,
    llvm_parent: &Path,
    libedit: Option<&LibeditDirs>,
    tools: &ToolNames,
) -> Result<ConfigurePlan, Error> {
    if opts.coverage && !opts.flavor.has_debug_info() {
        return Err(Error::IncompatibleOptions(
            "code coverage requires debug info in the build; \
             choose --release-debug or drop --release"
                .to_string(),
        ));
    }

    let libedit = libedit.filter(|_| !opts.stock_libedit);
    let build_dir = llvm_parent.join(&opts.build_dir);
    let install_dir = llvm_parent.join(&opts.install_dir);
    let mut cxx = cxx_flags(opts, libedit);
    let ld = ld_flags(opts, libedit);
    let llvm_src = Path::new("..").join("llvm");

    let (command, summary) = if opts.use_cmake {
        let generator = if tools.make == "ninja" {
            "Ninja"
        } else {
            "Unix Makefiles"
        };
        let build_type = opts.flavor.cmake_build_type();
        let command = CommandSpec::new(&tools.config).args([
            format!("-G{generator}"),
            format!("-DCMAKE_CXX_COMPILER={}", tools.cxx),
            format!("-DCMAKE_C_COMPILER={}", tools.cc),
            format!("-DCMAKE_LINKER={}", tools.ld),
            format!("-DCMAKE_CXX_FLAGS={cxx}"),
            format!("-DCMAKE_SHARED_LINKER_FLAGS={ld}"),
            format!("-DCMAKE_EXE_LINKER_FLAGS={ld}"),
            format!("-DCMAKE_INSTALL_PREFIX:PATH={}", install_dir.display()),
            format!("-DCMAKE_BUILD_TYPE={build_type}"),
            // Drop to see cmake maintainer-related messages
            "-Wno-dev".to_string(),
            llvm_src.display().to_string(),
        ]);
        let summary = format!(
            "configured for cmake/{} ({build_type})",
            tools.make
        );
        (command, summary)
    } else {
        let script = llvm_src.join(&tools.config);
        let mut command = CommandSpec::new(script.display().to_string())
            .arg("--enable-cxx11")
            .arg(format!("--prefix={}", install_dir.display()));

        let summary = match opts.flavor {
            BuildFlavor::ReleaseDebug => {
                command = command.args(["--enable-optimized", "--enable-assertions"]);
                // Release builds only carry debug info when asked for it
                if cxx.is_empty() {
                    cxx.push_str("-g");
                } else {
                    cxx.push_str(" -g");
                }
                "configured for configure/(g)make (release,debuginfo,assertions)"
            }
            BuildFlavor::Release => {
                command = command.args(["--enable-optimized", "--disable-assertions"]);
                "configured for configure/(g)make (release)"
            }
            BuildFlavor::Debug => {
                command = command.args(["--disable-optimized", "--enable-assertions"]);
                "configured for configure/(g)make (debug,assertions)"
            }
        };

        let command = command
            .arg(format!("--with-extra-options={cxx}"))
            .arg(format!("--with-extra-ld-options={ld}"))
            .env("CC", &tools.cc)
            .env("CXX", &tools.cxx)
            .env("LD", &tools.ld);
        (command, summary.to_string())
    };

    Ok(ConfigurePlan {
        build_dir,
        install_dir,
        command,
        summary,
        libedit: libedit.cloned(),
        python_dir: opts.python_dir.clone(),
    })
}

/// Check the checkout and resolve a plan without touching the filesystem
///
/// The llvm parent is `source_root` when given, otherwise it is searched for
/// from `start`. Missing bundled libedit falls back to the stock one.
///
/// # Errors
///
/// Returns an error if no llvm tree is found, the build or install directory
/// already exists, or the options are incompatible.
pub fn prepare_configure(
    opts: &ConfigureOptions,
    tools: &ToolNames,
    start: &Path,
    source_root: Option<&Path>,
    path_var: Option<&OsStr>,
) -> Result<ConfigurePlan> {
    let llvm_parent = match source_root {
        Some(root) => dunce::canonicalize(root)
            .with_context(|| format!("Failed to resolve source root: {}", root.display()))?,
        None => find_llvm_parent(start)?,
    };
    println!("Found llvm parent dir: {}", llvm_parent.display());

    if let Some(clang) = find_in_executable_path("clang", path_var) {
        warn!(path = %clang.display(), "clang found in PATH");
        eprintln!(
            "Warning: 'clang' was found in PATH: {} (the build is set up for gcc)",
            clang.display()
        );
    }

    for (kind, dir) in [("build", &opts.build_dir), ("install", &opts.install_dir)] {
        let path = llvm_parent.join(dir);
        if path.exists() {
            eprintln!("Error: {kind} directory must not already exist: {}", path.display());
            eprintln!("Please delete before re-running.");
            eprintln!("{}", remove_tree_hint(&path));
            return Err(Error::DirectoryExists { kind, path }.into());
        }
    }

    let mut opts = opts.clone();
    let libedit = if opts.stock_libedit {
        None
    } else {
        let dirs = opts.libedit_root.as_deref().map(LibeditDirs::for_platform);
        match dirs {
            Some(dirs) if dirs.lib.is_dir() => Some(dirs),
            Some(dirs) => {
                eprintln!(
                    "Warning: libedit lib directory for platform does not exist:\n  {}",
                    dirs.lib.display()
                );
                eprintln!("Forcing use of stock libedit");
                opts.stock_libedit = true;
                None
            }
            None => {
                opts.stock_libedit = true;
                None
            }
        }
    };

    let mut plan = plan(&opts, &llvm_parent, libedit.as_ref(), tools)?;

    if let Some(libedit) = &libedit {
        let lib = libedit.lib.display().to_string();
        let value = match std::env::var("LD_LIBRARY_PATH") {
            Ok(existing) if !existing.is_empty() => format!("{lib}:{existing}"),
            _ => lib,
        };
        plan.command = plan.command.env("LD_LIBRARY_PATH", value);
    }

    Ok(plan)
}

/// Create the build directory and run the plan inside it
///
/// # Errors
///
/// Returns an error if the directory cannot be created or entered, or the
/// configure command fails.
pub fn execute_configure(plan: &ConfigurePlan, dry_run: bool) -> Result<()> {
    if dry_run {
        println!("[DRY RUN] Would create: {}", plan.build_dir.display());
        run_checked(&plan.command, true)?;
    } else {
        fs::create_dir_all(&plan.build_dir).with_context(|| {
            format!("Failed to create directory: {}", plan.build_dir.display())
        })?;
        let _cwd = WorkingDir::enter(&plan.build_dir, false)?;
        info!(build_dir = %plan.build_dir.display(), "running configure");
        run_checked(&plan.command, false)
            .context("configure command failed (see above)")?;
    }

    println!();
    println!("{}", plan.summary);
    match &plan.libedit {
        Some(libedit) => println!(
            "using custom libedit ({},{})",
            libedit.include.display(),
            libedit.lib.display()
        ),
        None => println!("using stock system libedit"),
    }
    match &plan.python_dir {
        Some(python) => println!("using custom python ({})", python.display()),
        None => println!("using stock system python"),
    }
    println!("The build directory has been set up:");
    println!("cd {}", plan.build_dir.display());

    Ok(())
}
