//! Test coverage report for an instrumented lldb build
//!
//! The build must have been configured with `--coverage`. The report is
//! produced in five steps: reset the lcov counters, take a baseline
//! capture, run the lldb test suite, capture again, and render HTML with
//! genhtml.

use std::ffi::OsStr;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context;
use tracing::info;

use crate::config::ToolNames;
use crate::error::{Error, Result};
use crate::paths::find_in_executable_path;
use crate::process::{CommandSpec, run_checked};

/// Default report directory
pub const DEFAULT_REPORT_DIR: &str = "coverage-report";

/// lcov tracefile, written inside the build directory
pub const TRACEFILE: &str = "coverage.info";

/// Options for one coverage run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoverageOptions {
    /// Instrumented build directory
    pub build_dir: PathBuf,
    /// Directory the HTML report is written to; must not exist yet
    pub report_dir: PathBuf,
    /// Build was configured for cmake/ninja
    pub use_cmake: bool,
    /// lcov executable
    pub lcov: String,
    /// genhtml executable
    pub genhtml: String,
}

impl CoverageOptions {
    /// Stock lcov and genhtml with the default report directory
    #[must_use]
    pub fn new(build_dir: impl Into<PathBuf>, use_cmake: bool) -> Self {
        Self {
            build_dir: build_dir.into(),
            report_dir: PathBuf::from(DEFAULT_REPORT_DIR),
            use_cmake,
            lcov: "lcov".to_string(),
            genhtml: "genhtml".to_string(),
        }
    }
}

/// Resolved commands for one coverage run, in order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoveragePlan {
    /// Report directory, created before genhtml runs
    pub report_dir: PathBuf,
    /// lcov tracefile
    pub tracefile: PathBuf,
    /// Every step, each carrying its own working directory where it needs one
    pub steps: Vec<CommandSpec>,
}

/// Build the coverage commands for `opts`
///
/// `tools.make` runs the test suite: `ninja check-lldb` for cmake builds,
/// `make -C tools/lldb/test` otherwise.
#[must_use]
pub fn coverage_plan(opts: &CoverageOptions, tools: &ToolNames) -> CoveragePlan {
    let sources = opts.build_dir.join("tools").join("lldb").join("source");
    let sources = sources.display().to_string();
    let tracefile = opts.build_dir.join(TRACEFILE);
    let trace = tracefile.display().to_string();

    let run_tests = if opts.use_cmake {
        CommandSpec::new(&tools.make).arg("check-lldb")
    } else {
        CommandSpec::new(&tools.make).args(["-C", "tools/lldb/test"])
    }
    .current_dir(&opts.build_dir);

    let steps = vec![
        CommandSpec::new(&opts.lcov).args(["--zerocounters", "--directory", sources.as_str()]),
        CommandSpec::new(&opts.lcov).args([
            "--capture",
            "--initial",
            "--directory",
            sources.as_str(),
            "--output-file",
            trace.as_str(),
        ]),
        run_tests,
        CommandSpec::new(&opts.lcov).args([
            "--no-checksum",
            "--directory",
            sources.as_str(),
            "--capture",
            "--output-file",
            trace.as_str(),
        ]),
        CommandSpec::new(&opts.genhtml)
            .arg("-o")
            .arg(opts.report_dir.display().to_string())
            .arg(trace.as_str()),
    ];

    CoveragePlan {
        report_dir: opts.report_dir.clone(),
        tracefile,
        steps,
    }
}

/// Check that lcov, gcov, and genhtml can be found
///
/// Entries with a path separator are taken as given.
///
/// # Errors
///
/// Returns [`Error::ToolNotFound`] for the first missing tool.
pub fn check_coverage_tools(opts: &CoverageOptions, path_var: Option<&OsStr>) -> Result<(), Error> {
    let required = [
        (opts.lcov.as_str(), "install lcov"),
        ("gcov", "install a compiler with gcov support"),
        (opts.genhtml.as_str(), "install lcov (e.g. sudo apt-get install lcov)"),
    ];
    for (tool, hint) in required {
        let found = if tool.contains('/') {
            Path::new(tool).exists()
        } else {
            find_in_executable_path(tool, path_var).is_some()
        };
        if !found {
            return Err(Error::ToolNotFound {
                tool: tool.to_string(),
                hint,
            });
        }
    }
    Ok(())
}

/// Run every step of the plan, stopping at the first failure
///
/// # Errors
///
/// Returns [`Error::DirectoryExists`] if the report directory already
/// exists, or an error naming the step that failed.
pub fn run_coverage(plan: &CoveragePlan, dry_run: bool) -> Result<()> {
    if plan.report_dir.exists() {
        return Err(Error::DirectoryExists {
            kind: "coverage report",
            path: plan.report_dir.clone(),
        }
        .into());
    }

    let (render, collect) = plan
        .steps
        .split_last()
        .context("coverage plan has no steps")?;
    for step in collect {
        if let Some(dir) = &step.cwd {
            println!("cd {}", dir.display());
        }
        run_checked(step, dry_run).with_context(|| format!("Coverage step failed: {step}"))?;
    }

    if dry_run {
        println!("[DRY RUN] Would create: {}", plan.report_dir.display());
    } else {
        fs::create_dir_all(&plan.report_dir).with_context(|| {
            format!("Failed to create directory: {}", plan.report_dir.display())
        })?;
    }
    run_checked(render, dry_run).context("genhtml failed (see above)")?;

    info!(report = %plan.report_dir.display(), "coverage report written");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::ffi::OsString;
    use tempfile::TempDir;

    fn lines(plan: &CoveragePlan) -> Vec<String> {
        plan.steps.iter().map(ToString::to_string).collect()
    }

    #[test]
    fn test_plan_for_cmake_build() {
        let opts = CoverageOptions::new("/work/build", true);
        let plan = coverage_plan(&opts, &ToolNames::for_build_system(true));

        assert_eq!(
            lines(&plan),
            vec![
                "lcov --zerocounters --directory /work/build/tools/lldb/source",
                "lcov --capture --initial --directory /work/build/tools/lldb/source \
                 --output-file /work/build/coverage.info",
                "ninja check-lldb",
                "lcov --no-checksum --directory /work/build/tools/lldb/source \
                 --capture --output-file /work/build/coverage.info",
                "genhtml -o coverage-report /work/build/coverage.info",
            ]
        );
        assert_eq!(plan.steps[2].cwd, Some(PathBuf::from("/work/build")));
        assert_eq!(plan.steps[0].cwd, None);
    }

    #[test]
    fn test_plan_for_make_build() {
        let mut opts = CoverageOptions::new("/work/build", false);
        opts.lcov = "/opt/lcov/bin/lcov".to_string();
        opts.report_dir = PathBuf::from("/tmp/report");

        let plan = coverage_plan(&opts, &ToolNames::for_build_system(false));

        assert_eq!(plan.steps[2].to_string(), "make -C tools/lldb/test");
        assert_eq!(plan.steps[0].program, "/opt/lcov/bin/lcov");
        assert_eq!(plan.steps[4].args[1], "/tmp/report");
        assert_eq!(plan.tracefile, PathBuf::from("/work/build/coverage.info"));
    }

    #[test]
    fn test_missing_tool_reported_with_hint() {
        let bin = TempDir::new().unwrap();
        fs::write(bin.path().join("lcov"), "").unwrap();
        fs::write(bin.path().join("genhtml"), "").unwrap();
        let path_var = OsString::from(bin.path());
        let opts = CoverageOptions::new("/work/build", true);

        let err = check_coverage_tools(&opts, Some(&path_var)).unwrap_err();
        assert!(matches!(&err, Error::ToolNotFound { tool, .. } if tool == "gcov"));

        fs::write(bin.path().join("gcov"), "").unwrap();
        assert!(check_coverage_tools(&opts, Some(&path_var)).is_ok());
    }

    #[test]
    fn test_existing_report_dir_refused() {
        let tmp = TempDir::new().unwrap();
        let mut opts = CoverageOptions::new(tmp.path().join("build"), true);
        opts.report_dir = tmp.path().to_path_buf();
        let plan = coverage_plan(&opts, &ToolNames::for_build_system(true));

        let err = run_coverage(&plan, true).unwrap_err();

        assert!(matches!(
            err.downcast_ref::<Error>(),
            Some(Error::DirectoryExists { kind: "coverage report", .. })
        ));
    }

    #[test]
    fn test_dry_run_creates_nothing() {
        let tmp = TempDir::new().unwrap();
        let mut opts = CoverageOptions::new(tmp.path().join("build"), true);
        opts.report_dir = tmp.path().join("report");
        let plan = coverage_plan(&opts, &ToolNames::for_build_system(true));

        run_coverage(&plan, true).unwrap();

        assert!(!opts.report_dir.exists());
        assert!(!plan.tracefile.exists());
    }

    #[test]
    #[cfg(unix)]
    fn test_failed_step_stops_the_run() {
        let tmp = TempDir::new().unwrap();
        let mut opts = CoverageOptions::new(tmp.path().join("build"), true);
        opts.report_dir = tmp.path().join("report");
        opts.lcov = "false".to_string();
        let plan = coverage_plan(&opts, &ToolNames::for_build_system(true));

        let err = run_coverage(&plan, false).unwrap_err();

        assert!(err.to_string().contains("Coverage step failed: false --zerocounters"));
        assert!(!opts.report_dir.exists());
    }
}
