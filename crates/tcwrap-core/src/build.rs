//! Build drivers
//!
//! - [`mklog`] runs the build tool, teeing its output to the console and log files
//! - [`configure`] prepares a fresh build directory for cmake/ninja or configure/make
//! - [`coverage`] runs the test suite under lcov and renders an HTML report

pub mod configure;
pub mod coverage;
pub mod mklog;

pub use configure::{
    BuildFlavor, ConfigureOptions, ConfigurePlan, LibeditDirs, cxx_flags, execute_configure,
    ld_flags, plan, prepare_configure,
};
pub use coverage::{
    CoverageOptions, CoveragePlan, DEFAULT_REPORT_DIR, check_coverage_tools, coverage_plan,
    run_coverage,
};
pub use mklog::{FILTERED_LOG, MklogOptions, MklogOutcome, UNFILTERED_LOG, run_mklog};
