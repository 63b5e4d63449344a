//! Build orchestration for packaging the BIPy GUI application.
//!
//! Turns two flags into a linear sequence of child processes:
//!
//! ```text
//! BuildConfig ──► resolve context ──► pip install -r requirements.txt
//!                 (ambient | venv)    pip install pyinstaller
//!                                     python -m PyInstaller ... src/main.py
//!                                              │
//!                                              ▼
//!                                         BuildReport ──► outcome message + exit code
//! ```
//!
//! # Example
//!
//! ```rust,no_run
//! use bipy_builder::{run_build, BuildConfig, BuildPlan, PackagerSpec};
//! use std::path::Path;
//!
//! let config = BuildConfig::new(true, ".venv");
//! let spec = PackagerSpec::default();
//! let host = bipy_builder::preflight::find_host_python()?;
//! let report = run_build(&BuildPlan {
//!     project_root: Path::new("."),
//!     config: &config,
//!     spec: &spec,
//!     host_python: &host,
//! })?;
//! std::process::exit(bipy_builder::report::report_outcome(&report).into());
//! # Ok::<(), anyhow::Error>(())
//! ```

pub mod config;
pub mod context;
pub mod install;
pub mod observability;
pub mod orchestrator;
pub mod packager;
pub mod preflight;
pub mod process;
pub mod report;
pub mod run_manifest;

pub use config::{BuildConfig, PackagerSpec};
pub use context::{ExecutionContext, Platform};
pub use orchestrator::{run_build, BuildPlan};
pub use report::BuildReport;
