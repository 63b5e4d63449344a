//! The build sequence: resolve context, install, package, report.
//!
//! Every step takes the project root explicitly; nothing changes the
//! process working directory.

use anyhow::Result;
use std::path::Path;

use crate::config::{BuildConfig, PackagerSpec};
use crate::context::{resolve_execution_context, ContextMode, ExecutionContext};
use crate::install::install_dependencies;
use crate::packager::invoke_packager;
use crate::preflight::missing_project_inputs;
use crate::report::BuildReport;
use crate::run_manifest::{now_utc_compact, write_run_manifest};

/// Inputs for one build.
#[derive(Debug, Clone, Copy)]
pub struct BuildPlan<'a> {
    pub project_root: &'a Path,
    pub config: &'a BuildConfig,
    pub spec: &'a PackagerSpec,
    /// Interpreter used for the ambient context and to create the venv.
    pub host_python: &'a Path,
}

/// Run the full build and return every child-process result.
///
/// Installer failures are recorded, not raised. Errors come only from venv
/// creation or a child that cannot be spawned; a run manifest that cannot be
/// written is logged and does not change the outcome.
pub fn run_build(plan: &BuildPlan<'_>) -> Result<BuildReport> {
    let started_at = now_utc_compact();

    for missing in missing_project_inputs(plan.project_root, plan.spec) {
        tracing::warn!("project input '{}' does not exist", missing.display());
    }

    let ctx = resolve_execution_context(plan.config, plan.project_root, plan.host_python)?;
    let report = build_in_context(&ctx, plan.project_root, plan.spec)?;

    match write_run_manifest(plan.project_root, &report, ctx.env_dir(), &started_at) {
        Ok(manifest) => tracing::debug!("run manifest written to {}", manifest.display()),
        Err(err) => tracing::warn!("{err:#}"),
    }

    Ok(report)
}

/// Install dependencies and package the application with `ctx`.
pub fn build_in_context(
    ctx: &ExecutionContext,
    project_root: &Path,
    spec: &PackagerSpec,
) -> Result<BuildReport> {
    let suffix = match ctx.mode() {
        ContextMode::Ambient => "",
        ContextMode::Isolated => " in virtual environment",
    };

    tracing::info!("Installing required dependencies{suffix}...");
    let installs = install_dependencies(ctx, project_root, spec)?;

    tracing::info!("Building executable with {}{suffix}...", spec.tool_module);
    let packager = invoke_packager(ctx, project_root, spec)?;

    Ok(BuildReport {
        mode: ctx.mode(),
        python: ctx.python().to_path_buf(),
        requirements_install: installs.requirements,
        tool_install: installs.tool,
        packager,
        dist_dir: spec.dist_dir.clone(),
    })
}
