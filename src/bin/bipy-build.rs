mod cli;

use std::process::ExitCode;

use anyhow::{Context, Result};
use bipy_builder::config::load_packager_spec;
use bipy_builder::preflight::find_host_python;
use bipy_builder::report::report_outcome;
use bipy_builder::{observability, run_build, BuildConfig, BuildPlan};
use clap::Parser;
use cli::Cli;

fn main() -> Result<ExitCode> {
    observability::init_tracing();
    let cli = Cli::parse();

    let invocation_dir = std::env::current_dir().context("resolving current directory")?;
    let project_root = match cli.project_root {
        Some(root) => invocation_dir.join(root),
        None => invocation_dir.clone(),
    };
    let project_root = project_root
        .canonicalize()
        .with_context(|| format!("resolving project root '{}'", project_root.display()))?;

    let config = BuildConfig::new(cli.venv, cli.venv_path);
    let spec = load_packager_spec(&project_root, cli.config.as_deref(), &invocation_dir)?;
    let host_python = find_host_python()?;
    tracing::debug!("host interpreter: {}", host_python.display());

    let report = run_build(&BuildPlan {
        project_root: &project_root,
        config: &config,
        spec: &spec,
        host_python: &host_python,
    })
    .with_context(|| format!("building '{}' in '{}'", spec.name, project_root.display()))?;

    Ok(ExitCode::from(report_outcome(&report)))
}
