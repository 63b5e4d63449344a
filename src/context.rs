//! Execution context: which interpreter every build step runs.
//!
//! The context is decided once, at the start of a build, and then passed by
//! reference to the install and packaging steps.

use anyhow::{bail, Context, Result};
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::process::Command;

use crate::config::BuildConfig;
use crate::process::{describe, run_status};

/// Platform family, for the venv directory layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Platform {
    Windows,
    Unix,
}

impl Platform {
    pub fn current() -> Self {
        if cfg!(windows) {
            Platform::Windows
        } else {
            Platform::Unix
        }
    }
}

/// Path of the interpreter inside a venv at `env_dir`.
pub fn venv_python(env_dir: &Path, platform: Platform) -> PathBuf {
    match platform {
        Platform::Windows => env_dir.join("Scripts").join("python.exe"),
        Platform::Unix => env_dir.join("bin").join("python"),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ContextMode {
    Ambient,
    Isolated,
}

/// The interpreter subsequent steps invoke.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExecutionContext {
    /// The host interpreter, with whatever packages it already has.
    Ambient { python: PathBuf },
    /// A venv owned by this build.
    Isolated { env_dir: PathBuf, python: PathBuf },
}

impl ExecutionContext {
    pub fn python(&self) -> &Path {
        match self {
            ExecutionContext::Ambient { python } => python,
            ExecutionContext::Isolated { python, .. } => python,
        }
    }

    pub fn mode(&self) -> ContextMode {
        match self {
            ExecutionContext::Ambient { .. } => ContextMode::Ambient,
            ExecutionContext::Isolated { .. } => ContextMode::Isolated,
        }
    }

    pub fn env_dir(&self) -> Option<&Path> {
        match self {
            ExecutionContext::Ambient { .. } => None,
            ExecutionContext::Isolated { env_dir, .. } => Some(env_dir),
        }
    }

    /// `<python> -m <module>`, run from `project_root`.
    pub fn module_command(&self, module: &str, project_root: &Path) -> Command {
        let mut cmd = Command::new(self.python());
        cmd.arg("-m").arg(module).current_dir(project_root);
        cmd
    }
}

/// Outcome of [`ensure_venv`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VenvEnsureOutcome {
    AlreadyPresent,
    CreatedNow,
}

/// Create a venv with pip at `env_dir` unless the location already exists.
pub fn ensure_venv(host_python: &Path, env_dir: &Path) -> Result<VenvEnsureOutcome> {
    if env_dir.exists() {
        return Ok(VenvEnsureOutcome::AlreadyPresent);
    }

    tracing::info!("Creating virtual environment at {}...", env_dir.display());

    let mut cmd = Command::new(host_python);
    cmd.arg("-m").arg("venv").arg(env_dir);
    let outcome = run_status(&mut cmd, "venv creation")
        .with_context(|| format!("creating virtual environment '{}'", env_dir.display()))?;

    if !outcome.success() {
        bail!(
            "creating virtual environment '{}' failed ({}): {}",
            env_dir.display(),
            outcome,
            describe(&cmd)
        );
    }

    Ok(VenvEnsureOutcome::CreatedNow)
}

/// Decide the execution context for a build, creating the venv when needed.
pub fn resolve_execution_context(
    config: &BuildConfig,
    project_root: &Path,
    host_python: &Path,
) -> Result<ExecutionContext> {
    resolve_execution_context_for(config, project_root, host_python, Platform::current())
}

pub fn resolve_execution_context_for(
    config: &BuildConfig,
    project_root: &Path,
    host_python: &Path,
    platform: Platform,
) -> Result<ExecutionContext> {
    if !config.use_isolated_env {
        return Ok(ExecutionContext::Ambient {
            python: host_python.to_path_buf(),
        });
    }

    let env_dir = config.env_dir(project_root);
    match ensure_venv(host_python, &env_dir)? {
        VenvEnsureOutcome::AlreadyPresent => {
            tracing::info!("Reusing virtual environment at {}", env_dir.display());
        }
        VenvEnsureOutcome::CreatedNow => {
            tracing::info!("Virtual environment created at {}", env_dir.display());
        }
    }

    let python = venv_python(&env_dir, platform);
    if !python.is_file() {
        tracing::warn!(
            "interpreter '{}' not found inside virtual environment",
            python.display()
        );
    }

    Ok(ExecutionContext::Isolated { env_dir, python })
}
