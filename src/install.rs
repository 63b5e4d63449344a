//! Dependency installation into the resolved interpreter.
//!
//! Two sequential `pip install` runs: the project requirements manifest, then
//! the packaging tool. A non-zero pip exit does not stop the build; both
//! outcomes are returned so the caller can report them.

use anyhow::Result;
use std::path::Path;
use std::process::Command;

use crate::config::PackagerSpec;
use crate::context::ExecutionContext;
use crate::process::{run_status, ProcessOutcome};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InstallOutcomes {
    pub requirements: ProcessOutcome,
    pub tool: ProcessOutcome,
}

pub fn requirements_command(ctx: &ExecutionContext, project_root: &Path, requirements: &str) -> Command {
    let mut cmd = ctx.module_command("pip", project_root);
    cmd.args(["install", "-r", requirements]);
    cmd
}

pub fn tool_command(ctx: &ExecutionContext, project_root: &Path, package: &str) -> Command {
    let mut cmd = ctx.module_command("pip", project_root);
    cmd.args(["install", package]);
    cmd
}

/// Install the requirements manifest and the packaging tool.
///
/// Errors only when the interpreter cannot be spawned.
pub fn install_dependencies(
    ctx: &ExecutionContext,
    project_root: &Path,
    spec: &PackagerSpec,
) -> Result<InstallOutcomes> {
    let requirements = run_status(
        &mut requirements_command(ctx, project_root, &spec.requirements),
        "requirements install",
    )?;
    if !requirements.success() {
        tracing::warn!(
            "installing '{}' failed ({requirements}); continuing",
            spec.requirements
        );
    }

    let tool = run_status(
        &mut tool_command(ctx, project_root, &spec.tool_package),
        "packaging tool install",
    )?;
    if !tool.success() {
        tracing::warn!("installing '{}' failed ({tool}); continuing", spec.tool_package);
    }

    Ok(InstallOutcomes { requirements, tool })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::process::describe;
    use std::path::PathBuf;

    fn venv_ctx() -> ExecutionContext {
        ExecutionContext::Isolated {
            env_dir: PathBuf::from("/work/bipy/.venv"),
            python: PathBuf::from("/work/bipy/.venv/bin/python"),
        }
    }

    #[test]
    fn test_requirements_command_line() {
        let cmd = requirements_command(&venv_ctx(), Path::new("/work/bipy"), "requirements.txt");
        assert_eq!(
            describe(&cmd),
            "/work/bipy/.venv/bin/python -m pip install -r requirements.txt"
        );
    }

    #[test]
    fn test_tool_command_line() {
        let cmd = tool_command(&venv_ctx(), Path::new("/work/bipy"), "pyinstaller");
        assert_eq!(
            describe(&cmd),
            "/work/bipy/.venv/bin/python -m pip install pyinstaller"
        );
    }

    #[test]
    fn test_missing_interpreter_is_error() {
        let ctx = ExecutionContext::Ambient {
            python: PathBuf::from("/nonexistent/python_xyz_12345"),
        };
        let temp = tempfile::TempDir::new().unwrap();
        assert!(install_dependencies(&ctx, temp.path(), &PackagerSpec::default()).is_err());
    }
}
