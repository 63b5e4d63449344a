//! Blocking child-process execution.

use anyhow::{Context, Result};
use serde::Serialize;
use std::process::{Command, ExitStatus, Stdio};

/// Termination status of one child process.
///
/// `exit_code` is `None` when the child was killed by a signal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ProcessOutcome {
    pub exit_code: Option<i32>,
}

impl ProcessOutcome {
    pub fn from_code(code: i32) -> Self {
        Self {
            exit_code: Some(code),
        }
    }

    pub fn success(&self) -> bool {
        self.exit_code == Some(0)
    }
}

impl From<ExitStatus> for ProcessOutcome {
    fn from(status: ExitStatus) -> Self {
        Self {
            exit_code: status.code(),
        }
    }
}

impl std::fmt::Display for ProcessOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.exit_code {
            Some(code) => write!(f, "exit code {code}"),
            None => write!(f, "terminated by signal"),
        }
    }
}

/// Render a command as a single shell-like line for logs.
pub fn describe(cmd: &Command) -> String {
    std::iter::once(cmd.get_program())
        .chain(cmd.get_args())
        .map(|part| part.to_string_lossy().into_owned())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Run `cmd` to completion with inherited stdio.
///
/// Only a failure to spawn is an error; a non-zero exit is returned as an outcome.
pub fn run_status(cmd: &mut Command, what: &str) -> Result<ProcessOutcome> {
    tracing::debug!(command = %describe(cmd), "running {what}");

    let status = cmd
        .stdin(Stdio::inherit())
        .stdout(Stdio::inherit())
        .stderr(Stdio::inherit())
        .status()
        .with_context(|| format!("failed to execute {what}: {}", describe(cmd)))?;

    let outcome = ProcessOutcome::from(status);
    tracing::debug!(%outcome, "{what} finished");
    Ok(outcome)
}
