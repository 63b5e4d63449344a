//! Build report and outcome messages.

use serde::Serialize;
use std::path::PathBuf;

use crate::context::ContextMode;
use crate::process::ProcessOutcome;

pub const SUCCESS_MESSAGE: &str = "Build successful!";
pub const FAILURE_MESSAGE: &str = "Build failed. Please check the error messages above.";

/// Every child-process result of one build.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BuildReport {
    pub mode: ContextMode,
    pub python: PathBuf,
    pub requirements_install: ProcessOutcome,
    pub tool_install: ProcessOutcome,
    pub packager: ProcessOutcome,
    pub dist_dir: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuildOutcome {
    Success,
    Failure,
}

impl BuildReport {
    /// Only the packager's status decides the outcome.
    pub fn outcome(&self) -> BuildOutcome {
        if self.packager.success() {
            BuildOutcome::Success
        } else {
            BuildOutcome::Failure
        }
    }

    /// Process exit code for the orchestrator itself.
    pub fn exit_code(&self) -> u8 {
        match self.outcome() {
            BuildOutcome::Success => 0,
            BuildOutcome::Failure => self
                .packager
                .exit_code
                .and_then(|code| u8::try_from(code).ok())
                .filter(|code| *code != 0)
                .unwrap_or(1),
        }
    }

    /// The lines printed when the build ends.
    pub fn outcome_lines(&self) -> Vec<String> {
        match self.outcome() {
            BuildOutcome::Success => vec![
                SUCCESS_MESSAGE.to_string(),
                format!("Executable can be found in the '{}' directory", self.dist_dir),
            ],
            BuildOutcome::Failure => vec![FAILURE_MESSAGE.to_string()],
        }
    }
}

/// Print the outcome and return the exit code to propagate.
pub fn report_outcome(report: &BuildReport) -> u8 {
    if !report.requirements_install.success() || !report.tool_install.success() {
        tracing::warn!(
            requirements = %report.requirements_install,
            tool = %report.tool_install,
            "dependency installation did not complete cleanly"
        );
    }

    println!();
    for line in report.outcome_lines() {
        println!("{line}");
    }
    report.exit_code()
}
