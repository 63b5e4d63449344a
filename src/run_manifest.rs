//! JSON record of the last build run.

use anyhow::{Context, Result};
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use time::OffsetDateTime;

use crate::report::{BuildOutcome, BuildReport};

const RUN_MANIFEST_DIR: &str = "build";
const RUN_MANIFEST_FILENAME: &str = "bipy-build-run.json";

#[derive(Debug, Serialize)]
pub struct RunManifest<'a> {
    pub status: &'static str,
    pub started_at_utc: &'a str,
    pub finished_at_utc: String,
    pub env_dir: Option<&'a Path>,
    #[serde(flatten)]
    pub report: &'a BuildReport,
}

pub fn manifest_path(project_root: &Path) -> PathBuf {
    project_root.join(RUN_MANIFEST_DIR).join(RUN_MANIFEST_FILENAME)
}

pub fn now_utc_compact() -> String {
    let now = OffsetDateTime::now_utc();
    format!(
        "{:04}{:02}{:02}T{:02}{:02}{:02}Z",
        now.year(),
        now.month() as u8,
        now.day(),
        now.hour(),
        now.minute(),
        now.second()
    )
}

/// Record `report` under the project's `build/` directory.
///
/// The JSON is staged in `build/` and renamed into place.
pub fn write_run_manifest(
    project_root: &Path,
    report: &BuildReport,
    env_dir: Option<&Path>,
    started_at_utc: &str,
) -> Result<PathBuf> {
    let manifest = RunManifest {
        status: match report.outcome() {
            BuildOutcome::Success => "success",
            BuildOutcome::Failure => "failure",
        },
        started_at_utc,
        finished_at_utc: now_utc_compact(),
        env_dir,
        report,
    };
    let payload = serde_json::to_vec_pretty(&manifest).context("serializing build run manifest")?;

    let path = manifest_path(project_root);
    let build_dir = project_root.join(RUN_MANIFEST_DIR);
    fs::create_dir_all(&build_dir).with_context(|| {
        format!(
            "creating build directory '{}' for run manifest",
            build_dir.display()
        )
    })?;

    let staged = build_dir.join(format!(".{RUN_MANIFEST_FILENAME}.{}", std::process::id()));
    fs::write(&staged, payload)
        .with_context(|| format!("writing run manifest '{}'", staged.display()))?;
    fs::rename(&staged, &path)
        .with_context(|| format!("moving run manifest into place at '{}'", path.display()))?;

    Ok(path)
}
