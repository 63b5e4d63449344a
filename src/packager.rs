//! Packager invocation.
//!
//! Builds the PyInstaller argument list from a [`PackagerSpec`] and runs it
//! through the resolved interpreter as `python -m PyInstaller`.

use anyhow::Result;
use std::path::{Path, PathBuf};
use std::process::Command;

use crate::config::PackagerSpec;
use crate::context::ExecutionContext;
use crate::process::{run_status, ProcessOutcome};

/// Separator between source and destination in `--add-data`.
///
/// PyInstaller 6 accepts `:` on every platform.
pub const ADD_DATA_SEPARATOR: char = ':';

/// Arguments following `-m PyInstaller`, in order: output options, then
/// bundle contents, then the entry point.
pub fn packager_args(spec: &PackagerSpec) -> Vec<String> {
    let mut args = vec![
        format!("--name={}", spec.name),
        "--onefile".to_string(),
        "--windowed".to_string(),
        format!("--icon={}", spec.icon),
    ];

    for mapping in &spec.data {
        args.push(format!(
            "--add-data={}{}{}",
            mapping.source, ADD_DATA_SEPARATOR, mapping.dest
        ));
    }

    for module in &spec.hidden_imports {
        args.push(format!("--hidden-import={module}"));
    }

    args.push(spec.entry_point.clone());
    args
}

pub fn packager_command(ctx: &ExecutionContext, project_root: &Path, spec: &PackagerSpec) -> Command {
    let mut cmd = ctx.module_command(&spec.tool_module, project_root);
    cmd.args(packager_args(spec));
    cmd
}

/// Where the packager is expected to place the executable.
pub fn expected_artifact(project_root: &Path, spec: &PackagerSpec) -> PathBuf {
    let dist = project_root.join(&spec.dist_dir);
    if cfg!(windows) {
        dist.join(format!("{}.exe", spec.name))
    } else {
        dist.join(&spec.name)
    }
}

/// Run the packager and return its termination status.
///
/// The artifact is looked up afterwards for logging only.
pub fn invoke_packager(
    ctx: &ExecutionContext,
    project_root: &Path,
    spec: &PackagerSpec,
) -> Result<ProcessOutcome> {
    let outcome = run_status(&mut packager_command(ctx, project_root, spec), "packager")?;

    let artifact = expected_artifact(project_root, spec);
    if outcome.success() && !artifact.exists() {
        tracing::warn!(
            "packager reported success but '{}' was not found",
            artifact.display()
        );
    }

    Ok(outcome)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DataMapping;
    use crate::process::describe;

    #[test]
    fn test_default_args_match_fixed_options() {
        assert_eq!(
            packager_args(&PackagerSpec::default()),
            vec![
                "--name=BIPy",
                "--onefile",
                "--windowed",
                "--icon=src/GUI/assets/icone.ico",
                "--add-data=src/GUI/assets:src/GUI/assets",
                "--hidden-import=PyQt5.QtCore",
                "--hidden-import=PyQt5.QtWidgets",
                "--hidden-import=PyQt5.QtGui",
                "src/main.py",
            ]
        );
    }

    #[test]
    fn test_entry_point_is_last_with_extra_data() {
        let spec = PackagerSpec {
            data: vec![
                DataMapping::new("src/GUI/assets", "src/GUI/assets"),
                DataMapping::new("docs", "docs"),
            ],
            ..Default::default()
        };
        let args = packager_args(&spec);
        assert!(args.contains(&"--add-data=docs:docs".to_string()));
        assert_eq!(args.last().map(String::as_str), Some("src/main.py"));
    }

    #[test]
    fn test_ambient_command_uses_module_invocation() {
        let ctx = ExecutionContext::Ambient {
            python: PathBuf::from("python3"),
        };
        let cmd = packager_command(&ctx, Path::new("/work/bipy"), &PackagerSpec::default());
        assert!(describe(&cmd).starts_with("python3 -m PyInstaller --name=BIPy "));
    }

    #[cfg(unix)]
    #[test]
    fn test_expected_artifact_in_dist() {
        assert_eq!(
            expected_artifact(Path::new("/work/bipy"), &PackagerSpec::default()),
            PathBuf::from("/work/bipy/dist/BIPy")
        );
    }
}
