//! Preflight checks run before a build.
//!
//! Locates the host Python interpreter and lists project inputs the packager
//! will need. Missing inputs are reported, not enforced: the installer and
//! packager produce their own diagnostics.
//!
//! # Example
//!
//! ```rust,no_run
//! use bipy_builder::preflight::find_host_python;
//!
//! let python = find_host_python()?;
//! println!("building with {}", python.display());
//! # Ok::<(), anyhow::Error>(())
//! ```

use anyhow::{bail, Context, Result};
use std::env;
use std::path::{Component, Path, PathBuf};

use crate::config::PackagerSpec;

/// Environment variable naming the interpreter to use outside a venv.
pub const PYTHON_ENV_VAR: &str = "BIPY_PYTHON";

/// Interpreter names tried on PATH, in order.
pub const PYTHON_CANDIDATES: &[&str] = &["python3", "python"];

/// Find the ambient Python interpreter.
///
/// Resolution order:
/// 1. `BIPY_PYTHON` (a path, or a name looked up on PATH)
/// 2. `python3` on PATH
/// 3. `python` on PATH
///
/// The result is absolute: build steps run from the project root, not from
/// the directory the command was started in.
pub fn find_host_python() -> Result<PathBuf> {
    let cwd = env::current_dir().context("resolving current directory")?;
    resolve_host_python(env::var(PYTHON_ENV_VAR).ok().as_deref(), &cwd)
}

fn resolve_host_python(override_value: Option<&str>, cwd: &Path) -> Result<PathBuf> {
    if let Some(value) = override_value.map(str::trim).filter(|v| !v.is_empty()) {
        let relative: PathBuf = Path::new(value)
            .components()
            .filter(|c| !matches!(c, Component::CurDir))
            .collect();
        let path = cwd.join(relative);
        if path.is_file() {
            return Ok(path);
        }
        if let Ok(found) = which::which(value) {
            return Ok(found);
        }
        bail!(
            "{} points to '{}', which is neither a file nor a command on PATH",
            PYTHON_ENV_VAR,
            value
        );
    }

    for name in PYTHON_CANDIDATES {
        if let Ok(path) = which::which(name) {
            return Ok(path);
        }
    }

    bail!(
        "Could not find a Python interpreter.\n\n\
         Resolution order tried:\n\
         1. {} env var - not set\n\
         2. {} on PATH - not found\n\n\
         Install Python 3 or set {}=/path/to/python",
        PYTHON_ENV_VAR,
        PYTHON_CANDIDATES.join(", "),
        PYTHON_ENV_VAR
    )
}

/// List project inputs referenced by `spec` that do not exist under `project_root`.
pub fn missing_project_inputs(project_root: &Path, spec: &PackagerSpec) -> Vec<PathBuf> {
    let mut inputs = vec![
        project_root.join(&spec.requirements),
        project_root.join(&spec.entry_point),
        project_root.join(&spec.icon),
    ];
    inputs.extend(spec.data.iter().map(|m| project_root.join(&m.source)));

    inputs.into_iter().filter(|path| !path.exists()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_override_pointing_at_file_wins() {
        let temp = TempDir::new().unwrap();
        let python = temp.path().join("python-custom");
        fs::write(&python, "").unwrap();

        let resolved =
            resolve_host_python(Some(python.to_str().unwrap()), Path::new("/elsewhere")).unwrap();
        assert_eq!(resolved, python);
    }

    #[test]
    fn test_relative_override_is_made_absolute() {
        let temp = TempDir::new().unwrap();
        let python = temp.path().join("fake-python");
        fs::write(&python, "").unwrap();

        let resolved = resolve_host_python(Some("./fake-python"), temp.path()).unwrap();
        assert!(resolved.is_absolute());
        assert_eq!(resolved, python);
    }

    #[test]
    fn test_bogus_override_is_error() {
        let err = resolve_host_python(Some("/nonexistent/python_xyz_12345"), Path::new("/"))
            .unwrap_err();
        assert!(err.to_string().contains(PYTHON_ENV_VAR));
    }

    #[test]
    fn test_missing_project_inputs() {
        let temp = TempDir::new().unwrap();
        let root = temp.path();
        fs::write(root.join("requirements.txt"), "PyQt5\n").unwrap();
        fs::create_dir_all(root.join("src/GUI/assets")).unwrap();

        let missing = missing_project_inputs(root, &PackagerSpec::default());
        assert_eq!(
            missing,
            vec![root.join("src/main.py"), root.join("src/GUI/assets/icone.ico")]
        );
    }
}
