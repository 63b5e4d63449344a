//! Build configuration and packager options.
//!
//! [`BuildConfig`] comes from the command line and never changes after
//! startup. [`PackagerSpec`] carries the fixed packaging options; a project
//! may override individual fields through an optional `bipy-build.toml`.

use anyhow::{bail, Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::{Component, Path, PathBuf};

/// Default location of the isolated environment, relative to the project root.
pub const DEFAULT_ENV_DIR: &str = ".venv";

/// Config file picked up from the project root when `--config` is not given.
pub const DEFAULT_CONFIG_FILENAME: &str = "bipy-build.toml";

/// How the build should provision its interpreter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildConfig {
    pub use_isolated_env: bool,
    pub env_path: PathBuf,
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self {
            use_isolated_env: false,
            env_path: PathBuf::from(DEFAULT_ENV_DIR),
        }
    }
}

impl BuildConfig {
    pub fn new(use_isolated_env: bool, env_path: impl Into<PathBuf>) -> Self {
        Self {
            use_isolated_env,
            env_path: env_path.into(),
        }
    }

    /// Absolute location of the isolated environment under `project_root`.
    ///
    /// Absolute `env_path` values are returned unchanged; `.` components are
    /// dropped so `./buildenv` and `buildenv` resolve to the same directory.
    pub fn env_dir(&self, project_root: &Path) -> PathBuf {
        let cleaned: PathBuf = self
            .env_path
            .components()
            .filter(|c| !matches!(c, Component::CurDir))
            .collect();
        project_root.join(cleaned)
    }
}

/// One `--add-data` mapping: a source path and its destination inside the bundle.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DataMapping {
    pub source: String,
    pub dest: String,
}

impl DataMapping {
    pub fn new(source: &str, dest: &str) -> Self {
        Self {
            source: source.to_string(),
            dest: dest.to_string(),
        }
    }
}

/// Options handed to the packager and the installer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackagerSpec {
    /// Output executable name.
    pub name: String,
    /// Application entry point, relative to the project root.
    pub entry_point: String,
    pub icon: String,
    pub data: Vec<DataMapping>,
    pub hidden_imports: Vec<String>,
    /// Requirements manifest installed before the packaging tool.
    pub requirements: String,
    /// Package name passed to pip.
    pub tool_package: String,
    /// Module name passed to `python -m`.
    pub tool_module: String,
    /// Directory the packager writes the finished executable to.
    pub dist_dir: String,
}

impl Default for PackagerSpec {
    fn default() -> Self {
        Self {
            name: "BIPy".to_string(),
            entry_point: "src/main.py".to_string(),
            icon: "src/GUI/assets/icone.ico".to_string(),
            data: vec![DataMapping::new("src/GUI/assets", "src/GUI/assets")],
            hidden_imports: vec![
                "PyQt5.QtCore".to_string(),
                "PyQt5.QtWidgets".to_string(),
                "PyQt5.QtGui".to_string(),
            ],
            requirements: "requirements.txt".to_string(),
            tool_package: "pyinstaller".to_string(),
            tool_module: "PyInstaller".to_string(),
            dist_dir: "dist".to_string(),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct BuildToml {
    packager: Option<PackagerToml>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct PackagerToml {
    name: Option<String>,
    entry_point: Option<String>,
    icon: Option<String>,
    data: Option<Vec<DataMapping>>,
    hidden_imports: Option<Vec<String>>,
    requirements: Option<String>,
    tool_package: Option<String>,
    tool_module: Option<String>,
    dist_dir: Option<String>,
}

/// Load the packager options for `project_root`.
///
/// An explicit `config_path` must exist and is resolved against
/// `invocation_dir`, the directory the user ran the command from. Without one,
/// `bipy-build.toml` in the project root is used when present, and the
/// built-in defaults otherwise.
pub fn load_packager_spec(
    project_root: &Path,
    config_path: Option<&Path>,
    invocation_dir: &Path,
) -> Result<PackagerSpec> {
    let path = match config_path {
        Some(path) => invocation_dir.join(path),
        None => {
            let candidate = project_root.join(DEFAULT_CONFIG_FILENAME);
            if !candidate.is_file() {
                return Ok(PackagerSpec::default());
            }
            candidate
        }
    };

    let raw = fs::read_to_string(&path)
        .with_context(|| format!("reading build config '{}'", path.display()))?;
    parse_packager_spec(&raw).with_context(|| format!("parsing build config '{}'", path.display()))
}

fn parse_packager_spec(raw: &str) -> Result<PackagerSpec> {
    let parsed: BuildToml = toml::from_str(raw)?;
    let overrides = parsed.packager.unwrap_or_default();
    let mut spec = PackagerSpec::default();

    if let Some(name) = overrides.name {
        spec.name = non_empty(name, "packager.name")?;
    }
    if let Some(entry_point) = overrides.entry_point {
        spec.entry_point = non_empty(entry_point, "packager.entry_point")?;
    }
    if let Some(icon) = overrides.icon {
        spec.icon = non_empty(icon, "packager.icon")?;
    }
    if let Some(data) = overrides.data {
        spec.data = data;
    }
    if let Some(hidden_imports) = overrides.hidden_imports {
        spec.hidden_imports = hidden_imports
            .into_iter()
            .map(|module| module.trim().to_string())
            .filter(|module| !module.is_empty())
            .collect();
    }
    if let Some(requirements) = overrides.requirements {
        spec.requirements = non_empty(requirements, "packager.requirements")?;
    }
    if let Some(tool_package) = overrides.tool_package {
        spec.tool_package = non_empty(tool_package, "packager.tool_package")?;
    }
    if let Some(tool_module) = overrides.tool_module {
        spec.tool_module = non_empty(tool_module, "packager.tool_module")?;
    }
    if let Some(dist_dir) = overrides.dist_dir {
        spec.dist_dir = non_empty(dist_dir, "packager.dist_dir")?;
    }

    Ok(spec)
}

fn non_empty(value: String, field: &str) -> Result<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        bail!("{field} must not be empty");
    }
    Ok(trimmed.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_build_config_uses_dot_venv() {
        let config = BuildConfig::default();
        assert!(!config.use_isolated_env);
        assert_eq!(config.env_path, PathBuf::from(".venv"));
    }

    #[test]
    fn test_env_dir_strips_current_dir_components() {
        let root = Path::new("/work/bipy");
        let dotted = BuildConfig::new(true, "./buildenv");
        let plain = BuildConfig::new(true, "buildenv");
        assert_eq!(dotted.env_dir(root), PathBuf::from("/work/bipy/buildenv"));
        assert_eq!(dotted.env_dir(root), plain.env_dir(root));
    }

    #[test]
    fn test_env_dir_keeps_absolute_paths() {
        let config = BuildConfig::new(true, "/opt/envs/bipy");
        assert_eq!(
            config.env_dir(Path::new("/work/bipy")),
            PathBuf::from("/opt/envs/bipy")
        );
    }

    #[test]
    fn test_missing_default_config_yields_defaults() {
        let temp = TempDir::new().unwrap();
        let spec = load_packager_spec(temp.path(), None, temp.path()).unwrap();
        assert_eq!(spec, PackagerSpec::default());
        assert_eq!(spec.name, "BIPy");
        assert_eq!(spec.hidden_imports.len(), 3);
    }

    #[test]
    fn test_explicit_config_must_exist() {
        let temp = TempDir::new().unwrap();
        let err = load_packager_spec(temp.path(), Some(Path::new("missing.toml")), temp.path())
            .unwrap_err();
        assert!(format!("{err:#}").contains("missing.toml"));
    }

    #[test]
    fn test_explicit_config_resolves_from_invocation_dir() {
        let temp = TempDir::new().unwrap();
        let caller = temp.path().join("caller");
        let app = temp.path().join("app");
        fs::create_dir_all(&caller).unwrap();
        fs::create_dir_all(&app).unwrap();
        fs::write(caller.join("my.toml"), "[packager]\nname = \"FromCaller\"\n").unwrap();
        fs::write(app.join("my.toml"), "[packager]\nname = \"FromApp\"\n").unwrap();

        let spec = load_packager_spec(&app, Some(Path::new("./my.toml")), &caller).unwrap();
        assert_eq!(spec.name, "FromCaller");
    }

    #[test]
    fn test_default_config_file_overrides_fields() {
        let temp = TempDir::new().unwrap();
        fs::write(
            temp.path().join(DEFAULT_CONFIG_FILENAME),
            r#"
[packager]
name = "BIPyDev"
hidden_imports = ["PyQt5.QtCore", "  "]
data = [{ source = "assets", dest = "assets" }]
"#,
        )
        .unwrap();

        let spec = load_packager_spec(temp.path(), None, temp.path()).unwrap();
        assert_eq!(spec.name, "BIPyDev");
        assert_eq!(spec.hidden_imports, vec!["PyQt5.QtCore".to_string()]);
        assert_eq!(spec.data, vec![DataMapping::new("assets", "assets")]);
        assert_eq!(spec.entry_point, "src/main.py");
    }

    #[test]
    fn test_unknown_keys_are_rejected() {
        let err = parse_packager_spec("[packager]\nconsole = true\n").unwrap_err();
        assert!(err.to_string().contains("console"));
    }

    #[test]
    fn test_empty_name_is_rejected() {
        let err = parse_packager_spec("[packager]\nname = \"  \"\n").unwrap_err();
        assert!(err.to_string().contains("packager.name"));
    }
}
