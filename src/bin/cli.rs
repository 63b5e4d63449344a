use clap::Parser;
use std::path::PathBuf;

use bipy_builder::config::DEFAULT_ENV_DIR;

/// Build the BIPy executable with PyInstaller
#[derive(Parser, Debug)]
#[command(name = "bipy-build")]
#[command(version, about, long_about = None)]
pub(crate) struct Cli {
    /// Use a virtual environment for building
    #[arg(long)]
    pub(crate) venv: bool,

    /// Path to the virtual environment
    #[arg(long, value_name = "PATH", default_value = DEFAULT_ENV_DIR)]
    pub(crate) venv_path: PathBuf,

    /// Project root every step runs from (default: current directory)
    #[arg(long, value_name = "DIR", env = "BIPY_PROJECT_ROOT")]
    pub(crate) project_root: Option<PathBuf>,

    /// Packager overrides, relative to the current directory (default: bipy-build.toml in the project root, if present)
    #[arg(long, value_name = "FILE")]
    pub(crate) config: Option<PathBuf>,
}
