use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use plugpack::config::ConfigWarning;
use plugpack::{CliOverrides, Config};

/// A project directory with its layered configuration
pub struct Project {
    pub root: PathBuf,
    pub config: Config,
    pub warnings: Vec<ConfigWarning>,
}

impl Project {
    /// Defaults < plugpack.toml < PLUGPACK_* < command-line flags
    pub fn load(project_dir: Option<&Path>, overrides: &CliOverrides) -> Result<Self> {
        let root = project_root(project_dir)?;
        let (config, warnings) = Config::load_for_project(&root)?;
        for warning in &warnings {
            eprintln!("Warning: {}", warning);
        }
        Ok(Self {
            root,
            config: config.with_cli_overrides(overrides),
            warnings,
        })
    }
}

/// Canonical project root so the archive name can fall back to the directory name
fn project_root(project_dir: Option<&Path>) -> Result<PathBuf> {
    let dir = match project_dir {
        Some(dir) => dir.to_path_buf(),
        None => std::env::current_dir().context("cannot determine the current directory")?,
    };
    dir.canonicalize()
        .with_context(|| format!("project directory '{}' not found", dir.display()))
}
