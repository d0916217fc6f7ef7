use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use plugpack::application::QueryUseCase;
use plugpack::presentation::json_line;
use plugpack::CliOverrides;

use super::project::Project;
use crate::ui::context::UiContext;

pub fn cmd_classpath(
    project_dir: Option<&Path>,
    embedded: bool,
    host_jar: Option<PathBuf>,
    offline: bool,
    ui: &UiContext,
) -> Result<()> {
    let overrides = CliOverrides {
        host_jar,
        offline,
        ..CliOverrides::default()
    };
    let project = Project::load(project_dir, &overrides)?;
    let entries = QueryUseCase::new(&project.root, &project.config).classpath(embedded)?;

    if ui.json() {
        println!("{}", json_line("classpath", &entries));
        return Ok(());
    }
    let joined = std::env::join_paths(&entries)
        .context("a classpath entry contains the path separator")?;
    println!("{}", joined.to_string_lossy());
    Ok(())
}
