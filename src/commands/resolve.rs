use std::path::Path;

use anyhow::Result;
use plugpack::application::QueryUseCase;
use plugpack::presentation::json_line;
use plugpack::CliOverrides;

use super::project::Project;
use crate::ui::context::UiContext;

pub fn cmd_resolve(project_dir: Option<&Path>, offline: bool, ui: &UiContext) -> Result<()> {
    let overrides = CliOverrides {
        offline,
        ..CliOverrides::default()
    };
    let project = Project::load(project_dir, &overrides)?;
    let report = QueryUseCase::new(&project.root, &project.config).dependency_tree()?;

    if ui.json() {
        println!("{}", json_line("resolve", &report));
    } else {
        print!("{}", ui.renderer().render_dependencies(&report));
    }
    Ok(())
}
