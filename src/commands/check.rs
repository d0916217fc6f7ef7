use std::path::{Path, PathBuf};

use anyhow::Result;
use plugpack::application::CheckUseCase;
use plugpack::presentation::json_line;
use plugpack::CliOverrides;

use super::project::Project;
use crate::ui::context::UiContext;

/// Returns the exit code: 0 when every check passed or only warned
pub fn cmd_check(project_dir: Option<&Path>, host_jar: Option<PathBuf>, ui: &UiContext) -> Result<i32> {
    let overrides = CliOverrides {
        host_jar,
        ..CliOverrides::default()
    };
    let project = Project::load(project_dir, &overrides)?;
    let result = CheckUseCase::new(project.config, project.warnings).execute(&project.root);

    if ui.json() {
        let mut value = serde_json::to_value(&result)?;
        value["success"] = serde_json::json!(result.is_success());
        println!("{}", json_line("check", &value));
    } else {
        print!("{}", ui.renderer().render_check(&result));
    }

    Ok(result
        .first_error_category()
        .map(|category| category.exit_code())
        .unwrap_or(if result.is_success() { 0 } else { 1 }))
}
