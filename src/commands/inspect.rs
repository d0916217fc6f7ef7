use std::path::Path;

use anyhow::Result;
use plugpack::application::inspect_archive;
use plugpack::presentation::json_line;

use crate::ui::context::UiContext;

pub fn cmd_inspect(archive: &Path, ui: &UiContext) -> Result<()> {
    let listing = inspect_archive(archive)?;
    if ui.json() {
        println!("{}", json_line("inspect", &listing));
    } else {
        print!("{}", ui.renderer().render_listing(&listing));
    }
    Ok(())
}
