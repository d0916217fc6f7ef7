use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use anyhow::{Context, Result};
use plugpack::application::{BuildOptions, PackageAssembler};
use plugpack::presentation::{json_line, BuildArgs, ConsoleEventSink};

use super::project::Project;
use crate::ui::context::UiContext;

pub fn cmd_build(project_dir: Option<&Path>, args: &BuildArgs, ui: &UiContext) -> Result<()> {
    let project = Project::load(project_dir, &args.overrides())?;

    let cancel = Arc::new(AtomicBool::new(false));
    let cancel_flag = cancel.clone();
    ctrlc::set_handler(move || {
        cancel_flag.store(true, Ordering::SeqCst);
    })
    .context("failed to install the Ctrl-C handler")?;

    let options = BuildOptions::new(&project.root, project.config).with_cancel(cancel);
    let mut assembler = PackageAssembler::new(options);
    if !ui.json() && ui.verbose > 0 {
        assembler = assembler.with_events(Arc::new(ConsoleEventSink::new(ui.renderer())));
    }

    let report = assembler.build()?;
    if ui.json() {
        println!("{}", json_line("build", &report));
    } else {
        print!("{}", ui.renderer().render_build(&report, ui.verbose > 0));
    }
    Ok(())
}
