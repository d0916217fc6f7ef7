use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use anyhow::{Context, Result};
use plugpack::application::{WatchEvent, WatchOptions, WatchUseCase};
use plugpack::presentation::BuildArgs;

use super::project::Project;
use crate::ui::context::UiContext;

pub fn cmd_watch(project_dir: Option<&Path>, args: &BuildArgs, ui: &UiContext) -> Result<()> {
    let overrides = args.overrides();
    let project = Project::load(project_dir, &overrides)?;

    // Ctrl-C stops watching and aborts a build in progress
    let running = Arc::new(AtomicBool::new(true));
    let cancel = Arc::new(AtomicBool::new(false));
    let (running_flag, cancel_flag) = (running.clone(), cancel.clone());
    ctrlc::set_handler(move || {
        running_flag.store(false, Ordering::SeqCst);
        cancel_flag.store(true, Ordering::SeqCst);
    })
    .context("failed to install the Ctrl-C handler")?;

    let options = WatchOptions::new(&project.root, project.config)
        .with_overrides(overrides)
        .with_cancel(cancel);
    let json = ui.json();
    let renderer = ui.renderer();

    let result = WatchUseCase::new(options).start(running, |event| {
        if json {
            println!("{}", event.to_json());
            return;
        }
        let rendered = renderer.render_watch_event(&event);
        match event {
            WatchEvent::Error { .. } => eprint!("{}", rendered),
            _ => print!("{}", rendered),
        }
    });

    match result {
        Err(plugpack::PackError::Interrupted) => Ok(()),
        other => other.map_err(Into::into),
    }
}
