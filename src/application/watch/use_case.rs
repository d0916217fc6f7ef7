//! Watch Use Case implementation

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::channel;
use std::sync::Arc;
use std::time::{Duration, Instant};

use notify::{Config as NotifyConfig, Event, RecommendedWatcher, RecursiveMode, Watcher};

use crate::application::build::{BuildOptions, BuildReport, PackageAssembler};
use crate::config::Config;
use crate::error::{PackError, PackResult};

use super::event::{is_relevant, WatchEvent, WatchOptions, WatchRegistry, WatcherState};

/// Watch Use Case
///
/// Builds once, then rebuilds after each debounced batch of changes until
/// the running flag is cleared.
pub struct WatchUseCase {
    options: WatchOptions,
}

impl WatchUseCase {
    pub fn new(options: WatchOptions) -> Self {
        Self { options }
    }

    /// Start watching (blocking)
    pub fn start<F>(&self, running: Arc<AtomicBool>, on_event: F) -> PackResult<()>
    where
        F: Fn(WatchEvent),
    {
        let mut config = self.options.config.clone();
        let mut watched = self.options.watched_paths();
        on_event(WatchEvent::WatchStarted {
            watching: watched.iter().map(|p| p.display().to_string()).collect(),
        });

        self.rebuild(&config, &on_event)?;

        let (tx, rx) = channel();
        let mut watcher = RecommendedWatcher::new(
            move |res: Result<Event, notify::Error>| {
                if let Ok(event) = res {
                    for path in event.paths {
                        let _ = tx.send(path);
                    }
                }
            },
            NotifyConfig::default(),
        )
        .map_err(|e| PackError::Io(std::io::Error::other(e.to_string())))?;

        let mut registry = WatchRegistry::new();
        self.register(&mut watcher, &mut registry, &watched);

        // notify sometimes reports pre-existing files right after registration
        let cooldown_end = Instant::now() + Duration::from_millis(500);
        while Instant::now() < cooldown_end && running.load(Ordering::SeqCst) {
            let _ = rx.recv_timeout(Duration::from_millis(50));
        }

        let output_dir = self.output_dir(&config);
        let mut state = WatcherState::new();
        while running.load(Ordering::SeqCst) {
            if let Ok(path) = rx.recv_timeout(Duration::from_millis(50)) {
                // A directory on the way to a watched path may just have appeared
                self.register(&mut watcher, &mut registry, &watched);
                if !path.starts_with(&output_dir) && is_relevant(&path, &watched) {
                    state.add_change(path);
                }
            }

            if state.should_build() {
                let changes = state.take_changes();
                for path in &changes {
                    on_event(WatchEvent::FileChanged {
                        path: path.display().to_string(),
                    });
                }
                if changes.iter().any(|p| self.options.is_config_file(p)) {
                    match Config::load_for_project(&self.options.project_root) {
                        Ok((reloaded, _)) => {
                            config = reloaded.with_cli_overrides(&self.options.overrides);
                            watched = self.options.paths_for(&config);
                            self.register(&mut watcher, &mut registry, &watched);
                            on_event(WatchEvent::ConfigReloaded);
                        }
                        Err(e) => {
                            on_event(WatchEvent::Error {
                                message: e.to_string(),
                            });
                            continue;
                        }
                    }
                }
                self.rebuild(&config, &on_event)?;
            }
        }

        on_event(WatchEvent::Shutdown);
        Ok(())
    }

    /// Register whatever became watchable since the last call
    fn register(
        &self,
        watcher: &mut impl Watcher,
        registry: &mut WatchRegistry,
        watched: &[PathBuf],
    ) {
        for (path, recursive) in registry.refresh(&self.options.project_root, watched) {
            let mode = if recursive {
                RecursiveMode::Recursive
            } else {
                RecursiveMode::NonRecursive
            };
            match watcher.watch(&path, mode) {
                Ok(()) => tracing::debug!(path = %path.display(), recursive, "watching"),
                Err(e) => {
                    // Usually the path vanished again; the next event retries
                    tracing::debug!(path = %path.display(), error = %e, "watch registration failed");
                    registry.forget(&path);
                }
            }
        }
    }

    /// Build failures are reported and watching continues; an interrupt ends it
    fn rebuild(&self, config: &Config, on_event: &impl Fn(WatchEvent)) -> PackResult<()> {
        on_event(WatchEvent::BuildStarted);
        match self.build_once(config) {
            Ok(report) => {
                on_event(WatchEvent::BuildComplete {
                    output: report.output.display().to_string(),
                    entries: report.entries,
                    conflicts: report.conflicts.len(),
                });
                Ok(())
            }
            Err(PackError::Interrupted) => Err(PackError::Interrupted),
            Err(e) => {
                tracing::debug!(error = %e, "build failed in watch mode");
                on_event(WatchEvent::Error {
                    message: e.to_string(),
                });
                Ok(())
            }
        }
    }

    fn build_once(&self, config: &Config) -> PackResult<BuildReport> {
        let options = BuildOptions::new(&self.options.project_root, config.clone())
            .with_cancel(self.options.cancel.clone());
        PackageAssembler::new(options).build()
    }

    fn output_dir(&self, config: &Config) -> PathBuf {
        config
            .output_path(&self.options.project_root)
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| self.options.project_root.clone())
    }
}
