//! Watch event types and options

use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};
use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::config::{CliOverrides, Config, CONFIG_FILE_NAME};

/// Debounce duration in milliseconds
pub const DEBOUNCE_MS: u64 = 100;

/// Watch options
#[derive(Debug, Clone)]
pub struct WatchOptions {
    pub project_root: PathBuf,
    /// Config in effect for the first build
    pub config: Config,
    /// Re-applied when `plugpack.toml` changes and is reloaded
    pub overrides: CliOverrides,
    /// Set on Ctrl-C so a running build stops at the next entry
    pub cancel: Arc<AtomicBool>,
}

impl WatchOptions {
    pub fn new(project_root: impl Into<PathBuf>, config: Config) -> Self {
        Self {
            project_root: project_root.into(),
            config,
            overrides: CliOverrides::default(),
            cancel: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn with_overrides(mut self, overrides: CliOverrides) -> Self {
        self.overrides = overrides;
        self
    }

    pub fn with_cancel(mut self, cancel: Arc<AtomicBool>) -> Self {
        self.cancel = cancel;
        self
    }

    /// Class directories, the asset directory and the config file
    pub fn watched_paths(&self) -> Vec<PathBuf> {
        self.paths_for(&self.config)
    }

    /// Same as [`Self::watched_paths`] for a reloaded config
    pub fn paths_for(&self, config: &Config) -> Vec<PathBuf> {
        let root = &self.project_root;
        let mut paths: Vec<PathBuf> = config
            .package
            .classes
            .iter()
            .map(|dir| root.join(dir))
            .collect();
        paths.push(root.join(&config.package.assets));
        paths.push(root.join(CONFIG_FILE_NAME));
        paths
    }

    pub fn is_config_file(&self, path: &Path) -> bool {
        path.file_name().is_some_and(|n| n == CONFIG_FILE_NAME)
            && path.parent().is_some_and(|p| same_dir(p, &self.project_root))
    }
}

fn same_dir(a: &Path, b: &Path) -> bool {
    match (a.canonicalize(), b.canonicalize()) {
        (Ok(a), Ok(b)) => a == b,
        _ => a == b,
    }
}

/// What is registered with the OS watcher
///
/// A watched path that does not exist yet (the class directory before the
/// first compile, a config file not written yet) is covered by a
/// non-recursive watch on its nearest existing ancestor inside the project.
/// Each refresh moves that watch one level closer until the path itself
/// exists and gets its own registration.
#[derive(Debug, Default)]
pub struct WatchRegistry {
    /// Registered path -> recursive
    active: HashMap<PathBuf, bool>,
}

impl WatchRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registrations to add now, as `(path, recursive)`
    ///
    /// Paths that disappeared are forgotten first, so a deleted and
    /// recreated directory is registered again.
    pub fn refresh(&mut self, project_root: &Path, watched: &[PathBuf]) -> Vec<(PathBuf, bool)> {
        self.active.retain(|path, _| path.exists());

        let mut additions = Vec::new();
        for path in watched {
            let target = if path.exists() {
                Some((path.clone(), path.is_dir()))
            } else {
                path.ancestors()
                    .skip(1)
                    .take_while(|dir| dir.starts_with(project_root))
                    .find(|dir| dir.is_dir())
                    .map(|dir| (dir.to_path_buf(), false))
            };
            let Some((target, recursive)) = target else {
                continue;
            };
            match self.active.get(&target) {
                Some(&registered) if registered || !recursive => continue,
                _ => {}
            }
            self.active.insert(target.clone(), recursive);
            additions.push((target, recursive));
        }
        additions
    }

    /// Drop a registration the watcher refused, so the next refresh retries it
    pub fn forget(&mut self, path: &Path) {
        self.active.remove(path);
    }

    pub fn is_registered(&self, path: &Path) -> bool {
        self.active.contains_key(path)
    }
}

/// Changes below a watched path trigger a rebuild; ancestor noise does not
pub fn is_relevant(path: &Path, watched: &[PathBuf]) -> bool {
    watched.iter().any(|w| {
        path.starts_with(w) || w.canonicalize().is_ok_and(|c| path.starts_with(c))
    })
}

/// Watch event types for NDJSON output
#[derive(Debug, Clone, serde::Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum WatchEvent {
    WatchStarted { watching: Vec<String> },
    FileChanged { path: String },
    ConfigReloaded,
    BuildStarted,
    BuildComplete {
        output: String,
        entries: usize,
        conflicts: usize,
    },
    Error { message: String },
    Shutdown,
}

impl WatchEvent {
    /// Convert to JSON string with "command": "watch" field included
    pub fn to_json(&self) -> String {
        let mut value =
            serde_json::to_value(self).unwrap_or_else(|_| serde_json::json!({"event": "error"}));
        if let Some(obj) = value.as_object_mut() {
            obj.insert("command".to_string(), serde_json::json!("watch"));
        }
        serde_json::to_string(&value).unwrap_or_else(|_| "{}".to_string())
    }
}

/// Watcher state for debouncing
#[derive(Debug, Default)]
pub struct WatcherState {
    pending_changes: HashSet<PathBuf>,
    last_change: Option<Instant>,
}

impl WatcherState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_change(&mut self, path: PathBuf) {
        self.pending_changes.insert(path);
        self.last_change = Some(Instant::now());
    }

    /// Debounce period passed and something is pending
    pub fn should_build(&self) -> bool {
        match self.last_change {
            Some(last) => {
                !self.pending_changes.is_empty()
                    && last.elapsed() >= Duration::from_millis(DEBOUNCE_MS)
            }
            None => false,
        }
    }

    /// Take all pending changes (sorted), resetting state
    pub fn take_changes(&mut self) -> Vec<PathBuf> {
        let mut changes: Vec<_> = self.pending_changes.drain().collect();
        changes.sort();
        self.last_change = None;
        changes
    }

    pub fn has_pending(&self) -> bool {
        !self.pending_changes.is_empty()
    }
}
