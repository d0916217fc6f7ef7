//! Build Options

use std::path::PathBuf;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;

use crate::config::Config;

/// Inputs for one build
#[derive(Debug, Clone)]
pub struct BuildOptions {
    /// Directory relative paths are resolved against
    pub project_root: PathBuf,
    /// Fully layered configuration (file, env, CLI)
    pub config: Config,
    /// Set from the Ctrl-C handler; checked at entry boundaries
    pub cancel: Arc<AtomicBool>,
}

impl BuildOptions {
    pub fn new(project_root: impl Into<PathBuf>, config: Config) -> Self {
        Self {
            project_root: project_root.into(),
            config,
            cancel: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn with_cancel(mut self, cancel: Arc<AtomicBool>) -> Self {
        self.cancel = cancel;
        self
    }
}
