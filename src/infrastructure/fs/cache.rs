//! Download cache
//!
//! Remote artifacts are stored in Maven layout under the cache root. Writes
//! are atomic and serialized across processes with an exclusive `fs2` lock,
//! so two builds sharing a cache never see half-written jars.

use std::fs::{File, OpenOptions};
use std::path::{Component, Path, PathBuf};

use fs2::FileExt;

use super::local::atomic_write;
use crate::domain::value_objects::Coordinate;
use crate::error::{PackError, PackResult};

const LOCK_FILE: &str = ".lock";

#[derive(Debug, Clone)]
pub struct ArtifactCache {
    root: PathBuf,
}

impl ArtifactCache {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Cache path for a file downloaded from `repository`; always below the cache root
    pub fn path_for(&self, repository: &str, coordinate: &Coordinate) -> PackResult<PathBuf> {
        let mut components = Path::new(repository).components();
        if !matches!(
            (components.next(), components.next()),
            (Some(Component::Normal(_)), None)
        ) {
            return Err(PackError::InvalidConfig {
                file: PathBuf::from(crate::config::CONFIG_FILE_NAME),
                message: format!("repository name '{}' is not a plain directory name", repository),
            });
        }
        coordinate.path_under(&self.root.join(repository))
    }

    pub fn lookup(&self, repository: &str, coordinate: &Coordinate) -> Option<PathBuf> {
        let path = self.path_for(repository, coordinate).ok()?;
        path.is_file().then_some(path)
    }

    /// Store downloaded bytes and return their cached location
    pub fn store(&self, repository: &str, coordinate: &Coordinate, bytes: &[u8]) -> PackResult<PathBuf> {
        let path = self.path_for(repository, coordinate)?;
        let _guard = self.lock()?;
        atomic_write(&path, bytes)?;
        tracing::trace!(path = %path.display(), bytes = bytes.len(), "cached download");
        Ok(path)
    }

    fn lock(&self) -> PackResult<CacheLock> {
        std::fs::create_dir_all(&self.root)?;
        let file = OpenOptions::new()
            .create(true)
            .truncate(false)
            .write(true)
            .open(self.root.join(LOCK_FILE))?;
        file.lock_exclusive()?;
        Ok(CacheLock { file })
    }
}

struct CacheLock {
    file: File,
}

impl Drop for CacheLock {
    fn drop(&mut self) {
        let _ = FileExt::unlock(&self.file);
    }
}
