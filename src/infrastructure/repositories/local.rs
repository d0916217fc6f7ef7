//! Maven-layout directory repository
//!
//! Used for `~/.m2/repository`, `path = ...` project repositories and
//! `file://` URLs. Nothing is copied: the file is used where it lies.

use std::path::{Path, PathBuf};

use crate::domain::ports::ArtifactRepository;
use crate::domain::value_objects::Coordinate;
use crate::error::PackResult;

#[derive(Debug, Clone)]
pub struct LocalMavenRepository {
    name: String,
    root: PathBuf,
}

impl LocalMavenRepository {
    pub fn new(name: impl Into<String>, root: impl Into<PathBuf>) -> Self {
        Self {
            name: name.into(),
            root: root.into(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl ArtifactRepository for LocalMavenRepository {
    fn name(&self) -> &str {
        &self.name
    }

    fn location(&self) -> String {
        self.root.display().to_string()
    }

    fn fetch(&self, coordinate: &Coordinate) -> PackResult<Option<PathBuf>> {
        let path = coordinate.path_under(&self.root)?;
        if path.is_file() {
            tracing::trace!(repository = %self.name, path = %path.display(), "found");
            Ok(Some(path))
        } else {
            Ok(None)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::value_objects::ModuleId;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn fetch_finds_files_in_maven_layout() {
        let dir = tempdir().unwrap();
        let coord: Coordinate = "org.xerial:sqlite-jdbc:3.49.1.0".parse().unwrap();
        let file = dir.path().join(coord.repository_path());
        fs::create_dir_all(file.parent().unwrap()).unwrap();
        fs::write(&file, "jar").unwrap();

        let repo = LocalMavenRepository::new("maven-local", dir.path());
        assert_eq!(repo.fetch(&coord).unwrap(), Some(file));
        assert_eq!(repo.fetch(&coord.pom()).unwrap(), None);
    }

    #[test]
    fn fetch_rejects_coordinates_leaving_the_root() {
        let dir = tempdir().unwrap();
        let repo = LocalMavenRepository::new("maven-local", dir.path().join("repo"));
        let hostile = Coordinate::new(ModuleId::new("x", "y"), "..");
        assert!(repo.fetch(&hostile).is_err());
    }
}
