//! Artifact entities
//!
//! - `RequiredArtifact` - the host library compiled against, never embedded
//! - `EmbeddedDependency` - a declared library to bundle
//! - `ResolvedArtifact` - a bundled library located on disk

use std::fmt;
use std::path::{Path, PathBuf};

use crate::domain::value_objects::Coordinate;
use crate::error::{PackError, PackResult};

/// Host-provided library that must exist before any packaging work
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequiredArtifact {
    label: String,
    configured: PathBuf,
    location: PathBuf,
}

impl RequiredArtifact {
    /// Resolve `configured` against the project root (absolute paths are kept)
    pub fn new(label: impl Into<String>, configured: impl Into<PathBuf>, project_root: &Path) -> Self {
        let configured = configured.into();
        let location = if configured.is_absolute() {
            configured.clone()
        } else {
            project_root.join(&configured)
        };
        Self {
            label: label.into(),
            configured,
            location,
        }
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    /// Path as the user wrote it, used in messages
    pub fn configured(&self) -> &Path {
        &self.configured
    }

    pub fn location(&self) -> &Path {
        &self.location
    }

    /// Fail with a configuration error unless the file is present
    pub fn ensure_present(&self) -> PackResult<&Path> {
        if self.location.is_file() {
            Ok(&self.location)
        } else {
            Err(PackError::MissingRequiredArtifact {
                label: self.label.clone(),
                path: self.configured.clone(),
            })
        }
    }
}

/// One entry of the embed list, in declaration order
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EmbeddedDependency {
    /// Resolved from repositories
    Module(Coordinate),
    /// A jar file or an unpacked directory on disk, relative to the project root
    Local(PathBuf),
}

impl fmt::Display for EmbeddedDependency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EmbeddedDependency::Module(coord) => write!(f, "{}", coord),
            EmbeddedDependency::Local(path) => write!(f, "{}", path.display()),
        }
    }
}

/// How an artifact's content is laid out on disk
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArtifactLayout {
    /// Zip-compatible file whose entries get extracted
    Archive,
    /// Already unpacked tree copied as-is
    Directory,
}

/// A dependency that has been located on disk
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedArtifact {
    name: String,
    coordinate: Option<Coordinate>,
    location: PathBuf,
    layout: ArtifactLayout,
}

impl ResolvedArtifact {
    pub fn from_module(coordinate: Coordinate, location: PathBuf) -> Self {
        Self {
            name: coordinate.to_string(),
            coordinate: Some(coordinate),
            location,
            layout: ArtifactLayout::Archive,
        }
    }

    /// Directories are copied, anything else is treated as an archive
    pub fn from_local(declared: &Path, location: PathBuf) -> Self {
        let layout = if location.is_dir() {
            ArtifactLayout::Directory
        } else {
            ArtifactLayout::Archive
        };
        Self {
            name: declared.display().to_string(),
            coordinate: None,
            location,
            layout,
        }
    }

    /// Human label used as entry origin in reports
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn coordinate(&self) -> Option<&Coordinate> {
        self.coordinate.as_ref()
    }

    pub fn location(&self) -> &Path {
        &self.location
    }

    pub fn layout(&self) -> ArtifactLayout {
        self.layout
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn required_artifact_resolves_relative_to_root() {
        let root = tempdir().unwrap();
        let artifact = RequiredArtifact::new(
            "Hytale server jar",
            "HystaleJar/HytaleServer.jar",
            root.path(),
        );
        assert_eq!(
            artifact.location(),
            root.path().join("HystaleJar/HytaleServer.jar")
        );
        assert_eq!(artifact.configured(), Path::new("HystaleJar/HytaleServer.jar"));
    }

    #[test]
    fn required_artifact_missing_is_configuration_error() {
        let root = tempdir().unwrap();
        let artifact = RequiredArtifact::new("Hytale server jar", "missing.jar", root.path());
        let err = artifact.ensure_present().unwrap_err();
        assert!(err.to_string().contains("Missing Hytale server jar at 'missing.jar'"));
    }

    #[test]
    fn required_artifact_present_returns_location() {
        let root = tempdir().unwrap();
        std::fs::write(root.path().join("host.jar"), b"PK").unwrap();
        let artifact = RequiredArtifact::new("host", "host.jar", root.path());
        assert_eq!(artifact.ensure_present().unwrap(), root.path().join("host.jar"));
    }

    #[test]
    fn required_artifact_directory_is_not_enough() {
        let root = tempdir().unwrap();
        std::fs::create_dir(root.path().join("host.jar")).unwrap();
        let artifact = RequiredArtifact::new("host", "host.jar", root.path());
        assert!(artifact.ensure_present().is_err());
    }

    #[test]
    fn local_artifact_layout_follows_filesystem() {
        let root = tempdir().unwrap();
        let dir = root.path().join("unpacked");
        std::fs::create_dir(&dir).unwrap();
        let artifact = ResolvedArtifact::from_local(Path::new("unpacked"), dir);
        assert_eq!(artifact.layout(), ArtifactLayout::Directory);
        assert_eq!(artifact.name(), "unpacked");
        assert!(artifact.coordinate().is_none());
    }
}
