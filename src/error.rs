//! Error types for plugpack
//!
//! Uses `thiserror` for library errors; the binary wraps them in `anyhow`.
//! Every variant belongs to one of three categories (configuration,
//! resolution, assembly) which decide the process exit code.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for plugpack operations
pub type PackResult<T> = Result<T, PackError>;

/// Broad failure category, used for exit codes and reporting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Configuration,
    Resolution,
    Assembly,
}

impl ErrorCategory {
    pub fn exit_code(self) -> i32 {
        match self {
            ErrorCategory::Configuration => 2,
            ErrorCategory::Resolution => 3,
            ErrorCategory::Assembly => 4,
        }
    }
}

/// Main error type for plugpack operations
#[derive(Error, Debug)]
pub enum PackError {
    /// The host-provided library the plugin compiles against is absent
    #[error(
        "Missing {label} at '{}'. Place it there or override with --host-jar <path> (or PLUGPACK_HOST_JAR).",
        path.display()
    )]
    MissingRequiredArtifact { label: String, path: PathBuf },

    /// Config file could not be parsed
    #[error("invalid configuration in {file}: {message}")]
    InvalidConfig { file: PathBuf, message: String },

    /// Dependency notation could not be parsed
    #[error("invalid dependency coordinate '{input}': {reason}")]
    InvalidCoordinate { input: String, reason: String },

    /// Archive entry name is not a safe relative path
    #[error("invalid archive entry path '{path}': {reason}")]
    InvalidEntryPath { path: String, reason: String },

    /// An exclusion pattern failed to compile
    #[error("invalid exclude pattern '{pattern}': {message}")]
    InvalidPattern { pattern: String, message: String },

    /// A local (path) dependency does not exist
    #[error("embedded dependency not found: {path}")]
    MissingLocalDependency { path: PathBuf },

    /// No configured repository holds the requested file
    #[error("could not find {artifact} in any repository (searched: {searched})")]
    ArtifactNotFound { artifact: String, searched: String },

    /// Transport-level repository failure
    #[error("repository '{repository}' failed for {url}: {message}")]
    Repository {
        repository: String,
        url: String,
        message: String,
    },

    /// POM could not be read or interpreted
    #[error("invalid POM for {coordinate}: {message}")]
    InvalidPom { coordinate: String, message: String },

    /// Two requesters want different versions and the policy is `fail`
    #[error(
        "version conflict for {module}: {first} (required by {first_by}) vs {second} (required by {second_by})"
    )]
    VersionConflict {
        module: String,
        first: String,
        first_by: String,
        second: String,
        second_by: String,
    },

    /// Version ranges and other unsupported notations
    #[error("unsupported version '{version}' for {module}")]
    UnsupportedVersion { module: String, version: String },

    /// Parent chain loops back on itself
    #[error("cyclic parent POM chain at {coordinate}")]
    CyclicParent { coordinate: String },

    /// Two inputs place a file at the same path and the strategy is `fail`
    #[error("duplicate archive entry '{path}' from {first} and {second}")]
    DuplicateEntry {
        path: String,
        first: String,
        second: String,
    },

    /// Reading or writing a zip container failed
    #[error("archive error in {path}: {message}")]
    Archive { path: PathBuf, message: String },

    /// Build was cancelled (Ctrl-C)
    #[error("build interrupted")]
    Interrupted,

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl PackError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            PackError::MissingRequiredArtifact { .. }
            | PackError::InvalidConfig { .. }
            | PackError::InvalidCoordinate { .. }
            | PackError::InvalidEntryPath { .. }
            | PackError::InvalidPattern { .. }
            | PackError::MissingLocalDependency { .. } => ErrorCategory::Configuration,
            PackError::ArtifactNotFound { .. }
            | PackError::Repository { .. }
            | PackError::InvalidPom { .. }
            | PackError::VersionConflict { .. }
            | PackError::UnsupportedVersion { .. }
            | PackError::CyclicParent { .. } => ErrorCategory::Resolution,
            PackError::DuplicateEntry { .. }
            | PackError::Archive { .. }
            | PackError::Interrupted
            | PackError::Io(_) => ErrorCategory::Assembly,
        }
    }

    pub(crate) fn archive(path: impl Into<PathBuf>, err: impl std::fmt::Display) -> Self {
        PackError::Archive {
            path: path.into(),
            message: err.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_missing_artifact_names_path_and_override() {
        let err = PackError::MissingRequiredArtifact {
            label: "Hytale server jar".to_string(),
            path: PathBuf::from("HystaleJar/HytaleServer.jar"),
        };
        assert_eq!(
            err.to_string(),
            "Missing Hytale server jar at 'HystaleJar/HytaleServer.jar'. \
             Place it there or override with --host-jar <path> (or PLUGPACK_HOST_JAR)."
        );
        assert_eq!(err.category(), ErrorCategory::Configuration);
    }

    #[test]
    fn test_error_display_version_conflict() {
        let err = PackError::VersionConflict {
            module: "com.google.protobuf:protobuf-java".to_string(),
            first: "4.29.0".to_string(),
            first_by: "com.mysql:mysql-connector-j:9.3.0".to_string(),
            second: "3.25.1".to_string(),
            second_by: "org.example:other:1.0".to_string(),
        };
        assert!(err.to_string().contains("4.29.0"));
        assert!(err.to_string().contains("3.25.1"));
        assert_eq!(err.category().exit_code(), 3);
    }

    #[test]
    fn test_io_is_assembly() {
        let err: PackError = std::io::Error::other("disk full").into();
        assert_eq!(err.category(), ErrorCategory::Assembly);
        assert_eq!(err.category().exit_code(), 4);
    }
}
