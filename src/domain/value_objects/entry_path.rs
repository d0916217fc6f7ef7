//! Archive Entry Path Value Object
//!
//! A validated archive entry name:
//! - Forward slashes only
//! - Relative (no leading `/`, no drive prefix)
//! - No `.` or `..` components
//! - Non-empty

use std::fmt;
use std::path::{Component, Path};

use crate::error::{PackError, PackResult};

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EntryPath(String);

impl EntryPath {
    /// Validate a raw zip entry name
    ///
    /// Backslashes are treated as separators so that archives produced on
    /// Windows map onto the same entry as their forward-slash twins.
    pub fn parse(raw: &str) -> PackResult<Self> {
        let invalid = |reason: &str| PackError::InvalidEntryPath {
            path: raw.to_string(),
            reason: reason.to_string(),
        };

        let normalized = raw.replace('\\', "/");
        if normalized.starts_with('/') {
            return Err(invalid("absolute paths are not allowed"));
        }

        let mut segments = Vec::new();
        for segment in normalized.split('/') {
            match segment {
                "" | "." => continue,
                ".." => return Err(invalid("path contains traversal components (..)")),
                s if s.contains(':') && segments.is_empty() && s.len() == 2 => {
                    return Err(invalid("drive prefixes are not allowed"));
                }
                s => segments.push(s),
            }
        }

        if segments.is_empty() {
            return Err(invalid("path is empty"));
        }

        Ok(Self(segments.join("/")))
    }

    /// Build an entry name from a file path relative to a source directory
    pub fn from_relative(path: &Path) -> PackResult<Self> {
        let mut segments = Vec::new();
        for component in path.components() {
            match component {
                Component::Normal(s) => segments.push(s.to_string_lossy().into_owned()),
                Component::CurDir => {}
                _ => {
                    return Err(PackError::InvalidEntryPath {
                        path: path.display().to_string(),
                        reason: "expected a path relative to its source directory".to_string(),
                    })
                }
            }
        }
        Self::parse(&segments.join("/"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Parent directory entry names, outermost first (`a/`, `a/b/`)
    pub fn parent_dirs(&self) -> Vec<String> {
        let mut dirs = Vec::new();
        let mut acc = String::new();
        let segments: Vec<&str> = self.0.split('/').collect();
        for segment in &segments[..segments.len().saturating_sub(1)] {
            acc.push_str(segment);
            acc.push('/');
            dirs.push(acc.clone());
        }
        dirs
    }

    /// Final path component
    pub fn file_name(&self) -> &str {
        self.0.rsplit('/').next().unwrap_or(&self.0)
    }
}

impl fmt::Display for EntryPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for EntryPath {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
