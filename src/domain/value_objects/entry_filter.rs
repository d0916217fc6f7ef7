//! Entry filter value object
//!
//! Matches archive entry names against gitignore-style patterns. Used to
//! strip code-signature metadata (`META-INF/*.SF` and friends) from
//! dependency content before it is merged into one archive.

use ignore::gitignore::{Gitignore, GitignoreBuilder};
use std::fmt;
use std::path::Path;

use super::EntryPath;
use crate::error::{PackError, PackResult};

/// Signature files of signed jars; merging them produces an invalid signature
pub const SIGNATURE_PATTERNS: &[&str] = &["META-INF/*.SF", "META-INF/*.DSA", "META-INF/*.RSA"];

/// Compiled set of exclusion patterns.
#[derive(Clone)]
pub struct EntryFilter {
    matcher: Gitignore,
    patterns: Vec<String>,
}

impl Default for EntryFilter {
    fn default() -> Self {
        Self::empty()
    }
}

impl EntryFilter {
    /// Create an empty filter (matches nothing).
    pub fn empty() -> Self {
        Self {
            matcher: Gitignore::empty(),
            patterns: Vec::new(),
        }
    }

    /// The signature-stripping filter applied to embedded dependencies.
    pub fn signatures() -> Self {
        Self::new(SIGNATURE_PATTERNS.iter().copied())
            .unwrap_or_else(|_| Self::empty())
    }

    /// Compile patterns; `*` never crosses `/`, a leading segment anchors.
    pub fn new<I, S>(patterns: I) -> PackResult<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut builder = GitignoreBuilder::new("");
        let mut kept = Vec::new();

        for pattern in patterns {
            let pattern = pattern.as_ref().trim();
            if pattern.is_empty() || pattern.starts_with('#') {
                continue;
            }
            builder
                .add_line(None, pattern)
                .map_err(|e| PackError::InvalidPattern {
                    pattern: pattern.to_string(),
                    message: e.to_string(),
                })?;
            kept.push(pattern.to_string());
        }

        let matcher = builder.build().map_err(|e| PackError::InvalidPattern {
            pattern: kept.join(", "),
            message: e.to_string(),
        })?;

        Ok(Self {
            matcher,
            patterns: kept,
        })
    }

    /// Check whether an entry is excluded.
    pub fn is_excluded(&self, entry: &EntryPath) -> bool {
        if self.patterns.is_empty() {
            return false;
        }
        self.matcher
            .matched_path_or_any_parents(Path::new(entry.as_str()), false)
            .is_ignore()
    }

    pub fn patterns(&self) -> &[String] {
        &self.patterns
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }
}

impl fmt::Debug for EntryFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EntryFilter")
            .field("patterns", &self.patterns)
            .finish()
    }
}
