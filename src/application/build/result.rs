//! Build Result

use std::path::PathBuf;

use serde::Serialize;

use crate::domain::entities::DuplicateRecord;

/// One same-path collision, as reported to users
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DuplicateSummary {
    pub path: String,
    pub kept_from: String,
    pub dropped_from: String,
}

impl From<&DuplicateRecord> for DuplicateSummary {
    fn from(record: &DuplicateRecord) -> Self {
        Self {
            path: record.path.to_string(),
            kept_from: record.kept_from.clone(),
            dropped_from: record.dropped_from.clone(),
        }
    }
}

/// Result of a successful build
#[derive(Debug, Clone, Default, Serialize)]
pub struct BuildReport {
    pub output: PathBuf,
    pub host_jar: PathBuf,
    /// File entries in the archive (directories not counted)
    pub entries: usize,
    pub bytes: u64,
    /// Embedded artifacts in layering order
    pub artifacts: Vec<String>,
    /// Modules removed by the global exclusion rules
    pub excluded_modules: Vec<String>,
    /// Every resolved duplicate, identical or not
    pub duplicates: Vec<DuplicateSummary>,
    /// Duplicates whose contents differed
    pub conflicts: Vec<DuplicateSummary>,
    /// Signature and other filtered dependency entries
    pub excluded_entries: Vec<String>,
}

impl BuildReport {
    pub fn has_conflicts(&self) -> bool {
        !self.conflicts.is_empty()
    }
}
