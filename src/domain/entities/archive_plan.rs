//! Archive plan entity
//!
//! The ordered set of entries the output archive will contain, built layer
//! by layer before anything is written. Duplicate handling happens here:
//! an entry keeps the slot of its first occurrence while the configured
//! [`DuplicatesStrategy`] decides whose content fills it.

use std::collections::HashMap;
use std::path::PathBuf;

use crate::domain::policies::{DuplicateDecision, DuplicatesStrategy};
use crate::domain::value_objects::{ContentHash, EntryPath};
use crate::error::{PackError, PackResult};

/// Where an entry's bytes come from at write time
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EntrySource {
    /// A regular file on disk
    File(PathBuf),
    /// The n-th member of a zip archive
    ArchiveMember { archive: PathBuf, index: usize },
    /// Bytes produced by the assembler itself (the manifest)
    Generated(Vec<u8>),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannedEntry {
    path: EntryPath,
    source: EntrySource,
    hash: ContentHash,
    size: u64,
    origin: String,
}

impl PlannedEntry {
    pub fn new(
        path: EntryPath,
        source: EntrySource,
        hash: ContentHash,
        size: u64,
        origin: impl Into<String>,
    ) -> Self {
        Self {
            path,
            source,
            hash,
            size,
            origin: origin.into(),
        }
    }

    pub fn generated(path: EntryPath, bytes: Vec<u8>, origin: impl Into<String>) -> Self {
        let hash = ContentHash::from_bytes(&bytes);
        let size = bytes.len() as u64;
        Self::new(path, EntrySource::Generated(bytes), hash, size, origin)
    }

    pub fn path(&self) -> &EntryPath {
        &self.path
    }

    pub fn source(&self) -> &EntrySource {
        &self.source
    }

    pub fn hash(&self) -> &ContentHash {
        &self.hash
    }

    pub fn size(&self) -> u64 {
        self.size
    }

    /// Layer label: `classes`, `assets`, a coordinate or a local path
    pub fn origin(&self) -> &str {
        &self.origin
    }
}

/// One resolved same-path collision
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DuplicateRecord {
    pub path: EntryPath,
    pub kept_from: String,
    pub dropped_from: String,
    /// Contents differ, so the choice of winner changes behavior
    pub conflicting: bool,
}

/// An entry left out by the dependency filter
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExcludedEntry {
    pub path: EntryPath,
    pub origin: String,
}

/// What happened to an offered entry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Offer {
    Added,
    Replaced,
    Dropped,
}

#[derive(Debug, Clone, Default)]
pub struct ArchivePlan {
    strategy: DuplicatesStrategy,
    entries: Vec<PlannedEntry>,
    index: HashMap<EntryPath, usize>,
    reserved: Vec<bool>,
    duplicates: Vec<DuplicateRecord>,
    excluded: Vec<ExcludedEntry>,
}

impl ArchivePlan {
    pub fn new(strategy: DuplicatesStrategy) -> Self {
        Self {
            strategy,
            ..Default::default()
        }
    }

    /// Add an entry no later layer can replace (e.g. the generated manifest)
    pub fn reserve(&mut self, entry: PlannedEntry) {
        match self.index.get(entry.path()) {
            Some(&slot) => {
                self.entries[slot] = entry;
                self.reserved[slot] = true;
            }
            None => {
                self.index.insert(entry.path.clone(), self.entries.len());
                self.entries.push(entry);
                self.reserved.push(true);
            }
        }
    }

    /// Offer an entry from the next layer
    pub fn offer(&mut self, entry: PlannedEntry) -> PackResult<Offer> {
        let Some(&slot) = self.index.get(entry.path()) else {
            self.index.insert(entry.path.clone(), self.entries.len());
            self.entries.push(entry);
            self.reserved.push(false);
            return Ok(Offer::Added);
        };

        let existing = &self.entries[slot];
        if existing.origin == entry.origin && existing.hash == entry.hash {
            // Same file listed twice inside one source
            return Ok(Offer::Dropped);
        }
        let conflicting = existing.hash != entry.hash;

        if self.reserved[slot] {
            // Replacing a generated entry is never an option, so it is not a conflict
            self.duplicates.push(DuplicateRecord {
                path: entry.path.clone(),
                kept_from: existing.origin.clone(),
                dropped_from: entry.origin.clone(),
                conflicting: false,
            });
            return Ok(Offer::Dropped);
        }

        match self.strategy.decide() {
            DuplicateDecision::Reject => Err(PackError::DuplicateEntry {
                path: entry.path.to_string(),
                first: existing.origin.clone(),
                second: entry.origin.clone(),
            }),
            DuplicateDecision::Keep => {
                self.duplicates.push(DuplicateRecord {
                    path: entry.path.clone(),
                    kept_from: existing.origin.clone(),
                    dropped_from: entry.origin.clone(),
                    conflicting,
                });
                Ok(Offer::Dropped)
            }
            DuplicateDecision::Replace => {
                self.duplicates.push(DuplicateRecord {
                    path: entry.path.clone(),
                    kept_from: entry.origin.clone(),
                    dropped_from: existing.origin.clone(),
                    conflicting,
                });
                self.entries[slot] = entry;
                Ok(Offer::Replaced)
            }
        }
    }

    pub fn record_excluded(&mut self, path: EntryPath, origin: impl Into<String>) {
        self.excluded.push(ExcludedEntry {
            path,
            origin: origin.into(),
        });
    }

    pub fn entries(&self) -> &[PlannedEntry] {
        &self.entries
    }

    pub fn get(&self, path: &EntryPath) -> Option<&PlannedEntry> {
        self.index.get(path).map(|&slot| &self.entries[slot])
    }

    pub fn duplicates(&self) -> &[DuplicateRecord] {
        &self.duplicates
    }

    /// Duplicates whose contents differed
    pub fn conflicts(&self) -> impl Iterator<Item = &DuplicateRecord> {
        self.duplicates.iter().filter(|d| d.conflicting)
    }

    pub fn excluded(&self) -> &[ExcludedEntry] {
        &self.excluded
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn strategy(&self) -> DuplicatesStrategy {
        self.strategy
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(path: &str, content: &[u8], origin: &str) -> PlannedEntry {
        PlannedEntry::generated(EntryPath::parse(path).unwrap(), content.to_vec(), origin)
    }

    #[test]
    fn last_wins_keeps_first_slot_with_later_content() {
        let mut plan = ArchivePlan::new(DuplicatesStrategy::LastWins);
        plan.offer(entry("a.txt", b"1", "sqlite")).unwrap();
        plan.offer(entry("b.txt", b"x", "sqlite")).unwrap();
        let outcome = plan.offer(entry("a.txt", b"2", "mysql")).unwrap();

        assert_eq!(outcome, Offer::Replaced);
        assert_eq!(plan.len(), 2);
        assert_eq!(plan.entries()[0].origin(), "mysql");
        assert_eq!(plan.entries()[0].hash(), &ContentHash::from_bytes(b"2"));
        assert_eq!(plan.conflicts().count(), 1);
    }

    #[test]
    fn first_wins_drops_later_copies() {
        let mut plan = ArchivePlan::new(DuplicatesStrategy::FirstWins);
        plan.offer(entry("a.txt", b"1", "sqlite")).unwrap();
        assert_eq!(plan.offer(entry("a.txt", b"1", "mysql")).unwrap(), Offer::Dropped);
        assert_eq!(plan.entries()[0].origin(), "sqlite");
        assert_eq!(plan.duplicates().len(), 1);
        assert_eq!(plan.conflicts().count(), 0);
    }

    #[test]
    fn fail_strategy_rejects_duplicates() {
        let mut plan = ArchivePlan::new(DuplicatesStrategy::Fail);
        plan.offer(entry("a.txt", b"1", "sqlite")).unwrap();
        let err = plan.offer(entry("a.txt", b"1", "mysql")).unwrap_err();
        assert!(err.to_string().contains("a.txt"));
    }

    #[test]
    fn reserved_entries_survive_last_wins() {
        let mut plan = ArchivePlan::new(DuplicatesStrategy::LastWins);
        plan.reserve(entry("META-INF/MANIFEST.MF", b"ours", "plugpack"));
        assert_eq!(
            plan.offer(entry("META-INF/MANIFEST.MF", b"theirs", "mysql")).unwrap(),
            Offer::Dropped
        );
        let manifest = plan.get(&EntryPath::parse("META-INF/MANIFEST.MF").unwrap()).unwrap();
        assert_eq!(manifest.origin(), "plugpack");
        assert_eq!(plan.duplicates()[0].kept_from, "plugpack");
        assert_eq!(plan.conflicts().count(), 0);
    }

    #[test]
    fn repeated_identical_member_within_one_source_is_silent() {
        let mut plan = ArchivePlan::new(DuplicatesStrategy::Fail);
        plan.offer(entry("a.txt", b"1", "sqlite")).unwrap();
        assert_eq!(plan.offer(entry("a.txt", b"1", "sqlite")).unwrap(), Offer::Dropped);
        assert!(plan.duplicates().is_empty());
    }
}
