//! Deterministic archive writer
//!
//! Identical plans produce byte-identical files: entries follow plan order,
//! every entry carries the same timestamp and fixed permissions, and parent
//! directory entries are synthesized right before their first child. The
//! archive is written to a temp file beside the target and renamed into
//! place only after the central directory is complete.

use std::collections::{HashMap, HashSet};
use std::fs::File;
use std::io::{BufReader, Write};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};

use chrono::{Datelike, Timelike};
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, DateTime, ZipWriter};

use crate::config::Compression;
use crate::domain::entities::{ArchivePlan, EntrySource};
use crate::error::{PackError, PackResult};
use crate::infrastructure::fs::AtomicOutput;

use super::reader::JarReader;

const FILE_MODE: u32 = 0o644;
const DIR_MODE: u32 = 0o755;

/// Environment variable fixing the entry timestamp (reproducible builds)
pub const SOURCE_DATE_EPOCH: &str = "SOURCE_DATE_EPOCH";

#[derive(Debug, Clone, Copy)]
pub struct WriteOptions {
    pub compression: Compression,
    pub timestamp: DateTime,
}

impl WriteOptions {
    /// Options with the timestamp taken from the environment
    pub fn from_env(compression: Compression) -> Self {
        Self {
            compression,
            timestamp: entry_timestamp(),
        }
    }

    fn file_options(&self) -> SimpleFileOptions {
        let method = match self.compression {
            Compression::Deflated => CompressionMethod::Deflated,
            Compression::Stored => CompressionMethod::Stored,
        };
        SimpleFileOptions::default()
            .compression_method(method)
            .last_modified_time(self.timestamp)
            .unix_permissions(FILE_MODE)
    }

    fn dir_options(&self) -> SimpleFileOptions {
        SimpleFileOptions::default()
            .compression_method(CompressionMethod::Stored)
            .last_modified_time(self.timestamp)
            .unix_permissions(DIR_MODE)
    }
}

/// Summary of a written archive
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WrittenArchive {
    pub path: PathBuf,
    /// File entries, directories not counted
    pub entries: usize,
    pub directories: usize,
    pub bytes: u64,
}

/// Entry timestamp from `SOURCE_DATE_EPOCH`, else 1980-01-01T00:00:00
pub fn entry_timestamp() -> DateTime {
    entry_timestamp_from(std::env::var(SOURCE_DATE_EPOCH).ok().as_deref())
}

/// Convert an epoch-seconds string into a zip timestamp
///
/// Zip cannot represent instants before 1980 or after 2107; those clamp to
/// the nearest bound. Unparseable values fall back to the default.
pub fn entry_timestamp_from(epoch: Option<&str>) -> DateTime {
    let Some(raw) = epoch.map(str::trim).filter(|s| !s.is_empty()) else {
        return DateTime::default();
    };
    let Ok(secs) = raw.parse::<i64>() else {
        tracing::warn!(value = raw, "ignoring unparseable {}", SOURCE_DATE_EPOCH);
        return DateTime::default();
    };
    let Some(instant) = chrono::DateTime::from_timestamp(secs, 0) else {
        return DateTime::default();
    };
    let naive = instant.naive_utc();
    if naive.year() < 1980 {
        return DateTime::default();
    }
    if naive.year() > 2107 {
        return DateTime::from_date_and_time(2107, 12, 31, 23, 59, 58).unwrap_or_default();
    }
    DateTime::from_date_and_time(
        naive.year() as u16,
        naive.month() as u8,
        naive.day() as u8,
        naive.hour() as u8,
        naive.minute() as u8,
        naive.second() as u8,
    )
    .unwrap_or_default()
}

/// Write every planned entry to `output`
///
/// `cancel` is checked before each entry; when set, the temp file is
/// dropped and [`PackError::Interrupted`] returned, leaving no output.
pub fn write_archive(
    plan: &ArchivePlan,
    output: &Path,
    options: &WriteOptions,
    cancel: &AtomicBool,
) -> PackResult<WrittenArchive> {
    let mut target = AtomicOutput::create(output)?;
    let mut zip = ZipWriter::new(target.file());
    let mut sources: HashMap<PathBuf, JarReader> = HashMap::new();
    let mut written_dirs: HashSet<String> = HashSet::new();
    let file_options = options.file_options();
    let dir_options = options.dir_options();
    let zip_err = |e: zip::result::ZipError| PackError::archive(output, e);

    for entry in plan.entries() {
        if cancel.load(Ordering::SeqCst) {
            tracing::warn!(output = %output.display(), "interrupted, discarding partial archive");
            return Err(PackError::Interrupted);
        }

        for dir in entry.path().parent_dirs() {
            if written_dirs.insert(dir.clone()) {
                zip.add_directory(dir, dir_options).map_err(zip_err)?;
            }
        }

        zip.start_file(entry.path().as_str(), file_options)
            .map_err(zip_err)?;
        match entry.source() {
            EntrySource::Generated(bytes) => zip.write_all(bytes)?,
            EntrySource::File(path) => {
                let mut reader = BufReader::new(File::open(path)?);
                std::io::copy(&mut reader, &mut zip)?;
            }
            EntrySource::ArchiveMember { archive, index } => {
                if !sources.contains_key(archive) {
                    sources.insert(archive.clone(), JarReader::open(archive)?);
                }
                if let Some(reader) = sources.get_mut(archive) {
                    reader.copy_to(*index, &mut zip)?;
                }
            }
        }
        tracing::trace!(entry = %entry.path(), origin = entry.origin(), "written");
    }

    let bytes = zip.finish().map_err(zip_err)?.metadata()?.len();
    let path = target.commit()?;

    Ok(WrittenArchive {
        path,
        entries: plan.len(),
        directories: written_dirs.len(),
        bytes,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::PlannedEntry;
    use crate::domain::policies::DuplicatesStrategy;
    use crate::domain::value_objects::{ContentHash, EntryPath};
    use tempfile::tempdir;

    fn sample_plan(dir: &Path) -> ArchivePlan {
        let asset = dir.join("manifest.json");
        std::fs::write(&asset, "{\"Name\":\"Hyperks\"}").unwrap();

        let mut plan = ArchivePlan::new(DuplicatesStrategy::LastWins);
        plan.reserve(PlannedEntry::generated(
            EntryPath::parse("META-INF/MANIFEST.MF").unwrap(),
            b"Manifest-Version: 1.0\r\n\r\n".to_vec(),
            "plugpack",
        ));
        plan.offer(PlannedEntry::new(
            EntryPath::parse("manifest.json").unwrap(),
            EntrySource::File(asset.clone()),
            ContentHash::from_bytes(b"{\"Name\":\"Hyperks\"}"),
            18,
            "assets",
        ))
        .unwrap();
        plan.offer(PlannedEntry::generated(
            EntryPath::parse("org/sqlite/JDBC.class").unwrap(),
            b"cafebabe".to_vec(),
            "org.xerial:sqlite-jdbc:3.49.1.0",
        ))
        .unwrap();
        plan
    }

    #[test]
    fn writes_entries_with_directories_in_plan_order() {
        let dir = tempdir().unwrap();
        let plan = sample_plan(dir.path());
        let output = dir.path().join("build/libs/plugin.jar");
        let options = WriteOptions {
            compression: Compression::Deflated,
            timestamp: DateTime::default(),
        };

        let written = write_archive(&plan, &output, &options, &AtomicBool::new(false)).unwrap();
        assert_eq!(written.entries, 3);
        assert_eq!(written.directories, 3);

        let mut reader = JarReader::open(&output).unwrap();
        let names: Vec<String> = reader.members().unwrap().into_iter().map(|m| m.name).collect();
        assert_eq!(
            names,
            vec![
                "META-INF/",
                "META-INF/MANIFEST.MF",
                "manifest.json",
                "org/",
                "org/sqlite/",
                "org/sqlite/JDBC.class",
            ]
        );
        assert_eq!(reader.read(5).unwrap(), b"cafebabe");
    }

    #[test]
    fn identical_plans_are_byte_identical() {
        let dir = tempdir().unwrap();
        let plan = sample_plan(dir.path());
        let options = WriteOptions {
            compression: Compression::Deflated,
            timestamp: entry_timestamp_from(Some("1700000000")),
        };
        let first = dir.path().join("a.jar");
        let second = dir.path().join("b.jar");
        write_archive(&plan, &first, &options, &AtomicBool::new(false)).unwrap();
        write_archive(&plan, &second, &options, &AtomicBool::new(false)).unwrap();

        assert_eq!(std::fs::read(first).unwrap(), std::fs::read(second).unwrap());
    }

    #[test]
    fn cancelled_write_leaves_nothing() {
        let dir = tempdir().unwrap();
        let plan = sample_plan(dir.path());
        let output = dir.path().join("out").join("plugin.jar");
        let options = WriteOptions {
            compression: Compression::Stored,
            timestamp: DateTime::default(),
        };

        let err = write_archive(&plan, &output, &options, &AtomicBool::new(true)).unwrap_err();
        assert!(matches!(err, PackError::Interrupted));
        assert!(!output.exists());
        assert_eq!(std::fs::read_dir(dir.path().join("out")).unwrap().count(), 0);
    }

    #[test]
    fn timestamp_from_epoch() {
        assert_eq!(entry_timestamp_from(None), DateTime::default());
        assert_eq!(entry_timestamp_from(Some("garbage")), DateTime::default());
        assert_eq!(entry_timestamp_from(Some("0")), DateTime::default());

        let ts = entry_timestamp_from(Some("1700000000"));
        assert_eq!(ts.year(), 2023);
        assert_eq!(ts.month(), 11);
        assert_eq!(ts.day(), 14);
    }
}
