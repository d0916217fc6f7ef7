//! Local file system helpers
//!
//! Atomic publishing of output files and deterministic directory walks.

use std::fs::File;
use std::io::{BufReader, Write};
use std::path::{Path, PathBuf};

use ignore::WalkBuilder;
use tempfile::NamedTempFile;

use crate::domain::value_objects::{ContentHash, EntryPath};
use crate::error::PackResult;

/// A file being written next to its final location
///
/// Nothing is visible at `target` until [`AtomicOutput::commit`]; dropping
/// the value without committing removes the temporary file.
pub struct AtomicOutput {
    target: PathBuf,
    temp: NamedTempFile,
}

impl AtomicOutput {
    /// Create the parent directory and a temp file inside it
    pub fn create(target: &Path) -> PackResult<Self> {
        let parent = match target.parent() {
            Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
            _ => PathBuf::from("."),
        };
        std::fs::create_dir_all(&parent)?;
        let temp = tempfile::Builder::new()
            .prefix(".plugpack-")
            .suffix(".tmp")
            .tempfile_in(&parent)?;
        Ok(Self {
            target: target.to_path_buf(),
            temp,
        })
    }

    pub fn file(&mut self) -> &mut File {
        self.temp.as_file_mut()
    }

    pub fn target(&self) -> &Path {
        &self.target
    }

    /// Flush to disk and rename over the target
    pub fn commit(self) -> PackResult<PathBuf> {
        self.temp.as_file().sync_all()?;
        self.temp
            .persist(&self.target)
            .map_err(|e| e.error)?;
        Ok(self.target)
    }
}

/// Write content to a file atomically
///
/// Uses tempfile + rename so readers never observe a partial file.
pub fn atomic_write(path: &Path, content: &[u8]) -> PackResult<()> {
    let mut output = AtomicOutput::create(path)?;
    output.file().write_all(content)?;
    output.commit()?;
    Ok(())
}

/// Compute SHA-256 hash of a file
pub fn hash_file(path: &Path) -> PackResult<ContentHash> {
    let mut reader = BufReader::new(File::open(path)?);
    Ok(ContentHash::from_reader(&mut reader)?)
}

/// All regular files under `root` as (entry name, absolute path), sorted
///
/// Hidden files are included and no ignore files are honoured: an asset
/// directory is copied verbatim. A missing root yields nothing.
pub fn walk_files(root: &Path) -> PackResult<Vec<(EntryPath, PathBuf)>> {
    if !root.is_dir() {
        return Ok(Vec::new());
    }

    let mut files = Vec::new();
    let walker = WalkBuilder::new(root)
        .standard_filters(false)
        .follow_links(true)
        .sort_by_file_name(|a, b| a.cmp(b))
        .build();

    for entry in walker {
        let entry = entry.map_err(|e| std::io::Error::other(e.to_string()))?;
        if !entry.file_type().is_some_and(|t| t.is_file()) {
            continue;
        }
        let path = entry.into_path();
        let relative = path
            .strip_prefix(root)
            .map_err(|e| std::io::Error::other(e.to_string()))?;
        files.push((EntryPath::from_relative(relative)?, path));
    }

    files.sort_by(|a, b| a.0.cmp(&b.0));
    Ok(files)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn atomic_write_new_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("out.jar");

        atomic_write(&path, b"PK\x03\x04").unwrap();

        assert_eq!(fs::read(&path).unwrap(), b"PK\x03\x04");
    }

    #[test]
    fn atomic_write_overwrite() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("out.jar");

        fs::write(&path, "old").unwrap();
        atomic_write(&path, b"new").unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), "new");
    }

    #[test]
    fn uncommitted_output_leaves_nothing_behind() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("out.jar");
        {
            let mut output = AtomicOutput::create(&path).unwrap();
            output.file().write_all(b"partial").unwrap();
        }
        assert!(!path.exists());
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[test]
    fn hash_file_matches_content_hash() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("a.txt");
        fs::write(&path, "Content").unwrap();
        assert_eq!(hash_file(&path).unwrap(), ContentHash::from_bytes(b"Content"));
    }

    #[test]
    fn walk_files_is_sorted_and_includes_hidden() {
        let dir = tempdir().unwrap();
        fs::create_dir_all(dir.path().join("Server/Item")).unwrap();
        fs::write(dir.path().join("Server/Item/b.json"), "{}").unwrap();
        fs::write(dir.path().join("Server/Item/a.json"), "{}").unwrap();
        fs::write(dir.path().join(".hidden"), "x").unwrap();
        fs::write(dir.path().join("manifest.json"), "{}").unwrap();

        let names: Vec<String> = walk_files(dir.path())
            .unwrap()
            .into_iter()
            .map(|(entry, _)| entry.to_string())
            .collect();

        assert_eq!(
            names,
            vec![".hidden", "Server/Item/a.json", "Server/Item/b.json", "manifest.json"]
        );
    }

    #[test]
    fn walk_missing_root_is_empty() {
        let dir = tempdir().unwrap();
        assert!(walk_files(&dir.path().join("absent")).unwrap().is_empty());
    }
}
