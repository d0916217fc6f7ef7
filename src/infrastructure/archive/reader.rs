//! Jar (zip) reader

use std::fs::File;
use std::io::{BufReader, Read, Write};
use std::path::{Path, PathBuf};

use zip::ZipArchive;

use crate::domain::value_objects::{ContentHash, EntryPath};
use crate::error::{PackError, PackResult};

/// One member of an opened archive
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemberInfo {
    pub index: usize,
    /// Name exactly as stored
    pub name: String,
    /// Normalized name, `None` when the stored name is unsafe
    pub path: Option<EntryPath>,
    pub is_dir: bool,
    pub size: u64,
    pub compressed_size: u64,
    /// Content hash; directories have none
    pub hash: Option<ContentHash>,
}

pub struct JarReader {
    path: PathBuf,
    archive: ZipArchive<BufReader<File>>,
}

impl JarReader {
    pub fn open(path: &Path) -> PackResult<Self> {
        let file = File::open(path)?;
        let archive =
            ZipArchive::new(BufReader::new(file)).map_err(|e| PackError::archive(path, e))?;
        Ok(Self {
            path: path.to_path_buf(),
            archive,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn len(&self) -> usize {
        self.archive.len()
    }

    pub fn is_empty(&self) -> bool {
        self.archive.is_empty()
    }

    /// Every member in stored order, file contents hashed
    pub fn members(&mut self) -> PackResult<Vec<MemberInfo>> {
        let mut members = Vec::with_capacity(self.archive.len());
        for index in 0..self.archive.len() {
            let mut member = self
                .archive
                .by_index(index)
                .map_err(|e| PackError::archive(&self.path, e))?;
            let name = member.name().to_string();
            let is_dir = member.is_dir();
            let size = member.size();
            let compressed_size = member.compressed_size();
            let hash = if is_dir {
                None
            } else {
                Some(
                    ContentHash::from_reader(&mut member)
                        .map_err(|e| PackError::archive(&self.path, format!("{}: {}", name, e)))?,
                )
            };
            members.push(MemberInfo {
                index,
                path: EntryPath::parse(&name).ok(),
                name,
                is_dir,
                size,
                compressed_size,
                hash,
            });
        }
        Ok(members)
    }

    /// Full content of the member at `index`
    pub fn read(&mut self, index: usize) -> PackResult<Vec<u8>> {
        let mut buf = Vec::new();
        self.copy_to(index, &mut buf)?;
        Ok(buf)
    }

    /// Stream the member at `index` into `out`, returning the byte count
    pub fn copy_to(&mut self, index: usize, out: &mut impl Write) -> PackResult<u64> {
        let mut member = self
            .archive
            .by_index(index)
            .map_err(|e| PackError::archive(&self.path, e))?;
        let mut buf = [0u8; 64 * 1024];
        let mut total = 0u64;
        loop {
            let n = member
                .read(&mut buf)
                .map_err(|e| PackError::archive(&self.path, e))?;
            if n == 0 {
                break;
            }
            out.write_all(&buf[..n])?;
            total += n as u64;
        }
        Ok(total)
    }
}
