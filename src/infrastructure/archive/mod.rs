//! Zip containers
//!
//! `reader` lists and extracts dependency jars; `writer` produces the
//! deterministic output archive from an `ArchivePlan`.

mod reader;
mod writer;

pub use reader::{JarReader, MemberInfo};
pub use writer::{entry_timestamp, entry_timestamp_from, write_archive, WriteOptions, WrittenArchive};
