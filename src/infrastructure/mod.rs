//! Infrastructure Layer
//!
//! Concrete implementations of domain ports.
//! This layer handles all I/O operations.
//!
//! ## Structure
//!
//! - `fs/` - atomic writes, directory walks, download cache, home resolution
//! - `repositories/` - Maven repositories (local directory, HTTP) and their chain
//! - `archive/` - zip reader and deterministic writer
//! - `pom` - POM deserialization

pub mod archive;
pub mod fs;
pub mod pom;
pub mod repositories;

pub use archive::{write_archive, JarReader, WriteOptions};
pub use fs::{atomic_write, walk_files, ArtifactCache};
pub use repositories::{HttpMavenRepository, LocalMavenRepository, RepositoryChain};
