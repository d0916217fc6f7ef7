//! File System Helpers
//!
//! Atomic writes, directory walks, the download cache and home resolution.

mod cache;
mod home;
mod local;

pub use cache::ArtifactCache;
pub use home::{default_cache_dir, expand_home, maven_local_dir, plugpack_home_dir, PLUGPACK_TEST_HOME_VAR};
pub use local::{atomic_write, hash_file, walk_files, AtomicOutput};
