//! Home and cache directory resolution with test isolation support.
//!
//! `dirs::home_dir()` ignores `HOME` on Windows, so integration tests point
//! `PLUGPACK_TEST_HOME` at a temp dir instead. Every internal path derived
//! from the home directory (Maven local repository, download cache, `~`
//! expansion) goes through [`plugpack_home_dir`].

use std::path::{Path, PathBuf};

/// Environment variable for test isolation of the home directory.
pub const PLUGPACK_TEST_HOME_VAR: &str = "PLUGPACK_TEST_HOME";

/// Home directory for plugpack-internal paths.
pub fn plugpack_home_dir() -> Option<PathBuf> {
    std::env::var(PLUGPACK_TEST_HOME_VAR)
        .ok()
        .map(PathBuf::from)
        .or_else(dirs::home_dir)
}

/// `~/.m2/repository`, the Maven local repository
pub fn maven_local_dir() -> Option<PathBuf> {
    plugpack_home_dir().map(|home| home.join(".m2").join("repository"))
}

/// Default download cache location
///
/// Under test isolation the cache lives inside the fake home so runs never
/// share state with the real user cache.
pub fn default_cache_dir() -> Option<PathBuf> {
    if let Ok(home) = std::env::var(PLUGPACK_TEST_HOME_VAR) {
        return Some(PathBuf::from(home).join(".cache").join("plugpack"));
    }
    dirs::cache_dir()
        .map(|dir| dir.join("plugpack"))
        .or_else(|| plugpack_home_dir().map(|home| home.join(".cache").join("plugpack")))
}

/// Expand a leading `~` to the home directory
pub fn expand_home(path: &Path) -> PathBuf {
    let raw = path.to_string_lossy();
    let Some(home) = plugpack_home_dir() else {
        return path.to_path_buf();
    };
    if raw == "~" {
        home
    } else if let Some(rest) = raw.strip_prefix("~/") {
        home.join(rest)
    } else {
        path.to_path_buf()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn expand_home_leaves_plain_paths_alone() {
        let path = PathBuf::from("/tmp/cache");
        assert_eq!(expand_home(&path), path);
        assert_eq!(expand_home(Path::new("relative/dir")), PathBuf::from("relative/dir"));
    }

    #[test]
    fn expand_home_replaces_tilde() {
        let expanded = expand_home(Path::new("~/.cache/plugpack"));
        assert!(!expanded.to_string_lossy().starts_with('~'));
        assert!(expanded.ends_with(".cache/plugpack"));
    }

    #[test]
    fn maven_local_is_under_home() {
        if let (Some(home), Some(m2)) = (plugpack_home_dir(), maven_local_dir()) {
            assert_eq!(m2, home.join(".m2").join("repository"));
        }
    }
}
