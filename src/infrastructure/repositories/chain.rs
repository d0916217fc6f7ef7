//! Ordered repository chain
//!
//! Project repositories first, then Maven local, then Maven Central. The
//! first repository that has a file wins. A miss falls through to the next
//! one; an error stops the chain.

use std::path::{Path, PathBuf};

use crate::config::{Config, RepositoryConfig};
use crate::domain::ports::ArtifactRepository;
use crate::domain::value_objects::Coordinate;
use crate::error::{PackError, PackResult};
use crate::infrastructure::fs::{default_cache_dir, expand_home, maven_local_dir, ArtifactCache};

use super::local::LocalMavenRepository;
use super::remote::{HttpMavenRepository, MAVEN_CENTRAL_URL};

#[derive(Default)]
pub struct RepositoryChain {
    repositories: Vec<Box<dyn ArtifactRepository>>,
}

impl RepositoryChain {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, repository: impl ArtifactRepository + 'static) {
        self.repositories.push(Box::new(repository));
    }

    /// Build the chain described by `[resolve]` and `[[repositories]]`
    pub fn from_config(config: &Config, project_root: &Path) -> PackResult<Self> {
        let cache = ArtifactCache::new(cache_root(config));
        let offline = config.resolve.offline;
        let mut chain = Self::new();

        for repo in &config.repositories {
            chain.push_configured(repo, project_root, &cache, offline)?;
        }
        if config.resolve.maven_local {
            if let Some(m2) = maven_local_dir() {
                chain.push(LocalMavenRepository::new("maven-local", m2));
            }
        }
        if config.resolve.maven_central {
            chain.push(HttpMavenRepository::new("central", MAVEN_CENTRAL_URL, cache, offline)?);
        }

        tracing::debug!(
            repositories = %chain.names().join(", "),
            offline,
            "repository chain"
        );
        Ok(chain)
    }

    fn push_configured(
        &mut self,
        repo: &RepositoryConfig,
        project_root: &Path,
        cache: &ArtifactCache,
        offline: bool,
    ) -> PackResult<()> {
        let invalid = |message: &str| PackError::InvalidConfig {
            file: PathBuf::from(crate::config::CONFIG_FILE_NAME),
            message: format!("repository '{}': {}", repo.name, message),
        };

        match (&repo.url, &repo.path) {
            (Some(_), Some(_)) => Err(invalid("set either url or path, not both")),
            (None, None) => Err(invalid("missing url or path")),
            (None, Some(path)) => {
                self.push(LocalMavenRepository::new(&repo.name, resolve_dir(path, project_root)));
                Ok(())
            }
            (Some(url), None) => {
                if let Some(dir) = url.strip_prefix("file://") {
                    self.push(LocalMavenRepository::new(&repo.name, PathBuf::from(dir)));
                } else if url.starts_with("http://") || url.starts_with("https://") {
                    self.push(HttpMavenRepository::new(&repo.name, url, cache.clone(), offline)?);
                } else {
                    return Err(invalid("url must start with http://, https:// or file://"));
                }
                Ok(())
            }
        }
    }

    pub fn names(&self) -> Vec<&str> {
        self.repositories.iter().map(|r| r.name()).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.repositories.is_empty()
    }

    /// Locate `coordinate` in the first repository that has it
    pub fn fetch(&self, coordinate: &Coordinate) -> PackResult<PathBuf> {
        coordinate
            .validate()
            .map_err(|reason| PackError::InvalidCoordinate {
                input: coordinate.to_string(),
                reason: reason.to_string(),
            })?;
        for repository in &self.repositories {
            if let Some(path) = repository.fetch(coordinate)? {
                tracing::debug!(%coordinate, repository = repository.name(), "resolved");
                return Ok(path);
            }
        }
        Err(PackError::ArtifactNotFound {
            artifact: coordinate.to_string(),
            searched: self.searched(),
        })
    }

    fn searched(&self) -> String {
        if self.repositories.is_empty() {
            return "no repositories configured".to_string();
        }
        self.repositories
            .iter()
            .map(|r| format!("{} ({})", r.name(), r.location()))
            .collect::<Vec<_>>()
            .join(", ")
    }
}

fn cache_root(config: &Config) -> PathBuf {
    config
        .resolve
        .cache_dir
        .as_deref()
        .map(expand_home)
        .or_else(default_cache_dir)
        .unwrap_or_else(|| std::env::temp_dir().join("plugpack-cache"))
}

fn resolve_dir(path: &Path, project_root: &Path) -> PathBuf {
    let expanded = expand_home(path);
    if expanded.is_absolute() {
        expanded
    } else {
        project_root.join(expanded)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    fn publish(root: &Path, coord: &Coordinate, content: &str) -> PathBuf {
        let file = root.join(coord.repository_path());
        fs::create_dir_all(file.parent().unwrap()).unwrap();
        fs::write(&file, content).unwrap();
        file
    }

    #[test]
    fn first_repository_holding_the_file_wins() {
        let first = tempdir().unwrap();
        let second = tempdir().unwrap();
        let coord: Coordinate = "org.slf4j:slf4j-api:1.7.36".parse().unwrap();
        publish(second.path(), &coord, "second");
        let winner = publish(first.path(), &coord, "first");

        let mut chain = RepositoryChain::new();
        chain.push(LocalMavenRepository::new("first", first.path()));
        chain.push(LocalMavenRepository::new("second", second.path()));

        assert_eq!(chain.fetch(&coord).unwrap(), winner);
    }

    #[test]
    fn missing_artifact_lists_searched_repositories() {
        let dir = tempdir().unwrap();
        let mut chain = RepositoryChain::new();
        chain.push(LocalMavenRepository::new("hytale", dir.path()));
        let coord: Coordinate = "com.example:absent:1.0".parse().unwrap();

        let err = chain.fetch(&coord).unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("com.example:absent:1.0"), "{}", msg);
        assert!(msg.contains("hytale"), "{}", msg);
    }

    #[test]
    fn from_config_orders_project_repositories_first() {
        let root = tempdir().unwrap();
        let mut config = Config::default();
        config.resolve.maven_local = false;
        config.resolve.offline = true;
        config.resolve.cache_dir = Some(root.path().join("cache"));
        config.repositories = vec![
            RepositoryConfig {
                name: "libs".to_string(),
                url: None,
                path: Some(PathBuf::from("repo")),
            },
            RepositoryConfig {
                name: "mirror".to_string(),
                url: Some(format!("file://{}", root.path().join("mirror").display())),
                path: None,
            },
        ];

        let chain = RepositoryChain::from_config(&config, root.path()).unwrap();
        assert_eq!(chain.names(), vec!["libs", "mirror", "central"]);
    }

    #[test]
    fn repository_needs_exactly_one_location() {
        let root = tempdir().unwrap();
        let mut config = Config::default();
        config.repositories = vec![RepositoryConfig {
            name: "broken".to_string(),
            url: None,
            path: None,
        }];
        let err = RepositoryChain::from_config(&config, root.path()).err().unwrap();
        assert!(err.to_string().contains("broken"));
    }
}
