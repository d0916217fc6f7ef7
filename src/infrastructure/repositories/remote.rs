//! HTTP Maven repository
//!
//! Blocking `reqwest` client. Downloads land in the shared [`ArtifactCache`]
//! and later runs are served from there. A 404 means "not here"; any other
//! non-success status or transport failure is fatal and never retried.

use std::path::PathBuf;
use std::time::Duration;

use reqwest::blocking::Client;
use reqwest::StatusCode;

use crate::domain::ports::ArtifactRepository;
use crate::domain::value_objects::Coordinate;
use crate::error::{PackError, PackResult};
use crate::infrastructure::fs::ArtifactCache;

/// Maven Central base URL
pub const MAVEN_CENTRAL_URL: &str = "https://repo.maven.apache.org/maven2";

const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

pub struct HttpMavenRepository {
    name: String,
    base_url: String,
    cache: ArtifactCache,
    offline: bool,
    client: Option<Client>,
}

impl HttpMavenRepository {
    /// Create a repository; no client is built in offline mode
    pub fn new(
        name: impl Into<String>,
        base_url: impl Into<String>,
        cache: ArtifactCache,
        offline: bool,
    ) -> PackResult<Self> {
        let name = name.into();
        let base_url = base_url.into().trim_end_matches('/').to_string();
        let client = if offline {
            None
        } else {
            let client = Client::builder()
                .timeout(REQUEST_TIMEOUT)
                .user_agent(concat!("plugpack/", env!("CARGO_PKG_VERSION")))
                .build()
                .map_err(|e| PackError::Repository {
                    repository: name.clone(),
                    url: base_url.clone(),
                    message: e.to_string(),
                })?;
            Some(client)
        };
        Ok(Self {
            name,
            base_url,
            cache,
            offline,
            client,
        })
    }

    pub fn url_for(&self, coordinate: &Coordinate) -> String {
        format!("{}/{}", self.base_url, coordinate.repository_path())
    }

    fn download(&self, client: &Client, coordinate: &Coordinate) -> PackResult<Option<Vec<u8>>> {
        let url = self.url_for(coordinate);
        let transport = |message: String| PackError::Repository {
            repository: self.name.clone(),
            url: url.clone(),
            message,
        };

        tracing::debug!(repository = %self.name, %url, "GET");
        let response = client.get(&url).send().map_err(|e| transport(e.to_string()))?;
        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !status.is_success() {
            return Err(transport(format!("HTTP {}", status)));
        }
        let bytes = response.bytes().map_err(|e| transport(e.to_string()))?;
        Ok(Some(bytes.to_vec()))
    }
}

impl ArtifactRepository for HttpMavenRepository {
    fn name(&self) -> &str {
        &self.name
    }

    fn location(&self) -> String {
        self.base_url.clone()
    }

    fn fetch(&self, coordinate: &Coordinate) -> PackResult<Option<PathBuf>> {
        if let Some(cached) = self.cache.lookup(&self.name, coordinate) {
            tracing::trace!(repository = %self.name, %coordinate, "cache hit");
            return Ok(Some(cached));
        }
        let Some(client) = self.client.as_ref().filter(|_| !self.offline) else {
            tracing::debug!(repository = %self.name, %coordinate, "offline, not in cache");
            return Ok(None);
        };
        match self.download(client, coordinate)? {
            Some(bytes) => Ok(Some(self.cache.store(&self.name, coordinate, &bytes)?)),
            None => Ok(None),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn url_follows_maven_layout() {
        let dir = tempdir().unwrap();
        let repo = HttpMavenRepository::new(
            "central",
            "https://repo.maven.apache.org/maven2/",
            ArtifactCache::new(dir.path()),
            true,
        )
        .unwrap();
        let coord: Coordinate = "com.mysql:mysql-connector-j:9.3.0".parse().unwrap();
        assert_eq!(
            repo.url_for(&coord),
            "https://repo.maven.apache.org/maven2/com/mysql/mysql-connector-j/9.3.0/mysql-connector-j-9.3.0.jar"
        );
    }

    #[test]
    fn offline_serves_cache_only() {
        let dir = tempdir().unwrap();
        let cache = ArtifactCache::new(dir.path());
        let coord: Coordinate = "org.xerial:sqlite-jdbc:3.49.1.0".parse().unwrap();
        let repo = HttpMavenRepository::new("central", MAVEN_CENTRAL_URL, cache.clone(), true).unwrap();

        assert_eq!(repo.fetch(&coord).unwrap(), None);

        let stored = cache.store("central", &coord, b"jar").unwrap();
        assert_eq!(repo.fetch(&coord).unwrap(), Some(stored));
    }
}
