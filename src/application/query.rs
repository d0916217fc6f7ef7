//! Read-only queries behind `resolve`, `classpath` and `inspect`

use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::application::resolve::{locate_local, ResolveOptions, ResolvedGraph, Resolver};
use crate::config::Config;
use crate::domain::entities::EmbeddedDependency;
use crate::domain::value_objects::{Coordinate, EntryFilter};
use crate::error::PackResult;
use crate::infrastructure::archive::JarReader;
use crate::infrastructure::repositories::RepositoryChain;

/// Filtered dependency graph, ready for display
#[derive(Debug, Clone, Serialize)]
pub struct DependencyReport {
    /// Gradle-style rendering of the graph
    pub tree: String,
    /// Modules in layering order
    pub modules: Vec<String>,
    pub excluded: Vec<String>,
    /// Local (path) embed entries, which have no graph node
    pub local: Vec<PathBuf>,
}

/// One archive member as shown by `inspect`
#[derive(Debug, Clone, Serialize)]
pub struct ListedEntry {
    pub name: String,
    pub directory: bool,
    pub size: u64,
    pub compressed_size: u64,
    pub hash: Option<String>,
    /// Matches a signature pattern (would be stripped from a dependency)
    pub signature: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct ArchiveListing {
    pub archive: PathBuf,
    pub entries: Vec<ListedEntry>,
    pub total_size: u64,
}

impl ArchiveListing {
    pub fn signature_count(&self) -> usize {
        self.entries.iter().filter(|e| e.signature).count()
    }
}

pub struct QueryUseCase<'a> {
    project_root: &'a Path,
    config: &'a Config,
}

impl<'a> QueryUseCase<'a> {
    pub fn new(project_root: &'a Path, config: &'a Config) -> Self {
        Self {
            project_root,
            config,
        }
    }

    /// Resolve the embed list without downloading any jar
    pub fn dependency_tree(&self) -> PackResult<DependencyReport> {
        let declared = self.config.embedded_dependencies()?;
        let mut roots: Vec<Coordinate> = Vec::new();
        let mut local = Vec::new();
        for dependency in declared {
            match dependency {
                EmbeddedDependency::Module(coord) => roots.push(coord),
                EmbeddedDependency::Local(path) => local.push(path),
            }
        }

        let chain = RepositoryChain::from_config(self.config, self.project_root)?;
        let ResolvedGraph { graph, excluded } =
            Resolver::new(&chain, self.resolve_options()).resolve_graph(&roots)?;

        Ok(DependencyReport {
            tree: graph.render_tree(),
            modules: graph.artifacts().iter().map(|c| c.to_string()).collect(),
            excluded: excluded.iter().map(|m| m.to_string()).collect(),
            local,
        })
    }

    /// Host jar first, then (optionally) every embedded artifact in layering order
    pub fn classpath(&self, embedded: bool) -> PackResult<Vec<PathBuf>> {
        let required = self.config.required_artifact(self.project_root);
        let mut entries = vec![required.ensure_present()?.to_path_buf()];
        if !embedded {
            return Ok(entries);
        }

        let declared = self.config.embedded_dependencies()?;
        for dependency in &declared {
            if let EmbeddedDependency::Local(path) = dependency {
                locate_local(path, self.project_root)?;
            }
        }
        let chain = RepositoryChain::from_config(self.config, self.project_root)?;
        let resolution =
            Resolver::new(&chain, self.resolve_options()).resolve(&declared, self.project_root)?;
        entries.extend(
            resolution
                .artifacts
                .iter()
                .map(|a| a.location().to_path_buf()),
        );
        Ok(entries)
    }

    fn resolve_options(&self) -> ResolveOptions {
        ResolveOptions {
            transitive: self.config.resolve.transitive,
            conflict: self.config.resolve.conflict,
            exclusions: self.config.exclusions(),
        }
    }
}

/// List every member of an archive in stored order
pub fn inspect_archive(path: &Path) -> PackResult<ArchiveListing> {
    let signatures = EntryFilter::signatures();
    let mut reader = JarReader::open(path)?;
    let entries: Vec<ListedEntry> = reader
        .members()?
        .into_iter()
        .map(|member| ListedEntry {
            signature: member
                .path
                .as_ref()
                .is_some_and(|p| signatures.is_excluded(p)),
            hash: member.hash.map(|h| h.to_string()),
            name: member.name,
            directory: member.is_dir,
            size: member.size,
            compressed_size: member.compressed_size,
        })
        .collect();
    let total_size = entries.iter().map(|e| e.size).sum();
    Ok(ArchiveListing {
        archive: path.to_path_buf(),
        entries,
        total_size,
    })
}
