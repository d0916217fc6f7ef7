//! Dependency Resolution
//!
//! Turns the embed list into an ordered list of artifacts on disk:
//! 1. Build the module graph from POMs (parents, properties, management)
//! 2. Apply the version-conflict policy, re-resolving under `newest`
//! 3. Remove globally excluded modules and what only they pulled in
//! 4. Fetch the remaining artifacts
//!
//! Globally excluded modules are placed in the graph but never expanded, so
//! neither their POM nor their jar is ever downloaded.

use std::collections::{HashMap, HashSet, VecDeque};
use std::path::Path;
use std::sync::Arc;

use crate::domain::entities::{
    DependencyGraph, EffectivePom, EmbeddedDependency, Insertion, RawPom, ResolvedArtifact,
};
use crate::domain::policies::{ConflictPolicy, ExclusionRule, ExclusionSet};
use crate::domain::ports::{BuildEvent, BuildEventSink, NoopEventSink};
use crate::domain::value_objects::{Coordinate, ModuleId, Version};
use crate::error::{PackError, PackResult};
use crate::infrastructure::pom::read_pom;
use crate::infrastructure::repositories::RepositoryChain;

/// Resolution settings taken from `[resolve]` and `[[exclude]]`
#[derive(Debug, Clone)]
pub struct ResolveOptions {
    pub transitive: bool,
    pub conflict: ConflictPolicy,
    pub exclusions: ExclusionSet,
}

impl Default for ResolveOptions {
    fn default() -> Self {
        Self {
            transitive: true,
            conflict: ConflictPolicy::default(),
            exclusions: ExclusionSet::default(),
        }
    }
}

/// Filtered graph plus the removed modules
#[derive(Debug, Clone)]
pub struct ResolvedGraph {
    pub graph: DependencyGraph,
    pub excluded: Vec<ModuleId>,
}

/// Everything the assembler needs from resolution
#[derive(Debug, Clone)]
pub struct Resolution {
    pub graph: DependencyGraph,
    pub excluded: Vec<ModuleId>,
    /// Layering order: declared entries first, then transitive modules breadth-first
    pub artifacts: Vec<ResolvedArtifact>,
}

/// Outcome of one graph construction pass
enum Pass {
    Complete(DependencyGraph),
    /// `newest` picked a higher version; start over with it forced
    Restart { module: ModuleId, version: String },
}

struct Pending {
    coordinate: Coordinate,
    parent: Option<ModuleId>,
    path_exclusions: Vec<ExclusionRule>,
}

pub struct Resolver<'a> {
    repositories: &'a RepositoryChain,
    options: ResolveOptions,
    events: Arc<dyn BuildEventSink>,
    poms: HashMap<String, EffectivePom>,
}

impl<'a> Resolver<'a> {
    pub fn new(repositories: &'a RepositoryChain, options: ResolveOptions) -> Self {
        Self {
            repositories,
            options,
            events: Arc::new(NoopEventSink),
            poms: HashMap::new(),
        }
    }

    pub fn with_events(mut self, events: Arc<dyn BuildEventSink>) -> Self {
        self.events = events;
        self
    }

    /// Resolve the embed list and locate every artifact
    pub fn resolve(
        &mut self,
        declared: &[EmbeddedDependency],
        project_root: &Path,
    ) -> PackResult<Resolution> {
        let roots: Vec<Coordinate> = declared
            .iter()
            .filter_map(|d| match d {
                EmbeddedDependency::Module(coord) => Some(coord.clone()),
                EmbeddedDependency::Local(_) => None,
            })
            .collect();

        let ResolvedGraph { graph, excluded } = self.resolve_graph(&roots)?;
        let artifacts = self.fetch_artifacts(&graph, declared, project_root)?;

        Ok(Resolution {
            graph,
            excluded,
            artifacts,
        })
    }

    /// Build and filter the module graph without downloading artifacts
    pub fn resolve_graph(&mut self, roots: &[Coordinate]) -> PackResult<ResolvedGraph> {
        let mut forced: HashMap<ModuleId, String> = HashMap::new();
        let mut graph = loop {
            match self.build_pass(roots, &forced)? {
                Pass::Complete(graph) => break graph,
                Pass::Restart { module, version } => {
                    tracing::debug!(%module, %version, "conflict resolved to newest, re-resolving");
                    forced.insert(module, version);
                }
            }
        };

        let exclusions = self.options.exclusions.clone();
        let excluded = graph.retain(|id| !exclusions.is_excluded(id));
        for id in &excluded {
            tracing::debug!(module = %id, "excluded from graph");
        }

        self.events.on_event(BuildEvent::Resolved {
            modules: graph.len(),
            excluded: excluded.len(),
        });
        Ok(ResolvedGraph { graph, excluded })
    }

    fn build_pass(
        &mut self,
        roots: &[Coordinate],
        forced: &HashMap<ModuleId, String>,
    ) -> PackResult<Pass> {
        let mut graph = DependencyGraph::new();
        let mut queue: VecDeque<Pending> = roots
            .iter()
            .map(|coordinate| Pending {
                coordinate: coordinate.clone(),
                parent: None,
                path_exclusions: Vec::new(),
            })
            .collect();

        while let Some(pending) = queue.pop_front() {
            let coordinate = match forced.get(pending.coordinate.module()) {
                Some(version) => Coordinate::new(pending.coordinate.module().clone(), version.clone())
                    .with_classifier(pending.coordinate.classifier().map(str::to_string))
                    .with_extension(pending.coordinate.extension()),
                None => pending.coordinate,
            };
            if Version::is_range(coordinate.version()) {
                return Err(PackError::UnsupportedVersion {
                    module: coordinate.module().to_string(),
                    version: coordinate.version().to_string(),
                });
            }

            let module = coordinate.module().clone();
            let globally_excluded = self.options.exclusions.is_excluded(&module);
            let requester = pending
                .parent
                .as_ref()
                .and_then(|p| graph.get(p))
                .map(|n| n.coordinate().to_string())
                .unwrap_or_else(|| crate::domain::entities::ROOT_REQUESTER.to_string());

            match graph.insert(coordinate.clone(), pending.parent.as_ref()) {
                Insertion::Existing => {}
                Insertion::Conflict { .. } if globally_excluded => {}
                Insertion::Conflict {
                    existing,
                    requested_by,
                } => match self.options.conflict.select(existing.version(), coordinate.version()) {
                    None => {
                        return Err(PackError::VersionConflict {
                            module: module.to_string(),
                            first: existing.version().to_string(),
                            first_by: requested_by,
                            second: coordinate.version().to_string(),
                            second_by: requester,
                        });
                    }
                    Some(selected) if selected != existing.version() => {
                        return Ok(Pass::Restart {
                            module,
                            version: selected.to_string(),
                        });
                    }
                    Some(_) => {}
                },
                Insertion::New => {
                    if globally_excluded || !self.options.transitive {
                        continue;
                    }
                    for child in self.children(&coordinate, &pending.path_exclusions)? {
                        queue.push_back(Pending {
                            coordinate: child.0,
                            parent: Some(module.clone()),
                            path_exclusions: child.1,
                        });
                    }
                }
            }
        }

        Ok(Pass::Complete(graph))
    }

    /// Runtime dependencies declared by `coordinate`'s POM
    fn children(
        &mut self,
        coordinate: &Coordinate,
        inherited: &[ExclusionRule],
    ) -> PackResult<Vec<(Coordinate, Vec<ExclusionRule>)>> {
        let pom = self.effective_pom(&coordinate.pom())?;
        let path_exclusions = ExclusionSet::new(inherited.to_vec());
        let mut children = Vec::new();

        for dep in pom.dependencies() {
            if !dep.is_runtime() || dep.optional {
                tracing::trace!(dependency = %dep.module(), scope = dep.scope(), optional = dep.optional, "skipped");
                continue;
            }
            if path_exclusions.is_excluded(&dep.module()) {
                tracing::trace!(dependency = %dep.module(), parent = %coordinate, "excluded by POM");
                continue;
            }
            if !matches!(dep.kind(), "jar" | "bundle") {
                continue;
            }
            let Some(version) = dep.version.clone() else {
                return Err(PackError::InvalidPom {
                    coordinate: coordinate.to_string(),
                    message: format!("no version for dependency {}", dep.module()),
                });
            };

            let child = Coordinate::checked(
                dep.module(),
                version,
                dep.classifier.clone(),
                Coordinate::DEFAULT_EXTENSION,
            )
            .map_err(|reason| PackError::InvalidPom {
                coordinate: coordinate.to_string(),
                message: format!("dependency {}: {}", dep.module(), reason),
            })?;
            let mut exclusions = inherited.to_vec();
            exclusions.extend(dep.exclusions.iter().cloned());
            children.push((child, exclusions));
        }
        Ok(children)
    }

    /// POM with parents merged and BOM imports applied, cached per coordinate
    fn effective_pom(&mut self, pom_coordinate: &Coordinate) -> PackResult<EffectivePom> {
        let mut importing = HashSet::new();
        self.effective_pom_guarded(pom_coordinate, &mut importing)
    }

    fn effective_pom_guarded(
        &mut self,
        pom_coordinate: &Coordinate,
        importing: &mut HashSet<String>,
    ) -> PackResult<EffectivePom> {
        let key = pom_coordinate.to_string();
        if let Some(pom) = self.poms.get(&key) {
            return Ok(pom.clone());
        }
        importing.insert(key.clone());

        let mut chain: Vec<RawPom> = Vec::new();
        let mut seen: HashSet<String> = HashSet::new();
        let mut current = pom_coordinate.clone();
        loop {
            if !seen.insert(current.to_string()) {
                return Err(PackError::CyclicParent {
                    coordinate: current.to_string(),
                });
            }
            let raw = self.raw_pom(&current)?;
            let parent = raw.parent.as_ref().map(|p| p.coordinate());
            chain.push(raw);
            match parent {
                Some(parent) => {
                    check_reference(&current, "parent", &parent)?;
                    current = parent;
                }
                None => break,
            }
        }

        let mut pom = EffectivePom::from_chain(&chain);
        for import in pom.imports().to_vec() {
            if importing.contains(&import.to_string()) {
                continue;
            }
            check_reference(pom_coordinate, "imported BOM", &import)?;
            let bom = self.effective_pom_guarded(&import, importing)?;
            pom.apply_import(bom.managed());
        }

        self.poms.insert(key, pom.clone());
        Ok(pom)
    }

    /// A missing POM is tolerated: the module is treated as having no dependencies
    fn raw_pom(&self, pom_coordinate: &Coordinate) -> PackResult<RawPom> {
        self.events.on_event(BuildEvent::Fetching {
            artifact: pom_coordinate.to_string(),
        });
        match self.repositories.fetch(pom_coordinate) {
            Ok(path) => read_pom(&path, &pom_coordinate.to_string()),
            Err(PackError::ArtifactNotFound { .. }) => {
                tracing::warn!(pom = %pom_coordinate, "no POM found, assuming no dependencies");
                Ok(RawPom {
                    group: Some(pom_coordinate.module().group().to_string()),
                    artifact: pom_coordinate.module().artifact().to_string(),
                    version: Some(pom_coordinate.version().to_string()),
                    ..Default::default()
                })
            }
            Err(err) => Err(err),
        }
    }

    fn fetch_artifacts(
        &self,
        graph: &DependencyGraph,
        declared: &[EmbeddedDependency],
        project_root: &Path,
    ) -> PackResult<Vec<ResolvedArtifact>> {
        let mut artifacts = Vec::new();
        let mut fetched: HashSet<Coordinate> = HashSet::new();

        // Declared entries first, at their declared position
        for dependency in declared {
            match dependency {
                EmbeddedDependency::Local(path) => {
                    artifacts.push(locate_local(path, project_root)?);
                }
                EmbeddedDependency::Module(coord) => {
                    // Excluded modules have no node; `newest` may have moved the version
                    let file = graph.get(coord.module()).and_then(|node| {
                        node.files().find(|f| {
                            f.classifier() == coord.classifier() && f.extension() == coord.extension()
                        })
                    });
                    if let Some(file) = file {
                        if fetched.insert(file.clone()) {
                            artifacts.push(self.fetch_module(file)?);
                        }
                    }
                }
            }
        }

        for id in graph.breadth_first() {
            let Some(node) = graph.get(&id) else {
                continue;
            };
            for file in node.files() {
                if fetched.insert(file.clone()) {
                    artifacts.push(self.fetch_module(file)?);
                }
            }
        }
        Ok(artifacts)
    }

    fn fetch_module(&self, coordinate: &Coordinate) -> PackResult<ResolvedArtifact> {
        self.events.on_event(BuildEvent::Fetching {
            artifact: coordinate.to_string(),
        });
        let path = self.repositories.fetch(coordinate)?;
        Ok(ResolvedArtifact::from_module(coordinate.clone(), path))
    }
}

/// POM references (parents, BOM imports) must stay inside the repository layout
fn check_reference(from: &Coordinate, what: &str, target: &Coordinate) -> PackResult<()> {
    target.validate().map_err(|reason| PackError::InvalidPom {
        coordinate: from.to_string(),
        message: format!("{} {}: {}", what, target, reason),
    })
}

/// Local embed entry, resolved against the project root
pub fn locate_local(declared: &Path, project_root: &Path) -> PackResult<ResolvedArtifact> {
    let location = if declared.is_absolute() {
        declared.to_path_buf()
    } else {
        project_root.join(declared)
    };
    if !location.exists() {
        return Err(PackError::MissingLocalDependency {
            path: declared.to_path_buf(),
        });
    }
    Ok(ResolvedArtifact::from_local(declared, location))
}
