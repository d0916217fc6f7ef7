//! Package Assembler
//!
//! The build pipeline:
//! 1. Validate: host jar present, embed list and patterns parse, local
//!    dependencies exist. Nothing is resolved or written before this passes.
//! 2. Resolve: dependency graph, exclusions, artifact download
//! 3. Plan: manifest, class directories, assets, embedded artifacts
//! 4. Write: deterministic archive, atomically published
//!
//! Each stage is public so commands can stop early (`check`, `resolve`).

use std::path::{Path, PathBuf};
use std::sync::atomic::Ordering;
use std::sync::Arc;

use crate::application::resolve::{locate_local, Resolution, ResolveOptions, Resolver};
use crate::domain::entities::{
    ArchivePlan, ArtifactLayout, EmbeddedDependency, EntrySource, PlannedEntry, ResolvedArtifact,
};
use crate::domain::ports::{BuildEvent, BuildEventSink, NoopEventSink};
use crate::domain::value_objects::{EntryFilter, EntryPath};
use crate::error::{PackError, PackResult};
use crate::infrastructure::archive::{write_archive, JarReader, WriteOptions};
use crate::infrastructure::fs::{hash_file, walk_files};
use crate::infrastructure::repositories::RepositoryChain;

use super::options::BuildOptions;
use super::result::{BuildReport, DuplicateSummary};

/// Generated manifest location; no input layer may replace it
pub const MANIFEST_PATH: &str = "META-INF/MANIFEST.MF";

const MANIFEST_ORIGIN: &str = "plugpack";
const CLASSES_ORIGIN: &str = "classes";
const ASSETS_ORIGIN: &str = "assets";

/// Inputs that passed validation
#[derive(Debug, Clone)]
pub struct ValidatedInputs {
    pub host_jar: PathBuf,
    pub embedded: Vec<EmbeddedDependency>,
    pub entry_filter: EntryFilter,
}

pub struct PackageAssembler {
    options: BuildOptions,
    events: Arc<dyn BuildEventSink>,
}

impl PackageAssembler {
    pub fn new(options: BuildOptions) -> Self {
        Self {
            options,
            events: Arc::new(NoopEventSink),
        }
    }

    pub fn with_events(mut self, events: Arc<dyn BuildEventSink>) -> Self {
        self.events = events;
        self
    }

    pub fn options(&self) -> &BuildOptions {
        &self.options
    }

    /// Validate, resolve, plan and write
    pub fn build(&self) -> PackResult<BuildReport> {
        let inputs = self.validate()?;
        let resolution = self.resolve(&inputs)?;
        let plan = self.plan(&resolution, &inputs.entry_filter)?;

        let config = &self.options.config;
        let output = config.output_path(&self.options.project_root);
        let write_options = WriteOptions::from_env(config.package.compression);
        let written = write_archive(&plan, &output, &write_options, &self.options.cancel)?;

        tracing::info!(
            output = %written.path.display(),
            entries = written.entries,
            bytes = written.bytes,
            "archive written"
        );
        self.events.on_event(BuildEvent::Completed {
            output: written.path.clone(),
            entries: written.entries,
        });

        Ok(BuildReport {
            output: written.path,
            host_jar: inputs.host_jar,
            entries: written.entries,
            bytes: written.bytes,
            artifacts: resolution
                .artifacts
                .iter()
                .map(|a| a.name().to_string())
                .collect(),
            excluded_modules: resolution.excluded.iter().map(|m| m.to_string()).collect(),
            duplicates: plan.duplicates().iter().map(DuplicateSummary::from).collect(),
            conflicts: plan.conflicts().map(DuplicateSummary::from).collect(),
            excluded_entries: plan
                .excluded()
                .iter()
                .map(|e| format!("{} ({})", e.path, e.origin))
                .collect(),
        })
    }

    /// Precondition checks; the host jar is checked before anything else
    pub fn validate(&self) -> PackResult<ValidatedInputs> {
        let config = &self.options.config;
        let root = &self.options.project_root;

        let required = config.required_artifact(root);
        let host_jar = required.ensure_present()?.to_path_buf();
        tracing::debug!(path = %host_jar.display(), "host artifact found");
        self.events.on_event(BuildEvent::HostArtifactFound {
            path: host_jar.clone(),
        });

        let embedded = config.embedded_dependencies()?;
        for dependency in &embedded {
            if let EmbeddedDependency::Local(path) = dependency {
                locate_local(path, root)?;
            }
        }
        let entry_filter = config.entry_filter()?;

        Ok(ValidatedInputs {
            host_jar,
            embedded,
            entry_filter,
        })
    }

    pub fn resolve(&self, inputs: &ValidatedInputs) -> PackResult<Resolution> {
        let config = &self.options.config;
        let chain = RepositoryChain::from_config(config, &self.options.project_root)?;
        let options = ResolveOptions {
            transitive: config.resolve.transitive,
            conflict: config.resolve.conflict,
            exclusions: config.exclusions(),
        };
        Resolver::new(&chain, options)
            .with_events(self.events.clone())
            .resolve(&inputs.embedded, &self.options.project_root)
    }

    /// Lay out every entry; nothing is written yet
    pub fn plan(&self, resolution: &Resolution, filter: &EntryFilter) -> PackResult<ArchivePlan> {
        let config = &self.options.config;
        let root = &self.options.project_root;
        let mut plan = ArchivePlan::new(config.assemble.duplicates);

        plan.reserve(PlannedEntry::generated(
            EntryPath::parse(MANIFEST_PATH)?,
            manifest_bytes(config.package.name.as_deref(), config.package.version.as_deref()),
            MANIFEST_ORIGIN,
        ));

        self.events.on_event(BuildEvent::LayerStarted {
            origin: CLASSES_ORIGIN.to_string(),
        });
        for dir in &config.package.classes {
            self.plan_directory(&mut plan, &resolve_path(dir, root), CLASSES_ORIGIN, None)?;
        }

        self.events.on_event(BuildEvent::LayerStarted {
            origin: ASSETS_ORIGIN.to_string(),
        });
        self.plan_directory(
            &mut plan,
            &resolve_path(&config.package.assets, root),
            ASSETS_ORIGIN,
            None,
        )?;

        for artifact in &resolution.artifacts {
            self.check_cancelled()?;
            self.events.on_event(BuildEvent::LayerStarted {
                origin: artifact.name().to_string(),
            });
            match artifact.layout() {
                ArtifactLayout::Directory => self.plan_directory(
                    &mut plan,
                    artifact.location(),
                    artifact.name(),
                    Some(filter),
                )?,
                ArtifactLayout::Archive => self.plan_archive(&mut plan, artifact, filter)?,
            }
        }

        for conflict in plan.conflicts() {
            tracing::warn!(
                path = %conflict.path,
                kept = %conflict.kept_from,
                dropped = %conflict.dropped_from,
                "conflicting duplicate entry"
            );
            self.events.on_event(BuildEvent::ConflictingDuplicate {
                path: conflict.path.to_string(),
                kept_from: conflict.kept_from.clone(),
                dropped_from: conflict.dropped_from.clone(),
            });
        }
        tracing::debug!(
            entries = plan.len(),
            duplicates = plan.duplicates().len(),
            excluded = plan.excluded().len(),
            "archive planned"
        );
        Ok(plan)
    }

    fn plan_directory(
        &self,
        plan: &mut ArchivePlan,
        dir: &Path,
        origin: &str,
        filter: Option<&EntryFilter>,
    ) -> PackResult<()> {
        if !dir.is_dir() {
            tracing::debug!(dir = %dir.display(), origin, "directory absent, skipped");
            return Ok(());
        }
        for (entry, path) in walk_files(dir)? {
            if filter.is_some_and(|f| f.is_excluded(&entry)) {
                plan.record_excluded(entry, origin);
                continue;
            }
            let hash = hash_file(&path)?;
            let size = std::fs::metadata(&path)?.len();
            plan.offer(PlannedEntry::new(
                entry,
                EntrySource::File(path),
                hash,
                size,
                origin,
            ))?;
        }
        Ok(())
    }

    fn plan_archive(
        &self,
        plan: &mut ArchivePlan,
        artifact: &ResolvedArtifact,
        filter: &EntryFilter,
    ) -> PackResult<()> {
        let mut reader = JarReader::open(artifact.location())?;
        for member in reader.members()? {
            if member.is_dir {
                continue;
            }
            let (Some(path), Some(hash)) = (member.path, member.hash) else {
                tracing::warn!(
                    entry = %member.name,
                    artifact = artifact.name(),
                    "skipping unsafe entry name"
                );
                continue;
            };
            if filter.is_excluded(&path) {
                tracing::trace!(entry = %path, artifact = artifact.name(), "filtered");
                plan.record_excluded(path, artifact.name());
                continue;
            }
            plan.offer(PlannedEntry::new(
                path,
                EntrySource::ArchiveMember {
                    archive: artifact.location().to_path_buf(),
                    index: member.index,
                },
                hash,
                member.size,
                artifact.name(),
            ))?;
        }
        Ok(())
    }

    fn check_cancelled(&self) -> PackResult<()> {
        if self.options.cancel.load(Ordering::SeqCst) {
            Err(PackError::Interrupted)
        } else {
            Ok(())
        }
    }
}

/// Deterministic `META-INF/MANIFEST.MF` content
pub fn manifest_bytes(name: Option<&str>, version: Option<&str>) -> Vec<u8> {
    let mut manifest = String::from("Manifest-Version: 1.0\r\n");
    manifest.push_str(concat!("Created-By: plugpack ", env!("CARGO_PKG_VERSION"), "\r\n"));
    if let Some(name) = name {
        manifest.push_str(&format!("Implementation-Title: {}\r\n", name));
    }
    if let Some(version) = version {
        manifest.push_str(&format!("Implementation-Version: {}\r\n", version));
    }
    manifest.push_str("\r\n");
    manifest.into_bytes()
}

fn resolve_path(path: &Path, root: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        root.join(path)
    }
}
