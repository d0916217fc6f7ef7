//! Domain Entities
//!
//! - `RequiredArtifact` / `EmbeddedDependency` / `ResolvedArtifact` - inputs
//! - `RawPom` / `EffectivePom` - project descriptors
//! - `DependencyGraph` - resolved module graph
//! - `ArchivePlan` - entries of the output archive

mod archive_plan;
mod artifact;
mod dependency_graph;
mod pom;

pub use archive_plan::{
    ArchivePlan, DuplicateRecord, EntrySource, ExcludedEntry, Offer, PlannedEntry,
};
pub use artifact::{ArtifactLayout, EmbeddedDependency, RequiredArtifact, ResolvedArtifact};
pub use dependency_graph::{DependencyGraph, GraphNode, Insertion, ROOT_REQUESTER};
pub use pom::{interpolate, EffectivePom, ParentRef, PomDependency, RawPom};
