//! Application Layer
//!
//! Use cases that orchestrate the business flow.
//! This layer:
//! - Depends on Domain layer (entities, policies, ports)
//! - Does NOT contain business rules (those are in Domain)
//! - Coordinates between Infrastructure and Domain
//!
//! ## Use Cases
//!
//! - `PackageAssembler` - validate, resolve, plan and write the archive
//! - `Resolver` - dependency graph construction and artifact download
//! - `CheckUseCase` - configuration and host jar validation, offline
//! - `QueryUseCase` - dependency tree and classpath, plus archive listing
//! - `WatchUseCase` - rebuild on changes

pub mod build;
pub mod check;
pub mod query;
pub mod resolve;
pub mod watch;

pub use build::{BuildOptions, BuildReport, DuplicateSummary, PackageAssembler, ValidatedInputs};
pub use check::{CheckItem, CheckResult, CheckStatus, CheckUseCase};
pub use query::{inspect_archive, ArchiveListing, DependencyReport, ListedEntry, QueryUseCase};
pub use resolve::{locate_local, Resolution, ResolveOptions, ResolvedGraph, Resolver};
pub use watch::{WatchEvent, WatchOptions, WatchUseCase, WatcherState, DEBOUNCE_MS};
