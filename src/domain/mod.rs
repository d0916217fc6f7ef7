//! Domain Layer
//!
//! Pure packaging logic without I/O dependencies.
//!
//! ## Structure
//!
//! - `entities/` - Artifacts, POMs, the dependency graph, the archive plan
//! - `value_objects/` - Coordinates, versions, entry paths, hashes, filters
//! - `policies/` - Duplicate, conflict and exclusion rules
//! - `ports/` - Interface definitions for infrastructure

pub mod entities;
pub mod policies;
pub mod ports;
pub mod value_objects;
