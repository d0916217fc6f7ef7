//! Domain Value Objects
//!
//! Immutable value types that represent domain concepts.

mod coordinate;
mod entry_filter;
mod entry_path;
mod hash;
mod version;

pub use coordinate::{Coordinate, ModuleId};
pub use entry_filter::{EntryFilter, SIGNATURE_PATTERNS};
pub use entry_path::EntryPath;
pub use hash::ContentHash;
pub use version::Version;
