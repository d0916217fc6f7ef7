//! Domain Policies
//!
//! Rules that govern resolution and assembly.
//! These are pure functions that operate on domain values.

mod conflict;
mod duplicates;
mod exclusion;

pub use conflict::ConflictPolicy;
pub use duplicates::{DuplicateDecision, DuplicatesStrategy};
pub use exclusion::{ExclusionRule, ExclusionSet};
