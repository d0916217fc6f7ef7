//! Version Conflict Policy
//!
//! Decides what happens when two paths through the dependency graph ask
//! for different versions of the same module.

use serde::{Deserialize, Serialize};

use crate::domain::value_objects::Version;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ConflictPolicy {
    /// Abort resolution and report both requesters (default)
    #[default]
    Fail,
    /// Select the highest requested version
    Newest,
}

impl ConflictPolicy {
    pub const VALUES: &'static [&'static str] = &["fail", "newest"];

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "fail" | "strict" => Some(ConflictPolicy::Fail),
            "newest" | "latest" | "highest" => Some(ConflictPolicy::Newest),
            _ => None,
        }
    }

    /// Version to keep, or `None` when the conflict must be reported
    pub fn select<'a>(self, current: &'a str, requested: &'a str) -> Option<&'a str> {
        if current == requested {
            return Some(current);
        }
        match self {
            ConflictPolicy::Fail => None,
            ConflictPolicy::Newest => {
                if Version::parse(requested) > Version::parse(current) {
                    Some(requested)
                } else {
                    Some(current)
                }
            }
        }
    }
}
