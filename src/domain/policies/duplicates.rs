//! Duplicate Entry Policy
//!
//! Decides what happens when two input layers place a file at the same
//! archive path.

use serde::{Deserialize, Serialize};

/// Strategy for same-path entries coming from different sources
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum DuplicatesStrategy {
    /// Later-declared source replaces the earlier copy (default)
    #[default]
    LastWins,
    /// The first copy is kept, later copies are dropped
    FirstWins,
    /// Any duplicate path aborts the build
    Fail,
}

/// Outcome of applying the strategy to one duplicate
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DuplicateDecision {
    Replace,
    Keep,
    Reject,
}

impl DuplicatesStrategy {
    pub const VALUES: &'static [&'static str] = &["last-wins", "first-wins", "fail"];

    pub fn decide(self) -> DuplicateDecision {
        match self {
            DuplicatesStrategy::LastWins => DuplicateDecision::Replace,
            DuplicatesStrategy::FirstWins => DuplicateDecision::Keep,
            DuplicatesStrategy::Fail => DuplicateDecision::Reject,
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "last-wins" | "last" | "include" => Some(DuplicatesStrategy::LastWins),
            "first-wins" | "first" | "exclude" => Some(DuplicatesStrategy::FirstWins),
            "fail" => Some(DuplicatesStrategy::Fail),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            DuplicatesStrategy::LastWins => "last-wins",
            DuplicatesStrategy::FirstWins => "first-wins",
            DuplicatesStrategy::Fail => "fail",
        }
    }
}
