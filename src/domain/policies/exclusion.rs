//! Global Module Exclusion
//!
//! A rule set applied uniformly to the whole dependency graph after it is
//! built, regardless of which declaration pulled the module in.

use serde::{Deserialize, Serialize};

use crate::domain::value_objects::ModuleId;

/// `group` alone excludes the whole group; with `module` only that artifact
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExclusionRule {
    pub group: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub module: Option<String>,
}

impl ExclusionRule {
    pub fn new(group: impl Into<String>, module: Option<&str>) -> Self {
        Self {
            group: group.into(),
            module: module.map(str::to_string),
        }
    }

    pub fn matches(&self, id: &ModuleId) -> bool {
        let group_matches = self.group == "*" || self.group == id.group();
        let module_matches = match self.module.as_deref() {
            None | Some("*") => true,
            Some(module) => module == id.artifact(),
        };
        group_matches && module_matches
    }
}

/// Predicate over module ids built from a list of rules
#[derive(Debug, Clone, Default)]
pub struct ExclusionSet {
    rules: Vec<ExclusionRule>,
}

impl ExclusionSet {
    pub fn new(rules: Vec<ExclusionRule>) -> Self {
        Self { rules }
    }

    pub fn is_excluded(&self, id: &ModuleId) -> bool {
        self.rules.iter().any(|rule| rule.matches(id))
    }

    /// Copy extended with per-dependency POM exclusions
    pub fn extended(&self, extra: &[ExclusionRule]) -> Self {
        let mut rules = self.rules.clone();
        rules.extend(extra.iter().cloned());
        Self { rules }
    }

    pub fn rules(&self) -> &[ExclusionRule] {
        &self.rules
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn module_rule_matches_exact_artifact() {
        let rule = ExclusionRule::new("com.hypixel.hytale", Some("Server"));
        assert!(rule.matches(&ModuleId::new("com.hypixel.hytale", "Server")));
        assert!(!rule.matches(&ModuleId::new("com.hypixel.hytale", "Common")));
        assert!(!rule.matches(&ModuleId::new("org.xerial", "Server")));
    }

    #[test]
    fn group_rule_matches_whole_group() {
        let rule = ExclusionRule::new("org.slf4j", None);
        assert!(rule.matches(&ModuleId::new("org.slf4j", "slf4j-api")));
    }

    #[test]
    fn wildcards_match_anything() {
        let rule = ExclusionRule::new("*", Some("*"));
        assert!(rule.matches(&ModuleId::new("a", "b")));
    }

    #[test]
    fn extended_keeps_global_rules() {
        let set = ExclusionSet::new(vec![ExclusionRule::new("a", None)]);
        let extended = set.extended(&[ExclusionRule::new("b", Some("c"))]);
        assert!(extended.is_excluded(&ModuleId::new("a", "x")));
        assert!(extended.is_excluded(&ModuleId::new("b", "c")));
        assert!(!set.is_excluded(&ModuleId::new("b", "c")));
    }
}
