//! POM entities
//!
//! `RawPom` is a project descriptor exactly as published. `EffectivePom` is
//! what resolution works with: parent chain merged, `${...}` properties
//! interpolated and managed versions applied. Building it is pure; fetching
//! parents and imported BOMs is the resolver's job.

use std::collections::BTreeMap;

use crate::domain::policies::ExclusionRule;
use crate::domain::value_objects::{Coordinate, ModuleId};

/// Nested `${...}` references are expanded at most this many times
const MAX_INTERPOLATION_DEPTH: usize = 10;

/// A `<dependency>` element
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PomDependency {
    pub group: String,
    pub artifact: String,
    pub version: Option<String>,
    pub scope: Option<String>,
    pub optional: bool,
    pub classifier: Option<String>,
    pub kind: Option<String>,
    pub exclusions: Vec<ExclusionRule>,
}

impl PomDependency {
    pub fn module(&self) -> ModuleId {
        ModuleId::new(self.group.clone(), self.artifact.clone())
    }

    /// `<type>`, defaulting to `jar`
    pub fn kind(&self) -> &str {
        self.kind.as_deref().unwrap_or("jar")
    }

    /// `<scope>`, defaulting to `compile`
    pub fn scope(&self) -> &str {
        self.scope.as_deref().unwrap_or("compile")
    }

    /// Scopes that end up on the runtime classpath
    pub fn is_runtime(&self) -> bool {
        matches!(self.scope(), "compile" | "runtime")
    }

    fn key(&self) -> (String, String, Option<String>, String) {
        (
            self.group.clone(),
            self.artifact.clone(),
            self.classifier.clone(),
            self.kind().to_string(),
        )
    }

    fn interpolate(&self, props: &BTreeMap<String, String>) -> Self {
        Self {
            group: interpolate(&self.group, props),
            artifact: interpolate(&self.artifact, props),
            version: self.version.as_deref().map(|v| interpolate(v, props)),
            scope: self.scope.as_deref().map(|v| interpolate(v, props)),
            optional: self.optional,
            classifier: self.classifier.as_deref().map(|v| interpolate(v, props)),
            kind: self.kind.as_deref().map(|v| interpolate(v, props)),
            exclusions: self
                .exclusions
                .iter()
                .map(|e| ExclusionRule {
                    group: interpolate(&e.group, props),
                    module: e.module.as_deref().map(|m| interpolate(m, props)),
                })
                .collect(),
        }
    }
}

/// `<parent>` reference
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParentRef {
    pub group: String,
    pub artifact: String,
    pub version: String,
}

impl ParentRef {
    pub fn coordinate(&self) -> Coordinate {
        Coordinate::new(ModuleId::new(self.group.clone(), self.artifact.clone()), self.version.clone())
            .with_extension("pom")
    }
}

/// A POM as parsed, nothing inherited or interpolated yet
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RawPom {
    pub group: Option<String>,
    pub artifact: String,
    pub version: Option<String>,
    pub packaging: Option<String>,
    pub parent: Option<ParentRef>,
    pub properties: BTreeMap<String, String>,
    pub dependencies: Vec<PomDependency>,
    pub managed: Vec<PomDependency>,
}

/// A POM with its parent chain applied
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EffectivePom {
    pub group: String,
    pub artifact: String,
    pub version: String,
    pub packaging: String,
    dependencies: Vec<PomDependency>,
    managed: Vec<PomDependency>,
    imports: Vec<Coordinate>,
}

impl EffectivePom {
    /// Merge a parent chain, nearest first: `chain[0]` is the project itself
    pub fn from_chain(chain: &[RawPom]) -> Self {
        let own = &chain[0];

        let group = own
            .group
            .clone()
            .or_else(|| own.parent.as_ref().map(|p| p.group.clone()))
            .unwrap_or_default();
        let version = own
            .version
            .clone()
            .or_else(|| own.parent.as_ref().map(|p| p.version.clone()))
            .unwrap_or_default();

        // Ancestors first so nearer declarations override
        let mut props = BTreeMap::new();
        for pom in chain.iter().rev() {
            props.extend(pom.properties.clone());
        }
        props.insert("project.groupId".to_string(), group.clone());
        props.insert("project.artifactId".to_string(), own.artifact.clone());
        props.insert("project.version".to_string(), version.clone());
        props.insert("pom.groupId".to_string(), group.clone());
        props.insert("pom.version".to_string(), version.clone());
        if let Some(parent) = &own.parent {
            props.insert("project.parent.groupId".to_string(), parent.group.clone());
            props.insert("project.parent.version".to_string(), parent.version.clone());
        }

        let mut dependencies: Vec<PomDependency> = Vec::new();
        let mut managed_all: Vec<PomDependency> = Vec::new();
        for pom in chain.iter().rev() {
            merge_by_key(&mut dependencies, &pom.dependencies);
            merge_by_key(&mut managed_all, &pom.managed);
        }

        let dependencies = dependencies.iter().map(|d| d.interpolate(&props)).collect();
        let mut managed = Vec::new();
        let mut imports = Vec::new();
        for entry in managed_all.iter().map(|d| d.interpolate(&props)) {
            if entry.scope() == "import" && entry.kind() == "pom" {
                if let Some(version) = entry.version.clone() {
                    imports.push(
                        Coordinate::new(entry.module(), version).with_extension("pom"),
                    );
                }
            } else {
                managed.push(entry);
            }
        }

        Self {
            group,
            artifact: own.artifact.clone(),
            packaging: own
                .packaging
                .as_deref()
                .map(|p| interpolate(p, &props))
                .unwrap_or_else(|| "jar".to_string()),
            version,
            dependencies,
            managed,
            imports,
        }
    }

    /// BOMs referenced with `<scope>import</scope>`
    pub fn imports(&self) -> &[Coordinate] {
        &self.imports
    }

    pub fn managed(&self) -> &[PomDependency] {
        &self.managed
    }

    /// Add entries from an imported BOM; own entries take precedence
    pub fn apply_import(&mut self, bom_managed: &[PomDependency]) {
        for entry in bom_managed {
            if !self.managed.iter().any(|m| m.key() == entry.key()) {
                self.managed.push(entry.clone());
            }
        }
    }

    /// Declared dependencies with version, scope and exclusions filled from management
    pub fn dependencies(&self) -> Vec<PomDependency> {
        self.dependencies
            .iter()
            .map(|dep| {
                let mut dep = dep.clone();
                if let Some(managed) = self.managed.iter().find(|m| m.key() == dep.key()) {
                    if dep.version.is_none() {
                        dep.version = managed.version.clone();
                    }
                    if dep.scope.is_none() {
                        dep.scope = managed.scope.clone();
                    }
                    if dep.exclusions.is_empty() {
                        dep.exclusions = managed.exclusions.clone();
                    }
                }
                dep
            })
            .collect()
    }
}

fn merge_by_key(target: &mut Vec<PomDependency>, overrides: &[PomDependency]) {
    for dep in overrides {
        match target.iter_mut().find(|d| d.key() == dep.key()) {
            Some(existing) => *existing = dep.clone(),
            None => target.push(dep.clone()),
        }
    }
}

/// Expand `${name}` references; unknown names are left untouched
pub fn interpolate(input: &str, props: &BTreeMap<String, String>) -> String {
    let mut current = input.to_string();
    for _ in 0..MAX_INTERPOLATION_DEPTH {
        if !current.contains("${") {
            break;
        }
        let mut out = String::with_capacity(current.len());
        let mut rest = current.as_str();
        let mut changed = false;
        while let Some(start) = rest.find("${") {
            out.push_str(&rest[..start]);
            let after = &rest[start + 2..];
            match after.find('}') {
                Some(end) => {
                    let name = &after[..end];
                    match props.get(name) {
                        Some(value) => {
                            out.push_str(value);
                            changed = true;
                        }
                        None => {
                            out.push_str("${");
                            out.push_str(name);
                            out.push('}');
                        }
                    }
                    rest = &after[end + 1..];
                }
                None => {
                    out.push_str(&rest[start..]);
                    rest = "";
                }
            }
        }
        out.push_str(rest);
        current = out;
        if !changed {
            break;
        }
    }
    current
}
