//! POM reader
//!
//! Deserializes the parts of a Maven `pom.xml` that affect runtime
//! resolution with `quick-xml`'s serde support. Everything else (build
//! plugins, profiles, reporting) is ignored.

use std::collections::BTreeMap;
use std::path::Path;

use serde::Deserialize;

use crate::domain::entities::{ParentRef, PomDependency, RawPom};
use crate::domain::policies::ExclusionRule;
use crate::error::{PackError, PackResult};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ProjectXml {
    group_id: Option<String>,
    artifact_id: Option<String>,
    version: Option<String>,
    packaging: Option<String>,
    parent: Option<ParentXml>,
    #[serde(default)]
    properties: BTreeMap<String, String>,
    dependencies: Option<DependenciesXml>,
    dependency_management: Option<DependencyManagementXml>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ParentXml {
    group_id: Option<String>,
    artifact_id: Option<String>,
    version: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct DependenciesXml {
    #[serde(rename = "dependency", default)]
    items: Vec<DependencyXml>,
}

#[derive(Debug, Deserialize)]
struct DependencyManagementXml {
    dependencies: Option<DependenciesXml>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct DependencyXml {
    group_id: Option<String>,
    artifact_id: Option<String>,
    version: Option<String>,
    scope: Option<String>,
    optional: Option<String>,
    classifier: Option<String>,
    #[serde(rename = "type")]
    kind: Option<String>,
    exclusions: Option<ExclusionsXml>,
}

#[derive(Debug, Deserialize)]
struct ExclusionsXml {
    #[serde(rename = "exclusion", default)]
    items: Vec<ExclusionXml>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ExclusionXml {
    group_id: Option<String>,
    artifact_id: Option<String>,
}

/// Read and parse a POM file; `coordinate` is only used in errors
pub fn read_pom(path: &Path, coordinate: &str) -> PackResult<RawPom> {
    let text = std::fs::read_to_string(path)?;
    parse_pom(&text, coordinate)
}

/// Parse POM text
pub fn parse_pom(text: &str, coordinate: &str) -> PackResult<RawPom> {
    let invalid = |message: String| PackError::InvalidPom {
        coordinate: coordinate.to_string(),
        message,
    };

    let project: ProjectXml = quick_xml::de::from_str(text).map_err(|e| invalid(e.to_string()))?;

    let artifact = clean(project.artifact_id).ok_or_else(|| invalid("missing <artifactId>".into()))?;

    let parent = match project.parent {
        Some(parent) => Some(ParentRef {
            group: clean(parent.group_id).ok_or_else(|| invalid("parent without <groupId>".into()))?,
            artifact: clean(parent.artifact_id)
                .ok_or_else(|| invalid("parent without <artifactId>".into()))?,
            version: clean(parent.version).ok_or_else(|| invalid("parent without <version>".into()))?,
        }),
        None => None,
    };

    let dependencies = convert_all(project.dependencies, coordinate)?;
    let managed = convert_all(
        project.dependency_management.and_then(|m| m.dependencies),
        coordinate,
    )?;

    Ok(RawPom {
        group: clean(project.group_id),
        artifact,
        version: clean(project.version),
        packaging: clean(project.packaging),
        parent,
        properties: project
            .properties
            .into_iter()
            .map(|(k, v)| (k, v.trim().to_string()))
            .collect(),
        dependencies,
        managed,
    })
}

fn convert_all(deps: Option<DependenciesXml>, coordinate: &str) -> PackResult<Vec<PomDependency>> {
    deps.unwrap_or_default()
        .items
        .into_iter()
        .map(|dep| convert(dep, coordinate))
        .collect()
}

fn convert(dep: DependencyXml, coordinate: &str) -> PackResult<PomDependency> {
    let (Some(group), Some(artifact)) = (clean(dep.group_id), clean(dep.artifact_id)) else {
        return Err(PackError::InvalidPom {
            coordinate: coordinate.to_string(),
            message: "dependency without <groupId> or <artifactId>".to_string(),
        });
    };

    let exclusions = dep
        .exclusions
        .map(|e| e.items)
        .unwrap_or_default()
        .into_iter()
        .filter_map(|e| {
            let group = clean(e.group_id)?;
            let module = clean(e.artifact_id);
            Some(ExclusionRule::new(group, module.as_deref()))
        })
        .collect();

    Ok(PomDependency {
        group,
        artifact,
        version: clean(dep.version),
        scope: clean(dep.scope),
        optional: clean(dep.optional).is_some_and(|v| v.eq_ignore_ascii_case("true")),
        classifier: clean(dep.classifier),
        kind: clean(dep.kind),
        exclusions,
    })
}

fn clean(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
