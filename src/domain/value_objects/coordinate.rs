//! Maven Coordinate Value Objects
//!
//! `ModuleId` identifies a library independent of its version
//! (`group:artifact`); `Coordinate` pins one published file of it
//! (`group:artifact:version[:classifier][@extension]`).

use std::fmt;
use std::path::{Component, Path, PathBuf};
use std::str::FromStr;

use crate::error::PackError;

/// Library identity without a version
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ModuleId {
    group: String,
    artifact: String,
}

impl ModuleId {
    pub fn new(group: impl Into<String>, artifact: impl Into<String>) -> Self {
        Self {
            group: group.into(),
            artifact: artifact.into(),
        }
    }

    pub fn group(&self) -> &str {
        &self.group
    }

    pub fn artifact(&self) -> &str {
        &self.artifact
    }

    /// Reason this identity cannot be laid out as a repository path, if any
    pub fn validate(&self) -> Result<(), &'static str> {
        if self.group.split('.').any(|part| check_segment(part).is_err()) {
            return Err("group must be dot-separated names without path separators");
        }
        check_segment(&self.artifact)
    }
}

/// One path component of the Maven layout: non-empty, not `.`/`..`, no separators
fn check_segment(segment: &str) -> Result<(), &'static str> {
    if segment.trim().is_empty() {
        return Err("empty segment");
    }
    if segment == "." || segment == ".." {
        return Err("segments must not be '.' or '..'");
    }
    if segment
        .chars()
        .any(|c| matches!(c, '/' | '\\' | ':') || c.is_control())
    {
        return Err("segments must not contain '/', '\\' or ':'");
    }
    Ok(())
}

impl fmt::Display for ModuleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.group, self.artifact)
    }
}

/// A fully pinned artifact reference
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Coordinate {
    module: ModuleId,
    version: String,
    classifier: Option<String>,
    extension: String,
}

impl Coordinate {
    /// Default packaging of embedded libraries
    pub const DEFAULT_EXTENSION: &'static str = "jar";

    pub fn new(module: ModuleId, version: impl Into<String>) -> Self {
        Self {
            module,
            version: version.into(),
            classifier: None,
            extension: Self::DEFAULT_EXTENSION.to_string(),
        }
    }

    /// Build a coordinate, rejecting segments that would escape a repository root
    pub fn checked(
        module: ModuleId,
        version: impl Into<String>,
        classifier: Option<String>,
        extension: &str,
    ) -> Result<Self, &'static str> {
        let coordinate = Self::new(module, version)
            .with_classifier(classifier)
            .with_extension(extension);
        coordinate.validate()?;
        Ok(coordinate)
    }

    /// Reason this coordinate cannot be laid out as a repository path, if any
    pub fn validate(&self) -> Result<(), &'static str> {
        self.module.validate()?;
        check_segment(&self.version)?;
        if let Some(classifier) = &self.classifier {
            check_segment(classifier)?;
        }
        check_segment(&self.extension)
    }

    pub fn with_classifier(mut self, classifier: Option<String>) -> Self {
        self.classifier = classifier.filter(|c| !c.is_empty());
        self
    }

    pub fn with_extension(mut self, extension: impl Into<String>) -> Self {
        self.extension = extension.into();
        self
    }

    pub fn module(&self) -> &ModuleId {
        &self.module
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    pub fn classifier(&self) -> Option<&str> {
        self.classifier.as_deref()
    }

    pub fn extension(&self) -> &str {
        &self.extension
    }

    /// Same module and version, describing the POM instead of the artifact
    pub fn pom(&self) -> Self {
        Self::new(self.module.clone(), self.version.clone()).with_extension("pom")
    }

    /// Path of this file inside a Maven-layout repository
    ///
    /// `org.xerial:sqlite-jdbc:3.49.1.0` becomes
    /// `org/xerial/sqlite-jdbc/3.49.1.0/sqlite-jdbc-3.49.1.0.jar`.
    pub fn repository_path(&self) -> String {
        let artifact = self.module.artifact();
        let file = match &self.classifier {
            Some(classifier) => format!(
                "{}-{}-{}.{}",
                artifact, self.version, classifier, self.extension
            ),
            None => format!("{}-{}.{}", artifact, self.version, self.extension),
        };
        format!(
            "{}/{}/{}/{}",
            self.module.group().replace('.', "/"),
            artifact,
            self.version,
            file
        )
    }

    /// [`Self::repository_path`] joined onto `root`, refusing anything that would leave it
    pub fn path_under(&self, root: &Path) -> Result<PathBuf, PackError> {
        let invalid = |reason: &str| PackError::InvalidCoordinate {
            input: self.to_string(),
            reason: reason.to_string(),
        };
        self.validate().map_err(invalid)?;
        let relative = PathBuf::from(self.repository_path());
        if !relative
            .components()
            .all(|c| matches!(c, Component::Normal(_)))
        {
            return Err(invalid("repository path leaves its root"));
        }
        Ok(root.join(relative))
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.module, self.version)?;
        if let Some(classifier) = &self.classifier {
            write!(f, ":{}", classifier)?;
        }
        if self.extension != Self::DEFAULT_EXTENSION {
            write!(f, "@{}", self.extension)?;
        }
        Ok(())
    }
}

impl FromStr for Coordinate {
    type Err = PackError;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        let invalid = |reason: &str| PackError::InvalidCoordinate {
            input: input.to_string(),
            reason: reason.to_string(),
        };

        let trimmed = input.trim();
        let (notation, extension) = match trimmed.split_once('@') {
            Some((notation, ext)) if !ext.is_empty() => (notation, ext),
            Some(_) => return Err(invalid("empty extension after '@'")),
            None => (trimmed, Coordinate::DEFAULT_EXTENSION),
        };

        let parts: Vec<&str> = notation.split(':').collect();
        if parts.iter().any(|p| p.trim().is_empty()) {
            return Err(invalid("empty segment"));
        }

        let (group, artifact, version, classifier) = match parts.as_slice() {
            [g, a, v] => (*g, *a, *v, None),
            [g, a, v, c] => (*g, *a, *v, Some(c.to_string())),
            _ => return Err(invalid("expected group:artifact:version[:classifier]")),
        };

        Coordinate::checked(ModuleId::new(group, artifact), version, classifier, extension)
            .map_err(invalid)
    }
}
