//! Check Use Case
//!
//! Validates configuration and the host jar without touching the network.
//! Every check runs even after a failure so users see all problems at once.

use std::path::Path;

use serde::Serialize;

use crate::application::resolve::locate_local;
use crate::config::{Config, ConfigWarning};
use crate::domain::entities::EmbeddedDependency;
use crate::error::{ErrorCategory, PackError};
use crate::infrastructure::repositories::RepositoryChain;

/// Status of a check
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CheckStatus {
    Pass,
    Warning,
    Error,
}

/// Result of a single check
#[derive(Debug, Clone, Serialize)]
pub struct CheckItem {
    pub name: String,
    pub status: CheckStatus,
    pub message: String,
    #[serde(skip)]
    pub category: Option<ErrorCategory>,
}

impl CheckItem {
    fn pass(name: &str, message: impl Into<String>) -> Self {
        Self {
            name: name.to_string(),
            status: CheckStatus::Pass,
            message: message.into(),
            category: None,
        }
    }

    fn warning(name: &str, message: impl Into<String>) -> Self {
        Self {
            name: name.to_string(),
            status: CheckStatus::Warning,
            message: message.into(),
            category: None,
        }
    }

    fn error(name: &str, err: &PackError) -> Self {
        Self {
            name: name.to_string(),
            status: CheckStatus::Error,
            message: err.to_string(),
            category: Some(err.category()),
        }
    }
}

/// Result of the check operation
#[derive(Debug, Clone, Default, Serialize)]
pub struct CheckResult {
    pub items: Vec<CheckItem>,
    pub passed: usize,
    pub warnings: usize,
    pub errors: usize,
}

impl CheckResult {
    fn push(&mut self, item: CheckItem) {
        match item.status {
            CheckStatus::Pass => self.passed += 1,
            CheckStatus::Warning => self.warnings += 1,
            CheckStatus::Error => self.errors += 1,
        }
        self.items.push(item);
    }

    /// No errors (warnings allowed)
    pub fn is_success(&self) -> bool {
        self.errors == 0
    }

    /// Category of the first failing check, for the exit code
    pub fn first_error_category(&self) -> Option<ErrorCategory> {
        self.items.iter().find_map(|item| item.category)
    }
}

pub struct CheckUseCase {
    config: Config,
    warnings: Vec<ConfigWarning>,
}

impl CheckUseCase {
    pub fn new(config: Config, warnings: Vec<ConfigWarning>) -> Self {
        Self { config, warnings }
    }

    pub fn execute(&self, project_root: &Path) -> CheckResult {
        let mut result = CheckResult::default();
        let config = &self.config;

        if self.warnings.is_empty() {
            result.push(CheckItem::pass("config", "no unknown keys"));
        } else {
            for warning in &self.warnings {
                result.push(CheckItem::warning("config", warning.to_string()));
            }
        }

        let required = config.required_artifact(project_root);
        match required.ensure_present() {
            Ok(path) => result.push(CheckItem::pass(
                "host-jar",
                format!("{} at {}", required.label(), path.display()),
            )),
            Err(err) => result.push(CheckItem::error("host-jar", &err)),
        }

        match config.embedded_dependencies() {
            Ok(embedded) => {
                result.push(CheckItem::pass(
                    "embed",
                    format!("{} embedded dependencies declared", embedded.len()),
                ));
                for dependency in &embedded {
                    if let EmbeddedDependency::Local(path) = dependency {
                        match locate_local(path, project_root) {
                            Ok(found) => result.push(CheckItem::pass(
                                "local-dependency",
                                found.location().display().to_string(),
                            )),
                            Err(err) => result.push(CheckItem::error("local-dependency", &err)),
                        }
                    }
                }
            }
            Err(err) => result.push(CheckItem::error("embed", &err)),
        }

        match config.entry_filter() {
            Ok(filter) => result.push(CheckItem::pass(
                "entry-filter",
                format!("{} exclude patterns", filter.patterns().len()),
            )),
            Err(err) => result.push(CheckItem::error("entry-filter", &err)),
        }

        match RepositoryChain::from_config(config, project_root) {
            Ok(chain) if chain.is_empty() => result.push(CheckItem::warning(
                "repositories",
                "no repositories enabled; only local embeds can be resolved",
            )),
            Ok(chain) => result.push(CheckItem::pass("repositories", chain.names().join(", "))),
            Err(err) => result.push(CheckItem::error("repositories", &err)),
        }

        let assets = project_root.join(&config.package.assets);
        if assets.is_dir() {
            result.push(CheckItem::pass("assets", assets.display().to_string()));
        } else {
            result.push(CheckItem::warning(
                "assets",
                format!("{} does not exist; no assets will be packaged", assets.display()),
            ));
        }

        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::path::PathBuf;
    use tempfile::tempdir;

    fn offline_config() -> Config {
        let mut config = Config::default();
        config.resolve.offline = true;
        config.resolve.maven_local = false;
        config
    }

    #[test]
    fn missing_host_jar_is_a_configuration_error() {
        let root = tempdir().unwrap();
        let result = CheckUseCase::new(offline_config(), Vec::new()).execute(root.path());

        assert!(!result.is_success());
        let item = result.items.iter().find(|i| i.name == "host-jar").unwrap();
        assert_eq!(item.status, CheckStatus::Error);
        assert!(item.message.contains("Missing Hytale server jar"));
        assert_eq!(result.first_error_category(), Some(ErrorCategory::Configuration));
    }

    #[test]
    fn complete_project_passes() {
        let root = tempdir().unwrap();
        fs::create_dir_all(root.path().join("HystaleJar")).unwrap();
        fs::write(root.path().join("HystaleJar/HytaleServer.jar"), "jar").unwrap();
        fs::create_dir_all(root.path().join("assets")).unwrap();

        let result = CheckUseCase::new(offline_config(), Vec::new()).execute(root.path());
        assert!(result.is_success(), "{:?}", result.items);
        assert_eq!(result.warnings, 0);
    }

    #[test]
    fn unknown_keys_are_warnings() {
        let root = tempdir().unwrap();
        let warning = ConfigWarning {
            key: "duplicats".to_string(),
            file: PathBuf::from("plugpack.toml"),
            line: Some(3),
            suggestion: Some("duplicates".to_string()),
        };
        let result = CheckUseCase::new(offline_config(), vec![warning]).execute(root.path());
        let item = result.items.iter().find(|i| i.name == "config").unwrap();
        assert_eq!(item.status, CheckStatus::Warning);
        assert!(item.message.contains("did you mean 'duplicates'"));
    }
}
