//! Configuration type definitions

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::domain::entities::{EmbeddedDependency, RequiredArtifact};
use crate::domain::policies::{ConflictPolicy, DuplicatesStrategy, ExclusionRule, ExclusionSet};
use crate::domain::value_objects::{Coordinate, EntryFilter, SIGNATURE_PATTERNS};
use crate::error::PackResult;

use super::loader::{self, ConfigWarning};

/// Project config file name, looked up in the project root
pub const CONFIG_FILE_NAME: &str = "plugpack.toml";

/// Where the host jar is expected unless overridden
pub const DEFAULT_HOST_JAR: &str = "HystaleJar/HytaleServer.jar";

/// Human label of the host jar used in messages
pub const DEFAULT_HOST_LABEL: &str = "Hytale server jar";

/// Package (output) configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PackageConfig {
    /// Archive base name; defaults to the project directory name
    #[serde(default)]
    pub name: Option<String>,

    /// Appended to the archive name when set
    #[serde(default)]
    pub version: Option<String>,

    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,

    /// Compiled plugin code and resources, copied first
    #[serde(default = "default_classes")]
    pub classes: Vec<PathBuf>,

    #[serde(default = "default_assets")]
    pub assets: PathBuf,

    #[serde(default)]
    pub compression: Compression,
}

impl Default for PackageConfig {
    fn default() -> Self {
        Self {
            name: None,
            version: None,
            output_dir: default_output_dir(),
            classes: default_classes(),
            assets: default_assets(),
            compression: Compression::default(),
        }
    }
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("build/libs")
}

fn default_classes() -> Vec<PathBuf> {
    vec![
        PathBuf::from("build/classes/java/main"),
        PathBuf::from("build/resources/main"),
    ]
}

fn default_assets() -> PathBuf {
    PathBuf::from("assets")
}

/// Zip compression for written entries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Compression {
    #[default]
    Deflated,
    Stored,
}

/// Host (required, compile-only) artifact configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HostConfig {
    #[serde(default = "default_host_jar")]
    pub jar: PathBuf,

    #[serde(default = "default_host_label")]
    pub label: String,
}

impl Default for HostConfig {
    fn default() -> Self {
        Self {
            jar: default_host_jar(),
            label: default_host_label(),
        }
    }
}

fn default_host_jar() -> PathBuf {
    PathBuf::from(DEFAULT_HOST_JAR)
}

fn default_host_label() -> String {
    DEFAULT_HOST_LABEL.to_string()
}

/// Dependency resolution configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResolveConfig {
    #[serde(default = "default_true")]
    pub maven_local: bool,

    #[serde(default = "default_true")]
    pub maven_central: bool,

    #[serde(default = "default_true")]
    pub transitive: bool,

    #[serde(default)]
    pub conflict: ConflictPolicy,

    #[serde(default)]
    pub offline: bool,

    /// Download cache; defaults to the platform cache directory
    #[serde(default)]
    pub cache_dir: Option<PathBuf>,

    /// Keep the host server modules out of the graph, on top of `[[exclude]]`
    #[serde(default = "default_true")]
    pub exclude_host_modules: bool,
}

impl Default for ResolveConfig {
    fn default() -> Self {
        Self {
            maven_local: true,
            maven_central: true,
            transitive: true,
            conflict: ConflictPolicy::default(),
            offline: false,
            cache_dir: None,
            exclude_host_modules: true,
        }
    }
}

fn default_true() -> bool {
    true
}

/// Extra repository, either remote (`url`) or a Maven-layout directory (`path`)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepositoryConfig {
    pub name: String,

    #[serde(default)]
    pub url: Option<String>,

    #[serde(default)]
    pub path: Option<PathBuf>,
}

/// One element of `embed`
///
/// Supports both string coordinates and tables:
///   embed = ["org.xerial:sqlite-jdbc:3.49.1.0", { path = "libs/extra" }]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum EmbedSpec {
    Module(String),
    Local { path: PathBuf },
}

fn default_embed() -> Vec<EmbedSpec> {
    vec![
        EmbedSpec::Module("org.xerial:sqlite-jdbc:3.49.1.0".to_string()),
        EmbedSpec::Module("com.mysql:mysql-connector-j:9.3.0".to_string()),
    ]
}

/// Modules the host server already provides at runtime
pub fn host_exclusions() -> Vec<ExclusionRule> {
    vec![ExclusionRule::new("com.hypixel.hytale", Some("Server"))]
}

/// Archive assembly configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssembleConfig {
    #[serde(default)]
    pub duplicates: DuplicatesStrategy,

    /// Patterns removed from embedded dependency content
    #[serde(default = "default_entry_excludes")]
    pub exclude: Vec<String>,
}

impl Default for AssembleConfig {
    fn default() -> Self {
        Self {
            duplicates: DuplicatesStrategy::default(),
            exclude: default_entry_excludes(),
        }
    }
}

fn default_entry_excludes() -> Vec<String> {
    SIGNATURE_PATTERNS.iter().map(|p| p.to_string()).collect()
}

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_embed")]
    pub embed: Vec<EmbedSpec>,

    /// Added to the host exclusions, never replacing them
    #[serde(default)]
    pub exclude: Vec<ExclusionRule>,

    #[serde(default)]
    pub repositories: Vec<RepositoryConfig>,

    #[serde(default)]
    pub package: PackageConfig,

    #[serde(default)]
    pub host: HostConfig,

    #[serde(default)]
    pub resolve: ResolveConfig,

    #[serde(default)]
    pub assemble: AssembleConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            embed: default_embed(),
            exclude: Vec::new(),
            repositories: Vec::new(),
            package: PackageConfig::default(),
            host: HostConfig::default(),
            resolve: ResolveConfig::default(),
            assemble: AssembleConfig::default(),
        }
    }
}

/// Per-invocation overrides from command-line flags
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    pub host_jar: Option<PathBuf>,
    pub offline: bool,
    pub duplicates: Option<DuplicatesStrategy>,
    pub output_dir: Option<PathBuf>,
}

impl Config {
    /// Load configuration from a TOML file
    pub fn load(path: &Path) -> PackResult<Self> {
        let (config, _warnings) = loader::load_with_warnings(path)?;
        Ok(config)
    }

    /// Load configuration and collect non-fatal warnings (e.g. unknown keys).
    pub fn load_with_warnings(path: &Path) -> PackResult<(Self, Vec<ConfigWarning>)> {
        loader::load_with_warnings(path)
    }

    /// Project config if present, defaults otherwise, then env overrides
    pub fn load_for_project(project_root: &Path) -> PackResult<(Self, Vec<ConfigWarning>)> {
        loader::load_for_project(project_root)
    }

    /// Apply environment variable overrides (PLUGPACK_* prefix)
    pub fn with_env_overrides(self) -> Self {
        loader::with_env_overrides(self)
    }

    /// Apply command-line flags, the highest-priority layer
    pub fn with_cli_overrides(mut self, overrides: &CliOverrides) -> Self {
        if let Some(jar) = &overrides.host_jar {
            self.host.jar = jar.clone();
        }
        if overrides.offline {
            self.resolve.offline = true;
        }
        if let Some(strategy) = overrides.duplicates {
            self.assemble.duplicates = strategy;
        }
        if let Some(dir) = &overrides.output_dir {
            self.package.output_dir = dir.clone();
        }
        self
    }

    pub fn required_artifact(&self, project_root: &Path) -> RequiredArtifact {
        RequiredArtifact::new(self.host.label.clone(), self.host.jar.clone(), project_root)
    }

    /// Parsed embed list, declaration order preserved
    pub fn embedded_dependencies(&self) -> PackResult<Vec<EmbeddedDependency>> {
        self.embed
            .iter()
            .map(|spec| match spec {
                EmbedSpec::Module(notation) => {
                    notation.parse::<Coordinate>().map(EmbeddedDependency::Module)
                }
                EmbedSpec::Local { path } => Ok(EmbeddedDependency::Local(path.clone())),
            })
            .collect()
    }

    /// Host exclusions (unless disabled) followed by the `[[exclude]]` rules
    pub fn exclusions(&self) -> ExclusionSet {
        let mut rules = if self.resolve.exclude_host_modules {
            host_exclusions()
        } else {
            Vec::new()
        };
        for rule in &self.exclude {
            if !rules.contains(rule) {
                rules.push(rule.clone());
            }
        }
        ExclusionSet::new(rules)
    }

    pub fn entry_filter(&self) -> PackResult<EntryFilter> {
        EntryFilter::new(&self.assemble.exclude)
    }

    /// `<output_dir>/<name>[-<version>].jar` under the project root
    pub fn output_path(&self, project_root: &Path) -> PathBuf {
        let name = self.package.name.clone().unwrap_or_else(|| {
            project_root
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_else(|| "plugin".to_string())
        });
        let file_name = match &self.package.version {
            Some(version) if !version.is_empty() => format!("{}-{}.jar", name, version),
            _ => format!("{}.jar", name),
        };
        let dir = if self.package.output_dir.is_absolute() {
            self.package.output_dir.clone()
        } else {
            project_root.join(&self.package.output_dir)
        };
        dir.join(file_name)
    }
}
