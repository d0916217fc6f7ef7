//! Configuration loading

use std::fs;
use std::path::{Path, PathBuf};

use crate::domain::policies::{ConflictPolicy, DuplicatesStrategy};
use crate::error::{PackError, PackResult};

use super::env_validator::{levenshtein, EnvVarValidator};
use super::types::{Config, CONFIG_FILE_NAME};

/// Non-fatal configuration warning surfaced to CLI users.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigWarning {
    pub key: String,
    pub file: PathBuf,
    pub line: Option<usize>,
    pub suggestion: Option<String>,
}

impl std::fmt::Display for ConfigWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "unknown key '{}' in {}", self.key, self.file.display())?;
        if let Some(line) = self.line {
            write!(f, ":{}", line)?;
        }
        if let Some(suggestion) = &self.suggestion {
            write!(f, " (did you mean '{}'?)", suggestion)?;
        }
        Ok(())
    }
}

/// Load configuration and collect non-fatal warnings (e.g. unknown keys).
pub fn load_with_warnings(path: &Path) -> PackResult<(Config, Vec<ConfigWarning>)> {
    let content = fs::read_to_string(path)?;

    let mut unknown_paths: Vec<String> = Vec::new();
    let deserializer = toml::de::Deserializer::new(&content);

    let config: Config = serde_ignored::deserialize(deserializer, |p| {
        unknown_paths.push(p.to_string());
    })
    .map_err(|e| PackError::InvalidConfig {
        file: path.to_path_buf(),
        message: e.to_string(),
    })?;

    let warnings = unknown_paths
        .into_iter()
        .map(|path_str| {
            let key = path_str
                .split('.')
                .next_back()
                .unwrap_or(path_str.as_str())
                .to_string();
            ConfigWarning {
                key: key.clone(),
                file: path.to_path_buf(),
                line: find_line_number(&content, &key),
                suggestion: suggest_key(&key),
            }
        })
        .collect();

    Ok((config, warnings))
}

/// Project config (`plugpack.toml`) if present, defaults otherwise; env applied on top
///
/// A config file that exists but cannot be parsed is an error, never a
/// silent fallback to defaults.
pub fn load_for_project(project_root: &Path) -> PackResult<(Config, Vec<ConfigWarning>)> {
    let path = project_root.join(CONFIG_FILE_NAME);
    let (config, warnings) = if path.is_file() {
        tracing::debug!(path = %path.display(), "loading project config");
        load_with_warnings(&path)?
    } else {
        tracing::debug!(root = %project_root.display(), "no project config, using defaults");
        (Config::default(), Vec::new())
    };
    Ok((with_env_overrides(config), warnings))
}

/// Apply environment variable overrides (PLUGPACK_* prefix)
pub fn with_env_overrides(config: Config) -> Config {
    with_env_overrides_from(config, |name| std::env::var(name).ok(), &mut std::io::stderr())
}

/// Env override with an injectable lookup (for testing)
pub fn with_env_overrides_from<W: std::io::Write>(
    mut config: Config,
    lookup: impl Fn(&str) -> Option<String>,
    writer: &mut W,
) -> Config {
    // PLUGPACK_HOST_JAR
    if let Some(jar) = lookup("PLUGPACK_HOST_JAR").filter(|v| !v.trim().is_empty()) {
        config.host.jar = PathBuf::from(jar);
    }

    // PLUGPACK_OFFLINE
    if let Some(val) = lookup("PLUGPACK_OFFLINE") {
        config.resolve.offline = val.to_lowercase() != "false" && val != "0" && !val.is_empty();
    }

    // PLUGPACK_DUPLICATES
    if let Some(val) = lookup("PLUGPACK_DUPLICATES") {
        let validator = EnvVarValidator::new("PLUGPACK_DUPLICATES", DuplicatesStrategy::VALUES);
        config.assemble.duplicates = validator.parse_with_writer(
            &val,
            DuplicatesStrategy::parse,
            config.assemble.duplicates,
            writer,
        );
    }

    // PLUGPACK_CONFLICT
    if let Some(val) = lookup("PLUGPACK_CONFLICT") {
        let validator = EnvVarValidator::new("PLUGPACK_CONFLICT", ConflictPolicy::VALUES);
        config.resolve.conflict = validator.parse_with_writer(
            &val,
            ConflictPolicy::parse,
            config.resolve.conflict,
            writer,
        );
    }

    // PLUGPACK_CACHE_DIR
    if let Some(dir) = lookup("PLUGPACK_CACHE_DIR").filter(|v| !v.trim().is_empty()) {
        config.resolve.cache_dir = Some(PathBuf::from(dir));
    }

    config
}

fn find_line_number(content: &str, needle: &str) -> Option<usize> {
    for (i, line) in content.lines().enumerate() {
        if line.contains(needle) {
            return Some(i + 1);
        }
    }
    None
}

fn suggest_key(unknown: &str) -> Option<String> {
    const CANDIDATES: &[&str] = &[
        "embed",
        "exclude",
        "group",
        "module",
        "repositories",
        "name",
        "url",
        "path",
        "package",
        "version",
        "output_dir",
        "classes",
        "assets",
        "compression",
        "host",
        "jar",
        "label",
        "resolve",
        "maven_local",
        "maven_central",
        "transitive",
        "conflict",
        "offline",
        "cache_dir",
        "exclude_host_modules",
        "assemble",
        "duplicates",
    ];

    let mut best: Option<(&str, usize)> = None;
    for candidate in CANDIDATES {
        let dist = levenshtein(unknown, candidate);
        best = match best {
            None => Some((candidate, dist)),
            Some((_, best_dist)) if dist < best_dist => Some((candidate, dist)),
            Some(current) => Some(current),
        };
    }

    match best {
        Some((candidate, dist)) if dist <= 2 => Some(candidate.to_string()),
        _ => None,
    }
}
