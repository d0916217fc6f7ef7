//! Configuration module for plugpack
//!
//! Implements the configuration hierarchy:
//! 1. CLI flags (highest priority)
//! 2. Environment variables (PLUGPACK_*)
//! 3. Project config (plugpack.toml)
//! 4. Built-in defaults (lowest priority)

mod env_validator;
mod loader;
mod types;

pub use env_validator::{levenshtein, EnvVarValidator};
pub use loader::{with_env_overrides_from, ConfigWarning};
pub use types::{
    AssembleConfig, CliOverrides, Compression, Config, EmbedSpec, HostConfig, PackageConfig,
    RepositoryConfig, ResolveConfig, CONFIG_FILE_NAME, DEFAULT_HOST_JAR, DEFAULT_HOST_LABEL,
};
