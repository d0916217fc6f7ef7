//! plugpack - package assembler for server plugins
//!
//! plugpack turns a compiled plugin, its asset directory and a list of
//! embeddable libraries into one deterministic archive. Before anything is
//! resolved it checks that the host server jar the plugin compiles against
//! is present.

pub mod application;
pub mod config;
pub mod domain;
pub mod error;
pub mod infrastructure;
pub mod presentation;

// Re-exports for convenience
pub use application::{BuildOptions, BuildReport, PackageAssembler};
pub use config::{CliOverrides, Config};
pub use error::{ErrorCategory, PackError, PackResult};
