//! Build Module
//!
//! Orchestrates the package build for plugpack.
//!
//! ## Structure
//!
//! - `options` - Inputs (`BuildOptions`)
//! - `result` - Outputs (`BuildReport`)
//! - `use_case` - The pipeline (`PackageAssembler`)
//!
//! ## Usage
//!
//! ```ignore
//! use plugpack::application::build::{BuildOptions, PackageAssembler};
//!
//! let assembler = PackageAssembler::new(BuildOptions::new(project_root, config));
//! let report = assembler.build()?;
//! ```

mod options;
mod result;
mod use_case;

pub use options::BuildOptions;
pub use result::{BuildReport, DuplicateSummary};
pub use use_case::{manifest_bytes, PackageAssembler, ValidatedInputs, MANIFEST_PATH};
