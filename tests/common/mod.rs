//! Common test utilities for plugpack CLI tests.
//!
//! This module provides:
//! - `TestEnv`: isolated project and home directories plus a CLI runner
//! - Fixtures: jar and Maven repository builders

#![allow(dead_code)]

pub mod env;
pub mod fixtures;

pub use env::*;
pub use fixtures::*;
