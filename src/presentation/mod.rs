//! Presentation Layer
//!
//! This layer handles:
//! - CLI argument parsing (via clap)
//! - Output formatting (text/JSON)
//!
//! Commands in the binary wire these to the application use cases.

pub mod cli;
pub mod output;

pub use cli::{BuildArgs, Cli, ColorWhen, Commands, DuplicatesArg};
pub use output::{json_line, ConsoleEventSink, OutputFormat, TextRenderer};
