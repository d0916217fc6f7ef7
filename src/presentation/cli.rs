//! CLI Argument Parsing
//!
//! This module defines the CLI interface using clap.
//!
//! ## Design Notes
//!
//! - Global flags (--project-dir, --json, --color, --verbose) are inherited by all subcommands
//! - Running without a subcommand is the same as `plugpack build`

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::config::CliOverrides;
use crate::domain::policies::DuplicatesStrategy;

#[derive(clap::ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorWhen {
    Auto,
    Always,
    Never,
}

#[derive(clap::ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum DuplicatesArg {
    LastWins,
    FirstWins,
    Fail,
}

impl From<DuplicatesArg> for DuplicatesStrategy {
    fn from(arg: DuplicatesArg) -> Self {
        match arg {
            DuplicatesArg::LastWins => DuplicatesStrategy::LastWins,
            DuplicatesArg::FirstWins => DuplicatesStrategy::FirstWins,
            DuplicatesArg::Fail => DuplicatesStrategy::Fail,
        }
    }
}

/// plugpack - package server plugins with their embedded dependencies
#[derive(Parser, Debug)]
#[command(name = "plugpack")]
#[command(author, version, about, long_about = None)]
#[command(after_help = "Run 'plugpack' without a command to build the plugin archive.")]
pub struct Cli {
    /// Project directory (defaults to the current directory)
    #[arg(short = 'C', long = "project-dir", global = true, value_name = "DIR")]
    pub project_dir: Option<PathBuf>,

    /// Output format for CI
    #[arg(long, global = true)]
    pub json: bool,

    /// Color output mode
    #[arg(long, global = true, value_enum)]
    pub color: Option<ColorWhen>,

    /// Verbosity level (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Flags that change how a single build runs
#[derive(Args, Debug, Clone, Default)]
pub struct BuildArgs {
    /// Host server jar to compile against
    #[arg(long, value_name = "PATH")]
    pub host_jar: Option<PathBuf>,

    /// Serve dependencies from the download cache only
    #[arg(long)]
    pub offline: bool,

    /// What to do when two inputs ship the same entry
    #[arg(long, value_enum)]
    pub duplicates: Option<DuplicatesArg>,

    /// Directory the archive is written to
    #[arg(short, long, value_name = "DIR")]
    pub output: Option<PathBuf>,
}

impl BuildArgs {
    pub fn overrides(&self) -> CliOverrides {
        CliOverrides {
            host_jar: self.host_jar.clone(),
            offline: self.offline,
            duplicates: self.duplicates.map(DuplicatesStrategy::from),
            output_dir: self.output.clone(),
        }
    }
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Validate, resolve dependencies and write the plugin archive
    Build {
        #[command(flatten)]
        args: BuildArgs,
    },

    /// Print the dependency tree after exclusions
    Resolve {
        /// Serve dependencies from the download cache only
        #[arg(long)]
        offline: bool,
    },

    /// Print the compile classpath
    Classpath {
        /// Also list the embedded artifacts
        #[arg(long)]
        embedded: bool,

        /// Host server jar to compile against
        #[arg(long, value_name = "PATH")]
        host_jar: Option<PathBuf>,

        /// Serve dependencies from the download cache only
        #[arg(long)]
        offline: bool,
    },

    /// List the entries of an archive
    Inspect {
        /// Archive to inspect
        archive: PathBuf,
    },

    /// Validate configuration and the host jar (no network)
    Check {
        /// Host server jar to compile against
        #[arg(long, value_name = "PATH")]
        host_jar: Option<PathBuf>,
    },

    /// Build, then rebuild whenever classes, assets or the config change
    Watch {
        #[command(flatten)]
        args: BuildArgs,
    },
}
