//! plugpack CLI
//!
//! Usage: plugpack [COMMAND]
//!
//! Commands:
//!   build      Validate, resolve and write the plugin archive (default)
//!   resolve    Print the dependency tree
//!   classpath  Print the compile classpath
//!   inspect    List the entries of an archive
//!   check      Validate configuration and the host jar
//!   watch      Rebuild on changes

mod commands;
mod ui;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use plugpack::presentation::{BuildArgs, Cli, Commands};

use crate::ui::context::UiContext;

/// Overrides the `-v` derived filter, e.g. `PLUGPACK_LOG=plugpack::application=trace`
const LOG_ENV: &str = "PLUGPACK_LOG";

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let ui = UiContext::new(cli.json, cli.verbose, cli.color);
    match run(cli, &ui) {
        Ok(0) => {}
        Ok(code) => std::process::exit(code),
        Err(err) => {
            tracing::debug!(error = ?err, "command failed");
            ui::error::print_error(&err, ui.json());
            std::process::exit(ui::error::exit_code(&err));
        }
    }
}

fn run(cli: Cli, ui: &UiContext) -> Result<i32> {
    let project_dir = cli.project_dir.as_deref();
    match cli.command {
        None => commands::cmd_build(project_dir, &BuildArgs::default(), ui).map(|_| 0),
        Some(Commands::Build { args }) => commands::cmd_build(project_dir, &args, ui).map(|_| 0),
        Some(Commands::Resolve { offline }) => {
            commands::cmd_resolve(project_dir, offline, ui).map(|_| 0)
        }
        Some(Commands::Classpath {
            embedded,
            host_jar,
            offline,
        }) => commands::cmd_classpath(project_dir, embedded, host_jar, offline, ui).map(|_| 0),
        Some(Commands::Inspect { archive }) => commands::cmd_inspect(&archive, ui).map(|_| 0),
        Some(Commands::Check { host_jar }) => commands::cmd_check(project_dir, host_jar, ui),
        Some(Commands::Watch { args }) => commands::cmd_watch(project_dir, &args, ui).map(|_| 0),
    }
}

/// Logs go to stderr so `--json` output stays machine readable
fn init_logging(verbose: u8) {
    let default = match verbose {
        0 => "plugpack=warn",
        1 => "plugpack=debug",
        _ => "plugpack=trace",
    };
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}
