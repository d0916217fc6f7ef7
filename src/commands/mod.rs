//! Command handlers
//!
//! Each handler loads the project, runs one use case and renders the result
//! as text or JSON.

mod build;
mod check;
mod classpath;
mod inspect;
mod project;
mod resolve;
mod watch;

pub use build::cmd_build;
pub use check::cmd_check;
pub use classpath::cmd_classpath;
pub use inspect::cmd_inspect;
pub use resolve::cmd_resolve;
pub use watch::cmd_watch;
