//! Watch Use Case
//!
//! Rebuilds the package whenever class output, assets or the project
//! config change. It orchestrates:
//! - File system monitoring (via `notify` crate)
//! - Debouncing (100ms default)
//! - Full rebuilds through `PackageAssembler`
//!
//! ## Usage
//!
//! ```ignore
//! let options = WatchOptions::new(project_root, config);
//! let use_case = WatchUseCase::new(options);
//! use_case.start(running, |event| { ... });
//! ```

mod event;
mod use_case;


pub use event::{is_relevant, WatchEvent, WatchOptions, WatchRegistry, WatcherState, DEBOUNCE_MS};
pub use use_case::WatchUseCase;
