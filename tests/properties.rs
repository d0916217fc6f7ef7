//! Property tests for plugpack.
//!
//! Properties use randomized input generation to explore edge cases and
//! protect invariants like "never panics" and "never escapes the archive".
//!
//! Run with: `cargo test --test properties`

#[path = "properties/entry_path.rs"]
mod entry_path;

#[path = "properties/coordinate.rs"]
mod coordinate;

#[path = "properties/version.rs"]
mod version;
