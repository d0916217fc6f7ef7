//! Terminal-facing helpers for the binary

pub mod context;
pub mod error;
pub mod terminal;
