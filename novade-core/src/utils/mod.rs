//! General utilities for NovaDE core.
//!
//! - [`fs`]: Filesystem helpers that map I/O failures into `CoreError`.
//! - [`paths`]: XDG base directory and application-specific path resolution.

pub mod fs;
pub mod paths;

pub use fs::{ensure_dir_exists, read_to_string};
