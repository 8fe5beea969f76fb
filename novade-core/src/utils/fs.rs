//! Filesystem Utilities.
//!
//! Helper functions for the few filesystem operations the configuration and
//! logging layers need. They return `CoreError` so callers can use `?`.

use crate::error::CoreError;
use std::fs;
use std::path::Path;

/// Ensures that a directory exists at the given path.
///
/// Missing parent directories are created too. If the path already exists but
/// is not a directory, an error is returned.
///
/// # Arguments
///
/// * `path`: The directory whose existence should be ensured.
///
/// # Returns
///
/// * `Ok(())` if the directory exists or was successfully created.
/// * `Err(CoreError::Filesystem)` if the path is occupied by a non-directory or creation fails.
pub fn ensure_dir_exists(path: &Path) -> Result<(), CoreError> {
    if path.exists() {
        if !path.is_dir() {
            Err(CoreError::Filesystem {
                message: "Path exists but is not a directory".to_string(),
                path: path.to_path_buf(),
                source: std::io::Error::new(
                    std::io::ErrorKind::AlreadyExists,
                    "Path exists but is not a directory",
                ),
            })
        } else {
            Ok(())
        }
    } else {
        fs::create_dir_all(path).map_err(|e| CoreError::Filesystem {
            message: "Failed to create directory".to_string(),
            path: path.to_path_buf(),
            source: e,
        })
    }
}

/// Reads the entire contents of a file into a string.
///
/// Wraps `std::fs::read_to_string`, attaching the path to any failure.
pub fn read_to_string(path: &Path) -> Result<String, CoreError> {
    fs::read_to_string(path).map_err(|e| CoreError::Filesystem {
        message: "Failed to read file".to_string(),
        path: path.to_path_buf(),
        source: e,
    })
}
