//! XDG Base Directory and Application-Specific Path Resolution.
//!
//! Resolves the directories the window server reads its configuration from
//! and writes its log files to. It relies on the `directories-next` crate.
//!
//! - [`get_config_base_dir()`]: `$XDG_CONFIG_HOME` (e.g., `~/.config`).
//! - [`get_state_base_dir()`]: `$XDG_STATE_HOME` (e.g., `~/.local/state` on Linux).
//! - [`get_app_config_dir()`]: e.g., `~/.config/window-server`.
//! - [`get_app_state_dir()`]: e.g., `~/.local/state/NovaDE/window-server`.
//!
//! All functions yield [`CoreError::Config(ConfigError::DirectoryUnavailable)`]
//! if a required directory cannot be determined (e.g., when HOME is not set).

use crate::error::{ConfigError, CoreError};
use directories_next::{BaseDirs, ProjectDirs};
use std::path::PathBuf;

const QUALIFIER: &str = "org";
const ORGANIZATION: &str = "NovaDE";
const APPLICATION: &str = "window-server";

/// Returns the base directory for user-specific configuration files.
///
/// # Examples
/// ```
/// // On Linux, this might print something like: "/home/username/.config"
/// match novade_core::utils::paths::get_config_base_dir() {
///     Ok(path) => println!("Config base directory: {}", path.display()),
///     Err(e) => eprintln!("Error getting config base dir: {}", e),
/// }
/// ```
pub fn get_config_base_dir() -> Result<PathBuf, CoreError> {
    BaseDirs::new()
        .map(|dirs| dirs.config_dir().to_path_buf())
        .ok_or_else(|| CoreError::Config(ConfigError::DirectoryUnavailable {
            dir_type: "Config Base".to_string()
        }))
}

/// Returns the base directory for user-specific state such as log files.
///
/// On Linux this honours `$XDG_STATE_HOME` and falls back to `~/.local/state`.
/// Elsewhere it uses the platform's local data directory.
pub fn get_state_base_dir() -> Result<PathBuf, CoreError> {
    BaseDirs::new()
        .map(|dirs| {
            #[cfg(target_os = "linux")]
            {
                match std::env::var("XDG_STATE_HOME") {
                    Ok(state_home) if !state_home.is_empty() => PathBuf::from(state_home),
                    _ => dirs.home_dir().join(".local/state"),
                }
            }
            #[cfg(not(target_os = "linux"))]
            {
                dirs.data_local_dir().to_path_buf()
            }
        })
        .ok_or_else(|| CoreError::Config(ConfigError::DirectoryUnavailable {
            dir_type: "State Base".to_string()
        }))
}

/// Returns the window server's configuration directory.
///
/// Derived with `ProjectDirs` from the `QUALIFIER`, `ORGANIZATION` and
/// `APPLICATION` constants. `config.toml` is looked up here.
pub fn get_app_config_dir() -> Result<PathBuf, CoreError> {
    ProjectDirs::from(QUALIFIER, ORGANIZATION, APPLICATION)
        .map(|dirs| dirs.config_dir().to_path_buf())
        .ok_or_else(|| CoreError::Config(ConfigError::DirectoryUnavailable {
            dir_type: "App Config".to_string()
        }))
}

/// Returns the window server's state directory, `<state base>/NovaDE/window-server`.
///
/// Relative log file paths from the configuration are resolved against it.
pub fn get_app_state_dir() -> Result<PathBuf, CoreError> {
    // ProjectDirs has no state_dir(), so build it from the base.
    get_state_base_dir().map(|base_state| base_state.join(ORGANIZATION).join(APPLICATION))
}
