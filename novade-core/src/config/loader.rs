//! Configuration Loading for NovaDE Core.
//!
//! [`ConfigLoader`] locates, parses and validates the [`CoreConfig`].
//!
//! ```rust,ignore
//! use novade_core::config::ConfigLoader;
//!
//! match ConfigLoader::load() {
//!     Ok(config) => println!("Screen: {}x{}", config.display.width, config.display.height),
//!     Err(e) => {
//!         novade_core::logging::init_minimal_logging();
//!         tracing::error!("Configuration loading failed: {}", e);
//!     }
//! }
//! ```
//!
//! ## Configuration File Location
//!
//! `ConfigLoader::load()` reads `config.toml` from the directory returned by
//! `novade_core::utils::paths::get_app_config_dir()`. A missing file yields the
//! default configuration.
//!
//! ## Validation
//!
//! - Log level and format are normalized to lowercase and checked.
//! - Relative log file paths are resolved against the application state directory
//!   and their parent directories are created.
//! - Screen dimensions must be non-zero and fit in `i32` coordinates.

use std::fs;
use std::path::Path;

use crate::config::CoreConfig;
use crate::error::{ConfigError, CoreError};
use crate::utils::fs::ensure_dir_exists;
use crate::utils::paths::{get_app_config_dir, get_app_state_dir};

/// Name of the configuration file inside the application config directory.
pub const CONFIG_FILE_NAME: &str = "config.toml";

/// `ConfigLoader` provides static methods to load and validate `CoreConfig`.
pub struct ConfigLoader;

impl ConfigLoader {
    /// Loads and validates the `CoreConfig` from the user's configuration directory.
    ///
    /// # Returns
    ///
    /// - `Ok(CoreConfig)`: The loaded (or default) and validated configuration.
    /// - `Err(CoreError)`: If the directory cannot be resolved, the file cannot be read
    ///   or parsed, or validation fails.
    pub fn load() -> Result<CoreConfig, CoreError> {
        let config_path = get_app_config_dir()?.join(CONFIG_FILE_NAME);
        Self::load_from_path(&config_path)
    }

    /// Loads and validates the configuration at `path`.
    ///
    /// A missing or empty file yields the default configuration; any other read
    /// failure is reported as [`ConfigError::ReadError`].
    pub fn load_from_path(path: &Path) -> Result<CoreConfig, CoreError> {
        match fs::read_to_string(path) {
            Ok(content) => Self::load_from_str(&content),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!("No configuration file at {:?}, using defaults", path);
                let mut config = CoreConfig::default();
                Self::validate_config(&mut config)?;
                Ok(config)
            }
            Err(e) => Err(CoreError::Config(ConfigError::ReadError {
                path: path.to_path_buf(),
                source: e,
            })),
        }
    }

    /// Parses TOML `content` into a validated `CoreConfig`.
    ///
    /// Blank content is treated like a missing file.
    pub fn load_from_str(content: &str) -> Result<CoreConfig, CoreError> {
        let mut config = if content.trim().is_empty() {
            CoreConfig::default()
        } else {
            toml::from_str::<CoreConfig>(content).map_err(|e| CoreError::Config(ConfigError::ParseError(e)))?
        };
        Self::validate_config(&mut config)?;
        Ok(config)
    }

    /// Validates the `CoreConfig` and normalizes it in place.
    ///
    /// # Errors
    ///
    /// - [`ConfigError::ValidationError`] for an unknown log level or format, or
    ///   unusable screen dimensions.
    /// - [`ConfigError::DirectoryUnavailable`] if a relative log path needs the
    ///   state directory and it cannot be determined.
    /// - [`CoreError::Filesystem`] if the log directory cannot be created.
    pub fn validate_config(config: &mut CoreConfig) -> Result<(), CoreError> {
        let level_lower = config.logging.level.to_lowercase();
        match level_lower.as_str() {
            "trace" | "debug" | "info" | "warn" | "error" => {
                config.logging.level = level_lower;
            }
            _ => {
                return Err(CoreError::Config(ConfigError::ValidationError(format!(
                    "Invalid log level: '{}'. Must be one of trace, debug, info, warn, error.",
                    config.logging.level
                ))));
            }
        }

        let format_lower = config.logging.format.to_lowercase();
        match format_lower.as_str() {
            "text" | "json" => {
                config.logging.format = format_lower;
            }
            _ => {
                return Err(CoreError::Config(ConfigError::ValidationError(format!(
                    "Invalid log format: '{}'. Must be one of text, json.",
                    config.logging.format
                ))));
            }
        }

        if let Some(file_path) = &config.logging.file_path {
            let absolute_path = if file_path.is_absolute() {
                file_path.clone()
            } else {
                get_app_state_dir()?.join(file_path)
            };
            if let Some(parent_dir) = absolute_path.parent() {
                ensure_dir_exists(parent_dir)?;
            }
            config.logging.file_path = Some(absolute_path);
        }

        let display = &config.display;
        if display.width == 0 || display.height == 0 {
            return Err(CoreError::Config(ConfigError::ValidationError(format!(
                "Invalid screen size {}x{}: both dimensions must be non-zero.",
                display.width, display.height
            ))));
        }
        if display.width > i32::MAX as u32 || display.height > i32::MAX as u32 {
            return Err(CoreError::Config(ConfigError::ValidationError(format!(
                "Invalid screen size {}x{}: dimensions exceed the coordinate range.",
                display.width, display.height
            ))));
        }

        Ok(())
    }
}
