//! Configuration Data Structures for NovaDE Core.
//!
//! # Key Structs
//! - [`CoreConfig`]: The root configuration structure.
//! - [`LoggingConfig`]: Configuration specific to the logging subsystem.
//! - [`DisplayConfig`]: Screen geometry and background colors for the window server.
//!
//! These structs apply default values for fields not present in the configuration
//! source, referencing functions from the [`super::defaults`] module. They reject
//! unknown fields via `#[serde(deny_unknown_fields)]`.

use super::defaults;
use crate::types::{Color, RectInt};
use serde::Deserialize;
use std::path::PathBuf;

/// Configuration settings for the logging subsystem.
///
/// # Examples
///
/// ```
/// use novade_core::config::LoggingConfig;
/// use std::path::PathBuf;
///
/// let toml_str = r#"
/// level = "debug"
/// file_path = "/var/log/window-server.log"
/// format = "json"
/// "#;
/// let log_config: LoggingConfig = toml::from_str(toml_str).unwrap();
/// assert_eq!(log_config.level, "debug");
/// assert_eq!(log_config.file_path, Some(PathBuf::from("/var/log/window-server.log")));
/// assert_eq!(log_config.format, "json");
/// ```
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LoggingConfig {
    /// The minimum log level to record.
    /// Valid values (case-insensitive): "trace", "debug", "info", "warn", "error".
    #[serde(default = "defaults::default_log_level")]
    pub level: String,
    /// Optional path to a file where logs should be written.
    /// Relative paths are resolved against the application's state directory.
    #[serde(default = "defaults::default_log_file_path")]
    pub file_path: Option<PathBuf>,
    /// The format for log messages written to a file: "text" or "json".
    #[serde(default = "defaults::default_log_format")]
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        defaults::default_logging_config()
    }
}

/// Screen and background settings for the window server.
///
/// Colors accept any notation understood by [`Color`]'s `FromStr`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DisplayConfig {
    /// Screen width in pixels; the root window spans it.
    #[serde(default = "defaults::default_screen_width")]
    pub width: u32,
    /// Screen height in pixels.
    #[serde(default = "defaults::default_screen_height")]
    pub height: u32,
    /// Background color of the root window.
    #[serde(default = "defaults::default_root_background")]
    pub root_background: Color,
    /// Background given to new windows, and restored when a client resets its background.
    #[serde(default = "defaults::default_window_background")]
    pub window_background: Color,
}

impl DisplayConfig {
    /// The full screen rectangle at the origin.
    pub fn screen_rect(&self) -> RectInt {
        RectInt::from_coords(0, 0, self.width, self.height)
    }
}

impl Default for DisplayConfig {
    fn default() -> Self {
        defaults::default_display_config()
    }
}

/// Root configuration structure.
///
/// # Examples
///
/// ```
/// use novade_core::config::CoreConfig;
///
/// let toml_str = r##"
/// [logging]
/// level = "warn"
///
/// [display]
/// width = 1024
/// root_background = "#000"
/// "##;
/// let loaded: CoreConfig = toml::from_str(toml_str).unwrap();
/// assert_eq!(loaded.logging.level, "warn");
/// assert_eq!(loaded.display.width, 1024);
/// assert_eq!(loaded.display.height, 600);
/// ```
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CoreConfig {
    /// Configuration for the logging subsystem.
    #[serde(default = "defaults::default_logging_config")]
    pub logging: LoggingConfig,
    /// Screen geometry and background colors.
    #[serde(default = "defaults::default_display_config")]
    pub display: DisplayConfig,
}

impl Default for CoreConfig {
    fn default() -> Self {
        Self {
            logging: defaults::default_logging_config(),
            display: defaults::default_display_config(),
        }
    }
}
