//! Default configuration values for NovaDE Core.
//!
//! These functions are used by `serde`'s `default` attribute in the configuration
//! structures to provide values that are not specified in the configuration file.

use crate::config::{DisplayConfig, LoggingConfig};
use crate::types::Color;
use std::path::PathBuf;

/// Returns the default `LoggingConfig`.
pub(super) fn default_logging_config() -> LoggingConfig {
    LoggingConfig {
        level: default_log_level(),
        file_path: default_log_file_path(),
        format: default_log_format(),
    }
}

/// Returns the default log level string (`"info"`).
pub(super) fn default_log_level() -> String {
    "info".to_string()
}

/// Returns the default log file path (`None`, no file logging).
pub(super) fn default_log_file_path() -> Option<PathBuf> {
    None
}

/// Returns the default log format string (`"text"`).
pub(super) fn default_log_format() -> String {
    "text".to_string()
}

/// Returns the default `DisplayConfig`.
pub(super) fn default_display_config() -> DisplayConfig {
    DisplayConfig {
        width: default_screen_width(),
        height: default_screen_height(),
        root_background: default_root_background(),
        window_background: default_window_background(),
    }
}

pub(super) fn default_screen_width() -> u32 {
    800
}

pub(super) fn default_screen_height() -> u32 {
    600
}

/// `rgb(51, 110, 165)`.
pub(super) fn default_root_background() -> Color {
    Color::from_rgb8(51, 110, 165)
}

/// `#ddd`.
pub(super) fn default_window_background() -> Color {
    Color::from_rgb8(0xdd, 0xdd, 0xdd)
}
