//! Configuration Management for NovaDE Core.
//!
//! - [`types`]: The configuration schema ([`CoreConfig`], [`LoggingConfig`], [`DisplayConfig`]).
//! - [`defaults`]: Default values used when a file is missing or incomplete.
//! - [`loader`]: [`ConfigLoader`], which reads TOML from the XDG config directory
//!   (or an explicit path or string) and validates the result.
//!
//! # Examples
//!
//! ```rust,ignore
//! use novade_core::config::ConfigLoader;
//!
//! match ConfigLoader::load() {
//!     Ok(config) => println!("Loaded log level: {}", config.logging.level),
//!     Err(e) => {
//!         novade_core::logging::init_minimal_logging();
//!         tracing::error!("Configuration error: {}", e);
//!     }
//! }
//! ```

pub mod defaults;
pub mod loader;
pub mod types;

pub use loader::ConfigLoader;
pub use types::{CoreConfig, DisplayConfig, LoggingConfig};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_core_config_deserialize_full() {
        let json_data = r##"{
            "logging": {
                "level": "trace",
                "file_path": "/var/log/app.log",
                "format": "json"
            },
            "display": {
                "width": 640,
                "height": 480,
                "root_background": "#112233"
            }
        }"##;
        let config: CoreConfig = serde_json::from_str(json_data).expect("Failed to deserialize CoreConfig");

        assert_eq!(config.logging.level, "trace");
        assert_eq!(config.logging.file_path, Some(std::path::PathBuf::from("/var/log/app.log")));
        assert_eq!(config.display.width, 640);
        assert_eq!(config.display.root_background.to_hex(), "#112233");
        assert_eq!(config.display.window_background, DisplayConfig::default().window_background);
    }
}
