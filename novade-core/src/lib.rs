//! # NovaDE Core Library (`novade-core`)
//!
//! `novade-core` is the foundational library shared by the NovaDE display server
//! crates. It provides the small set of infrastructure pieces every other crate
//! builds upon:
//!
//! - **Error Handling**: A unified error system through the `CoreError` enum and its
//!   associated specific error types like `ConfigError` and `LoggingError`.
//! - **Core Data Types**: Geometry primitives (`Point`, `PointInt`, `SizeInt`, `RectInt`)
//!   and the RGBA `Color` type used for window backgrounds.
//! - **Configuration Management**: TOML-based loading and validation of `CoreConfig`,
//!   which carries the logging and display settings.
//! - **Logging**: A configurable logging setup built on top of the `tracing` crate,
//!   with console output and optional rolling file output (text or JSON).
//! - **Paths**: XDG base directory resolution via `directories-next`.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use novade_core::config::ConfigLoader;
//! use novade_core::logging::init_logging;
//! use novade_core::error::CoreError;
//!
//! fn main() -> Result<(), CoreError> {
//!     let core_config = ConfigLoader::load()?;
//!     init_logging(&core_config.logging, false)?;
//!
//!     tracing::info!("NovaDE Core initialized successfully.");
//!     Ok(())
//! }
//! ```

pub mod error;
pub mod types;
pub mod config;
pub mod logging;
pub mod utils;

// Re-export key types for convenience
pub use error::{CoreError, ConfigError, LoggingError};
pub use types::{Point, PointInt, SizeInt, RectInt, Color, ColorParseError};
pub use config::{CoreConfig, DisplayConfig, LoggingConfig, ConfigLoader};
pub use logging::{init_logging, init_minimal_logging};
