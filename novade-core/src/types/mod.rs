//! Core data types shared by the NovaDE display server crates.
//!
//! - **Geometry**: [`Point`], [`PointInt`], [`SizeInt`] and [`RectInt`].
//! - **Color**: The [`Color`] struct and its parse error [`ColorParseError`].
//!
//! All types are serializable with Serde.

pub mod color;
pub mod geometry;

pub use color::{Color, ColorParseError};
pub use geometry::{Point, PointInt, RectInt, SizeInt};
