//! Color representation used for window backgrounds and rendering.
//!
//! [`Color`] stores RGBA channels as `f32` in `[0.0, 1.0]`. It parses the
//! common CSS-like notations a configuration file or client would use
//! (`#rgb`, `#rgba`, `#rrggbb`, `#rrggbbaa`, `rgb(r, g, b)`, `rgba(r, g, b, a)`)
//! and serializes as `#rrggbbaa`.
//!
//! # Examples
//!
//! ```
//! use novade_core::types::Color;
//! use std::str::FromStr;
//!
//! let root = Color::from_str("rgb(51, 110, 165)").unwrap();
//! assert_eq!(root.to_hex(), "#336ea5");
//! assert_eq!(Color::from_hex("#ddd").unwrap(), Color::from_rgb8(0xdd, 0xdd, 0xdd));
//! ```

use serde::de::Error as SerdeError;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::num::ParseIntError;
use std::str::FromStr;
use thiserror::Error;

/// Error type for color parsing operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ColorParseError {
    /// Indicates an invalid overall format for a hex color string.
    #[error("Invalid hex color string format: '{0}'. Expected #RGB, #RGBA, #RRGGBB, or #RRGGBBAA.")]
    InvalidHexFormat(String),

    /// Indicates an invalid hexadecimal digit was encountered within a component.
    #[error("Invalid hex digit in '{input_str}': {source}")]
    InvalidHexDigit {
        input_str: String,
        #[source]
        source: ParseIntError,
    },

    /// Indicates that a hex color string has an incorrect number of characters after the leading '#'.
    #[error("Invalid hex color string length: '{0}'. Expected 3, 4, 6, or 8 characters after '#'.")]
    InvalidHexLength(String),

    /// A malformed `rgb()`/`rgba()` string, or an unsupported notation.
    #[error("Invalid color string format: {0}")]
    InvalidFormat(String),
}

/// Represents a color in RGBA (Red, Green, Blue, Alpha) format.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Color {
    /// Red component, in the range `[0.0, 1.0]`.
    pub r: f32,
    /// Green component, in the range `[0.0, 1.0]`.
    pub g: f32,
    /// Blue component, in the range `[0.0, 1.0]`.
    pub b: f32,
    /// Alpha (opacity) component, in the range `[0.0, 1.0]`.
    pub a: f32,
}

impl Default for Color {
    /// Opaque black.
    fn default() -> Self {
        Color::rgb(0.0, 0.0, 0.0)
    }
}

impl Color {
    /// Creates a new `Color`; components outside `[0.0, 1.0]` are clamped.
    pub fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
        Color {
            r: r.clamp(0.0, 1.0),
            g: g.clamp(0.0, 1.0),
            b: b.clamp(0.0, 1.0),
            a: a.clamp(0.0, 1.0),
        }
    }

    /// Creates a new opaque `Color` (alpha = 1.0).
    pub fn rgb(r: f32, g: f32, b: f32) -> Self {
        Color::new(r, g, b, 1.0)
    }

    /// Creates a new opaque `Color` from RGB components in the range `[0, 255]`.
    pub fn from_rgb8(r: u8, g: u8, b: u8) -> Self {
        Color::rgb(f32::from(r) / 255.0, f32::from(g) / 255.0, f32::from(b) / 255.0)
    }

    /// Creates a new `Color` from RGBA components in the range `[0, 255]`.
    pub fn from_rgba8(r: u8, g: u8, b: u8, a: u8) -> Self {
        Color::new(
            f32::from(r) / 255.0,
            f32::from(g) / 255.0,
            f32::from(b) / 255.0,
            f32::from(a) / 255.0,
        )
    }

    /// Creates a new `Color` from a hexadecimal string (`#RGB`, `#RGBA`, `#RRGGBB`, `#RRGGBBAA`).
    ///
    /// The parsing is case-insensitive for hex digits.
    pub fn from_hex(hex_str: &str) -> Result<Self, ColorParseError> {
        let input = hex_str
            .strip_prefix('#')
            .ok_or_else(|| ColorParseError::InvalidHexFormat(hex_str.to_string()))?;
        if !input.is_ascii() {
            return Err(ColorParseError::InvalidHexFormat(hex_str.to_string()));
        }

        let component = |s: &str| {
            u8::from_str_radix(s, 16)
                .map_err(|e| ColorParseError::InvalidHexDigit { input_str: s.to_string(), source: e })
        };
        // Short forms repeat each nibble: "f" -> 0xff.
        let short = |s: &str| component(s).map(|v| (v << 4) | v);

        match input.len() {
            3 => Ok(Color::from_rgb8(short(&input[0..1])?, short(&input[1..2])?, short(&input[2..3])?)),
            4 => Ok(Color::from_rgba8(
                short(&input[0..1])?,
                short(&input[1..2])?,
                short(&input[2..3])?,
                short(&input[3..4])?,
            )),
            6 => Ok(Color::from_rgb8(component(&input[0..2])?, component(&input[2..4])?, component(&input[4..6])?)),
            8 => Ok(Color::from_rgba8(
                component(&input[0..2])?,
                component(&input[2..4])?,
                component(&input[4..6])?,
                component(&input[6..8])?,
            )),
            _ => Err(ColorParseError::InvalidHexLength(hex_str.to_string())),
        }
    }

    /// Converts the RGBA components to 8-bit integer values in the range `[0, 255]`.
    pub fn to_rgba8(&self) -> (u8, u8, u8, u8) {
        (
            (self.r * 255.0).round() as u8,
            (self.g * 255.0).round() as u8,
            (self.b * 255.0).round() as u8,
            (self.a * 255.0).round() as u8,
        )
    }

    /// Converts this `Color` to `"#rrggbb"`. The alpha component is ignored.
    pub fn to_hex(&self) -> String {
        let (r, g, b, _) = self.to_rgba8();
        format!("#{:02x}{:02x}{:02x}", r, g, b)
    }

    /// Converts this `Color` to `"#rrggbbaa"`.
    pub fn to_hex_with_alpha(&self) -> String {
        let (r, g, b, a) = self.to_rgba8();
        format!("#{:02x}{:02x}{:02x}{:02x}", r, g, b, a)
    }
}

impl Serialize for Color {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.to_hex_with_alpha())
    }
}

impl<'de> Deserialize<'de> for Color {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Color::from_str(&s).map_err(SerdeError::custom)
    }
}

fn parse_channel(part: &str, name: &str, input: &str) -> Result<u8, ColorParseError> {
    part.parse::<u8>()
        .map_err(|e| ColorParseError::InvalidFormat(format!("Invalid {} component in '{}': {}", name, input, e)))
}

impl FromStr for Color {
    type Err = ColorParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.starts_with('#') {
            return Color::from_hex(s);
        }

        let (content, expected) = if let Some(rest) = s.strip_prefix("rgba(") {
            (rest, 4)
        } else if let Some(rest) = s.strip_prefix("rgb(") {
            (rest, 3)
        } else {
            return Err(ColorParseError::InvalidFormat(format!("Unsupported color format: {}", s)));
        };
        let content = content
            .strip_suffix(')')
            .ok_or_else(|| ColorParseError::InvalidFormat(format!("Missing closing parenthesis: {}", s)))?;

        let parts: Vec<&str> = content.split(',').map(str::trim).collect();
        if parts.len() != expected {
            return Err(ColorParseError::InvalidFormat(format!(
                "Expected {} components in '{}', found {}",
                expected,
                s,
                parts.len()
            )));
        }

        let r = parse_channel(parts[0], "red", s)?;
        let g = parse_channel(parts[1], "green", s)?;
        let b = parse_channel(parts[2], "blue", s)?;
        let a = match parts.get(3) {
            Some(alpha) => alpha
                .parse::<f32>()
                .map_err(|e| ColorParseError::InvalidFormat(format!("Invalid alpha component in '{}': {}", s, e)))?,
            None => 1.0,
        };

        Ok(Color::new(f32::from(r) / 255.0, f32::from(g) / 255.0, f32::from(b) / 255.0, a))
    }
}

impl fmt::Display for Color {
    /// Opaque colors format as `rgb(r, g, b)`, translucent ones as `rgba(r, g, b, a)`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (r, g, b, _) = self.to_rgba8();
        if self.a == 1.0 {
            write!(f, "rgb({}, {}, {})", r, g, b)
        } else {
            write!(f, "rgba({}, {}, {}, {})", r, g, b, self.a)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("#ddd", (0xdd, 0xdd, 0xdd, 0xff))]
    #[case("#DDDD", (0xdd, 0xdd, 0xdd, 0xdd))]
    #[case("#336ea5", (0x33, 0x6e, 0xa5, 0xff))]
    #[case("#ff000080", (0xff, 0x00, 0x00, 0x80))]
    #[case("rgb(51, 110, 165)", (51, 110, 165, 255))]
    #[case("rgba(255, 0, 0, 0.5)", (255, 0, 0, 128))]
    fn test_color_parse(#[case] input: &str, #[case] expected: (u8, u8, u8, u8)) {
        assert_eq!(Color::from_str(input).unwrap().to_rgba8(), expected);
    }

    #[test]
    fn test_color_parse_errors() {
        assert!(matches!(Color::from_hex("ddd"), Err(ColorParseError::InvalidHexFormat(_))));
        assert!(matches!(Color::from_hex("#dddddddddd"), Err(ColorParseError::InvalidHexLength(_))));
        assert!(matches!(Color::from_hex("#ggg"), Err(ColorParseError::InvalidHexDigit { .. })));
        assert!(matches!(Color::from_str("rgb(1, 2)"), Err(ColorParseError::InvalidFormat(_))));
        assert!(matches!(Color::from_str("rgb(1, 2, 300)"), Err(ColorParseError::InvalidFormat(_))));
        assert!(matches!(Color::from_str("hsl(0, 1, 1)"), Err(ColorParseError::InvalidFormat(_))));
    }

    #[test]
    fn test_color_display_and_hex() {
        let c = Color::from_rgb8(51, 110, 165);
        assert_eq!(c.to_string(), "rgb(51, 110, 165)");
        assert_eq!(c.to_hex(), "#336ea5");
        assert_eq!(c.to_hex_with_alpha(), "#336ea5ff");
    }

    #[test]
    fn test_color_serde_round_trip_through_hex() {
        let json = serde_json::to_string(&Color::from_rgb8(0xdd, 0xdd, 0xdd)).unwrap();
        assert_eq!(json, "\"#ddddddff\"");
        let parsed: Color = serde_json::from_str("\"rgb(1, 2, 3)\"").unwrap();
        assert_eq!(parsed, Color::from_rgb8(1, 2, 3));
    }
}
