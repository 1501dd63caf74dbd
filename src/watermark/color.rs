//! Color values used by watermark styles.
//!
//! Styles carry colors as CSS-like strings. Supported forms:
//!
//! - `#RGB` and `#RRGGBB` hex
//! - `rgba(r, g, b, a)` and `rgb(r, g, b)` with `a` in `0.0..=1.0`
//! - the named colors `black`, `white` and `transparent`

use super::WatermarkError;
use image::Rgba;
use serde::{Deserialize, Serialize};
use std::fmt;

/// An RGBA color with straight (non-premultiplied) alpha.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    pub const fn with_alpha(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// White color.
    pub const fn white() -> Self {
        Self::new(255, 255, 255)
    }

    /// Black color.
    pub const fn black() -> Self {
        Self::new(0, 0, 0)
    }

    /// Returns the same color with alpha scaled by `opacity`.
    pub fn faded(self, opacity: f32) -> Self {
        let a = (self.a as f32 * opacity.clamp(0.0, 1.0)).round() as u8;
        Self { a, ..self }
    }

    pub fn to_rgba(self) -> Rgba<u8> {
        Rgba([self.r, self.g, self.b, self.a])
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.a == 255 {
            write!(f, "#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
        } else {
            let alpha = self.a as f32 / 255.0;
            write!(f, "rgba({}, {}, {}, {:.2})", self.r, self.g, self.b, alpha)
        }
    }
}

impl TryFrom<String> for Color {
    type Error = WatermarkError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        parse_color(&value)
    }
}

impl From<Color> for String {
    fn from(color: Color) -> Self {
        color.to_string()
    }
}

impl std::str::FromStr for Color {
    type Err = WatermarkError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_color(s)
    }
}

/// Parse a color string into a [`Color`].
///
/// # Examples
///
/// ```
/// use photomark::watermark::color::{parse_color, Color};
///
/// assert_eq!(parse_color("#F59E0B").unwrap(), Color::new(0xF5, 0x9E, 0x0B));
/// assert_eq!(parse_color("rgba(0, 0, 0, 0.5)").unwrap().a, 128);
/// ```
pub fn parse_color(input: &str) -> Result<Color, WatermarkError> {
    let value = input.trim();

    if value.starts_with('#') {
        return parse_hex_color(value);
    }

    let lower = value.to_ascii_lowercase();
    match lower.as_str() {
        "white" => return Ok(Color::white()),
        "black" => return Ok(Color::black()),
        "transparent" => return Ok(Color::with_alpha(0, 0, 0, 0)),
        _ => {}
    }

    if let Some(body) = lower
        .strip_prefix("rgba(")
        .or_else(|| lower.strip_prefix("rgb("))
        .and_then(|rest| rest.strip_suffix(')'))
    {
        return parse_functional(body, input);
    }

    Err(WatermarkError::ConfigError(format!(
        "Unrecognised color '{}'",
        input
    )))
}

/// Parse a hex color string (`#RGB` or `#RRGGBB`).
pub fn parse_hex_color(hex: &str) -> Result<Color, WatermarkError> {
    let hex = hex
        .strip_prefix('#')
        .ok_or_else(|| WatermarkError::ConfigError("Color must start with '#'".to_string()))?;

    if !hex.is_ascii() {
        return Err(WatermarkError::ConfigError(format!(
            "Invalid hex color '#{}'",
            hex
        )));
    }

    let digit = |s: &str| {
        u8::from_str_radix(s, 16)
            .map_err(|_| WatermarkError::ConfigError(format!("Invalid hex digit in '#{}'", hex)))
    };

    match hex.len() {
        // #RGB: each digit is doubled, 0xF -> 0xFF
        3 => Ok(Color::new(
            digit(&hex[0..1])? * 17,
            digit(&hex[1..2])? * 17,
            digit(&hex[2..3])? * 17,
        )),
        6 => Ok(Color::new(
            digit(&hex[0..2])?,
            digit(&hex[2..4])?,
            digit(&hex[4..6])?,
        )),
        _ => Err(WatermarkError::ConfigError(format!(
            "Color must be #RGB or #RRGGBB format, got {} characters",
            hex.len()
        ))),
    }
}

fn parse_functional(body: &str, original: &str) -> Result<Color, WatermarkError> {
    let parts: Vec<&str> = body.split(',').map(str::trim).collect();
    if parts.len() != 3 && parts.len() != 4 {
        return Err(WatermarkError::ConfigError(format!(
            "Expected 3 or 4 components in '{}'",
            original
        )));
    }

    let channel = |s: &str| {
        s.parse::<u8>().map_err(|_| {
            WatermarkError::ConfigError(format!("Invalid channel '{}' in '{}'", s, original))
        })
    };

    let alpha = match parts.get(3) {
        Some(a) => {
            let a: f32 = a.parse().map_err(|_| {
                WatermarkError::ConfigError(format!("Invalid alpha '{}' in '{}'", a, original))
            })?;
            if !a.is_finite() || !(0.0..=1.0).contains(&a) {
                return Err(WatermarkError::ConfigError(format!(
                    "Alpha must be between 0.0 and 1.0 in '{}'",
                    original
                )));
            }
            (a * 255.0).round() as u8
        }
        None => 255,
    };

    Ok(Color::with_alpha(
        channel(parts[0])?,
        channel(parts[1])?,
        channel(parts[2])?,
        alpha,
    ))
}
