//! Watermark styles and the named preset catalog.
//!
//! A [`WatermarkStyle`] decides which content blocks render, where they are
//! anchored and how they are colored. Styles are immutable for the duration
//! of a render. The catalog ships twelve presets; configuration may add more
//! or replace existing ones by name.
//!
//! ```yaml
//! styles:
//!   night-shift:
//!     layout: top-right
//!     theme: neon
//!     show_address: false
//!     font_size: large
//!     primary_color: "#00ffff"
//!     secondary_color: "#ff00ff"
//! ```

use super::color::Color;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// Name of the preset used when a lookup does not match anything.
pub const DEFAULT_PRESET: &str = "classic";

/// Anchor region where the content stack originates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", from = "String")]
pub enum Layout {
    #[default]
    BottomLeft,
    BottomRight,
    BottomCenter,
    TopLeft,
    TopRight,
    Center,
}

impl Layout {
    pub const ALL: [Layout; 6] = [
        Self::BottomLeft,
        Self::BottomRight,
        Self::BottomCenter,
        Self::TopLeft,
        Self::TopRight,
        Self::Center,
    ];

    /// Parse an anchor name. Anything unrecognised is `bottom-left`.
    pub fn parse(name: &str) -> Self {
        match name.trim().to_ascii_lowercase().as_str() {
            "bottom-right" => Self::BottomRight,
            "bottom-center" => Self::BottomCenter,
            "top-left" => Self::TopLeft,
            "top-right" => Self::TopRight,
            "center" => Self::Center,
            _ => Self::BottomLeft,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::BottomLeft => "bottom-left",
            Self::BottomRight => "bottom-right",
            Self::BottomCenter => "bottom-center",
            Self::TopLeft => "top-left",
            Self::TopRight => "top-right",
            Self::Center => "center",
        }
    }

    pub fn is_top(&self) -> bool {
        matches!(self, Self::TopLeft | Self::TopRight)
    }
}

impl From<String> for Layout {
    fn from(value: String) -> Self {
        Self::parse(&value)
    }
}

impl fmt::Display for Layout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Cosmetic theme tag. Only `neon` changes rendering (glow on the time block).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", from = "String")]
pub enum Theme {
    #[default]
    Classic,
    Modern,
    Minimal,
    Elegant,
    Bold,
    Neon,
    Vintage,
    Professional,
}

impl Theme {
    pub fn parse(name: &str) -> Self {
        match name.trim().to_ascii_lowercase().as_str() {
            "modern" => Self::Modern,
            "minimal" => Self::Minimal,
            "elegant" => Self::Elegant,
            "bold" => Self::Bold,
            "neon" => Self::Neon,
            "vintage" => Self::Vintage,
            "professional" => Self::Professional,
            _ => Self::Classic,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Classic => "classic",
            Self::Modern => "modern",
            Self::Minimal => "minimal",
            Self::Elegant => "elegant",
            Self::Bold => "bold",
            Self::Neon => "neon",
            Self::Vintage => "vintage",
            Self::Professional => "professional",
        }
    }

    pub fn has_glow(&self) -> bool {
        matches!(self, Self::Neon)
    }
}

impl From<String> for Theme {
    fn from(value: String) -> Self {
        Self::parse(&value)
    }
}

/// Font-size class, mapped to a multiplier on the base font size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FontSize {
    Small,
    #[default]
    Medium,
    Large,
}

impl FontSize {
    pub fn multiplier(&self) -> f32 {
        match self {
            Self::Small => 0.8,
            Self::Medium => 1.0,
            Self::Large => 1.3,
        }
    }
}

/// A complete watermark template.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WatermarkStyle {
    pub layout: Layout,
    pub theme: Theme,
    pub show_time: bool,
    pub show_date: bool,
    pub show_address: bool,
    pub show_username: bool,
    pub show_logo: bool,
    pub show_coordinates: bool,
    pub font_size: FontSize,
    pub font_family: String,
    pub primary_color: Color,
    pub secondary_color: Color,
    pub accent_color: Color,
    pub shadow_enabled: bool,
    pub border_enabled: bool,
    pub background_blur: bool,
}

impl Default for WatermarkStyle {
    fn default() -> Self {
        classic()
    }
}

impl WatermarkStyle {
    /// Style with every content block switched off.
    pub fn hidden(self) -> Self {
        Self {
            show_time: false,
            show_date: false,
            show_address: false,
            show_username: false,
            show_logo: false,
            show_coordinates: false,
            ..self
        }
    }
}

struct Flags {
    time: bool,
    date: bool,
    address: bool,
    username: bool,
    logo: bool,
    coordinates: bool,
}

const ALL_ON: Flags = Flags {
    time: true,
    date: true,
    address: true,
    username: true,
    logo: true,
    coordinates: true,
};

const NO_COORDS: Flags = Flags {
    coordinates: false,
    ..ALL_ON
};

fn preset(
    layout: Layout,
    theme: Theme,
    flags: Flags,
    font_size: FontSize,
    font_family: &str,
    colors: [Color; 3],
) -> WatermarkStyle {
    WatermarkStyle {
        layout,
        theme,
        show_time: flags.time,
        show_date: flags.date,
        show_address: flags.address,
        show_username: flags.username,
        show_logo: flags.logo,
        show_coordinates: flags.coordinates,
        font_size,
        font_family: font_family.to_string(),
        primary_color: colors[0],
        secondary_color: colors[1],
        accent_color: colors[2],
        shadow_enabled: true,
        border_enabled: false,
        background_blur: false,
    }
}

const fn hex(rgb: u32) -> Color {
    Color::new((rgb >> 16) as u8, (rgb >> 8) as u8, rgb as u8)
}

fn classic() -> WatermarkStyle {
    preset(
        Layout::BottomLeft,
        Theme::Classic,
        NO_COORDS,
        FontSize::Medium,
        "Arial",
        [hex(0xFFFFFF), hex(0xF59E0B), hex(0xF59E0B)],
    )
}

/// The built-in presets in catalog order.
pub fn builtin_presets() -> Vec<(&'static str, WatermarkStyle)> {
    vec![
        ("classic", classic()),
        (
            "modern",
            preset(
                Layout::BottomRight,
                Theme::Modern,
                NO_COORDS,
                FontSize::Medium,
                "Segoe UI",
                [hex(0xFFFFFF), hex(0x38EF7D), hex(0x11998E)],
            ),
        ),
        (
            "minimal",
            preset(
                Layout::BottomLeft,
                Theme::Minimal,
                Flags {
                    address: false,
                    username: false,
                    logo: false,
                    coordinates: false,
                    ..ALL_ON
                },
                FontSize::Large,
                "Helvetica",
                [hex(0xFFFFFF), hex(0x3498DB), hex(0x2C3E50)],
            ),
        ),
        (
            "elegant",
            preset(
                Layout::BottomCenter,
                Theme::Elegant,
                NO_COORDS,
                FontSize::Medium,
                "Georgia",
                [hex(0xFFFFFF), hex(0xD4AF37), hex(0xC9B037)],
            ),
        ),
        (
            "bold",
            preset(
                Layout::BottomLeft,
                Theme::Bold,
                ALL_ON,
                FontSize::Large,
                "Impact",
                [hex(0xFFFFFF), hex(0xE74C3C), hex(0xC0392B)],
            ),
        ),
        (
            "neon",
            preset(
                Layout::BottomRight,
                Theme::Neon,
                Flags {
                    address: false,
                    coordinates: false,
                    ..ALL_ON
                },
                FontSize::Medium,
                "Courier New",
                [hex(0x00FFFF), hex(0xFF00FF), hex(0xFFFF00)],
            ),
        ),
        (
            "vintage",
            preset(
                Layout::BottomLeft,
                Theme::Vintage,
                Flags {
                    logo: false,
                    coordinates: false,
                    ..ALL_ON
                },
                FontSize::Medium,
                "Times New Roman",
                [hex(0xF5DEB3), hex(0xD2691E), hex(0x8B4513)],
            ),
        ),
        (
            "professional",
            preset(
                Layout::BottomLeft,
                Theme::Professional,
                ALL_ON,
                FontSize::Small,
                "Roboto",
                [hex(0xFFFFFF), hex(0x4A90D9), hex(0x2C5F8D)],
            ),
        ),
        (
            "dark",
            preset(
                Layout::BottomRight,
                Theme::Modern,
                Flags {
                    username: false,
                    coordinates: false,
                    ..ALL_ON
                },
                FontSize::Medium,
                "SF Pro",
                [hex(0xE0E0E0), hex(0x888888), hex(0x555555)],
            ),
        ),
        (
            "sunrise",
            preset(
                Layout::BottomLeft,
                Theme::Modern,
                NO_COORDS,
                FontSize::Medium,
                "Poppins",
                [hex(0xFFFFFF), hex(0xFF6B6B), hex(0xFECA57)],
            ),
        ),
        (
            "ocean",
            preset(
                Layout::BottomCenter,
                Theme::Elegant,
                ALL_ON,
                FontSize::Medium,
                "Lato",
                [hex(0xFFFFFF), hex(0x00B4D8), hex(0x0077B6)],
            ),
        ),
        (
            "forest",
            preset(
                Layout::TopLeft,
                Theme::Modern,
                Flags {
                    address: false,
                    coordinates: false,
                    ..ALL_ON
                },
                FontSize::Medium,
                "Open Sans",
                [hex(0xFFFFFF), hex(0x71B280), hex(0x134E5E)],
            ),
        ),
    ]
}

/// Named styles, looked up case-insensitively.
///
/// Lookup never fails: an unknown name resolves to the `classic` preset.
#[derive(Debug, Clone)]
pub struct StyleCatalog {
    order: Vec<String>,
    styles: HashMap<String, WatermarkStyle>,
}

impl Default for StyleCatalog {
    fn default() -> Self {
        Self::builtin()
    }
}

impl StyleCatalog {
    pub fn builtin() -> Self {
        let mut catalog = Self {
            order: Vec::new(),
            styles: HashMap::new(),
        };
        for (name, style) in builtin_presets() {
            catalog.insert(name, style);
        }
        catalog
    }

    /// Add a style, replacing any existing style with the same name.
    pub fn insert(&mut self, name: &str, style: WatermarkStyle) {
        let key = name.trim().to_ascii_lowercase();
        if !self.styles.contains_key(&key) {
            self.order.push(key.clone());
        }
        self.styles.insert(key, style);
    }

    /// Extend the catalog with user-defined styles.
    pub fn with_overrides<'a, I>(mut self, overrides: I) -> Self
    where
        I: IntoIterator<Item = (&'a String, &'a WatermarkStyle)>,
    {
        for (name, style) in overrides {
            self.insert(name, style.clone());
        }
        self
    }

    pub fn contains(&self, name: &str) -> bool {
        self.styles.contains_key(&name.trim().to_ascii_lowercase())
    }

    pub fn get(&self, name: &str) -> WatermarkStyle {
        let key = name.trim().to_ascii_lowercase();
        match self.styles.get(&key) {
            Some(style) => style.clone(),
            None => {
                tracing::debug!(style = %name, "Unknown style, using {}", DEFAULT_PRESET);
                self.styles
                    .get(DEFAULT_PRESET)
                    .cloned()
                    .unwrap_or_else(classic)
            }
        }
    }

    /// Style names in catalog order (built-ins first, then additions).
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.order.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}
