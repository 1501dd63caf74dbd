//! Font loading and family resolution.
//!
//! Fonts are loaded from disk at startup. Styles name a font family
//! ("Arial", "Georgia", ...); families that were not configured resolve to
//! the default face so a render never fails because a family is missing.

use super::WatermarkError;
use ab_glyph::{Font, FontArc, GlyphId, PxScale, ScaleFont};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Well-known locations of a regular/bold sans-serif pair.
const SYSTEM_FONT_CANDIDATES: &[(&str, &str)] = &[
    (
        "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
        "/usr/share/fonts/truetype/dejavu/DejaVuSans-Bold.ttf",
    ),
    (
        "/usr/share/fonts/TTF/DejaVuSans.ttf",
        "/usr/share/fonts/TTF/DejaVuSans-Bold.ttf",
    ),
    (
        "/usr/share/fonts/dejavu/DejaVuSans.ttf",
        "/usr/share/fonts/dejavu/DejaVuSans-Bold.ttf",
    ),
    (
        "/usr/share/fonts/truetype/liberation/LiberationSans-Regular.ttf",
        "/usr/share/fonts/truetype/liberation/LiberationSans-Bold.ttf",
    ),
    (
        "/usr/share/fonts/liberation-sans/LiberationSans-Regular.ttf",
        "/usr/share/fonts/liberation-sans/LiberationSans-Bold.ttf",
    ),
    (
        "/usr/share/fonts/truetype/freefont/FreeSans.ttf",
        "/usr/share/fonts/truetype/freefont/FreeSansBold.ttf",
    ),
    (
        "/System/Library/Fonts/Supplemental/Arial.ttf",
        "/System/Library/Fonts/Supplemental/Arial Bold.ttf",
    ),
    ("/Library/Fonts/Arial.ttf", "/Library/Fonts/Arial Bold.ttf"),
    ("C:\\Windows\\Fonts\\arial.ttf", "C:\\Windows\\Fonts\\arialbd.ttf"),
];

/// Paths for one font family.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FamilyPaths {
    pub regular: PathBuf,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bold: Option<PathBuf>,
}

/// Font settings, usually read from the `fonts` config section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FontSettings {
    /// Default regular face. When unset, system locations are searched.
    pub regular: Option<PathBuf>,
    pub bold: Option<PathBuf>,
    /// Extra families keyed by the name styles use.
    pub families: HashMap<String, FamilyPaths>,
    /// Search well-known system locations when no default is configured.
    pub discover: bool,
}

impl Default for FontSettings {
    fn default() -> Self {
        Self {
            regular: None,
            bold: None,
            families: HashMap::new(),
            discover: true,
        }
    }
}

#[derive(Clone)]
struct Face {
    regular: FontArc,
    bold: Option<FontArc>,
}

/// A resolved font plus whether bold has to be emulated.
#[derive(Clone, Copy)]
pub struct FontChoice<'a> {
    pub font: &'a FontArc,
    pub synthetic_bold: bool,
}

/// Loaded fonts shared by every render.
#[derive(Clone)]
pub struct FontBook {
    default: Face,
    families: HashMap<String, Face>,
}

impl std::fmt::Debug for FontBook {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FontBook")
            .field("default_bold", &self.default.bold.is_some())
            .field("families", &self.families.keys().collect::<Vec<_>>())
            .finish()
    }
}

impl FontBook {
    pub fn new(regular: FontArc, bold: Option<FontArc>) -> Self {
        Self {
            default: Face { regular, bold },
            families: HashMap::new(),
        }
    }

    /// Load fonts described by `settings`.
    ///
    /// Fails with [`WatermarkError::SurfaceError`] when no default face can
    /// be found, since nothing can be drawn without one.
    pub fn load(settings: &FontSettings) -> Result<Self, WatermarkError> {
        let (regular_path, bold_path) = match &settings.regular {
            Some(path) => (path.clone(), settings.bold.clone()),
            None if settings.discover => discover_system_fonts().ok_or_else(|| {
                WatermarkError::SurfaceError(
                    "no font configured and none found in system font directories".to_string(),
                )
            })?,
            None => {
                return Err(WatermarkError::SurfaceError(
                    "no font configured and discovery is disabled".to_string(),
                ))
            }
        };

        let regular = load_font_file(&regular_path)?;
        let bold = match bold_path {
            Some(path) => match load_font_file(&path) {
                Ok(font) => Some(font),
                Err(e) => {
                    tracing::warn!(path = %path.display(), error = %e, "Bold font unavailable, bold will be emulated");
                    None
                }
            },
            None => None,
        };

        let mut book = Self::new(regular, bold);
        for (name, paths) in &settings.families {
            let regular = load_font_file(&paths.regular)?;
            let bold = paths.bold.as_deref().map(load_font_file).transpose()?;
            book.add_family(name, regular, bold);
        }

        tracing::debug!(
            regular = %regular_path.display(),
            families = settings.families.len(),
            "Fonts loaded"
        );
        Ok(book)
    }

    pub fn add_family(&mut self, name: &str, regular: FontArc, bold: Option<FontArc>) {
        self.families
            .insert(name.trim().to_ascii_lowercase(), Face { regular, bold });
    }

    pub fn has_family(&self, name: &str) -> bool {
        self.families.contains_key(&name.trim().to_ascii_lowercase())
    }

    /// Pick the face for `family`, falling back to the default face.
    pub fn resolve(&self, family: &str, bold: bool) -> FontChoice<'_> {
        let face = self
            .families
            .get(&family.trim().to_ascii_lowercase())
            .unwrap_or(&self.default);

        match (bold, &face.bold) {
            (true, Some(font)) => FontChoice {
                font,
                synthetic_bold: false,
            },
            (true, None) => FontChoice {
                font: &face.regular,
                synthetic_bold: true,
            },
            (false, _) => FontChoice {
                font: &face.regular,
                synthetic_bold: false,
            },
        }
    }
}

/// Read and parse a TrueType/OpenType font file.
pub fn load_font_file(path: &Path) -> Result<FontArc, WatermarkError> {
    let data = std::fs::read(path).map_err(|e| {
        WatermarkError::SurfaceError(format!("cannot read font {}: {}", path.display(), e))
    })?;
    FontArc::try_from_vec(data).map_err(|_| {
        WatermarkError::SurfaceError(format!("cannot parse font {}", path.display()))
    })
}

/// First regular/bold pair present in a well-known system location.
pub fn discover_system_fonts() -> Option<(PathBuf, Option<PathBuf>)> {
    SYSTEM_FONT_CANDIDATES
        .iter()
        .find(|(regular, _)| Path::new(regular).is_file())
        .map(|(regular, bold)| {
            let bold = Path::new(bold);
            (
                PathBuf::from(regular),
                bold.is_file().then(|| bold.to_path_buf()),
            )
        })
}

/// Advance width of `text` in pixels, including kerning.
pub fn text_width(font: &FontArc, size: f32, text: &str) -> f32 {
    let scaled = font.as_scaled(PxScale::from(size));
    let mut width = 0.0f32;
    let mut prev: Option<GlyphId> = None;

    for c in text.chars() {
        let id = scaled.glyph_id(c);
        if let Some(prev) = prev {
            width += scaled.kern(prev, id);
        }
        width += scaled.h_advance(id);
        prev = Some(id);
    }

    width
}
