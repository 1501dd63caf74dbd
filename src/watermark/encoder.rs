//! Output encoding.
//!
//! Renders are encoded losslessly as PNG by default. JPEG output takes a
//! quality. [`compress_jpeg`] is the separate lossy step the save workflow
//! runs on an already-encoded image before upload.

use super::WatermarkError;
use image::codecs::jpeg::JpegEncoder;
use image::codecs::png::PngEncoder;
use image::{DynamicImage, ExtendedColorType, ImageEncoder, RgbaImage};
use serde::{Deserialize, Serialize};
use std::io::Cursor;
use std::path::Path;

pub use crate::constants::DEFAULT_COMPRESS_QUALITY;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Png,
    #[serde(alias = "jpg")]
    Jpeg,
}

impl OutputFormat {
    pub fn content_type(&self) -> &'static str {
        match self {
            Self::Png => "image/png",
            Self::Jpeg => "image/jpeg",
        }
    }

    pub fn extension(&self) -> &'static str {
        match self {
            Self::Png => "png",
            Self::Jpeg => "jpg",
        }
    }

    /// Guess the format from a file extension.
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_ascii_lowercase();
        match ext.as_str() {
            "png" => Some(Self::Png),
            "jpg" | "jpeg" => Some(Self::Jpeg),
            _ => None,
        }
    }
}

impl std::str::FromStr for OutputFormat {
    type Err = WatermarkError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "png" => Ok(Self::Png),
            "jpg" | "jpeg" => Ok(Self::Jpeg),
            other => Err(WatermarkError::ConfigError(format!(
                "Unsupported output format '{other}', expected png or jpeg"
            ))),
        }
    }
}

/// Result of encoding an image.
#[derive(Debug, Clone)]
pub struct EncodedImage {
    pub data: Vec<u8>,
    pub format: OutputFormat,
    pub width: u32,
    pub height: u32,
}

impl EncodedImage {
    pub fn content_type(&self) -> &'static str {
        self.format.content_type()
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

/// Encode `image` as `format`. `quality` (1-100) applies to JPEG only.
pub fn encode(
    image: &RgbaImage,
    format: OutputFormat,
    quality: u8,
) -> Result<EncodedImage, WatermarkError> {
    let (width, height) = image.dimensions();
    let mut output = Cursor::new(Vec::new());

    match format {
        OutputFormat::Png => {
            PngEncoder::new(&mut output)
                .write_image(image.as_raw(), width, height, ExtendedColorType::Rgba8)
                .map_err(|e| WatermarkError::EncodeError(format!("png: {e}")))?;
        }
        OutputFormat::Jpeg => {
            // JPEG has no alpha channel
            let rgb = DynamicImage::ImageRgba8(image.clone()).to_rgb8();
            JpegEncoder::new_with_quality(&mut output, quality.clamp(1, 100))
                .write_image(rgb.as_raw(), width, height, ExtendedColorType::Rgb8)
                .map_err(|e| WatermarkError::EncodeError(format!("jpeg: {e}")))?;
        }
    }

    Ok(EncodedImage {
        data: output.into_inner(),
        format,
        width,
        height,
    })
}

/// Re-encode an encoded image as JPEG at `quality`.
pub fn compress_jpeg(data: &[u8], quality: u8) -> Result<EncodedImage, WatermarkError> {
    let image = image::load_from_memory(data)?;
    encode(&image.to_rgba8(), OutputFormat::Jpeg, quality)
}
