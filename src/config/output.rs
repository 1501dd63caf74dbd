//! Output encoding configuration.

use serde::{Deserialize, Serialize};

use crate::constants::{DEFAULT_COMPRESS_QUALITY, DEFAULT_JPEG_QUALITY};
use crate::watermark::OutputFormat;

fn default_jpeg_quality() -> u8 {
    DEFAULT_JPEG_QUALITY
}

fn default_compress_quality() -> u8 {
    DEFAULT_COMPRESS_QUALITY
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct OutputConfig {
    /// Encoding of rendered photos (default: png)
    #[serde(default)]
    pub format: OutputFormat,
    /// Quality when `format` is jpeg, 1-100 (default: 90)
    #[serde(default = "default_jpeg_quality")]
    pub jpeg_quality: u8,
    /// Quality of the lossy step run before a photo is stored (default: 70)
    #[serde(default = "default_compress_quality")]
    pub compress_quality: u8,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            format: OutputFormat::default(),
            jpeg_quality: default_jpeg_quality(),
            compress_quality: default_compress_quality(),
        }
    }
}
