//! Watermark error types.
//!
//! Only failures that abort a render are represented here. A logo that
//! cannot be fetched is reported through `LogoOutcome`, never as an error.

use std::fmt;

/// Errors that can occur while compositing a watermark.
#[derive(Debug)]
pub enum WatermarkError {
    /// The drawing surface could not be created (zero-sized canvas, no usable font)
    SurfaceError(String),

    /// Failed to decode the source image or a logo
    DecodeError(String),

    /// Failed to encode the composited image
    EncodeError(String),

    /// Failed to fetch a logo from its source
    FetchError(String),

    /// Invalid configuration or style value
    ConfigError(String),

    /// Text or shape rendering failed
    RenderError(String),
}

impl fmt::Display for WatermarkError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SurfaceError(msg) => write!(f, "Failed to create drawing surface: {}", msg),
            Self::DecodeError(msg) => write!(f, "Failed to decode image: {}", msg),
            Self::EncodeError(msg) => write!(f, "Failed to encode image: {}", msg),
            Self::FetchError(msg) => write!(f, "Failed to fetch logo: {}", msg),
            Self::ConfigError(msg) => write!(f, "Watermark configuration error: {}", msg),
            Self::RenderError(msg) => write!(f, "Failed to render watermark: {}", msg),
        }
    }
}

impl std::error::Error for WatermarkError {}

impl From<image::ImageError> for WatermarkError {
    fn from(err: image::ImageError) -> Self {
        match err {
            image::ImageError::Encoding(e) => Self::EncodeError(e.to_string()),
            other => Self::DecodeError(other.to_string()),
        }
    }
}
