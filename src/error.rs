// Error types module

use thiserror::Error;

use crate::config::ConfigError;
use crate::storage::StorageError;
use crate::watermark::WatermarkError;

/// Top-level error for the command-line application.
///
/// Library modules keep their own error types; this one only gathers them
/// so `main` can report any failure in one place.
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Watermark(#[from] WatermarkError),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Failed to initialize logging: {0}")]
    Logging(String),
}

impl AppError {
    /// Process exit code for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Config(_) | Self::InvalidInput(_) => 2,
            _ => 1,
        }
    }
}
