//! Persisted photos.
//!
//! A [`PhotoStore`] keeps rendered photos together with their metadata
//! record. Stores are opened and closed explicitly by whoever owns them;
//! nothing in the crate keeps a process-wide client.

use async_trait::async_trait;
use bytes::Bytes;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub mod fs;

pub use fs::FsPhotoStore;

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Invalid name '{0}'")]
    InvalidName(String),

    #[error("Photo store is closed")]
    Closed,
}

/// Metadata record stored alongside each photo.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PhotoMetadata {
    pub user_id: String,
    pub image_name: String,
    pub file_url: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A photo handed to a store.
#[derive(Debug, Clone)]
pub struct PhotoUpload {
    pub user_id: String,
    /// Name under which the photo is stored. Generated when absent.
    pub image_name: Option<String>,
    pub data: Bytes,
}

impl PhotoUpload {
    pub fn new(user_id: impl Into<String>, data: impl Into<Bytes>) -> Self {
        Self {
            user_id: user_id.into(),
            image_name: None,
            data: data.into(),
        }
    }

    pub fn with_image_name(mut self, name: impl Into<String>) -> Self {
        self.image_name = Some(name.into());
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredPhoto {
    pub metadata: PhotoMetadata,
    pub size_bytes: u64,
}

#[async_trait]
pub trait PhotoStore: Send + Sync {
    /// Persist a photo and its metadata record.
    async fn save(&self, photo: PhotoUpload) -> Result<StoredPhoto, StorageError>;

    /// Metadata of every photo saved for `user_id`, newest first.
    async fn list(&self, user_id: &str) -> Result<Vec<PhotoMetadata>, StorageError>;
}

/// `photo_<unix-millis>.png`
pub fn default_image_name(now: DateTime<Utc>) -> String {
    format!("photo_{}.png", now.timestamp_millis())
}

/// Reject names that would escape their directory.
pub(crate) fn validate_name(name: &str) -> Result<&str, StorageError> {
    let trimmed = name.trim();
    if trimmed.is_empty()
        || trimmed == "."
        || trimmed == ".."
        || trimmed.contains(['/', '\\', '\0'])
    {
        return Err(StorageError::InvalidName(name.to_string()));
    }
    Ok(trimmed)
}
