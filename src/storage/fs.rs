//! Filesystem-backed photo store.
//!
//! Layout under the store root:
//!
//! ```text
//! <root>/<user_id>/<image_name>   photo bytes
//! <root>/photos.jsonl             one PhotoMetadata record per line
//! ```

use super::{
    default_image_name, validate_name, PhotoMetadata, PhotoStore, PhotoUpload, StorageError,
    StoredPhoto,
};
use crate::constants::PHOTO_INDEX_FILE;
use async_trait::async_trait;
use chrono::Utc;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::io::AsyncWriteExt;
use tokio::sync::Mutex;

pub struct FsPhotoStore {
    root: PathBuf,
    index_path: PathBuf,
    closed: AtomicBool,
    // Serializes appends to the index file
    index_lock: Mutex<()>,
}

impl std::fmt::Debug for FsPhotoStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FsPhotoStore")
            .field("root", &self.root)
            .field("closed", &self.is_closed())
            .finish()
    }
}

impl FsPhotoStore {
    /// Open a store rooted at `dir`, creating the directory if needed.
    pub async fn open(dir: impl AsRef<Path>) -> Result<Self, StorageError> {
        tokio::fs::create_dir_all(dir.as_ref()).await?;
        let root = tokio::fs::canonicalize(dir.as_ref()).await?;
        let index_path = root.join(PHOTO_INDEX_FILE);

        tracing::debug!(root = %root.display(), "Photo store opened");

        Ok(Self {
            root,
            index_path,
            closed: AtomicBool::new(false),
            index_lock: Mutex::new(()),
        })
    }

    /// Close the store. Later calls fail with [`StorageError::Closed`].
    pub async fn close(&self) {
        // Wait for an in-flight index append to finish
        let _guard = self.index_lock.lock().await;
        if !self.closed.swap(true, Ordering::SeqCst) {
            tracing::debug!(root = %self.root.display(), "Photo store closed");
        }
    }

    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn ensure_open(&self) -> Result<(), StorageError> {
        if self.is_closed() {
            return Err(StorageError::Closed);
        }
        Ok(())
    }

    async fn write_file_atomic(path: &Path, data: &[u8]) -> Result<(), StorageError> {
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }

        let mut temp_name = path.as_os_str().to_owned();
        temp_name.push(".tmp");
        let temp_path = PathBuf::from(temp_name);

        tokio::fs::write(&temp_path, data).await?;
        tokio::fs::rename(&temp_path, path).await?;
        Ok(())
    }

    async fn append_record(&self, metadata: &PhotoMetadata) -> Result<(), StorageError> {
        let mut line = serde_json::to_string(metadata)?;
        line.push('\n');

        let _guard = self.index_lock.lock().await;
        // close() may have won the race for the lock
        self.ensure_open()?;

        let mut file = tokio::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.index_path)
            .await?;
        file.write_all(line.as_bytes()).await?;
        file.flush().await?;
        Ok(())
    }
}

#[async_trait]
impl PhotoStore for FsPhotoStore {
    async fn save(&self, photo: PhotoUpload) -> Result<StoredPhoto, StorageError> {
        self.ensure_open()?;

        let now = Utc::now();
        let user_id = validate_name(&photo.user_id)?.to_string();
        let image_name = match photo.image_name.as_deref() {
            Some(name) => validate_name(name)?.to_string(),
            None => default_image_name(now),
        };

        let path = self.root.join(&user_id).join(&image_name);
        Self::write_file_atomic(&path, &photo.data).await?;

        let metadata = PhotoMetadata {
            user_id,
            image_name,
            file_url: format!("file://{}", path.display()),
            created_at: now,
            updated_at: now,
        };
        self.append_record(&metadata).await?;

        tracing::info!(
            user_id = %metadata.user_id,
            image_name = %metadata.image_name,
            size_bytes = photo.data.len(),
            "Photo stored"
        );

        Ok(StoredPhoto {
            metadata,
            size_bytes: photo.data.len() as u64,
        })
    }

    async fn list(&self, user_id: &str) -> Result<Vec<PhotoMetadata>, StorageError> {
        self.ensure_open()?;

        let contents = match tokio::fs::read_to_string(&self.index_path).await {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };

        let mut photos = Vec::new();
        for (line_no, line) in contents.lines().enumerate() {
            if line.trim().is_empty() {
                continue;
            }
            match serde_json::from_str::<PhotoMetadata>(line) {
                Ok(record) if record.user_id == user_id => photos.push(record),
                Ok(_) => {}
                Err(e) => {
                    tracing::warn!(line = line_no + 1, error = %e, "Skipping corrupt photo record");
                }
            }
        }

        photos.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(photos)
    }
}
