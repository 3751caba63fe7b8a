//! Profile picture object storage.
//!
//! DESIGN
//! ======
//! One object per user, replaced wholesale on every upload. The filesystem
//! store writes to a temp file and renames it into place so readers served
//! by `ServeDir` never see a half-written image.

use std::path::PathBuf;

use async_trait::async_trait;
use sha2::{Digest, Sha256};
use uuid::Uuid;

#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("unsupported image type")]
    UnsupportedType,
    #[error("picture too large: {size} bytes (max {max})")]
    TooLarge { size: usize, max: usize },
    #[error("empty upload")]
    Empty,
    #[error("storage io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Recognized upload formats, sniffed from magic bytes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ImageKind {
    Png,
    Jpeg,
    Gif,
    Webp,
}

impl ImageKind {
    pub const ALL: [Self; 4] = [Self::Png, Self::Jpeg, Self::Gif, Self::Webp];

    #[must_use]
    pub fn sniff(bytes: &[u8]) -> Option<Self> {
        if bytes.starts_with(&[0x89, b'P', b'N', b'G', 0x0d, 0x0a, 0x1a, 0x0a]) {
            Some(Self::Png)
        } else if bytes.starts_with(&[0xff, 0xd8, 0xff]) {
            Some(Self::Jpeg)
        } else if bytes.starts_with(b"GIF87a") || bytes.starts_with(b"GIF89a") {
            Some(Self::Gif)
        } else if bytes.len() >= 12 && &bytes[..4] == b"RIFF" && &bytes[8..12] == b"WEBP" {
            Some(Self::Webp)
        } else {
            None
        }
    }

    #[must_use]
    pub fn extension(self) -> &'static str {
        match self {
            Self::Png => "png",
            Self::Jpeg => "jpg",
            Self::Gif => "gif",
            Self::Webp => "webp",
        }
    }
}

/// Object key for a user's picture of the given kind.
#[must_use]
pub fn picture_key(user_id: Uuid, kind: ImageKind) -> String {
    format!("{user_id}.{}", kind.extension())
}

/// Short content hash appended to picture URLs so clients refetch after a
/// replacement.
#[must_use]
pub fn content_tag(bytes: &[u8]) -> String {
    let digest = Sha256::digest(bytes);
    crate::services::session::bytes_to_hex(&digest[..6])
}

/// Validate an upload and return its sniffed kind.
///
/// # Errors
///
/// Returns [`StorageError::Empty`], [`StorageError::TooLarge`], or
/// [`StorageError::UnsupportedType`].
pub fn validate_picture(bytes: &[u8], max_bytes: usize) -> Result<ImageKind, StorageError> {
    if bytes.is_empty() {
        return Err(StorageError::Empty);
    }
    if bytes.len() > max_bytes {
        return Err(StorageError::TooLarge { size: bytes.len(), max: max_bytes });
    }
    ImageKind::sniff(bytes).ok_or(StorageError::UnsupportedType)
}

#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Write `bytes` under `key`, replacing any existing object.
    async fn put(&self, key: &str, bytes: &[u8]) -> Result<(), StorageError>;
    /// Remove `key`. Missing objects are not an error.
    async fn delete(&self, key: &str) -> Result<(), StorageError>;
}

/// Filesystem-backed store rooted at the configured upload directory.
pub struct FsObjectStore {
    root: PathBuf,
}

impl FsObjectStore {
    /// Create the store, making sure the root directory exists.
    ///
    /// # Errors
    ///
    /// Returns an IO error if the directory cannot be created.
    pub async fn open(root: PathBuf) -> Result<Self, StorageError> {
        tokio::fs::create_dir_all(&root).await?;
        Ok(Self { root })
    }
}

#[async_trait]
impl ObjectStore for FsObjectStore {
    async fn put(&self, key: &str, bytes: &[u8]) -> Result<(), StorageError> {
        let final_path = self.root.join(key);
        let tmp_path = self.root.join(format!(".{key}.{}.tmp", Uuid::new_v4()));
        tokio::fs::write(&tmp_path, bytes).await?;
        if let Err(e) = tokio::fs::rename(&tmp_path, &final_path).await {
            if let Err(cleanup) = tokio::fs::remove_file(&tmp_path).await {
                tracing::warn!(error = %cleanup, path = %tmp_path.display(), "storage: temp cleanup failed");
            }
            return Err(e.into());
        }
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<(), StorageError> {
        match tokio::fs::remove_file(self.root.join(key)).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

/// In-memory store used by tests.
#[cfg(test)]
#[derive(Default)]
pub struct MemoryObjectStore {
    pub objects: tokio::sync::Mutex<std::collections::HashMap<String, Vec<u8>>>,
}

#[cfg(test)]
#[async_trait]
impl ObjectStore for MemoryObjectStore {
    async fn put(&self, key: &str, bytes: &[u8]) -> Result<(), StorageError> {
        self.objects.lock().await.insert(key.to_owned(), bytes.to_vec());
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<(), StorageError> {
        self.objects.lock().await.remove(key);
        Ok(())
    }
}

#[cfg(test)]
#[path = "storage_test.rs"]
mod tests;
