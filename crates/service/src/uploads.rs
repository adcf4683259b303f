//! Bike image storage on the local filesystem.

use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::{info, warn};
use uuid::Uuid;

/// Supported image formats
pub const SUPPORTED_FORMATS: &[&str] = &["png", "jpg", "jpeg", "webp"];

#[derive(Debug, Error)]
pub enum UploadError {
    #[error("{0}")]
    Invalid(String),
    #[error("file too large: {size} bytes (max {max})")]
    TooLarge { size: usize, max: usize },
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Debug, Clone)]
pub struct ImageStore {
    dir: PathBuf,
    max_bytes: usize,
}

impl ImageStore {
    pub fn new(dir: impl Into<PathBuf>, max_bytes: usize) -> Self {
        Self { dir: dir.into(), max_bytes }
    }

    pub fn dir(&self) -> &Path { &self.dir }

    pub fn max_bytes(&self) -> usize { self.max_bytes }

    /// Lowercased extension of `original_name` if it is a supported image type.
    pub fn extension_of(original_name: &str) -> Result<String, UploadError> {
        let ext = Path::new(original_name)
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase())
            .ok_or_else(|| UploadError::Invalid(format!("invalid file extension for: {}", original_name)))?;
        if !SUPPORTED_FORMATS.contains(&ext.as_str()) {
            return Err(UploadError::Invalid(format!(
                "unsupported file format '{}'. Supported: {}",
                ext,
                SUPPORTED_FORMATS.join(", ")
            )));
        }
        Ok(ext)
    }

    /// Validate and write the image as `<uuid>.<ext>`; returns the stored file name.
    pub async fn save(&self, original_name: &str, data: &[u8]) -> Result<String, UploadError> {
        if data.is_empty() {
            return Err(UploadError::Invalid("empty file provided".into()));
        }
        if data.len() > self.max_bytes {
            return Err(UploadError::TooLarge { size: data.len(), max: self.max_bytes });
        }
        let ext = Self::extension_of(original_name)?;
        tokio::fs::create_dir_all(&self.dir).await?;
        let file_name = format!("{}.{}", Uuid::new_v4(), ext);
        tokio::fs::write(self.dir.join(&file_name), data).await?;
        info!(file = %file_name, size = data.len(), "image_stored");
        Ok(file_name)
    }

    /// Remove a stored image. Missing files are only logged.
    pub async fn remove(&self, file_name: &str) {
        // stored names never contain separators
        if file_name.contains('/') || file_name.contains('\\') || file_name.contains("..") {
            warn!(file = %file_name, "refusing to remove suspicious image path");
            return;
        }
        if let Err(e) = tokio::fs::remove_file(self.dir.join(file_name)).await {
            warn!(file = %file_name, error = %e, "image_remove_failed");
        }
    }
}
