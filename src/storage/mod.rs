// Submodule for local file system storage
mod local;

use std::path::PathBuf;

use async_trait::async_trait;
use bytes::Bytes;
use thiserror::Error;
use tracing::info;

use crate::config::Config;

pub use local::LocalStorage;

// Storage error types
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("File not found: {0}")]
    NotFound(String), // Returned when a file cannot be found

    #[error("Invalid file name: {0}")]
    InvalidName(String), // Name is not a single plain path component

    #[error("Io Error: {0}")]
    IoError(#[from] std::io::Error), // Wraps standard I/O errors
}

// Async Storage trait
#[async_trait]
pub trait Storage: Send + Sync {
    /// Write `content` under `name`, replacing any existing file.
    /// Returns the full path of the stored file.
    async fn save(&self, name: &str, content: Bytes) -> Result<PathBuf, StorageError>;

    /// Read a stored file.
    async fn read(&self, name: &str) -> Result<Bytes, StorageError>;

    /// Remove a stored file. Returns `false` when there was nothing to remove.
    async fn delete(&self, name: &str) -> Result<bool, StorageError>;

    /// Whether a file is stored under `name`.
    async fn exists(&self, name: &str) -> bool;
}

/// Create the originals and thumbnails directories named in the config.
pub async fn init_storage(config: &Config) -> Result<(LocalStorage, LocalStorage), StorageError> {
    info!(
        "Initializing local storage (uploads: {}, thumbnails: {})",
        config.upload_folder, config.thumbnail_folder
    );
    let originals = LocalStorage::new(&config.upload_folder).await?;
    let thumbnails = LocalStorage::new(&config.thumbnail_folder).await?;
    Ok((originals, thumbnails))
}
