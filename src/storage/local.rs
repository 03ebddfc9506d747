use std::path::{Component, Path, PathBuf};

use async_trait::async_trait;
use bytes::Bytes;
use tokio::{fs, io::AsyncWriteExt};

use super::{Storage, StorageError};

// Local filesystem storage
#[derive(Debug, Clone)]
pub struct LocalStorage {
    base_path: PathBuf, // Directory every stored file lives in
}

impl LocalStorage {
    /// Creates a new LocalStorage instance and ensures its directory exists
    pub async fn new(base_path: impl AsRef<Path>) -> Result<Self, StorageError> {
        let base_path = base_path.as_ref().to_path_buf();
        fs::create_dir_all(&base_path).await?;
        Ok(Self { base_path })
    }

    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    /// Resolves `name` inside the base directory.
    ///
    /// Only a single normal path component is accepted, so names taken from
    /// request paths can never escape the directory.
    pub fn full_path(&self, name: &str) -> Result<PathBuf, StorageError> {
        let mut components = Path::new(name).components();
        match (components.next(), components.next()) {
            (Some(Component::Normal(_)), None) => Ok(self.base_path.join(name)),
            _ => Err(StorageError::InvalidName(name.to_string())),
        }
    }
}

#[async_trait]
impl Storage for LocalStorage {
    async fn save(&self, name: &str, content: Bytes) -> Result<PathBuf, StorageError> {
        let full_path = self.full_path(name)?;

        let mut file = fs::File::create(&full_path).await?;
        file.write_all(&content).await?;
        file.flush().await?;

        tracing::info!("Saved file at {:?} ({} bytes)", full_path, content.len());

        Ok(full_path)
    }

    async fn read(&self, name: &str) -> Result<Bytes, StorageError> {
        let full_path = self
            .full_path(name)
            .map_err(|_| StorageError::NotFound(name.to_string()))?;

        match fs::read(&full_path).await {
            Ok(content) => Ok(Bytes::from(content)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(StorageError::NotFound(name.to_string()))
            }
            Err(e) => Err(StorageError::IoError(e)),
        }
    }

    async fn delete(&self, name: &str) -> Result<bool, StorageError> {
        let full_path = self.full_path(name)?;

        match fs::remove_file(&full_path).await {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(StorageError::IoError(e)),
        }
    }

    async fn exists(&self, name: &str) -> bool {
        match self.full_path(name) {
            Ok(path) => fs::try_exists(&path).await.unwrap_or(false),
            Err(_) => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn save_read_delete_cycle() {
        let dir = tempfile::tempdir().unwrap();
        let storage = LocalStorage::new(dir.path()).await.unwrap();

        let path = storage.save("a.png", Bytes::from_static(b"abc")).await.unwrap();
        assert_eq!(path, dir.path().join("a.png"));
        assert!(storage.exists("a.png").await);
        assert_eq!(storage.read("a.png").await.unwrap(), Bytes::from_static(b"abc"));

        assert!(storage.delete("a.png").await.unwrap());
        assert!(!storage.delete("a.png").await.unwrap());
        assert!(matches!(
            storage.read("a.png").await,
            Err(StorageError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn rejects_names_outside_base_directory() {
        let dir = tempfile::tempdir().unwrap();
        let storage = LocalStorage::new(dir.path().join("nested")).await.unwrap();

        for name in ["..", "../secret.png", "a/b.png", "", "/etc/passwd"] {
            assert!(storage.full_path(name).is_err(), "{name} should be rejected");
            assert!(!storage.exists(name).await);
            assert!(matches!(
                storage.read(name).await,
                Err(StorageError::NotFound(_))
            ));
        }
    }
}
