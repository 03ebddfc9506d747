use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{PhotoRepository, RepositoryError};
use crate::models::Photo;

/// Process-local record store, used when no database is configured.
#[derive(Clone, Default)]
pub struct MemoryPhotoRepository {
    photos: Arc<RwLock<Vec<Photo>>>, // insertion order
}

#[async_trait]
impl PhotoRepository for MemoryPhotoRepository {
    async fn insert(&self, photo: &Photo) -> Result<Photo, RepositoryError> {
        let mut photos = self.photos.write().await;
        if photos.iter().any(|p| p.id == photo.id) {
            return Err(RepositoryError::Duplicate(photo.id));
        }
        photos.push(photo.clone());
        Ok(photo.clone())
    }

    async fn get(&self, id: Uuid) -> Result<Option<Photo>, RepositoryError> {
        let photos = self.photos.read().await;
        Ok(photos.iter().find(|p| p.id == id).cloned())
    }

    async fn list(&self) -> Result<Vec<Photo>, RepositoryError> {
        let mut photos: Vec<Photo> = self.photos.read().await.iter().rev().cloned().collect();
        // Stable sort: equal timestamps stay newest insert first
        photos.sort_by(|a, b| b.upload_date.cmp(&a.upload_date));
        Ok(photos)
    }

    async fn delete(&self, id: Uuid) -> Result<bool, RepositoryError> {
        let mut photos = self.photos.write().await;
        let before = photos.len();
        photos.retain(|p| p.id != id);
        Ok(photos.len() < before)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};

    fn photo(offset_secs: i64) -> Photo {
        let id = Uuid::new_v4();
        Photo {
            id,
            stored_filename: format!("{}_photo.png", id.simple()),
            original_filename: "photo.png".into(),
            file_size: 10,
            mime_type: "image/png".into(),
            upload_date: Utc::now() + Duration::seconds(offset_secs),
            description: None,
        }
    }

    #[tokio::test]
    async fn list_is_newest_first() {
        let repo = MemoryPhotoRepository::default();
        let old = photo(-60);
        let new = photo(60);
        let mid = photo(0);
        for p in [&old, &new, &mid] {
            repo.insert(p).await.unwrap();
        }

        let ids: Vec<Uuid> = repo.list().await.unwrap().into_iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![new.id, mid.id, old.id]);
    }

    #[tokio::test]
    async fn equal_timestamps_list_latest_insert_first() {
        let repo = MemoryPhotoRepository::default();
        let first = photo(0);
        let mut second = photo(0);
        second.upload_date = first.upload_date;
        repo.insert(&first).await.unwrap();
        repo.insert(&second).await.unwrap();

        let ids: Vec<Uuid> = repo.list().await.unwrap().into_iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![second.id, first.id]);
    }

    #[tokio::test]
    async fn rejects_duplicate_ids() {
        let repo = MemoryPhotoRepository::default();
        let p = photo(0);
        repo.insert(&p).await.unwrap();

        assert!(matches!(
            repo.insert(&p).await,
            Err(RepositoryError::Duplicate(id)) if id == p.id
        ));
    }

    #[tokio::test]
    async fn get_and_delete() {
        let repo = MemoryPhotoRepository::default();
        let p = photo(0);
        repo.insert(&p).await.unwrap();

        assert_eq!(repo.get(p.id).await.unwrap(), Some(p.clone()));
        assert!(repo.delete(p.id).await.unwrap());
        assert!(!repo.delete(p.id).await.unwrap());
        assert_eq!(repo.get(p.id).await.unwrap(), None);
        assert!(repo.list().await.unwrap().is_empty());
    }
}
