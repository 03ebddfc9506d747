use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use super::{PhotoRepository, RepositoryError};
use crate::models::Photo;

#[derive(Clone)]
pub struct PgPhotoRepository {
    pool: PgPool,
}

impl PgPhotoRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl PhotoRepository for PgPhotoRepository {
    async fn insert(&self, photo: &Photo) -> Result<Photo, RepositoryError> {
        let record = sqlx::query_as::<_, Photo>(
            r#"
            INSERT INTO photos (
                id, stored_filename, original_filename, file_size, mime_type,
                upload_date, description
            ) VALUES ($1,$2,$3,$4,$5,$6,$7)
            RETURNING *
            "#,
        )
        .bind(photo.id)
        .bind(&photo.stored_filename)
        .bind(&photo.original_filename)
        .bind(photo.file_size)
        .bind(&photo.mime_type)
        .bind(photo.upload_date)
        .bind(&photo.description)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(db) = &e {
                if db.is_unique_violation() {
                    return RepositoryError::Duplicate(photo.id);
                }
            }
            RepositoryError::Database(e)
        })?;

        Ok(record)
    }

    async fn get(&self, id: Uuid) -> Result<Option<Photo>, RepositoryError> {
        let photo = sqlx::query_as::<_, Photo>("SELECT * FROM photos WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(photo)
    }

    async fn list(&self) -> Result<Vec<Photo>, RepositoryError> {
        let photos = sqlx::query_as::<_, Photo>("SELECT * FROM photos ORDER BY upload_date DESC")
            .fetch_all(&self.pool)
            .await?;
        Ok(photos)
    }

    async fn delete(&self, id: Uuid) -> Result<bool, RepositoryError> {
        let result = sqlx::query("DELETE FROM photos WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
