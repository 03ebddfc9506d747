use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::prelude::FromRow;
use uuid::Uuid;

use crate::{flash::FlashMessage, thumbnail::thumbnail_url};

/// Metadata for one uploaded photo. The original file lives in the upload
/// folder under `stored_filename`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Photo {
    pub id: Uuid,
    pub stored_filename: String,
    pub original_filename: String,
    pub file_size: i64,
    pub mime_type: String,
    pub upload_date: DateTime<Utc>,
    pub description: Option<String>,
}

impl Photo {
    pub fn url(&self) -> String {
        format!("/uploads/{}", self.stored_filename)
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct PhotoResponse {
    pub id: Uuid,
    pub filename: String,
    pub original_filename: String,
    pub file_size: i64,
    pub mime_type: String,
    pub upload_date: DateTime<Utc>,
    pub description: Option<String>,
    pub url: String,
    pub thumbnail_url: String,
}

impl From<Photo> for PhotoResponse {
    fn from(photo: Photo) -> Self {
        Self {
            url: photo.url(),
            thumbnail_url: thumbnail_url(&photo.id),
            id: photo.id,
            filename: photo.stored_filename,
            original_filename: photo.original_filename,
            file_size: photo.file_size,
            mime_type: photo.mime_type,
            upload_date: photo.upload_date,
            description: photo.description,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct PhotoListResponse {
    pub photos: Vec<PhotoResponse>,
    pub total: usize,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub service: String,
    pub version: String,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct InfoResponse {
    pub application: String,
    pub version: String,
}

#[derive(Debug, Serialize)]
pub struct IndexResponse {
    pub message: String,
    pub version: String,
    pub endpoints: serde_json::Value,
    pub flashes: Vec<FlashMessage>,
}
