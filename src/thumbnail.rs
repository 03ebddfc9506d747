use std::path::{Path, PathBuf};

use bytes::Bytes;
use image::{ImageReader, codecs::jpeg::JpegEncoder};
use thiserror::Error;
use uuid::Uuid;

use crate::storage::{LocalStorage, Storage, StorageError};

/// Bounding box for thumbnails, in pixels.
pub const THUMBNAIL_SIZE: u32 = 300;

/// JPEG quality used for every thumbnail.
pub const THUMBNAIL_QUALITY: u8 = 85;

#[derive(Debug, Error)]
pub enum ThumbnailError {
    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("Thumbnail task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

/// Name of the thumbnail stored for a photo record.
pub fn thumbnail_name(id: &Uuid) -> String {
    format!("thumb_{}.jpg", id)
}

pub fn thumbnail_url(id: &Uuid) -> String {
    format!("/thumbnail/{}", id)
}

/// Decodes the original at `source`, bounds it to
/// `THUMBNAIL_SIZE`x`THUMBNAIL_SIZE` keeping the aspect ratio, and encodes it
/// as an RGB JPEG. Images already inside the box are not upscaled.
pub fn render_thumbnail(source: &Path) -> Result<Vec<u8>, image::ImageError> {
    // Guess the format from the bytes, not the client-chosen extension
    let img = ImageReader::open(source)?.with_guessed_format()?.decode()?;

    let bounded = if img.width() > THUMBNAIL_SIZE || img.height() > THUMBNAIL_SIZE {
        img.thumbnail(THUMBNAIL_SIZE, THUMBNAIL_SIZE)
    } else {
        img
    };

    // JPEG has no alpha or palette modes
    let rgb = bounded.to_rgb8();

    let mut encoded = Vec::new();
    JpegEncoder::new_with_quality(&mut encoded, THUMBNAIL_QUALITY).encode_image(&rgb)?;
    Ok(encoded)
}

/// Generates the thumbnail for photo `id` from the original at `source` and
/// writes it to `thumbnails`. Returns the path of the written thumbnail.
pub async fn generate_thumbnail(
    source: &Path,
    id: Uuid,
    thumbnails: &LocalStorage,
) -> Result<PathBuf, ThumbnailError> {
    let source = source.to_path_buf();

    // Decoding and resizing is CPU heavy, keep it off the async workers
    let encoded = tokio::task::spawn_blocking(move || render_thumbnail(&source)).await??;

    let path = thumbnails
        .save(&thumbnail_name(&id), Bytes::from(encoded))
        .await?;
    Ok(path)
}
