use axum::{
    Json,
    extract::{
        Multipart, Path, State,
        multipart::{MultipartError, MultipartRejection},
    },
    http::{StatusCode, header},
    response::{IntoResponse, Redirect, Response},
};
use axum_extra::extract::cookie::SignedCookieJar;
use bytes::Bytes;
use chrono::Utc;
use serde_json::json;
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::{
    error::AppError,
    flash::{self, Flash, FlashMessage},
    models::*,
    repository::PhotoRepository,
    state::AppState,
    storage::{Storage, StorageError},
    thumbnail::{generate_thumbnail, thumbnail_name},
    utils::{content_type_for, prepare_upload_name},
};

/// Service index. Reading it consumes any pending flash message.
pub async fn index(
    State(state): State<AppState>,
    jar: SignedCookieJar,
) -> (SignedCookieJar, Json<IndexResponse>) {
    let (jar, pending) = flash::take(jar);

    let body = IndexResponse {
        message: "Welcome to the photo gallery".to_string(),
        version: state.config.version.clone(),
        endpoints: json!({
            "health": "/health",
            "info": "/info",
            "upload": "/upload",
            "photos": "/api/photos",
        }),
        flashes: pending.map(FlashMessage::from).into_iter().collect(),
    };

    (jar, Json(body))
}

/// Liveness probe; checks no dependencies.
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        service: state.config.service_name.clone(),
        version: state.config.version.clone(),
        timestamp: Utc::now(),
    })
}

pub async fn info(State(state): State<AppState>) -> Json<InfoResponse> {
    Json(InfoResponse {
        application: state.config.service_name.clone(),
        version: state.config.version.clone(),
    })
}

/// Upload a photo using multipart/form-data (`photo` file, optional `description`).
///
/// Always answers with a redirect: to the new photo on success, back to the
/// index with a flash message otherwise.
pub async fn upload_photo(
    State(state): State<AppState>,
    jar: SignedCookieJar,
    multipart: Result<Multipart, MultipartRejection>,
) -> (SignedCookieJar, Redirect) {
    match receive_upload(&state, multipart).await {
        Ok(photo) => {
            info!("Photo uploaded: {} ({} bytes)", photo.id, photo.file_size);
            (
                flash::push(jar, Flash::Uploaded),
                Redirect::to(&format!("/photo/{}", photo.id)),
            )
        }
        Err(err) => {
            if err.status().is_server_error() {
                error!("Upload failed: {}", err);
            } else {
                warn!("Upload rejected: {}", err);
            }
            (flash::push(jar, Flash::from(&err)), Redirect::to("/"))
        }
    }
}

struct UploadForm {
    filename: String,
    mime_type: Option<String>,
    data: Bytes,
    description: Option<String>,
}

async fn read_upload_form(mut multipart: Multipart) -> Result<UploadForm, AppError> {
    let mut photo: Option<(String, Option<String>, Bytes)> = None;
    let mut description: Option<String> = None;

    // Parse multipart fields
    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        match field.name().unwrap_or("") {
            "photo" => {
                let filename = field.file_name().unwrap_or("").to_string();
                let mime_type = field.content_type().map(|s| s.to_string());
                // Read file bytes
                let data = field.bytes().await.map_err(multipart_error)?;
                photo = Some((filename, mime_type, data));
            }
            "description" => {
                let text = field.text().await.map_err(multipart_error)?;
                let text = text.trim();
                if !text.is_empty() {
                    description = Some(text.to_string());
                }
            }
            _ => {}
        }
    }

    let (filename, mime_type, data) = photo.ok_or(AppError::MissingFile)?;
    Ok(UploadForm {
        filename,
        mime_type,
        data,
        description,
    })
}

fn multipart_error(err: MultipartError) -> AppError {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        AppError::PayloadTooLarge(err.body_text())
    } else {
        AppError::Multipart(err.body_text())
    }
}

/// Validate, store the original, derive the thumbnail, persist the record.
async fn receive_upload(
    state: &AppState,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Photo, AppError> {
    // A body that is not multipart/form-data carries no file part
    let multipart = multipart.map_err(|rejection| {
        warn!("Upload is not multipart/form-data: {}", rejection);
        AppError::MissingFile
    })?;
    let form = read_upload_form(multipart).await?;

    // Rejects empty names and disallowed extensions
    let name = prepare_upload_name(&form.filename)?;

    let id = Uuid::new_v4();
    let file_size = form.data.len() as i64;

    let original_path = state.originals.save(&name.stored, form.data).await?;

    // A missing thumbnail is a valid state; serving falls back to the original
    if let Err(e) = generate_thumbnail(&original_path, id, &state.thumbnails).await {
        warn!("Failed to generate thumbnail for {}: {}", id, e);
    }

    let photo = Photo {
        id,
        stored_filename: name.stored,
        original_filename: name.original,
        file_size,
        mime_type: form
            .mime_type
            .unwrap_or_else(|| "application/octet-stream".into()),
        upload_date: Utc::now(),
        description: form.description,
    };

    // Persist photo metadata; on failure the stored files stay behind
    state.photos.insert(&photo).await.map_err(|e| {
        warn!(
            "Photo {} not recorded, leaving {} orphaned",
            id, photo.stored_filename
        );
        AppError::from(e)
    })
}

/// List all photos, newest first.
pub async fn list_photos(
    State(state): State<AppState>,
) -> Result<Json<PhotoListResponse>, AppError> {
    let photos: Vec<PhotoResponse> = state
        .photos
        .list()
        .await?
        .into_iter()
        .map(PhotoResponse::from)
        .collect();

    Ok(Json(PhotoListResponse {
        total: photos.len(),
        photos,
    }))
}

/// Get metadata for a single photo by its ID.
pub async fn get_photo(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<PhotoResponse>, AppError> {
    let photo = find_photo(&state, &id).await?;
    Ok(Json(PhotoResponse::from(photo)))
}

/// Serve an original by its stored filename.
pub async fn serve_original(
    State(state): State<AppState>,
    Path(filename): Path<String>,
) -> Result<Response, AppError> {
    let content = read_stored(&state.originals, &filename).await?;
    Ok(file_response(content, content_type_for(&filename)))
}

/// Serve a photo's thumbnail, or its original when no thumbnail exists.
pub async fn serve_thumbnail(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Response, AppError> {
    let photo = find_photo(&state, &id).await?;

    let thumb = thumbnail_name(&photo.id);
    if state.thumbnails.exists(&thumb).await {
        let content = read_stored(&state.thumbnails, &thumb).await?;
        return Ok(file_response(content, "image/jpeg"));
    }

    let content = read_stored(&state.originals, &photo.stored_filename).await?;
    Ok(file_response(content, &photo.mime_type))
}

/// Delete a photo: original, thumbnail, then the record.
///
/// Steps are not transactional; a failure part way leaves whatever was not
/// yet removed in place.
pub async fn delete_photo(
    State(state): State<AppState>,
    jar: SignedCookieJar,
    Path(id): Path<String>,
) -> Result<(SignedCookieJar, Redirect), AppError> {
    let photo = find_photo(&state, &id).await?;

    match remove_photo(&state, &photo).await {
        Ok(()) => {
            info!("Photo deleted: {}", photo.id);
            Ok((flash::push(jar, Flash::Deleted), Redirect::to("/")))
        }
        Err(e) => {
            error!("Failed to delete photo {}: {}", photo.id, e);
            Ok((
                flash::push(jar, Flash::DeleteFailed),
                Redirect::to(&format!("/photo/{}", photo.id)),
            ))
        }
    }
}

async fn remove_photo(state: &AppState, photo: &Photo) -> Result<(), AppError> {
    if !state.originals.delete(&photo.stored_filename).await? {
        warn!("Original {} was already missing", photo.stored_filename);
    }
    state.thumbnails.delete(&thumbnail_name(&photo.id)).await?;
    state.photos.delete(photo.id).await?;
    Ok(())
}

/// Fallback for unknown routes.
pub async fn not_found() -> AppError {
    AppError::NotFound("Not found".to_string())
}

async fn find_photo(state: &AppState, raw_id: &str) -> Result<Photo, AppError> {
    let id = Uuid::parse_str(raw_id).map_err(|_| photo_not_found())?;
    state.photos.get(id).await?.ok_or_else(photo_not_found)
}

fn photo_not_found() -> AppError {
    AppError::NotFound("Photo not found".to_string())
}

async fn read_stored(storage: &impl Storage, name: &str) -> Result<Bytes, AppError> {
    storage.read(name).await.map_err(|e| match e {
        StorageError::NotFound(_) | StorageError::InvalidName(_) => {
            AppError::NotFound("File not found".to_string())
        }
        other => AppError::StorageFailure(other),
    })
}

fn file_response(content: Bytes, content_type: &str) -> Response {
    let content_type = header::HeaderValue::from_str(content_type)
        .unwrap_or_else(|_| header::HeaderValue::from_static("application/octet-stream"));

    ([(header::CONTENT_TYPE, content_type)], content).into_response()
}
