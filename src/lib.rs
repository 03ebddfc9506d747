pub mod config;
pub mod database;
pub mod error;
pub mod flash;
pub mod handlers;
pub mod models;
pub mod repository;
pub mod state;
pub mod storage;
pub mod thumbnail;
pub mod utils;

use std::any::Any;

use axum::{
    Router,
    extract::DefaultBodyLimit,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use tower_http::{
    catch_panic::CatchPanicLayer,
    cors::{Any as CorsAny, CorsLayer},
    trace::TraceLayer,
};

use crate::{
    error::AppError,
    handlers::{
        delete_photo, get_photo, health_check, index, info, list_photos, not_found,
        serve_original, serve_thumbnail, upload_photo,
    },
    state::AppState,
};

/// Build the application router with all routes and middleware attached.
pub fn build_router(state: AppState) -> Router {
    let body_limit = usize::try_from(state.config.max_upload_size).unwrap_or(usize::MAX);

    let cors = CorsLayer::new()
        .allow_origin(CorsAny)
        .allow_methods(CorsAny)
        .allow_headers(CorsAny);

    Router::new()
        .route("/", get(index))
        .route("/health", get(health_check))
        .route("/info", get(info))
        .route("/upload", post(upload_photo))
        .route("/api/photos", get(list_photos))
        .route("/photo/{id}", get(get_photo))
        .route("/photo/{id}/delete", post(delete_photo))
        .route("/uploads/{filename}", get(serve_original))
        .route("/thumbnail/{id}", get(serve_thumbnail))
        .fallback(not_found)
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .layer(CatchPanicLayer::custom(handle_panic))
        .with_state(state)
}

fn handle_panic(_err: Box<dyn Any + Send + 'static>) -> Response {
    AppError::Internal("handler panicked".to_string()).into_response()
}
