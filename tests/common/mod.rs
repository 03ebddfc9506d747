#![allow(dead_code)]

use std::io::Cursor;

use axum::{
    Router,
    body::Body,
    http::{Request, Response, header},
};
use image::{DynamicImage, ImageFormat, Rgb, RgbImage};
use photogallery::{
    build_router, config::Config, repository::PhotoStore, state::AppState, storage::LocalStorage,
};
use tempfile::TempDir;
use tower::util::ServiceExt;

const BOUNDARY: &str = "photogallery-test-boundary";

pub struct TestApp {
    pub router: Router,
    pub state: AppState,
    _dir: TempDir,
}

impl TestApp {
    pub async fn spawn() -> Self {
        Self::spawn_with(|_| {}).await
    }

    pub async fn spawn_with(configure: impl FnOnce(&mut Config)) -> Self {
        let dir = tempfile::tempdir().expect("Failed to create temp dir");
        let mut config = test_config(&dir);
        configure(&mut config);

        let state = AppState::from_config(config)
            .await
            .expect("Failed to build application state");
        Self::from_state(state, dir)
    }

    /// App backed by the given record store instead of the in-memory default.
    pub async fn spawn_with_store(photos: PhotoStore) -> Self {
        let dir = tempfile::tempdir().expect("Failed to create temp dir");
        let config = test_config(&dir);

        let originals = LocalStorage::new(&config.upload_folder)
            .await
            .expect("Failed to create upload folder");
        let thumbnails = LocalStorage::new(&config.thumbnail_folder)
            .await
            .expect("Failed to create thumbnail folder");

        let state = AppState::new(config, photos, originals, thumbnails);
        Self::from_state(state, dir)
    }

    fn from_state(state: AppState, dir: TempDir) -> Self {
        let router = build_router(state.clone());
        Self {
            router,
            state,
            _dir: dir,
        }
    }

    pub async fn send(&self, request: Request<Body>) -> Response<Body> {
        self.router
            .clone()
            .oneshot(request)
            .await
            .expect("Failed to execute request")
    }

    pub async fn get(&self, uri: &str) -> Response<Body> {
        self.send(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
    }

    pub async fn post(&self, uri: &str) -> Response<Body> {
        self.send(
            Request::builder()
                .method("POST")
                .uri(uri)
                .body(Body::empty())
                .unwrap(),
        )
        .await
    }

    pub async fn upload(&self, parts: &[Part<'_>]) -> Response<Body> {
        self.send(multipart_request(parts)).await
    }

    /// Upload a file as the `photo` field.
    pub async fn upload_photo(&self, filename: &str, content_type: &str, data: &[u8]) -> Response<Body> {
        self.upload(&[Part::file("photo", filename, content_type, data)])
            .await
    }

    pub async fn list(&self) -> serde_json::Value {
        let response = self.get("/api/photos").await;
        assert_eq!(response.status(), 200);
        body_json(response).await
    }

    /// Flash messages shown on the index page for the given cookie.
    pub async fn flashes(&self, cookie: &str) -> Vec<serde_json::Value> {
        let response = self
            .send(
                Request::builder()
                    .uri("/")
                    .header(header::COOKIE, cookie)
                    .body(Body::empty())
                    .unwrap(),
            )
            .await;
        let body = body_json(response).await;
        body["flashes"].as_array().cloned().unwrap_or_default()
    }

    pub fn uploads_dir(&self) -> &std::path::Path {
        self.state.originals.base_path()
    }

    pub fn thumbnails_dir(&self) -> &std::path::Path {
        self.state.thumbnails.base_path()
    }
}

fn test_config(dir: &TempDir) -> Config {
    Config {
        secret_key: "integration-test-secret-key".to_string(),
        database_url: None,
        upload_folder: dir.path().join("uploads").to_string_lossy().into_owned(),
        thumbnail_folder: dir.path().join("thumbnails").to_string_lossy().into_owned(),
        max_upload_size: photogallery::config::MAX_UPLOAD_SIZE,
        host: "127.0.0.1".to_string(),
        port: 0,
        service_name: "photo-gallery".to_string(),
        version: "1.0.0".to_string(),
    }
}

pub struct Part<'a> {
    name: &'a str,
    filename: Option<&'a str>,
    content_type: Option<&'a str>,
    data: &'a [u8],
}

impl<'a> Part<'a> {
    pub fn file(name: &'a str, filename: &'a str, content_type: &'a str, data: &'a [u8]) -> Self {
        Self {
            name,
            filename: Some(filename),
            content_type: Some(content_type),
            data,
        }
    }

    pub fn text(name: &'a str, value: &'a str) -> Self {
        Self {
            name,
            filename: None,
            content_type: None,
            data: value.as_bytes(),
        }
    }
}

pub fn multipart_request(parts: &[Part<'_>]) -> Request<Body> {
    let mut body = Vec::new();
    for part in parts {
        body.extend_from_slice(format!("--{BOUNDARY}\r\n").as_bytes());
        let mut disposition = format!("Content-Disposition: form-data; name=\"{}\"", part.name);
        if let Some(filename) = part.filename {
            disposition.push_str(&format!("; filename=\"{filename}\""));
        }
        body.extend_from_slice(disposition.as_bytes());
        body.extend_from_slice(b"\r\n");
        if let Some(content_type) = part.content_type {
            body.extend_from_slice(format!("Content-Type: {content_type}\r\n").as_bytes());
        }
        body.extend_from_slice(b"\r\n");
        body.extend_from_slice(part.data);
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());

    Request::builder()
        .method("POST")
        .uri("/upload")
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .body(Body::from(body))
        .unwrap()
}

pub async fn body_bytes(response: Response<Body>) -> Vec<u8> {
    axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("Failed to read body")
        .to_vec()
}

pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    serde_json::from_slice(&body_bytes(response).await).expect("Failed to parse JSON")
}

pub fn location(response: &Response<Body>) -> String {
    response
        .headers()
        .get(header::LOCATION)
        .expect("Missing location header")
        .to_str()
        .unwrap()
        .to_string()
}

/// `name=value` of the flash cookie set by a response.
pub fn flash_cookie(response: &Response<Body>) -> String {
    response
        .headers()
        .get_all(header::SET_COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .find(|v| v.starts_with("flash="))
        .and_then(|v| v.split(';').next())
        .expect("Missing flash cookie")
        .to_string()
}

pub fn png_bytes(width: u32, height: u32) -> Vec<u8> {
    let img = DynamicImage::ImageRgb8(RgbImage::from_pixel(width, height, Rgb([10, 120, 200])));
    let mut cursor = Cursor::new(Vec::new());
    img.write_to(&mut cursor, ImageFormat::Png)
        .expect("Failed to encode PNG");
    cursor.into_inner()
}
