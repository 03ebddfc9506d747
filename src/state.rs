use axum::extract::FromRef;
use axum_extra::extract::cookie::Key;
use sha2::{Digest, Sha512};

use crate::{
    config::Config,
    repository::{PhotoStore, init_repository},
    storage::{LocalStorage, init_storage},
};

/// Central application state shared across all Axum handlers.
#[derive(Clone)]
pub struct AppState {
    /// Photo metadata store (PostgreSQL or in-memory).
    pub photos: PhotoStore,

    /// Directory holding uploaded originals.
    pub originals: LocalStorage,

    /// Directory holding generated thumbnails.
    pub thumbnails: LocalStorage,

    /// Application configuration loaded from environment variables or `.env`.
    pub config: Config,

    /// Signs flash-message cookies; derived from `config.secret_key`.
    pub cookie_key: Key,
}

impl AppState {
    pub fn new(
        config: Config,
        photos: PhotoStore,
        originals: LocalStorage,
        thumbnails: LocalStorage,
    ) -> Self {
        let cookie_key = derive_cookie_key(&config.secret_key);
        Self {
            photos,
            originals,
            thumbnails,
            config,
            cookie_key,
        }
    }

    /// Connect the record store and prepare the storage directories.
    pub async fn from_config(config: Config) -> Result<Self, anyhow::Error> {
        let photos = init_repository(&config).await?;
        let (originals, thumbnails) = init_storage(&config).await?;
        Ok(Self::new(config, photos, originals, thumbnails))
    }
}

impl FromRef<AppState> for Key {
    fn from_ref(state: &AppState) -> Self {
        state.cookie_key.clone()
    }
}

/// Stretch the configured secret into the 64 bytes a signing key needs.
pub fn derive_cookie_key(secret: &str) -> Key {
    let digest = Sha512::digest(secret.as_bytes());
    Key::from(digest.as_slice())
}
