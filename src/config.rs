use std::env;

use dotenvy::dotenv;
use thiserror::Error;
use tracing::warn;
use validator::Validate;

/// Upper bound for a single upload request body (16 MiB).
pub const MAX_UPLOAD_SIZE: u64 = 16 * 1024 * 1024;

const DEV_SECRET_KEY: &str = "dev-secret-key-change-in-production";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid configuration: {0}")]
    Invalid(#[from] validator::ValidationErrors),
}

#[derive(Debug, Clone, Validate)]
pub struct Config {
    #[validate(length(min = 16))]
    pub secret_key: String,
    /// Postgres connection string. `None` keeps photo records in memory.
    pub database_url: Option<String>,
    #[validate(length(min = 1))]
    pub upload_folder: String,
    #[validate(length(min = 1))]
    pub thumbnail_folder: String,
    #[validate(range(min = 1, max = 16777216))] // Max 16MiB
    pub max_upload_size: u64,
    pub host: String,
    pub port: u16,
    pub service_name: String,
    pub version: String,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load environment variables from `.env` file (if it exists)
        dotenv().ok();

        let secret_key = env::var("SECRET_KEY").unwrap_or_else(|_| {
            warn!("SECRET_KEY not set, using the development key");
            DEV_SECRET_KEY.to_string()
        });

        let config = Config {
            secret_key,
            database_url: env::var("DATABASE_URL").ok().filter(|url| !url.is_empty()),
            upload_folder: env::var("UPLOAD_FOLDER").unwrap_or_else(|_| "uploads".to_string()),
            thumbnail_folder: env::var("THUMBNAIL_FOLDER")
                .unwrap_or_else(|_| "thumbnails".to_string()),
            max_upload_size: env::var("MAX_UPLOAD_SIZE")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(MAX_UPLOAD_SIZE),
            host: env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port: env::var("PORT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(5000),
            service_name: env::var("SERVICE_NAME").unwrap_or_else(|_| "photo-gallery".to_string()),
            version: env::var("APP_VERSION").unwrap_or_else(|_| "1.0.0".to_string()),
        };

        // Validate configuration values (e.g. upload size range)
        config.validate()?;
        Ok(config)
    }
}
