// Record store backends: PostgreSQL and in-process memory
mod memory;
mod postgres;

use async_trait::async_trait;
use thiserror::Error;
use tracing::{info, warn};
use uuid::Uuid;

use crate::{config::Config, database::init_db, models::Photo};

pub use memory::MemoryPhotoRepository;
pub use postgres::PgPhotoRepository;

#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("Photo {0} already exists")]
    Duplicate(Uuid),

    #[error(transparent)]
    Database(#[from] sqlx::Error),
}

/// Persistence for photo metadata.
#[async_trait]
pub trait PhotoRepository: Send + Sync {
    /// Store a new record and return it as persisted.
    async fn insert(&self, photo: &Photo) -> Result<Photo, RepositoryError>;

    async fn get(&self, id: Uuid) -> Result<Option<Photo>, RepositoryError>;

    /// All records, newest upload first.
    async fn list(&self) -> Result<Vec<Photo>, RepositoryError>;

    /// Remove a record. Returns `false` if no record had that id.
    async fn delete(&self, id: Uuid) -> Result<bool, RepositoryError>;
}

#[derive(Clone)]
pub enum PhotoStore {
    Postgres(PgPhotoRepository),
    Memory(MemoryPhotoRepository),
}

// Delegates calls to the chosen backend
#[async_trait]
impl PhotoRepository for PhotoStore {
    async fn insert(&self, photo: &Photo) -> Result<Photo, RepositoryError> {
        match self {
            PhotoStore::Postgres(r) => r.insert(photo).await,
            PhotoStore::Memory(r) => r.insert(photo).await,
        }
    }

    async fn get(&self, id: Uuid) -> Result<Option<Photo>, RepositoryError> {
        match self {
            PhotoStore::Postgres(r) => r.get(id).await,
            PhotoStore::Memory(r) => r.get(id).await,
        }
    }

    async fn list(&self) -> Result<Vec<Photo>, RepositoryError> {
        match self {
            PhotoStore::Postgres(r) => r.list().await,
            PhotoStore::Memory(r) => r.list().await,
        }
    }

    async fn delete(&self, id: Uuid) -> Result<bool, RepositoryError> {
        match self {
            PhotoStore::Postgres(r) => r.delete(id).await,
            PhotoStore::Memory(r) => r.delete(id).await,
        }
    }
}

// Initialize the record store based on config
pub async fn init_repository(config: &Config) -> Result<PhotoStore, anyhow::Error> {
    match &config.database_url {
        Some(url) => {
            info!("Initializing PostgreSQL photo store");
            let pool = init_db(url).await?;
            Ok(PhotoStore::Postgres(PgPhotoRepository::new(pool)))
        }
        None => {
            warn!("DATABASE_URL not set, photo records are kept in memory");
            Ok(PhotoStore::Memory(MemoryPhotoRepository::default()))
        }
    }
}
