//! Application state for fleet-photos

use std::sync::Arc;

use sqlx::PgPool;

use crate::config::Config;
use crate::db::{BoxError, PgPhotoStore, PgVehicleDirectory};
use crate::service::PhotoService;
use crate::storage::S3BlobStore;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// PostgreSQL connection pool
    pub pool: PgPool,
    /// Gallery coordinator (rows + S3 blobs)
    pub photos: Arc<PhotoService>,
}

impl AppState {
    /// Connect to PostgreSQL, apply migrations and wire the photo service
    pub async fn new(config: &Config) -> Result<Self, BoxError> {
        let pool = PgPool::connect(&config.database_url).await?;

        sqlx::migrate!("./migrations").run(&pool).await?;
        tracing::info!(environment = %config.environment, "Database ready");

        let blobs = S3BlobStore::from_config(config).await;
        tracing::info!(
            bucket = %config.s3_bucket,
            endpoint = config.s3_endpoint.as_deref().unwrap_or("aws"),
            "Photo storage ready"
        );

        let photos = PhotoService::new(
            Arc::new(PgPhotoStore::new(pool.clone())),
            Arc::new(blobs),
            Arc::new(PgVehicleDirectory::new(pool.clone())),
            config.positions,
        )
        .with_max_photo_bytes(config.max_photo_bytes)
        .with_storage_timeout(config.storage_timeout);

        Ok(Self {
            pool,
            photos: Arc::new(photos),
        })
    }
}
