//! Photo service configuration

use std::time::Duration;

use crate::db::BoxError;
use crate::position::{DEFAULT_GAP, DEFAULT_OFFSET, PositionAllocator};

/// Default upload limit (10MB)
const DEFAULT_MAX_PHOTO_BYTES: usize = 10 * 1024 * 1024;

/// Photo service configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// PostgreSQL connection URL
    pub database_url: String,
    /// Environment: development | staging | production
    pub environment: String,
    /// S3 bucket holding photo blobs
    pub s3_bucket: String,
    /// Custom endpoint for S3-compatible stores (MinIO, R2, ...)
    pub s3_endpoint: Option<String>,
    /// Key prefix inside the bucket
    pub s3_prefix: Option<String>,
    /// Base URL photos are served from (CDN or bucket website)
    pub public_base_url: String,
    /// Largest accepted photo payload in bytes
    pub max_photo_bytes: usize,
    /// Gallery position layout (offset and gap)
    pub positions: PositionAllocator,
    /// Upper bound on a single object storage call; `None` waits indefinitely
    pub storage_timeout: Option<Duration>,
}

impl Config {
    /// Load configuration from environment variables (and `.env` if present)
    pub fn from_env() -> Result<Self, BoxError> {
        let _ = dotenvy::dotenv();
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build configuration from an arbitrary variable source
    pub fn from_lookup<F>(lookup: F) -> Result<Self, BoxError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());
        let environment = var("ENVIRONMENT").unwrap_or_else(|| "development".into());

        let s3_bucket = match var("PHOTO_S3_BUCKET") {
            Some(bucket) => bucket,
            None if environment == "development" => "fleet-photos-dev".into(),
            None => {
                return Err(format!("PHOTO_S3_BUCKET must be set in {environment} environment").into());
            }
        };

        let offset = parse_or(&var, "PHOTO_POSITION_OFFSET", DEFAULT_OFFSET)?;
        let gap = parse_or(&var, "PHOTO_POSITION_GAP", DEFAULT_GAP)?;
        let positions = PositionAllocator::new(offset, gap)
            .map_err(|e| format!("PHOTO_POSITION_GAP: {e}"))?;

        let timeout_secs: u64 = parse_or(&var, "PHOTO_STORAGE_TIMEOUT_SECS", 0)?;

        Ok(Self {
            database_url: var("DATABASE_URL").ok_or("DATABASE_URL must be set")?,
            public_base_url: var("PHOTO_PUBLIC_BASE_URL")
                .unwrap_or_else(|| format!("https://{s3_bucket}.s3.amazonaws.com")),
            s3_bucket,
            s3_endpoint: var("PHOTO_S3_ENDPOINT"),
            s3_prefix: var("PHOTO_S3_PREFIX"),
            max_photo_bytes: parse_or(&var, "PHOTO_MAX_BYTES", DEFAULT_MAX_PHOTO_BYTES)?,
            positions,
            storage_timeout: (timeout_secs > 0).then(|| Duration::from_secs(timeout_secs)),
            environment,
        })
    }
}

fn parse_or<T, F>(var: &F, name: &str, default: T) -> Result<T, BoxError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
    F: Fn(&str) -> Option<String>,
{
    match var(name) {
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|e| format!("{name}: invalid value {raw:?}: {e}").into()),
        None => Ok(default),
    }
}
