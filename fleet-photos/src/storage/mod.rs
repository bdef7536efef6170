//! Object storage for photo blobs
//!
//! Blobs are addressed purely by a deterministic key:
//! ```text
//! {vehicle_id}/{photo_id}.{png|jpeg}
//! ```
//! The store holds no ordering information. Calls are never retried here;
//! the photo service decides what a failure means.

mod s3;

pub use s3::S3BlobStore;

use async_trait::async_trait;
use thiserror::Error;
use uuid::Uuid;

/// Accepted photo content types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaType {
    Png,
    Jpeg,
}

impl MediaType {
    /// Parse a declared `Content-Type`. Parameters (`; charset=...`) and
    /// case are ignored; anything other than PNG/JPEG yields `None`.
    pub fn from_content_type(content_type: &str) -> Option<Self> {
        let essence = content_type
            .split(';')
            .next()
            .unwrap_or_default()
            .trim()
            .to_ascii_lowercase();
        match essence.as_str() {
            "image/png" => Some(Self::Png),
            "image/jpeg" => Some(Self::Jpeg),
            _ => None,
        }
    }

    pub fn content_type(&self) -> &'static str {
        match self {
            Self::Png => "image/png",
            Self::Jpeg => "image/jpeg",
        }
    }

    pub fn extension(&self) -> &'static str {
        match self {
            Self::Png => "png",
            Self::Jpeg => "jpeg",
        }
    }
}

/// Object key for a photo blob
pub fn photo_key(vehicle_id: i64, photo_id: Uuid, media: MediaType) -> String {
    format!("{vehicle_id}/{photo_id}.{}", media.extension())
}

#[derive(Debug, Clone, Error)]
#[error("object storage error (status {status_hint:?}): {message}")]
pub struct StorageError {
    /// HTTP status returned by the store, if it answered at all
    pub status_hint: Option<u16>,
    pub message: String,
}

impl StorageError {
    pub fn new(status_hint: Option<u16>, message: impl Into<String>) -> Self {
        Self {
            status_hint,
            message: message.into(),
        }
    }
}

/// Binary blob persistence outside the relational store.
#[async_trait]
pub trait BlobStore: Send + Sync {
    async fn put(&self, key: &str, bytes: Vec<u8>, content_type: &str) -> Result<(), StorageError>;

    async fn delete(&self, key: &str) -> Result<(), StorageError>;

    /// Public URL under which `key` is served
    fn public_url(&self, key: &str) -> String;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_supported_content_types() {
        assert_eq!(MediaType::from_content_type("image/png"), Some(MediaType::Png));
        assert_eq!(
            MediaType::from_content_type("IMAGE/JPEG; charset=binary"),
            Some(MediaType::Jpeg)
        );
        assert_eq!(MediaType::from_content_type("image/jpg"), None);
        assert_eq!(MediaType::from_content_type("image/webp"), None);
        assert_eq!(MediaType::from_content_type(""), None);
    }

    #[test]
    fn key_uses_vehicle_photo_and_extension() {
        let id = Uuid::parse_str("0b7c3f1e-5a2d-4c1e-9f3a-2d7e8b6c4a10").unwrap();
        assert_eq!(
            photo_key(42, id, MediaType::Jpeg),
            "42/0b7c3f1e-5a2d-4c1e-9f3a-2d7e8b6c4a10.jpeg"
        );
        assert!(photo_key(42, id, MediaType::Png).ends_with(".png"));
    }

    #[test]
    fn storage_error_display() {
        let err = StorageError::new(Some(503), "SlowDown");
        assert_eq!(
            err.to_string(),
            "object storage error (status Some(503)): SlowDown"
        );
    }
}
