//! Amazon S3 (or S3-compatible) photo blob store.
//!
//! Objects live at `s3://{bucket}/{prefix}/{key}` and are served from
//! `{public_base_url}/{prefix}/{key}`.

use async_trait::async_trait;
use aws_sdk_s3::Client;
use aws_sdk_s3::config::http::HttpResponse;
use aws_sdk_s3::error::{DisplayErrorContext, SdkError};
use aws_sdk_s3::primitives::ByteStream;

use super::{BlobStore, StorageError};
use crate::config::Config;

pub struct S3BlobStore {
    client: Client,
    bucket: String,
    prefix: Option<String>,
    public_base_url: String,
}

impl S3BlobStore {
    /// Build from configuration, using default AWS credentials
    /// (environment or IAM role).
    pub async fn from_config(config: &Config) -> Self {
        let aws_config = aws_config::load_defaults(aws_config::BehaviorVersion::latest()).await;

        let client = match &config.s3_endpoint {
            Some(endpoint) => {
                let s3_config = aws_sdk_s3::config::Builder::from(&aws_config)
                    .endpoint_url(endpoint)
                    // MinIO and most S3-compatible services need path-style URLs
                    .force_path_style(true)
                    .build();
                Client::from_conf(s3_config)
            }
            None => Client::new(&aws_config),
        };

        Self::with_client(
            client,
            config.s3_bucket.clone(),
            config.s3_prefix.clone(),
            config.public_base_url.clone(),
        )
    }

    pub fn with_client(
        client: Client,
        bucket: impl Into<String>,
        prefix: Option<String>,
        public_base_url: impl Into<String>,
    ) -> Self {
        Self {
            client,
            bucket: bucket.into(),
            prefix,
            public_base_url: public_base_url.into(),
        }
    }

    fn object_key(&self, key: &str) -> String {
        match &self.prefix {
            Some(prefix) => format!("{}/{}", prefix.trim_end_matches('/'), key),
            None => key.to_string(),
        }
    }
}

/// Keep the HTTP status (when the service answered) for the caller's logs
fn storage_error<E>(err: SdkError<E, HttpResponse>) -> StorageError
where
    E: std::error::Error + Send + Sync + 'static,
{
    let status_hint = err.raw_response().map(|response| response.status().as_u16());
    StorageError::new(status_hint, DisplayErrorContext(&err).to_string())
}

#[async_trait]
impl BlobStore for S3BlobStore {
    async fn put(&self, key: &str, bytes: Vec<u8>, content_type: &str) -> Result<(), StorageError> {
        let object_key = self.object_key(key);
        self.client
            .put_object()
            .bucket(&self.bucket)
            .key(&object_key)
            .body(ByteStream::from(bytes))
            .content_type(content_type)
            .send()
            .await
            .map_err(storage_error)?;

        tracing::debug!(bucket = %self.bucket, key = %object_key, "Photo blob stored");
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<(), StorageError> {
        let object_key = self.object_key(key);
        self.client
            .delete_object()
            .bucket(&self.bucket)
            .key(&object_key)
            .send()
            .await
            .map_err(storage_error)?;

        tracing::debug!(bucket = %self.bucket, key = %object_key, "Photo blob deleted");
        Ok(())
    }

    fn public_url(&self, key: &str) -> String {
        format!(
            "{}/{}",
            self.public_base_url.trim_end_matches('/'),
            self.object_key(key)
        )
    }
}
