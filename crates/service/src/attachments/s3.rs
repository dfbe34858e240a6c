use async_trait::async_trait;
use aws_sdk_s3::config::Region;
use aws_sdk_s3::error::DisplayErrorContext;
use aws_sdk_s3::primitives::ByteStream;
use aws_sdk_s3::Client;
use configs::StorageConfig;
use tracing::debug;

use super::storage::{StorageBackend, StorageError};

/// Object-store backend; locators are `s3://<bucket>/<key>`.
pub struct S3Backend {
    client: Client,
    bucket: String,
}

impl S3Backend {
    pub fn new(client: Client, bucket: impl Into<String>) -> Self {
        Self { client, bucket: bucket.into() }
    }

    /// Build a client from the ambient AWS environment plus the `[storage]` overrides.
    pub async fn from_config(cfg: &StorageConfig) -> Result<Self, StorageError> {
        let bucket = cfg
            .s3_bucket
            .clone()
            .filter(|b| !b.trim().is_empty())
            .ok_or_else(|| StorageError::Config("s3_bucket is required for the s3 backend".into()))?;

        let mut loader = aws_config::defaults(aws_config::BehaviorVersion::latest());
        if let Some(region) = cfg.s3_region.clone() {
            loader = loader.region(Region::new(region));
        }
        let shared = loader.load().await;

        let mut builder = aws_sdk_s3::config::Builder::from(&shared);
        // custom endpoints (LocalStack, MinIO) need path-style addressing
        if let Some(endpoint) = cfg.s3_endpoint.clone() {
            builder = builder.endpoint_url(endpoint).force_path_style(true);
        }
        Ok(Self::new(Client::from_conf(builder.build()), bucket))
    }

    fn locator(&self, key: &str) -> String { format!("s3://{}/{}", self.bucket, key) }

    fn key_from_locator<'a>(&self, locator: &'a str) -> Result<&'a str, StorageError> {
        let (bucket, key) = parse_locator(locator)?;
        if bucket != self.bucket {
            return Err(StorageError::InvalidLocator(locator.to_string()));
        }
        Ok(key)
    }
}

/// Split `s3://bucket/key` into its parts.
pub(crate) fn parse_locator(locator: &str) -> Result<(&str, &str), StorageError> {
    let rest = locator
        .strip_prefix("s3://")
        .ok_or_else(|| StorageError::InvalidLocator(locator.to_string()))?;
    match rest.split_once('/') {
        Some((bucket, key)) if !bucket.is_empty() && !key.is_empty() => Ok((bucket, key)),
        _ => Err(StorageError::InvalidLocator(locator.to_string())),
    }
}

#[async_trait]
impl StorageBackend for S3Backend {
    fn kind(&self) -> &'static str { "s3" }

    async fn store(&self, key: &str, bytes: &[u8], content_type: Option<&str>) -> Result<String, StorageError> {
        debug!(bucket = %self.bucket, key = %key, size = bytes.len(), "s3_put_object");
        self.client
            .put_object()
            .bucket(&self.bucket)
            .key(key)
            .body(ByteStream::from(bytes.to_vec()))
            .set_content_type(content_type.map(str::to_string))
            .send()
            .await
            .map_err(|e| StorageError::Remote(DisplayErrorContext(&e).to_string()))?;
        Ok(self.locator(key))
    }

    async fn delete(&self, locator: &str) -> Result<(), StorageError> {
        let key = self.key_from_locator(locator)?;
        debug!(bucket = %self.bucket, key = %key, "s3_delete_object");
        // DeleteObject succeeds for absent keys, so NotFound is never reported here
        self.client
            .delete_object()
            .bucket(&self.bucket)
            .key(key)
            .send()
            .await
            .map_err(|e| StorageError::Remote(DisplayErrorContext(&e).to_string()))?;
        Ok(())
    }
}
