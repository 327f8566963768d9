use async_trait::async_trait;
use tracing::{debug, error, info};

use super::{
    error::{BlobError, BlobResult},
    gzip, BlobStore,
};
use crate::config::S3StorageConfig;

/// S3-compatible object storage backend. Works against AWS S3, MinIO,
/// Cloudflare R2, and other S3-compatible services via `endpoint_url`.
pub struct S3BlobStore {
    config: S3StorageConfig,
    client: aws_sdk_s3::Client,
}

impl S3BlobStore {
    pub async fn new(config: S3StorageConfig) -> BlobResult<Self> {
        info!(bucket = %config.bucket, "initializing S3 blob store");

        let mut sdk_config_builder = aws_config::defaults(aws_config::BehaviorVersion::latest());
        if let Some(region) = &config.region {
            sdk_config_builder = sdk_config_builder.region(aws_config::Region::new(region.clone()));
        }
        let sdk_config = sdk_config_builder.load().await;

        let mut s3_config_builder = aws_sdk_s3::config::Builder::from(&sdk_config);
        if let Some(endpoint) = &config.endpoint_url {
            s3_config_builder = s3_config_builder.endpoint_url(endpoint);
        }
        if config.force_path_style {
            s3_config_builder = s3_config_builder.force_path_style(true);
        }

        let client = aws_sdk_s3::Client::from_conf(s3_config_builder.build());
        Ok(Self { config, client })
    }
}

#[async_trait]
impl BlobStore for S3BlobStore {
    async fn put(&self, content_key: &str, content: &str) -> BlobResult<()> {
        let compressed = gzip::compress(content, self.config.compression_level)?;
        debug!(content_key, bucket = %self.config.bucket, size = compressed.len(), "writing blob to S3");

        self.client
            .put_object()
            .bucket(&self.config.bucket)
            .key(content_key)
            .content_type("application/octet-stream")
            .body(aws_sdk_s3::primitives::ByteStream::from(compressed))
            .send()
            .await
            .map_err(|e| {
                error!(error = %e, "failed to upload blob to S3");
                BlobError::S3(e.to_string())
            })?;

        Ok(())
    }

    async fn get(&self, content_key: &str) -> BlobResult<String> {
        let result = self
            .client
            .get_object()
            .bucket(&self.config.bucket)
            .key(content_key)
            .send()
            .await
            .map_err(|e| {
                if e.to_string().contains("NoSuchKey") {
                    BlobError::ContentNotFound(content_key.to_string())
                } else {
                    error!(error = %e, "failed to download blob from S3");
                    BlobError::S3(e.to_string())
                }
            })?;

        let bytes = result
            .body
            .collect()
            .await
            .map_err(|e| BlobError::S3(format!("failed to read S3 response body: {e}")))?
            .to_vec();

        gzip::decompress(&bytes)
    }

    async fn delete(&self, content_key: &str) -> BlobResult<()> {
        self.client
            .delete_object()
            .bucket(&self.config.bucket)
            .key(content_key)
            .send()
            .await
            .map_err(|e| {
                error!(error = %e, "failed to delete blob from S3");
                BlobError::S3(e.to_string())
            })?;
        Ok(())
    }

    async fn exists(&self, content_key: &str) -> BlobResult<bool> {
        match self
            .client
            .head_object()
            .bucket(&self.config.bucket)
            .key(content_key)
            .send()
            .await
        {
            Ok(_) => Ok(true),
            Err(e) if e.to_string().contains("NotFound") => Ok(false),
            Err(e) => Err(BlobError::S3(e.to_string())),
        }
    }
}
