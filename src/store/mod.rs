//! Compressed blob store adapter (§4.3).
//!
//! Object key construction: `content_key(short_id) = "gisty/" + short_id + ".gz"`.
//! Content is gzip-compressed application-side; no transport-level
//! `content-encoding` is relied upon, since some S3-compatible backends
//! reject combined encoding+metadata headers.

mod error;
mod fs;
pub mod gzip;
#[cfg(feature = "s3-storage")]
mod s3;

pub use error::{BlobError, BlobResult};
pub use fs::FilesystemBlobStore;
#[cfg(feature = "s3-storage")]
pub use s3::S3BlobStore;

use async_trait::async_trait;
use std::sync::Arc;

use crate::config::StorageConfig;

/// Deterministic object key for a paste's compressed blob.
pub fn content_key(short_id: &str) -> String {
    format!("gisty/{short_id}.gz")
}

/// Pluggable compressed-object storage backend.
#[async_trait]
pub trait BlobStore: Send + Sync {
    /// Gzip-compress `content` and write it under `content_key`, idempotently.
    async fn put(&self, content_key: &str, content: &str) -> BlobResult<()>;

    /// Fetch and gzip-decompress the object at `content_key`.
    /// Missing object ⇒ `BlobError::ContentNotFound`.
    async fn get(&self, content_key: &str) -> BlobResult<String>;

    /// Best-effort idempotent remove; an already-absent object is success.
    async fn delete(&self, content_key: &str) -> BlobResult<()>;

    async fn exists(&self, content_key: &str) -> BlobResult<bool>;
}

/// Construct the configured blob store backend.
pub async fn build_store(config: &StorageConfig) -> BlobResult<Arc<dyn BlobStore>> {
    match config {
        StorageConfig::Filesystem(cfg) => Ok(Arc::new(FilesystemBlobStore::new(cfg.clone())?)),
        #[cfg(feature = "s3-storage")]
        StorageConfig::S3(cfg) => Ok(Arc::new(S3BlobStore::new(cfg.clone()).await?)),
    }
}
