use std::path::PathBuf;

use async_trait::async_trait;
use tracing::{debug, info, warn};

use super::{
    error::{BlobError, BlobResult},
    gzip, BlobStore,
};
use crate::config::FilesystemStorageConfig;

/// Filesystem-backed blob store.
///
/// Objects are written under `root_dir`, sharded by the leading two
/// characters of the short ID to avoid a single directory with
/// hundreds of thousands of entries.
pub struct FilesystemBlobStore {
    root_dir: PathBuf,
    compression_level: u32,
}

impl FilesystemBlobStore {
    pub fn new(config: FilesystemStorageConfig) -> BlobResult<Self> {
        let root_dir = PathBuf::from(&config.root_dir);
        if !root_dir.exists() {
            info!(path = %root_dir.display(), "creating blob store root directory");
            std::fs::create_dir_all(&root_dir)?;
        }
        Ok(Self {
            root_dir,
            compression_level: config.compression_level,
        })
    }

    fn object_path(&self, content_key: &str) -> PathBuf {
        let short_id = content_key
            .rsplit('/')
            .next()
            .unwrap_or(content_key)
            .trim_end_matches(".gz");
        let shard = &short_id[..short_id.len().min(2)];
        self.root_dir.join(shard).join(content_key)
    }
}

#[async_trait]
impl BlobStore for FilesystemBlobStore {
    async fn put(&self, content_key: &str, content: &str) -> BlobResult<()> {
        let path = self.object_path(content_key);
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        let compressed = gzip::compress(content, self.compression_level)?;

        let temp_path = path.with_extension("tmp");
        tokio::fs::write(&temp_path, &compressed).await?;
        tokio::fs::rename(&temp_path, &path).await?;

        debug!(content_key, path = %path.display(), "blob written");
        Ok(())
    }

    async fn get(&self, content_key: &str) -> BlobResult<String> {
        let path = self.object_path(content_key);
        let bytes = match tokio::fs::read(&path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(BlobError::ContentNotFound(content_key.to_string()));
            }
            Err(e) => return Err(BlobError::Io(e)),
        };
        gzip::decompress(&bytes)
    }

    async fn delete(&self, content_key: &str) -> BlobResult<()> {
        let path = self.object_path(content_key);
        match tokio::fs::remove_file(&path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                warn!(content_key, "blob already absent during delete");
                Ok(())
            }
            Err(e) => Err(BlobError::Io(e)),
        }
    }

    async fn exists(&self, content_key: &str) -> BlobResult<bool> {
        Ok(tokio::fs::metadata(self.object_path(content_key)).await.is_ok())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store() -> (FilesystemBlobStore, tempfile::TempDir) {
        let dir = tempfile::tempdir().unwrap();
        let store = FilesystemBlobStore::new(FilesystemStorageConfig {
            root_dir: dir.path().to_string_lossy().to_string(),
            compression_level: 6,
        })
        .unwrap();
        (store, dir)
    }

    #[tokio::test]
    async fn put_then_get_round_trips() {
        let (store, _dir) = store();
        store.put("gisty/abc123.gz", "hello world").await.unwrap();
        assert_eq!(store.get("gisty/abc123.gz").await.unwrap(), "hello world");
    }

    #[tokio::test]
    async fn get_missing_is_content_not_found() {
        let (store, _dir) = store();
        let err = store.get("gisty/missing.gz").await.unwrap_err();
        assert!(matches!(err, BlobError::ContentNotFound(_)));
    }

    #[tokio::test]
    async fn delete_is_idempotent() {
        let (store, _dir) = store();
        store.put("gisty/xyz.gz", "hi").await.unwrap();
        store.delete("gisty/xyz.gz").await.unwrap();
        store.delete("gisty/xyz.gz").await.unwrap();
        assert!(!store.exists("gisty/xyz.gz").await.unwrap());
    }
}
