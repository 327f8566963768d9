//! Expired-paste reaper (§4.8): a periodic batched sweep across all three
//! tiers. Spawned and logged the same way as a retention worker — a
//! `tokio::time::sleep` loop, cancellable, logging a summary only when a
//! tick actually deleted something.

use std::sync::Arc;

use chrono::Utc;
use tokio_util::sync::CancellationToken;

use crate::{
    cache::{Cache, CacheKeys},
    config::ReaperConfig,
    db::PasteRepo,
    store::BlobStore,
};

/// Result of a single reaper sweep (one or more drain-loop batches).
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ReaperRunResult {
    pub batches_processed: u32,
    pub pastes_deleted: u64,
}

/// Starts the reaper as a background task (§4.8). No-ops if disabled.
/// Runs once immediately, then on every `config.interval()` tick, until
/// `shutdown` is cancelled.
pub async fn start_reaper(
    pastes: Arc<dyn PasteRepo>,
    cache: Arc<dyn Cache>,
    store: Arc<dyn BlobStore>,
    config: ReaperConfig,
    cache_key_prefix: String,
    shutdown: CancellationToken,
) {
    if !config.enabled {
        tracing::info!("reaper disabled by configuration");
        return;
    }

    tracing::info!(
        interval_secs = config.interval_secs,
        batch_size = config.batch_size,
        "starting reaper"
    );

    loop {
        match run_once(&pastes, &cache, &store, config.batch_size, &cache_key_prefix).await {
            Ok(result) if result.pastes_deleted > 0 => {
                tracing::info!(
                    batches = result.batches_processed,
                    deleted = result.pastes_deleted,
                    "reaper sweep complete"
                );
            }
            Ok(_) => {}
            Err(e) => tracing::error!(error = %e, "reaper sweep failed"),
        }

        tokio::select! {
            _ = shutdown.cancelled() => {
                tracing::info!("reaper shutting down");
                return;
            }
            _ = tokio::time::sleep(config.interval()) => {}
        }
    }
}

/// One full drain of the expired backlog, in bounded batches (§4.8):
///
/// ```text
/// loop:
///   batch = metadata.get_expired_batch(batch_size)
///   if batch is empty: break
///   ids = [record.short_id for record in batch]
///   for id in ids: cache.delete(id)        // errors ignored
///   for id in ids: blob_store.delete(id)   // errors ignored
///   deleted = metadata.delete_many(ids)    // errors abort the cycle
///   if size(batch) < batch_size: break
/// ```
pub async fn run_once(
    pastes: &Arc<dyn PasteRepo>,
    cache: &Arc<dyn Cache>,
    store: &Arc<dyn BlobStore>,
    batch_size: u32,
    cache_key_prefix: &str,
) -> crate::db::DbResult<ReaperRunResult> {
    let mut result = ReaperRunResult::default();

    loop {
        let now = Utc::now();
        let batch = pastes.get_expired_batch(now, batch_size).await?;
        if batch.is_empty() {
            break;
        }

        for record in &batch {
            let cache_key = CacheKeys::paste_content(cache_key_prefix, &record.short_id);
            if let Err(e) = cache.delete(&cache_key).await {
                tracing::warn!(short_id = %record.short_id, error = %e, "reaper cache purge failed");
            }
        }
        for record in &batch {
            if let Err(e) = store.delete(&record.content_key).await {
                tracing::warn!(short_id = %record.short_id, error = %e, "reaper blob purge failed");
            }
        }

        let ids: Vec<String> = batch.iter().map(|r| r.short_id.clone()).collect();
        let batch_len = ids.len();
        let deleted = pastes.delete_many(&ids).await?;

        result.batches_processed += 1;
        result.pastes_deleted += deleted;

        if batch_len < batch_size as usize {
            break;
        }
    }

    Ok(result)
}

#[cfg(all(test, feature = "database-sqlite"))]
mod tests {
    use super::*;
    use crate::{
        cache::MemoryCache,
        config::MemoryCacheConfig,
        db::DbPool,
        models::PasteRecord,
        store::{content_key, FilesystemBlobStore},
    };
    use chrono::Duration;

    async fn test_pool() -> DbPool {
        let pool = sqlx::sqlite::SqlitePoolOptions::new()
            .connect("sqlite::memory:")
            .await
            .unwrap();
        let db = DbPool::from_sqlite(pool);
        db.run_migrations().await.unwrap();
        db
    }

    #[tokio::test]
    async fn reaper_purges_all_tiers() {
        let db = test_pool().await;
        let pastes = db.pastes();
        let cache: Arc<dyn Cache> = Arc::new(MemoryCache::new(&MemoryCacheConfig {
            max_entries: 100,
            sweep_interval_secs: 30,
        }));
        let dir = tempfile::tempdir().unwrap();
        let store: Arc<dyn BlobStore> = Arc::new(
            FilesystemBlobStore::new(crate::config::FilesystemStorageConfig {
                root_dir: dir.path().to_string_lossy().to_string(),
                compression_level: 6,
            })
            .unwrap(),
        );

        let key = content_key("X");
        store.put(&key, "expired content").await.unwrap();
        let cache_key = CacheKeys::paste_content("gisty", "X");
        cache.set(&cache_key, "expired content", std::time::Duration::from_secs(60)).await.unwrap();

        pastes
            .create(&PasteRecord {
                short_id: "X".to_string(),
                content_key: key.clone(),
                created_at: Utc::now() - Duration::hours(2),
                expires_at: Some(Utc::now() - Duration::hours(1)),
                burn_after_read: false,
                syntax_type: "plaintext".to_string(),
                is_private: false,
                user_id: None,
            })
            .await
            .unwrap();

        let result = run_once(&pastes, &cache, &store, 100, "gisty").await.unwrap();
        assert_eq!(result.pastes_deleted, 1);

        assert!(pastes.get("X").await.unwrap().is_none());
        assert!(!cache.exists(&cache_key).await.unwrap());
        assert!(!store.exists(&key).await.unwrap());
    }

    #[tokio::test]
    async fn reaper_idempotent_second_run_deletes_nothing() {
        let db = test_pool().await;
        let pastes = db.pastes();
        let cache: Arc<dyn Cache> = Arc::new(MemoryCache::new(&MemoryCacheConfig {
            max_entries: 100,
            sweep_interval_secs: 30,
        }));
        let dir = tempfile::tempdir().unwrap();
        let store: Arc<dyn BlobStore> = Arc::new(
            FilesystemBlobStore::new(crate::config::FilesystemStorageConfig {
                root_dir: dir.path().to_string_lossy().to_string(),
                compression_level: 6,
            })
            .unwrap(),
        );

        pastes
            .create(&PasteRecord {
                short_id: "Y".to_string(),
                content_key: content_key("Y"),
                created_at: Utc::now() - Duration::hours(2),
                expires_at: Some(Utc::now() - Duration::hours(1)),
                burn_after_read: false,
                syntax_type: "plaintext".to_string(),
                is_private: false,
                user_id: None,
            })
            .await
            .unwrap();

        let first = run_once(&pastes, &cache, &store, 100, "gisty").await.unwrap();
        assert_eq!(first.pastes_deleted, 1);

        let second = run_once(&pastes, &cache, &store, 100, "gisty").await.unwrap();
        assert_eq!(second.pastes_deleted, 0);
        assert_eq!(second.batches_processed, 0);
    }

    #[tokio::test]
    async fn reaper_drains_across_multiple_batches() {
        let db = test_pool().await;
        let pastes = db.pastes();
        let cache: Arc<dyn Cache> = Arc::new(MemoryCache::new(&MemoryCacheConfig {
            max_entries: 100,
            sweep_interval_secs: 30,
        }));
        let dir = tempfile::tempdir().unwrap();
        let store: Arc<dyn BlobStore> = Arc::new(
            FilesystemBlobStore::new(crate::config::FilesystemStorageConfig {
                root_dir: dir.path().to_string_lossy().to_string(),
                compression_level: 6,
            })
            .unwrap(),
        );

        for i in 0..5 {
            let short_id = format!("k{i}");
            pastes
                .create(&PasteRecord {
                    short_id: short_id.clone(),
                    content_key: content_key(&short_id),
                    created_at: Utc::now() - Duration::hours(2),
                    expires_at: Some(Utc::now() - Duration::hours(1)),
                    burn_after_read: false,
                    syntax_type: "plaintext".to_string(),
                    is_private: false,
                    user_id: None,
                })
                .await
                .unwrap();
        }

        let result = run_once(&pastes, &cache, &store, 2, "gisty").await.unwrap();
        assert_eq!(result.pastes_deleted, 5);
        assert_eq!(result.batches_processed, 3);
    }
}
