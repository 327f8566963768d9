//! Paste orchestrator (§4.6): the state machine binding the KGS, blob
//! store, cache, and metadata index. Enforces expiry and burn-after-read.

pub mod error;
pub mod expiry;
pub mod model;

pub use error::{PasteError, PasteResult};
pub use model::{CreatePaste, CreatedPaste, RetrievedPaste};

use std::{sync::Arc, time::Duration};

use chrono::Utc;
use tokio_util::task::TaskTracker;

use crate::{
    cache::{Cache, CacheKeys},
    config::{KgsConfig, LimitsConfig},
    db::{KgsRepo, PasteRepo},
    kgs,
    models::PasteRecord,
    sniffer,
    store::{content_key, BlobStore},
};

/// Global clients as injected handles (§9): the orchestrator holds only
/// `Arc` adapters, so it stays unit-testable with fakes and carries no
/// in-process mutable state of its own.
pub struct PasteService {
    pastes: Arc<dyn PasteRepo>,
    kgs_keys: Arc<dyn KgsRepo>,
    cache: Arc<dyn Cache>,
    store: Arc<dyn BlobStore>,
    base_url: String,
    key_length: u8,
    max_content_bytes: usize,
    default_cache_ttl: Duration,
    cache_key_prefix: String,
    task_tracker: TaskTracker,
}

impl PasteService {
    pub fn new(
        pastes: Arc<dyn PasteRepo>,
        kgs_keys: Arc<dyn KgsRepo>,
        cache: Arc<dyn Cache>,
        store: Arc<dyn BlobStore>,
        base_url: String,
        kgs_config: &KgsConfig,
        limits: &LimitsConfig,
        cache_key_prefix: String,
        task_tracker: TaskTracker,
    ) -> Self {
        Self {
            pastes,
            kgs_keys,
            cache,
            store,
            base_url,
            key_length: kgs_config.key_length,
            max_content_bytes: limits.max_content_bytes,
            default_cache_ttl: Duration::from_secs(limits.default_cache_ttl_secs),
            cache_key_prefix,
            task_tracker,
        }
    }

    fn cache_key(&self, short_id: &str) -> String {
        CacheKeys::paste_content(&self.cache_key_prefix, short_id)
    }

    /// Create a paste (§4.6 Create).
    pub async fn create(&self, input: CreatePaste) -> PasteResult<CreatedPaste> {
        // 1. Validate.
        if input.content.is_empty() {
            return Err(PasteError::EmptyContent);
        }
        if input.content.len() > self.max_content_bytes {
            return Err(PasteError::ContentTooLarge);
        }

        let syntax_type = match &input.syntax_type {
            Some(raw) => {
                let trimmed = raw.trim().to_ascii_lowercase();
                if trimmed.is_empty() {
                    sniffer::sniff(&input.content, None)
                } else if sniffer::is_whitelisted(&trimmed) {
                    trimmed
                } else {
                    return Err(PasteError::InvalidSyntaxType);
                }
            }
            None => sniffer::sniff(&input.content, None),
        };

        // 3. Resolve expiry.
        let now = Utc::now();
        let resolved = expiry::parse(input.expires_in.as_deref(), now)?;
        let (expires_at, burn_after_read) = match resolved {
            expiry::Expiry::Never => (None, false),
            expiry::Expiry::Burn => (None, true),
            expiry::Expiry::At(at) => (Some(at), false),
        };

        // 4. Reserve ID from KGS.
        let short_id = kgs::reserve(&self.kgs_keys).await?;

        // 5. Write blob.
        let key = content_key(&short_id);
        self.store.put(&key, &input.content).await?;

        // 6. Insert metadata record.
        let record = PasteRecord {
            short_id: short_id.clone(),
            content_key: key.clone(),
            created_at: now,
            expires_at,
            burn_after_read,
            syntax_type,
            is_private: input.is_private,
            user_id: input.user_id,
        };

        if let Err(e) = self.pastes.create(&record).await {
            // Best-effort rollback of the orphaned blob before surfacing.
            let _ = self.store.delete(&key).await;
            return Err(e.into());
        }

        // 7. Warm cache only when not burn-after-read.
        if !burn_after_read {
            let ttl = cache_ttl(self.default_cache_ttl, expires_at, now);
            let _ = self.cache.set(&self.cache_key(&short_id), &input.content, ttl).await;
        }

        // 8. Return.
        Ok(CreatedPaste {
            short_id: short_id.clone(),
            url: format!("{}/{}", self.base_url.trim_end_matches('/'), short_id),
            expires_at,
        })
    }

    /// Read a paste (§4.6 Read).
    pub async fn read(&self, short_id: &str) -> PasteResult<RetrievedPaste> {
        let record = self
            .pastes
            .get(short_id)
            .await?
            .ok_or(PasteError::NotFound)?;

        let now = Utc::now();
        if record.is_expired_at(now) {
            self.schedule_purge(record.short_id.clone(), record.content_key.clone());
            return Err(PasteError::Expired);
        }

        let cache_key = self.cache_key(short_id);
        let content = match self.cache.get(&cache_key).await.unwrap_or(None) {
            Some(content) => content,
            None => {
                let content = match self.store.get(&record.content_key).await {
                    Ok(content) => content,
                    Err(crate::store::BlobError::ContentNotFound(_)) => {
                        return Err(PasteError::NotFound);
                    }
                    Err(e) => return Err(e.into()),
                };
                if !record.burn_after_read {
                    let ttl = cache_ttl(self.default_cache_ttl, record.expires_at, now);
                    let _ = self.cache.set(&cache_key, &content, ttl).await;
                }
                content
            }
        };

        if record.burn_after_read {
            self.schedule_purge(record.short_id.clone(), record.content_key.clone());
        }

        Ok(RetrievedPaste {
            short_id: record.short_id,
            content,
            syntax_type: record.syntax_type,
            created_at: record.created_at,
            expires_at: record.expires_at,
        })
    }

    /// Delete a paste (§4.6 Delete).
    pub async fn delete(&self, short_id: &str) -> PasteResult<()> {
        let record = self
            .pastes
            .get(short_id)
            .await?
            .ok_or(PasteError::NotFound)?;

        self.purge_all_tiers(&record.short_id, &record.content_key).await;
        Ok(())
    }

    /// Best-effort, independently-attempted purge across cache, blob, and
    /// metadata tiers (§4.6 Delete, §5). Errors are logged, never surfaced:
    /// deletion is idempotent and the reaper is a backstop.
    async fn purge_all_tiers(&self, short_id: &str, content_key: &str) {
        if let Err(e) = self.cache.delete(&self.cache_key(short_id)).await {
            tracing::warn!(short_id, error = %e, "cache purge failed");
        }
        if let Err(e) = self.store.delete(content_key).await {
            tracing::warn!(short_id, error = %e, "blob purge failed");
        }
        if let Err(e) = self.pastes.delete(short_id).await {
            tracing::warn!(short_id, error = %e, "metadata purge failed");
        }
    }

    /// Fire-and-forget async purge (§9): spawns a detached task tracked on
    /// the service's `TaskTracker` so graceful shutdown can drain it with a
    /// bounded timeout, but does not block the caller.
    fn schedule_purge(&self, short_id: String, content_key: String) {
        let cache = Arc::clone(&self.cache);
        let store = Arc::clone(&self.store);
        let pastes = Arc::clone(&self.pastes);
        let cache_key = self.cache_key(&short_id);

        self.task_tracker.spawn(async move {
            if let Err(e) = cache.delete(&cache_key).await {
                tracing::warn!(short_id, error = %e, "async cache purge failed");
            }
            if let Err(e) = store.delete(&content_key).await {
                tracing::warn!(short_id, error = %e, "async blob purge failed");
            }
            if let Err(e) = pastes.delete(&short_id).await {
                tracing::warn!(short_id, error = %e, "async metadata purge failed");
            }
        });
    }
}

/// `ttl = min(defaultCacheTTL, time_until_expiry)`, or just the default when
/// the paste has no time-based expiry.
fn cache_ttl(
    default_ttl: Duration,
    expires_at: Option<chrono::DateTime<Utc>>,
    now: chrono::DateTime<Utc>,
) -> Duration {
    match expires_at {
        Some(at) => {
            let remaining = (at - now).to_std().unwrap_or(Duration::ZERO);
            default_ttl.min(remaining)
        }
        None => default_ttl,
    }
}
