use std::time::Duration;

use async_trait::async_trait;

use super::error::CacheResult;

/// Default TTL applied when a non-positive TTL is requested (§4.4).
pub const DEFAULT_TTL: Duration = Duration::from_secs(3600);

/// Time-bounded in-memory key-value store with TTL semantics (§4.4).
///
/// A thin semantic wrapper over whatever backend is configured; contents
/// are never altered, only stored and retrieved verbatim.
#[async_trait]
pub trait Cache: Send + Sync {
    /// Store `content` under `key`. A non-positive `ttl` falls back to [`DEFAULT_TTL`].
    async fn set(&self, key: &str, content: &str, ttl: Duration) -> CacheResult<()>;

    /// Fetch the content stored under `key`, if present and unexpired.
    async fn get(&self, key: &str) -> CacheResult<Option<String>>;

    async fn delete(&self, key: &str) -> CacheResult<()>;

    async fn exists(&self, key: &str) -> CacheResult<bool>;

    /// Remaining TTL for `key`, if it exists.
    async fn ttl(&self, key: &str) -> CacheResult<Option<Duration>>;

    /// Reset the TTL of an existing key without altering its value.
    /// No-op if the key is absent.
    async fn refresh(&self, key: &str, ttl: Duration) -> CacheResult<()>;

    #[cfg(feature = "redis")]
    fn as_redis(&self) -> Option<&super::RedisCache> {
        None
    }
}

pub(crate) fn normalize_ttl(ttl: Duration) -> Duration {
    if ttl.is_zero() {
        DEFAULT_TTL
    } else {
        ttl
    }
}
