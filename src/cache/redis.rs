use std::time::Duration;

use async_trait::async_trait;
use redis::AsyncCommands;

use super::{
    error::CacheResult,
    traits::{normalize_ttl, Cache},
};
use crate::config::RedisCacheConfig;

/// Redis-backed cache for multi-node deployments, where invalidation must
/// be visible across every instance rather than per-node.
pub struct RedisCache {
    client: redis::Client,
    key_prefix: String,
}

impl RedisCache {
    pub fn new(config: &RedisCacheConfig) -> CacheResult<Self> {
        let client = redis::Client::open(config.url.as_str())?;
        Ok(Self {
            client,
            key_prefix: config.key_prefix.clone(),
        })
    }

    fn prefixed_key(&self, key: &str) -> String {
        format!("{}:{}", self.key_prefix, key)
    }

    async fn connection(&self) -> CacheResult<redis::aio::MultiplexedConnection> {
        Ok(self.client.get_multiplexed_async_connection().await?)
    }
}

#[async_trait]
impl Cache for RedisCache {
    async fn set(&self, key: &str, content: &str, ttl: Duration) -> CacheResult<()> {
        let ttl = normalize_ttl(ttl);
        let mut conn = self.connection().await?;
        let _: () = conn
            .set_ex(self.prefixed_key(key), content, ttl.as_secs().max(1))
            .await?;
        Ok(())
    }

    async fn get(&self, key: &str) -> CacheResult<Option<String>> {
        let mut conn = self.connection().await?;
        let value: Option<String> = conn.get(self.prefixed_key(key)).await?;
        Ok(value)
    }

    async fn delete(&self, key: &str) -> CacheResult<()> {
        let mut conn = self.connection().await?;
        let _: () = conn.del(self.prefixed_key(key)).await?;
        Ok(())
    }

    async fn exists(&self, key: &str) -> CacheResult<bool> {
        let mut conn = self.connection().await?;
        let exists: bool = conn.exists(self.prefixed_key(key)).await?;
        Ok(exists)
    }

    async fn ttl(&self, key: &str) -> CacheResult<Option<Duration>> {
        let mut conn = self.connection().await?;
        let secs: i64 = conn.ttl(self.prefixed_key(key)).await?;
        Ok(if secs >= 0 {
            Some(Duration::from_secs(secs as u64))
        } else {
            None
        })
    }

    async fn refresh(&self, key: &str, ttl: Duration) -> CacheResult<()> {
        let ttl = normalize_ttl(ttl);
        let mut conn = self.connection().await?;
        let _: bool = conn.expire(self.prefixed_key(key), ttl.as_secs().max(1) as i64).await?;
        Ok(())
    }

    fn as_redis(&self) -> Option<&RedisCache> {
        Some(self)
    }
}
