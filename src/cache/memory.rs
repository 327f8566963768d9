use std::{
    sync::Arc,
    time::{Duration, Instant},
};

use async_trait::async_trait;
use dashmap::DashMap;

use super::{
    error::CacheResult,
    traits::{normalize_ttl, Cache},
};
use crate::config::MemoryCacheConfig;

struct CacheEntry {
    data: String,
    expires_at: Instant,
    last_accessed: Instant,
}

impl CacheEntry {
    fn new(data: String, ttl: Duration) -> Self {
        let now = Instant::now();
        Self {
            data,
            expires_at: now + ttl,
            last_accessed: now,
        }
    }

    fn is_expired(&self) -> bool {
        Instant::now() > self.expires_at
    }

    fn touch(&mut self) {
        self.last_accessed = Instant::now();
    }

    fn remaining(&self) -> Duration {
        self.expires_at.saturating_duration_since(Instant::now())
    }
}

/// In-memory cache backed by a [`DashMap`] for concurrent access, with
/// expiry-then-LRU eviction once `max_entries` is reached.
///
/// Not suitable for multi-node deployments: each node maintains its own
/// independent cache, so invalidation on one node is invisible to others.
/// Use the Redis backend for shared state across nodes.
pub struct MemoryCache {
    data: Arc<DashMap<String, CacheEntry>>,
    max_entries: usize,
}

impl MemoryCache {
    pub fn new(config: &MemoryCacheConfig) -> Self {
        Self {
            data: Arc::new(DashMap::new()),
            max_entries: config.max_entries,
        }
    }

    fn evict_if_needed(&self) {
        if self.data.len() < self.max_entries {
            return;
        }

        self.data.retain(|_, entry| !entry.is_expired());

        let current_len = self.data.len();
        if current_len < self.max_entries {
            return;
        }

        let mut entries: Vec<_> = self
            .data
            .iter()
            .map(|entry| (entry.key().clone(), entry.last_accessed))
            .collect();
        entries.sort_by_key(|(_, last_accessed)| *last_accessed);

        let to_evict = current_len - self.max_entries + 1;
        for (key, _) in entries.into_iter().take(to_evict) {
            self.data.remove(&key);
        }
    }
}

#[async_trait]
impl Cache for MemoryCache {
    async fn set(&self, key: &str, content: &str, ttl: Duration) -> CacheResult<()> {
        self.evict_if_needed();
        let ttl = normalize_ttl(ttl);
        self.data
            .insert(key.to_string(), CacheEntry::new(content.to_string(), ttl));
        Ok(())
    }

    async fn get(&self, key: &str) -> CacheResult<Option<String>> {
        if let Some(mut entry) = self.data.get_mut(key) {
            if entry.is_expired() {
                drop(entry);
                self.data.remove(key);
                return Ok(None);
            }
            entry.touch();
            Ok(Some(entry.data.clone()))
        } else {
            Ok(None)
        }
    }

    async fn delete(&self, key: &str) -> CacheResult<()> {
        self.data.remove(key);
        Ok(())
    }

    async fn exists(&self, key: &str) -> CacheResult<bool> {
        Ok(self.get(key).await?.is_some())
    }

    async fn ttl(&self, key: &str) -> CacheResult<Option<Duration>> {
        Ok(self.data.get(key).and_then(|entry| {
            if entry.is_expired() {
                None
            } else {
                Some(entry.remaining())
            }
        }))
    }

    async fn refresh(&self, key: &str, ttl: Duration) -> CacheResult<()> {
        let ttl = normalize_ttl(ttl);
        if let Some(mut entry) = self.data.get_mut(key) {
            entry.expires_at = Instant::now() + ttl;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cache() -> MemoryCache {
        MemoryCache::new(&MemoryCacheConfig {
            max_entries: 4,
            sweep_interval_secs: 30,
        })
    }

    #[tokio::test]
    async fn set_then_get_round_trips() {
        let cache = cache();
        cache.set("a", "hello", Duration::from_secs(60)).await.unwrap();
        assert_eq!(cache.get("a").await.unwrap(), Some("hello".to_string()));
    }

    #[tokio::test]
    async fn missing_key_is_none() {
        let cache = cache();
        assert_eq!(cache.get("missing").await.unwrap(), None);
        assert!(!cache.exists("missing").await.unwrap());
    }

    #[tokio::test]
    async fn delete_removes_entry() {
        let cache = cache();
        cache.set("a", "hello", Duration::from_secs(60)).await.unwrap();
        cache.delete("a").await.unwrap();
        assert!(!cache.exists("a").await.unwrap());
    }

    #[tokio::test]
    async fn zero_ttl_falls_back_to_default() {
        let cache = cache();
        cache.set("a", "hello", Duration::ZERO).await.unwrap();
        let remaining = cache.ttl("a").await.unwrap().unwrap();
        assert!(remaining > Duration::from_secs(3500));
    }

    #[tokio::test]
    async fn expired_entry_reads_as_miss() {
        let cache = cache();
        cache.set("a", "hello", Duration::from_millis(10)).await.unwrap();
        tokio::time::sleep(Duration::from_millis(30)).await;
        assert_eq!(cache.get("a").await.unwrap(), None);
    }

    #[tokio::test]
    async fn lru_eviction_under_pressure() {
        let cache = cache();
        for i in 0..4 {
            cache
                .set(&format!("k{i}"), "v", Duration::from_secs(60))
                .await
                .unwrap();
        }
        // k0 is the oldest; inserting a 5th entry should evict it.
        cache.set("k4", "v", Duration::from_secs(60)).await.unwrap();
        assert!(!cache.exists("k0").await.unwrap());
        assert!(cache.exists("k4").await.unwrap());
    }
}
