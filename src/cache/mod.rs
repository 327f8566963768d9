//! Time-bounded in-memory key-value store with TTL semantics (§4.4).
//!
//! The cache is strictly a subordinate of the metadata index and blob
//! store: writers never update it before committing durable state, and
//! deleters invalidate it before or concurrent with durable deletion.

mod error;
mod keys;
mod memory;
#[cfg(feature = "redis")]
mod redis;
mod traits;

pub use error::{CacheError, CacheResult};
pub use keys::CacheKeys;
pub use memory::MemoryCache;
#[cfg(feature = "redis")]
pub use redis::RedisCache;
pub use traits::{Cache, DEFAULT_TTL};

use crate::config::CacheConfig;
use std::sync::Arc;

/// Construct the configured cache backend.
pub fn build_cache(config: &CacheConfig) -> CacheResult<Arc<dyn Cache>> {
    match config {
        CacheConfig::Memory(cfg) => Ok(Arc::new(MemoryCache::new(cfg))),
        #[cfg(feature = "redis")]
        CacheConfig::Redis(cfg) => Ok(Arc::new(RedisCache::new(cfg)?)),
    }
}
