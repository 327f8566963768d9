use serde::{Deserialize, Serialize};

/// Hot-path cache backend selection.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "json-schema", derive(schemars::JsonSchema))]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum CacheConfig {
    Memory(MemoryCacheConfig),
    #[cfg(feature = "redis")]
    Redis(RedisCacheConfig),
}

impl Default for CacheConfig {
    fn default() -> Self {
        CacheConfig::Memory(MemoryCacheConfig::default())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "json-schema", derive(schemars::JsonSchema))]
#[serde(deny_unknown_fields)]
pub struct MemoryCacheConfig {
    /// Maximum number of entries held before LRU eviction kicks in.
    #[serde(default = "default_max_entries")]
    pub max_entries: usize,

    /// How often the cache sweeps for expired entries, in seconds.
    #[serde(default = "default_sweep_interval_secs")]
    pub sweep_interval_secs: u64,
}

impl Default for MemoryCacheConfig {
    fn default() -> Self {
        Self {
            max_entries: default_max_entries(),
            sweep_interval_secs: default_sweep_interval_secs(),
        }
    }
}

#[cfg(feature = "redis")]
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "json-schema", derive(schemars::JsonSchema))]
#[serde(deny_unknown_fields)]
pub struct RedisCacheConfig {
    /// Connection URL, e.g. `redis://localhost:6379`.
    pub url: String,

    /// Prefix prepended to every cache key, to namespace shared Redis instances.
    #[serde(default = "default_key_prefix")]
    pub key_prefix: String,
}

fn default_max_entries() -> usize {
    100_000
}

fn default_sweep_interval_secs() -> u64 {
    30
}

#[cfg_attr(not(feature = "redis"), allow(dead_code))]
fn default_key_prefix() -> String {
    "gisty".to_string()
}
