use serde::{Deserialize, Serialize};

/// Request size limits and rate limiting.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "json-schema", derive(schemars::JsonSchema))]
#[serde(deny_unknown_fields)]
pub struct LimitsConfig {
    /// Maximum accepted size of a paste's raw content, in bytes.
    #[serde(default = "default_max_content_bytes")]
    pub max_content_bytes: usize,

    /// Default cache TTL applied to a paste's hot-path cache entry, in seconds.
    #[serde(default = "default_cache_ttl_secs")]
    pub default_cache_ttl_secs: u64,

    #[serde(default)]
    pub rate_limit: RateLimitConfig,
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            max_content_bytes: default_max_content_bytes(),
            default_cache_ttl_secs: default_cache_ttl_secs(),
            rate_limit: RateLimitConfig::default(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "json-schema", derive(schemars::JsonSchema))]
#[serde(deny_unknown_fields)]
pub struct RateLimitConfig {
    #[serde(default = "default_rate_limit_enabled")]
    pub enabled: bool,

    /// Allowed requests per client per window.
    #[serde(default = "default_requests_per_minute")]
    pub requests_per_minute: u32,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            enabled: default_rate_limit_enabled(),
            requests_per_minute: default_requests_per_minute(),
        }
    }
}

fn default_max_content_bytes() -> usize {
    1024 * 1024
}

fn default_cache_ttl_secs() -> u64 {
    3600
}

fn default_rate_limit_enabled() -> bool {
    true
}

fn default_requests_per_minute() -> u32 {
    5
}
