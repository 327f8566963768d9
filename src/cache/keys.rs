/// Namespacing helper for cache keys, so a shared Redis instance doesn't
/// collide with other consumers.
pub struct CacheKeys;

impl CacheKeys {
    pub fn paste_content(prefix: &str, short_id: &str) -> String {
        format!("{prefix}:paste:{short_id}")
    }

    pub fn rate_limit_ip(prefix: &str, client_ip: &str, window_start: u64) -> String {
        format!("{prefix}:ratelimit:{client_ip}:{window_start}")
    }
}
