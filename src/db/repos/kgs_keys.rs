use async_trait::async_trait;

use crate::db::error::DbResult;

/// Backing store for the Key Generation Service's pool of pre-allocated keys (§4.2).
#[async_trait]
pub trait KgsRepo: Send + Sync {
    /// Atomically select some unused key, mark it used, and return it.
    /// Returns `None` when the pool is empty.
    async fn reserve(&self) -> DbResult<Option<String>>;

    /// Insert `keys` as fresh unused candidates. Duplicates on the unique
    /// index are silently skipped. Returns the count actually inserted.
    async fn insert_candidates(&self, keys: &[String]) -> DbResult<u64>;

    async fn count_unused(&self) -> DbResult<u64>;
}
