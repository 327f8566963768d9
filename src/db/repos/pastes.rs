use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::{db::error::DbResult, models::PasteRecord};

/// The durable, queryable map from short ID to paste record (§4.5).
#[async_trait]
pub trait PasteRepo: Send + Sync {
    /// Insert a new record. Returns `DbError::Conflict` if `short_id` already exists.
    async fn create(&self, record: &PasteRecord) -> DbResult<()>;

    async fn get(&self, short_id: &str) -> DbResult<Option<PasteRecord>>;

    /// Delete a single record. Idempotent: deleting an absent id is not an error.
    async fn delete(&self, short_id: &str) -> DbResult<()>;

    /// Delete many records in one statement, returning the count actually removed.
    async fn delete_many(&self, short_ids: &[String]) -> DbResult<u64>;

    /// At most `limit` records whose `expires_at` is present and strictly
    /// before `now`. No ordering guarantee beyond "some subset".
    async fn get_expired_batch(&self, now: DateTime<Utc>, limit: u32) -> DbResult<Vec<PasteRecord>>;

    async fn count_expired(&self, now: DateTime<Utc>) -> DbResult<u64>;
}
