//! Key Generation Service (§4.2): a pre-allocated pool of unique Base62
//! short IDs. Uniqueness is delegated to the unique index on `key`, so
//! `reserve()` is a single atomic find-and-modify — lock-free under
//! contention. A background replenisher keeps the pool topped up.

mod replenisher;

pub use replenisher::start_replenisher;

use std::sync::Arc;

use rand::RngCore;
use thiserror::Error;
use tracing::warn;

use crate::{codec, db::KgsRepo};

#[derive(Debug, Error)]
pub enum KgsError {
    #[error("key pool exhausted")]
    NoKeysAvailable,

    #[error("database error: {0}")]
    Db(#[from] crate::db::DbError),
}

pub type KgsResult<T> = Result<T, KgsError>;

/// Attempts to insert `n` fresh random keys. Duplicates on the unique
/// index are silently skipped and retried up to `3n` attempts total.
/// Returns the count actually inserted.
pub async fn generate(repo: &Arc<dyn KgsRepo>, key_length: u8, n: u64) -> KgsResult<u64> {
    let max_attempts = n.saturating_mul(3).max(1);
    let mut inserted = 0u64;
    let mut attempts = 0u64;
    let mut rng = rand::thread_rng();

    while inserted < n && attempts < max_attempts {
        let batch_size = (n - inserted).min(max_attempts - attempts) as usize;
        let candidates: Vec<String> = (0..batch_size)
            .map(|_| random_candidate(&mut rng, key_length))
            .collect();
        attempts += batch_size as u64;

        let count = repo.insert_candidates(&candidates).await?;
        inserted += count;
    }

    Ok(inserted)
}

/// Atomically select some unused key, mark it used, and return it.
pub async fn reserve(repo: &Arc<dyn KgsRepo>) -> KgsResult<String> {
    match repo.reserve().await? {
        Some(key) => Ok(key),
        None => {
            warn!("KGS pool exhausted");
            Err(KgsError::NoKeysAvailable)
        }
    }
}

/// Sample a uniform integer in `[0, 62^L)` from a cryptographically strong
/// source, Base62-encode it, and left-pad to exactly `key_length` characters.
fn random_candidate(rng: &mut impl RngCore, key_length: u8) -> String {
    // u64 comfortably covers the default L=6 keyspace (62^6 ≈ 5.68e10);
    // for longer keys this samples from a narrower range than 62^L, which
    // only matters for L large enough to overflow u64 and is not a
    // supported configuration (validated to 1..=32, but practical L stays
    // well under 11).
    let n = rng.next_u64();
    codec::pad(&codec::encode(n), key_length as usize)
}

#[cfg(all(test, feature = "database-sqlite"))]
mod tests {
    use super::*;
    use crate::db::DbPool;

    async fn test_pool() -> DbPool {
        let pool = sqlx::sqlite::SqlitePoolOptions::new()
            .connect("sqlite::memory:")
            .await
            .unwrap();
        let db = DbPool::from_sqlite(pool);
        db.run_migrations().await.unwrap();
        db
    }

    #[tokio::test]
    async fn generate_then_reserve() {
        let db = test_pool().await;
        let repo = db.kgs_keys();
        let inserted = generate(&repo, 6, 10).await.unwrap();
        assert_eq!(inserted, 10);
        assert_eq!(repo.count_unused().await.unwrap(), 10);

        let key = reserve(&repo).await.unwrap();
        assert_eq!(key.len(), 6);
        assert_eq!(repo.count_unused().await.unwrap(), 9);
    }

    #[tokio::test]
    async fn reserve_on_empty_pool_errors() {
        let db = test_pool().await;
        let repo = db.kgs_keys();
        let err = reserve(&repo).await.unwrap_err();
        assert!(matches!(err, KgsError::NoKeysAvailable));
    }

    #[tokio::test]
    async fn concurrent_reserves_never_collide() {
        let db = test_pool().await;
        let repo = db.kgs_keys();
        generate(&repo, 6, 50).await.unwrap();

        let mut handles = Vec::new();
        for _ in 0..50 {
            let repo = repo.clone();
            handles.push(tokio::spawn(async move { reserve(&repo).await.unwrap() }));
        }
        let mut keys = Vec::new();
        for handle in handles {
            keys.push(handle.await.unwrap());
        }
        let distinct: std::collections::HashSet<_> = keys.iter().collect();
        assert_eq!(distinct.len(), 50);
    }
}
