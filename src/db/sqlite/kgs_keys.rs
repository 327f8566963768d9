use async_trait::async_trait;
use chrono::Utc;
use sqlx::{Row, SqlitePool};

use crate::db::{error::DbResult, repos::KgsRepo};

pub struct SqliteKgsRepo {
    pool: SqlitePool,
}

impl SqliteKgsRepo {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl KgsRepo for SqliteKgsRepo {
    async fn reserve(&self) -> DbResult<Option<String>> {
        let now = Utc::now();
        let row = sqlx::query(
            r#"
            UPDATE kgs_keys
            SET used = 1, used_at = ?
            WHERE key = (SELECT key FROM kgs_keys WHERE used = 0 LIMIT 1)
            RETURNING key
            "#,
        )
        .bind(now)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(|r| r.get::<String, _>("key")))
    }

    async fn insert_candidates(&self, keys: &[String]) -> DbResult<u64> {
        let now = Utc::now();
        let mut inserted = 0u64;
        for key in keys {
            let result = sqlx::query(
                "INSERT INTO kgs_keys (key, used, created_at) VALUES (?, 0, ?) ON CONFLICT(key) DO NOTHING",
            )
            .bind(key)
            .bind(now)
            .execute(&self.pool)
            .await?;
            inserted += result.rows_affected();
        }
        Ok(inserted)
    }

    async fn count_unused(&self) -> DbResult<u64> {
        let row = sqlx::query("SELECT COUNT(*) as cnt FROM kgs_keys WHERE used = 0")
            .fetch_one(&self.pool)
            .await?;
        Ok(row.get::<i64, _>("cnt") as u64)
    }
}
