use async_trait::async_trait;
use chrono::Utc;
use sqlx::{PgPool, Row};

use crate::db::{error::DbResult, repos::KgsRepo};

pub struct PostgresKgsRepo {
    pool: PgPool,
}

impl PostgresKgsRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl KgsRepo for PostgresKgsRepo {
    async fn reserve(&self) -> DbResult<Option<String>> {
        let now = Utc::now();
        let row = sqlx::query(
            r#"
            UPDATE kgs_keys
            SET used = true, used_at = $1
            WHERE key = (
                SELECT key FROM kgs_keys WHERE used = false LIMIT 1 FOR UPDATE SKIP LOCKED
            )
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
        let result = sqlx::query(
            r#"
            INSERT INTO kgs_keys (key, used, created_at)
            SELECT * FROM UNNEST($1::text[], $2::bool[], $3::timestamptz[])
            ON CONFLICT (key) DO NOTHING
            "#,
        )
        .bind(keys)
        .bind(vec![false; keys.len()])
        .bind(vec![now; keys.len()])
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected())
    }

    async fn count_unused(&self) -> DbResult<u64> {
        let row: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM kgs_keys WHERE used = false")
            .fetch_one(&self.pool)
            .await?;
        Ok(row.0 as u64)
    }
}
