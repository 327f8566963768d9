use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{PgPool, Row};

use crate::{
    db::{
        error::{DbError, DbResult},
        repos::PasteRepo,
    },
    models::PasteRecord,
};

pub struct PostgresPasteRepo {
    pool: PgPool,
}

impl PostgresPasteRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    fn parse_record(row: &sqlx::postgres::PgRow) -> DbResult<PasteRecord> {
        Ok(PasteRecord {
            short_id: row.get("short_id"),
            content_key: row.get("content_key"),
            created_at: row.get("created_at"),
            expires_at: row.get("expires_at"),
            burn_after_read: row.get("burn_after_read"),
            syntax_type: row.get("syntax_type"),
            is_private: row.get("is_private"),
            user_id: row.get("user_id"),
        })
    }
}

#[async_trait]
impl PasteRepo for PostgresPasteRepo {
    async fn create(&self, record: &PasteRecord) -> DbResult<()> {
        let result = sqlx::query(
            r#"
            INSERT INTO pastes
                (short_id, content_key, created_at, expires_at, burn_after_read, syntax_type, is_private, user_id)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            "#,
        )
        .bind(&record.short_id)
        .bind(&record.content_key)
        .bind(record.created_at)
        .bind(record.expires_at)
        .bind(record.burn_after_read)
        .bind(&record.syntax_type)
        .bind(record.is_private)
        .bind(&record.user_id)
        .execute(&self.pool)
        .await;

        match result {
            Ok(_) => Ok(()),
            Err(sqlx::Error::Database(db_err)) if db_err.is_unique_violation() => Err(
                DbError::Conflict(format!("short_id {} already exists", record.short_id)),
            ),
            Err(e) => Err(e.into()),
        }
    }

    async fn get(&self, short_id: &str) -> DbResult<Option<PasteRecord>> {
        let row = sqlx::query(
            r#"
            SELECT short_id, content_key, created_at, expires_at, burn_after_read,
                   syntax_type, is_private, user_id
            FROM pastes WHERE short_id = $1
            "#,
        )
        .bind(short_id)
        .fetch_optional(&self.pool)
        .await?;

        row.as_ref().map(Self::parse_record).transpose()
    }

    async fn delete(&self, short_id: &str) -> DbResult<()> {
        sqlx::query("DELETE FROM pastes WHERE short_id = $1")
            .bind(short_id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn delete_many(&self, short_ids: &[String]) -> DbResult<u64> {
        if short_ids.is_empty() {
            return Ok(0);
        }
        let result = sqlx::query("DELETE FROM pastes WHERE short_id = ANY($1)")
            .bind(short_ids)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected())
    }

    async fn get_expired_batch(&self, now: DateTime<Utc>, limit: u32) -> DbResult<Vec<PasteRecord>> {
        let rows = sqlx::query(
            r#"
            SELECT short_id, content_key, created_at, expires_at, burn_after_read,
                   syntax_type, is_private, user_id
            FROM pastes
            WHERE expires_at IS NOT NULL AND expires_at < $1
            LIMIT $2
            "#,
        )
        .bind(now)
        .bind(limit as i64)
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(Self::parse_record).collect()
    }

    async fn count_expired(&self, now: DateTime<Utc>) -> DbResult<u64> {
        let row: (i64,) = sqlx::query_as(
            "SELECT COUNT(*) FROM pastes WHERE expires_at IS NOT NULL AND expires_at < $1",
        )
        .bind(now)
        .fetch_one(&self.pool)
        .await?;
        Ok(row.0 as u64)
    }
}
