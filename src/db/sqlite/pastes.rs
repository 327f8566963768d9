use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{Row, SqlitePool};

use crate::{
    db::{
        error::{DbError, DbResult},
        repos::PasteRepo,
    },
    models::PasteRecord,
};

pub struct SqlitePasteRepo {
    pool: SqlitePool,
}

impl SqlitePasteRepo {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    fn parse_record(row: &sqlx::sqlite::SqliteRow) -> DbResult<PasteRecord> {
        Ok(PasteRecord {
            short_id: row.get("short_id"),
            content_key: row.get("content_key"),
            created_at: row.get("created_at"),
            expires_at: row.get("expires_at"),
            burn_after_read: row.get::<i64, _>("burn_after_read") != 0,
            syntax_type: row.get("syntax_type"),
            is_private: row.get::<i64, _>("is_private") != 0,
            user_id: row.get("user_id"),
        })
    }
}

#[async_trait]
impl PasteRepo for SqlitePasteRepo {
    async fn create(&self, record: &PasteRecord) -> DbResult<()> {
        let result = sqlx::query(
            r#"
            INSERT INTO pastes
                (short_id, content_key, created_at, expires_at, burn_after_read, syntax_type, is_private, user_id)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&record.short_id)
        .bind(&record.content_key)
        .bind(record.created_at)
        .bind(record.expires_at)
        .bind(record.burn_after_read as i64)
        .bind(&record.syntax_type)
        .bind(record.is_private as i64)
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
            FROM pastes WHERE short_id = ?
            "#,
        )
        .bind(short_id)
        .fetch_optional(&self.pool)
        .await?;

        row.as_ref().map(Self::parse_record).transpose()
    }

    async fn delete(&self, short_id: &str) -> DbResult<()> {
        sqlx::query("DELETE FROM pastes WHERE short_id = ?")
            .bind(short_id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn delete_many(&self, short_ids: &[String]) -> DbResult<u64> {
        if short_ids.is_empty() {
            return Ok(0);
        }
        let placeholders = short_ids.iter().map(|_| "?").collect::<Vec<_>>().join(",");
        let query = format!("DELETE FROM pastes WHERE short_id IN ({placeholders})");
        let mut q = sqlx::query(&query);
        for id in short_ids {
            q = q.bind(id);
        }
        let result = q.execute(&self.pool).await?;
        Ok(result.rows_affected())
    }

    async fn get_expired_batch(&self, now: DateTime<Utc>, limit: u32) -> DbResult<Vec<PasteRecord>> {
        let rows = sqlx::query(
            r#"
            SELECT short_id, content_key, created_at, expires_at, burn_after_read,
                   syntax_type, is_private, user_id
            FROM pastes
            WHERE expires_at IS NOT NULL AND expires_at < ?
            LIMIT ?
            "#,
        )
        .bind(now)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(Self::parse_record).collect()
    }

    async fn count_expired(&self, now: DateTime<Utc>) -> DbResult<u64> {
        let row = sqlx::query(
            "SELECT COUNT(*) as cnt FROM pastes WHERE expires_at IS NOT NULL AND expires_at < ?",
        )
        .bind(now)
        .fetch_one(&self.pool)
        .await?;
        Ok(row.get::<i64, _>("cnt") as u64)
    }
}
