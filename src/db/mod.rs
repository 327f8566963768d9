mod error;
#[cfg(feature = "database-postgres")]
pub mod postgres;
pub mod repos;
#[cfg(feature = "database-sqlite")]
pub mod sqlite;

use std::sync::Arc;

pub use error::{DbError, DbResult};
pub use repos::{KgsRepo, PasteRepo};

use crate::config::DatabaseConfig;

/// Cached repository trait objects, created once at construction.
struct CachedRepos {
    pastes: Arc<dyn PasteRepo>,
    kgs_keys: Arc<dyn KgsRepo>,
}

enum PoolStorage {
    #[cfg(feature = "database-sqlite")]
    Sqlite(sqlx::SqlitePool),
    #[cfg(feature = "database-postgres")]
    Postgres(sqlx::PgPool),
    #[cfg(not(any(feature = "database-sqlite", feature = "database-postgres")))]
    _None(std::convert::Infallible),
}

/// The metadata index: a durable, queryable map from short ID to paste
/// record, backed by either SQLite or PostgreSQL.
///
/// Repositories are cached at construction time to avoid allocation on each access.
pub struct DbPool {
    inner: PoolStorage,
    repos: CachedRepos,
}

impl DbPool {
    /// Create a `DbPool` from an existing SQLite pool. Primarily useful for testing.
    #[cfg(feature = "database-sqlite")]
    pub fn from_sqlite(pool: sqlx::SqlitePool) -> Self {
        let repos = CachedRepos {
            pastes: Arc::new(sqlite::SqlitePasteRepo::new(pool.clone())),
            kgs_keys: Arc::new(sqlite::SqliteKgsRepo::new(pool.clone())),
        };
        DbPool {
            inner: PoolStorage::Sqlite(pool),
            repos,
        }
    }

    /// Create a `DbPool` from an existing PostgreSQL pool. Primarily useful for testing.
    #[cfg(feature = "database-postgres")]
    pub fn from_postgres(pool: sqlx::PgPool) -> Self {
        let repos = CachedRepos {
            pastes: Arc::new(postgres::PostgresPasteRepo::new(pool.clone())),
            kgs_keys: Arc::new(postgres::PostgresKgsRepo::new(pool.clone())),
        };
        DbPool {
            inner: PoolStorage::Postgres(pool),
            repos,
        }
    }

    /// Build a `DbPool` from application configuration, establishing the
    /// connection pool for the configured backend.
    pub async fn from_config(config: &DatabaseConfig) -> DbResult<Self> {
        match config {
            DatabaseConfig::None => Err(DbError::NotConfigured),
            #[cfg(feature = "database-sqlite")]
            DatabaseConfig::Sqlite(cfg) => {
                let connect_opts = sqlx::sqlite::SqliteConnectOptions::new()
                    .filename(&cfg.path)
                    .create_if_missing(cfg.create_if_missing)
                    .busy_timeout(std::time::Duration::from_millis(cfg.busy_timeout_ms))
                    .journal_mode(if cfg.wal_mode {
                        sqlx::sqlite::SqliteJournalMode::Wal
                    } else {
                        sqlx::sqlite::SqliteJournalMode::Delete
                    });
                let pool = sqlx::sqlite::SqlitePoolOptions::new()
                    .max_connections(cfg.max_connections)
                    .connect_with(connect_opts)
                    .await?;
                Ok(Self::from_sqlite(pool))
            }
            #[cfg(feature = "database-postgres")]
            DatabaseConfig::Postgres(cfg) => {
                let pool = sqlx::postgres::PgPoolOptions::new()
                    .min_connections(cfg.min_connections)
                    .max_connections(cfg.max_connections)
                    .connect(&cfg.url)
                    .await?;
                Ok(Self::from_postgres(pool))
            }
        }
    }

    /// Run database migrations using sqlx's migration runner. This
    /// automatically creates and manages a `_sqlx_migrations` table.
    pub async fn run_migrations(&self) -> DbResult<()> {
        match &self.inner {
            #[cfg(feature = "database-sqlite")]
            PoolStorage::Sqlite(pool) => {
                tracing::info!("running sqlite migrations");
                sqlx::migrate!("./migrations_sqlx/sqlite").run(pool).await?;
                Ok(())
            }
            #[cfg(feature = "database-postgres")]
            PoolStorage::Postgres(pool) => {
                tracing::info!("running postgres migrations");
                sqlx::migrate!("./migrations_sqlx/postgres").run(pool).await?;
                Ok(())
            }
            #[cfg(not(any(feature = "database-sqlite", feature = "database-postgres")))]
            PoolStorage::_None(infallible) => match *infallible {},
        }
    }

    pub fn pastes(&self) -> Arc<dyn PasteRepo> {
        Arc::clone(&self.repos.pastes)
    }

    pub fn kgs_keys(&self) -> Arc<dyn KgsRepo> {
        Arc::clone(&self.repos.kgs_keys)
    }

    /// Health check for database connectivity.
    pub async fn health_check(&self) -> DbResult<()> {
        match &self.inner {
            #[cfg(feature = "database-sqlite")]
            PoolStorage::Sqlite(pool) => {
                sqlx::query("SELECT 1").execute(pool).await?;
                Ok(())
            }
            #[cfg(feature = "database-postgres")]
            PoolStorage::Postgres(pool) => {
                sqlx::query("SELECT 1").execute(pool).await?;
                Ok(())
            }
            #[cfg(not(any(feature = "database-sqlite", feature = "database-postgres")))]
            PoolStorage::_None(infallible) => match *infallible {},
        }
    }
}
