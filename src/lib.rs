//! Gisty: a snippet-sharing service.
//!
//! A short opaque identifier stands for an arbitrary blob of text (a
//! "paste") that may expire by wall-clock deadline or by first read. This
//! crate is the storage and lifecycle engine: the Key Generation Service
//! (§4.2), the three-tier storage path (§4.3-4.5), the paste orchestrator
//! (§4.6), and the background reaper (§4.8), plus the HTTP boundary (§6)
//! that fronts them.

pub mod cache;
pub mod codec;
pub mod config;
pub mod db;
pub mod kgs;
pub mod middleware;
pub mod models;
pub mod observability;
pub mod paste;
pub mod reaper;
pub mod routes;
pub mod sniffer;
pub mod store;

#[cfg(test)]
mod tests;

use std::sync::Arc;

use tokio_util::task::TaskTracker;

use crate::{cache::Cache, config::AppConfig, db::DbPool, paste::PasteService, store::BlobStore};

/// Shared, process-wide handles injected into every request handler (§9
/// "Global clients as injected handles"). Cheaply `Clone`-able: every field
/// is either an `Arc`, a handle type that is itself cheap to clone, or a
/// plain `String`.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub db: Arc<DbPool>,
    pub cache: Arc<dyn Cache>,
    pub store: Arc<dyn BlobStore>,
    pub paste_service: Arc<PasteService>,
    pub cache_key_prefix: String,
    pub task_tracker: TaskTracker,
}

/// Errors that can occur while assembling application state from config.
#[derive(Debug, thiserror::Error)]
pub enum StartupError {
    #[error("config error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("database error: {0}")]
    Db(#[from] db::DbError),

    #[error("cache error: {0}")]
    Cache(#[from] cache::CacheError),

    #[error("blob store error: {0}")]
    Store(#[from] store::BlobError),
}

const CACHE_KEY_PREFIX: &str = "gisty";

impl AppState {
    /// Build application state from a loaded configuration: connect the
    /// metadata index, construct the cache and blob store adapters, and run
    /// pending migrations. Does not start the background KGS replenisher or
    /// reaper tasks — the caller spawns those once state is ready.
    pub async fn new(config: AppConfig) -> Result<Self, StartupError> {
        let db = DbPool::from_config(&config.database).await?;
        db.run_migrations().await?;

        let cache = cache::build_cache(&config.cache)?;
        let store = store::build_store(&config.storage).await?;
        let task_tracker = TaskTracker::new();

        let paste_service = Arc::new(PasteService::new(
            db.pastes(),
            db.kgs_keys(),
            Arc::clone(&cache),
            Arc::clone(&store),
            config.server.base_url.clone(),
            &config.kgs,
            &config.limits,
            CACHE_KEY_PREFIX.to_string(),
            task_tracker.clone(),
        ));

        Ok(Self {
            config: Arc::new(config),
            db: Arc::new(db),
            cache,
            store,
            paste_service,
            cache_key_prefix: CACHE_KEY_PREFIX.to_string(),
            task_tracker,
        })
    }
}

/// Assemble the full axum application: routes, middleware, and state (§6.1).
///
/// CORS is permissive for the allowed methods and exposes the rate-limit
/// and metadata headers a client may want to read. Tracing wraps every
/// request/response. The rate limiter is applied only to the create route,
/// per §6.1 ("Per-IP rate limit: default 5 req/min on POST").
pub fn app(state: AppState) -> axum::Router {
    use axum::http::{header, HeaderName, Method};
    use tower_http::cors::CorsLayer;
    use tower_http::trace::TraceLayer;

    let exposed_headers = [
        HeaderName::from_static("x-ratelimit-limit"),
        HeaderName::from_static("x-ratelimit-remaining"),
        HeaderName::from_static("x-ratelimit-reset"),
        HeaderName::from_static("x-syntax-type"),
        HeaderName::from_static("x-created-at"),
        HeaderName::from_static("x-expires-at"),
    ];

    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::DELETE])
        .allow_headers([header::CONTENT_TYPE, header::ACCEPT])
        .expose_headers(exposed_headers)
        .allow_origin(tower_http::cors::Any);

    let create_route = axum::Router::new()
        .route("/api/v1/pastes", axum::routing::post(routes::pastes::create_paste))
        .route_layer(axum::middleware::from_fn_with_state(
            state.clone(),
            middleware::rate_limit_middleware,
        ));

    routes::router()
        .merge(create_route)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
