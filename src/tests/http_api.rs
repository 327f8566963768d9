use std::{net::SocketAddr, sync::Arc};

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use tower::ServiceExt;

use crate::{
    cache::{Cache, MemoryCache},
    config::MemoryCacheConfig,
    db::DbPool,
    kgs,
    paste::PasteService,
    store::{BlobStore, FilesystemBlobStore},
    AppState,
};

struct Harness {
    state: AppState,
    _tempdir: tempfile::TempDir,
}

async fn harness() -> Harness {
    harness_with_config({
        let mut config = crate::config::AppConfig::default();
        config.limits.rate_limit.enabled = false;
        config
    })
    .await
}

async fn harness_with_config(config: crate::config::AppConfig) -> Harness {
    let pool = sqlx::sqlite::SqlitePoolOptions::new()
        .connect("sqlite::memory:")
        .await
        .unwrap();
    let db = DbPool::from_sqlite(pool);
    db.run_migrations().await.unwrap();

    kgs::generate(&db.kgs_keys(), 6, 200).await.unwrap();

    let cache: Arc<dyn Cache> = Arc::new(MemoryCache::new(&MemoryCacheConfig {
        max_entries: 10_000,
        sweep_interval_secs: 30,
    }));

    let tempdir = tempfile::tempdir().unwrap();
    let store: Arc<dyn BlobStore> = Arc::new(
        FilesystemBlobStore::new(crate::config::FilesystemStorageConfig {
            root_dir: tempdir.path().to_string_lossy().to_string(),
            compression_level: 6,
        })
        .unwrap(),
    );

    let task_tracker = tokio_util::task::TaskTracker::new();

    let paste_service = Arc::new(PasteService::new(
        db.pastes(),
        db.kgs_keys(),
        Arc::clone(&cache),
        Arc::clone(&store),
        config.server.base_url.clone(),
        &config.kgs,
        &config.limits,
        "gisty".to_string(),
        task_tracker.clone(),
    ));

    let state = AppState {
        config: Arc::new(config),
        db: Arc::new(db),
        cache,
        store,
        paste_service,
        cache_key_prefix: "gisty".to_string(),
        task_tracker,
    };

    Harness {
        state,
        _tempdir: tempdir,
    }
}

fn router(state: &AppState) -> Router {
    crate::app(state.clone())
}

async fn send(router: Router, req: Request<Body>) -> (StatusCode, Value) {
    let mut req = req;
    req.extensions_mut()
        .insert(axum::extract::ConnectInfo(SocketAddr::from(([127, 0, 0, 1], 0))));
    let response = router.oneshot(req).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body: Value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };
    (status, body)
}

fn post_pastes(body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/api/v1/pastes")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn get_paste_json(short_id: &str) -> Request<Body> {
    Request::builder()
        .method("GET")
        .uri(format!("/api/v1/pastes/{short_id}"))
        .body(Body::empty())
        .unwrap()
}

#[tokio::test]
async fn round_trip_ascii_content() {
    let h = harness().await;

    let (status, body) = send(
        router(&h.state),
        post_pastes(json!({
            "content": "Hello, World!",
            "syntax_type": "plaintext",
            "expires_in": "1h",
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let short_id = body["short_id"].as_str().unwrap().to_string();
    assert!(body["expires_at"].is_string());

    let (status, body) = send(router(&h.state), get_paste_json(&short_id)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["content"], "Hello, World!");
    assert_eq!(body["syntax_type"], "plaintext");
}

#[tokio::test]
async fn burn_after_read_purges_after_first_read() {
    let h = harness().await;

    let (status, body) = send(
        router(&h.state),
        post_pastes(json!({"content": "secret", "expires_in": "burn"})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let short_id = body["short_id"].as_str().unwrap().to_string();

    let (status, body) = send(router(&h.state), get_paste_json(&short_id)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["content"], "secret");

    // Settle the fire-and-forget purge spawned on the service's task tracker.
    h.state.task_tracker.close();
    h.state.task_tracker.wait().await;

    let (status, _) = send(router(&h.state), get_paste_json(&short_id)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn time_expiry_returns_gone() {
    let h = harness().await;

    let (status, body) = send(
        router(&h.state),
        post_pastes(json!({"content": "gone soon", "expires_in": "1s"})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let short_id = body["short_id"].as_str().unwrap().to_string();

    let (status, _) = send(router(&h.state), get_paste_json(&short_id)).await;
    assert_eq!(status, StatusCode::OK);

    tokio::time::sleep(std::time::Duration::from_millis(1100)).await;

    let (status, body) = send(router(&h.state), get_paste_json(&short_id)).await;
    assert_eq!(status, StatusCode::GONE);
    assert_eq!(body["error"], "Paste has expired");
}

#[tokio::test]
async fn language_auto_detect_from_content() {
    let h = harness().await;

    let (status, body) = send(
        router(&h.state),
        post_pastes(json!({"content": "def hello():\n    print('hi')"})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let short_id = body["short_id"].as_str().unwrap().to_string();

    let (_, body) = send(router(&h.state), get_paste_json(&short_id)).await;
    assert_eq!(body["syntax_type"], "python");
}

#[tokio::test]
async fn concurrent_creates_never_collide() {
    let h = harness().await;

    let mut handles = Vec::new();
    for _ in 0..50 {
        let r = router(&h.state);
        handles.push(tokio::spawn(async move {
            let (status, body) = send(
                r,
                post_pastes(json!({"content": "same content for everyone"})),
            )
            .await;
            assert_eq!(status, StatusCode::CREATED);
            body["short_id"].as_str().unwrap().to_string()
        }));
    }

    let mut ids = Vec::new();
    for handle in handles {
        ids.push(handle.await.unwrap());
    }
    let distinct: std::collections::HashSet<_> = ids.iter().collect();
    assert_eq!(distinct.len(), 50);
}

#[tokio::test]
async fn empty_content_is_rejected() {
    let h = harness().await;
    let (status, body) = send(router(&h.state), post_pastes(json!({"content": ""}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "content must not be empty");
}

#[tokio::test]
async fn oversize_content_is_rejected() {
    let h = harness().await;
    let content = "a".repeat(1024 * 1024 + 1);
    let (status, body) = send(router(&h.state), post_pastes(json!({"content": content}))).await;
    assert_eq!(status, StatusCode::PAYLOAD_TOO_LARGE);
    assert_eq!(body["max_size"], "1MB");
}

#[tokio::test]
async fn exactly_max_size_is_accepted() {
    let h = harness().await;
    let content = "a".repeat(1024 * 1024);
    let (status, _) = send(router(&h.state), post_pastes(json!({"content": content}))).await;
    assert_eq!(status, StatusCode::CREATED);
}

#[tokio::test]
async fn rate_limit_kicks_in_past_the_configured_window() {
    let mut config = crate::config::AppConfig::default();
    config.limits.rate_limit.enabled = true;
    config.limits.rate_limit.requests_per_minute = 2;
    let h = harness_with_config(config).await;

    for _ in 0..2 {
        let (status, _) = send(router(&h.state), post_pastes(json!({"content": "x"}))).await;
        assert_eq!(status, StatusCode::CREATED);
    }

    let (status, body) = send(router(&h.state), post_pastes(json!({"content": "x"}))).await;
    assert_eq!(status, StatusCode::TOO_MANY_REQUESTS);
    assert!(body["retry_after"].is_number());
}

#[tokio::test]
async fn whitelist_boundary_go_and_golang_accepted_brainfuck_rejected() {
    let h = harness().await;

    for syntax in ["go", "golang"] {
        let (status, _) = send(
            router(&h.state),
            post_pastes(json!({"content": "x", "syntax_type": syntax})),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED, "{syntax} should be accepted");
    }

    let (status, body) = send(
        router(&h.state),
        post_pastes(json!({"content": "x", "syntax_type": "brainfuck"})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        body["error"],
        "syntax type is not in the supported whitelist"
    );
}

#[tokio::test]
async fn garbage_expires_in_is_rejected() {
    let h = harness().await;
    let (status, body) = send(
        router(&h.state),
        post_pastes(json!({"content": "x", "expires_in": "not-a-duration"})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "expires_in could not be parsed");
}

#[tokio::test]
async fn delete_then_get_is_not_found() {
    let h = harness().await;

    let (_, body) = send(router(&h.state), post_pastes(json!({"content": "bye"}))).await;
    let short_id = body["short_id"].as_str().unwrap().to_string();

    let req = Request::builder()
        .method("DELETE")
        .uri(format!("/api/v1/pastes/{short_id}"))
        .body(Body::empty())
        .unwrap();
    let (status, _) = send(router(&h.state), req).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, _) = send(router(&h.state), get_paste_json(&short_id)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn content_negotiated_get_returns_plaintext_by_default() {
    let h = harness().await;
    let (_, body) = send(
        router(&h.state),
        post_pastes(json!({"content": "raw text", "syntax_type": "plaintext"})),
    )
    .await;
    let short_id = body["short_id"].as_str().unwrap().to_string();

    let req = Request::builder()
        .method("GET")
        .uri(format!("/{short_id}"))
        .body(Body::empty())
        .unwrap();
    let mut req = req;
    req.extensions_mut()
        .insert(axum::extract::ConnectInfo(SocketAddr::from(([127, 0, 0, 1], 0))));
    let response = router(&h.state).oneshot(req).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers().get("x-syntax-type").unwrap(),
        "plaintext"
    );
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    assert_eq!(&bytes[..], b"raw text");
}

#[tokio::test]
async fn health_endpoint_reports_healthy() {
    let h = harness().await;
    let req = Request::builder()
        .uri("/health")
        .body(Body::empty())
        .unwrap();
    let (status, body) = send(router(&h.state), req).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
}
