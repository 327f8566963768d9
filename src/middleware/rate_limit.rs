//! Per-IP rate limiting (§6, sketched only — not the focus of this design).
//!
//! The [`Cache`] trait has no atomic increment, so this is a best-effort
//! fixed-window counter: a concurrent burst from the same IP can race past
//! the limit by a handful of requests. Acceptable here since rate limiting
//! is a boundary concern, not a correctness property of the paste lifecycle.

use std::{net::SocketAddr, time::Duration};

use axum::{
    extract::{ConnectInfo, Request, State},
    http::{HeaderValue, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use crate::{cache::CacheKeys, AppState};

#[derive(Debug, Serialize)]
struct RateLimitBody {
    error: String,
    retry_after: u64,
}

pub struct RateLimitExceeded {
    limit: u32,
    remaining: u32,
    reset_secs: u64,
}

impl IntoResponse for RateLimitExceeded {
    fn into_response(self) -> Response {
        let body = RateLimitBody {
            error: "rate limit exceeded".to_string(),
            retry_after: self.reset_secs,
        };
        let mut response = (StatusCode::TOO_MANY_REQUESTS, Json(body)).into_response();
        let headers = response.headers_mut();
        if let Ok(v) = HeaderValue::try_from(self.limit.to_string()) {
            headers.insert("X-RateLimit-Limit", v);
        }
        if let Ok(v) = HeaderValue::try_from(self.remaining.to_string()) {
            headers.insert("X-RateLimit-Remaining", v);
        }
        if let Ok(v) = HeaderValue::try_from(self.reset_secs.to_string()) {
            let retry = v.clone();
            headers.insert("X-RateLimit-Reset", v);
            headers.insert("Retry-After", retry);
        }
        response
    }
}

/// Fixed-window IP rate limiter. Skips entirely when disabled in config.
pub async fn rate_limit_middleware(
    State(state): State<AppState>,
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
    req: Request,
    next: Next,
) -> Result<Response, RateLimitExceeded> {
    let rate_limit = &state.config.limits.rate_limit;
    if !rate_limit.enabled {
        return Ok(next.run(req).await);
    }

    let window_secs: u64 = 60;
    let window_start = (chrono::Utc::now().timestamp() as u64) / window_secs * window_secs;
    let key = CacheKeys::rate_limit_ip(&state.cache_key_prefix, &addr.ip().to_string(), window_start);

    let current = match state.cache.get(&key).await {
        Ok(Some(value)) => value.parse::<u32>().unwrap_or(0),
        Ok(None) => 0,
        Err(e) => {
            tracing::warn!(error = %e, "rate limit cache read failed, allowing request");
            return Ok(next.run(req).await);
        }
    };

    let reset_secs = window_start + window_secs - chrono::Utc::now().timestamp() as u64;
    let limit = rate_limit.requests_per_minute;

    if current >= limit {
        return Err(RateLimitExceeded {
            limit,
            remaining: 0,
            reset_secs,
        });
    }

    let next_count = current + 1;
    if let Err(e) = state
        .cache
        .set(&key, &next_count.to_string(), Duration::from_secs(window_secs))
        .await
    {
        tracing::warn!(error = %e, "rate limit cache write failed");
    }

    let mut response = next.run(req).await;
    let remaining = limit.saturating_sub(next_count);
    let headers = response.headers_mut();
    if let Ok(v) = HeaderValue::try_from(limit.to_string()) {
        headers.insert("X-RateLimit-Limit", v);
    }
    if let Ok(v) = HeaderValue::try_from(remaining.to_string()) {
        headers.insert("X-RateLimit-Remaining", v);
    }
    if let Ok(v) = HeaderValue::try_from(reset_secs.to_string()) {
        headers.insert("X-RateLimit-Reset", v);
    }

    Ok(response)
}
