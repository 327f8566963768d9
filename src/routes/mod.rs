//! HTTP boundary (§6): route wiring, request/response DTOs, and error mapping.

pub mod dto;
pub mod error;
pub mod health;
pub mod pastes;

use axum::{routing::get, Router};

use crate::AppState;

/// Assemble the route tree (§6.1), except `POST /api/v1/pastes`: that route
/// carries the rate-limit middleware and is wired in by [`crate::app`] so it
/// can be layered without double-registering the path.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/health", get(health::health_check))
        .route(
            "/api/v1/pastes/{short_id}",
            get(pastes::get_paste_json).delete(pastes::delete_paste),
        )
        .route("/{short_id}", get(pastes::get_paste_negotiated))
}
