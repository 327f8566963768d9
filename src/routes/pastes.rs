//! `/api/v1/pastes` and the content-negotiated `/:id` shorthand (§6.1).

use axum::{
    extract::{Path, State},
    http::{header, HeaderMap, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};

use super::{dto::CreateReq, error::ApiError};
use crate::{models::CreatedPaste, AppState};

#[tracing::instrument(name = "pastes.create", skip(state, req))]
pub async fn create_paste(
    State(state): State<AppState>,
    Json(req): Json<CreateReq>,
) -> Result<(StatusCode, Json<CreatedPaste>), ApiError> {
    let created = state.paste_service.create(req.into_create_paste()).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

#[tracing::instrument(name = "pastes.get_json", skip(state))]
pub async fn get_paste_json(
    State(state): State<AppState>,
    Path(short_id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let paste = state.paste_service.read(&short_id).await?;
    Ok(Json(paste))
}

#[tracing::instrument(name = "pastes.delete", skip(state))]
pub async fn delete_paste(
    State(state): State<AppState>,
    Path(short_id): Path<String>,
) -> Result<StatusCode, ApiError> {
    state.paste_service.delete(&short_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// `GET /:id`, content-negotiated on `Accept` (§6.1): JSON `GetResp` when
/// the client asks for it, otherwise raw content as `text/plain` with
/// syntax/timestamp headers.
#[tracing::instrument(name = "pastes.get_negotiated", skip(state, headers))]
pub async fn get_paste_negotiated(
    State(state): State<AppState>,
    Path(short_id): Path<String>,
    headers: HeaderMap,
) -> Result<Response, ApiError> {
    let paste = state.paste_service.read(&short_id).await?;

    let wants_json = headers
        .get(header::ACCEPT)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|accept| accept.contains("application/json"));

    if wants_json {
        return Ok(Json(paste).into_response());
    }

    let mut response = (StatusCode::OK, paste.content).into_response();
    response
        .headers_mut()
        .insert(header::CONTENT_TYPE, HeaderValue::from_static("text/plain; charset=utf-8"));
    if let Ok(v) = HeaderValue::from_str(&paste.syntax_type) {
        response.headers_mut().insert("X-Syntax-Type", v);
    }
    if let Ok(v) = HeaderValue::from_str(&paste.created_at.to_rfc3339()) {
        response.headers_mut().insert("X-Created-At", v);
    }
    if let Some(expires_at) = paste.expires_at {
        if let Ok(v) = HeaderValue::from_str(&expires_at.to_rfc3339()) {
            response.headers_mut().insert("X-Expires-At", v);
        }
    }

    Ok(response)
}
