pub mod auth;
pub mod media;
pub mod projects;
pub mod thumbnails;

use crate::services::media::MediaAccessError;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};

pub(crate) fn paginate(
    page: Option<usize>,
    per_page: Option<usize>,
    default_size: usize,
    max_size: usize,
) -> (usize, usize, usize) {
    let page = page.unwrap_or(1).max(1);
    let per_page = per_page.unwrap_or(default_size).min(max_size).max(1);
    let offset = (page - 1) * per_page;
    (page, per_page, offset)
}

pub(crate) fn json_envelope(
    data: serde_json::Value,
    total: i64,
    page: usize,
    per_page: usize,
) -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "data": data,
        "meta": {
            "total": total,
            "page": page,
            "per_page": per_page,
        }
    }))
}

pub(crate) fn bad_request(msg: &str) -> Response {
    (
        StatusCode::BAD_REQUEST,
        Json(serde_json::json!({"error": msg})),
    )
        .into_response()
}

pub(crate) fn not_found(msg: &str) -> Response {
    (
        StatusCode::NOT_FOUND,
        Json(serde_json::json!({"error": msg})),
    )
        .into_response()
}

pub(crate) fn access_denied() -> Response {
    (
        StatusCode::FORBIDDEN,
        Json(serde_json::json!({"error": "Access denied"})),
    )
        .into_response()
}

pub(crate) fn internal_error(context: &str, err: impl std::fmt::Display) -> Response {
    tracing::error!("{}: {}", context, err);
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(serde_json::json!({"error": "Internal server error"})),
    )
        .into_response()
}

pub(crate) fn media_access_response(context: &str, err: MediaAccessError) -> Response {
    match err {
        MediaAccessError::NotFound => not_found("Media not found"),
        MediaAccessError::Denied => access_denied(),
        MediaAccessError::Other(e) => internal_error(context, e),
    }
}

pub async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}
