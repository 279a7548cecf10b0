use crate::models::{Media, ThumbnailFormat, ThumbnailSize};
use crate::services::media;
use crate::services::thumbnails::original_download_url;
use crate::web::extractors::CurrentUser;
use crate::web::handlers::{bad_request, media_access_response};
use crate::web::state::AppState;
use axum::extract::{Path, Query, State};
use axum::http::header;
use axum::response::{IntoResponse, Json, Redirect, Response};
use serde::Deserialize;
use std::sync::Arc;

const DEFAULT_QUALITY: i64 = 80;

#[derive(Deserialize)]
pub struct ThumbnailParams {
    pub id: Option<String>,
    pub size: Option<String>,
    pub format: Option<String>,
    pub quality: Option<i64>,
    pub redirect: Option<bool>,
}

struct ValidatedParams {
    id: String,
    size: ThumbnailSize,
    format: ThumbnailFormat,
    #[allow(dead_code)]
    quality: u8,
    redirect: Option<bool>,
}

fn validate(params: &ThumbnailParams) -> Result<ValidatedParams, Response> {
    let id = match params.id.as_deref() {
        Some(id) if !id.is_empty() => id.to_string(),
        _ => return Err(bad_request("Media ID is required")),
    };

    let size = match params.size.as_deref() {
        None => ThumbnailSize::default(),
        Some(s) => s
            .parse()
            .map_err(|_| bad_request("Invalid size. Must be one of: small, medium, large"))?,
    };

    let format = match params.format.as_deref() {
        None => ThumbnailFormat::default(),
        Some(f) => f
            .parse()
            .map_err(|_| bad_request("Invalid format. Must be one of: webp, jpeg, png"))?,
    };

    let quality = params.quality.unwrap_or(DEFAULT_QUALITY);
    if !(1..=100).contains(&quality) {
        return Err(bad_request("Quality must be between 1 and 100"));
    }

    Ok(ValidatedParams {
        id,
        size,
        format,
        quality: quality as u8,
        redirect: params.redirect,
    })
}

fn resolve_media(state: &AppState, id: &str, user_id: i64) -> Result<Media, Response> {
    media::get_media_for_user(&state.db, id, user_id)
        .map(|(item, _)| item)
        .map_err(|e| media_access_response("thumbnail", e))
}

/// GET /api/thumbnails
///
/// Generation and storage failures never surface as errors here; the
/// response degrades to a redirect toward the original asset.
pub async fn get_thumbnail(
    State(state): State<Arc<AppState>>,
    CurrentUser(user): CurrentUser,
    Query(params): Query<ThumbnailParams>,
) -> Response {
    let params = match validate(&params) {
        Ok(p) => p,
        Err(resp) => return resp,
    };
    if let Err(resp) = resolve_media(&state, &params.id, user.id) {
        return resp;
    }

    let info = match state.thumbnailer.generate(&params.id, params.size).await {
        Ok(info) => info,
        Err(e) => {
            tracing::error!(
                "Thumbnail generation failed for {} {}: {:#}",
                params.id,
                params.size,
                e
            );
            return Redirect::temporary(&original_download_url(&params.id)).into_response();
        }
    };

    if params.redirect.unwrap_or(false) {
        return Redirect::temporary(&state.store.public_url(&info.path)).into_response();
    }

    match state.store.download(&info.path).await {
        Ok(bytes) => (
            [
                (header::CONTENT_TYPE, info.format.content_type().to_string()),
                (header::CONTENT_LENGTH, bytes.len().to_string()),
                (
                    header::CACHE_CONTROL,
                    "public, max-age=31536000, immutable".to_string(),
                ),
                (
                    header::ETAG,
                    format!("\"{}-{}-{}\"", params.id, params.size, params.format),
                ),
            ],
            bytes,
        )
            .into_response(),
        Err(e) => {
            tracing::error!("Thumbnail download failed for {}: {}", info.path, e);
            Redirect::temporary(&original_download_url(&params.id)).into_response()
        }
    }
}

/// HEAD /api/thumbnails
///
/// Existence probe only; the same storage-listing check generation uses.
pub async fn head_thumbnail(
    State(state): State<Arc<AppState>>,
    CurrentUser(user): CurrentUser,
    Query(params): Query<ThumbnailParams>,
) -> Response {
    let params = match validate(&params) {
        Ok(p) => p,
        Err(resp) => return resp,
    };
    let item = match resolve_media(&state, &params.id, user.id) {
        Ok(item) => item,
        Err(resp) => return resp,
    };

    let exists = state
        .thumbnailer
        .exists(&item, params.size)
        .await
        .unwrap_or(false);

    [("x-thumbnail-exists", exists.to_string())].into_response()
}

/// DELETE /api/thumbnails
///
/// With `size`, removes that one size class; without, removes all of them.
pub async fn delete_thumbnail(
    State(state): State<Arc<AppState>>,
    CurrentUser(user): CurrentUser,
    Query(params): Query<ThumbnailParams>,
) -> Response {
    let id = match params.id.as_deref() {
        Some(id) if !id.is_empty() => id,
        _ => return bad_request("Media ID is required"),
    };
    let item = match resolve_media(&state, id, user.id) {
        Ok(item) => item,
        Err(resp) => return resp,
    };

    let deleted = match params.size.as_deref() {
        Some(s) => match s.parse::<ThumbnailSize>() {
            Ok(size) => {
                state.thumbnailer.remove(&item, size).await;
                vec![size]
            }
            Err(_) => {
                return bad_request("Invalid size. Must be one of: small, medium, large")
            }
        },
        None => state.thumbnailer.cleanup(&item).await,
    };

    Json(serde_json::json!({"data": {"deleted": deleted}})).into_response()
}

/// GET /api/media/:id/thumbnails
///
/// URLs for every size class, generated concurrently; a failed size falls
/// back to the original-download URL without affecting the others.
pub async fn responsive_thumbnails(
    State(state): State<Arc<AppState>>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<String>,
) -> Response {
    if let Err(resp) = resolve_media(&state, &id, user.id) {
        return resp;
    }

    let set = state.thumbnailer.responsive(&id).await;
    Json(serde_json::json!({"data": set})).into_response()
}
