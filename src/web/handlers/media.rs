use crate::services::{media, projects};
use crate::web::error::AppResult;
use crate::web::extractors::CurrentUser;
use crate::web::handlers::{
    access_denied, bad_request, json_envelope, media_access_response, not_found, paginate,
};
use crate::web::state::AppState;
use axum::extract::{Multipart, Path, Query, State};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Json, Redirect, Response};
use serde::Deserialize;
use std::sync::Arc;

#[derive(Deserialize)]
pub struct MediaListParams {
    pub page: Option<usize>,
    pub per_page: Option<usize>,
    pub q: Option<String>,
    pub sort: Option<String>,
    pub order: Option<String>,
}

/// GET /api/projects/:id/media
pub async fn list_media(
    State(state): State<Arc<AppState>>,
    CurrentUser(user): CurrentUser,
    Path(project_id): Path<String>,
    Query(params): Query<MediaListParams>,
) -> AppResult<Response> {
    let project = match projects::get_project(&state.db, &project_id)? {
        Some(p) if p.owner_id == user.id => p,
        Some(_) => return Ok(access_denied()),
        None => return Ok(not_found("Project not found")),
    };

    let (page, per_page, offset) = paginate(
        params.page,
        params.per_page,
        state.config.api.default_page_size,
        state.config.api.max_page_size,
    );

    let sort = match params.sort.as_deref() {
        None => media::MediaSort::default(),
        Some(s) => match s.parse() {
            Ok(s) => s,
            Err(_) => {
                return Ok(bad_request(
                    "Invalid sort. Must be one of: uploaded_at, file_name, size_bytes",
                ))
            }
        },
    };
    let order = match params.order.as_deref() {
        None => projects::SortOrder::default(),
        Some(o) => match o.parse() {
            Ok(o) => o,
            Err(_) => return Ok(bad_request("Invalid order. Must be one of: asc, desc")),
        },
    };

    let query = media::MediaQuery {
        q: params.q.clone(),
        sort,
        order,
        limit: per_page,
        offset,
    };

    let total = media::count_media(&state.db, &project.id, params.q.as_deref())?;
    let list = media::list_media(&state.db, &project.id, &query)?;

    Ok(json_envelope(
        serde_json::to_value(&list).unwrap_or_default(),
        total,
        page,
        per_page,
    )
    .into_response())
}

/// POST /api/projects/:id/media
pub async fn upload_media(
    State(state): State<Arc<AppState>>,
    CurrentUser(user): CurrentUser,
    Path(project_id): Path<String>,
    mut multipart: Multipart,
) -> AppResult<Response> {
    let project = match projects::get_project(&state.db, &project_id)? {
        Some(p) if p.owner_id == user.id => p,
        Some(_) => return Ok(access_denied()),
        None => return Ok(not_found("Project not found")),
    };

    let rate_key = format!("upload:{}", user.id);
    if !state.upload_limiter.check(&rate_key) {
        return Ok((
            StatusCode::TOO_MANY_REQUESTS,
            Json(serde_json::json!({"error": "Too many uploads. Please wait before uploading more files."})),
        )
            .into_response());
    }

    let mut uploaded = Vec::new();
    while let Some(field) = multipart.next_field().await? {
        let name = field.file_name().unwrap_or("unknown").to_string();
        let content_type = field.content_type().unwrap_or_default().to_string();
        let data = field.bytes().await?;

        match media::upload_media(
            &state.db,
            state.store.as_ref(),
            &project,
            &name,
            &content_type,
            &data,
            Some(user.id),
        )
        .await
        {
            Ok(item) => uploaded.push(item),
            Err(e) => return Ok(bad_request(&e.to_string())),
        }
        state.upload_limiter.record_attempt(&rate_key);
    }

    if uploaded.is_empty() {
        return Ok(bad_request("No file provided"));
    }

    Ok((
        StatusCode::CREATED,
        Json(serde_json::json!({"data": uploaded})),
    )
        .into_response())
}

/// GET /api/media/:id
pub async fn get_media(
    State(state): State<Arc<AppState>>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<String>,
) -> Response {
    match media::get_media_for_user(&state.db, &id, user.id) {
        Ok((item, _)) => Json(serde_json::json!({"data": item})).into_response(),
        Err(e) => media_access_response("get_media", e),
    }
}

/// GET /api/media/:id/download
///
/// Streams the original bytes. This endpoint is the fallback target for
/// failed thumbnail generation.
pub async fn download_media(
    State(state): State<Arc<AppState>>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<String>,
) -> Response {
    let item = match media::get_media_for_user(&state.db, &id, user.id) {
        Ok((item, _)) => item,
        Err(e) => return media_access_response("download_media", e),
    };

    match state.store.download(&item.storage_path).await {
        Ok(bytes) => (
            [
                (header::CONTENT_TYPE, item.mime_type.clone()),
                (
                    header::CONTENT_DISPOSITION,
                    format!("inline; filename=\"{}\"", item.file_name),
                ),
            ],
            bytes,
        )
            .into_response(),
        Err(e) => {
            // Row exists but the object is gone; the public path is the last
            // resort before a 404.
            tracing::error!("Download failed for media {}: {}", item.id, e);
            Redirect::temporary(&state.store.public_url(&item.storage_path)).into_response()
        }
    }
}

/// DELETE /api/media/:id
pub async fn delete_media(
    State(state): State<Arc<AppState>>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<String>,
) -> AppResult<Response> {
    let item = match media::get_media_for_user(&state.db, &id, user.id) {
        Ok((item, _)) => item,
        Err(e) => return Ok(media_access_response("delete_media", e)),
    };

    state.thumbnailer.cleanup(&item).await;
    media::delete_media(&state.db, state.store.as_ref(), &item).await?;

    Ok(Json(serde_json::json!({"data": "deleted"})).into_response())
}
