use crate::models::{CreateProject, Project, UpdateProject};
use crate::services::{media, projects};
use crate::web::error::AppResult;
use crate::web::extractors::CurrentUser;
use crate::web::handlers::{
    access_denied, bad_request, internal_error, json_envelope, not_found, paginate,
};
use crate::web::state::AppState;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use serde::Deserialize;
use std::sync::Arc;

#[derive(Deserialize)]
pub struct ProjectListParams {
    pub page: Option<usize>,
    pub per_page: Option<usize>,
    pub q: Option<String>,
    pub sort: Option<String>,
    pub order: Option<String>,
}

/// Resolves a project and enforces ownership; `Err` carries the response.
fn owned_project(
    state: &AppState,
    id: &str,
    user_id: i64,
) -> Result<Project, Box<Response>> {
    match projects::get_project(&state.db, id) {
        Ok(Some(p)) if p.owner_id == user_id => Ok(p),
        Ok(Some(_)) => Err(Box::new(access_denied())),
        Ok(None) => Err(Box::new(not_found("Project not found"))),
        Err(e) => Err(Box::new(internal_error("get_project", e))),
    }
}

/// GET /api/projects
pub async fn list_projects(
    State(state): State<Arc<AppState>>,
    CurrentUser(user): CurrentUser,
    Query(params): Query<ProjectListParams>,
) -> AppResult<Response> {
    let (page, per_page, offset) = paginate(
        params.page,
        params.per_page,
        state.config.api.default_page_size,
        state.config.api.max_page_size,
    );

    let sort = match params.sort.as_deref() {
        None => projects::ProjectSort::default(),
        Some(s) => match s.parse() {
            Ok(s) => s,
            Err(_) => {
                return Ok(bad_request(
                    "Invalid sort. Must be one of: created_at, updated_at, title",
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

    let query = projects::ProjectQuery {
        q: params.q.clone(),
        sort,
        order,
        limit: per_page,
        offset,
    };

    let total = projects::count_projects(&state.db, user.id, params.q.as_deref())?;
    let list = projects::list_projects(&state.db, user.id, &query)?;

    Ok(json_envelope(
        serde_json::to_value(&list).unwrap_or_default(),
        total,
        page,
        per_page,
    )
    .into_response())
}

/// POST /api/projects
pub async fn create_project(
    State(state): State<Arc<AppState>>,
    CurrentUser(user): CurrentUser,
    Json(req): Json<CreateProject>,
) -> AppResult<Response> {
    match projects::create_project(&state.db, user.id, &req.title, req.description.as_deref()) {
        Ok(project) => Ok((
            StatusCode::CREATED,
            Json(serde_json::json!({"data": project})),
        )
            .into_response()),
        Err(e) => Ok(bad_request(&e.to_string())),
    }
}

/// GET /api/projects/:id
pub async fn get_project(
    State(state): State<Arc<AppState>>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<String>,
) -> Response {
    match owned_project(&state, &id, user.id) {
        Ok(project) => Json(serde_json::json!({"data": project})).into_response(),
        Err(resp) => *resp,
    }
}

/// PUT /api/projects/:id
pub async fn update_project(
    State(state): State<Arc<AppState>>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<String>,
    Json(update): Json<UpdateProject>,
) -> AppResult<Response> {
    if let Err(resp) = owned_project(&state, &id, user.id) {
        return Ok(*resp);
    }

    if let Err(e) = projects::update_project(&state.db, &id, &update) {
        return Ok(bad_request(&e.to_string()));
    }

    let project = projects::get_project(&state.db, &id)?;
    Ok(Json(serde_json::json!({"data": project})).into_response())
}

/// DELETE /api/projects/:id
///
/// Media rows cascade with the project; stored originals and derivatives are
/// removed best-effort first.
pub async fn delete_project(
    State(state): State<Arc<AppState>>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<String>,
) -> AppResult<Response> {
    if let Err(resp) = owned_project(&state, &id, user.id) {
        return Ok(*resp);
    }

    for item in media::list_all_media(&state.db, &id)? {
        state.thumbnailer.cleanup(&item).await;
        if let Err(e) = state.store.remove(&item.storage_path).await {
            tracing::warn!("Failed to remove original for media {}: {}", item.id, e);
        }
    }

    projects::delete_project(&state.db, &id)?;
    Ok(Json(serde_json::json!({"data": "deleted"})).into_response())
}
