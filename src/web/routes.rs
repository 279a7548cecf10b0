use super::handlers;
use super::state::AppState;
use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use axum::Router;
use std::sync::Arc;

pub fn api_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/health", get(handlers::health))
        .route("/api/auth/register", post(handlers::auth::register))
        .route("/api/auth/login", post(handlers::auth::login))
        .route("/api/auth/logout", post(handlers::auth::logout))
        .route("/api/auth/me", get(handlers::auth::me))
        .route(
            "/api/projects",
            get(handlers::projects::list_projects).post(handlers::projects::create_project),
        )
        .route(
            "/api/projects/:id",
            get(handlers::projects::get_project)
                .put(handlers::projects::update_project)
                .delete(handlers::projects::delete_project),
        )
        .route(
            "/api/projects/:id/media",
            get(handlers::media::list_media)
                .post(handlers::media::upload_media)
                .layer(DefaultBodyLimit::max(15 * 1024 * 1024)),
        )
        .route(
            "/api/media/:id",
            get(handlers::media::get_media).delete(handlers::media::delete_media),
        )
        .route("/api/media/:id/download", get(handlers::media::download_media))
        .route(
            "/api/media/:id/thumbnails",
            get(handlers::thumbnails::responsive_thumbnails),
        )
        .route(
            "/api/thumbnails",
            get(handlers::thumbnails::get_thumbnail)
                .head(handlers::thumbnails::head_thumbnail)
                .delete(handlers::thumbnails::delete_thumbnail),
        )
}
