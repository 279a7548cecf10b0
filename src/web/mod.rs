mod error;
mod extractors;
mod handlers;
mod routes;
pub mod security;
mod state;

pub use state::AppState;

use crate::storage::{FsStore, ObjectStore};
use crate::{Config, Database};
use anyhow::Result;
use axum::middleware;
use axum::Router;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tower_http::compression::CompressionLayer;
use tower_http::services::ServeDir;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

/// Builds the full application router with its middleware stack. Shared by
/// `serve` and the integration tests so both exercise the same layers.
pub fn app(state: Arc<AppState>) -> Router {
    let storage_root = state.config.storage.root_dir.clone();

    Router::new()
        .merge(routes::api_routes())
        .nest_service("/files", ServeDir::new(storage_root))
        .layer(middleware::from_fn(security::apply_security_headers))
        .layer(CompressionLayer::new())
        .layer(TimeoutLayer::new(Duration::from_secs(30)))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

pub async fn serve(config: Config, db: Database, addr: &str) -> Result<()> {
    let store: Arc<dyn ObjectStore> = Arc::new(FsStore::new(
        &config.storage.root_dir,
        &config.storage.public_base_url,
    )?);

    let state = Arc::new(AppState::new(config, db, store));
    let app = app(state);

    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
