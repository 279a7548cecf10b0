use crate::services::thumbnails::Thumbnailer;
use crate::storage::ObjectStore;
use crate::web::security::RateLimiter;
use crate::{Config, Database};
use std::sync::Arc;
use std::time::Duration;

pub struct AppState {
    pub config: Config,
    pub db: Database,
    pub store: Arc<dyn ObjectStore>,
    pub thumbnailer: Thumbnailer,
    pub login_limiter: RateLimiter,
    pub upload_limiter: RateLimiter,
}

impl AppState {
    pub fn new(config: Config, db: Database, store: Arc<dyn ObjectStore>) -> Self {
        let thumbnailer = Thumbnailer::new(db.clone(), store.clone());

        Self {
            config,
            db,
            store,
            thumbnailer,
            login_limiter: RateLimiter::default(),
            upload_limiter: RateLimiter::new(
                30,
                Duration::from_secs(60),
                Duration::from_secs(300),
            ),
        }
    }
}
