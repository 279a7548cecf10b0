use crate::models::{Media, ResponsiveThumbnails, ThumbnailFormat, ThumbnailInfo, ThumbnailSize};
use crate::services::{image, media};
use crate::storage::{ObjectEntry, ObjectStore};
use crate::Database;
use anyhow::{anyhow, Result};
use std::sync::Arc;

/// On-demand thumbnail generation over the object store.
///
/// Derivatives live at a deterministic path per (media, size); whether one
/// already exists is decided by listing the containing directory, and a
/// regeneration overwrites in place. There is no cross-request lock: two
/// concurrent misses for the same pair may both generate, and the upsert
/// upload keeps that safe.
pub struct Thumbnailer {
    db: Database,
    store: Arc<dyn ObjectStore>,
}

pub fn original_download_url(media_id: &str) -> String {
    format!("/api/media/{}/download", media_id)
}

impl Thumbnailer {
    pub fn new(db: Database, store: Arc<dyn ObjectStore>) -> Self {
        Self { db, store }
    }

    pub fn object_path(project_id: &str, media_id: &str, size: ThumbnailSize) -> String {
        format!("{}/thumbnails/{}/{}.webp", project_id, size, media_id)
    }

    fn size_dir(project_id: &str, size: ThumbnailSize) -> String {
        format!("{}/thumbnails/{}", project_id, size)
    }

    /// Storage-listing probe. This is the entire cache.
    pub async fn probe(&self, media: &Media, size: ThumbnailSize) -> Result<Option<ObjectEntry>> {
        let entries = self
            .store
            .list(&Self::size_dir(&media.project_id, size))
            .await?;
        let target = format!("{}.webp", media.id);
        Ok(entries.into_iter().find(|e| e.name == target))
    }

    pub async fn exists(&self, media: &Media, size: ThumbnailSize) -> Result<bool> {
        Ok(self.probe(media, size).await?.is_some())
    }

    /// Generates the derivative for `(media_id, size)` unless the probe finds
    /// one, in which case its metadata is returned without touching the
    /// original.
    pub async fn generate(&self, media_id: &str, size: ThumbnailSize) -> Result<ThumbnailInfo> {
        let media = media::get_media(&self.db, media_id)?
            .ok_or_else(|| anyhow!("Media {} not found", media_id))?;

        let path = Self::object_path(&media.project_id, &media.id, size);

        if let Some(entry) = self.probe(&media, size).await? {
            tracing::debug!("Thumbnail hit for {} {}", media.id, size);
            return Ok(ThumbnailInfo {
                media_id: media.id,
                size,
                path,
                width: size.px(),
                height: size.px(),
                size_bytes: entry.size,
                format: ThumbnailFormat::Webp,
                cached: true,
                created_at: chrono::Utc::now().to_rfc3339(),
            });
        }

        tracing::debug!("Thumbnail miss for {} {}, generating", media.id, size);
        let original = self.store.download(&media.storage_path).await?;
        let decoded = image::decode_image(&original, &media.mime_type)?;
        let (bytes, width, height) =
            image::cover_thumbnail(&decoded, size.px(), ThumbnailFormat::Webp, size.quality())?;

        self.store.upload(&path, &bytes, "image/webp").await?;

        Ok(ThumbnailInfo {
            media_id: media.id,
            size,
            path,
            width,
            height,
            size_bytes: bytes.len() as u64,
            format: ThumbnailFormat::Webp,
            cached: false,
            created_at: chrono::Utc::now().to_rfc3339(),
        })
    }

    /// Public URL for the derivative, degrading to the original-download
    /// endpoint on any failure. Errors are logged, never returned.
    pub async fn url(&self, media_id: &str, size: ThumbnailSize) -> String {
        match self.generate(media_id, size).await {
            Ok(info) => self.store.public_url(&info.path),
            Err(e) => {
                tracing::error!(
                    "Thumbnail {} {} failed, falling back to original: {:#}",
                    media_id,
                    size,
                    e
                );
                original_download_url(media_id)
            }
        }
    }

    /// All three size classes, fetched concurrently. Each size falls back to
    /// the original-download URL independently.
    pub async fn responsive(&self, media_id: &str) -> ResponsiveThumbnails {
        let (small, medium, large) = tokio::join!(
            self.url(media_id, ThumbnailSize::Small),
            self.url(media_id, ThumbnailSize::Medium),
            self.url(media_id, ThumbnailSize::Large),
        );
        ResponsiveThumbnails {
            small,
            medium,
            large,
        }
    }

    /// Removes one size class. A missing derivative counts as removed.
    pub async fn remove(&self, media: &Media, size: ThumbnailSize) {
        let path = Self::object_path(&media.project_id, &media.id, size);
        if let Err(e) = self.store.remove(&path).await {
            tracing::warn!("Failed to remove thumbnail {}: {}", path, e);
        }
    }

    /// Best-effort removal of every size class. Failures are logged and
    /// swallowed; cleanup is advisory, not a guaranteed invariant.
    pub async fn cleanup(&self, media: &Media) -> Vec<ThumbnailSize> {
        for size in ThumbnailSize::ALL {
            self.remove(media, size).await;
        }
        ThumbnailSize::ALL.to_vec()
    }
}
