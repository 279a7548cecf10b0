use crate::models::{Media, Project};
use crate::services::projects;
use crate::storage::ObjectStore;
use crate::Database;
use anyhow::Result;
use std::str::FromStr;
use uuid::Uuid;

const MAX_FILE_SIZE: usize = 10 * 1024 * 1024; // 10MB

const ALLOWED_MIME_TYPES: &[&str] = &["image/jpeg", "image/png", "image/gif", "image/webp"];

#[derive(Debug, thiserror::Error)]
pub enum MediaAccessError {
    #[error("Media not found")]
    NotFound,
    #[error("Access denied")]
    Denied,
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MediaSort {
    #[default]
    UploadedAt,
    FileName,
    SizeBytes,
}

impl MediaSort {
    fn column(self) -> &'static str {
        match self {
            Self::UploadedAt => "uploaded_at",
            Self::FileName => "file_name",
            Self::SizeBytes => "size_bytes",
        }
    }
}

impl FromStr for MediaSort {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "uploaded_at" => Ok(Self::UploadedAt),
            "file_name" => Ok(Self::FileName),
            "size_bytes" => Ok(Self::SizeBytes),
            _ => Err(()),
        }
    }
}

#[derive(Debug, Default)]
pub struct MediaQuery {
    pub q: Option<String>,
    pub sort: MediaSort,
    pub order: projects::SortOrder,
    pub limit: usize,
    pub offset: usize,
}

fn extension_for(mime_type: &str) -> &'static str {
    match mime_type {
        "image/jpeg" => "jpg",
        "image/png" => "png",
        "image/gif" => "gif",
        "image/webp" => "webp",
        _ => "bin",
    }
}

fn row_to_media(row: &rusqlite::Row<'_>) -> rusqlite::Result<Media> {
    Ok(Media {
        id: row.get(0)?,
        project_id: row.get(1)?,
        file_name: row.get(2)?,
        storage_path: row.get(3)?,
        mime_type: row.get(4)?,
        size_bytes: row.get(5)?,
        uploaded_by: row.get(6)?,
        uploaded_at: row.get(7)?,
    })
}

const MEDIA_COLUMNS: &str =
    "id, project_id, file_name, storage_path, mime_type, size_bytes, uploaded_by, uploaded_at";

pub async fn upload_media(
    db: &Database,
    store: &dyn ObjectStore,
    project: &Project,
    original_name: &str,
    declared_mime: &str,
    data: &[u8],
    uploaded_by: Option<i64>,
) -> Result<Media> {
    if data.len() > MAX_FILE_SIZE {
        anyhow::bail!(
            "File too large: {} bytes (max {} bytes)",
            data.len(),
            MAX_FILE_SIZE
        );
    }

    // Trust sniffed content over the declared type where possible.
    let mime_type = match infer::get(data) {
        Some(kind) => kind.mime_type().to_string(),
        None if !declared_mime.is_empty() => declared_mime.to_string(),
        None => mime_guess::from_path(original_name)
            .first_or_octet_stream()
            .essence_str()
            .to_string(),
    };

    if !ALLOWED_MIME_TYPES.contains(&mime_type.as_str()) {
        anyhow::bail!(
            "File type not allowed: {}. Allowed types: {}",
            mime_type,
            ALLOWED_MIME_TYPES.join(", ")
        );
    }

    let id = Uuid::new_v4().to_string();
    let storage_path = format!(
        "{}/originals/{}.{}",
        project.id,
        id,
        extension_for(&mime_type)
    );

    store.upload(&storage_path, data, &mime_type).await?;

    let conn = db.get()?;
    conn.execute(
        "INSERT INTO media (id, project_id, file_name, storage_path, mime_type, size_bytes, uploaded_by) VALUES (?, ?, ?, ?, ?, ?, ?)",
        (
            &id,
            &project.id,
            original_name,
            &storage_path,
            &mime_type,
            data.len() as i64,
            uploaded_by,
        ),
    )?;

    let media = conn.query_row(
        &format!("SELECT {} FROM media WHERE id = ?", MEDIA_COLUMNS),
        [&id],
        row_to_media,
    )?;
    Ok(media)
}

pub fn get_media(db: &Database, id: &str) -> Result<Option<Media>> {
    let conn = db.get()?;
    let media = conn
        .query_row(
            &format!("SELECT {} FROM media WHERE id = ?", MEDIA_COLUMNS),
            [id],
            row_to_media,
        )
        .ok();
    Ok(media)
}

/// Resolves a media row and enforces that `user_id` owns the parent project.
pub fn get_media_for_user(
    db: &Database,
    media_id: &str,
    user_id: i64,
) -> Result<(Media, Project), MediaAccessError> {
    let media = get_media(db, media_id)?.ok_or(MediaAccessError::NotFound)?;
    let project = projects::get_project(db, &media.project_id)
        .map_err(MediaAccessError::Other)?
        .ok_or(MediaAccessError::NotFound)?;
    if project.owner_id != user_id {
        return Err(MediaAccessError::Denied);
    }
    Ok((media, project))
}

pub fn list_media(db: &Database, project_id: &str, query: &MediaQuery) -> Result<Vec<Media>> {
    let conn = db.get()?;
    let sql = format!(
        "SELECT {} FROM media WHERE project_id = ?1 AND (?2 IS NULL OR file_name LIKE ?3) ORDER BY {} {} LIMIT ?4 OFFSET ?5",
        MEDIA_COLUMNS,
        query.sort.column(),
        query.order.keyword(),
    );
    let pattern = query.q.as_ref().map(|q| format!("%{}%", q));
    let mut stmt = conn.prepare(&sql)?;
    let media = stmt
        .query_map(
            (
                project_id,
                query.q.as_deref(),
                pattern.as_deref(),
                query.limit,
                query.offset,
            ),
            row_to_media,
        )?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(media)
}

pub fn count_media(db: &Database, project_id: &str, q: Option<&str>) -> Result<i64> {
    let conn = db.get()?;
    let pattern = q.map(|q| format!("%{}%", q));
    let count = conn.query_row(
        "SELECT COUNT(*) FROM media WHERE project_id = ?1 AND (?2 IS NULL OR file_name LIKE ?3)",
        (project_id, q, pattern.as_deref()),
        |row| row.get(0),
    )?;
    Ok(count)
}

pub fn list_all_media(db: &Database, project_id: &str) -> Result<Vec<Media>> {
    let conn = db.get()?;
    let mut stmt = conn.prepare(&format!(
        "SELECT {} FROM media WHERE project_id = ?",
        MEDIA_COLUMNS
    ))?;
    let media = stmt
        .query_map([project_id], row_to_media)?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(media)
}

/// Removes the stored original (best-effort) and deletes the row.
pub async fn delete_media(db: &Database, store: &dyn ObjectStore, media: &Media) -> Result<()> {
    if let Err(e) = store.remove(&media.storage_path).await {
        tracing::warn!("Failed to remove original for media {}: {}", media.id, e);
    }

    let conn = db.get()?;
    conn.execute("DELETE FROM media WHERE id = ?", [&media.id])?;
    Ok(())
}
