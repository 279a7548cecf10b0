use async_trait::async_trait;
use std::path::{Path, PathBuf};

/// One object as reported by a prefix listing.
#[derive(Debug, Clone)]
pub struct ObjectEntry {
    pub name: String,
    pub size: u64,
}

#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("object not found: {0}")]
    NotFound(String),
    #[error("invalid object path: {0}")]
    InvalidPath(String),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type StorageResult<T> = Result<T, StorageError>;

/// The storage operations the application consumes, scoped to one bucket.
///
/// `upload` has upsert semantics: writing to an existing path overwrites it
/// rather than erroring on conflict.
#[async_trait]
pub trait ObjectStore: Send + Sync {
    async fn download(&self, path: &str) -> StorageResult<Vec<u8>>;
    async fn upload(&self, path: &str, bytes: &[u8], content_type: &str) -> StorageResult<()>;
    /// Lists the objects directly under `prefix`. A missing prefix is an
    /// empty listing, not an error.
    async fn list(&self, prefix: &str) -> StorageResult<Vec<ObjectEntry>>;
    async fn remove(&self, path: &str) -> StorageResult<()>;
    fn public_url(&self, path: &str) -> String;
}

/// Filesystem-backed store rooted at a single directory.
pub struct FsStore {
    root: PathBuf,
    public_base: String,
}

impl FsStore {
    pub fn new(root: impl Into<PathBuf>, public_base: &str) -> StorageResult<Self> {
        let root = root.into();
        std::fs::create_dir_all(&root)?;
        Ok(Self {
            root,
            public_base: public_base.trim_end_matches('/').to_string(),
        })
    }

    fn resolve(&self, path: &str) -> StorageResult<PathBuf> {
        if path.is_empty()
            || path.starts_with('/')
            || Path::new(path)
                .components()
                .any(|c| !matches!(c, std::path::Component::Normal(_)))
        {
            return Err(StorageError::InvalidPath(path.to_string()));
        }
        Ok(self.root.join(path))
    }
}

#[async_trait]
impl ObjectStore for FsStore {
    async fn download(&self, path: &str) -> StorageResult<Vec<u8>> {
        let full = self.resolve(path)?;
        match tokio::fs::read(&full).await {
            Ok(bytes) => Ok(bytes),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(StorageError::NotFound(path.to_string()))
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn upload(&self, path: &str, bytes: &[u8], _content_type: &str) -> StorageResult<()> {
        let full = self.resolve(path)?;
        if let Some(parent) = full.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        tokio::fs::write(&full, bytes).await?;
        Ok(())
    }

    async fn list(&self, prefix: &str) -> StorageResult<Vec<ObjectEntry>> {
        let dir = self.resolve(prefix)?;
        let mut read_dir = match tokio::fs::read_dir(&dir).await {
            Ok(rd) => rd,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };

        let mut entries = Vec::new();
        while let Some(entry) = read_dir.next_entry().await? {
            let meta = entry.metadata().await?;
            if !meta.is_file() {
                continue;
            }
            entries.push(ObjectEntry {
                name: entry.file_name().to_string_lossy().into_owned(),
                size: meta.len(),
            });
        }
        Ok(entries)
    }

    async fn remove(&self, path: &str) -> StorageResult<()> {
        let full = self.resolve(path)?;
        match tokio::fs::remove_file(&full).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(StorageError::NotFound(path.to_string()))
            }
            Err(e) => Err(e.into()),
        }
    }

    fn public_url(&self, path: &str) -> String {
        format!("{}/{}", self.public_base, path)
    }
}
