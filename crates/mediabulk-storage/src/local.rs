use crate::traits::{FileStore, StorageError, StorageResult};
use crate::uri::StreamUri;
use crate::StorageBackend;
use async_trait::async_trait;
use chrono::Utc;
use mediabulk_core::models::FileRecord;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::io::AsyncWriteExt;
use uuid::Uuid;

/// Give up renaming after this many collisions on one name.
const MAX_RENAME_ATTEMPTS: u32 = 10_000;

/// Local filesystem file store
#[derive(Clone)]
pub struct LocalFileStore {
    base_path: PathBuf,
    base_url: String,
}

impl LocalFileStore {
    /// Create a new LocalFileStore instance
    ///
    /// # Arguments
    /// * `base_path` - Root directory; each uri scheme gets a subdirectory
    /// * `base_url` - Base URL for serving files (e.g., "http://localhost:3000/files")
    pub async fn new(base_path: impl Into<PathBuf>, base_url: String) -> StorageResult<Self> {
        let base_path = base_path.into();

        fs::create_dir_all(&base_path).await.map_err(|e| {
            StorageError::ConfigError(format!(
                "Failed to create storage directory {}: {}",
                base_path.display(),
                e
            ))
        })?;

        Ok(LocalFileStore {
            base_path,
            base_url,
        })
    }

    /// Convert a uri to a filesystem path, refusing anything that would
    /// resolve outside the base directory.
    fn uri_to_path(&self, uri: &StreamUri) -> StorageResult<PathBuf> {
        let path = self.base_path.join(&uri.scheme).join(&uri.target);

        let base_canonical = self.base_path.canonicalize().map_err(|e| {
            StorageError::ConfigError(format!("Failed to canonicalize base path: {}", e))
        })?;

        if let Ok(canonical) = path.canonicalize() {
            if canonical.strip_prefix(&base_canonical).is_err() {
                return Err(StorageError::InvalidUri(
                    "Uri resolves outside storage directory".to_string(),
                ));
            }
        }

        Ok(path)
    }

    fn generate_url(&self, uri: &StreamUri) -> String {
        format!(
            "{}/{}/{}",
            self.base_url.trim_end_matches('/'),
            uri.scheme,
            uri.target
        )
    }

    /// Candidate name for the `attempt`-th collision: `cat.jpg` -> `cat_0.jpg`.
    fn renamed(filename: &str, attempt: u32) -> String {
        match filename.rfind('.') {
            Some(dot) if dot > 0 => {
                format!("{}_{}{}", &filename[..dot], attempt, &filename[dot..])
            }
            _ => format!("{}_{}", filename, attempt),
        }
    }

    /// Create the destination file exclusively, renaming on collision.
    async fn create_unique(&self, uri: &StreamUri) -> StorageResult<(StreamUri, PathBuf, fs::File)> {
        let directory = uri.dirname();
        let filename = uri.filename().to_string();
        let mut candidate = uri.clone();

        for attempt in 0..=MAX_RENAME_ATTEMPTS {
            let path = self.uri_to_path(&candidate)?;
            match fs::OpenOptions::new()
                .write(true)
                .create_new(true)
                .open(&path)
                .await
            {
                Ok(file) => return Ok((candidate, path, file)),
                Err(e) if e.kind() == ErrorKind::AlreadyExists => {
                    candidate = directory.join(&Self::renamed(&filename, attempt));
                }
                Err(e) => {
                    return Err(StorageError::WriteFailed(format!(
                        "Failed to create file {}: {}",
                        path.display(),
                        e
                    )))
                }
            }
        }

        Err(StorageError::WriteFailed(format!(
            "No free filename for {} after {} attempts",
            uri, MAX_RENAME_ATTEMPTS
        )))
    }

    async fn ensure_parent_dir(&self, path: &Path) -> StorageResult<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).await?;
        }
        Ok(())
    }
}

#[async_trait]
impl FileStore for LocalFileStore {
    async fn prepare_directory(&self, directory_uri: &str) -> StorageResult<()> {
        let uri = StreamUri::parse(directory_uri)?;
        let path = self.uri_to_path(&uri)?;

        fs::create_dir_all(&path).await.map_err(|e| {
            StorageError::DirectoryFailed(format!("{}: {}", path.display(), e))
        })?;

        tracing::debug!(uri = %uri, path = %path.display(), "Directory prepared");
        Ok(())
    }

    async fn save_data(&self, data: Vec<u8>, destination_uri: &str) -> StorageResult<FileRecord> {
        let requested = StreamUri::parse(destination_uri)?;
        if requested.filename().is_empty() {
            return Err(StorageError::InvalidUri(format!(
                "'{}' does not name a file",
                destination_uri
            )));
        }

        let requested_path = self.uri_to_path(&requested)?;
        self.ensure_parent_dir(&requested_path).await?;

        let start = std::time::Instant::now();
        let size = data.len() as u64;
        let (uri, path, mut file) = self.create_unique(&requested).await?;

        file.write_all(&data).await.map_err(|e| {
            StorageError::WriteFailed(format!("Failed to write file {}: {}", path.display(), e))
        })?;

        file.sync_all().await.map_err(|e| {
            StorageError::WriteFailed(format!("Failed to sync file {}: {}", path.display(), e))
        })?;

        let url = self.generate_url(&uri);

        tracing::info!(
            path = %path.display(),
            uri = %uri,
            size_bytes = size,
            renamed = uri != requested,
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Local file save successful"
        );

        Ok(FileRecord {
            id: Uuid::new_v4(),
            filename: uri.filename().to_string(),
            uri: uri.to_string(),
            size,
            url,
            created_at: Utc::now(),
        })
    }

    async fn read(&self, uri: &str) -> StorageResult<Vec<u8>> {
        let parsed = StreamUri::parse(uri)?;
        let path = self.uri_to_path(&parsed)?;

        if !fs::try_exists(&path).await.unwrap_or(false) {
            return Err(StorageError::NotFound(uri.to_string()));
        }

        fs::read(&path).await.map_err(|e| {
            StorageError::ReadFailed(format!("Failed to read file {}: {}", path.display(), e))
        })
    }

    async fn exists(&self, uri: &str) -> StorageResult<bool> {
        let parsed = StreamUri::parse(uri)?;
        let path = self.uri_to_path(&parsed)?;
        Ok(fs::try_exists(&path).await.unwrap_or(false))
    }

    fn url(&self, uri: &str) -> StorageResult<String> {
        let parsed = StreamUri::parse(uri)?;
        Ok(self.generate_url(&parsed))
    }

    fn backend_type(&self) -> StorageBackend {
        StorageBackend::Local
    }
}
