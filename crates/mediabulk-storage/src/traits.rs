//! File store abstraction trait

use crate::StorageBackend;
use async_trait::async_trait;
use mediabulk_core::models::FileRecord;
use mediabulk_core::AppError;
use thiserror::Error;

/// Storage operation errors
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Write failed: {0}")]
    WriteFailed(String),

    #[error("Read failed: {0}")]
    ReadFailed(String),

    #[error("File not found: {0}")]
    NotFound(String),

    #[error("Invalid uri: {0}")]
    InvalidUri(String),

    #[error("Directory could not be prepared: {0}")]
    DirectoryFailed(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

impl From<StorageError> for AppError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::NotFound(uri) => AppError::NotFound(format!("File {} not found", uri)),
            StorageError::InvalidUri(msg) => AppError::InvalidInput(msg),
            StorageError::ConfigError(msg) => AppError::Config(msg),
            other => AppError::Storage(other.to_string()),
        }
    }
}

/// File persistence collaborator of the bulk upload flow.
///
/// Implementations own uniqueness of stored names: saving to a uri that is
/// already taken stores the data under a new name and reports it in the
/// returned record.
#[async_trait]
pub trait FileStore: Send + Sync {
    /// Make sure the directory behind `directory_uri` exists.
    async fn prepare_directory(&self, directory_uri: &str) -> StorageResult<()>;

    /// Persist `data` at `destination_uri` and return the file record.
    async fn save_data(&self, data: Vec<u8>, destination_uri: &str) -> StorageResult<FileRecord>;

    /// Read a stored file back.
    async fn read(&self, uri: &str) -> StorageResult<Vec<u8>>;

    /// Check if a file exists
    async fn exists(&self, uri: &str) -> StorageResult<bool>;

    /// Public URL for a stored uri.
    fn url(&self, uri: &str) -> StorageResult<String>;

    /// Get the storage backend type
    fn backend_type(&self) -> StorageBackend;
}
