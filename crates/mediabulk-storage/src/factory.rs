#[cfg(feature = "storage-local")]
use crate::LocalFileStore;
use crate::{FileStore, StorageBackend, StorageResult};
use mediabulk_core::Config;
use std::sync::Arc;

/// Create a file store based on configuration
pub async fn create_storage(config: &Config) -> StorageResult<Arc<dyn FileStore>> {
    match config.storage_backend {
        #[cfg(feature = "storage-local")]
        StorageBackend::Local => {
            let storage = LocalFileStore::new(
                config.local_storage_path(),
                config.local_storage_base_url().to_string(),
            )
            .await?;
            Ok(Arc::new(storage))
        }

        #[cfg(not(feature = "storage-local"))]
        StorageBackend::Local => Err(crate::StorageError::ConfigError(
            "Local storage backend not available (storage-local feature not enabled)".to_string(),
        )),
    }
}
