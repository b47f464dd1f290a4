//! Test helpers: wire a bulk upload service over a temporary file store.
//!
//! Run from workspace root: `cargo test -p mediabulk-services`.

#![allow(dead_code)]

pub mod fixtures;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use mediabulk_core::models::{ContentRecord, FileRecord, PendingContentRecord};
use mediabulk_core::{AppError, StorageBackend};
use mediabulk_services::{
    BulkUploadService, Catalog, ConfigStore, ContentStore, DateTokenExpander,
    EntityFieldIntrospector, InMemoryConfigStore, InMemoryContentStore,
};
use mediabulk_storage::{FileStore, LocalFileStore, StorageError, StorageResult};
use tempfile::TempDir;
use uuid::Uuid;

pub const DEFAULT_MAX_FILESIZE: &str = "2M";

pub struct TestApp {
    pub service: BulkUploadService,
    pub configs: InMemoryConfigStore,
    pub content: InMemoryContentStore,
    pub storage: Arc<LocalFileStore>,
    _temp_dir: TempDir,
}

impl TestApp {
    /// Directory for temporary uploads, outside the file store.
    pub fn uploads_dir(&self) -> PathBuf {
        self._temp_dir.path().join("uploads")
    }

    pub fn files_dir(&self) -> PathBuf {
        self._temp_dir.path().join("files")
    }
}

/// Content store whose saves always fail.
pub struct FailingContentStore;

#[async_trait]
impl ContentStore for FailingContentStore {
    async fn save(&self, record: PendingContentRecord) -> Result<ContentRecord, AppError> {
        Err(AppError::Storage(format!(
            "database unavailable while saving {}",
            record.name
        )))
    }

    async fn get(&self, _id: Uuid) -> Result<Option<ContentRecord>, AppError> {
        Ok(None)
    }
}

/// Local file store that refuses to save files with a given name.
pub struct RejectingFileStore {
    inner: Arc<LocalFileStore>,
    rejected: String,
}

#[async_trait]
impl FileStore for RejectingFileStore {
    async fn prepare_directory(&self, directory_uri: &str) -> StorageResult<()> {
        self.inner.prepare_directory(directory_uri).await
    }

    async fn save_data(&self, data: Vec<u8>, destination_uri: &str) -> StorageResult<FileRecord> {
        if destination_uri.ends_with(&format!("/{}", self.rejected)) {
            return Err(StorageError::WriteFailed(format!(
                "disk full while writing {}",
                destination_uri
            )));
        }
        self.inner.save_data(data, destination_uri).await
    }

    async fn read(&self, uri: &str) -> StorageResult<Vec<u8>> {
        self.inner.read(uri).await
    }

    async fn exists(&self, uri: &str) -> StorageResult<bool> {
        self.inner.exists(uri).await
    }

    fn url(&self, uri: &str) -> StorageResult<String> {
        self.inner.url(uri)
    }

    fn backend_type(&self) -> StorageBackend {
        self.inner.backend_type()
    }
}

async fn build(
    catalog_json: &str,
    content_override: Option<Arc<dyn ContentStore>>,
    rejected_filename: Option<&str>,
) -> TestApp {
    let temp_dir = TempDir::new().unwrap();
    tokio::fs::create_dir_all(temp_dir.path().join("uploads"))
        .await
        .unwrap();

    let catalog = Catalog::from_json(catalog_json).unwrap();
    let configs = InMemoryConfigStore::from_catalog(catalog).await;
    let storage = Arc::new(
        LocalFileStore::new(
            temp_dir.path().join("files"),
            "http://localhost:3000/files".to_string(),
        )
        .await
        .unwrap(),
    );
    let content = InMemoryContentStore::new();

    let config_store: Arc<dyn ConfigStore> = Arc::new(configs.clone());
    let file_store: Arc<dyn FileStore> = match rejected_filename {
        Some(name) => Arc::new(RejectingFileStore {
            inner: storage.clone(),
            rejected: name.to_string(),
        }),
        None => storage.clone(),
    };
    let introspector = Arc::new(EntityFieldIntrospector::new(
        config_store.clone(),
        file_store.clone(),
        Arc::new(DateTokenExpander::fixed(
            Utc.with_ymd_and_hms(2026, 10, 16, 8, 30, 0).unwrap(),
        )),
        DEFAULT_MAX_FILESIZE,
    ));
    let content_store = content_override
        .unwrap_or_else(|| Arc::new(content.clone()) as Arc<dyn ContentStore>);

    let service = BulkUploadService::new(
        config_store,
        content_store,
        file_store,
        introspector,
        DEFAULT_MAX_FILESIZE,
    );

    TestApp {
        service,
        configs,
        content,
        storage,
        _temp_dir: temp_dir,
    }
}

pub async fn setup_test_app(catalog_json: &str) -> TestApp {
    build(catalog_json, None, None).await
}

/// App whose content records can never be saved.
pub async fn setup_failing_app(catalog_json: &str) -> TestApp {
    build(catalog_json, Some(Arc::new(FailingContentStore)), None).await
}

/// App whose file store fails to save uploads named `filename`.
pub async fn setup_rejecting_store_app(catalog_json: &str, filename: &str) -> TestApp {
    build(catalog_json, None, Some(filename)).await
}

pub fn exists(path: &Path) -> bool {
    path.is_file()
}
