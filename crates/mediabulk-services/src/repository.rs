//! Configuration and content record stores.
//!
//! Configuration entities are owned by an external store and only loaded
//! here. The in-memory implementations back the CLI (loaded from a JSON
//! catalog) and the tests.

use async_trait::async_trait;
use mediabulk_core::models::{
    BulkUploadConfig, ContentRecord, ContentType, FormDisplay, PendingContentRecord, SearchServer,
};
use mediabulk_core::AppError;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;
use validator::Validate;

/// Read access to configuration entities.
#[async_trait]
pub trait ConfigStore: Send + Sync {
    async fn bulk_config(&self, id: &str) -> Result<Option<BulkUploadConfig>, AppError>;

    async fn content_type(&self, id: &str) -> Result<Option<ContentType>, AppError>;

    async fn form_display(
        &self,
        content_type: &str,
        mode: &str,
    ) -> Result<Option<FormDisplay>, AppError>;

    async fn search_server(&self, id: &str) -> Result<Option<SearchServer>, AppError>;
}

/// Load content types in the given order; a missing id is an error.
pub async fn load_content_types(
    store: &dyn ConfigStore,
    ids: &[String],
) -> Result<Vec<ContentType>, AppError> {
    let mut content_types = Vec::with_capacity(ids.len());
    for id in ids {
        let content_type = store
            .content_type(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Content type {} not found", id)))?;
        content_types.push(content_type);
    }
    Ok(content_types)
}

/// Persistence of content records built from uploads.
#[async_trait]
pub trait ContentStore: Send + Sync {
    /// Commit a pending record.
    async fn save(&self, record: PendingContentRecord) -> Result<ContentRecord, AppError>;

    async fn get(&self, id: Uuid) -> Result<Option<ContentRecord>, AppError>;
}

/// Serialized form of the configuration store.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Catalog {
    #[serde(default)]
    pub bulk_configs: Vec<BulkUploadConfig>,
    #[serde(default)]
    pub content_types: Vec<ContentType>,
    #[serde(default)]
    pub form_displays: Vec<FormDisplay>,
    #[serde(default)]
    pub servers: Vec<SearchServer>,
}

impl Catalog {
    pub fn from_json(json: &str) -> Result<Self, AppError> {
        let catalog: Catalog = serde_json::from_str(json)?;
        for config in &catalog.bulk_configs {
            config.validate()?;
        }
        Ok(catalog)
    }
}

/// Configuration store held in memory.
#[derive(Clone, Default)]
pub struct InMemoryConfigStore {
    bulk_configs: Arc<RwLock<HashMap<String, BulkUploadConfig>>>,
    content_types: Arc<RwLock<HashMap<String, ContentType>>>,
    form_displays: Arc<RwLock<HashMap<String, FormDisplay>>>,
    servers: Arc<RwLock<HashMap<String, SearchServer>>>,
}

impl InMemoryConfigStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn from_catalog(catalog: Catalog) -> Self {
        let store = Self::new();
        for config in catalog.bulk_configs {
            store.add_bulk_config(config).await;
        }
        for content_type in catalog.content_types {
            store.add_content_type(content_type).await;
        }
        for display in catalog.form_displays {
            store.add_form_display(display).await;
        }
        for server in catalog.servers {
            store.add_search_server(server).await;
        }
        store
    }

    pub async fn add_bulk_config(&self, config: BulkUploadConfig) {
        self.bulk_configs
            .write()
            .await
            .insert(config.id.clone(), config);
    }

    pub async fn add_content_type(&self, content_type: ContentType) {
        self.content_types
            .write()
            .await
            .insert(content_type.id.clone(), content_type);
    }

    pub async fn add_form_display(&self, display: FormDisplay) {
        self.form_displays
            .write()
            .await
            .insert(display.id(), display);
    }

    pub async fn add_search_server(&self, server: SearchServer) {
        self.servers.write().await.insert(server.id.clone(), server);
    }
}

#[async_trait]
impl ConfigStore for InMemoryConfigStore {
    async fn bulk_config(&self, id: &str) -> Result<Option<BulkUploadConfig>, AppError> {
        Ok(self.bulk_configs.read().await.get(id).cloned())
    }

    async fn content_type(&self, id: &str) -> Result<Option<ContentType>, AppError> {
        Ok(self.content_types.read().await.get(id).cloned())
    }

    async fn form_display(
        &self,
        content_type: &str,
        mode: &str,
    ) -> Result<Option<FormDisplay>, AppError> {
        let key = format!("{}.{}", content_type, mode);
        Ok(self.form_displays.read().await.get(&key).cloned())
    }

    async fn search_server(&self, id: &str) -> Result<Option<SearchServer>, AppError> {
        Ok(self.servers.read().await.get(id).cloned())
    }
}

/// Content store held in memory. Keeps insertion order for listing.
#[derive(Clone, Default)]
pub struct InMemoryContentStore {
    records: Arc<RwLock<Vec<ContentRecord>>>,
}

impl InMemoryContentStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn list(&self) -> Vec<ContentRecord> {
        self.records.read().await.clone()
    }

    pub async fn count(&self) -> usize {
        self.records.read().await.len()
    }
}

#[async_trait]
impl ContentStore for InMemoryContentStore {
    async fn save(&self, record: PendingContentRecord) -> Result<ContentRecord, AppError> {
        let saved = ContentRecord::from_pending(record);
        self.records.write().await.push(saved.clone());
        Ok(saved)
    }

    async fn get(&self, id: Uuid) -> Result<Option<ContentRecord>, AppError> {
        Ok(self
            .records
            .read()
            .await
            .iter()
            .find(|record| record.id == id)
            .cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CATALOG: &str = r#"{
        "bulk_configs": [
            {"id": "gallery", "label": "Gallery", "content_types": ["image", "document"], "form_mode": "bulk"}
        ],
        "content_types": [
            {"id": "image", "label": "Image", "source_field": "field_media_image"},
            {"id": "document", "label": "Document", "source_field": "field_media_document"}
        ],
        "form_displays": [
            {"content_type": "image", "mode": "bulk", "components": []}
        ],
        "servers": [
            {"id": "solr", "backend": {"plugin_id": "search_api_solr", "capabilities": ["solr_admin"]}}
        ]
    }"#;

    #[tokio::test]
    async fn test_catalog_loads_into_store() {
        let catalog = Catalog::from_json(CATALOG).unwrap();
        let store = InMemoryConfigStore::from_catalog(catalog).await;

        let config = store.bulk_config("gallery").await.unwrap().unwrap();
        assert_eq!(config.content_types, vec!["image", "document"]);
        assert!(store.bulk_config("missing").await.unwrap().is_none());
        assert!(store.form_display("image", "bulk").await.unwrap().is_some());
        assert!(store.form_display("image", "default").await.unwrap().is_none());
        assert!(store.search_server("solr").await.unwrap().is_some());

        let types = load_content_types(&store, &config.content_types).await.unwrap();
        assert_eq!(types[0].id, "image");
        assert_eq!(types[1].id, "document");
    }

    #[tokio::test]
    async fn test_load_content_types_reports_missing_id() {
        let store = InMemoryConfigStore::new();
        let result = load_content_types(&store, &["video".to_string()]).await;
        assert!(matches!(result, Err(AppError::NotFound(_))));
    }

    #[test]
    fn test_catalog_rejects_invalid_bulk_config() {
        let json = r#"{"bulk_configs": [{"id": "empty", "content_types": []}]}"#;
        assert!(matches!(
            Catalog::from_json(json),
            Err(AppError::InvalidInput(_))
        ));
    }

    #[tokio::test]
    async fn test_content_store_save_and_get() {
        let store = InMemoryContentStore::new();
        let saved = store
            .save(PendingContentRecord::new("image", "cat"))
            .await
            .unwrap();

        assert_eq!(store.count().await, 1);
        let loaded = store.get(saved.id).await.unwrap().unwrap();
        assert_eq!(loaded.name, "cat");
        assert!(store.get(Uuid::new_v4()).await.unwrap().is_none());
    }
}
