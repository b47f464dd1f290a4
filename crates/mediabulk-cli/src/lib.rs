use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Context;
use mediabulk_core::models::{FormValues, UploadedFile};
use mediabulk_core::Config;
use mediabulk_services::{
    BulkUploadService, Catalog, ConfigStore, DateTokenExpander, EntityFieldIntrospector,
    InMemoryConfigStore, InMemoryContentStore,
};
use mediabulk_storage::create_storage;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Initialize tracing for the CLI. Logs go to stderr so stdout stays JSON.
pub fn init_tracing(json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| "mediabulk=info".into());
    let registry = tracing_subscriber::registry().with(filter);

    if json {
        registry
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_writer(std::io::stderr),
            )
            .init();
    } else {
        registry
            .with(
                tracing_subscriber::fmt::layer()
                    .compact()
                    .with_target(false)
                    .with_writer(std::io::stderr),
            )
            .init();
    }
}

pub async fn load_catalog(path: &Path) -> anyhow::Result<Catalog> {
    let json = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("Failed to read catalog {}", path.display()))?;
    Catalog::from_json(&json).with_context(|| format!("Invalid catalog {}", path.display()))
}

/// Parse `--values` input: a JSON object keyed by field name.
pub fn parse_values(input: Option<&str>) -> anyhow::Result<FormValues> {
    match input {
        None => Ok(FormValues::new()),
        Some(raw) => serde_json::from_str(raw).context("--values must be a JSON object"),
    }
}

/// Describe local files as uploads.
///
/// A path that cannot be inspected is still passed on, with size 0, so the
/// batch reports it as a failed file instead of stopping.
pub async fn uploaded_files(paths: &[PathBuf]) -> Vec<UploadedFile> {
    let mut files = Vec::with_capacity(paths.len());
    for path in paths {
        let size = match tokio::fs::metadata(path).await {
            Ok(metadata) => metadata.len(),
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "Cannot stat upload");
                0
            }
        };
        let filename = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();
        files.push(UploadedFile::new(filename, path, size));
    }
    files
}

/// Services wired for one CLI invocation.
pub struct AppContext {
    pub configs: InMemoryConfigStore,
    pub content: InMemoryContentStore,
    pub service: BulkUploadService,
}

pub async fn build_context(config: &Config, catalog: Catalog) -> anyhow::Result<AppContext> {
    let configs = InMemoryConfigStore::from_catalog(catalog).await;
    let content = InMemoryContentStore::new();
    let storage = create_storage(config)
        .await
        .context("Failed to initialize file storage")?;

    let config_store: Arc<dyn ConfigStore> = Arc::new(configs.clone());
    let introspector = Arc::new(EntityFieldIntrospector::new(
        config_store.clone(),
        storage.clone(),
        Arc::new(DateTokenExpander::new()),
        config.upload_max_filesize(),
    ));
    let service = BulkUploadService::new(
        config_store,
        Arc::new(content.clone()),
        storage,
        introspector,
        config.upload_max_filesize(),
    );

    Ok(AppContext {
        configs,
        content,
        service,
    })
}
