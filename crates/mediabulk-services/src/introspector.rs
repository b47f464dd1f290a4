//! Field introspection for content types of a bulk upload.

use std::sync::Arc;

use async_trait::async_trait;
use mediabulk_core::models::{BulkUploadConfig, ContentType, FormDisplay, TargetFieldSettings};
use mediabulk_core::{format_size, parse_size, AppError};
use mediabulk_storage::FileStore;

use crate::repository::ConfigStore;
use crate::token::TokenExpander;

/// Reads target field settings and form displays of content types.
#[async_trait]
pub trait FieldIntrospector: Send + Sync {
    /// Name of the field that stores the uploaded file.
    fn target_field_name<'a>(&self, content_type: &'a ContentType) -> &'a str {
        &content_type.source_field
    }

    /// Resolved settings of the target field.
    fn target_field_settings(
        &self,
        content_type: &ContentType,
    ) -> Result<TargetFieldSettings, AppError>;

    /// Expand the directory template into a `scheme://dir` uri and make sure
    /// the directory exists.
    async fn resolve_directory(&self, settings: &TargetFieldSettings) -> Result<String, AppError>;

    /// Form display for the config's form mode, falling back to the default
    /// mode when the type has no display for it.
    async fn form_display(
        &self,
        config: &BulkUploadConfig,
        content_type: &ContentType,
    ) -> Result<Option<FormDisplay>, AppError>;

    /// Names of the fields the type exposes in the config's form mode, in
    /// display order.
    async fn field_component_names(
        &self,
        config: &BulkUploadConfig,
        content_type: &ContentType,
    ) -> Result<Vec<String>, AppError> {
        Ok(self
            .form_display(config, content_type)
            .await?
            .map(|display| display.component_names())
            .unwrap_or_default())
    }
}

/// Introspector backed by the configuration store and the file store.
pub struct EntityFieldIntrospector {
    configs: Arc<dyn ConfigStore>,
    storage: Arc<dyn FileStore>,
    tokens: Arc<dyn TokenExpander>,
    default_max_filesize: String,
}

impl EntityFieldIntrospector {
    /// `default_max_filesize` is shown in display form (`32M` becomes
    /// `32 MB`) wherever a field falls back to it.
    pub fn new(
        configs: Arc<dyn ConfigStore>,
        storage: Arc<dyn FileStore>,
        tokens: Arc<dyn TokenExpander>,
        default_max_filesize: impl Into<String>,
    ) -> Self {
        let raw = default_max_filesize.into();
        let default_max_filesize = parse_size(&raw).map(format_size).unwrap_or(raw);
        Self {
            configs,
            storage,
            tokens,
            default_max_filesize,
        }
    }

    pub fn default_max_filesize(&self) -> &str {
        &self.default_max_filesize
    }
}

#[async_trait]
impl FieldIntrospector for EntityFieldIntrospector {
    fn target_field_settings(
        &self,
        content_type: &ContentType,
    ) -> Result<TargetFieldSettings, AppError> {
        let field_name = self.target_field_name(content_type);
        let field = content_type.field(field_name).ok_or_else(|| {
            AppError::Config(format!(
                "Content type {} has no target field {}",
                content_type.id, field_name
            ))
        })?;
        let settings = field.settings.as_ref().ok_or_else(|| {
            AppError::Config(format!(
                "Field {} of content type {} is not a file field",
                field_name, content_type.id
            ))
        })?;

        Ok(TargetFieldSettings::from_field(
            field_name,
            settings,
            &self.default_max_filesize,
        ))
    }

    async fn resolve_directory(&self, settings: &TargetFieldSettings) -> Result<String, AppError> {
        let template = settings.directory_template.trim_matches('/');
        let directory = self.tokens.replace(template);
        let uri = format!(
            "{}://{}",
            settings.uri_scheme,
            directory.trim_matches('/')
        );

        self.storage.prepare_directory(&uri).await?;
        tracing::debug!(
            field = %settings.field_name,
            directory = %uri,
            "Target directory resolved"
        );
        Ok(uri)
    }

    async fn form_display(
        &self,
        config: &BulkUploadConfig,
        content_type: &ContentType,
    ) -> Result<Option<FormDisplay>, AppError> {
        let mode = config.form_mode().unwrap_or(FormDisplay::DEFAULT_MODE);
        if let Some(display) = self.configs.form_display(&content_type.id, mode).await? {
            return Ok(Some(display));
        }
        if mode == FormDisplay::DEFAULT_MODE {
            return Ok(None);
        }

        tracing::debug!(
            content_type = %content_type.id,
            form_mode = %mode,
            "No form display for mode, falling back to default"
        );
        self.configs
            .form_display(&content_type.id, FormDisplay::DEFAULT_MODE)
            .await
    }
}
