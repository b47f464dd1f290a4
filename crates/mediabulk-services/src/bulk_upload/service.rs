use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;

use mediabulk_core::models::{
    BulkUploadConfig, ClassifiedFile, ContentType, FileRecord, FormTree, FormValues,
    PendingContentRecord, TargetFieldSettings, UploadedFile,
};
use mediabulk_core::{parse_size, AppError, UploadError};
use mediabulk_storage::{FileStore, StreamUri};
use serde::Serialize;

use super::classify::{classify, validate_size};
use super::report::BatchReport;
use crate::introspector::FieldIntrospector;
use crate::reconciler::{compute_shared, reconcile_form};
use crate::repository::{load_content_types, ConfigStore, ContentStore};

const OVERLAP_WARNING: &str = "Please be aware that if file extensions overlap between the media \
types that are available in this upload form, that the media entity will be assigned \
automatically to one of these types.";

/// Everything a batch needs to know about its content types.
#[derive(Debug, Clone)]
pub struct PreparedUpload {
    pub config: BulkUploadConfig,
    /// In configuration order.
    pub content_types: Vec<ContentType>,
    pub settings: HashMap<String, TargetFieldSettings>,
    /// Resolved `scheme://dir` per content type id.
    pub directories: HashMap<String, String>,
    /// Form display component names per type, in configuration order.
    pub field_components: Vec<(String, Vec<String>)>,
    /// `"<label> (max <size>): <ext>, <ext>"` per type.
    pub items: Vec<String>,
    /// Union of allowed extensions, first seen first.
    pub allowed_extensions: Vec<String>,
    /// Largest limit across the types, at least the process default.
    pub max_filesize: String,
}

impl PreparedUpload {
    /// Classification candidates in configuration order.
    pub fn targets(&self) -> impl Iterator<Item = (&str, &TargetFieldSettings)> {
        self.content_types.iter().filter_map(|content_type| {
            self.settings
                .get(&content_type.id)
                .map(|settings| (content_type.id.as_str(), settings))
        })
    }

    pub fn content_type(&self, id: &str) -> Option<&ContentType> {
        self.content_types.iter().find(|content_type| content_type.id == id)
    }

    /// The first configured type; its form display renders the shared subform.
    pub fn base_type(&self) -> Option<&ContentType> {
        self.content_types.first()
    }
}

/// Description of the upload form for a bulk config.
#[derive(Debug, Clone, Serialize)]
pub struct UploadFormPlan {
    pub config_id: String,
    pub items: Vec<String>,
    pub warning: String,
    pub upload_widget: UploadWidget,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shared_fields: Option<FormTree>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UploadWidget {
    pub max_filesize: String,
    /// Space separated.
    pub extensions: String,
}

/// A persisted file and the record that will point at it.
#[derive(Debug, Clone)]
pub struct ProcessedFile {
    pub classified: ClassifiedFile,
    pub file: FileRecord,
    pub record: PendingContentRecord,
}

/// Turns batches of uploaded files into content records.
pub struct BulkUploadService {
    configs: Arc<dyn ConfigStore>,
    content: Arc<dyn ContentStore>,
    storage: Arc<dyn FileStore>,
    introspector: Arc<dyn FieldIntrospector>,
    default_max_filesize: String,
}

impl BulkUploadService {
    pub fn new(
        configs: Arc<dyn ConfigStore>,
        content: Arc<dyn ContentStore>,
        storage: Arc<dyn FileStore>,
        introspector: Arc<dyn FieldIntrospector>,
        default_max_filesize: impl Into<String>,
    ) -> Self {
        Self {
            configs,
            content,
            storage,
            introspector,
            default_max_filesize: default_max_filesize.into(),
        }
    }

    async fn load_config(&self, config_id: &str) -> Result<BulkUploadConfig, AppError> {
        self.configs
            .bulk_config(config_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Bulk upload config {} not found", config_id)))
    }

    /// Load the config's content types and resolve their target fields and
    /// directories.
    ///
    /// A type whose target field cannot be resolved is left out of
    /// classification. A type whose directory cannot be prepared still
    /// classifies, but its files fail with `NoMatchingContentType`.
    #[tracing::instrument(skip(self))]
    pub async fn prepare(&self, config_id: &str) -> Result<PreparedUpload, AppError> {
        let config = self.load_config(config_id).await?;
        let content_types = load_content_types(self.configs.as_ref(), &config.content_types).await?;

        let mut settings = HashMap::new();
        let mut directories = HashMap::new();
        let mut field_components = Vec::with_capacity(content_types.len());
        let mut items = Vec::new();
        let mut allowed_extensions: Vec<String> = Vec::new();
        let mut max_filesize = self.default_max_filesize.clone();
        let mut max_bytes = parse_size(&max_filesize).ok();

        for content_type in &content_types {
            field_components.push((
                content_type.id.clone(),
                self.introspector
                    .field_component_names(&config, content_type)
                    .await?,
            ));

            let target = match self.introspector.target_field_settings(content_type) {
                Ok(target) => target,
                Err(e) => {
                    tracing::warn!(
                        content_type = %content_type.id,
                        error = %e,
                        "Target field unavailable, content type skipped"
                    );
                    continue;
                }
            };

            let extensions = target.sorted_extensions();
            items.push(format!(
                "{} (max {}): {}",
                content_type.label,
                target.max_filesize,
                extensions.join(", ")
            ));
            for extension in extensions {
                if !allowed_extensions.contains(&extension) {
                    allowed_extensions.push(extension);
                }
            }

            match target.max_size_bytes() {
                Ok(bytes) if max_bytes.map_or(true, |current| bytes > current) => {
                    max_bytes = Some(bytes);
                    max_filesize = target.max_filesize.clone();
                }
                Ok(_) => {}
                Err(e) => {
                    tracing::warn!(
                        content_type = %content_type.id,
                        max_filesize = %target.max_filesize,
                        error = %e,
                        "Ignoring unparseable size limit for the upload widget"
                    );
                }
            }

            match self.introspector.resolve_directory(&target).await {
                Ok(directory) => {
                    directories.insert(content_type.id.clone(), directory);
                }
                Err(e) => {
                    tracing::error!(
                        content_type = %content_type.id,
                        template = %target.directory_template,
                        error = %e,
                        "Target directory could not be prepared"
                    );
                }
            }

            settings.insert(content_type.id.clone(), target);
        }

        Ok(PreparedUpload {
            config,
            content_types,
            settings,
            directories,
            field_components,
            items,
            allowed_extensions,
            max_filesize,
        })
    }

    /// Describe the upload form for `config_id`.
    pub async fn build_form(&self, config_id: &str) -> Result<UploadFormPlan, AppError> {
        let prepared = self.prepare(config_id).await?;
        let shared_fields = if prepared.config.uses_shared_fields() {
            Some(self.build_shared_form(&prepared).await?)
        } else {
            None
        };

        Ok(UploadFormPlan {
            config_id: prepared.config.id.clone(),
            items: prepared.items.clone(),
            warning: OVERLAP_WARNING.to_string(),
            upload_widget: UploadWidget {
                max_filesize: prepared.max_filesize.clone(),
                extensions: prepared.allowed_extensions.join(" "),
            },
            shared_fields,
        })
    }

    /// Render the base type's form display, without its target field,
    /// reduced to the fields every type shares.
    pub async fn build_shared_form(&self, prepared: &PreparedUpload) -> Result<FormTree, AppError> {
        let Some(base) = prepared.base_type() else {
            return Ok(FormTree::default());
        };
        let Some(display) = self.introspector.form_display(&prepared.config, base).await? else {
            return Ok(FormTree::default());
        };

        let shared = compute_shared(&prepared.field_components);
        let form = display
            .build_form()
            .without(self.introspector.target_field_name(base));
        Ok(reconcile_form(&form, &shared))
    }

    /// Classify, validate and persist one file, then build its pending record.
    pub async fn process_file(
        &self,
        prepared: &PreparedUpload,
        file: &UploadedFile,
    ) -> Result<ProcessedFile, UploadError> {
        let classified = classify(file, prepared.targets())?;
        let filename = classified.info.basename.clone();

        let no_match = || UploadError::NoMatchingContentType {
            filename: filename.clone(),
            content_type: classified.content_type.clone(),
        };
        let content_type = prepared
            .content_type(&classified.content_type)
            .ok_or_else(no_match)?;
        let target = prepared
            .settings
            .get(&content_type.id)
            .ok_or_else(no_match)?;
        let directory = prepared
            .directories
            .get(&content_type.id)
            .ok_or_else(no_match)?;

        let data = tokio::fs::read(&file.path)
            .await
            .map_err(|e| UploadError::ReadFailed {
                filename: filename.clone(),
                reason: e.to_string(),
            })?;
        if data.len() as u64 != file.size {
            tracing::debug!(
                filename = %filename,
                declared_bytes = file.size,
                actual_bytes = data.len(),
                "Upload size differs from its descriptor"
            );
        }
        validate_size(&classified, data.len() as u64, target, &content_type.label)?;

        let destination = StreamUri::parse(directory)
            .map(|dir| dir.join(&filename).to_string())
            .map_err(|e| UploadError::FileRecordCreationFailed {
                filename: filename.clone(),
                reason: e.to_string(),
            })?;

        let stored = self
            .storage
            .save_data(data, &destination)
            .await
            .map_err(|e| UploadError::FileRecordCreationFailed {
                filename: filename.clone(),
                reason: e.to_string(),
            })?;

        let record = PendingContentRecord::for_file(
            &content_type.id,
            &target.field_name,
            &classified.info.stem,
            &stored,
        );

        Ok(ProcessedFile {
            classified,
            file: stored,
            record,
        })
    }

    /// Copy shared values the type-specific extraction did not set onto the
    /// record. Only fields of the record's type are copied; the target field
    /// is never overwritten.
    pub fn merge_shared_form_values(
        record: &mut PendingContentRecord,
        content_type: &ContentType,
        shared_values: &FormValues,
        extracted: &BTreeSet<String>,
    ) {
        for (name, value) in shared_values {
            if name == &content_type.source_field
                || !content_type.has_field(name)
                || extracted.contains(name)
            {
                continue;
            }
            record.set(name, value.clone());
        }
    }

    /// Process every file in order and save a content record for each one
    /// that passes. A failing file is reported and the batch moves on; records
    /// saved earlier stay saved.
    #[tracing::instrument(skip(self, files, shared_values), fields(file_count = files.len()))]
    pub async fn submit(
        &self,
        config_id: &str,
        files: &[UploadedFile],
        shared_values: &FormValues,
    ) -> Result<BatchReport, AppError> {
        let prepared = self.prepare(config_id).await?;

        let shared = if prepared.config.uses_shared_fields() {
            let form = self.build_shared_form(&prepared).await?;
            let display = match prepared.base_type() {
                Some(base) => self.introspector.form_display(&prepared.config, base).await?,
                None => None,
            };
            display.map(|display| (display, form))
        } else {
            None
        };

        let mut report = BatchReport::new();
        for file in files {
            let processed = match self.process_file(&prepared, file).await {
                Ok(processed) => processed,
                Err(e) => {
                    report.record_failure(e);
                    continue;
                }
            };

            let ProcessedFile {
                classified,
                file: stored,
                mut record,
            } = processed;

            if let (Some((display, form)), Some(content_type)) =
                (&shared, prepared.content_type(&classified.content_type))
            {
                let extracted =
                    display.extract_form_values(form, shared_values, content_type, &mut record);
                Self::merge_shared_form_values(&mut record, content_type, shared_values, &extracted);
            }

            match self.content.save(record).await {
                Ok(saved) => {
                    tracing::info!(
                        filename = %classified.info.basename,
                        content_type = %saved.content_type,
                        record_id = %saved.id,
                        file_uri = %stored.uri,
                        size_bytes = stored.size,
                        "Media item created"
                    );
                    report.record_created(saved);
                }
                Err(e) => {
                    // The stored file stays in place without a record.
                    report.record_failure(UploadError::SaveFailed {
                        filename: classified.info.basename.clone(),
                        file_uri: stored.uri.clone(),
                        reason: e.to_string(),
                    });
                }
            }
        }

        let report = report.finish();
        tracing::info!(
            config_id = %prepared.config.id,
            created = report.created_count(),
            failed = report.failed_count(),
            "Bulk upload finished"
        );
        Ok(report)
    }
}
