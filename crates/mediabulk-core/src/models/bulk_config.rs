use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

/// A bulk upload configuration: which content types one upload form feeds.
///
/// The order of `content_types` matters. The first type is the base type
/// used to render the shared subform, and classification picks the first
/// type whose extensions accept a file.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct BulkUploadConfig {
    #[validate(length(min = 1, message = "Bulk upload config id must not be empty"))]
    pub id: String,
    #[serde(default)]
    pub label: String,
    #[validate(
        length(min = 1, message = "At least one content type is required"),
        custom(function = "validate_unique_ids")
    )]
    pub content_types: Vec<String>,
    /// Form mode used for the shared subform. Empty or absent disables shared fields.
    #[serde(default)]
    pub form_mode: Option<String>,
}

impl BulkUploadConfig {
    /// Whether media form fields should be merged into the upload form.
    pub fn uses_shared_fields(&self) -> bool {
        self.form_mode().is_some()
    }

    pub fn form_mode(&self) -> Option<&str> {
        self.form_mode
            .as_deref()
            .map(str::trim)
            .filter(|mode| !mode.is_empty())
    }
}

#[allow(clippy::ptr_arg)]
fn validate_unique_ids(ids: &Vec<String>) -> Result<(), ValidationError> {
    let mut seen = HashSet::new();
    if ids.iter().all(|id| seen.insert(id.as_str())) {
        Ok(())
    } else {
        let mut err = ValidationError::new("duplicate_content_type");
        err.message = Some("Content types must be unique".into());
        Err(err)
    }
}
