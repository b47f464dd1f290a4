use serde::{Deserialize, Serialize};

use crate::natural::natural_sort;
use crate::size::{parse_size, SizeParseError};

fn default_uri_scheme() -> String {
    "public".to_string()
}

/// A configured category of content record (a media type).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContentType {
    pub id: String,
    pub label: String,
    /// Name of the field that stores the uploaded file reference.
    pub source_field: String,
    #[serde(default)]
    pub fields: Vec<FieldDefinition>,
}

impl ContentType {
    pub fn field(&self, name: &str) -> Option<&FieldDefinition> {
        self.fields.iter().find(|field| field.name == name)
    }

    pub fn has_field(&self, name: &str) -> bool {
        self.field(name).is_some()
    }

    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|field| field.name.as_str())
    }
}

/// A field attached to a content type.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FieldDefinition {
    pub name: String,
    #[serde(default)]
    pub label: String,
    /// Present on file-backed fields only.
    #[serde(default)]
    pub settings: Option<FileFieldSettings>,
}

/// Stored settings of a file-backed field, as configured.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileFieldSettings {
    /// Space separated list, e.g. `"png gif jpg jpeg"`.
    #[serde(default)]
    pub file_extensions: String,
    /// Human-readable size; empty means "use the process default".
    #[serde(default)]
    pub max_filesize: String,
    /// Directory below the scheme root, may contain `[token]` placeholders.
    #[serde(default)]
    pub file_directory: String,
    #[serde(default = "default_uri_scheme")]
    pub uri_scheme: String,
}

impl Default for FileFieldSettings {
    fn default() -> Self {
        Self {
            file_extensions: String::new(),
            max_filesize: String::new(),
            file_directory: String::new(),
            uri_scheme: default_uri_scheme(),
        }
    }
}

/// Target field settings resolved for one content type of a batch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TargetFieldSettings {
    pub field_name: String,
    /// Lowercase, in configured order, without duplicates.
    pub allowed_extensions: Vec<String>,
    /// Per-type limit, or the process default when the field has none.
    pub max_filesize: String,
    pub directory_template: String,
    pub uri_scheme: String,
}

impl TargetFieldSettings {
    /// Resolve stored field settings, falling back to `default_max_filesize`
    /// when the field does not declare a limit.
    pub fn from_field(
        field_name: &str,
        settings: &FileFieldSettings,
        default_max_filesize: &str,
    ) -> Self {
        let mut allowed_extensions: Vec<String> = Vec::new();
        for extension in settings
            .file_extensions
            .split_whitespace()
            .map(|e| e.trim_start_matches('.').to_lowercase())
            .filter(|e| !e.is_empty())
        {
            if !allowed_extensions.contains(&extension) {
                allowed_extensions.push(extension);
            }
        }

        let max_filesize = match settings.max_filesize.trim() {
            "" => default_max_filesize.to_string(),
            configured => configured.to_string(),
        };

        Self {
            field_name: field_name.to_string(),
            allowed_extensions,
            max_filesize,
            directory_template: settings.file_directory.clone(),
            uri_scheme: settings.uri_scheme.clone(),
        }
    }

    /// Whether `extension` (already lowercase) is accepted by this field.
    pub fn accepts(&self, extension: &str) -> bool {
        self.allowed_extensions.iter().any(|e| e == extension)
    }

    pub fn max_size_bytes(&self) -> Result<u64, SizeParseError> {
        parse_size(&self.max_filesize)
    }

    /// Extensions in natural order, for display.
    pub fn sorted_extensions(&self) -> Vec<String> {
        let mut extensions = self.allowed_extensions.clone();
        natural_sort(&mut extensions);
        extensions
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stored(extensions: &str, max: &str) -> FileFieldSettings {
        FileFieldSettings {
            file_extensions: extensions.to_string(),
            max_filesize: max.to_string(),
            file_directory: "[date:custom:Y]-[date:custom:m]".to_string(),
            uri_scheme: "public".to_string(),
        }
    }

    #[test]
    fn test_extensions_are_normalized() {
        let settings =
            TargetFieldSettings::from_field("field_media_image", &stored(" PNG  jpg .gif png", ""), "32M");
        assert_eq!(settings.allowed_extensions, vec!["png", "jpg", "gif"]);
        assert!(settings.accepts("gif"));
        assert!(!settings.accepts("GIF"));
    }

    #[test]
    fn test_max_filesize_falls_back_to_default() {
        let settings = TargetFieldSettings::from_field("f", &stored("png", "  "), "32M");
        assert_eq!(settings.max_filesize, "32M");
        assert_eq!(settings.max_size_bytes().unwrap(), 32 * 1024 * 1024);

        let settings = TargetFieldSettings::from_field("f", &stored("png", "1 MB"), "32M");
        assert_eq!(settings.max_filesize, "1 MB");
    }

    #[test]
    fn test_sorted_extensions_use_natural_order() {
        let settings = TargetFieldSettings::from_field("f", &stored("mp10 mp4 avi", ""), "32M");
        assert_eq!(settings.sorted_extensions(), vec!["avi", "mp4", "mp10"]);
        assert_eq!(settings.allowed_extensions, vec!["mp10", "mp4", "avi"]);
    }

    #[test]
    fn test_content_type_field_lookup() {
        let content_type = ContentType {
            id: "image".to_string(),
            label: "Image".to_string(),
            source_field: "field_media_image".to_string(),
            fields: vec![FieldDefinition {
                name: "field_tags".to_string(),
                label: "Tags".to_string(),
                settings: None,
            }],
        };
        assert!(content_type.has_field("field_tags"));
        assert!(!content_type.has_field("field_credit"));
        assert_eq!(content_type.field_names().collect::<Vec<_>>(), vec!["field_tags"]);
    }
}
