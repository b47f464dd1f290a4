use std::collections::BTreeMap;
use std::path::PathBuf;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use uuid::Uuid;

/// A file received by the upload widget, waiting in temporary storage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadedFile {
    /// Original client filename.
    pub filename: String,
    /// Temporary location of the uploaded bytes.
    pub path: PathBuf,
    /// Byte length of the upload.
    pub size: u64,
}

impl UploadedFile {
    pub fn new(filename: impl Into<String>, path: impl Into<PathBuf>, size: u64) -> Self {
        Self {
            filename: filename.into(),
            path: path.into(),
            size,
        }
    }

    pub fn info(&self) -> FileInfo {
        FileInfo::parse(&self.filename)
    }
}

/// Name parts of an uploaded filename.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileInfo {
    /// Last path segment, e.g. `cat.JPG`.
    pub basename: String,
    /// Basename without the last extension, e.g. `cat`.
    pub stem: String,
    /// Text after the last `.`, as written. `None` when there is no dot.
    pub extension: Option<String>,
}

impl FileInfo {
    pub fn parse(filename: &str) -> Self {
        let basename = filename
            .rsplit(|c: char| c == '/' || c == '\\')
            .next()
            .unwrap_or(filename)
            .to_string();

        match basename.rfind('.') {
            Some(dot) => Self {
                stem: basename[..dot].to_string(),
                extension: Some(basename[dot + 1..].to_string()),
                basename,
            },
            None => Self {
                stem: basename.clone(),
                extension: None,
                basename,
            },
        }
    }

    /// Lowercase extension, if both the stem and the extension are non-empty.
    pub fn normalized_extension(&self) -> Option<String> {
        if self.stem.is_empty() {
            return None;
        }
        self.extension
            .as_deref()
            .filter(|extension| !extension.is_empty())
            .map(str::to_lowercase)
    }
}

/// An uploaded file matched to the content type that will hold it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassifiedFile {
    pub file: UploadedFile,
    pub info: FileInfo,
    /// Lowercase extension that selected the content type.
    pub extension: String,
    pub content_type: String,
}

/// A persisted file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileRecord {
    pub id: Uuid,
    /// Stream wrapper uri, e.g. `public://2026-10/cat.jpg`.
    pub uri: String,
    pub filename: String,
    pub size: u64,
    pub url: String,
    pub created_at: DateTime<Utc>,
}

/// A content record built from an upload but not saved yet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PendingContentRecord {
    pub content_type: String,
    pub name: String,
    #[serde(default)]
    pub values: BTreeMap<String, JsonValue>,
}

impl PendingContentRecord {
    pub fn new(content_type: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            content_type: content_type.into(),
            name: name.into(),
            values: BTreeMap::new(),
        }
    }

    /// Record pointing `target_field` at `file`, titled after the file stem.
    pub fn for_file(content_type: &str, target_field: &str, name: &str, file: &FileRecord) -> Self {
        let mut record = Self::new(content_type, name);
        record.set(
            target_field,
            serde_json::json!({
                "target_id": file.id,
                "title": name,
            }),
        );
        record
    }

    pub fn set(&mut self, field_name: &str, value: JsonValue) {
        self.values.insert(field_name.to_string(), value);
    }

    pub fn get(&self, field_name: &str) -> Option<&JsonValue> {
        self.values.get(field_name)
    }
}

/// A saved content record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContentRecord {
    pub id: Uuid,
    pub content_type: String,
    pub name: String,
    pub values: BTreeMap<String, JsonValue>,
    pub created_at: DateTime<Utc>,
}

impl ContentRecord {
    pub fn from_pending(record: PendingContentRecord) -> Self {
        Self {
            id: Uuid::new_v4(),
            content_type: record.content_type,
            name: record.name,
            values: record.values,
            created_at: Utc::now(),
        }
    }
}
