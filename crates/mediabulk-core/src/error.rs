//! Error types module
//!
//! `AppError` covers failures outside a single uploaded file: missing
//! configuration entities, storage misconfiguration, invalid catalog data.
//! `UploadError` is the per-file taxonomy of the bulk upload flow. Per-file
//! errors never abort a batch; they are logged and reported next to the file
//! that caused them.

use std::io;

/// Log level for error reporting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    /// Debug level - for expected errors like validation failures
    Debug,
    /// Warning level - for recoverable issues like rejected uploads
    Warn,
    /// Error level - for unexpected failures
    Error,
}

/// Metadata for error responses - defines how an error should be presented
pub trait ErrorMetadata {
    /// HTTP-style status code for callers that expose the error over a request
    fn http_status_code(&self) -> u16;

    /// Machine-readable error code (e.g., "NOT_FOUND")
    fn error_code(&self) -> &'static str;

    /// Whether this error is recoverable (can be retried)
    fn is_recoverable(&self) -> bool;

    /// Suggested action for the user
    fn suggested_action(&self) -> Option<&'static str>;

    /// User-facing message (may differ from internal error message)
    fn client_message(&self) -> String;

    /// Whether details should be hidden in production
    fn is_sensitive(&self) -> bool;

    /// Log level for this error
    fn log_level(&self) -> LogLevel;
}

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Internal error: {0}")]
    Internal(String),

    #[error("Internal error with source")]
    InternalWithSource {
        message: String,
        #[source]
        source: anyhow::Error,
    },
}

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        AppError::InternalWithSource {
            message: err.to_string(),
            source: err,
        }
    }
}

impl From<io::Error> for AppError {
    fn from(err: io::Error) -> Self {
        AppError::Internal(format!("IO error: {}", err))
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::InvalidInput(format!("JSON parsing error: {}", err))
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(err: validator::ValidationErrors) -> Self {
        AppError::InvalidInput(format!("Validation error: {}", err))
    }
}

impl AppError {
    /// Get detailed error information including error chain
    pub fn detailed_message(&self) -> String {
        use std::error::Error;

        let mut details = self.to_string();

        let mut source = self.source();
        let mut depth = 0;
        while let Some(err) = source {
            depth += 1;
            if depth > 5 {
                details.push_str("\n  ... (truncated)");
                break;
            }
            details.push_str(&format!("\n  Caused by: {}", err));
            source = err.source();
        }

        details
    }
}

impl ErrorMetadata for AppError {
    fn http_status_code(&self) -> u16 {
        match self {
            AppError::InvalidInput(_) => 400,
            AppError::NotFound(_) => 404,
            AppError::Storage(_)
            | AppError::Config(_)
            | AppError::Internal(_)
            | AppError::InternalWithSource { .. } => 500,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            AppError::Storage(_) => "STORAGE_ERROR",
            AppError::InvalidInput(_) => "INVALID_INPUT",
            AppError::NotFound(_) => "NOT_FOUND",
            AppError::Config(_) => "CONFIGURATION_ERROR",
            AppError::Internal(_) | AppError::InternalWithSource { .. } => "INTERNAL_ERROR",
        }
    }

    fn is_recoverable(&self) -> bool {
        matches!(
            self,
            AppError::Storage(_) | AppError::Internal(_) | AppError::InternalWithSource { .. }
        )
    }

    fn suggested_action(&self) -> Option<&'static str> {
        match self {
            AppError::Storage(_) => Some("Retry after a short delay"),
            AppError::InvalidInput(_) => Some("Check the submitted values and try again"),
            AppError::NotFound(_) => Some("Verify the configuration ID exists"),
            AppError::Config(_) => Some("Review the bulk upload configuration"),
            AppError::Internal(_) | AppError::InternalWithSource { .. } => {
                Some("Retry after a short delay")
            }
        }
    }

    fn client_message(&self) -> String {
        match self {
            AppError::Storage(_) => "Failed to access storage".to_string(),
            AppError::InvalidInput(ref msg) => msg.clone(),
            AppError::NotFound(ref msg) => msg.clone(),
            AppError::Config(ref msg) => msg.clone(),
            AppError::Internal(_) | AppError::InternalWithSource { .. } => {
                "Internal error".to_string()
            }
        }
    }

    fn is_sensitive(&self) -> bool {
        matches!(
            self,
            AppError::Storage(_) | AppError::Internal(_) | AppError::InternalWithSource { .. }
        )
    }

    fn log_level(&self) -> LogLevel {
        match self {
            AppError::InvalidInput(_) | AppError::NotFound(_) => LogLevel::Debug,
            AppError::Config(_) => LogLevel::Warn,
            AppError::Storage(_) | AppError::Internal(_) | AppError::InternalWithSource { .. } => {
                LogLevel::Error
            }
        }
    }
}

/// Reasons a single uploaded file did not become a content record.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum UploadError {
    #[error("File {filename} does not have a valid extension or filename.")]
    InvalidFilename { filename: String },

    #[error("File {filename} has extension '{extension}' which no media type in this upload accepts.")]
    UnsupportedExtension { filename: String, extension: String },

    #[error("File {filename} exceeds the maximum file size of {max_size} for media type {content_type}.")]
    ExceedsMaxSize {
        filename: String,
        size: u64,
        max_size: String,
        content_type: String,
    },

    #[error("Media type {content_type} has an invalid maximum file size '{max_size}'.")]
    InvalidSizeLimit {
        filename: String,
        max_size: String,
        content_type: String,
    },

    #[error("File {filename} could not be read: {reason}")]
    ReadFailed { filename: String, reason: String },

    #[error("File {filename} could not be created.")]
    FileRecordCreationFailed { filename: String, reason: String },

    #[error("No matching media type for file {filename} (media type {content_type} is not prepared for this upload).")]
    NoMatchingContentType {
        filename: String,
        content_type: String,
    },

    #[error("Media item for file {filename} could not be saved: {reason}")]
    SaveFailed {
        filename: String,
        file_uri: String,
        reason: String,
    },
}

impl UploadError {
    /// Name of the uploaded file the error belongs to.
    pub fn filename(&self) -> &str {
        match self {
            UploadError::InvalidFilename { filename }
            | UploadError::UnsupportedExtension { filename, .. }
            | UploadError::ExceedsMaxSize { filename, .. }
            | UploadError::InvalidSizeLimit { filename, .. }
            | UploadError::ReadFailed { filename, .. }
            | UploadError::FileRecordCreationFailed { filename, .. }
            | UploadError::NoMatchingContentType { filename, .. }
            | UploadError::SaveFailed { filename, .. } => filename,
        }
    }
}

impl ErrorMetadata for UploadError {
    fn http_status_code(&self) -> u16 {
        match self {
            UploadError::InvalidFilename { .. } | UploadError::UnsupportedExtension { .. } => 400,
            UploadError::ExceedsMaxSize { .. } => 413,
            UploadError::InvalidSizeLimit { .. }
            | UploadError::NoMatchingContentType { .. }
            | UploadError::ReadFailed { .. }
            | UploadError::FileRecordCreationFailed { .. }
            | UploadError::SaveFailed { .. } => 500,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            UploadError::InvalidFilename { .. } => "INVALID_FILENAME",
            UploadError::UnsupportedExtension { .. } => "UNSUPPORTED_EXTENSION",
            UploadError::ExceedsMaxSize { .. } => "EXCEEDS_MAX_SIZE",
            UploadError::InvalidSizeLimit { .. } => "INVALID_SIZE_LIMIT",
            UploadError::ReadFailed { .. } => "READ_FAILED",
            UploadError::FileRecordCreationFailed { .. } => "FILE_RECORD_CREATION_FAILED",
            UploadError::NoMatchingContentType { .. } => "NO_MATCHING_CONTENT_TYPE",
            UploadError::SaveFailed { .. } => "SAVE_FAILED",
        }
    }

    fn is_recoverable(&self) -> bool {
        matches!(
            self,
            UploadError::ReadFailed { .. }
                | UploadError::FileRecordCreationFailed { .. }
                | UploadError::SaveFailed { .. }
        )
    }

    fn suggested_action(&self) -> Option<&'static str> {
        match self {
            UploadError::InvalidFilename { .. } => Some("Rename the file to include a name and an extension"),
            UploadError::UnsupportedExtension { .. } => {
                Some("Upload a file type listed in the media types information")
            }
            UploadError::ExceedsMaxSize { .. } => Some("Reduce file size and upload again"),
            UploadError::InvalidSizeLimit { .. } | UploadError::NoMatchingContentType { .. } => {
                Some("Review the bulk upload configuration")
            }
            UploadError::ReadFailed { .. }
            | UploadError::FileRecordCreationFailed { .. }
            | UploadError::SaveFailed { .. } => Some("Retry the upload"),
        }
    }

    fn client_message(&self) -> String {
        match self {
            UploadError::FileRecordCreationFailed { filename, .. } => {
                format!("File {} could not be created.", filename)
            }
            UploadError::ReadFailed { filename, .. } => {
                format!("File {} could not be read.", filename)
            }
            UploadError::SaveFailed { filename, .. } => {
                format!("Media item for file {} could not be saved.", filename)
            }
            other => other.to_string(),
        }
    }

    fn is_sensitive(&self) -> bool {
        matches!(
            self,
            UploadError::ReadFailed { .. }
                | UploadError::FileRecordCreationFailed { .. }
                | UploadError::SaveFailed { .. }
        )
    }

    fn log_level(&self) -> LogLevel {
        match self {
            UploadError::InvalidFilename { .. }
            | UploadError::UnsupportedExtension { .. }
            | UploadError::ExceedsMaxSize { .. } => LogLevel::Warn,
            _ => LogLevel::Error,
        }
    }
}
