use mediabulk_core::models::ContentRecord;
use mediabulk_core::{ErrorMetadata, LogLevel, UploadError};
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NoticeLevel {
    Status,
    Error,
}

/// A dismissable user-facing message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

/// A file that did not become a content record.
#[derive(Debug, Clone, Serialize)]
pub struct FileFailure {
    pub filename: String,
    pub code: String,
    pub message: String,
    pub recoverable: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggested_action: Option<String>,
    #[serde(skip)]
    pub error: UploadError,
}

impl From<UploadError> for FileFailure {
    fn from(error: UploadError) -> Self {
        Self {
            filename: error.filename().to_string(),
            code: error.error_code().to_string(),
            message: error.client_message(),
            recoverable: error.is_recoverable(),
            suggested_action: error.suggested_action().map(String::from),
            error,
        }
    }
}

/// Outcome of one batch submit.
#[derive(Debug, Clone, Default, Serialize)]
pub struct BatchReport {
    pub created: Vec<ContentRecord>,
    pub failures: Vec<FileFailure>,
    pub notices: Vec<Notice>,
}

impl BatchReport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of content records saved by the batch.
    pub fn created_count(&self) -> usize {
        self.created.len()
    }

    pub fn failed_count(&self) -> usize {
        self.failures.len()
    }

    pub fn record_created(&mut self, record: ContentRecord) {
        self.created.push(record);
    }

    /// Log a per-file failure and add its error notice.
    pub fn record_failure(&mut self, error: UploadError) {
        log_upload_error(&error);
        self.notices.push(Notice {
            level: NoticeLevel::Error,
            message: error.client_message(),
        });
        self.failures.push(FileFailure::from(error));
    }

    /// Close the report, adding the success notice when anything was created.
    pub fn finish(mut self) -> Self {
        let count = self.created_count();
        if count > 0 {
            self.notices.push(Notice {
                level: NoticeLevel::Status,
                message: format!("{} media item(s) are created.", count),
            });
        }
        self
    }

    pub fn success_notice(&self) -> Option<&Notice> {
        self.notices
            .iter()
            .find(|notice| notice.level == NoticeLevel::Status)
    }
}

fn log_upload_error(error: &UploadError) {
    let code = error.error_code();
    let filename = error.filename();
    match error.log_level() {
        LogLevel::Debug => {
            tracing::debug!(error = %error, code, filename, "File skipped");
        }
        LogLevel::Warn => {
            tracing::warn!(error = %error, code, filename, "File skipped");
        }
        LogLevel::Error => {
            tracing::error!(error = %error, code, filename, "File skipped");
        }
    }
}
