//! Bulk upload of files into content records.
//!
//! A submit runs one pass over the uploaded files in order: classify by
//! extension, check the matched type's size limit, store the file, build the
//! pending record, copy shared form values and save. A file that fails any
//! step is reported and skipped; it never stops the batch.

mod classify;
mod report;
mod service;

pub use classify::{classify, validate_size};
pub use report::{BatchReport, FileFailure, Notice, NoticeLevel};
pub use service::{BulkUploadService, PreparedUpload, ProcessedFile, UploadFormPlan, UploadWidget};
