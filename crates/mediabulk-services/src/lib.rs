//! Mediabulk Services Library
//!
//! The bulk upload flow and its collaborators:
//! - `access`: capability-based access gate for search server routes
//! - `repository`: configuration and content record stores
//! - `token`: placeholder expansion in directory templates
//! - `introspector`: target field settings and form display lookup
//! - `reconciler`: shared form field computation and form tree rewriting
//! - `bulk_upload`: classification, validation, persistence and batch submit

pub mod access;
pub mod bulk_upload;
pub mod introspector;
pub mod reconciler;
pub mod repository;
pub mod token;

// Re-export commonly used types
pub use access::AccessGate;
pub use bulk_upload::{
    classify, validate_size, BatchReport, BulkUploadService, FileFailure, Notice, NoticeLevel,
    PreparedUpload, ProcessedFile, UploadFormPlan, UploadWidget,
};
pub use introspector::{EntityFieldIntrospector, FieldIntrospector};
pub use reconciler::{compute_shared, force_optional, reconcile_form, SHARED_PARENTS};
pub use repository::{
    load_content_types, Catalog, ConfigStore, ContentStore, InMemoryConfigStore,
    InMemoryContentStore,
};
pub use token::{DateTokenExpander, TokenExpander};
