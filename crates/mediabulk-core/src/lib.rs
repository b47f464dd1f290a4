//! Mediabulk Core Library
//!
//! This crate provides the domain models, error types, configuration and the
//! small parsing helpers (byte sizes, natural ordering) shared by every
//! mediabulk component.

pub mod config;
pub mod error;
pub mod models;
pub mod natural;
pub mod size;

// Re-export commonly used types
pub use config::{Config, StorageBackend};
pub use error::{AppError, ErrorMetadata, LogLevel, UploadError};
pub use natural::{natural_cmp, natural_sort};
pub use size::{format_size, parse_size, SizeParseError};
