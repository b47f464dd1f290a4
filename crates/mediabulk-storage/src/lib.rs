//! Mediabulk Storage Library
//!
//! This crate persists uploaded files. It provides the `FileStore` trait and
//! a local filesystem implementation.
//!
//! # Uri format
//!
//! Files are addressed with stream wrapper uris, `<scheme>://<path>`, for
//! example `public://2026-10/cat.jpg`. The local backend stores such a file
//! at `<base_path>/public/2026-10/cat.jpg`. Paths must not contain `..` or
//! start with `/`.

pub mod factory;
#[cfg(feature = "storage-local")]
pub mod local;
pub mod traits;
pub mod uri;

// Re-export commonly used types
pub use factory::create_storage;
#[cfg(feature = "storage-local")]
pub use local::LocalFileStore;
pub use mediabulk_core::StorageBackend;
pub use traits::{FileStore, StorageError, StorageResult};
pub use uri::StreamUri;
