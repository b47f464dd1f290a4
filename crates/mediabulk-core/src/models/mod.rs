//! Data models for the bulk upload flow
//!
//! Configuration entities (bulk configs, content types, form displays,
//! search servers) are loaded from an external store and never created here.
//! Upload models are transient and live for a single submit.

mod bulk_config;
mod content_type;
mod form;
mod server;
mod upload;

pub use bulk_config::*;
pub use content_type::*;
pub use form::*;
pub use server::*;
pub use upload::*;
