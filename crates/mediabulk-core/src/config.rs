//! Configuration module
//!
//! Process-wide settings for the bulk upload services: where files are
//! stored and the default upload size limit applied to target fields that
//! do not declare one.

use std::env;
use std::fmt::{Display, Formatter, Result as FmtResult};
use std::str::FromStr;

use crate::size::parse_size;

// Common constants
const ENVIRONMENT: &str = "development";
const LOCAL_STORAGE_PATH: &str = "./files";
const LOCAL_STORAGE_BASE_URL: &str = "http://localhost:3000/files";
const UPLOAD_MAX_FILESIZE: &str = "32M";

/// Storage backend types
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    Local,
}

impl FromStr for StorageBackend {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "local" => Ok(StorageBackend::Local),
            _ => Err(anyhow::anyhow!("Unsupported storage backend: {}", s)),
        }
    }
}

impl Display for StorageBackend {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            StorageBackend::Local => write!(f, "local"),
        }
    }
}

/// Application configuration
#[derive(Clone, Debug)]
pub struct Config {
    pub environment: String,
    pub storage_backend: StorageBackend,
    pub local_storage_path: String,
    pub local_storage_base_url: String,
    /// Human-readable size (e.g. `32M`, `2 GB`). Fallback for target fields
    /// without `max_filesize`, and the starting point of the upload widget limit.
    pub upload_max_filesize: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            environment: ENVIRONMENT.to_string(),
            storage_backend: StorageBackend::Local,
            local_storage_path: LOCAL_STORAGE_PATH.to_string(),
            local_storage_base_url: LOCAL_STORAGE_BASE_URL.to_string(),
            upload_max_filesize: UPLOAD_MAX_FILESIZE.to_string(),
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self, anyhow::Error> {
        let config = Config {
            environment: env::var("ENVIRONMENT").unwrap_or_else(|_| ENVIRONMENT.to_string()),
            storage_backend: env::var("STORAGE_BACKEND")
                .ok()
                .filter(|s| !s.is_empty())
                .map(|s| s.parse())
                .transpose()?
                .unwrap_or(StorageBackend::Local),
            local_storage_path: env::var("LOCAL_STORAGE_PATH")
                .ok()
                .filter(|s| !s.is_empty())
                .unwrap_or_else(|| LOCAL_STORAGE_PATH.to_string()),
            local_storage_base_url: env::var("LOCAL_STORAGE_BASE_URL")
                .ok()
                .filter(|s| !s.is_empty())
                .unwrap_or_else(|| LOCAL_STORAGE_BASE_URL.to_string()),
            upload_max_filesize: env::var("UPLOAD_MAX_FILESIZE")
                .ok()
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .unwrap_or_else(|| UPLOAD_MAX_FILESIZE.to_string()),
        };

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), anyhow::Error> {
        if parse_size(&self.upload_max_filesize).is_err() {
            return Err(anyhow::anyhow!(
                "UPLOAD_MAX_FILESIZE must be a size such as 32M or 2 GB, got '{}'",
                self.upload_max_filesize
            ));
        }

        if self.local_storage_path.trim().is_empty() {
            return Err(anyhow::anyhow!(
                "LOCAL_STORAGE_PATH must be set when using local storage backend"
            ));
        }

        Ok(())
    }

    /// Check if the application is running in production mode
    pub fn is_production(&self) -> bool {
        let environment = self.environment.to_lowercase();
        environment == "production" || environment == "prod"
    }

    pub fn upload_max_filesize(&self) -> &str {
        &self.upload_max_filesize
    }

    pub fn local_storage_path(&self) -> &str {
        &self.local_storage_path
    }

    pub fn local_storage_base_url(&self) -> &str {
        &self.local_storage_base_url
    }
}
