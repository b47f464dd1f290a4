//! Stream wrapper uris (`scheme://path`).

use std::fmt::{Display, Formatter, Result as FmtResult};

use crate::traits::{StorageError, StorageResult};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StreamUri {
    pub scheme: String,
    /// Path below the scheme root, without leading or trailing `/`.
    pub target: String,
}

impl StreamUri {
    pub fn parse(uri: &str) -> StorageResult<Self> {
        let (scheme, target) = uri
            .split_once("://")
            .ok_or_else(|| StorageError::InvalidUri(format!("'{}' has no scheme", uri)))?;

        if scheme.is_empty()
            || !scheme
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
        {
            return Err(StorageError::InvalidUri(format!(
                "'{}' has an invalid scheme",
                uri
            )));
        }

        let target = target.trim_matches('/');
        if target.split('/').any(|segment| segment == "..") {
            return Err(StorageError::InvalidUri(
                "Uri contains invalid characters".to_string(),
            ));
        }

        Ok(Self {
            scheme: scheme.to_string(),
            target: target.to_string(),
        })
    }

    /// Uri of `name` inside this directory uri.
    pub fn join(&self, name: &str) -> StreamUri {
        let name = name.trim_matches('/');
        let target = if self.target.is_empty() {
            name.to_string()
        } else {
            format!("{}/{}", self.target, name)
        };
        StreamUri {
            scheme: self.scheme.clone(),
            target,
        }
    }

    /// Last path segment.
    pub fn filename(&self) -> &str {
        self.target.rsplit('/').next().unwrap_or(&self.target)
    }

    /// Directory part of the target, without the filename.
    pub fn dirname(&self) -> StreamUri {
        let target = match self.target.rfind('/') {
            Some(slash) => self.target[..slash].to_string(),
            None => String::new(),
        };
        StreamUri {
            scheme: self.scheme.clone(),
            target,
        }
    }
}

impl Display for StreamUri {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "{}://{}", self.scheme, self.target)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_and_display() {
        let uri = StreamUri::parse("public://2026-10/cat.jpg").unwrap();
        assert_eq!(uri.scheme, "public");
        assert_eq!(uri.target, "2026-10/cat.jpg");
        assert_eq!(uri.filename(), "cat.jpg");
        assert_eq!(uri.dirname().to_string(), "public://2026-10");
        assert_eq!(uri.to_string(), "public://2026-10/cat.jpg");
    }

    #[test]
    fn test_join_on_scheme_root() {
        let dir = StreamUri::parse("private://").unwrap();
        assert_eq!(dir.join("a.pdf").to_string(), "private://a.pdf");
    }

    #[test]
    fn test_rejects_invalid_uris() {
        assert!(StreamUri::parse("no-scheme/cat.jpg").is_err());
        assert!(StreamUri::parse("://cat.jpg").is_err());
        assert!(StreamUri::parse("pub lic://cat.jpg").is_err());
        assert!(StreamUri::parse("public://../etc/passwd").is_err());
        assert!(StreamUri::parse("public://a/../../b").is_err());
    }
}
