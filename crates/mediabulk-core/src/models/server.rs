use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

/// Capability markers a search backend can carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Capability {
    /// Backend exposes the Solr administration console.
    SolrAdmin,
    Facets,
    Autocomplete,
}

/// Backend of a search server. Capabilities are fixed at construction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchBackend {
    pub plugin_id: String,
    #[serde(default)]
    capabilities: BTreeSet<Capability>,
}

impl SearchBackend {
    pub fn new(plugin_id: impl Into<String>, capabilities: impl IntoIterator<Item = Capability>) -> Self {
        Self {
            plugin_id: plugin_id.into(),
            capabilities: capabilities.into_iter().collect(),
        }
    }

    /// A Solr backend: administrable, with facets and autocomplete.
    pub fn solr(plugin_id: impl Into<String>) -> Self {
        Self::new(
            plugin_id,
            [Capability::SolrAdmin, Capability::Facets, Capability::Autocomplete],
        )
    }

    pub fn supports(&self, capability: Capability) -> bool {
        self.capabilities.contains(&capability)
    }

    pub fn capabilities(&self) -> impl Iterator<Item = Capability> + '_ {
        self.capabilities.iter().copied()
    }
}

/// A configured search server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchServer {
    pub id: String,
    #[serde(default)]
    pub name: String,
    pub backend: SearchBackend,
}

/// The account a request runs as.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Principal {
    pub id: String,
    #[serde(default)]
    pub roles: Vec<String>,
}

impl Principal {
    pub fn anonymous() -> Self {
        Self {
            id: "anonymous".to_string(),
            roles: vec!["anonymous".to_string()],
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AccessResult {
    Allowed,
    Forbidden,
}

impl AccessResult {
    pub fn is_allowed(self) -> bool {
        self == AccessResult::Allowed
    }
}
