//! Access check for routes that operate on a search server.

use mediabulk_core::models::{AccessResult, Capability, Principal, SearchServer};

/// Allows a route only for servers whose backend carries `required`.
#[derive(Debug, Clone, Copy)]
pub struct AccessGate {
    required: Capability,
}

impl AccessGate {
    pub fn new(required: Capability) -> Self {
        Self { required }
    }

    /// Gate for the Solr administration routes.
    pub fn solr_admin() -> Self {
        Self::new(Capability::SolrAdmin)
    }

    pub fn required(&self) -> Capability {
        self.required
    }

    /// `principal` is part of the route access contract but plays no part
    /// in this decision; account permissions are checked by other gates.
    pub fn check_access(
        &self,
        _principal: &Principal,
        server: Option<&SearchServer>,
    ) -> AccessResult {
        match server {
            Some(server) if server.backend.supports(self.required) => AccessResult::Allowed,
            _ => AccessResult::Forbidden,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mediabulk_core::models::SearchBackend;

    fn server(backend: SearchBackend) -> SearchServer {
        SearchServer {
            id: "default".to_string(),
            name: "Default".to_string(),
            backend,
        }
    }

    #[test]
    fn test_missing_server_is_forbidden() {
        let gate = AccessGate::solr_admin();
        assert_eq!(
            gate.check_access(&Principal::anonymous(), None),
            AccessResult::Forbidden
        );
    }

    #[test]
    fn test_backend_without_capability_is_forbidden() {
        let gate = AccessGate::solr_admin();
        let db = server(SearchBackend::new("search_api_db", [Capability::Facets]));
        assert_eq!(
            gate.check_access(&Principal::anonymous(), Some(&db)),
            AccessResult::Forbidden
        );
    }

    #[test]
    fn test_backend_with_capability_is_allowed_for_any_principal() {
        let gate = AccessGate::solr_admin();
        let solr = server(SearchBackend::solr("search_api_solr"));
        let admin = Principal {
            id: "1".to_string(),
            roles: vec!["administrator".to_string()],
        };

        assert!(gate.check_access(&admin, Some(&solr)).is_allowed());
        assert!(gate
            .check_access(&Principal::anonymous(), Some(&solr))
            .is_allowed());
    }

    #[test]
    fn test_gate_checks_its_own_capability() {
        let gate = AccessGate::new(Capability::Autocomplete);
        let facets_only = server(SearchBackend::new("custom", [Capability::Facets]));
        assert_eq!(gate.required(), Capability::Autocomplete);
        assert!(!gate
            .check_access(&Principal::anonymous(), Some(&facets_only))
            .is_allowed());
    }
}
