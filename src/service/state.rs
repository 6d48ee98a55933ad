//! Service state management.

use crate::config::ServiceConfig;
use crate::graphql::{build_schema, DocGraphSchema};
use crate::relations::RegistryError;
use crate::store::StoreHandle;

/// Shared service state.
///
/// Holds the executable schema and the one store handle it was built
/// around. Cloning is cheap; every request sees the same store.
#[derive(Clone)]
pub struct ServiceState {
    /// Executable GraphQL schema.
    pub schema: DocGraphSchema,
    /// The process-wide store handle.
    pub store: StoreHandle,
    /// Whether an external reporting key is configured.
    pub engine_reporting: bool,
}

impl ServiceState {
    /// Build the schema and state from a store and configuration.
    pub fn new(store: StoreHandle, config: &ServiceConfig) -> Result<Self, RegistryError> {
        let schema = build_schema(store.clone(), &config.schema_options())?;
        Ok(Self {
            schema,
            store,
            engine_reporting: config.engine_reporting(),
        })
    }

    /// State over a store with default configuration.
    pub fn with_defaults(store: StoreHandle) -> Result<Self, RegistryError> {
        Self::new(store, &ServiceConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::InMemoryDocumentStore;

    #[test]
    fn test_state_shares_store_with_schema() {
        let store = StoreHandle::new(InMemoryDocumentStore::new());
        let state = ServiceState::with_defaults(store).unwrap();
        assert_eq!(state.store.backend_name(), "memory");
        assert!(!state.engine_reporting);
    }

    #[test]
    fn test_engine_reporting_follows_config() {
        let config = ServiceConfig {
            engine_api_key: Some("key".to_string()),
            ..ServiceConfig::default()
        };
        let state = ServiceState::new(StoreHandle::new(InMemoryDocumentStore::new()), &config).unwrap();
        assert!(state.engine_reporting);
    }
}
