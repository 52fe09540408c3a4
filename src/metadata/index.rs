//! Read-only lookups over a [`ServiceStore`].
//!
//! This is the single seam where store failures are suppressed. Every error
//! (not found, I/O, decoding) is logged once here and turned into `None` or
//! an empty list, so validators can report a semantic "not found" failure
//! instead of aborting.

use std::sync::Arc;

use crate::model::{EntityId, Policy, Service, ServiceDef};
use crate::observability::{Event, SharedLog};
use crate::store::{SearchFilter, ServiceStore, StoreResult};

/// Optional-returning view of a store. Never raises.
#[derive(Clone)]
pub struct MetadataIndex {
    store: Arc<dyn ServiceStore>,
    log: SharedLog,
}

impl MetadataIndex {
    pub fn new(store: Arc<dyn ServiceStore>, log: SharedLog) -> Self {
        Self { store, log }
    }

    /// Returns the sink this index logs to.
    pub fn log(&self) -> &SharedLog {
        &self.log
    }

    pub fn service_def(&self, id: EntityId) -> Option<ServiceDef> {
        self.absorb("service_def", &id.to_string(), self.store.get_service_def(id))
    }

    pub fn service_def_by_name(&self, name: &str) -> Option<ServiceDef> {
        self.absorb(
            "service_def_by_name",
            name,
            self.store.get_service_def_by_name(name),
        )
    }

    pub fn service(&self, id: EntityId) -> Option<Service> {
        self.absorb("service", &id.to_string(), self.store.get_service(id))
    }

    pub fn service_by_name(&self, name: &str) -> Option<Service> {
        self.absorb("service_by_name", name, self.store.get_service_by_name(name))
    }

    pub fn policy(&self, id: EntityId) -> Option<Policy> {
        self.absorb("policy", &id.to_string(), self.store.get_policy(id))
    }

    /// Lists policies by optional policy name and service name.
    ///
    /// A store failure yields an empty list.
    pub fn policies(&self, policy_name: Option<&str>, service_name: Option<&str>) -> Vec<Policy> {
        let filter = SearchFilter::new(policy_name, service_name);
        let key = format!(
            "{}/{}",
            policy_name.unwrap_or("*"),
            service_name.unwrap_or("*")
        );
        self.absorb("policies", &key, self.store.list_policies(&filter))
            .unwrap_or_default()
    }

    fn absorb<T>(&self, lookup: &str, key: &str, result: StoreResult<T>) -> Option<T> {
        match result {
            Ok(value) => Some(value),
            Err(e) => {
                self.log.log(
                    Event::StoreLookupFailed,
                    &[("lookup", lookup), ("key", key), ("error", &e.to_string())],
                );
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::observability::MemoryLogger;
    use crate::store::{MemoryStore, StoreError};

    struct BrokenStore;

    impl ServiceStore for BrokenStore {
        fn get_service_def(&self, _id: EntityId) -> StoreResult<ServiceDef> {
            Err(StoreError::Unavailable("disk on fire".into()))
        }
        fn get_service_def_by_name(&self, _name: &str) -> StoreResult<ServiceDef> {
            Err(StoreError::Unavailable("disk on fire".into()))
        }
        fn get_service(&self, _id: EntityId) -> StoreResult<Service> {
            Err(StoreError::Unavailable("disk on fire".into()))
        }
        fn get_service_by_name(&self, _name: &str) -> StoreResult<Service> {
            Err(StoreError::Unavailable("disk on fire".into()))
        }
        fn get_policy(&self, _id: EntityId) -> StoreResult<Policy> {
            Err(StoreError::Unavailable("disk on fire".into()))
        }
        fn list_policies(&self, _filter: &SearchFilter) -> StoreResult<Vec<Policy>> {
            Err(StoreError::Unavailable("disk on fire".into()))
        }
    }

    #[test]
    fn test_store_errors_become_absence() {
        let log = Arc::new(MemoryLogger::new());
        let index = MetadataIndex::new(Arc::new(BrokenStore), log.clone());

        assert!(index.service_def(1).is_none());
        assert!(index.service_def_by_name("hive").is_none());
        assert!(index.service(1).is_none());
        assert!(index.service_by_name("svc").is_none());
        assert!(index.policy(1).is_none());
        assert!(index.policies(Some("p"), None).is_empty());

        let lines = log.lines_for(Event::StoreLookupFailed);
        assert_eq!(lines.len(), 6);
        assert!(lines[0].contains("disk on fire"));
    }

    #[test]
    fn test_found_entities_pass_through() {
        let store = Arc::new(MemoryStore::new());
        let def_id = store.add_service_def(ServiceDef::new("hive"));
        store.add_service(Service::new("hive-prod", "hive"));
        store.add_policy(Policy::new("p1", "hive-prod"));

        let log = Arc::new(MemoryLogger::new());
        let index = MetadataIndex::new(store, log.clone());

        assert_eq!(index.service_def(def_id).unwrap().name, "hive");
        assert_eq!(index.service_by_name("hive-prod").unwrap().service_type, "hive");
        assert_eq!(index.policies(None, Some("hive-prod")).len(), 1);
        assert!(log.lines().is_empty());
    }

    #[test]
    fn test_not_found_is_logged_and_absent() {
        let log = Arc::new(MemoryLogger::new());
        let index = MetadataIndex::new(Arc::new(MemoryStore::new()), log.clone());

        assert!(index.policy(77).is_none());
        let lines = log.lines_for(Event::StoreLookupFailed);
        assert_eq!(lines.len(), 1);
        assert!(lines[0].contains("\"key\":\"77\""));
    }
}
