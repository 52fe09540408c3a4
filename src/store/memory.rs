//! In-memory store.

use std::collections::BTreeMap;
use std::sync::RwLock;

use super::{SearchFilter, ServiceStore, StoreError, StoreResult};
use crate::model::{EntityId, Policy, Service, ServiceDef};

#[derive(Default)]
struct Tables {
    service_defs: BTreeMap<EntityId, ServiceDef>,
    services: BTreeMap<EntityId, Service>,
    policies: BTreeMap<EntityId, Policy>,
    next_id: EntityId,
}

impl Tables {
    fn assign_id(&mut self, requested: Option<EntityId>) -> EntityId {
        let id = requested.unwrap_or(self.next_id + 1);
        self.next_id = self.next_id.max(id);
        id
    }
}

/// A store backed by ordered maps.
///
/// Entities registered without an id receive the next free one.
#[derive(Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a service definition and returns its id.
    pub fn add_service_def(&self, mut def: ServiceDef) -> EntityId {
        let mut t = self.write();
        let id = t.assign_id(def.id);
        def.id = Some(id);
        t.service_defs.insert(id, def);
        id
    }

    /// Registers a service and returns its id.
    pub fn add_service(&self, mut service: Service) -> EntityId {
        let mut t = self.write();
        let id = t.assign_id(service.id);
        service.id = Some(id);
        t.services.insert(id, service);
        id
    }

    /// Registers a policy and returns its id.
    pub fn add_policy(&self, mut policy: Policy) -> EntityId {
        let mut t = self.write();
        let id = t.assign_id(policy.id);
        policy.id = Some(id);
        t.policies.insert(id, policy);
        id
    }

    /// Removes a policy, returning it if it was present.
    pub fn remove_policy(&self, id: EntityId) -> Option<Policy> {
        self.write().policies.remove(&id)
    }

    fn read(&self) -> std::sync::RwLockReadGuard<'_, Tables> {
        match self.tables.read() {
            Ok(t) => t,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    fn write(&self) -> std::sync::RwLockWriteGuard<'_, Tables> {
        match self.tables.write() {
            Ok(t) => t,
            Err(poisoned) => poisoned.into_inner(),
        }
    }
}

impl ServiceStore for MemoryStore {
    fn get_service_def(&self, id: EntityId) -> StoreResult<ServiceDef> {
        self.read()
            .service_defs
            .get(&id)
            .cloned()
            .ok_or_else(|| StoreError::not_found_id("service-def", id))
    }

    fn get_service_def_by_name(&self, name: &str) -> StoreResult<ServiceDef> {
        self.read()
            .service_defs
            .values()
            .find(|d| d.name == name)
            .cloned()
            .ok_or_else(|| StoreError::not_found_name("service-def", name))
    }

    fn get_service(&self, id: EntityId) -> StoreResult<Service> {
        self.read()
            .services
            .get(&id)
            .cloned()
            .ok_or_else(|| StoreError::not_found_id("service", id))
    }

    fn get_service_by_name(&self, name: &str) -> StoreResult<Service> {
        self.read()
            .services
            .values()
            .find(|s| s.name == name)
            .cloned()
            .ok_or_else(|| StoreError::not_found_name("service", name))
    }

    fn get_policy(&self, id: EntityId) -> StoreResult<Policy> {
        self.read()
            .policies
            .get(&id)
            .cloned()
            .ok_or_else(|| StoreError::not_found_id("policy", id))
    }

    fn list_policies(&self, filter: &SearchFilter) -> StoreResult<Vec<Policy>> {
        Ok(self
            .read()
            .policies
            .values()
            .filter(|p| filter.matches(p))
            .cloned()
            .collect())
    }
}
