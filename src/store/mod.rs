//! Store contract consumed by the validators.
//!
//! The validation core never persists anything. It reads service
//! definitions, services and policies through [`ServiceStore`]; every method
//! may fail in an implementation-defined way, and `MetadataIndex` is the only
//! caller that sees those failures.
//!
//! Two implementations are provided:
//! - [`MemoryStore`]: programmatic registration, used by tests and embedders
//! - [`DirStore`]: one JSON document per entity under a root directory

mod dir;
mod errors;
mod memory;

pub use dir::DirStore;
pub use errors::{StoreError, StoreResult};
pub use memory::MemoryStore;

use crate::model::{EntityId, Policy, Service, ServiceDef};

/// Filter for [`ServiceStore::list_policies`].
///
/// Unset fields match everything. Set fields match by exact name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchFilter {
    pub policy_name: Option<String>,
    pub service_name: Option<String>,
}

impl SearchFilter {
    pub fn new(policy_name: Option<&str>, service_name: Option<&str>) -> Self {
        Self {
            policy_name: policy_name.map(str::to_string),
            service_name: service_name.map(str::to_string),
        }
    }

    /// Returns true if the policy passes every set criterion
    pub fn matches(&self, policy: &Policy) -> bool {
        let name_ok = self
            .policy_name
            .as_deref()
            .map_or(true, |n| policy.name == n);
        let service_ok = self
            .service_name
            .as_deref()
            .map_or(true, |s| policy.service == s);
        name_ok && service_ok
    }
}

/// Read access to service definitions, services and policies.
pub trait ServiceStore: Send + Sync {
    fn get_service_def(&self, id: EntityId) -> StoreResult<ServiceDef>;

    fn get_service_def_by_name(&self, name: &str) -> StoreResult<ServiceDef>;

    fn get_service(&self, id: EntityId) -> StoreResult<Service>;

    fn get_service_by_name(&self, name: &str) -> StoreResult<Service>;

    fn get_policy(&self, id: EntityId) -> StoreResult<Policy>;

    /// Lists policies passing the filter; ordering is by policy id.
    fn list_policies(&self, filter: &SearchFilter) -> StoreResult<Vec<Policy>>;
}
