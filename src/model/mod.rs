//! Data model for service definitions, services and policies.
//!
//! All entities are read-only inputs to validation. The JSON form uses
//! camelCase field names so documents exchanged with the admin layer can be
//! deserialized as-is.

mod policy;
mod service;
mod service_def;

pub use policy::{Policy, PolicyItem, PolicyItemAccess, PolicyResource};
pub use service::Service;
pub use service_def::{AccessTypeDef, ConfigDef, EnumDef, ResourceDef, ServiceDef};

/// Numeric identifier assigned by the store.
pub type EntityId = i64;
