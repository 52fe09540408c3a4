//! Service instances.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use super::EntityId;

/// A registered service of some service type.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Service {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<EntityId>,
    #[serde(default)]
    pub name: String,
    /// Name of the service definition this service instantiates
    #[serde(rename = "type", default)]
    pub service_type: String,
    /// Configuration parameter name to value
    #[serde(default)]
    pub configs: HashMap<String, String>,
}

impl Service {
    pub fn new(name: impl Into<String>, service_type: impl Into<String>) -> Self {
        Self {
            id: None,
            name: name.into(),
            service_type: service_type.into(),
            configs: HashMap::new(),
        }
    }

    pub fn with_id(mut self, id: EntityId) -> Self {
        self.id = Some(id);
        self
    }

    pub fn with_config(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.configs.insert(name.into(), value.into());
        self
    }
}
