//! Access-control policy definitions.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use super::EntityId;

/// A policy bound to a service and expressed over its resource types.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Policy {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<EntityId>,
    #[serde(default)]
    pub name: String,
    /// Name of the service this policy belongs to
    #[serde(default)]
    pub service: String,
    /// Resource-type name to resource value
    #[serde(default)]
    pub resources: HashMap<String, PolicyResource>,
    #[serde(default)]
    pub policy_items: Vec<PolicyItem>,
    /// Unset means audit is enabled
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_audit_enabled: Option<bool>,
}

impl Policy {
    pub fn new(name: impl Into<String>, service: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            service: service.into(),
            ..Self::default()
        }
    }

    pub fn with_id(mut self, id: EntityId) -> Self {
        self.id = Some(id);
        self
    }

    pub fn with_resource(mut self, name: impl Into<String>, resource: PolicyResource) -> Self {
        self.resources.insert(name.into(), resource);
        self
    }

    pub fn with_item(mut self, item: PolicyItem) -> Self {
        self.policy_items.push(item);
        self
    }

    pub fn with_audit(mut self, enabled: bool) -> Self {
        self.is_audit_enabled = Some(enabled);
        self
    }
}

/// The value side of a policy resource: literal values plus match flags.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PolicyResource {
    #[serde(default)]
    pub values: Vec<String>,
    #[serde(default)]
    pub is_excludes: bool,
    #[serde(default)]
    pub is_recursive: bool,
}

impl PolicyResource {
    pub fn new<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            values: values.into_iter().map(Into::into).collect(),
            is_excludes: false,
            is_recursive: false,
        }
    }

    /// Single-value shorthand
    pub fn single(value: impl Into<String>) -> Self {
        Self::new([value.into()])
    }
}

/// Grants a set of accesses to users and groups.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PolicyItem {
    #[serde(default)]
    pub users: Vec<String>,
    #[serde(default)]
    pub groups: Vec<String>,
    #[serde(default)]
    pub accesses: Vec<PolicyItemAccess>,
}

impl PolicyItem {
    pub fn for_users<I, S>(users: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            users: users.into_iter().map(Into::into).collect(),
            ..Self::default()
        }
    }

    pub fn allowing(mut self, access_type: impl Into<String>) -> Self {
        self.accesses.push(PolicyItemAccess {
            access_type: access_type.into(),
            is_allowed: Some(true),
        });
        self
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PolicyItemAccess {
    #[serde(rename = "type", default)]
    pub access_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_allowed: Option<bool>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_deserialize_policy() {
        let policy: Policy = serde_json::from_value(json!({
            "id": 3,
            "name": "analysts",
            "service": "hive-prod",
            "resources": {
                "Database": { "values": ["sales"] },
                "table": { "values": ["orders", "refunds"], "isExcludes": true }
            },
            "policyItems": [
                { "users": ["ana"], "accesses": [{ "type": "select", "isAllowed": true }] }
            ]
        }))
        .unwrap();

        assert_eq!(policy.id, Some(3));
        assert_eq!(policy.resources["Database"].values, vec!["sales"]);
        assert!(policy.resources["table"].is_excludes);
        assert_eq!(policy.policy_items[0].accesses[0].access_type, "select");
        assert_eq!(policy.is_audit_enabled, None);
    }

    #[test]
    fn test_unset_audit_flag_is_omitted() {
        let value = serde_json::to_value(Policy::new("p", "svc")).unwrap();
        assert!(value.get("isAuditEnabled").is_none());
    }
}
