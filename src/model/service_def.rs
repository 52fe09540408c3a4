//! Service definition schema types.
//!
//! A service definition describes what a pluggable service type accepts:
//! its resource types, access types, enumerations and configuration
//! parameters. Validators derive their rules from these entries at
//! validation time.

use serde::{Deserialize, Serialize};

use super::EntityId;

/// Schema of a service type.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceDef {
    /// Store-assigned identifier (absent on CREATE)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<EntityId>,
    /// Unique name, referenced by `Service::service_type`
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub resources: Vec<ResourceDef>,
    #[serde(default)]
    pub access_types: Vec<AccessTypeDef>,
    #[serde(default)]
    pub enums: Vec<EnumDef>,
    #[serde(default)]
    pub configs: Vec<ConfigDef>,
}

impl ServiceDef {
    /// Create an empty definition with the given name
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn with_id(mut self, id: EntityId) -> Self {
        self.id = Some(id);
        self
    }

    pub fn with_resource(mut self, resource: ResourceDef) -> Self {
        self.resources.push(resource);
        self
    }

    pub fn with_access_type(mut self, access_type: AccessTypeDef) -> Self {
        self.access_types.push(access_type);
        self
    }

    pub fn with_enum(mut self, enum_def: EnumDef) -> Self {
        self.enums.push(enum_def);
        self
    }

    pub fn with_config(mut self, config: ConfigDef) -> Self {
        self.configs.push(config);
        self
    }

    /// Finds an access type by name, ignoring case.
    pub fn access_type(&self, name: &str) -> Option<&AccessTypeDef> {
        let name = name.to_lowercase();
        self.access_types
            .iter()
            .find(|a| a.name.to_lowercase() == name)
    }
}

/// A resource type (e.g. database, table, path).
///
/// Names are unique within a definition and compared case-insensitively.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceDef {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub mandatory: bool,
    /// Pattern every value of this resource must satisfy, if present.
    ///
    /// A value satisfies the pattern when it matches anywhere, so `[a-z]+`
    /// accepts `"Bad-DB"`. Anchor with `^...$` to constrain the whole value.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub validation_reg_ex: Option<String>,
}

impl ResourceDef {
    /// Create a mandatory resource def
    pub fn mandatory(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            mandatory: true,
            validation_reg_ex: None,
        }
    }

    /// Create an optional resource def
    pub fn optional(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            mandatory: false,
            validation_reg_ex: None,
        }
    }

    pub fn with_pattern(mut self, pattern: impl Into<String>) -> Self {
        self.validation_reg_ex = Some(pattern.into());
        self
    }
}

/// An access type (e.g. select, update, all) and the grants it implies.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccessTypeDef {
    #[serde(default)]
    pub name: String,
    /// Names of other access types this one subsumes
    #[serde(default)]
    pub implied_grants: Vec<String>,
}

impl AccessTypeDef {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            implied_grants: Vec::new(),
        }
    }

    pub fn implying<I, S>(mut self, grants: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.implied_grants = grants.into_iter().map(Into::into).collect();
        self
    }
}

/// A named enumeration of allowed values.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnumDef {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub values: Vec<String>,
    /// Index into `values`; unset means the first value
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_index: Option<i32>,
}

impl EnumDef {
    pub fn new<I, S>(name: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            name: name.into(),
            values: values.into_iter().map(Into::into).collect(),
            default_index: None,
        }
    }

    pub fn with_default_index(mut self, index: i32) -> Self {
        self.default_index = Some(index);
        self
    }
}

/// A configuration parameter a service of this type may carry.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigDef {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub mandatory: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_value: Option<String>,
}

impl ConfigDef {
    /// Create a mandatory config def
    pub fn mandatory(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            mandatory: true,
            default_value: None,
        }
    }

    /// Create an optional config def
    pub fn optional(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            mandatory: false,
            default_value: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_deserialize_camel_case() {
        let def: ServiceDef = serde_json::from_value(json!({
            "id": 7,
            "name": "hive",
            "resources": [
                { "name": "database", "mandatory": true, "validationRegEx": "^[a-z_]+$" },
                { "name": "table" }
            ],
            "accessTypes": [
                { "name": "all", "impliedGrants": ["select", "update"] },
                { "name": "select" }
            ],
            "enums": [{ "name": "authnType", "values": ["simple", "kerberos"], "defaultIndex": 1 }],
            "configs": [{ "name": "jdbc.url", "mandatory": true }]
        }))
        .unwrap();

        assert_eq!(def.id, Some(7));
        assert!(def.resources[0].mandatory);
        assert_eq!(def.resources[0].validation_reg_ex.as_deref(), Some("^[a-z_]+$"));
        assert!(!def.resources[1].mandatory);
        assert_eq!(def.access_types[0].implied_grants, vec!["select", "update"]);
        assert_eq!(def.enums[0].default_index, Some(1));
        assert!(def.configs[0].mandatory);
    }

    #[test]
    fn test_access_type_lookup_ignores_case() {
        let def = ServiceDef::new("hdfs").with_access_type(AccessTypeDef::new("Read"));
        assert!(def.access_type("read").is_some());
        assert!(def.access_type("READ").is_some());
        assert!(def.access_type("write").is_none());
    }

    #[test]
    fn test_access_type_lookup_folds_non_ascii() {
        let def = ServiceDef::new("hdfs").with_access_type(AccessTypeDef::new("ÉCRIRE"));
        assert!(def.access_type("écrire").is_some());
    }

    #[test]
    fn test_unanchored_pattern_matches_anywhere() {
        let def = ResourceDef::optional("db").with_pattern("[a-z]+");
        let re = regex::Regex::new(def.validation_reg_ex.as_deref().unwrap()).unwrap();
        assert!(re.is_match("Bad-DB"));
        assert!(!regex::Regex::new("^[a-z]+$").unwrap().is_match("Bad-DB"));
    }
}
