//! Lifecycle actions and entity kinds.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The lifecycle operation a proposed change is validated against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Action {
    Create,
    Update,
    Delete,
}

impl Action {
    pub fn as_str(&self) -> &'static str {
        match self {
            Action::Create => "CREATE",
            Action::Update => "UPDATE",
            Action::Delete => "DELETE",
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Action {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "create" => Ok(Action::Create),
            "update" => Ok(Action::Update),
            "delete" => Ok(Action::Delete),
            other => Err(format!("unknown action '{}'", other)),
        }
    }
}

/// Which kind of entity a validator judges.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EntityKind {
    Policy,
    Service,
    ServiceDef,
}

impl EntityKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            EntityKind::Policy => "policy",
            EntityKind::Service => "service",
            EntityKind::ServiceDef => "service-def",
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_action_parse_and_display() {
        assert_eq!("Create".parse::<Action>(), Ok(Action::Create));
        assert_eq!("DELETE".parse::<Action>(), Ok(Action::Delete));
        assert!("upsert".parse::<Action>().is_err());
        assert_eq!(Action::Update.to_string(), "UPDATE");
    }

    #[test]
    fn test_kind_serde_form() {
        assert_eq!(
            serde_json::to_value(EntityKind::ServiceDef).unwrap(),
            serde_json::json!("service-def")
        );
        assert_eq!(EntityKind::ServiceDef.as_str(), "service-def");
    }
}
