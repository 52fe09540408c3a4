//! Policy validation.
//!
//! Rules for CREATE/UPDATE:
//! - `name` and `service` must be present
//! - the service and its definition must resolve
//! - every mandatory resource of the definition must be supplied
//! - every supplied resource must be defined, and its values must satisfy
//!   the resource's validation pattern
//! - every access type granted must be defined
//! - no other policy of the same service may carry the same name
//!
//! DELETE only requires the policy to exist.

use regex::Regex;

use super::action::{Action, EntityKind};
use super::engine::{evaluate, RuleCheck};
use super::errors::ValidationResult;
use super::failure::FailureCollector;
use super::rules::{internal, invalid, missing, not_found, sorted_difference};
use crate::metadata::names::is_blank;
use crate::metadata::{MetadataIndex, NameNormalizer};
use crate::model::{EntityId, Policy, ServiceDef};
use crate::observability::SharedLog;

/// Validates policy definitions against their service's schema.
#[derive(Clone)]
pub struct PolicyValidator {
    index: MetadataIndex,
    names: NameNormalizer,
}

impl PolicyValidator {
    pub fn new(index: MetadataIndex) -> Self {
        let names = NameNormalizer::new(index.log().clone());
        Self { index, names }
    }

    /// Validates a proposed policy against the store's current state.
    pub fn validate_policy(&self, policy: &Policy, action: Action) -> ValidationResult<()> {
        let subject = subject_of(policy);
        evaluate(
            EntityKind::Policy,
            &subject,
            action,
            self.index.log().as_ref(),
            |failures| self.check_policy(policy, action, failures),
        )
    }

    /// Effective audit flag; unset means enabled.
    pub fn is_audit_enabled(&self, policy: Option<&Policy>) -> bool {
        self.names.audit_enabled(policy)
    }

    /// Appends every violation of `policy` for `action`.
    pub fn check_policy(&self, policy: &Policy, action: Action, failures: &mut FailureCollector) -> bool {
        if action == Action::Delete {
            return self.check_exists(policy.id, failures);
        }

        let mut valid = true;

        if is_blank(&policy.name) {
            failures.push(missing("name", None, "policy name is required"));
            valid = false;
        }
        if action == Action::Update {
            valid &= self.check_exists(policy.id, failures);
        }
        valid &= self.check_unique_name(policy, failures);

        if is_blank(&policy.service) {
            failures.push(missing("service", None, "policy must reference a service"));
            return false;
        }
        let Some(service) = self.index.service_by_name(&policy.service) else {
            failures.push(not_found(
                "service",
                format!("service '{}' does not exist", policy.service),
            ));
            return false;
        };
        let Some(def) = self.index.service_def_by_name(&service.service_type) else {
            failures.push(not_found(
                "service",
                format!(
                    "service definition '{}' of service '{}' does not exist",
                    service.service_type, service.name
                ),
            ));
            return false;
        };

        valid &= self.check_resources(policy, &def, failures);
        valid &= self.check_accesses(policy, &def, failures);
        valid
    }

    fn check_exists(&self, id: Option<EntityId>, failures: &mut FailureCollector) -> bool {
        let Some(id) = id else {
            failures.push(missing("id", None, "policy id is required"));
            return false;
        };
        if self.index.policy(id).is_none() {
            failures.push(not_found("id", format!("no policy with id {}", id)));
            return false;
        }
        true
    }

    fn check_unique_name(&self, policy: &Policy, failures: &mut FailureCollector) -> bool {
        if is_blank(&policy.name) || is_blank(&policy.service) {
            return true;
        }
        let clash = self
            .index
            .policies(Some(&policy.name), Some(&policy.service))
            .into_iter()
            .find(|other| other.id != policy.id);
        match clash {
            Some(other) => {
                let other_id = other.id.map_or_else(|| "?".to_string(), |id| id.to_string());
                failures.push(invalid(
                    "name",
                    None,
                    format!(
                        "policy '{}' already exists in service '{}' with id {}",
                        policy.name, policy.service, other_id
                    ),
                ));
                false
            }
            None => true,
        }
    }

    fn check_resources(
        &self,
        policy: &Policy,
        def: &ServiceDef,
        failures: &mut FailureCollector,
    ) -> bool {
        let mut valid = true;
        let supplied = self.names.policy_resource_names(Some(policy));

        let mandatory = self.names.mandatory_resource_names(Some(def));
        for name in sorted_difference(&mandatory, &supplied) {
            failures.push(missing(
                "resources",
                Some(name),
                "mandatory resource not supplied",
            ));
            valid = false;
        }

        let known = self.names.all_resource_names(Some(def));
        for name in sorted_difference(&supplied, &known) {
            failures.push(invalid(
                "resources",
                Some(name),
                format!("resource type not defined by service definition '{}'", def.name),
            ));
            valid = false;
        }

        let mut supplied_keys: Vec<&String> = policy.resources.keys().collect();
        supplied_keys.sort();
        let mut patterns: Vec<(String, String)> =
            self.names.validation_patterns(Some(def)).into_iter().collect();
        patterns.sort();

        for (name, pattern) in patterns {
            let lower = name.to_lowercase();
            // Keys differing only by case are all checked.
            let matching: Vec<&String> = supplied_keys
                .iter()
                .copied()
                .filter(|key| key.to_lowercase() == lower)
                .collect();
            if matching.is_empty() {
                continue;
            }
            let re = match Regex::new(&pattern) {
                Ok(re) => re,
                Err(e) => {
                    failures.push(internal(
                        "resources",
                        Some(&name),
                        format!("validation pattern '{}' does not compile: {}", pattern, e),
                    ));
                    valid = false;
                    continue;
                }
            };
            for key in matching {
                for value in &policy.resources[key].values {
                    if !re.is_match(value) {
                        failures.push(invalid(
                            "resources",
                            Some(key.as_str()),
                            format!("value '{}' does not match pattern '{}'", value, pattern),
                        ));
                        valid = false;
                    }
                }
            }
        }

        valid
    }

    fn check_accesses(&self, policy: &Policy, def: &ServiceDef, failures: &mut FailureCollector) -> bool {
        let mut valid = true;
        let known = self.names.access_type_names(Some(def));

        for (i, item) in policy.policy_items.iter().enumerate() {
            let field = format!("policyItems[{}].accesses", i);
            for access in &item.accesses {
                if is_blank(&access.access_type) {
                    failures.push(missing(&field, None, "access type is required"));
                    valid = false;
                } else if !known.contains(&access.access_type.to_lowercase()) {
                    failures.push(invalid(
                        &field,
                        Some(&access.access_type),
                        format!("access type not defined by service definition '{}'", def.name),
                    ));
                    valid = false;
                }
            }
        }
        valid
    }
}

impl RuleCheck for PolicyValidator {
    const KIND: EntityKind = EntityKind::Policy;

    fn log(&self) -> &SharedLog {
        self.index.log()
    }

    fn check_rules(&self, id: EntityId, action: Action, failures: &mut FailureCollector) -> bool {
        if action == Action::Delete {
            return self.check_exists(Some(id), failures);
        }
        match self.index.policy(id) {
            Some(policy) => self.check_policy(&policy, action, failures),
            None => {
                failures.push(not_found("id", format!("no policy with id {}", id)));
                false
            }
        }
    }
}

fn subject_of(policy: &Policy) -> String {
    match policy.id {
        Some(id) => id.to_string(),
        None => policy.name.clone(),
    }
}
