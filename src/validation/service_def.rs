//! Service definition validation.
//!
//! The definition is itself the schema other validators read, so its own
//! checks are structural: names present and unique, patterns compilable,
//! implied grants resolvable and enum defaults in range.

use std::collections::HashSet;

use regex::Regex;

use super::action::{Action, EntityKind};
use super::engine::{evaluate, RuleCheck};
use super::errors::ValidationResult;
use super::failure::FailureCollector;
use super::rules::{duplicates_ignoring_case, invalid, missing, not_found};
use crate::metadata::names::is_blank;
use crate::metadata::{MetadataIndex, NameNormalizer};
use crate::model::{EntityId, ServiceDef};
use crate::observability::SharedLog;

/// Validates service definitions.
#[derive(Clone)]
pub struct ServiceDefValidator {
    index: MetadataIndex,
    names: NameNormalizer,
}

impl ServiceDefValidator {
    pub fn new(index: MetadataIndex) -> Self {
        let names = NameNormalizer::new(index.log().clone());
        Self { index, names }
    }

    /// Validates a proposed definition against the store's current state.
    pub fn validate_service_def(&self, def: &ServiceDef, action: Action) -> ValidationResult<()> {
        let subject = match def.id {
            Some(id) => id.to_string(),
            None => def.name.clone(),
        };
        evaluate(
            EntityKind::ServiceDef,
            &subject,
            action,
            self.index.log().as_ref(),
            |failures| self.check_service_def(def, action, failures),
        )
    }

    pub fn check_service_def(&self, def: &ServiceDef, action: Action, failures: &mut FailureCollector) -> bool {
        if action == Action::Delete {
            return self.check_exists(def.id, failures);
        }

        let mut valid = true;

        if is_blank(&def.name) {
            failures.push(missing("name", None, "service definition name is required"));
            valid = false;
        } else if let Some(existing) = self.index.service_def_by_name(&def.name) {
            if existing.id != def.id {
                failures.push(invalid(
                    "name",
                    None,
                    format!("service definition '{}' already exists", def.name),
                ));
                valid = false;
            }
        }
        if action == Action::Update {
            valid &= self.check_exists(def.id, failures);
        }

        valid &= self.check_resources(def, failures);
        valid &= self.check_access_types(def, failures);
        valid &= self.check_enums(def, failures);
        valid &= self.check_configs(def, failures);
        valid
    }

    fn check_exists(&self, id: Option<EntityId>, failures: &mut FailureCollector) -> bool {
        let Some(id) = id else {
            failures.push(missing("id", None, "service definition id is required"));
            return false;
        };
        if self.index.service_def(id).is_none() {
            failures.push(not_found("id", format!("no service definition with id {}", id)));
            return false;
        }
        true
    }

    fn check_resources(&self, def: &ServiceDef, failures: &mut FailureCollector) -> bool {
        let mut valid = true;

        for (i, resource) in def.resources.iter().enumerate() {
            if is_blank(&resource.name) {
                failures.push(missing(
                    "resources",
                    None,
                    format!("resource at position {} has no name", i),
                ));
                valid = false;
            }
        }
        for name in duplicates_ignoring_case(named(def.resources.iter().map(|r| r.name.as_str()))) {
            failures.push(invalid("resources", Some(&name), "resource name defined more than once"));
            valid = false;
        }
        for (name, pattern) in sorted(self.names.validation_patterns(Some(def))) {
            if let Err(e) = Regex::new(&pattern) {
                failures.push(invalid(
                    "resources",
                    Some(&name),
                    format!("validation pattern '{}' does not compile: {}", pattern, e),
                ));
                valid = false;
            }
        }
        valid
    }

    fn check_access_types(&self, def: &ServiceDef, failures: &mut FailureCollector) -> bool {
        let mut valid = true;

        for (i, access_type) in def.access_types.iter().enumerate() {
            if is_blank(&access_type.name) {
                failures.push(missing(
                    "accessTypes",
                    None,
                    format!("access type at position {} has no name", i),
                ));
                valid = false;
            }
        }
        for name in duplicates_ignoring_case(named(def.access_types.iter().map(|a| a.name.as_str()))) {
            failures.push(invalid("accessTypes", Some(&name), "access type defined more than once"));
            valid = false;
        }

        for access_type in def.access_types.iter().filter(|a| !is_blank(&a.name)) {
            let grants = self.names.implied_grants(Some(access_type)).unwrap_or_default();
            for grant in grants {
                let resolved = def.access_type(&grant).filter(|a| !is_blank(&a.name));
                if resolved.is_none() {
                    failures.push(invalid(
                        "accessTypes",
                        Some(&access_type.name),
                        format!("implied grant '{}' is not an access type of this definition", grant),
                    ));
                    valid = false;
                }
            }
        }
        valid
    }

    fn check_enums(&self, def: &ServiceDef, failures: &mut FailureCollector) -> bool {
        let mut valid = true;

        for (i, enum_def) in def.enums.iter().enumerate() {
            if is_blank(&enum_def.name) {
                failures.push(missing("enums", None, format!("enum at position {} has no name", i)));
                valid = false;
            }
            if enum_def.values.is_empty() {
                failures.push(invalid("enums", Some(&enum_def.name), "enum has no values"));
                valid = false;
                continue;
            }
            let index = self.names.enum_default_index(Some(enum_def));
            if index < 0 || index as usize >= enum_def.values.len() {
                failures.push(invalid(
                    "enums",
                    Some(&enum_def.name),
                    format!(
                        "default index {} outside of {} values",
                        index,
                        enum_def.values.len()
                    ),
                ));
                valid = false;
            }
        }
        valid
    }

    fn check_configs(&self, def: &ServiceDef, failures: &mut FailureCollector) -> bool {
        let mut valid = true;
        let mut seen = HashSet::new();

        for (i, config) in def.configs.iter().enumerate() {
            if is_blank(&config.name) {
                failures.push(missing("configs", None, format!("config at position {} has no name", i)));
                valid = false;
            } else if !seen.insert(config.name.as_str()) {
                failures.push(invalid(
                    "configs",
                    Some(&config.name),
                    "configuration parameter defined more than once",
                ));
                valid = false;
            }
        }
        valid
    }
}

impl RuleCheck for ServiceDefValidator {
    const KIND: EntityKind = EntityKind::ServiceDef;

    fn log(&self) -> &SharedLog {
        self.index.log()
    }

    fn check_rules(&self, id: EntityId, action: Action, failures: &mut FailureCollector) -> bool {
        if action == Action::Delete {
            return self.check_exists(Some(id), failures);
        }
        match self.index.service_def(id) {
            Some(def) => self.check_service_def(&def, action, failures),
            None => {
                failures.push(not_found("id", format!("no service definition with id {}", id)));
                false
            }
        }
    }
}

fn named<'a, I>(names: I) -> impl Iterator<Item = &'a str>
where
    I: Iterator<Item = &'a str>,
{
    names.filter(|n| !is_blank(n))
}

fn sorted(map: std::collections::HashMap<String, String>) -> Vec<(String, String)> {
    let mut entries: Vec<_> = map.into_iter().collect();
    entries.sort();
    entries
}
