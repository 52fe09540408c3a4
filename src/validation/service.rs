//! Service validation.
//!
//! A service must name a known service type and supply every mandatory
//! configuration parameter of that type. Names are unique across services.

use super::action::{Action, EntityKind};
use super::engine::{evaluate, RuleCheck};
use super::errors::ValidationResult;
use super::failure::FailureCollector;
use super::rules::{invalid, missing, not_found, sorted_difference};
use crate::metadata::names::is_blank;
use crate::metadata::{MetadataIndex, NameNormalizer};
use crate::model::{EntityId, Service};
use crate::observability::SharedLog;

/// Validates service registrations.
#[derive(Clone)]
pub struct ServiceValidator {
    index: MetadataIndex,
    names: NameNormalizer,
}

impl ServiceValidator {
    pub fn new(index: MetadataIndex) -> Self {
        let names = NameNormalizer::new(index.log().clone());
        Self { index, names }
    }

    /// Validates a proposed service against the store's current state.
    pub fn validate_service(&self, service: &Service, action: Action) -> ValidationResult<()> {
        let subject = match service.id {
            Some(id) => id.to_string(),
            None => service.name.clone(),
        };
        evaluate(
            EntityKind::Service,
            &subject,
            action,
            self.index.log().as_ref(),
            |failures| self.check_service(service, action, failures),
        )
    }

    pub fn check_service(&self, service: &Service, action: Action, failures: &mut FailureCollector) -> bool {
        if action == Action::Delete {
            return self.check_exists(service.id, failures);
        }

        let mut valid = true;

        if is_blank(&service.name) {
            failures.push(missing("name", None, "service name is required"));
            valid = false;
        } else if let Some(existing) = self.index.service_by_name(&service.name) {
            if existing.id != service.id {
                failures.push(invalid(
                    "name",
                    None,
                    format!("service '{}' already exists", service.name),
                ));
                valid = false;
            }
        }
        if action == Action::Update {
            valid &= self.check_exists(service.id, failures);
        }

        if is_blank(&service.service_type) {
            failures.push(missing("type", None, "service type is required"));
            return false;
        }
        let Some(def) = self.index.service_def_by_name(&service.service_type) else {
            failures.push(not_found(
                "type",
                format!("service definition '{}' does not exist", service.service_type),
            ));
            return false;
        };

        let required = self.names.required_config_names(Some(&def));
        let supplied = self.names.service_config_names(Some(service));
        for name in sorted_difference(&required, &supplied) {
            failures.push(missing(
                "configs",
                Some(name),
                "mandatory configuration parameter not supplied",
            ));
            valid = false;
        }

        valid
    }

    fn check_exists(&self, id: Option<EntityId>, failures: &mut FailureCollector) -> bool {
        let Some(id) = id else {
            failures.push(missing("id", None, "service id is required"));
            return false;
        };
        if self.index.service(id).is_none() {
            failures.push(not_found("id", format!("no service with id {}", id)));
            return false;
        }
        true
    }
}

impl RuleCheck for ServiceValidator {
    const KIND: EntityKind = EntityKind::Service;

    fn log(&self) -> &SharedLog {
        self.index.log()
    }

    fn check_rules(&self, id: EntityId, action: Action, failures: &mut FailureCollector) -> bool {
        if action == Action::Delete {
            return self.check_exists(Some(id), failures);
        }
        match self.index.service(id) {
            Some(service) => self.check_service(&service, action, failures),
            None => {
                failures.push(not_found("id", format!("no service with id {}", id)));
                false
            }
        }
    }
}
