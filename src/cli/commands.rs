//! CLI command implementations
//!
//! Every command loads the configuration, opens the directory store behind a
//! `MetadataIndex`, and writes exactly one JSON object to stdout.

use std::path::Path;
use std::sync::Arc;

use chrono::Utc;
use serde::de::DeserializeOwned;
use serde_json::{json, Value};

use super::args::Command;
use super::config::Config;
use super::errors::{CliError, CliResult};
use super::io::{read_input, write_json};
use crate::metadata::MetadataIndex;
use crate::model::{EntityId, Policy, Service, ServiceDef};
use crate::store::DirStore;
use crate::validation::{
    Action, EntityKind, PolicyValidator, RuleCheck, ServiceDefValidator, ServiceValidator,
    ValidationResult,
};

/// How a command finished when it did not error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// The command completed and, if it validated something, it passed
    Success,
    /// The validated entity was rejected
    Rejected,
}

impl Outcome {
    /// Process exit code for this outcome
    pub fn exit_code(&self) -> i32 {
        match self {
            Outcome::Success => 0,
            Outcome::Rejected => 2,
        }
    }
}

/// Execute a parsed command
pub fn run_command(command: Command) -> CliResult<Outcome> {
    match command {
        Command::Validate {
            config,
            kind,
            id,
            action,
        } => validate(&config, kind.into(), id, action.into()),
        Command::Check {
            config,
            kind,
            action,
            file,
        } => check(&config, kind.into(), action.into(), &file),
        Command::Audit { config, id } => audit(&config, id),
    }
}

fn open_index(config_path: &Path) -> CliResult<MetadataIndex> {
    let config = Config::load(config_path)?;
    let log = config.open_log()?;
    let store = Arc::new(DirStore::new(&config.store_dir));
    Ok(MetadataIndex::new(store, log))
}

/// Validate a stored entity by id
pub fn validate(
    config_path: &Path,
    kind: EntityKind,
    id: EntityId,
    action: Action,
) -> CliResult<Outcome> {
    let index = open_index(config_path)?;
    let result = match kind {
        EntityKind::Policy => PolicyValidator::new(index).validate(id, action),
        EntityKind::Service => ServiceValidator::new(index).validate(id, action),
        EntityKind::ServiceDef => ServiceDefValidator::new(index).validate(id, action),
    };

    report(kind, action, &result)
}

/// Validate a proposed entity read from `file`
pub fn check(
    config_path: &Path,
    kind: EntityKind,
    action: Action,
    file: &Path,
) -> CliResult<Outcome> {
    let index = open_index(config_path)?;
    let content = read_input(file)?;

    let result = match kind {
        EntityKind::Policy => {
            let policy: Policy = parse_entity(kind, &content)?;
            PolicyValidator::new(index).validate_policy(&policy, action)
        }
        EntityKind::Service => {
            let service: Service = parse_entity(kind, &content)?;
            ServiceValidator::new(index).validate_service(&service, action)
        }
        EntityKind::ServiceDef => {
            let def: ServiceDef = parse_entity(kind, &content)?;
            ServiceDefValidator::new(index).validate_service_def(&def, action)
        }
    };

    report(kind, action, &result)
}

/// Print the effective audit flag of a stored policy
pub fn audit(config_path: &Path, id: EntityId) -> CliResult<Outcome> {
    let index = open_index(config_path)?;
    let policy = index
        .policy(id)
        .ok_or_else(|| CliError::input_error(format!("No policy with id {}", id)))?;

    let enabled = PolicyValidator::new(index).is_audit_enabled(Some(&policy));
    write_json(&json!({
        "status": "ok",
        "id": id,
        "auditEnabled": enabled,
        "checkedAt": Utc::now().to_rfc3339(),
    }))?;

    Ok(Outcome::Success)
}

fn parse_entity<T: DeserializeOwned>(kind: EntityKind, content: &str) -> CliResult<T> {
    serde_json::from_str(content)
        .map_err(|e| CliError::input_error(format!("Invalid {} document: {}", kind, e)))
}

fn report(kind: EntityKind, action: Action, result: &ValidationResult<()>) -> CliResult<Outcome> {
    write_json(&outcome_document(kind, action, result, &Utc::now().to_rfc3339()))?;

    Ok(match result {
        Ok(()) => Outcome::Success,
        Err(_) => Outcome::Rejected,
    })
}

/// Build the stdout document for one validation outcome.
pub fn outcome_document(
    kind: EntityKind,
    action: Action,
    result: &ValidationResult<()>,
    checked_at: &str,
) -> Value {
    match result {
        Ok(()) => json!({
            "status": "valid",
            "kind": kind,
            "action": action,
            "checkedAt": checked_at,
        }),
        Err(err) => json!({
            "status": "invalid",
            "kind": kind,
            "action": action,
            "checkedAt": checked_at,
            "message": err.message(),
            "failures": err.failures(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ResourceDef;
    use crate::validation::{ValidationError, ValidationFailureDetails};
    use std::fs;
    use tempfile::TempDir;

    fn fixture() -> (TempDir, std::path::PathBuf) {
        let tmp = TempDir::new().unwrap();
        let store_dir = tmp.path().join("store");
        let store = DirStore::new(&store_dir);
        store
            .put_service_def(
                &ServiceDef::new("hdfs")
                    .with_id(1)
                    .with_resource(ResourceDef::mandatory("path")),
            )
            .unwrap();
        store
            .put_service(&Service::new("cl1", "hdfs").with_id(10))
            .unwrap();

        let config_path = tmp.path().join("policyvet.json");
        fs::write(
            &config_path,
            json!({"store_dir": store_dir, "log_target": "none"}).to_string(),
        )
        .unwrap();
        (tmp, config_path)
    }

    #[test]
    fn test_outcome_exit_codes() {
        assert_eq!(Outcome::Success.exit_code(), 0);
        assert_eq!(Outcome::Rejected.exit_code(), 2);
    }

    #[test]
    fn test_valid_document_shape() {
        let doc = outcome_document(
            EntityKind::ServiceDef,
            Action::Create,
            &Ok(()),
            "2026-01-01T00:00:00+00:00",
        );
        assert_eq!(
            doc,
            json!({
                "status": "valid",
                "kind": "service-def",
                "action": "create",
                "checkedAt": "2026-01-01T00:00:00+00:00",
            })
        );
    }

    #[test]
    fn test_invalid_document_carries_failures() {
        let failure = ValidationFailureDetails::builder()
            .field("name")
            .is_missing()
            .build();
        let err = ValidationError::new(
            EntityKind::Policy,
            Action::Update,
            format!("{};", failure),
            vec![failure],
        );
        let doc = outcome_document(EntityKind::Policy, Action::Update, &Err(err), "t");

        assert_eq!(doc["status"], "invalid");
        assert_eq!(doc["kind"], "policy");
        assert_eq!(doc["failures"].as_array().unwrap().len(), 1);
        assert_eq!(doc["failures"][0]["fieldName"], "name");
        assert!(doc["message"].as_str().unwrap().ends_with(';'));
    }

    #[test]
    fn test_validate_stored_service() {
        let (_tmp, config) = fixture();
        let outcome = validate(&config, EntityKind::Service, 10, Action::Update).unwrap();
        assert_eq!(outcome, Outcome::Success);
    }

    #[test]
    fn test_validate_missing_service_def_is_rejected() {
        let (_tmp, config) = fixture();
        let outcome = validate(&config, EntityKind::ServiceDef, 99, Action::Delete).unwrap();
        assert_eq!(outcome, Outcome::Rejected);
    }

    #[test]
    fn test_check_policy_file_missing_mandatory_resource() {
        let (tmp, config) = fixture();
        let file = tmp.path().join("candidate.json");
        fs::write(&file, r#"{"name": "p1", "service": "cl1"}"#).unwrap();

        let outcome = check(&config, EntityKind::Policy, Action::Create, &file).unwrap();
        assert_eq!(outcome, Outcome::Rejected);
    }

    #[test]
    fn test_check_malformed_document_is_input_error() {
        let (tmp, config) = fixture();
        let file = tmp.path().join("candidate.json");
        fs::write(&file, "[1, 2]").unwrap();

        let err = check(&config, EntityKind::Service, Action::Create, &file).unwrap_err();
        assert_eq!(err.code(), super::super::errors::CliErrorCode::InputError);
    }

    #[test]
    fn test_audit_unknown_policy_is_input_error() {
        let (_tmp, config) = fixture();
        assert!(audit(&config, 5).is_err());
    }

    #[test]
    fn test_bad_config_propagates() {
        let tmp = TempDir::new().unwrap();
        let err = validate(&tmp.path().join("nope.json"), EntityKind::Policy, 1, Action::Delete)
            .unwrap_err();
        assert_eq!(err.code(), super::super::errors::CliErrorCode::ConfigError);
    }
}
